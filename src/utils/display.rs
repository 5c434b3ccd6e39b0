//! Display helpers for identity values printed to the operator or journal.

/// First `visible` characters followed by `...`. Values no longer than
/// `visible` are still suffixed so a masked value never looks complete.
pub fn mask_prefix(value: &str, visible: usize) -> String {
    let prefix: String = value.chars().take(visible).collect();
    format!("{}...", prefix)
}

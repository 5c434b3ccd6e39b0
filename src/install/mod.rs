//! Default installation, run when the action directory has nothing to offer.
//!
//! A fixed list of labeled steps executed in order. The first failing step
//! stops the sequence.

use crate::error::GateError;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

/// Pause taken by each built-in step.
const STEP_PAUSE: Duration = Duration::from_millis(500);

type StepFn = Box<dyn Fn() -> anyhow::Result<()>>;

/// One labeled installation step.
pub struct InstallStep {
    label: String,
    run: StepFn,
}

impl InstallStep {
    pub fn new(label: impl Into<String>, run: impl Fn() -> anyhow::Result<()> + 'static) -> Self {
        Self {
            label: label.into(),
            run: Box::new(run),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The built-in sequence.
pub fn default_steps() -> Vec<InstallStep> {
    ["Installing application", "Configuring system", "Setting up services"]
        .into_iter()
        .map(|label| {
            InstallStep::new(label, || {
                std::thread::sleep(STEP_PAUSE);
                Ok(())
            })
        })
        .collect()
}

/// Run `steps` in order, announcing each on `out`.
pub fn run_installation<W: Write>(steps: &[InstallStep], out: &mut W) -> anyhow::Result<()> {
    for step in steps {
        writeln!(out, "  {} {}...", "→".blue(), step.label)?;
        out.flush()?;
        (step.run)().map_err(|source| GateError::InstallStep {
            step: step.label.clone(),
            source,
        })?;
        tracing::debug!(step = %step.label, "installation step done");
    }
    Ok(())
}

//! The gated run, start to finish:
//! 1. Load configuration and obtain the license key
//! 2. Collect the caller's identity
//! 3. Ask the authority (the gate)
//! 4. Show the action menu, or run the default installation when there are no actions

use crate::authority::{AuthorityClient, Grant};
use crate::catalog::Catalog;
use crate::config::{GateConfig, Overrides};
use crate::dispatch::{ActionRunner, Dispatcher};
use crate::error::GateError;
use crate::identity::{Identity, IdentityCollector};
use crate::install::{default_steps, run_installation};
use crate::journal::{self, JournalEvent, SessionJournal};
use crate::utils::display::mask_prefix;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Characters of the license key shown on screen and in the journal.
const LICENSE_VISIBLE: usize = 8;
/// Characters of the machine id shown on screen.
const MACHINE_ID_VISIBLE: usize = 16;

/// Options for a gated run, as collected by the CLI.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// License key from `--license` / `LICENSE_KEY`; prompted for when absent
    pub license_key: Option<String>,
    /// Explicit config file (`--config`)
    pub config_path: Option<PathBuf>,
    pub overrides: Overrides,
}

/// Run the gate and then the actions.
pub async fn run_gate(options: RunOptions) -> Result<()> {
    let mut config = GateConfig::load(options.config_path.as_deref())?;
    config.apply(&options.overrides);
    config.validate().context("Invalid configuration")?;

    let license_key = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        resolve_license_key(options.license_key, &mut stdin.lock(), &mut stdout.lock())?
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    print_banner(&session_id);

    let mut journal = open_journal(&config, &session_id);

    // Step 1: identity
    println!("  {} Detecting public IP address...", "→".blue());
    let collector =
        IdentityCollector::new(&config.ip_endpoints, &config.identity_files, config.ip_timeout())?;
    let identity = match collector.collect().await {
        Ok(identity) => identity,
        Err(e) => {
            journal::record(
                &mut journal,
                JournalEvent::GateFailed {
                    license: mask_prefix(&license_key, LICENSE_VISIBLE),
                    public_ip: None,
                    reason: e.to_string(),
                },
            );
            return Err(anyhow::Error::new(e).context("Failed to detect public IP"));
        }
    };

    // Step 2: the gate
    let grant = authorize(&config, &license_key, &identity, &mut journal).await?;

    // Step 3: actions or the default installation
    let catalog = Catalog::new(&config.actions_dir, config.script_suffixes.clone());
    if catalog.has_actions() {
        run_menu(catalog, ActionRunner::for_grant(&config.interpreter, &grant), journal)
    } else {
        run_default_installation(&mut journal)
    }
}

async fn authorize(
    config: &GateConfig,
    license_key: &str,
    identity: &Identity,
    journal: &mut Option<SessionJournal>,
) -> Result<Grant> {
    println!("  {} Validating license...", "→".blue());
    println!("    License Key: {}", mask_prefix(license_key, LICENSE_VISIBLE));
    println!("    Public IP:   {}", identity.public_ip);
    println!("    Machine ID:  {}", mask_prefix(&identity.machine_id, MACHINE_ID_VISIBLE));

    let client = AuthorityClient::with_timeout(
        config.authority_url.clone(),
        config.api_key.clone(),
        config.authority_timeout(),
    )?;

    match client.validate(license_key, identity).await {
        Ok(grant) => {
            journal::record(
                journal,
                JournalEvent::Authorized {
                    license: mask_prefix(license_key, LICENSE_VISIBLE),
                    public_ip: identity.public_ip.clone(),
                    machine_id: identity.machine_id.clone(),
                },
            );
            println!();
            println!("  {} License validated successfully!", "✓".green().bold());
            println!("  {} IP address: {}", "✓".green(), identity.public_ip.cyan());
            Ok(grant)
        }
        Err(e) => {
            journal::record(
                journal,
                JournalEvent::GateFailed {
                    license: mask_prefix(license_key, LICENSE_VISIBLE),
                    public_ip: Some(identity.public_ip.clone()),
                    reason: e.to_string(),
                },
            );
            if matches!(e, GateError::Denied { .. }) {
                eprintln!();
                eprintln!(
                    "  {} Your IP ({}) is not authorized for this license",
                    "✗".red(),
                    identity.public_ip
                );
            }
            Err(anyhow::Error::new(e).context("License validation failed. Installation aborted"))
        }
    }
}

fn run_menu(catalog: Catalog, runner: ActionRunner, journal: Option<SessionJournal>) -> Result<()> {
    let mut dispatcher = Dispatcher::new(catalog, runner).with_journal(journal);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let summary = dispatcher
        .run(stdin.lock(), &mut stdout.lock())
        .context("Menu error")?;

    if summary.executed > 0 {
        println!();
        println!(
            "  {} {} run | {} failed",
            summary.executed.to_string().bold(),
            if summary.executed == 1 { "action" } else { "actions" },
            summary.failed.to_string().red().bold(),
        );
    }
    if let Some(journal) = dispatcher.into_journal() {
        println!("  Journal: {}", journal.log_path().display().to_string().dimmed());
    }
    println!();
    Ok(())
}

fn run_default_installation(journal: &mut Option<SessionJournal>) -> Result<()> {
    println!();
    println!("  {} Running default installation...", "→".blue());
    println!();

    let stdout = std::io::stdout();
    let result = run_installation(&default_steps(), &mut stdout.lock());
    journal::record(
        journal,
        JournalEvent::InstallFinished {
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| format!("{:#}", e)),
        },
    );
    result.context("Installation failed")?;

    println!();
    println!("  {} Installation completed successfully!", "✓".green().bold());
    println!();
    Ok(())
}

/// Use the given key, or prompt for one. An empty key is an error.
pub fn resolve_license_key<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<String> {
    if let Some(key) = given.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        return Ok(key);
    }

    write!(out, "Enter your license key: ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;

    let key = line.trim();
    if key.is_empty() {
        bail!("License key is required");
    }
    Ok(key.to_string())
}

fn print_banner(session_id: &str) {
    println!();
    println!("  {}", "==========================================".dimmed());
    println!("  {}  v{}", "License Authentication Installer".bold(), env!("CARGO_PKG_VERSION"));
    println!("  {}", "==========================================".dimmed());
    println!("  Session: {}", session_id[..8].cyan());
    println!();
}

fn open_journal(config: &GateConfig, session_id: &str) -> Option<SessionJournal> {
    if !config.journal {
        return None;
    }
    let dir = match &config.journal_dir {
        Some(dir) => dir.clone(),
        None => match SessionJournal::default_directory() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("Session journal disabled: {:#}", e);
                return None;
            }
        },
    };
    match SessionJournal::new(session_id, &dir) {
        Ok(journal) => Some(journal),
        Err(e) => {
            tracing::warn!("Session journal disabled: {:#}", e);
            None
        }
    }
}

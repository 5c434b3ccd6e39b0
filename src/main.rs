//! licensegate: authorize this machine, then run operator actions.
//!
//! Quick start:
//!   licensegate --license ABCD-1234        # validate, then pick an action
//!   LICENSE_KEY=ABCD-1234 licensegate      # same, key from the environment
//!
//! For more info: licensegate --help

use clap::Parser;
use colored::Colorize;
use licensegate::cli::{self, RunOptions};
use licensegate::config::Overrides;
use std::path::PathBuf;

/// Validate a license for this machine's public IP, then run actions.
#[derive(Parser)]
#[command(
    name = "licensegate",
    version,
    about = "Validate a license for this machine, then run operator actions",
    long_about = "licensegate detects this machine's public IP and machine id, asks the\n\
                  license authority whether the license may run here, and only then\n\
                  offers the scripts in the actions directory.\n\n\
                  Without any scripts it runs the default installation instead."
)]
struct Cli {
    /// License key (prompted for if omitted)
    #[arg(short, long, env = "LICENSE_KEY", hide_env_values = true)]
    license: Option<String>,

    /// License authority base URL
    #[arg(long, env = "API_BASE_URL")]
    api: Option<String>,

    /// Installer API key sent to the authority
    #[arg(short, long, env = "INSTALLER_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Directory holding the action scripts
    #[arg(short, long, env = "SCRIPTS_DIR")]
    scripts: Option<PathBuf>,

    /// YAML config file (default: ~/.licensegate/config.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Don't write a session journal
    #[arg(long)]
    no_journal: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics only at RUST_LOG=debug/info; operator output goes through println
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("licensegate=warn".parse().unwrap()),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let options = RunOptions {
        license_key: args.license,
        config_path: args.config,
        overrides: Overrides {
            authority_url: args.api,
            api_key: args.key,
            actions_dir: args.scripts,
            no_journal: args.no_journal,
        },
    };

    if let Err(e) = cli::run_gate(options).await {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}

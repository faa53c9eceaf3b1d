// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pawhaven - pet recovery and adoption service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pawhaven_config::PawhavenConfig;

/// Pawhaven - pet recovery and adoption service.
#[derive(Parser, Debug)]
#[command(name = "pawhaven", version, about, long_about = None)]
struct Cli {
    /// Load this TOML file instead of the standard search path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API and the approval reconciler.
    Serve,
    /// Repair interrupted adoption approvals once and exit.
    Reconcile,
    /// Validate configuration and print the effective settings.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> PawhavenConfig {
    let loaded = match path {
        Some(path) => pawhaven_config::load_and_validate_path(path),
        None => pawhaven_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            pawhaven_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn print_summary(config: &PawhavenConfig) {
    println!("pawhaven: config OK");
    println!("  server      {}:{}", config.server.host, config.server.port);
    println!("  database    {}", config.storage.database_path);
    println!(
        "  media       {} -> {}",
        config.media.root_dir, config.media.public_url_prefix
    );
    println!(
        "  approvals   {:?} (terminal states enforced: {})",
        config.lifecycle.approval_mode, config.lifecycle.enforce_terminal_states
    );
    println!("  delete      {:?}", config.lifecycle.pet_delete_policy);
    println!("  tokens      {}", config.auth.tokens.len());
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Reconcile) => match serve::run_reconcile(config).await {
            Ok(report) => println!(
                "reconciled: examined={} repaired={} cleared={} deferred={} failed={}",
                report.examined, report.repaired, report.cleared, report.deferred, report.failed
            ),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::CheckConfig) => print_summary(&config),
        None => {
            println!("pawhaven: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["pawhaven", "--config", "dev.toml", "check-config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));

        let cli = Cli::try_parse_from(["pawhaven", "reconcile"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Reconcile)));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pawhaven.toml");
        std::fs::write(&path, "[server]\nport = 9191\n").unwrap();
        let config = load_config(Some(&path));
        assert_eq!(config.server.port, 9191);
    }
}

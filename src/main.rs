mod cli;
mod config;
mod download;
mod error;
mod install;
mod manifest;
mod platform;
mod progress;
mod resolve;
mod types;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Settings, APP_NAME};
use console::style;
use error::ZvmError;
use install::Installer;
use platform::host_platform;
use progress::DownloadBar;
use std::process::ExitCode;

const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Debug, thiserror::Error)]
#[error("interrupted")]
struct Interrupted;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
            println!("host: {}", host_platform().key());
        }

        Commands::Install { version } => {
            let installer = Installer::new(Settings::load()?)?;
            let bar = DownloadBar::new(&version, cli.quiet);

            // Dropping the install future aborts the transfer and releases
            // the version lock.
            let path = tokio::select! {
                result = installer.install(&version, &bar) => result?,
                _ = tokio::signal::ctrl_c() => {
                    bar.abandon();
                    return Err(Interrupted.into());
                }
            };

            if !cli.quiet {
                eprintln!(
                    "Downloaded Zig {} to {}",
                    style(&version).green(),
                    path.display()
                );
            }
        }

        Commands::Ls { remote, offline } => {
            let installer = Installer::new(Settings::load()?)?;
            let versions = if remote {
                installer.available_versions(offline).await?
            } else {
                installer.installed_versions()?
            };

            if versions.is_empty() && !cli.quiet {
                if remote {
                    let source = if offline {
                        installer.settings().manifest_cache_path().display().to_string()
                    } else {
                        installer.settings().manifest_url.clone()
                    };
                    eprintln!("No versions listed in the manifest from {}", source);
                } else {
                    eprintln!(
                        "No versions installed in {}",
                        installer.settings().root.display()
                    );
                }
            }
            for version in versions {
                println!("{}", version);
            }
        }
    }

    Ok(())
}

fn report(err: &anyhow::Error) -> ExitCode {
    if err.is::<Interrupted>() {
        eprintln!("{}", style("Interrupted").yellow());
        return ExitCode::from(INTERRUPTED_EXIT_CODE);
    }

    eprintln!("{} {}", style("error:").red().bold(), err);
    match err.downcast_ref::<ZvmError>() {
        Some(zvm_err) => {
            let category = zvm_err.category();
            eprintln!("{}", style(category.hint()).dim());
            ExitCode::from(category.exit_code())
        }
        None => ExitCode::FAILURE,
    }
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();
}

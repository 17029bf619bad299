use clap::{Parser, Subcommand};

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    if let Some(tag) = option_env!("ZVM_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("ZVM_GIT_COMMIT").unwrap_or("unknown");
    // Computed once at startup
    Box::leak(format!("v{}-{}", BASE_VERSION, commit).into_boxed_str())
}

#[derive(Parser)]
#[command(name = "zvm")]
#[command(about = "A version manager for the Zig compiler")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a Zig release into ~/.zvm/<version>
    #[command(
        alias = "i",
        after_help = "Examples:\n  zvm install 0.11.0\n  zvm install master"
    )]
    Install {
        /// Version from the download index (e.g. '0.11.0' or 'master')
        #[arg(id = "install_version", value_name = "VERSION")]
        version: String,
    },

    /// List downloaded versions
    #[command(alias = "list")]
    Ls {
        /// List versions available upstream instead
        #[arg(long)]
        remote: bool,

        /// With --remote, read the cached manifest instead of fetching it
        #[arg(long, requires = "remote")]
        offline: bool,
    },

    /// Show the current version
    Version,
}

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "hologram-check")]
#[command(about = "Authenticate product hologram codes against imported serial ranges")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "hologram.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import the serials and invalids sheets and report rejected rows
    Import {
        /// Override store.serials_path
        #[arg(long)]
        serials: Option<String>,
        /// Override store.invalids_path
        #[arg(long)]
        invalids: Option<String>,
    },
    /// Classify one hologram code
    Check {
        code: String,
        /// Print {"status", "answer"} as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look for prefix mismatches, reversed and overlapping ranges
    Audit,
    /// Handle one inbound message: classify, log and reply to the sender
    Process {
        #[arg(long = "from")]
        sender: String,
        #[arg(long)]
        message: String,
    },
    /// Show per-status counts and the most recent transactions
    Stats {
        #[arg(long, default_value = "20")]
        recent: usize,
    },
}

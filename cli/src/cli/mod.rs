use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Live power dashboard (default)
    #[command(alias = "tui")]
    Ui,

    /// Print a JSON document at every sample instead of drawing the dashboard
    #[command(alias = "raw")]
    Pipe {
        /// Stop after this many samples (0 = run until interrupted)
        #[arg(short, long, default_value_t = 0)]
        samples: u32,

        /// One JSON object per line
        #[arg(short, long)]
        compact: bool,
    },

    /// Read the battery registry once and show what was parsed
    Debug,

    /// Show, locate or reset the config file
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,

        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Real-time power monitor for Apple silicon laptops.
#[derive(Debug, Parser)]
#[command(name = "wattch", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

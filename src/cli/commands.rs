use clap::{ArgAction, Parser, Subcommand};

use crate::config::TOKEN_ENV;

#[derive(Parser)]
#[command(
    name = "canvas-sync",
    version,
    about = "Download new Canvas course files, mirroring the course folder structure",
    after_help = "COURSE is a numeric course ID or any URL containing 'courses/<id>'. \
                  Download history lives in <root>/.canvas-sync/state.db; settings in \
                  <root>/.canvas-sync/config.toml."
)]
pub struct Cli {
    /// Download root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// API base URL, e.g. https://canvas.example.edu/api/v1
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API access token
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check the course for new files and download them.
    ///
    /// Files already in the download history are skipped. Each new file is
    /// saved as <course folder>/<remote folder path>/<name>.
    Sync {
        /// Course ID or course URL
        course: String,
    },

    /// List downloaded files, oldest first
    History {
        /// Course ID or course URL
        course: String,
        /// Case-insensitive substring filter on file names
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Remove entries from the download history so they are fetched again
    Forget {
        /// Course ID or course URL
        course: String,
        /// File IDs to remove
        ids: Vec<u64>,
        /// Case-insensitive substring filter on file names
        #[arg(short, long)]
        filter: Option<String>,
        /// Select every entry passing the filter
        #[arg(long)]
        all: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Clear the whole download history of a course
    Reset {
        /// Course ID or course URL
        course: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the effective settings (token redacted)
    Config {
        /// Write .canvas-sync/config.toml with the file-level settings if it does not exist
        #[arg(long)]
        init: bool,
    },
}

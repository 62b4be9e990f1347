use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pastez")]
#[command(about = "Versioned, forkable paste store for the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage root (defaults to $PASTEZ_ROOT, then the platform data dir)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Act as this owner
    #[arg(short, long, global = true)]
    pub owner: Option<String>,

    /// Access key for private pastes
    #[arg(short, long, global = true)]
    pub key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new paste
    #[command(alias = "n")]
    New {
        /// Short description of the paste
        #[arg(default_value = "")]
        description: String,

        /// Make the paste private (generates an access key)
        #[arg(long)]
        private: bool,
    },

    /// List pastes, newest first
    #[command(alias = "ls")]
    List,

    /// Add or update a file in a paste
    Add {
        /// Paste id (full or unique prefix)
        paste: String,

        /// Name of the file inside the paste
        filename: String,

        /// File content (reads stdin when omitted)
        content: Option<String>,
    },

    /// Remove a file from a paste
    #[command(alias = "rm")]
    Remove {
        /// Paste id (full or unique prefix)
        paste: String,

        /// Name of the file inside the paste
        filename: String,
    },

    /// Show the files of a paste
    Files {
        /// Paste id (full or unique prefix)
        paste: String,
    },

    /// Print one file of a paste to stdout
    Cat {
        /// Paste id (full or unique prefix)
        paste: String,

        /// Name of the file inside the paste
        filename: String,
    },

    /// Fork a paste into a new one owned by the acting owner
    Fork {
        /// Paste id (full or unique prefix)
        paste: String,
    },

    /// Show the working-tree status of a paste
    Status {
        /// Paste id (full or unique prefix)
        paste: String,
    },

    /// Show the revision history of a paste, newest first
    Log {
        /// Paste id (full or unique prefix)
        paste: String,
    },
}

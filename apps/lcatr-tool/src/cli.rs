use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory for referenced files (overrides $CCDTEST_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Colon-separated search path for referenced files (overrides $CCDTEST_PATH)
    #[arg(long, global = true)]
    pub path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a result file, including referenced file hashes
    Validate {
        /// Result file to check
        file: PathBuf,
    },

    /// Show the records of a result file
    Info {
        /// Result file to inspect
        file: PathBuf,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recompute the hashes of every referenced file
    Rehash {
        /// Result file to update
        file: PathBuf,

        /// Write the result here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

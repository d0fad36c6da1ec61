use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapsync")]
#[command(version)]
#[command(about = "Back up the most recent dated project folder, verified by content hashes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Source root containing dated project folders
    #[arg(long, global = true, value_name = "DIR", env = "SNAPSYNC_SOURCE")]
    pub source: Option<String>,

    /// Destination root holding retained snapshots
    #[arg(long, global = true, value_name = "DIR", env = "SNAPSYNC_DESTINATION")]
    pub destination: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive backup run: capacity gate, copy, hash, compare
    Run,

    /// Build and persist a hash manifest for one directory
    Hash {
        /// Directory to hash
        dir: PathBuf,
    },

    /// Compare the persisted manifests of two directories
    Verify {
        /// Directory holding the reference manifest
        source_dir: PathBuf,
        /// Directory checked against the reference
        dest_dir: PathBuf,
    },

    /// Show source size, destination free space, and retained snapshots
    Status,

    /// Delete the oldest retained snapshot at the destination
    Evict {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

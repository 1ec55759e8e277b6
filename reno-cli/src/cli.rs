use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Encode, decode and collate release notes")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Print the path to the configuration file
    Path,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a release record (JSON) into a portable string
    Encode {
        /// Path to a JSON record file; reads stdin when omitted
        #[clap(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Decode a portable string back into its JSON record
    Decode {
        /// The portable string to decode
        portable: Option<String>,

        /// Path to a file holding the portable string; reads stdin when
        /// neither this nor the positional argument is given
        #[clap(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Collate portable strings (one per line) into printed cards
    Collate {
        /// Path to a file of portable strings; reads stdin when omitted
        #[clap(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Configuration commands
    #[clap(subcommand)]
    Config(ConfigCommand),
}

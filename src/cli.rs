use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixvault")]
#[command(author, version, about = "Store and retrieve images by name in a local vault")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault directory (overrides the config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store an image file under an identifier
    Save {
        /// Identifier to store the image under
        #[arg(required = true)]
        id: String,

        /// Image file to store
        #[arg(required = true)]
        image: PathBuf,
    },

    /// Retrieve the image stored under an identifier
    Get {
        /// Identifier to look up
        #[arg(required = true)]
        id: String,

        /// Write the retrieved image to this path (format by extension)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored images
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive mode: open, save and retrieve images line by line
    Session,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

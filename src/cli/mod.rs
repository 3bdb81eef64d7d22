//! CLI definitions and command implementations for blobcrypt.

pub mod commands;
pub mod terminal;

use blobcrypt::BlobId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blobcrypt - encrypt, decrypt and store text through an encryption service
#[derive(Parser)]
#[command(name = "blobcrypt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.config/blobcrypt/blobcrypt.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides BLOBCRYPT_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt text and print the base64 ciphertext (auto-saves unless disabled)
    Encrypt {
        /// Text to encrypt (read from stdin when omitted; one trailing newline is dropped)
        text: Option<String>,

        /// Filename stored with the ciphertext
        #[arg(short, long)]
        filename: Option<String>,

        /// Note stored with the ciphertext
        #[arg(short, long)]
        note: Option<String>,

        /// Do not save the ciphertext
        #[arg(long)]
        no_save: bool,
    },

    /// Decrypt a base64 ciphertext
    Decrypt {
        /// Ciphertext (read from stdin when omitted)
        #[arg(conflicts_with = "id")]
        ciphertext: Option<String>,

        /// Decrypt a stored blob instead
        #[arg(long)]
        id: Option<BlobId>,
    },

    /// Store a ciphertext with optional metadata
    Save {
        /// Base64 ciphertext
        ciphertext: String,

        #[arg(short, long)]
        filename: Option<String>,

        #[arg(short, long)]
        note: Option<String>,

        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Show a stored blob
    Show {
        /// Blob id
        id: BlobId,
    },

    /// List stored blobs
    List {
        /// Maximum number of blobs (1-200)
        #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: u32,
    },

    /// Delete a stored blob
    Delete {
        /// Blob id
        id: BlobId,
    },

    /// Check that the service is reachable
    Ping,

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config path and effective settings
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

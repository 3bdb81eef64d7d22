//! blobcrypt CLI - encrypt, decrypt and store text through an encryption service.
//!
//! Usage:
//!   blobcrypt encrypt [TEXT]      - Encrypt and auto-save the ciphertext
//!   blobcrypt decrypt [CT|--id]   - Decrypt inline, stdin or stored ciphertext
//!   blobcrypt save CT             - Store a ciphertext
//!   blobcrypt show|list|delete    - Manage stored ciphertexts
//!   blobcrypt ping                - Check the service

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands::{self, AppContext};
use cli::terminal::Alerted;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("blobcrypt={}", log_level))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(cli) {
        std::process::exit(exit_code(&err));
    }
}

/// 2 for input rejected before any request, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Alerted>() {
        // Already shown as an alert
        Some(Alerted(flow)) if flow.is_input_error() => 2,
        Some(_) => 1,
        None => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            1
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(cli.config, cli.base_url.as_deref())?;

    match cli.command {
        Commands::Encrypt {
            text,
            filename,
            note,
            no_save,
        } => commands::encrypt(&ctx, text, filename, note, no_save),
        Commands::Decrypt { ciphertext, id } => commands::decrypt(&ctx, ciphertext, id),
        Commands::Save {
            ciphertext,
            filename,
            note,
            owner,
        } => commands::save(&ctx, ciphertext, filename, note, owner),
        Commands::Show { id } => commands::show(&ctx, id),
        Commands::List { limit } => commands::list(&ctx, limit),
        Commands::Delete { id } => commands::delete(&ctx, id),
        Commands::Ping => commands::ping(&ctx),
        Commands::Config { action } => commands::config(&ctx, action),
    }
}

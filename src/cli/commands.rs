//! Command implementations for the blobcrypt CLI.
//!
//! Each command fills a [`TerminalForm`], runs the matching controller
//! operation and prints the output fields. Results go to stdout, status and
//! alerts to stderr, so output can be piped.

use super::terminal::{with_spinner, Alerted, TerminalForm};
use super::ConfigAction;
use anyhow::{bail, Context, Result};
use blobcrypt::config::{default_config_path, BASE_URL_ENV};
use blobcrypt::{
    BlobId, Config, Field, FlowError, FormController, FormState, HttpBackend, Orchestrator, SaveMeta,
    Toggle, View,
};
use colored::Colorize;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

/// Environment variable holding the password, checked before prompting.
pub const PASSWORD_ENV: &str = "BLOBCRYPT_PASSWORD";

/// Settings shared by all commands.
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub base_url: String,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>, base_url_flag: Option<&str>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        let config = Config::load_or_default(&config_path)?;
        let env_url = std::env::var(BASE_URL_ENV).ok();
        let base_url = config.resolve_base_url(base_url_flag, env_url.as_deref());

        Ok(Self {
            config,
            config_path,
            base_url,
        })
    }

    fn orchestrator(&self) -> Result<Orchestrator> {
        let backend = HttpBackend::with_timeout(&self.base_url, self.config.timeout())
            .with_context(|| format!("Cannot create client for {}", self.base_url))?;
        Ok(Orchestrator::new(backend, self.config.save_defaults()))
    }

    fn controller(&self) -> Result<FormController> {
        Ok(FormController::new(self.orchestrator()?))
    }
}

/// Password from the environment, else a hidden prompt. An empty answer is
/// passed through so the controller reports it.
fn read_password(prompt: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    eprint!("{}", prompt);
    io::stderr().flush()?;
    rpassword::read_password().context("Cannot read password")
}

fn read_stdin(what: &str) -> Result<String> {
    if io::stdin().is_terminal() {
        eprintln!("{}", format!("Enter {}, then Ctrl-D:", what).dimmed());
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .with_context(|| format!("Cannot read {} from stdin", what))?;
    Ok(input)
}

/// Drop the single line ending `echo` and editors append. Anything else,
/// including further newlines, is part of the plaintext.
fn strip_line_ending(mut input: String) -> String {
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    input
}

/// Encrypt text and print the ciphertext, then wait for the auto-save.
pub fn encrypt(
    ctx: &AppContext,
    text: Option<String>,
    filename: Option<String>,
    note: Option<String>,
    no_save: bool,
) -> Result<()> {
    let controller = ctx.controller()?;

    let plaintext = match text {
        Some(text) => text,
        None => strip_line_ending(read_stdin("plaintext")?),
    };
    let password = read_password("Password: ")?;

    let mut form = FormState::new()
        .with(Field::Plaintext, plaintext)
        .with(Field::Password, password)
        .with_toggle(Toggle::AutoSave, ctx.config.save.auto_save && !no_save);
    if let Some(filename) = filename {
        form = form.with(Field::Filename, filename);
    }
    if let Some(note) = note {
        form = form.with(Field::Note, note);
    }
    let mut form = TerminalForm::new(form);

    let outcome = form.busy("Encrypting...", |form| controller.encrypt(form))
        .map_err(Alerted)?;
    println!("{}", form.get(Field::Ciphertext));

    // The result is already printed; waiting only keeps the process alive
    // until the background save has finished.
    if let Some(task) = outcome.autosave {
        match with_spinner("Saving...", || task.wait()) {
            Some(saved) => eprintln!("  {} Saved record id: {}", "✓".green(), saved.id),
            None => eprintln!(
                "  {} Auto-save failed, ciphertext was not stored",
                "!".yellow()
            ),
        }
    }

    Ok(())
}

/// Decrypt a ciphertext given inline, on stdin or by stored blob id.
pub fn decrypt(ctx: &AppContext, ciphertext: Option<String>, id: Option<BlobId>) -> Result<()> {
    let controller = ctx.controller()?;
    let mut form = TerminalForm::new(FormState::new());

    match (ciphertext, id) {
        (_, Some(id)) => {
            let record = form.busy("Loading...", |form| controller.load(form, &id))
                .map_err(Alerted)?;
            if let Some(filename) = &record.filename {
                eprintln!("  {} {}", "File:".dimmed(), filename);
            }
        }
        (Some(ciphertext), None) => form.set_value(Field::CiphertextIn, ciphertext.trim()),
        (None, None) => {
            let ciphertext = read_stdin("ciphertext")?;
            form.set_value(Field::CiphertextIn, ciphertext.trim());
        }
    }

    let password = read_password("Password: ")?;
    form.set_value(Field::PasswordIn, &password);

    form.busy("Decrypting...", |form| controller.decrypt(form)).map_err(Alerted)?;
    println!("{}", form.get(Field::Recovered));

    Ok(())
}

/// Store a ciphertext. The save itself never errors, so a failure is
/// reported from its empty result.
pub fn save(
    ctx: &AppContext,
    ciphertext: String,
    filename: Option<String>,
    note: Option<String>,
    owner: Option<String>,
) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let meta = SaveMeta {
        filename,
        note,
        owner,
    };

    match with_spinner("Saving...", || orchestrator.save(ciphertext.trim(), meta)) {
        Some(saved) => {
            println!("{}", saved.id);
            if let Some(created_at) = saved.created_at {
                eprintln!("  {} Saved at {}", "✓".green(), created_at);
            }
            Ok(())
        }
        None => bail!("Save failed, see the log above for the reason"),
    }
}

pub fn show(ctx: &AppContext, id: BlobId) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let record = match with_spinner("Loading...", || orchestrator.load(&id)) {
        Ok(record) => record,
        Err(FlowError::Load { source, .. }) if source.status() == Some(404) => {
            bail!("No stored blob with id {}", id)
        }
        Err(err) => return Err(err.into()),
    };

    let dash = || "-".to_string();
    println!("{} {}", "id:".cyan(), record.id);
    println!("{} {}", "filename:".cyan(), record.filename.unwrap_or_else(dash));
    println!("{} {}", "note:".cyan(), record.note.unwrap_or_else(dash));
    println!("{} {}", "owner:".cyan(), record.owner.unwrap_or_else(dash));
    println!("{} {}", "algorithm:".cyan(), record.algorithm.unwrap_or_else(dash));
    println!("{} {}", "kdf:".cyan(), record.kdf.unwrap_or_else(dash));
    println!("{} {}", "created:".cyan(), record.created_at.unwrap_or_else(dash));
    println!("{} {}", "ciphertext:".cyan(), record.ciphertext_b64);

    Ok(())
}

pub fn list(ctx: &AppContext, limit: u32) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let blobs = with_spinner("Listing...", || orchestrator.list(limit))?;

    if blobs.is_empty() {
        println!("{}", "No stored blobs.".yellow());
        return Ok(());
    }

    for blob in &blobs {
        println!(
            "  {}  {}  {}  {}",
            blob.id.to_string().cyan(),
            blob.filename.as_deref().unwrap_or("-").white().bold(),
            blob.note.as_deref().unwrap_or("").dimmed(),
            blob.created_at.as_deref().unwrap_or("").dimmed()
        );
    }

    Ok(())
}

pub fn delete(ctx: &AppContext, id: BlobId) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let deleted = with_spinner("Deleting...", || orchestrator.remove(&id))?;

    if !deleted {
        bail!("Server did not delete blob {}", id);
    }
    println!("  {} Deleted blob {}", "✓".green(), id);
    Ok(())
}

pub fn ping(ctx: &AppContext) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let resp = with_spinner("Pinging...", || orchestrator.ping())?;

    if !resp.ok {
        bail!("{} answered but reported not ok", ctx.base_url);
    }
    println!(
        "  {} {} ({})",
        "✓".green(),
        ctx.base_url,
        resp.msg.as_deref().unwrap_or("ok")
    );
    Ok(())
}

pub fn config(ctx: &AppContext, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let state = if ctx.config_path.exists() {
                "".normal()
            } else {
                " (not created, using defaults)".dimmed()
            };
            println!("{} {}{}", "Config:".cyan(), ctx.config_path.display(), state);
            println!("{} {}", "Base URL:".cyan(), ctx.base_url);
            println!();
            print!("{}", toml::to_string_pretty(&ctx.config)?);
            Ok(())
        }
        ConfigAction::Init { force } => init_config(&ctx.config_path, force),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::new().save(path)?;
    println!("  {} Wrote {}", "✓".green(), path.display());
    Ok(())
}

//! Terminal front end: a form backed by memory whose alerts go to stderr.

use blobcrypt::{Field, FlowError, FormState, Toggle, View};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;

/// A flow error that was already shown as an alert.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Alerted(#[from] pub FlowError);

pub struct TerminalForm {
    form: FormState,
    spinner: Option<ProgressBar>,
}

impl TerminalForm {
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            spinner: None,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        self.form.get(field)
    }

    /// Run `f` on this form with a spinner on stderr. Alerts raised
    /// meanwhile are printed with the spinner suspended.
    pub fn busy<T>(&mut self, message: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.spinner = Some(new_spinner(message));
        let result = f(self);
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        result
    }
}

impl View for TerminalForm {
    fn value(&self, field: Field) -> Option<String> {
        self.form.value(field)
    }

    fn set_value(&mut self, field: Field, value: &str) {
        self.form.set_value(field, value);
    }

    fn is_checked(&self, toggle: Toggle) -> Option<bool> {
        self.form.is_checked(toggle)
    }

    fn alert(&mut self, message: &str) {
        let print = || eprintln!("{} {}", "✗".red().bold(), message.red());
        match &self.spinner {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }
        self.form.alert(message);
    }
}

fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Run `f` with a spinner on stderr.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = new_spinner(message);
    let result = f();

    spinner.finish_and_clear();
    result
}

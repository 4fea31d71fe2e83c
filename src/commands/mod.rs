//! Command handlers for the invoice CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod bills;
mod init;
mod views;

use crate::store::Persisted;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use bills::{add_bill, clear_amounts, remove_bill, set_amount};
pub use init::init;
pub use views::{list_bills, print, summary};

/// The output type for a command. This allows the command to return a consistent message,
/// optionally some structured data, and optionally a rendered view for stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Text meant for stdout, such as a bill list or the invoice itself.
    #[serde(skip)]
    text: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            text: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            text: None,
        }
    }

    /// Attach text that `print` writes to stdout.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Get the text meant for stdout.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Print the message to `info!`, the structured data (if it exists) as JSON to `debug!`, and
    /// the text (if it exists) to stdout.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
        if let Some(text) = self.text() {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
}

/// Appends a note about a failed save to a command message.
fn note_persisted(message: String, persisted: &Persisted) -> String {
    match persisted {
        Persisted::Failed(e) => format!("{message}, but the change could not be saved: {e}"),
        Persisted::Saved | Persisted::Unchanged => message,
    }
}

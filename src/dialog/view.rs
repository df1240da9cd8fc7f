//! Render-ready snapshot of the dialog.

use std::fmt;

use super::error::DialogError;

pub const WAITING_MESSAGE: &str = "Waiting for authorization to be completed...";
pub const SPINNER_MESSAGE: &str = "Requesting device code...";

/// Error banner shown above the dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub title: String,
    pub message: String,
}

impl From<&DialogError> for ErrorBanner {
    fn from(error: &DialogError) -> Self {
        Self {
            title: "Error".to_string(),
            message: error.message(),
        }
    }
}

/// Main content of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogBody {
    /// Device code request in flight.
    Spinner,
    /// Nothing to show (the code request failed).
    Empty,
    /// Code shown to the user while the poll runs.
    Polling {
        user_code: String,
        validation_uri: String,
        button_label: String,
        waiting: bool,
    },
}

/// Snapshot of everything the dialog displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub open: bool,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub error: Option<ErrorBanner>,
    pub body: DialogBody,
}

impl DialogView {
    pub fn hidden() -> Self {
        Self {
            open: false,
            title: String::new(),
            description: String::new(),
            instructions: String::new(),
            error: None,
            body: DialogBody::Empty,
        }
    }

    /// Verification link, when a code is on screen.
    pub fn link(&self) -> Option<&str> {
        match &self.body {
            DialogBody::Polling { validation_uri, .. } => Some(validation_uri),
            _ => None,
        }
    }
}

impl fmt::Display for DialogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.open {
            return Ok(());
        }
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "{}", self.instructions)?;
        if let Some(banner) = &self.error {
            writeln!(f)?;
            writeln!(f, "[{}] {}", banner.title, banner.message)?;
        }
        match &self.body {
            DialogBody::Spinner => {
                writeln!(f)?;
                writeln!(f, "    {SPINNER_MESSAGE}")?;
            }
            DialogBody::Empty => {}
            DialogBody::Polling {
                user_code,
                validation_uri,
                button_label,
                waiting,
            } => {
                writeln!(f)?;
                writeln!(f, "    {user_code}")?;
                writeln!(f)?;
                writeln!(f, "    {button_label}: {validation_uri}")?;
                if *waiting {
                    writeln!(f)?;
                    writeln!(f, "    {WAITING_MESSAGE}")?;
                }
            }
        }
        Ok(())
    }
}

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::contacts::ContactImportError;
use crate::workflows::outreach::{MatchError, TemplateError};
use std::fmt;

/// Failures that end a command. Per-recipient send failures are not listed:
/// they are reported inside the send loop and never stop it.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Contacts(ContactImportError),
    Matching(MatchError),
    Template(TemplateError),
    Output(serde_json::Error),
}

impl AppError {
    /// Stops that the user caused and can fix by changing their input.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AppError::Contacts(_) | AppError::Matching(_) | AppError::Template(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Contacts(err) => write!(f, "error reading CSV: {}", err),
            AppError::Matching(err) => write!(f, "{}", err),
            AppError::Template(err) => write!(f, "template error: {}", err),
            AppError::Output(err) => write!(f, "failed to write output: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Contacts(err) => Some(err),
            AppError::Matching(err) => Some(err),
            AppError::Template(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ContactImportError> for AppError {
    fn from(value: ContactImportError) -> Self {
        Self::Contacts(value)
    }
}

impl From<MatchError> for AppError {
    fn from(value: MatchError) -> Self {
        Self::Matching(value)
    }
}

impl From<TemplateError> for AppError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

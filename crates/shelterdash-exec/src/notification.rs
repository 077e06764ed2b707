//! User-facing notifications attached to a pass result.

use serde::{Deserialize, Serialize};

pub const NO_RESULTS: &str = "No results found!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub text: String,
    pub dismissable: bool,
}

impl Notification {
    pub fn no_results() -> Self {
        Self {
            severity: Severity::Warning,
            text: NO_RESULTS.to_string(),
            dismissable: true,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            severity: Severity::Error,
            text: format!("Error: {message}"),
            dismissable: true,
        }
    }
}

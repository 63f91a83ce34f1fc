use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

use crate::storage::StorageError;

/// Import payload could not be parsed into a JSON object.
pub const STATE_MALFORMED_PAYLOAD: &str = "STATE/MALFORMED_PAYLOAD";
/// The storage slot rejected a write.
pub const STORAGE_UNAVAILABLE: &str = "STORAGE/UNAVAILABLE";
pub const PRESET_UNKNOWN: &str = "PRESET/UNKNOWN";
pub const VALIDATION_WIZARD: &str = "VALIDATION/WIZARD";
/// A hand-written update carries a value the next load would rewrite.
pub const VALIDATION_PATCH: &str = "VALIDATION/PATCH";

/// Error returned by every fallible store operation; serializable so a front
/// end can branch on `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    /// `AREA/KIND`, e.g. `STORAGE/UNAVAILABLE`.
    pub code: String,
    /// Shown to the user as-is.
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<AppError>>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError {
            code: code.into(),
            message: message.into(),
            context: HashMap::new(),
            cause: None,
        }
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        AppError::new(STATE_MALFORMED_PAYLOAD, message)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &HashMap<String, String> {
        &self.context
    }

    pub fn cause(&self) -> Option<&AppError> {
        self.cause.as_deref()
    }

    pub fn is_malformed_payload(&self) -> bool {
        self.code == STATE_MALFORMED_PAYLOAD
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<AppError>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            let mut keys: Vec<_> = self.context.iter().collect();
            keys.sort();
            write!(f, "[{}] {} ({:?})", self.code, self.message, keys)
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<IoError> for AppError {
    fn from(error: IoError) -> Self {
        let code = format!("IO/{:?}", error.kind());
        let mut app_error = AppError::new(code, error.to_string());
        if let Some(os_code) = error.raw_os_error() {
            app_error = app_error.with_context("os_code", os_code.to_string());
        }
        app_error
    }
}

impl From<SerdeJsonError> for AppError {
    fn from(error: SerdeJsonError) -> Self {
        let code = if error.is_data() {
            "JSON/DATA"
        } else if error.is_syntax() {
            "JSON/SYNTAX"
        } else if error.is_eof() {
            "JSON/EOF"
        } else if error.is_io() {
            "JSON/IO"
        } else {
            "JSON/ERROR"
        };

        let mut app_error = AppError::new(code, error.to_string());
        let line = error.line();
        if line > 0 {
            app_error = app_error.with_context("line", line.to_string());
        }
        let column = error.column();
        if column > 0 {
            app_error = app_error.with_context("column", column.to_string());
        }
        app_error
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        let app_error =
            AppError::new(STORAGE_UNAVAILABLE, "Budget data could not be saved.");
        match error {
            StorageError::Io { key, source } => {
                app_error.with_context("key", key).with_cause(source)
            }
            StorageError::Unavailable { key, reason } => app_error
                .with_context("key", key)
                .with_context("reason", reason),
        }
    }
}

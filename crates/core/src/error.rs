use std::{collections::BTreeMap, error::Error as StdError, fmt, panic::Location};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Structured application error crossing the HTTP boundary.
///
/// Carries the client-facing pieces (status code, message) next to the
/// diagnostic pieces (reason, details, call site, wrapped cause). The
/// wrapped cause never appears in the serialized form; it is reachable
/// only through [`std::error::Error::source`].
#[derive(Debug, Serialize)]
pub struct AppError {
    code: u16,
    message: String,
    #[serde(rename = "reason_field", skip_serializing_if = "String::is_empty")]
    reason: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    details: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<ErrorLocation>,
    #[serde(skip)]
    inner: Option<Box<dyn StdError + Send + Sync>>,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_id: Option<String>,
}

/// Call site recorded when an error is constructed with location capture.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
}

impl AppError {
    /// Builds an error with an explicit status code.
    ///
    /// When `capture_location` is set, the construction call site is
    /// recorded for diagnostics.
    #[track_caller]
    pub fn new(
        code: u16,
        message: impl Into<String>,
        reason: impl Into<String>,
        capture_location: bool,
    ) -> Self {
        let caller = Location::caller();
        let location = capture_location.then_some(ErrorLocation {
            file: caller.file(),
            line: caller.line(),
        });

        Self {
            code,
            message: message.into(),
            reason: reason.into(),
            details: BTreeMap::new(),
            location,
            inner: None,
            timestamp: Utc::now(),
            error_id: None,
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(400, message, reason, true)
    }

    #[track_caller]
    pub fn internal_server(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(500, message, reason, true)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message, "unauthorized access attempt", false)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message, "forbidden resource access", false)
    }

    pub fn not_found(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(404, message, reason, false)
    }

    /// Attaches the underlying cause. The cause is kept out of the
    /// serialized form and only surfaces through `source()`.
    pub fn with_inner(mut self, inner: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.inner = Some(inner.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_error_id(mut self, id: impl Into<String>) -> Self {
        self.error_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// HTTP status code to answer with.
    pub fn status_code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn error_id(&self) -> Option<&str> {
        self.error_id.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, message: '{}', reason: '{}'",
            self.code, self.message, self.reason
        )?;
        if let Some(inner) = &self.inner {
            write!(f, ", inner: {inner}")?;
        }
        Ok(())
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .as_ref()
            .map(|err| err.as_ref() as &(dyn StdError + 'static))
    }
}

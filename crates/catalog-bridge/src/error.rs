//! The single failure shape handed to every caller of the catalog service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message used when a failure carries no usable backend message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Status reported when the transport layer cannot determine one.
pub const DEFAULT_STATUS_CODE: u16 = 500;

/// A field-level validation failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldError {
    pub message: String,
    /// Location of the offending field, outermost segment first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// What actually went wrong underneath a normalized failure.
///
/// Kept for callers that need transport-level detail; the normalized fields
/// of [`ApiError`] never depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// No response was received (DNS, refused connection, reset, timeout).
    Transport {
        detail: String,
        timeout: bool,
        connect: bool,
    },
    /// The service answered with a non-2xx status.
    Status {
        status: u16,
        /// Raw response body, if any was read.
        body: Option<String>,
    },
    /// A response arrived but its body could not be decoded.
    Decode { status: u16, detail: String },
}

/// Normalized error produced by the HTTP client boundary.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Backend-supplied message, or [`DEFAULT_ERROR_MESSAGE`].
    pub message: String,
    /// Backend-supplied validation details, order preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Backend-supplied HTTP status, or [`DEFAULT_STATUS_CODE`].
    pub status_code: u16,
    #[serde(skip)]
    pub cause: FailureCause,
}

impl ApiError {
    /// Builds a normalized error from three independently optional inputs,
    /// filling each missing one with its default.
    ///
    /// An empty message and a zero status count as missing.
    pub fn normalize(
        message: Option<String>,
        errors: Option<Vec<FieldError>>,
        status: Option<u16>,
        cause: FailureCause,
    ) -> Self {
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        let status_code = status
            .filter(|status| *status != 0)
            .unwrap_or(DEFAULT_STATUS_CODE);

        Self {
            message,
            errors,
            status_code,
            cause,
        }
    }

    /// Normalizes a failure where no response reached the caller.
    pub fn transport(detail: impl Into<String>, timeout: bool, connect: bool) -> Self {
        Self::normalize(
            None,
            None,
            None,
            FailureCause::Transport {
                detail: detail.into(),
                timeout,
                connect,
            },
        )
    }

    /// Field errors reported by the backend, empty when none were sent.
    pub fn field_errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Message followed by every field error, one per line.
    pub fn describe(&self) -> String {
        let mut out = self.message.clone();
        for error in self.field_errors() {
            out.push_str("\n  - ");
            out.push_str(&error.to_string());
        }
        out
    }
}

//! Error types for Confluence integration.

use std::path::PathBuf;

use serde::Deserialize;

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Confluence answered with a non-success status.
    #[error("Error {status}: {message}")]
    Remote {
        /// Status code reported by Confluence.
        status: u16,
        /// Error message reported by Confluence.
        message: String,
    },

    /// Response was successful but lacked an expected field.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error body returned by the Confluence REST API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    #[serde(default)]
    message: String,
}

impl ConfluenceError {
    /// Build a [`ConfluenceError::Remote`] from a failed response.
    ///
    /// Uses `statusCode` and `message` from the JSON body when present,
    /// otherwise the HTTP status and raw body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::Remote {
                status: parsed.status_code,
                message: parsed.message,
            },
            Err(_) => Self::Remote {
                status,
                message: body.trim().to_owned(),
            },
        }
    }

    /// Status code if this is a remote error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error converting a local file to HTML.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// No converter is registered for the file extension.
    #[error("Extension {extension} of file {} not known", .path.display())]
    UnsupportedFormat {
        /// Extension as found on the file (may be empty).
        extension: String,
        /// File that was being converted.
        path: PathBuf,
    },

    /// I/O error reading the file or spawning the converter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External converter exited unsuccessfully.
    #[error("{program} failed ({status}): {stderr}")]
    Command {
        /// Converter executable.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Converter produced non UTF-8 output.
    #[error("converter output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Error during directory sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote operation failed.
    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    /// File conversion failed.
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// Local directory could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    ReadDir {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Two local sources map to the same page title.
    #[error("title {title} is already used by page {page_id} in this sync")]
    TitleCollision {
        /// Page title shared by the sources.
        title: String,
        /// Page written earlier in the run.
        page_id: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_remote_error_from_json_body() {
        let err = ConfluenceError::from_response(
            400,
            r#"{"statusCode": 400, "message": "Error message"}"#,
        );
        assert_eq!(err.to_string(), "Error 400: Error message");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_remote_error_prefers_body_status_code() {
        let err = ConfluenceError::from_response(
            500,
            r#"{"statusCode": 404, "message": "No content found with id: 1"}"#,
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_remote_error_from_plain_body() {
        let err = ConfluenceError::from_response(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "Error 502: Bad Gateway");
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = ConvertError::UnsupportedFormat {
            extension: ".xyz".to_owned(),
            path: PathBuf::from("/path/to/foo.xyz"),
        };
        assert_eq!(
            err.to_string(),
            "Extension .xyz of file /path/to/foo.xyz not known"
        );
    }
}

use std::fmt;
use std::path::PathBuf;

use reel_core::{GenerationOutcome, UploadOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    UploadFinished(UploadOutcome),
    GenerationFinished(GenerationOutcome),
    /// A scheduled redirect delay has elapsed.
    RedirectDue { target: String },
    DownloadProgress { target: String, bytes: u64 },
    DownloadFinished {
        target: String,
        result: Result<PathBuf, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVideo {
    pub bytes: Vec<u8>,
    /// File name suggested by `Content-Disposition`, if any.
    pub suggested_name: Option<String>,
    pub final_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

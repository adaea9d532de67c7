//! JSON bodies of the upload and generate endpoints.
//!
//! Fields are lenient: missing, `null` and non-string values are tolerated the
//! way the page's script tolerates them, and identifiers may be strings or
//! numbers.

use reel_core::{DocumentId, GenerationOutcome, UploadOutcome, VideoId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{ClientError, FailureKind};

/// Body of `POST /upload`, success or failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadBody {
    #[serde(default, deserialize_with = "loose_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "opaque_id")]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub extracted_text: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub redirect: Option<String>,
}

impl UploadBody {
    pub fn into_outcome(self, status: u16) -> UploadOutcome {
        if is_success(status) {
            UploadOutcome::Accepted {
                message: self.message,
                document_id: self.document_id.map(DocumentId::new),
                extracted_text: self.extracted_text,
            }
        } else {
            UploadOutcome::Rejected {
                status,
                message: self.message,
                redirect: self.redirect,
            }
        }
    }
}

/// Body of `POST /generate-video`, success or failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerationBody {
    #[serde(default, deserialize_with = "loose_text")]
    pub video_path: Option<String>,
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub detail: Option<String>,
}

impl GenerationBody {
    pub fn into_outcome(self, status: u16) -> Result<GenerationOutcome, ClientError> {
        if !is_success(status) {
            return Ok(GenerationOutcome::Rejected {
                status,
                detail: self.detail,
            });
        }
        let id = self.id.ok_or_else(|| {
            ClientError::new(FailureKind::Decode, "generation reply has no video id")
        })?;
        Ok(GenerationOutcome::Generated {
            video_path: self.video_path,
            id: VideoId::new(id),
        })
    }
}

pub(crate) fn parse_body<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ClientError> {
    serde_json::from_slice(bytes).map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        // Structured details (e.g. validation error lists) are shown as JSON text.
        Some(other) => Some(other.to_string()),
    })
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "identifier must be a string or number, got {other}"
        ))),
    }
}

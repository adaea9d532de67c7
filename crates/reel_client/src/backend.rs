use std::path::PathBuf;
use std::time::Duration;

use futures_util::StreamExt;
use reel_core::{DocumentId, GenerationOutcome, SelectedFile, UploadOutcome};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::wire::{parse_body, GenerationBody, UploadBody};
use crate::{ClientError, ClientEvent, DownloadedVideo, FailureKind};

const UPLOAD_PATH: &str = "/upload";
const GENERATE_PATH: &str = "/generate-video";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL every relative route and navigation target resolves against.
    pub base_url: String,
    /// `None` leaves connecting unbounded, like the browser.
    pub connect_timeout: Option<Duration>,
    /// Where downloaded videos are written.
    pub output_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two document endpoints plus the artifact download.
///
/// `Err` means the exchange never produced a usable JSON reply (transport
/// failure or malformed body); HTTP error statuses with a JSON body are
/// reported as `Rejected` outcomes.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadOutcome, ClientError>;

    async fn generate_video(
        &self,
        document_id: &DocumentId,
    ) -> Result<GenerationOutcome, ClientError>;

    async fn download(
        &self,
        target: &str,
        sink: &dyn EventSink,
    ) -> Result<DownloadedVideo, ClientError>;
}

/// Resolves a route or navigation target (absolute or relative) against `base_url`.
pub fn resolve_target(base_url: &str, target: &str) -> Result<Url, ClientError> {
    let base = Url::parse(base_url)
        .map_err(|err| ClientError::new(FailureKind::InvalidUrl, format!("{base_url}: {err}")))?;
    base.join(target)
        .map_err(|err| ClientError::new(FailureKind::InvalidUrl, format!("{target}: {err}")))
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ClientSettings,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))
    }

    async fn post_form(&self, route: &str, form: Form) -> Result<(u16, Vec<u8>), ClientError> {
        let url = resolve_target(&self.settings.base_url, route)?;
        let client = self.build_client()?;
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadOutcome, ClientError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|err| {
                ClientError::new(FailureKind::Network, format!("{content_type}: {err}"))
            })?;
        }
        let form = Form::new().part("file", part);

        let (status, body) = self.post_form(UPLOAD_PATH, form).await?;
        let reply: UploadBody = parse_body(&body)?;
        Ok(reply.into_outcome(status))
    }

    async fn generate_video(
        &self,
        document_id: &DocumentId,
    ) -> Result<GenerationOutcome, ClientError> {
        let form = Form::new().text("document_id", document_id.as_str().to_string());

        let (status, body) = self.post_form(GENERATE_PATH, form).await?;
        let reply: GenerationBody = parse_body(&body)?;
        reply.into_outcome(status)
    }

    async fn download(
        &self,
        target: &str,
        sink: &dyn EventSink,
    ) -> Result<DownloadedVideo, ClientError> {
        let url = resolve_target(&self.settings.base_url, target)?;
        let client = self.build_client()?;
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let suggested_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_file_name);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            bytes.extend_from_slice(&chunk);
            sink.emit(ClientEvent::DownloadProgress {
                target: target.to_string(),
                bytes: bytes.len() as u64,
            });
        }

        Ok(DownloadedVideo {
            bytes,
            suggested_name,
            final_url,
        })
    }
}

/// Extracts `filename` from a `Content-Disposition` value.
fn disposition_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let (key, raw) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| raw.trim().trim_matches('"').to_string())
        })
        .find(|name| !name.is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ClientError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}

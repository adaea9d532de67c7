use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use reel_core::{DocumentId, GenerationOutcome, SelectedFile, UploadOutcome};
use reel_logging::{reel_debug, reel_info, reel_warn};

use crate::backend::{Backend, ChannelEventSink, ClientSettings, EventSink, ReqwestBackend};
use crate::persist::{video_file_name, AtomicFileWriter};
use crate::{ClientError, ClientEvent, FailureKind};

enum ClientCommand {
    Upload(SelectedFile),
    Generate(DocumentId),
    Redirect { target: String, delay: Duration },
    Download { target: String },
}

/// Runs backend requests on a background tokio runtime and reports `ClientEvent`s.
///
/// Commands are fire-and-forget; every command yields exactly one completion
/// event (`DownloadProgress` events may precede a `DownloadFinished`).
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let output_dir = settings.output_dir.clone();
        Self::with_backend(Arc::new(ReqwestBackend::new(settings)), output_dir)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        output_dir: PathBuf,
    ) -> Result<Self, ClientError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let writer = AtomicFileWriter::new(output_dir);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let writer = writer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), &writer, command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn upload(&self, file: SelectedFile) {
        let _ = self.cmd_tx.send(ClientCommand::Upload(file));
    }

    pub fn generate(&self, document_id: DocumentId) {
        let _ = self.cmd_tx.send(ClientCommand::Generate(document_id));
    }

    pub fn schedule_redirect(&self, target: impl Into<String>, delay: Duration) {
        let _ = self.cmd_tx.send(ClientCommand::Redirect {
            target: target.into(),
            delay,
        });
    }

    pub fn download(&self, target: impl Into<String>) {
        let _ = self.cmd_tx.send(ClientCommand::Download {
            target: target.into(),
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Waits `delay`, then reports the redirect as due. Never fires early.
pub async fn redirect_after(delay: Duration, target: String, sink: &dyn EventSink) {
    reel_debug!("redirect to {} scheduled in {:?}", target, delay);
    tokio::time::sleep(delay).await;
    sink.emit(ClientEvent::RedirectDue { target });
}

async fn handle_command(
    backend: &dyn Backend,
    writer: &AtomicFileWriter,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let sink = ChannelEventSink::new(event_tx);
    match command {
        ClientCommand::Upload(file) => {
            reel_info!(
                "upload file_name={} bytes={}",
                file.file_name,
                file.bytes.len()
            );
            let outcome = match backend.upload(&file).await {
                Ok(outcome) => outcome,
                Err(err) => UploadOutcome::NetworkFailure {
                    detail: err.to_string(),
                },
            };
            sink.emit(ClientEvent::UploadFinished(outcome));
        }
        ClientCommand::Generate(document_id) => {
            reel_info!("generate document_id={}", document_id);
            let outcome = match backend.generate_video(&document_id).await {
                Ok(outcome) => outcome,
                Err(err) => GenerationOutcome::Failed {
                    detail: err.to_string(),
                },
            };
            sink.emit(ClientEvent::GenerationFinished(outcome));
        }
        ClientCommand::Redirect { target, delay } => {
            redirect_after(delay, target, &sink).await;
        }
        ClientCommand::Download { target } => {
            let result = download_to_disk(backend, writer, &target, &sink).await;
            if let Err(err) = &result {
                reel_warn!("download of {} failed: {}", target, err);
            }
            sink.emit(ClientEvent::DownloadFinished { target, result });
        }
    }
}

async fn download_to_disk(
    backend: &dyn Backend,
    writer: &AtomicFileWriter,
    target: &str,
    sink: &dyn EventSink,
) -> Result<PathBuf, ClientError> {
    let video = backend.download(target, sink).await?;
    let file_name = video_file_name(&video.final_url, video.suggested_name.as_deref());
    let path = writer
        .write(&file_name, &video.bytes)
        .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;
    reel_info!(
        "saved {} bytes from {} to {:?}",
        video.bytes.len(),
        video.final_url,
        path
    );
    Ok(path)
}

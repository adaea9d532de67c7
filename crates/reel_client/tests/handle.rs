use std::fs;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reel_client::{
    redirect_after, Backend, ChannelEventSink, ClientError, ClientEvent, ClientHandle,
    DownloadedVideo, EventSink, FailureKind,
};
use reel_core::{DocumentId, GenerationOutcome, SelectedFile, UploadOutcome, VideoId};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

struct ScriptedBackend {
    upload: Result<UploadOutcome, ClientError>,
    generation: Result<GenerationOutcome, ClientError>,
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn upload(&self, _file: &SelectedFile) -> Result<UploadOutcome, ClientError> {
        self.upload.clone()
    }

    async fn generate_video(
        &self,
        _document_id: &DocumentId,
    ) -> Result<GenerationOutcome, ClientError> {
        self.generation.clone()
    }

    async fn download(
        &self,
        target: &str,
        sink: &dyn EventSink,
    ) -> Result<DownloadedVideo, ClientError> {
        sink.emit(ClientEvent::DownloadProgress {
            target: target.to_string(),
            bytes: 4,
        });
        Ok(DownloadedVideo {
            bytes: b"mp4!".to_vec(),
            suggested_name: None,
            final_url: format!("http://127.0.0.1:8000{target}"),
        })
    }
}

fn network_error() -> ClientError {
    ClientError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    }
}

fn handle_with(backend: ScriptedBackend, output_dir: &TempDir) -> ClientHandle {
    ClientHandle::with_backend(Arc::new(backend), output_dir.path().to_path_buf()).unwrap()
}

#[test]
fn transport_error_becomes_network_failure_outcome() {
    let dir = TempDir::new().unwrap();
    let handle = handle_with(
        ScriptedBackend {
            upload: Err(network_error()),
            generation: Err(network_error()),
        },
        &dir,
    );

    handle.upload(SelectedFile::new("a.pdf", vec![1, 2, 3]));
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::UploadFinished(UploadOutcome::NetworkFailure {
            detail: "network error: connection refused".to_string(),
        }))
    );

    handle.generate(DocumentId::new("d"));
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::GenerationFinished(GenerationOutcome::Failed {
            detail: "network error: connection refused".to_string(),
        }))
    );
}

#[test]
fn backend_outcomes_pass_through() {
    let dir = TempDir::new().unwrap();
    let generated = GenerationOutcome::Generated {
        video_path: None,
        id: VideoId::new("abc"),
    };
    let handle = handle_with(
        ScriptedBackend {
            upload: Err(network_error()),
            generation: Ok(generated.clone()),
        },
        &dir,
    );

    handle.generate(DocumentId::new("d"));
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::GenerationFinished(generated))
    );
    assert_eq!(handle.try_recv(), None);
}

#[test]
fn download_is_written_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("videos");
    let handle = ClientHandle::with_backend(
        Arc::new(ScriptedBackend {
            upload: Err(network_error()),
            generation: Err(network_error()),
        }),
        output.clone(),
    )
    .unwrap();

    handle.download("/download-video/abc");
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::DownloadProgress {
            target: "/download-video/abc".to_string(),
            bytes: 4,
        })
    );
    let expected = output.join("abc.mp4");
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::DownloadFinished {
            target: "/download-video/abc".to_string(),
            result: Ok(expected.clone()),
        })
    );
    assert_eq!(fs::read(expected).unwrap(), b"mp4!");
}

#[test]
fn scheduled_redirect_is_reported() {
    let dir = TempDir::new().unwrap();
    let handle = handle_with(
        ScriptedBackend {
            upload: Err(network_error()),
            generation: Err(network_error()),
        },
        &dir,
    );

    handle.schedule_redirect("/login", Duration::from_millis(20));
    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(ClientEvent::RedirectDue {
            target: "/login".to_string()
        })
    );
}

#[tokio::test(start_paused = true)]
async fn redirect_fires_after_exactly_two_seconds() {
    let (tx, rx) = mpsc::channel();
    let task = tokio::spawn(async move {
        let sink = ChannelEventSink::new(tx);
        redirect_after(Duration::from_millis(2000), "/login".to_string(), &sink).await;
    });
    // Let the task register its timer at t=0.
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_millis(1999)).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
    assert!(!task.is_finished());

    tokio::time::advance(Duration::from_millis(1)).await;
    task.await.unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        ClientEvent::RedirectDue {
            target: "/login".to_string()
        }
    );
}

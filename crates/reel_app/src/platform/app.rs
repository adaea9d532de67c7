use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use reel_client::ClientHandle;
use reel_core::{update, ControllerState, Msg, PageLayout, SelectedFile, StatusLine, StatusTone};
use reel_logging::{reel_info, reel_warn};

use super::cli::Cli;
use super::config::load_settings;
use super::effects::{EffectRunner, HostSignal, Inbound};
use super::{logging, render};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The user actions a session performs, in order.
#[derive(Debug, Clone, Default)]
pub struct SessionScript {
    pub file: Option<SelectedFile>,
    pub generate: bool,
    pub download: bool,
}

impl SessionScript {
    fn steps(self) -> Vec<Msg> {
        let mut steps = vec![Msg::UploadSubmitted(self.file)];
        if self.generate {
            steps.push(Msg::GenerateClicked);
        }
        if self.download {
            steps.push(Msg::DownloadClicked);
        }
        steps
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub final_status: Option<StatusLine>,
    pub alerts: Vec<String>,
    pub navigated_to: Option<String>,
    pub downloads: Vec<PathBuf>,
    pub download_failed: bool,
}

impl SessionReport {
    pub fn succeeded(&self) -> bool {
        let status_ok = !matches!(
            self.final_status,
            Some(StatusLine {
                tone: StatusTone::Error,
                ..
            })
        );
        status_ok && self.navigated_to.is_none() && !self.download_failed
    }
}

pub fn run_app(cli: Cli) -> anyhow::Result<SessionReport> {
    let settings = load_settings(&cli)?;
    logging::initialize(settings.log_destination, settings.level_filter());
    reel_info!("docreel starting against {}", settings.server_url);

    let file = cli.file.as_deref().map(read_selected_file).transpose()?;
    let script = SessionScript {
        file,
        generate: cli.generate,
        download: cli.download,
    };

    let client = ClientHandle::new(settings.client_settings())
        .context("starting the background client")?;
    let runner = EffectRunner::new(client, settings.server_url.clone());
    let stdout = io::stdout();
    run_session(runner, settings.layout(), script, stdout.lock())
}

fn read_selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let file = SelectedFile::new(file_name, bytes);
    Ok(match mime_guess::from_path(path).first_raw() {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

/// Drives one controller through `script`, rendering every change to `out`.
pub(crate) fn run_session<W: Write>(
    runner: EffectRunner,
    layout: PageLayout,
    script: SessionScript,
    out: W,
) -> anyhow::Result<SessionReport> {
    let mut session = Session {
        state: ControllerState::with_layout(layout),
        layout,
        runner,
        out,
        report: SessionReport::default(),
    };

    for step in script.steps() {
        if session.report.navigated_to.is_some() {
            break;
        }
        session.dispatch(step)?;
        session.drain()?;
    }

    session.report.final_status = session.state.view().status;
    Ok(session.report)
}

struct Session<W: Write> {
    state: ControllerState,
    layout: PageLayout,
    runner: EffectRunner,
    out: W,
    report: SessionReport,
}

impl<W: Write> Session<W> {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            for line in render::render(&state.view(), self.layout) {
                writeln!(self.out, "{line}")?;
            }
        }
        self.state = state;

        for signal in self.runner.enqueue(effects) {
            match signal {
                HostSignal::Alert(message) => {
                    writeln!(self.out, "ALERT: {message}")?;
                    self.report.alerts.push(message);
                }
                HostSignal::NavigatedAway(url) => {
                    writeln!(self.out, "Navigating to {url}")?;
                    self.report.navigated_to = Some(url);
                }
            }
        }
        Ok(())
    }

    /// Applies client results until no request is outstanding or the page navigated away.
    fn drain(&mut self) -> anyhow::Result<()> {
        while self.runner.pending() > 0 && self.report.navigated_to.is_none() {
            match self.runner.poll(POLL_INTERVAL) {
                Some(Inbound::Msg(msg)) => self.dispatch(msg)?,
                Some(Inbound::Downloaded { target, result }) => match result {
                    Ok(path) => {
                        writeln!(self.out, "Saved {target} to {}", path.display())?;
                        self.report.downloads.push(path);
                    }
                    Err(err) => {
                        reel_warn!("download of {} failed: {}", target, err);
                        writeln!(self.out, "Download failed: {err}")?;
                        self.report.download_failed = true;
                    }
                },
                None => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reel_client::{Backend, ClientError, DownloadedVideo, EventSink};
    use reel_core::{DocumentId, GenerationOutcome, UploadOutcome, VideoId};
    use tempfile::TempDir;

    use super::*;

    struct FakeBackend {
        upload: UploadOutcome,
        generation: GenerationOutcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Backend for FakeBackend {
        async fn upload(&self, _file: &SelectedFile) -> Result<UploadOutcome, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.upload.clone())
        }

        async fn generate_video(
            &self,
            _document_id: &DocumentId,
        ) -> Result<GenerationOutcome, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.generation.clone())
        }

        async fn download(
            &self,
            target: &str,
            _sink: &dyn EventSink,
        ) -> Result<DownloadedVideo, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DownloadedVideo {
                bytes: b"video".to_vec(),
                suggested_name: None,
                final_url: format!("http://127.0.0.1:8000{target}"),
            })
        }
    }

    fn accepted() -> UploadOutcome {
        UploadOutcome::Accepted {
            message: None,
            document_id: Some(DocumentId::new("doc-1")),
            extracted_text: Some("Intro to Rust".to_string()),
        }
    }

    fn generated() -> GenerationOutcome {
        GenerationOutcome::Generated {
            video_path: None,
            id: VideoId::new("abc"),
        }
    }

    fn run(
        upload: UploadOutcome,
        script: SessionScript,
        dir: &TempDir,
    ) -> (SessionReport, String, usize) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FakeBackend {
            upload,
            generation: generated(),
            calls: calls.clone(),
        };
        let client =
            ClientHandle::with_backend(Arc::new(backend), dir.path().to_path_buf()).unwrap();
        let runner = EffectRunner::new(client, "http://127.0.0.1:8000");
        let mut out = Vec::new();
        let report = run_session(runner, PageLayout::full(), script, &mut out).unwrap();
        (
            report,
            String::from_utf8(out).unwrap(),
            calls.load(Ordering::SeqCst),
        )
    }

    fn file() -> Option<SelectedFile> {
        Some(SelectedFile::new("intro.txt", b"Intro to Rust".to_vec()))
    }

    #[test]
    fn empty_form_makes_no_request() {
        let dir = TempDir::new().unwrap();
        let (report, out, calls) = run(
            accepted(),
            SessionScript {
                file: None,
                generate: true,
                download: false,
            },
            &dir,
        );

        assert_eq!(calls, 0);
        assert!(out.contains("#status [error]: Please select a file to upload"));
        assert_eq!(report.alerts, vec!["Please upload a file first".to_string()]);
        assert!(!report.succeeded());
    }

    #[test]
    fn full_session_uploads_generates_and_downloads() {
        let dir = TempDir::new().unwrap();
        let (report, out, calls) = run(
            accepted(),
            SessionScript {
                file: file(),
                generate: true,
                download: true,
            },
            &dir,
        );

        assert_eq!(calls, 3);
        assert!(out.contains("#status [ok]: Upload successful!"));
        assert!(out.contains("  | Intro to Rust"));
        assert!(out.contains("#generated-video-src: /download-video/abc"));
        assert_eq!(report.downloads, vec![dir.path().join("abc.mp4")]);
        assert_eq!(fs::read(dir.path().join("abc.mp4")).unwrap(), b"video");
        assert!(report.succeeded());
    }

    #[test]
    fn rejected_upload_redirects_after_delay() {
        let dir = TempDir::new().unwrap();
        let (report, out, calls) = run(
            UploadOutcome::Rejected {
                status: 401,
                message: Some("Session expired".to_string()),
                redirect: Some("/login".to_string()),
            },
            SessionScript {
                file: file(),
                generate: true,
                download: false,
            },
            &dir,
        );

        // Generation is never attempted once the page has navigated away.
        assert_eq!(calls, 1);
        assert!(out.contains("#status [error]: Session expired"));
        assert_eq!(
            report.navigated_to.as_deref(),
            Some("http://127.0.0.1:8000/login")
        );
        assert!(report.alerts.is_empty());
    }
}

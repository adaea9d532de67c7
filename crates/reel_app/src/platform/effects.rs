use std::path::PathBuf;
use std::time::Duration;

use reel_client::{resolve_target, ClientError, ClientEvent, ClientHandle};
use reel_core::{Effect, Msg, DOWNLOAD_ROUTE_PREFIX};
use reel_logging::{reel_debug, reel_error, reel_info};

/// Something the session loop must surface right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    Alert(String),
    /// The page navigated somewhere other than a video download.
    NavigatedAway(String),
}

/// Client results, translated for the session loop.
#[derive(Debug)]
pub enum Inbound {
    Msg(Msg),
    Downloaded {
        target: String,
        result: Result<PathBuf, ClientError>,
    },
}

pub struct EffectRunner {
    client: ClientHandle,
    base_url: String,
    pending: usize,
}

impl EffectRunner {
    pub fn new(client: ClientHandle, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            pending: 0,
        }
    }

    /// Requests issued whose completion has not been polled yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<HostSignal> {
        let mut signals = Vec::new();
        for effect in effects {
            match effect {
                Effect::SendUpload { file } => {
                    self.pending += 1;
                    self.client.upload(file);
                }
                Effect::SendGeneration { document_id } => {
                    self.pending += 1;
                    self.client.generate(document_id);
                }
                Effect::ScheduleRedirect { target, delay } => {
                    self.pending += 1;
                    self.client.schedule_redirect(target, delay);
                }
                Effect::Navigate { target } => {
                    if target.starts_with(DOWNLOAD_ROUTE_PREFIX) {
                        self.pending += 1;
                        self.client.download(target);
                    } else {
                        signals.push(HostSignal::NavigatedAway(self.absolute(&target)));
                    }
                }
                Effect::ReloadVideo { src } => {
                    reel_info!("video source set to {}", self.absolute(&src));
                }
                Effect::Alert { message } => signals.push(HostSignal::Alert(message)),
                Effect::LogError { operation, detail } => {
                    reel_error!("{}: {}", operation.label(), detail);
                }
            }
        }
        signals
    }

    /// Waits up to `timeout` for the next client result.
    pub fn poll(&mut self, timeout: Duration) -> Option<Inbound> {
        let event = self.client.recv_timeout(timeout)?;
        let inbound = match event {
            ClientEvent::UploadFinished(outcome) => Inbound::Msg(Msg::UploadFinished(outcome)),
            ClientEvent::GenerationFinished(outcome) => {
                Inbound::Msg(Msg::GenerationFinished(outcome))
            }
            ClientEvent::RedirectDue { target } => Inbound::Msg(Msg::RedirectElapsed { target }),
            ClientEvent::DownloadProgress { target, bytes } => {
                reel_debug!("download {} received {} bytes", target, bytes);
                return None;
            }
            ClientEvent::DownloadFinished { target, result } => {
                Inbound::Downloaded { target, result }
            }
        };
        self.pending = self.pending.saturating_sub(1);
        Some(inbound)
    }

    fn absolute(&self, target: &str) -> String {
        resolve_target(&self.base_url, target)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| target.to_string())
    }
}

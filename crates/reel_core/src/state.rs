use std::time::Duration;

use crate::view_model::{Activity, ControllerView, StatusLine, StatusTone};
use crate::{DocumentId, VideoId};

/// Delay before following a redirect carried by a rejected upload.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(2000);

pub const DOWNLOAD_ROUTE_PREFIX: &str = "/download-video/";

pub fn download_target(id: &VideoId) -> String {
    format!("{DOWNLOAD_ROUTE_PREFIX}{id}")
}

/// Optional elements present on the bound page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub generate_button: bool,
    pub video_player: bool,
    pub download_button: bool,
}

impl PageLayout {
    pub fn full() -> Self {
        Self {
            generate_button: true,
            video_player: true,
            download_button: true,
        }
    }

    /// The page variant that only wires the upload form.
    pub fn upload_only() -> Self {
        Self {
            generate_button: false,
            video_player: false,
            download_button: false,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    layout: PageLayout,
    document_id: Option<DocumentId>,
    uploads_in_flight: usize,
    generating: bool,
    status: Option<StatusLine>,
    extracted_text: String,
    generate_enabled: bool,
    video_src: Option<String>,
    download_target: Option<String>,
    dirty: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PageLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn activity(&self) -> Activity {
        if self.generating {
            Activity::Generating
        } else if self.uploads_in_flight > 0 {
            Activity::Uploading
        } else {
            Activity::Idle
        }
    }

    pub fn view(&self) -> ControllerView {
        ControllerView {
            activity: self.activity(),
            has_document: self.document_id.is_some(),
            status: self.status.clone(),
            extracted_text: self.extracted_text.clone(),
            generate_enabled: self.layout.generate_button && self.generate_enabled,
            video_src: self.video_src.clone(),
            download_enabled: self.download_target.is_some(),
            download_target: self.download_target.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = Some(StatusLine {
            text: text.into(),
            tone,
        });
        self.dirty = true;
    }

    pub(crate) fn begin_upload(&mut self) {
        self.uploads_in_flight += 1;
        self.dirty = true;
    }

    pub(crate) fn finish_upload(&mut self) {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
        self.dirty = true;
    }

    pub(crate) fn store_document(&mut self, document_id: Option<DocumentId>) {
        self.document_id = document_id;
    }

    pub(crate) fn set_extracted_text(&mut self, text: String) {
        self.extracted_text = text;
        self.dirty = true;
    }

    pub(crate) fn set_generate_enabled(&mut self, enabled: bool) {
        self.generate_enabled = enabled;
        self.dirty = true;
    }

    pub(crate) fn begin_generation(&mut self) {
        self.generating = true;
        self.generate_enabled = false;
        self.dirty = true;
    }

    pub(crate) fn finish_generation(&mut self) {
        self.generating = false;
        self.generate_enabled = true;
        self.dirty = true;
    }

    pub(crate) fn set_video_src(&mut self, src: String) {
        self.video_src = Some(src);
        self.dirty = true;
    }

    pub(crate) fn enable_download(&mut self, target: String) {
        self.download_target = Some(target);
        self.dirty = true;
    }

    pub(crate) fn download_target(&self) -> Option<&str> {
        self.download_target.as_deref()
    }
}

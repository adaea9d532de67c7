use std::time::Duration;

use crate::{DocumentId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Multipart `POST /upload` with the `file` field.
    SendUpload { file: SelectedFile },
    /// Multipart `POST /generate-video` with the `document_id` field.
    SendGeneration { document_id: DocumentId },
    /// Navigate to `target` once `delay` has elapsed, not before.
    ScheduleRedirect { target: String, delay: Duration },
    Navigate { target: String },
    /// Point the video element at `src` and reload it.
    ReloadVideo { src: String },
    /// Blocking alert; the host must surface it before accepting more input.
    Alert { message: String },
    LogError { operation: Operation, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Generation,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Upload => "Upload error",
            Operation::Generation => "Generation error",
        }
    }
}

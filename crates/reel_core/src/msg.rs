#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the upload form; `None` when no file was selected.
    UploadSubmitted(Option<crate::SelectedFile>),
    /// The upload request finished (or failed to).
    UploadFinished(crate::UploadOutcome),
    /// User edited the extracted text area.
    ExtractedTextEdited(String),
    /// User clicked the generate button.
    GenerateClicked,
    /// The generation request finished (or failed to).
    GenerationFinished(crate::GenerationOutcome),
    /// User clicked the download button.
    DownloadClicked,
    /// A scheduled redirect delay elapsed.
    RedirectElapsed { target: String },
    /// Fallback for placeholder wiring.
    NoOp,
}

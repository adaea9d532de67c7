#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Uploading,
    Generating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerView {
    pub activity: Activity,
    pub has_document: bool,
    pub status: Option<StatusLine>,
    pub extracted_text: String,
    pub generate_enabled: bool,
    pub video_src: Option<String>,
    pub download_enabled: bool,
    pub download_target: Option<String>,
    pub dirty: bool,
}

//! Element ids of the upload page the controller binds to.

pub const UPLOAD_FORM: &str = "upload-form";
pub const FILE_INPUT: &str = "uploadedFile";
pub const STATUS: &str = "status";
pub const EXTRACTED_TEXT: &str = "extracted-text";
pub const GENERATE_BUTTON: &str = "generate-btn";
pub const VIDEO: &str = "generated-video";
pub const VIDEO_SOURCE: &str = "generated-video-src";
pub const DOWNLOAD_BUTTON: &str = "download-btn";

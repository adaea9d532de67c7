use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Upload a document, then optionally generate and download a video from it.
#[derive(Parser, Debug, Default)]
#[command(name = "docreel", version)]
pub struct Cli {
    /// Settings file; defaults to ./docreel.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Backend base URL.
    #[arg(long)]
    pub server: Option<String>,
    /// Directory downloaded videos are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long, value_enum)]
    pub log_destination: Option<LogDestination>,
    /// Use the page variant without generate, video and download elements.
    #[arg(long)]
    pub upload_only: bool,
    /// Document to upload. Omit it to submit the form with no file.
    pub file: Option<PathBuf>,
    /// Click generate once the upload has finished.
    #[arg(long)]
    pub generate: bool,
    /// Click download once the video has been generated.
    #[arg(long, requires = "generate")]
    pub download: bool,
}

//! docreel client: talks to the document/video backend and runs controller effects off-thread.
mod backend;
mod handle;
mod persist;
mod types;
mod wire;

pub use backend::{
    resolve_target, Backend, ChannelEventSink, ClientSettings, EventSink, ReqwestBackend,
};
pub use handle::{redirect_after, ClientHandle};
pub use persist::{ensure_output_dir, video_file_name, AtomicFileWriter, PersistError};
pub use types::{ClientError, ClientEvent, DownloadedVideo, FailureKind};
pub use wire::{GenerationBody, UploadBody};

//! docreel core: pure upload/generate controller and view-model helpers.
mod effect;
pub mod element_ids;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Operation};
pub use msg::Msg;
pub use outcome::{DocumentId, GenerationOutcome, SelectedFile, UploadOutcome, VideoId};
pub use state::{download_target, ControllerState, PageLayout, DOWNLOAD_ROUTE_PREFIX, REDIRECT_DELAY};
pub use update::update;
pub use view_model::{Activity, ControllerView, StatusLine, StatusTone};

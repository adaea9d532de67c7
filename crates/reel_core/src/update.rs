use crate::view_model::StatusTone;
use crate::{
    download_target, ControllerState, Effect, GenerationOutcome, Msg, Operation, UploadOutcome,
    REDIRECT_DELAY,
};

const SELECT_FILE: &str = "Please select a file to upload";
const UPLOADING: &str = "Uploading file...";
const UPLOAD_SUCCEEDED: &str = "Upload successful!";
const UPLOAD_FAILED: &str = "Upload failed";
const NETWORK_ERROR: &str = "Network error. Please try again.";
const UPLOAD_FIRST: &str = "Please upload a file first";
const GENERATING: &str = "Generating video... This may take a few minutes.";
const GENERATION_SUCCEEDED: &str = "Video generated successfully!";
const GENERATION_FAILED: &str = "Video generation failed";
const GENERATION_ERROR: &str = "Error generating video";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ControllerState, msg: Msg) -> (ControllerState, Vec<Effect>) {
    let effects = match msg {
        Msg::UploadSubmitted(None) => {
            state.set_status(SELECT_FILE, StatusTone::Error);
            Vec::new()
        }
        Msg::UploadSubmitted(Some(file)) => {
            // No in-flight guard: the form may be submitted again while a request runs.
            state.begin_upload();
            state.set_status(UPLOADING, StatusTone::Info);
            vec![Effect::SendUpload { file }]
        }
        Msg::UploadFinished(outcome) => {
            state.finish_upload();
            apply_upload_outcome(&mut state, outcome)
        }
        Msg::ExtractedTextEdited(text) => {
            state.set_extracted_text(text);
            Vec::new()
        }
        Msg::GenerateClicked => {
            if !state.layout().generate_button || state.is_generating() {
                return (state, Vec::new());
            }
            match state.document_id().cloned() {
                None => vec![Effect::Alert {
                    message: UPLOAD_FIRST.to_string(),
                }],
                Some(document_id) => {
                    state.begin_generation();
                    state.set_status(GENERATING, StatusTone::Info);
                    vec![Effect::SendGeneration { document_id }]
                }
            }
        }
        Msg::GenerationFinished(outcome) => {
            let effects = apply_generation_outcome(&mut state, outcome);
            state.finish_generation();
            effects
        }
        Msg::DownloadClicked => match state.download_target() {
            Some(target) => vec![Effect::Navigate {
                target: target.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::RedirectElapsed { target } => vec![Effect::Navigate { target }],
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_upload_outcome(state: &mut ControllerState, outcome: UploadOutcome) -> Vec<Effect> {
    match outcome {
        UploadOutcome::Accepted {
            message,
            document_id,
            extracted_text,
        } => {
            let text = non_empty(message).unwrap_or_else(|| UPLOAD_SUCCEEDED.to_string());
            state.set_status(text, StatusTone::Success);
            state.store_document(document_id);
            if let Some(extracted) = non_empty(extracted_text) {
                state.set_extracted_text(extracted);
                if state.layout().generate_button {
                    state.set_generate_enabled(true);
                }
            }
            Vec::new()
        }
        UploadOutcome::Rejected {
            message, redirect, ..
        } => {
            let text = non_empty(message).unwrap_or_else(|| UPLOAD_FAILED.to_string());
            state.set_status(text, StatusTone::Error);
            match non_empty(redirect) {
                Some(target) => vec![Effect::ScheduleRedirect {
                    target,
                    delay: REDIRECT_DELAY,
                }],
                None => Vec::new(),
            }
        }
        UploadOutcome::NetworkFailure { detail } => {
            state.set_status(NETWORK_ERROR, StatusTone::Error);
            vec![Effect::LogError {
                operation: Operation::Upload,
                detail,
            }]
        }
    }
}

fn apply_generation_outcome(
    state: &mut ControllerState,
    outcome: GenerationOutcome,
) -> Vec<Effect> {
    match outcome {
        GenerationOutcome::Generated { video_path, id } => {
            state.set_status(GENERATION_SUCCEEDED, StatusTone::Success);
            let target = download_target(&id);
            let layout = state.layout();
            let mut effects = Vec::new();
            if layout.video_player {
                let src = non_empty(video_path).unwrap_or_else(|| target.clone());
                state.set_video_src(src.clone());
                effects.push(Effect::ReloadVideo { src });
            }
            if layout.download_button {
                state.enable_download(target);
            }
            effects
        }
        GenerationOutcome::Rejected { detail, .. } => {
            let text = non_empty(detail).unwrap_or_else(|| GENERATION_FAILED.to_string());
            state.set_status(text, StatusTone::Error);
            Vec::new()
        }
        GenerationOutcome::Failed { detail } => {
            state.set_status(GENERATION_ERROR, StatusTone::Error);
            vec![Effect::LogError {
                operation: Operation::Generation,
                detail,
            }]
        }
    }
}

/// Empty strings count as absent, the way the page treats falsy fields.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

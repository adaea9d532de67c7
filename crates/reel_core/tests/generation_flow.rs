use std::sync::Once;

use reel_core::{
    download_target, update, Activity, ControllerState, DocumentId, Effect, GenerationOutcome,
    Msg, Operation, PageLayout, SelectedFile, StatusTone, UploadOutcome, VideoId,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reel_logging::initialize_for_tests);
}

fn uploaded(layout: PageLayout) -> ControllerState {
    let state = ControllerState::with_layout(layout);
    let (state, _) = update(
        state,
        Msg::UploadSubmitted(Some(SelectedFile::new("notes.txt", b"notes".to_vec()))),
    );
    let (state, _) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted {
            message: None,
            document_id: Some(DocumentId::new("42")),
            extracted_text: Some("notes".to_string()),
        }),
    );
    state
}

fn generating() -> ControllerState {
    let (state, effects) = update(uploaded(PageLayout::full()), Msg::GenerateClicked);
    assert_eq!(effects.len(), 1);
    state
}

#[test]
fn generate_without_upload_alerts_and_sends_nothing() {
    init_logging();
    let state = ControllerState::new();
    let (next, effects) = update(state.clone(), Msg::GenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::Alert {
            message: "Please upload a file first".to_string()
        }]
    );
    assert_eq!(next, state);
}

#[test]
fn generate_without_document_id_in_reply_alerts() {
    init_logging();
    let (state, _) = update(
        ControllerState::new(),
        Msg::UploadFinished(UploadOutcome::Accepted {
            message: None,
            document_id: None,
            extracted_text: Some("text".to_string()),
        }),
    );
    assert!(state.view().generate_enabled);

    let (_state, effects) = update(state, Msg::GenerateClicked);
    assert!(matches!(effects.as_slice(), [Effect::Alert { .. }]));
}

#[test]
fn generate_disables_button_and_sends_document_id() {
    init_logging();
    let (state, effects) = update(uploaded(PageLayout::full()), Msg::GenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::SendGeneration {
            document_id: DocumentId::new("42")
        }]
    );
    let view = state.view();
    assert!(!view.generate_enabled);
    assert_eq!(view.activity, Activity::Generating);
    let status = view.status.unwrap();
    assert_eq!(
        status.text,
        "Generating video... This may take a few minutes."
    );
    assert_eq!(status.tone, StatusTone::Info);
}

#[test]
fn second_click_while_generating_is_ignored() {
    init_logging();
    let state = generating();
    let (next, effects) = update(state.clone(), Msg::GenerateClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn generated_without_video_path_uses_download_route() {
    init_logging();
    let (state, effects) = update(
        generating(),
        Msg::GenerationFinished(GenerationOutcome::Generated {
            video_path: None,
            id: VideoId::new("abc"),
        }),
    );

    assert_eq!(
        effects,
        vec![Effect::ReloadVideo {
            src: "/download-video/abc".to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.video_src.as_deref(), Some("/download-video/abc"));
    assert!(view.download_enabled);
    assert!(view.generate_enabled);
    assert_eq!(view.activity, Activity::Idle);
    assert_eq!(view.status.unwrap().text, "Video generated successfully!");
}

#[test]
fn generated_with_video_path_prefers_server_path_but_downloads_by_id() {
    init_logging();
    let (state, effects) = update(
        generating(),
        Msg::GenerationFinished(GenerationOutcome::Generated {
            video_path: Some("/media/lecture_generated_video.mp4".to_string()),
            id: VideoId::new("9"),
        }),
    );

    assert_eq!(
        effects,
        vec![Effect::ReloadVideo {
            src: "/media/lecture_generated_video.mp4".to_string()
        }]
    );

    let (_state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::Navigate {
            target: download_target(&VideoId::new("9"))
        }]
    );
}

#[test]
fn rejected_generation_shows_detail_and_reenables() {
    init_logging();
    let (state, effects) = update(
        generating(),
        Msg::GenerationFinished(GenerationOutcome::Rejected {
            status: 404,
            detail: Some("Document not found".to_string()),
        }),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.generate_enabled);
    assert!(!view.download_enabled);
    assert_eq!(view.video_src, None);
    let status = view.status.unwrap();
    assert_eq!(status.text, "Document not found");
    assert_eq!(status.tone, StatusTone::Error);

    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, _) = update(
        state,
        Msg::GenerationFinished(GenerationOutcome::Rejected {
            status: 500,
            detail: None,
        }),
    );
    assert_eq!(state.view().status.unwrap().text, "Video generation failed");
}

#[test]
fn failed_generation_logs_and_reenables() {
    init_logging();
    let (state, effects) = update(
        generating(),
        Msg::GenerationFinished(GenerationOutcome::Failed {
            detail: "body was not JSON".to_string(),
        }),
    );

    assert_eq!(
        effects,
        vec![Effect::LogError {
            operation: Operation::Generation,
            detail: "body was not JSON".to_string(),
        }]
    );
    assert!(state.view().generate_enabled);
    assert!(!state.is_generating());
    assert_eq!(state.view().status.unwrap().text, "Error generating video");
}

#[test]
fn download_before_generation_is_ignored() {
    init_logging();
    let (_state, effects) = update(uploaded(PageLayout::full()), Msg::DownloadClicked);
    assert!(effects.is_empty());
}

#[test]
fn layout_without_player_or_download_skips_those_updates() {
    init_logging();
    let layout = PageLayout {
        generate_button: true,
        video_player: false,
        download_button: false,
    };
    let (state, _) = update(uploaded(layout), Msg::GenerateClicked);
    let (state, effects) = update(
        state,
        Msg::GenerationFinished(GenerationOutcome::Generated {
            video_path: None,
            id: VideoId::new("abc"),
        }),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.video_src, None);
    assert!(!view.download_enabled);
    assert!(view.generate_enabled);
}

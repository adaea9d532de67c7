use reel_core::element_ids::{
    DOWNLOAD_BUTTON, EXTRACTED_TEXT, GENERATE_BUTTON, STATUS, VIDEO_SOURCE,
};
use reel_core::{Activity, ControllerView, PageLayout, StatusTone};

/// Renders the view as `#element-id: value` lines, one element per line.
pub fn render(view: &ControllerView, layout: PageLayout) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(status) = &view.status {
        let tone = match status.tone {
            StatusTone::Info => "info",
            StatusTone::Success => "ok",
            StatusTone::Error => "error",
        };
        lines.push(format!("#{STATUS} [{tone}]: {}", status.text));
    }

    if !view.extracted_text.is_empty() {
        lines.push(format!(
            "#{EXTRACTED_TEXT}: {} chars",
            view.extracted_text.chars().count()
        ));
        lines.extend(view.extracted_text.lines().map(|line| format!("  | {line}")));
    }

    if layout.generate_button {
        let label = match (view.activity, view.generate_enabled) {
            (Activity::Generating, _) => "disabled (generating)",
            (_, true) => "enabled",
            (_, false) => "disabled",
        };
        lines.push(format!("#{GENERATE_BUTTON}: {label}"));
    }

    if layout.video_player {
        if let Some(src) = &view.video_src {
            lines.push(format!("#{VIDEO_SOURCE}: {src}"));
        }
    }

    if layout.download_button && view.download_enabled {
        let target = view.download_target.as_deref().unwrap_or_default();
        lines.push(format!("#{DOWNLOAD_BUTTON}: enabled -> {target}"));
    }

    lines
}

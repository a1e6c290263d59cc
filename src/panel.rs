use crate::api::PanelClient;
use crate::feedback::{Feedback, ToastLevel};
use crate::state::AppState;
use crate::video::VideoFilterConfig;

/// The control panel: API client, application state and the feedback sink.
///
/// Handlers live in `connection`, `browser`, `submit` and `dashboard`. None of
/// them return errors; failures end up as toasts and leave state untouched.
pub struct Panel {
    pub(crate) client: PanelClient,
    pub(crate) state: AppState,
    pub(crate) feedback: Box<dyn Feedback>,
}

impl Panel {
    pub fn new(client: PanelClient, filter: VideoFilterConfig, feedback: Box<dyn Feedback>) -> Self {
        Self {
            client,
            state: AppState::new(filter),
            feedback,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub(crate) fn toast(&self, level: ToastLevel, message: impl AsRef<str>) {
        self.feedback.toast(level, message.as_ref());
    }

    pub fn set_video_filter(&mut self, enabled: bool) {
        self.state.filter.enabled = enabled;
    }

    /// Clamps to the allowed range and warns when the input was out of it.
    pub fn set_min_size_mb(&mut self, requested: i64) {
        let clamp = self.state.filter.set_min_size_mb(requested);
        if let Some(warning) = clamp.warning() {
            self.toast(ToastLevel::Warning, warning);
        }
    }

    pub fn toggle_selection(&mut self, path: &str, checked: bool) {
        self.state.toggle_selection(path, checked);
    }

    pub fn select_all(&mut self, checked: bool) {
        self.state.select_all(checked);
    }
}

pub(crate) fn reply_message(message: Option<String>, fallback: &str) -> String {
    match message {
        Some(m) if !m.trim().is_empty() => m,
        _ => fallback.to_string(),
    }
}

pub(crate) fn error_chain(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}

use crate::error::AppError;

/// Tracks whether the submit affordance is enabled for the current input.
///
/// Submission is enabled iff the trimmed input is non-empty; an activation
/// while disabled yields nothing, so gated-out input never reaches the
/// pipeline.
#[derive(Debug, Default)]
pub struct InputGate {
    value: String,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current input value, recomputing enablement
    pub fn on_input(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn is_enabled(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Returns the trimmed title when the gate is enabled
    pub fn try_submit(&self) -> Option<String> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Observer for session lifecycle and terminal states.
///
/// The session guarantees `loading_finished` is called exactly once for
/// every `loading_started`, on every terminal path.
pub trait SessionView: Send + Sync {
    fn loading_started(&self);
    fn loading_finished(&self);

    /// The rendered fragment replaces the results region; the input is
    /// considered cleared and the viewport reset.
    fn show_results(&self, html: &str);

    /// Zero search results or the backend sentinel
    fn show_not_found(&self);

    fn show_error(&self, error: &AppError);
}

/// Console rendering of view transitions for the interactive binary
pub struct ConsoleView;

impl SessionView for ConsoleView {
    fn loading_started(&self) {
        eprintln!("Searching...");
    }

    fn loading_finished(&self) {}

    fn show_results(&self, html: &str) {
        println!("{}", html);
    }

    fn show_not_found(&self) {
        eprintln!("Sorry! That movie is not in the database. Check the spelling or try another title.");
    }

    fn show_error(&self, error: &AppError) {
        eprintln!("Request failed: {}", error);
    }
}

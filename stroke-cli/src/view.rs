//! 终端视图

use stroke_workflow::{PredictionState, ViewListener};
use tracing::debug;

/// 把生命周期状态渲染到终端
#[derive(Debug, Default)]
pub struct TerminalView {
    quiet: bool,
}

impl TerminalView {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ViewListener for TerminalView {
    fn on_state_change(&mut self, state: &PredictionState) {
        match state {
            PredictionState::Collecting => {
                if !self.quiet {
                    println!("Please fill out the form to get your prediction.");
                }
            }
            PredictionState::Submitting { submission_id } => {
                debug!("Submission {} in flight", submission_id);
                if !self.quiet {
                    println!("Please wait while we process your data...");
                }
            }
            PredictionState::Resolved(outcome) => {
                debug!("Submission {} resolved, ok={}", outcome.submission_id(), outcome.is_ok());
            }
        }
    }

    fn scroll_to_top(&mut self) {
        debug!("View scrolled to top");
    }
}

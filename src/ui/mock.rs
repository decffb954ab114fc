//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use envready::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.message("[PASS] compiler-toolchain");
//! ui.error("Invalid configuration: timeouts.probe_secs must be greater than 0");
//!
//! // Assert on captured interactions
//! assert!(ui.messages().contains(&"[PASS] compiler-toolchain".to_string()));
//! assert_eq!(ui.errors().len(), 1);
//! ```

use super::{NoopSpinner, OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    errors: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured hints.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Get the messages every spinner was started with.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// All captured text, in capture order per channel.
    pub fn all_output(&self) -> String {
        self.messages
            .iter()
            .chain(&self.errors)
            .chain(&self.hints)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(NoopSpinner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_each_channel() {
        let mut ui = MockUI::new();
        ui.message("msg");
        ui.error("bad");
        ui.show_hint("try --fix");

        assert_eq!(ui.messages(), &["msg".to_string()]);
        assert_eq!(ui.errors(), &["bad".to_string()]);
        assert_eq!(ui.hints(), &["try --fix".to_string()]);
        assert_eq!(ui.all_output(), "msg\nbad\ntry --fix");
    }

    #[test]
    fn records_spinner_starts() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Checking sdk...");
        spinner.finish_warning("sdk");
        assert_eq!(ui.spinners(), &["Checking sdk...".to_string()]);
    }

    #[test]
    fn with_mode_sets_mode() {
        let ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}

//! Presentation layer seam
//!
//! A [`Frontend`] supplies paths, field values and user actions to a
//! [`Session`](crate::session::Session), and receives its notifications. Every
//! call is synchronous. [`ConsoleFrontend`] is the terminal implementation.

mod console;

use std::path::PathBuf;

pub use console::ConsoleFrontend;

use crate::session::RunOutcome;
use crate::template::TemplateDefinition;

/// What the operator asked for next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectDocument,
    LoadTemplate,
    ChooseTemplate,
    Run,
    Quit,
}

pub trait Frontend {
    /// Ask for the acquisition sequence to relabel; `None` when cancelled
    fn select_document(&mut self) -> Option<PathBuf>;

    /// Ask for a template declaration file; `None` when cancelled
    fn select_template_file(&mut self) -> Option<PathBuf>;

    /// Ask which template to use. `current` is preselected.
    fn choose_template(&mut self, names: &[String], current: &str) -> Option<String>;

    /// Collect one value per field of `template`, in order
    fn collect_field_values(&mut self, template: &TemplateDefinition) -> Vec<String>;

    /// Next action; `None` ends the session
    fn next_action(&mut self) -> Option<Action>;

    fn notify_error(&mut self, message: &str);

    fn notify_success(&mut self, outcome: &RunOutcome);
}

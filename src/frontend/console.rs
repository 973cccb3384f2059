//! Line-oriented terminal frontend

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;

use super::{Action, Frontend};
use crate::session::RunOutcome;
use crate::template::TemplateDefinition;

const MENU: &str = "\
[d] select .mis sequence   [l] load template file   [t] choose template
[r] run formatter          [q] quit";

/// Prompts on a reader/writer pair, typically stdin and stdout
pub struct ConsoleFrontend<R, W> {
    input: R,
    output: W,
}

impl ConsoleFrontend<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what was shown
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `message` and read one line without its line ending.
    /// Returns `None` at end of input.
    pub fn prompt(&mut self, message: &str) -> Option<String> {
        // A broken terminal shows up as end of input on the next read.
        let _ = write!(self.output, "{}", message);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn prompt_path(&mut self, message: &str) -> Option<PathBuf> {
        let answer = self.prompt(message)?;
        let answer = answer.trim();
        if answer.is_empty() {
            None
        } else {
            Some(PathBuf::from(answer))
        }
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}

impl<R: BufRead, W: Write> Frontend for ConsoleFrontend<R, W> {
    fn select_document(&mut self) -> Option<PathBuf> {
        let path = self.prompt_path("Select flexImaging .mis sequence: ")?;
        self.say(&format!("Selected {}", path.display()));
        Some(path)
    }

    fn select_template_file(&mut self) -> Option<PathBuf> {
        self.prompt_path("Template file (.yaml or .toml): ")
    }

    fn choose_template(&mut self, names: &[String], current: &str) -> Option<String> {
        for (idx, name) in names.iter().enumerate() {
            let marker = if name == current { "*" } else { " " };
            self.say(&format!("{} {}) {}", marker, idx + 1, name));
        }
        let answer = self.prompt(&format!("Select naming template [{}]: ", current))?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        // Accept either the list number or the name itself.
        match answer.parse::<usize>() {
            Ok(n) if (1..=names.len()).contains(&n) => Some(names[n - 1].clone()),
            _ => Some(answer.to_string()),
        }
    }

    fn collect_field_values(&mut self, template: &TemplateDefinition) -> Vec<String> {
        let mut values = Vec::with_capacity(template.fields.len());
        for field in &template.fields {
            let message = if field.default_value.is_empty() {
                format!("{} ", field.label)
            } else {
                format!("{} [{}] ", field.label, field.default_value)
            };
            let value = match self.prompt(&message) {
                Some(answer) if !answer.is_empty() => answer,
                _ => field.default_value.clone(),
            };
            values.push(value);
        }
        values
    }

    fn next_action(&mut self) -> Option<Action> {
        loop {
            self.say(MENU);
            let answer = self.prompt("> ")?;
            match answer.trim() {
                "d" => return Some(Action::SelectDocument),
                "l" => return Some(Action::LoadTemplate),
                "t" => return Some(Action::ChooseTemplate),
                "r" => return Some(Action::Run),
                "q" => return Some(Action::Quit),
                "" => continue,
                other => self.say(&format!("Unknown choice '{}'", other)),
            }
        }
    }

    fn notify_error(&mut self, message: &str) {
        self.say(&format!("Error! {}", message));
    }

    fn notify_success(&mut self, outcome: &RunOutcome) {
        self.say(&format!(
            "Wrote {} ({} regions renamed as {}_roiNNN)",
            outcome.output_path.display(),
            outcome.regions,
            outcome.name
        ));
    }
}

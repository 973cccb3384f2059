//! Session state for one operator
//!
//! The session owns the template registry, the selected document and the
//! selected template. A run moves through
//! `Idle -> DocumentSelected -> (TemplateLoaded)* -> Formatting -> Relabeling -> Done`;
//! a failed run restores the state it started from.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::error::Error;
use crate::frontend::{Action, Frontend};
use crate::naming::format_name_on;
use crate::relabel::{relabel_to_file, RelabelConfig};
use crate::template::{TemplateDefinition, TemplateRegistry};

/// Where a session is in its run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    DocumentSelected,
    TemplateLoaded,
    Formatting,
    Relabeling,
    Done,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Generated base name
    pub name: String,
    /// Written document
    pub output_path: PathBuf,
    /// Number of regions relabeled
    pub regions: usize,
}

#[derive(Debug)]
pub struct Session {
    registry: TemplateRegistry,
    document: Option<PathBuf>,
    template: String,
    state: SessionState,
    config: RelabelConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the built-in templates and the first one selected
    pub fn new() -> Self {
        Self::with_config(RelabelConfig::default())
    }

    pub fn with_config(config: RelabelConfig) -> Self {
        let registry = TemplateRegistry::with_builtins();
        let template = registry.names().next().unwrap_or_default().to_string();
        Self {
            registry,
            document: None,
            template,
            state: SessionState::Idle,
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RelabelConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// Name of the selected template
    pub fn template_name(&self) -> &str {
        &self.template
    }

    /// The selected template definition
    pub fn current_template(&self) -> Result<&TemplateDefinition, Error> {
        self.registry
            .require(&self.template)
            .map_err(|source| Error::UnknownTemplate {
                name: self.template.clone(),
                source,
            })
    }

    pub fn select_document(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!("selected document {}", path.display());
        self.document = Some(path);
        self.transition(SessionState::DocumentSelected);
    }

    pub fn select_template(&mut self, name: &str) -> Result<(), Error> {
        self.registry
            .require(name)
            .map_err(|source| Error::UnknownTemplate {
                name: name.to_string(),
                source,
            })?;
        self.template = name.to_string();
        Ok(())
    }

    /// Merge a declaration file into the registry and return the template name.
    ///
    /// On failure the registry and state are unchanged.
    pub fn load_template(&mut self, path: &Path) -> Result<String, Error> {
        let name = self
            .registry
            .load_file(path)
            .map_err(|source| Error::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?
            .name
            .clone();
        self.transition(SessionState::TemplateLoaded);
        Ok(name)
    }

    /// Format the name the current template would produce today
    pub fn preview<S: AsRef<str>>(&self, values: &[S]) -> Result<String, Error> {
        let template = self.current_template()?;
        Ok(format_name_on(template, values, today())?)
    }

    /// Format a name from `values` and relabel the selected document with it
    pub fn run<S: AsRef<str>>(&mut self, values: &[S]) -> Result<RunOutcome, Error> {
        self.run_on(values, today())
    }

    /// Like [`Session::run`], with an explicit date stamp
    pub fn run_on<S: AsRef<str>>(
        &mut self,
        values: &[S],
        date: NaiveDate,
    ) -> Result<RunOutcome, Error> {
        let document = self.document.clone().ok_or(Error::NoDocumentSelected)?;
        let template = self.current_template()?.clone();

        let prior = self.state;
        let result = self.execute(&document, &template, values, date);
        match &result {
            Ok(outcome) => {
                info!("run complete: {}", outcome.output_path.display());
                self.transition(SessionState::Done);
            }
            Err(e) => {
                warn!("run aborted: {}", e);
                self.transition(prior);
            }
        }
        result
    }

    fn execute<S: AsRef<str>>(
        &mut self,
        document: &Path,
        template: &TemplateDefinition,
        values: &[S],
        date: NaiveDate,
    ) -> Result<RunOutcome, Error> {
        self.transition(SessionState::Formatting);
        let name = format_name_on(template, values, date)?;

        self.transition(SessionState::Relabeling);
        let report = relabel_to_file(document, &name, &self.config)?;

        Ok(RunOutcome {
            name,
            output_path: report.output_path,
            regions: report.regions,
        })
    }

    fn transition(&mut self, next: SessionState) {
        debug!("session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Ask the frontend for a document. Returns whether one was chosen.
    pub fn pick_document<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> bool {
        match frontend.select_document() {
            Some(path) => {
                self.select_document(path);
                true
            }
            None => false,
        }
    }

    /// Ask the frontend for a declaration file and merge it
    pub fn pick_template_file<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Option<String> {
        let path = frontend.select_template_file()?;
        match self.load_template(&path) {
            Ok(name) => Some(name),
            Err(e) => {
                frontend.notify_error(&e.describe());
                None
            }
        }
    }

    /// Ask the frontend which template to use
    pub fn pick_template<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        let names: Vec<String> = self.registry.names().map(str::to_string).collect();
        if let Some(name) = frontend.choose_template(&names, &self.template) {
            if let Err(e) = self.select_template(&name) {
                frontend.notify_error(&e.to_string());
            }
        }
    }

    /// Collect values from the frontend, run, and report the outcome to it
    pub fn run_interactive<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
    ) -> Result<RunOutcome, Error> {
        let prepared = match self.document {
            None => Err(Error::NoDocumentSelected),
            Some(_) => self.current_template().cloned(),
        };
        let template = match prepared {
            Ok(template) => template,
            Err(e) => {
                frontend.notify_error(&e.describe());
                return Err(e);
            }
        };

        let values = frontend.collect_field_values(&template);
        match self.run(&values) {
            Ok(outcome) => {
                frontend.notify_success(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                frontend.notify_error(&e.describe());
                Err(e)
            }
        }
    }

    /// Handle one operator action
    pub fn dispatch<F: Frontend + ?Sized>(&mut self, action: Action, frontend: &mut F) {
        match action {
            Action::SelectDocument => {
                self.pick_document(frontend);
            }
            Action::LoadTemplate => {
                self.pick_template_file(frontend);
            }
            Action::ChooseTemplate => self.pick_template(frontend),
            Action::Run => {
                // Errors were already reported to the frontend.
                let _ = self.run_interactive(frontend);
            }
            Action::Quit => {}
        }
    }

    /// Serve actions until the frontend quits
    pub fn interact<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        while let Some(action) = frontend.next_action() {
            if action == Action::Quit {
                break;
            }
            self.dispatch(action, frontend);
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

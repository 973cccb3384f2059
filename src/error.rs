//! Top-level error type and source-context reporting

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::naming::NamingError;
use crate::relabel::RelabelError;
use crate::template::TemplateError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors surfaced to the operator during a session
#[derive(Debug, Error)]
pub enum Error {
    /// A run was requested before any document was chosen
    #[error("please select a .mis file")]
    NoDocumentSelected,

    /// The requested template is not registered
    #[error("unknown template '{name}'")]
    UnknownTemplate {
        name: String,
        #[source]
        source: TemplateError,
    },

    /// A template declaration could not be loaded; the registry is unchanged
    #[error("could not load template {}: {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Relabel(#[from] RelabelError),
}

impl Error {
    /// Human-readable message, with source context for declaration syntax errors
    pub fn describe(&self) -> String {
        if let Error::TemplateLoad { path, source } = self {
            if source.span().is_some() {
                if let Ok(text) = std::fs::read_to_string(path) {
                    return source.report(&text, &path.display().to_string());
                }
            }
        }
        self.to_string()
    }
}

impl TemplateError {
    /// Location of a syntax error in the declaration source, if known
    pub fn span(&self) -> Option<Span> {
        match self {
            TemplateError::Toml(e) => e.span(),
            TemplateError::Yaml(e) => e.location().map(|loc| loc.index()..loc.index() + 1),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn report(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };
        let end = span.end.min(source.len());
        let span = span.start.min(end)..end;

        let message = match self {
            TemplateError::Toml(e) => e.message().to_string(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid template declaration")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

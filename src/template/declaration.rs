//! External template declarations (YAML or TOML)
//!
//! A declaration looks like this in YAML:
//!
//! ```text
//! template_name: custom
//! labels: ["Project:", "Sample:", "Section:"]
//! input_type: [text, text, numeric]
//! separators: ["-", "-", "-IMS_"]
//! ```
//!
//! Any `entries` key is accepted and ignored; merged templates always start
//! with empty defaults.

use std::path::Path;

use serde::Deserialize;

use super::registry::TemplateError;

/// Source syntax of a declaration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Toml,
}

impl DeclarationFormat {
    /// Pick the syntax from a file extension. Anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DeclarationFormat::Toml,
            _ => DeclarationFormat::Yaml,
        }
    }
}

/// Raw shape shared by both syntaxes; every key is optional so that missing
/// keys are reported by name rather than as a serde error.
#[derive(Deserialize)]
struct RawDeclaration {
    template_name: Option<String>,
    labels: Option<Vec<String>>,
    input_type: Option<Vec<String>>,
    separators: Option<Vec<String>>,
}

/// A validated template declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDeclaration {
    pub template_name: String,
    pub labels: Vec<String>,
    pub input_type: Vec<String>,
    pub separators: Vec<String>,
}

impl TemplateDeclaration {
    /// Parse and validate a declaration
    pub fn parse(source: &str, format: DeclarationFormat) -> Result<Self, TemplateError> {
        let raw: RawDeclaration = match format {
            DeclarationFormat::Yaml => serde_yaml::from_str(source)?,
            DeclarationFormat::Toml => toml::from_str(source)?,
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDeclaration) -> Result<Self, TemplateError> {
        let template_name = raw.template_name.ok_or(TemplateError::MissingField {
            field: "template_name",
        })?;
        if template_name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let labels = raw
            .labels
            .ok_or(TemplateError::MissingField { field: "labels" })?;
        let input_type = raw
            .input_type
            .ok_or(TemplateError::MissingField { field: "input_type" })?;
        let separators = raw
            .separators
            .ok_or(TemplateError::MissingField { field: "separators" })?;

        let decl = Self {
            template_name,
            labels,
            input_type,
            separators,
        };
        decl.validate()?;
        Ok(decl)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.input_type.len() != self.labels.len() {
            return Err(TemplateError::KindCountMismatch {
                template: self.template_name.clone(),
                labels: self.labels.len(),
                kinds: self.input_type.len(),
            });
        }

        // The last field is never followed by a separator.
        let needed = self.labels.len().saturating_sub(1);
        if self.separators.len() < needed {
            return Err(TemplateError::MissingSeparators {
                template: self.template_name.clone(),
                needed,
                found: self.separators.len(),
            });
        }
        Ok(())
    }
}

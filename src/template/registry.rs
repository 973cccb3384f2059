//! Template registry for storing and retrieving naming templates

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use super::declaration::{DeclarationFormat, TemplateDeclaration};

/// Errors that can occur while loading or looking up templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// A required key is absent from a template declaration
    #[error("template declaration is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// `template_name` is present but blank
    #[error("template declaration has an empty template_name")]
    EmptyName,

    /// `input_type` does not line up with `labels`
    #[error("template {template}: {labels} labels but {kinds} input types")]
    KindCountMismatch {
        template: String,
        labels: usize,
        kinds: usize,
    },

    /// Not enough separators to join every field to the next one
    #[error("template {template}: needs at least {needed} separators, found {found}")]
    MissingSeparators {
        template: String,
        needed: usize,
        found: usize,
    },

    /// Error reading a declaration file
    #[error("error reading template file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML declaration
    #[error("invalid TOML template declaration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed YAML declaration
    #[error("invalid YAML template declaration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// How a field value is formatted into the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Left-padded with `0` to a minimum width
    Numeric,
    /// Passed through unchanged
    #[default]
    Text,
}

impl FieldKind {
    /// Interpret a declaration tag. Only the literal `numeric` is special.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "numeric" {
            FieldKind::Numeric
        } else {
            FieldKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Text => "text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a naming template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Prompt shown to the operator
    pub label: String,
    /// Value the entry starts out with
    pub default_value: String,
    pub kind: FieldKind,
    /// Joined after this field's value when another field follows
    pub separator: String,
}

impl FieldSpec {
    pub fn new(label: impl Into<String>, kind: FieldKind, separator: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default_value: String::new(),
            kind,
            separator: separator.into(),
        }
    }

    /// Create a pass-through field
    pub fn text(label: impl Into<String>, separator: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Text, separator)
    }

    /// Create a zero-padded field
    pub fn numeric(label: impl Into<String>, separator: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Numeric, separator)
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// A named, ordered set of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefinition {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Build a definition from a validated declaration.
    ///
    /// Defaults are always empty, whatever the source provided. A missing
    /// trailing separator becomes the empty string since it is never emitted.
    pub fn from_declaration(decl: &TemplateDeclaration) -> Self {
        let fields = decl
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let kind = decl
                    .input_type
                    .get(idx)
                    .map(|tag| FieldKind::from_tag(tag))
                    .unwrap_or_default();
                let separator = decl.separators.get(idx).cloned().unwrap_or_default();
                FieldSpec::new(label.clone(), kind, separator)
            })
            .collect();

        Self {
            name: decl.template_name.clone(),
            fields,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get the default value of every field, in order
    pub fn defaults(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.default_value.clone()).collect()
    }
}

/// Templates every registry starts with
pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition::new(
            "BIOMIC",
            vec![
                FieldSpec::text("Enter HuBMAP ID (VAN0001):", "-"),
                FieldSpec::text("Enter kidney_side (RK/LK):", "-"),
                FieldSpec::numeric("Enter HuBMAP block ID (1):", "-"),
                FieldSpec::numeric("Enter HuBMAP sec ID (1):", "-"),
                FieldSpec::text("Enter local ID (108):", "-IMS_"),
                FieldSpec::text("Select modality (pos/neg):", ""),
            ],
        ),
        TemplateDefinition::new(
            "generic",
            vec![
                FieldSpec::text("Enter Project Name (myproj1):", "-"),
                FieldSpec::text("Enter sample name (samp01):", "-"),
                FieldSpec::numeric("Enter section ID (1):", "-"),
                FieldSpec::text("Select modality (pos/neg):", "-"),
            ],
        ),
    ]
}

/// Registry of naming templates, keyed by name
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateDefinition>,
    /// Registration order, for display
    order: Vec<String>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in templates
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin_templates() {
            registry.register(def);
        }
        registry
    }

    /// Register a definition, replacing any template with the same name in place
    pub fn register(&mut self, def: TemplateDefinition) {
        if !self.templates.contains_key(&def.name) {
            self.order.push(def.name.clone());
        } else {
            debug!("replacing template '{}'", def.name);
        }
        self.templates.insert(def.name.clone(), def);
    }

    /// Merge an external declaration, with every default reset to empty
    pub fn merge(&mut self, decl: &TemplateDeclaration) -> &TemplateDefinition {
        let def = TemplateDefinition::from_declaration(decl);
        let name = def.name.clone();
        info!("merging template '{}' with {} fields", name, def.field_count());
        self.register(def);
        &self.templates[&name]
    }

    /// Parse, validate and merge a declaration from source text.
    ///
    /// The registry is left untouched when any step fails.
    pub fn load_str(
        &mut self,
        source: &str,
        format: DeclarationFormat,
    ) -> Result<&TemplateDefinition, TemplateError> {
        let decl = TemplateDeclaration::parse(source, format)?;
        Ok(self.merge(&decl))
    }

    /// Read a declaration file and merge it
    pub fn load_file(&mut self, path: &Path) -> Result<&TemplateDefinition, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&source, DeclarationFormat::from_path(path))
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// Get a template by name or fail with `NotFound`
    pub fn require(&self, name: &str) -> Result<&TemplateDefinition, TemplateError> {
        self.get(name).ok_or_else(|| TemplateError::NotFound {
            name: name.to_string(),
        })
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Templates in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.order.iter().filter_map(|name| self.templates.get(name))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

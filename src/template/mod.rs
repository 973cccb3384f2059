//! Naming templates
//!
//! A template is a named, ordered list of fields. Each field carries a prompt
//! label, a default value, a kind (text or numeric) and the separator that
//! joins it to the next field. Templates come from the built-in set or from
//! declaration files merged in at runtime.
//!
//! # Example
//!
//! ```text
//! template_name: custom
//! labels: ["Enter project:", "Enter sample:", "Enter section:"]
//! input_type: [text, text, numeric]
//! separators: ["-", "-", "-IMS_"]
//! ```

mod declaration;
mod registry;

pub use declaration::{DeclarationFormat, TemplateDeclaration};
pub use registry::{
    builtin_templates, FieldKind, FieldSpec, TemplateDefinition, TemplateError, TemplateRegistry,
};

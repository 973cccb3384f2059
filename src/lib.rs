//! mis-formatter - templated naming for flexImaging acquisition sequences
//!
//! This library builds a dated, templated name from a handful of operator
//! fields and uses it to relabel the regions of interest (`Area` elements)
//! of a `.mis` sequence document.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mis_formatter::{format_name_on, relabel_bytes, RelabelConfig, TemplateRegistry};
//!
//! let registry = TemplateRegistry::with_builtins();
//! let generic = registry.get("generic").unwrap();
//! let date = NaiveDate::from_ymd_opt(2020, 6, 25).unwrap();
//!
//! let name = format_name_on(generic, &["myproj1", "samp01", "1", "pos"], date).unwrap();
//! assert_eq!(name, "20200625_myproj1-samp01-001-pos");
//!
//! let doc = relabel_bytes(b"<Seq><Area Name=\"x\"/></Seq>", &name, &RelabelConfig::default())
//!     .unwrap();
//! assert_eq!(doc.regions, 1);
//! ```

pub mod error;
pub mod frontend;
pub mod naming;
pub mod relabel;
pub mod session;
pub mod template;

pub use error::Error;
pub use frontend::{Action, ConsoleFrontend, Frontend};
pub use naming::{format_field, format_name, format_name_on, NamingError};
pub use relabel::{
    output_path, relabel, relabel_bytes, relabel_to_file, RelabelConfig, RelabelError,
    RelabelReport, RelabeledDocument,
};
pub use session::{RunOutcome, Session, SessionState};
pub use template::{
    DeclarationFormat, FieldKind, FieldSpec, TemplateDeclaration, TemplateDefinition,
    TemplateError, TemplateRegistry,
};

//! Region relabeling for acquisition sequence documents
//!
//! Every `Area` element directly under the document root gets its `Name`
//! attribute set to `<base>_roi<index>`, with the index zero-padded and
//! counted from 0 in document order. The result is pretty-printed and written
//! beside the source as `<base>.mis`; the source file is never touched.

pub mod config;
mod rewrite;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

pub use config::RelabelConfig;

/// Extension of written documents
pub const OUTPUT_EXTENSION: &str = "mis";

/// Errors that can occur while relabeling a document
#[derive(Debug, Error)]
pub enum RelabelError {
    /// The selected document does not exist
    #[error("document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// The document exists but could not be read
    #[error("error reading document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML
    #[error("document is not well-formed XML (at byte {position}): {message}")]
    Parse { position: u64, message: String },

    /// The rewritten document could not be serialized
    #[error("error serializing document: {message}")]
    Serialize { message: String },

    /// The output file could not be written
    #[error("error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The generated name points back at the source document
    #[error("refusing to overwrite source document {}", path.display())]
    WouldOverwriteSource { path: PathBuf },
}

/// A relabeled document held in memory
#[derive(Debug, Clone)]
pub struct RelabeledDocument {
    /// Serialized, pretty-printed document
    pub bytes: Vec<u8>,
    /// Number of regions renamed
    pub regions: usize,
}

/// Result of relabeling a document to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelabelReport {
    pub output_path: PathBuf,
    pub regions: usize,
}

/// Relabel an in-memory document
pub fn relabel_bytes(
    source: &[u8],
    base_name: &str,
    config: &RelabelConfig,
) -> Result<RelabeledDocument, RelabelError> {
    let (bytes, regions) = rewrite::rewrite_regions(source, base_name, config)?;
    debug!("relabeled {} regions as {}_roi*", regions, base_name);
    Ok(RelabeledDocument { bytes, regions })
}

/// Read a document from disk
pub fn read_document(path: &Path) -> Result<Vec<u8>, RelabelError> {
    fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RelabelError::DocumentNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RelabelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Load a document and return its relabeled serialization
pub fn relabel(document_path: &Path, base_name: &str) -> Result<Vec<u8>, RelabelError> {
    relabel_with_config(document_path, base_name, &RelabelConfig::default()).map(|doc| doc.bytes)
}

/// Load a document and relabel it with custom configuration
pub fn relabel_with_config(
    document_path: &Path,
    base_name: &str,
    config: &RelabelConfig,
) -> Result<RelabeledDocument, RelabelError> {
    let source = read_document(document_path)?;
    relabel_bytes(&source, base_name, config)
}

/// Destination of a relabeled document: `<base_name>.mis` beside the source
pub fn output_path(document_path: &Path, base_name: &str) -> PathBuf {
    let dir = document_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}.{}", base_name, OUTPUT_EXTENSION))
}

/// Relabel a document and write it beside the source
pub fn relabel_to_file(
    document_path: &Path,
    base_name: &str,
    config: &RelabelConfig,
) -> Result<RelabelReport, RelabelError> {
    let destination = output_path(document_path, base_name);
    if is_same_file(document_path, &destination) {
        return Err(RelabelError::WouldOverwriteSource {
            path: document_path.to_path_buf(),
        });
    }

    let document = relabel_with_config(document_path, base_name, config)?;

    fs::write(&destination, &document.bytes).map_err(|source| RelabelError::Write {
        path: destination.clone(),
        source,
    })?;

    info!(
        "wrote {} ({} regions)",
        destination.display(),
        document.regions
    );
    Ok(RelabelReport {
        output_path: destination,
        regions: document.regions,
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

//! Configuration for region relabeling

/// Configuration options for relabeling and serialization
#[derive(Debug, Clone)]
pub struct RelabelConfig {
    /// Tag of the region elements under the document root
    pub region_tag: String,

    /// Attribute that identifies a region
    pub name_attribute: String,

    /// Zero-padded width of the region index
    pub index_width: usize,

    /// Byte used for indentation
    pub indent_char: u8,

    /// Indentation repeat per nesting level
    pub indent_size: usize,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            region_tag: "Area".to_string(),
            name_attribute: "Name".to_string(),
            index_width: 3,
            indent_char: b' ',
            indent_size: 2,
        }
    }
}

impl RelabelConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of indent characters per level
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Indent with one tab per level
    pub fn with_tabs(mut self) -> Self {
        self.indent_char = b'\t';
        self.indent_size = 1;
        self
    }

    /// Set the region element tag
    pub fn with_region_tag(mut self, tag: impl Into<String>) -> Self {
        self.region_tag = tag.into();
        self
    }

    /// Set the identifying attribute
    pub fn with_name_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.name_attribute = attribute.into();
        self
    }

    /// Label for the region at `index`: `<base>_roi<index>`
    pub fn region_label(&self, base_name: &str, index: usize) -> String {
        format!(
            "{}_roi{:0width$}",
            base_name,
            index,
            width = self.index_width
        )
    }
}

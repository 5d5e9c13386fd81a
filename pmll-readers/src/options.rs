//! Reader configuration

use pmll_core::Scale;
use serde::{Deserialize, Serialize};

/// Options for reading the header-annotated text format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataReaderOptions {
    /// Field delimiter
    pub delimiter: char,

    /// Character every header line starts with
    pub header_marker: char,

    /// Separator between a feature name and its scale literal
    pub scale_separator: char,

    /// Scale of header tokens without a scale literal
    pub default_scale: Scale,

    /// Whether to trim whitespace around header tokens and fields
    pub trim_fields: bool,

    /// Whether to skip empty data lines
    pub skip_empty_lines: bool,
}

impl Default for DataReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            header_marker: '#',
            scale_separator: ':',
            default_scale: Scale::DEFAULT,
            trim_fields: true,
            skip_empty_lines: true,
        }
    }
}

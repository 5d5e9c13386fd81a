//! Readers producing pmll data from text
//!
//! This crate parses the header-annotated, tab-delimited text format into
//! [`pmll_core::Data`]. Opening files is left to the caller; readers consume
//! lines or any [`std::io::BufRead`].

#![warn(missing_docs)]

mod error;
mod options;
mod reader;

pub use error::{Error, Result};
pub use options::DataReaderOptions;
pub use reader::DataReader;

// Re-export core types
pub use pmll_core::{Data, Feature, Scale, Value};

//! Features, data container and statistics for tabular model building
//!
//! A [`Data`] instance holds objects (rows) and a working list of
//! [`Feature`]s (columns). Features are either atomic, reading a stored
//! column, or derived through arithmetic on linear features, and are
//! evaluated lazily whenever the data is backed by a one-shot stream.
//! On top of that the crate offers per-feature statistics, a variance
//! inflation diagnostic, sliding-window transforms, random splits and a
//! dense numeric matrix view.

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod feature;
mod linalg;
pub mod object;
pub mod scale;
pub mod sequence;
pub mod stat;
pub mod value;

// Re-export key types for convenience
pub use data::{ColumnIndex, Data, Row, RowStream, SplitBy};
pub use error::{Error, Result};
pub use feature::{duplicated_features, BinaryOp, Feature, Operand};
pub use object::Object;
pub use scale::Scale;
pub use sequence::Sequence;
pub use stat::{FeatureStat, LinearStat};
pub use value::Value;

/// Build a [`Row`] from values convertible into [`Value`]
///
/// ```
/// use pmll_core::{row, Value};
///
/// assert_eq!(row![1, "a"], vec![Value::Int(1), Value::from("a")]);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

//! Computed objects (rows) of a data instance

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One object: the values of every working feature for a single row
///
/// Values are labeled by position (`f0`, `f1`, ...), not by feature name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    values: Vec<Value>,
}

impl Object {
    /// Create an object from its values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Positional label of a value
    pub fn label(position: usize) -> String {
        format!("f{position}")
    }

    /// Get a value by its positional label
    pub fn get(&self, label: &str) -> Option<&Value> {
        let position = label.strip_prefix('f')?.parse::<usize>().ok()?;
        if Self::label(position) != label {
            return None;
        }
        self.values.get(position)
    }

    /// Iterate over `(label, value)` pairs
    pub fn labeled(&self) -> impl Iterator<Item = (String, &Value)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (Self::label(i), value))
    }

    /// Get the values of this object
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Take the values out of this object
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Deref for Object {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Object {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl PartialEq<Vec<Value>> for Object {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.values == other
    }
}

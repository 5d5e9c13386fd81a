//! Measurement scales of features

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Statistical scale of a feature
///
/// The scale decides how a feature is aggregated by [`Data::stat`](crate::Data::stat)
/// and whether it takes part in arithmetic composition (only [`Scale::Linear`]
/// does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Unordered categories
    Nominal,

    /// Two-valued categories
    Binary,

    /// Ordered categories
    Rank,

    /// Numbers on an interval or ratio scale
    Linear,
}

impl Scale {
    /// Scale used when none is given
    pub const DEFAULT: Scale = Scale::Linear;

    /// Header literal of this scale
    pub fn literal(self) -> &'static str {
        match self {
            Scale::Nominal => "nom",
            Scale::Binary => "bin",
            Scale::Rank => "rank",
            Scale::Linear => "lin",
        }
    }

    /// Check if values of this scale are aggregated as category counts
    pub fn is_categorical(self) -> bool {
        !matches!(self, Scale::Linear)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::DEFAULT
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl FromStr for Scale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nom" => Ok(Scale::Nominal),
            "bin" => Ok(Scale::Binary),
            "rank" => Ok(Scale::Rank),
            "lin" => Ok(Scale::Linear),
            other => Err(Error::InvalidArgument(format!("Unknown scale: {other}"))),
        }
    }
}

//! Scalar values stored in objects

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scale::Scale;

/// A single raw or computed value of an object
///
/// Booleans, integers and floats compare numerically with each other, so
/// `Bool(true) == Int(1) == Float(1.0)`. Hashing agrees with that equality,
/// which lets values key the category counts produced by
/// [`Data::stat`](crate::Data::stat).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// String value
    Str(String),
}

/// Numeric view of a value used by arithmetic
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn to_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

impl Value {
    /// Coerce a text token to the value type implied by `scale`
    ///
    /// Linear tokens become integers when they parse as such and floats
    /// otherwise; binary tokens become booleans; rank tokens become integers
    /// when possible; nominal tokens are kept verbatim.
    pub fn from_token(token: &str, scale: Scale) -> Result<Self> {
        match scale {
            Scale::Linear => {
                if let Ok(i) = token.parse::<i64>() {
                    return Ok(Value::Int(i));
                }
                token.parse::<f64>().map(Value::Float).map_err(|_| {
                    Error::TypeMismatch(format!("Failed to parse '{token}' as a number"))
                })
            }
            Scale::Binary => match token.to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "t" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "n" | "f" => Ok(Value::Bool(false)),
                _ => Err(Error::TypeMismatch(format!(
                    "Failed to parse '{token}' as boolean"
                ))),
            },
            Scale::Rank => Ok(token
                .parse::<i64>()
                .map_or_else(|_| Value::Str(token.to_string()), Value::Int)),
            Scale::Nominal => Ok(Value::Str(token.to_string())),
        }
    }

    /// Get this value as a float, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        self.num().map(Num::to_f64)
    }

    /// Check if this value takes part in arithmetic
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Value::Str(_))
    }

    fn num(&self) -> Option<Num> {
        match self {
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(Num::Float(*f)),
            Value::Str(_) => None,
        }
    }

    fn expect_num(&self, op: &str) -> Result<Num> {
        self.num().ok_or_else(|| {
            Error::TypeMismatch(format!("Cannot apply '{op}' to non-numeric value {self:?}"))
        })
    }

    fn combine(
        &self,
        rhs: &Value,
        op: &str,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value> {
        let (a, b) = (self.expect_num(op)?, rhs.expect_num(op)?);
        Ok(match (a, b) {
            (Num::Int(x), Num::Int(y)) => int_op(x, y).map_or_else(
                || Value::Float(float_op(x as f64, y as f64)),
                Value::Int,
            ),
            _ => Value::Float(float_op(a.to_f64(), b.to_f64())),
        })
    }

    /// Sum of two numeric values
    pub fn try_add(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, "+", i64::checked_add, |x, y| x + y)
    }

    /// Difference of two numeric values
    pub fn try_sub(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, "-", i64::checked_sub, |x, y| x - y)
    }

    /// Product of two numeric values
    pub fn try_mul(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, "*", i64::checked_mul, |x, y| x * y)
    }

    /// Quotient of two numeric values, always a float
    pub fn try_div(&self, rhs: &Value) -> Result<Value> {
        let (a, b) = (self.expect_num("/")?, rhs.expect_num("/")?);
        if b.to_f64() == 0.0 {
            return Err(Error::InvalidOperation("division by zero".into()));
        }
        Ok(Value::Float(a.to_f64() / b.to_f64()))
    }

    /// `self` raised to the power `rhs`
    pub fn try_pow(&self, rhs: &Value) -> Result<Value> {
        self.combine(
            rhs,
            "**",
            |x, y| u32::try_from(y).ok().and_then(|e| x.checked_pow(e)),
            f64::powf,
        )
    }

    /// Negation of a numeric value
    pub fn try_neg(&self) -> Result<Value> {
        Ok(match self.expect_num("-")? {
            Num::Int(i) => i
                .checked_neg()
                .map_or_else(|| Value::Float(-(i as f64)), Value::Int),
            Num::Float(f) => Value::Float(-f),
        })
    }

    /// Canonical form shared by equality and hashing
    ///
    /// Integral floats within the `i64` range map to their integer, so they
    /// meet `Int` exactly; integers are never widened to `f64`.
    fn key(&self) -> Key<'_> {
        match self {
            Value::Bool(b) => Key::Int(i64::from(*b)),
            Value::Int(i) => Key::Int(*i),
            Value::Float(f) => {
                // i64::MIN as f64 is exactly -2^63
                if f.fract() == 0.0 && *f >= I64_MIN_F64 && *f < -I64_MIN_F64 {
                    Key::Int(*f as i64)
                } else if f.is_nan() {
                    Key::Float(f64::NAN.to_bits())
                } else {
                    Key::Float(f.to_bits())
                }
            }
            Value::Str(s) => Key::Str(s),
        }
    }
}

const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;

#[derive(PartialEq, Eq, Hash)]
enum Key<'a> {
    Int(i64),
    Float(u64),
    Str(&'a str),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

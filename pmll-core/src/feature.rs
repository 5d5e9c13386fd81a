//! Features: named, typed columns that evaluate against data
//!
//! A feature is either *atomic*, reading one stored column of a [`Data`]
//! instance, or *derived*, combining other features and constants through
//! arithmetic. Derived features are expression trees built with the usual
//! operators:
//!
//! ```
//! use pmll_core::Feature;
//!
//! let weight = Feature::linear("weight");
//! let height = Feature::linear("height");
//! let bmi = &weight / height.pow(2);
//! assert_eq!(bmi.name(), "(weight / (height ** 2))");
//! assert!(!bmi.is_atomic());
//! ```
//!
//! Identity is the `(name, scale)` pair only. Two features with the same name
//! and scale are equal no matter how they compute their values.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::data::Data;
use crate::error::{Error, Result};
use crate::scale::Scale;
use crate::sequence::Sequence;
use crate::value::Value;

/// Binary arithmetic operator of a derived feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Symbol used in synthesized feature names
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    fn apply(self, lhs: &Value, rhs: &Value) -> Result<Value> {
        match self {
            BinaryOp::Add => lhs.try_add(rhs),
            BinaryOp::Sub => lhs.try_sub(rhs),
            BinaryOp::Mul => lhs.try_mul(rhs),
            BinaryOp::Div => lhs.try_div(rhs),
            BinaryOp::Pow => lhs.try_pow(rhs),
        }
    }
}

/// One side of a binary operator: a feature or a constant
#[derive(Debug, Clone)]
pub enum Operand {
    /// Another feature
    Feature(Feature),
    /// A constant value
    Constant(Value),
}

impl Operand {
    fn label(&self) -> String {
        match self {
            Operand::Feature(feature) => feature.name.clone(),
            Operand::Constant(value) => value.to_string(),
        }
    }

    fn bind(&self, atomic: &[Feature]) -> Result<Bound> {
        match self {
            Operand::Feature(feature) => {
                if feature.scale != Scale::Linear {
                    return Err(Error::InvalidOperation(format!(
                        "Arithmetic requires linear features, '{}' is {}",
                        feature.name, feature.scale
                    )));
                }
                feature.bind(atomic)
            }
            Operand::Constant(value) => Ok(Bound::Constant(value.clone())),
        }
    }
}

impl From<Feature> for Operand {
    fn from(feature: Feature) -> Self {
        Operand::Feature(feature)
    }
}

impl From<&Feature> for Operand {
    fn from(feature: &Feature) -> Self {
        Operand::Feature(feature.clone())
    }
}

impl From<i32> for Operand {
    fn from(c: i32) -> Self {
        Operand::Constant(Value::from(c))
    }
}

impl From<i64> for Operand {
    fn from(c: i64) -> Self {
        Operand::Constant(Value::Int(c))
    }
}

impl From<f64> for Operand {
    fn from(c: f64) -> Self {
        Operand::Constant(Value::Float(c))
    }
}

/// Evaluation payload of a feature
#[derive(Debug)]
enum Expr {
    /// Stored column, located by identity in the data's atomic features
    Atom,
    Neg(Feature),
    Binary {
        op: BinaryOp,
        lhs: Operand,
        rhs: Operand,
    },
}

/// Expression with every leaf resolved to a column position
#[derive(Debug, Clone)]
pub(crate) enum Bound {
    Column(usize),
    Constant(Value),
    Neg(Box<Bound>),
    Binary(BinaryOp, Box<Bound>, Box<Bound>),
}

impl Bound {
    /// Compute the value for one stored row
    pub(crate) fn eval(&self, row: &[Value]) -> Result<Value> {
        match self {
            Bound::Column(position) => row.get(*position).cloned().ok_or(Error::IndexOutOfBounds {
                index: *position,
                len: row.len(),
            }),
            Bound::Constant(value) => Ok(value.clone()),
            Bound::Neg(inner) => inner.eval(row)?.try_neg(),
            Bound::Binary(op, lhs, rhs) => op.apply(&lhs.eval(row)?, &rhs.eval(row)?),
        }
    }
}

/// A named, typed column descriptor
#[derive(Clone)]
pub struct Feature {
    name: String,
    scale: Scale,
    expr: Arc<Expr>,
}

impl Feature {
    /// Create an atomic feature with the default scale
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_scale(name, Scale::DEFAULT)
    }

    /// Create an atomic feature with the given scale
    pub fn with_scale(name: impl Into<String>, scale: Scale) -> Self {
        Self {
            name: name.into(),
            scale,
            expr: Arc::new(Expr::Atom),
        }
    }

    /// Create an atomic nominal feature
    pub fn nominal(name: impl Into<String>) -> Self {
        Self::with_scale(name, Scale::Nominal)
    }

    /// Create an atomic binary feature
    pub fn binary(name: impl Into<String>) -> Self {
        Self::with_scale(name, Scale::Binary)
    }

    /// Create an atomic rank feature
    pub fn rank(name: impl Into<String>) -> Self {
        Self::with_scale(name, Scale::Rank)
    }

    /// Create an atomic linear feature
    pub fn linear(name: impl Into<String>) -> Self {
        Self::with_scale(name, Scale::Linear)
    }

    /// Positional feature `f{position}` synthesized for anonymous columns
    pub(crate) fn generic(position: usize) -> Self {
        Self::new(format!("f{position}"))
    }

    /// Name of the feature
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scale of the feature
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Check if the feature reads a stored column rather than computing one
    pub fn is_atomic(&self) -> bool {
        matches!(*self.expr, Expr::Atom)
    }

    /// Atomic feature with the same identity
    pub fn to_atomic(&self) -> Self {
        Self::with_scale(self.name.clone(), self.scale)
    }

    /// Raise this feature to a power
    pub fn pow(&self, rhs: impl Into<Operand>) -> Feature {
        Self::derive(BinaryOp::Pow, self.into(), rhs.into())
    }

    fn derive(op: BinaryOp, lhs: Operand, rhs: Operand) -> Feature {
        Feature {
            name: format!("({} {} {})", lhs.label(), op.symbol(), rhs.label()),
            scale: Scale::Linear,
            expr: Arc::new(Expr::Binary { op, lhs, rhs }),
        }
    }

    /// Evaluate the feature against every object of `data`
    ///
    /// The result is lazy exactly when `data` is backed by a stream. Lookup
    /// of the feature's leaves happens here, so a missing column fails
    /// immediately even for lazy data; value errors of streamed objects only
    /// surface while iterating.
    pub fn evaluate<'a>(&self, data: &'a Data) -> Result<Sequence<'a, Value>> {
        let bound = self.bind(data.atomic_features())?;
        data.map_rows(move |row| bound.eval(row))
    }

    /// Resolve the expression against the atomic features of a data instance
    pub(crate) fn bind(&self, atomic: &[Feature]) -> Result<Bound> {
        if let Some(position) = atomic.iter().position(|f| f == self) {
            return Ok(Bound::Column(position));
        }
        match &*self.expr {
            Expr::Atom => Err(Error::FeatureNotFound(self.to_string())),
            Expr::Neg(inner) => Ok(Bound::Neg(Box::new(
                Operand::Feature(inner.clone()).bind(atomic)?,
            ))),
            Expr::Binary { op, lhs, rhs } => Ok(Bound::Binary(
                *op,
                Box::new(lhs.bind(atomic)?),
                Box::new(rhs.bind(atomic)?),
            )),
        }
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.scale == other.scale
    }
}

impl Eq for Feature {}

impl Hash for Feature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.scale.hash(state);
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("scale", &self.scale)
            .field("atomic", &self.is_atomic())
            .finish()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.scale)
    }
}

impl Neg for Feature {
    type Output = Feature;

    fn neg(self) -> Feature {
        -&self
    }
}

impl Neg for &Feature {
    type Output = Feature;

    fn neg(self) -> Feature {
        Feature {
            name: format!("(-{})", self.name),
            scale: Scale::Linear,
            expr: Arc::new(Expr::Neg(self.clone())),
        }
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Operand>> $trait<R> for Feature {
            type Output = Feature;

            fn $method(self, rhs: R) -> Feature {
                Feature::derive($op, self.into(), rhs.into())
            }
        }

        impl<R: Into<Operand>> $trait<R> for &Feature {
            type Output = Feature;

            fn $method(self, rhs: R) -> Feature {
                Feature::derive($op, self.into(), rhs.into())
            }
        }

        impl_binary_op!(@constant $trait, $method, $op, i32, i64, f64);
    };
    (@constant $trait:ident, $method:ident, $op:expr, $($c:ty),*) => {
        $(
            impl $trait<Feature> for $c {
                type Output = Feature;

                fn $method(self, rhs: Feature) -> Feature {
                    Feature::derive($op, self.into(), rhs.into())
                }
            }

            impl $trait<&Feature> for $c {
                type Output = Feature;

                fn $method(self, rhs: &Feature) -> Feature {
                    Feature::derive($op, self.into(), rhs.into())
                }
            }
        )*
    };
}

impl_binary_op!(Add, add, BinaryOp::Add);
impl_binary_op!(Sub, sub, BinaryOp::Sub);
impl_binary_op!(Mul, mul, BinaryOp::Mul);
impl_binary_op!(Div, div, BinaryOp::Div);

/// Features occurring more than once in `features`, each reported once
pub fn duplicated_features(features: &[Feature]) -> Vec<Feature> {
    let mut counts: HashMap<&Feature, usize> = HashMap::with_capacity(features.len());
    for feature in features {
        *counts.entry(feature).or_insert(0) += 1;
    }

    let mut duplicated: Vec<Feature> = Vec::new();
    for feature in features {
        if counts[feature] > 1 && !duplicated.contains(feature) {
            duplicated.push(feature.clone());
        }
    }
    duplicated
}

/// Fail if any feature occurs more than once
pub(crate) fn ensure_unique(features: &[Feature]) -> Result<()> {
    let duplicated = duplicated_features(features);
    if duplicated.is_empty() {
        Ok(())
    } else {
        Err(Error::DuplicateFeatures(
            duplicated.iter().map(ToString::to_string).collect(),
        ))
    }
}

//! Per-feature statistics and multicollinearity diagnostics

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::Data;
use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::linalg;
use crate::value::Value;

/// Summary of a linear feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearStat {
    /// Mean value
    pub mean: f64,
    /// Population variance (divided by the count)
    pub var: f64,
    /// Standard deviation
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl LinearStat {
    /// Compute the summary of a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut m2 = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
        }
        let var = m2 / n;

        Self {
            mean,
            var,
            std: var.sqrt(),
            min,
            max,
        }
    }
}

/// Aggregate of one feature's values
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStat {
    /// Occurrences of each value of a nominal, binary or rank feature
    Counts(HashMap<Value, usize>),
    /// Moments and range of a linear feature
    Linear(LinearStat),
}

fn numeric(feature: &Feature, values: &[Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|value| {
            value.as_f64().ok_or_else(|| {
                Error::TypeMismatch(format!("Feature {feature} has non-numeric value {value:?}"))
            })
        })
        .collect()
}

impl Data {
    /// Aggregate every working feature over all objects
    ///
    /// Categorical features count their values; linear features get a
    /// [`LinearStat`].
    pub fn stat(&self) -> Result<HashMap<Feature, FeatureStat>> {
        let rows = self.computed_rows()?;
        let mut stats = HashMap::with_capacity(self.nfeatures());

        for (i, feature) in self.features().into_iter().enumerate() {
            let values: Vec<Value> = rows.iter().map(|row| row[i].clone()).collect();
            let stat = if feature.scale().is_categorical() {
                let mut counts = HashMap::new();
                for value in values {
                    *counts.entry(value).or_insert(0) += 1;
                }
                FeatureStat::Counts(counts)
            } else {
                FeatureStat::Linear(LinearStat::compute(&numeric(&feature, &values)?))
            };
            stats.insert(feature, stat);
        }

        Ok(stats)
    }

    /// Variance inflation of every working feature, in working order
    ///
    /// With `X` the object-by-feature matrix, feature `i` scores
    /// `[(XᵀX)⁻¹]ᵢᵢ · var(xᵢ)`, where `var` is the population variance of
    /// its column. Needs more than one feature and at least as many objects
    /// as features.
    pub fn vif(&self) -> Result<Vec<f64>> {
        let k = self.nfeatures();
        if k <= 1 {
            return Err(Error::InvalidArgument(format!(
                "VIF needs more than one feature, got {k}"
            )));
        }

        let x = self.matrix()?;
        let n = x.nrows();
        if n < k {
            return Err(Error::InvalidArgument(format!(
                "VIF needs at least as many objects as features, got {n} objects and {k} features"
            )));
        }

        let inverse = linalg::invert(&x.t().dot(&x))?;
        let vif = (0..k)
            .map(|i| {
                let column: Vec<f64> = x.column(i).to_vec();
                inverse[[i, i]] * LinearStat::compute(&column).var
            })
            .collect();

        debug!(nfeatures = k, nobjects = n, "computed vif");
        Ok(vif)
    }
}

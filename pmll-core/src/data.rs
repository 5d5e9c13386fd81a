//! Data container: objects plus a working list of features
//!
//! A [`Data`] owns its stored rows, either materialized in memory or as a
//! one-shot stream, together with the atomic features describing the stored
//! columns. The working feature list decides which values an object exposes;
//! it starts out as the atomic features and can be replaced with any mix of
//! atomic and derived features.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Bound as RangeBound, Range, RangeBounds, RangeFrom, RangeFull, RangeTo};

use ndarray::Array2;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::feature::{ensure_unique, Bound, Feature};
use crate::object::Object;
use crate::sequence::Sequence;
use crate::value::Value;

/// A stored row: one raw value per atomic feature
pub type Row = Vec<Value>;

/// A one-shot stream of stored rows
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

enum ObjectSource {
    Materialized(Vec<Row>),
    Streaming(RefCell<RowStream>),
}

/// Column selector used by [`Data::object_at`] and [`Data::slice`]
#[derive(Debug, Clone)]
pub enum ColumnIndex {
    /// Every working feature
    All,
    /// The working feature at a position
    At(usize),
    /// Working features in a position range, clamped to the feature count
    Range(Range<usize>),
    /// The working feature equal to this one
    Feature(Feature),
}

impl From<RangeFull> for ColumnIndex {
    fn from(_: RangeFull) -> Self {
        ColumnIndex::All
    }
}

impl From<usize> for ColumnIndex {
    fn from(position: usize) -> Self {
        ColumnIndex::At(position)
    }
}

impl From<Range<usize>> for ColumnIndex {
    fn from(range: Range<usize>) -> Self {
        ColumnIndex::Range(range)
    }
}

impl From<RangeFrom<usize>> for ColumnIndex {
    fn from(range: RangeFrom<usize>) -> Self {
        ColumnIndex::Range(range.start..usize::MAX)
    }
}

impl From<RangeTo<usize>> for ColumnIndex {
    fn from(range: RangeTo<usize>) -> Self {
        ColumnIndex::Range(0..range.end)
    }
}

impl From<Feature> for ColumnIndex {
    fn from(feature: Feature) -> Self {
        ColumnIndex::Feature(feature)
    }
}

impl From<&Feature> for ColumnIndex {
    fn from(feature: &Feature) -> Self {
        ColumnIndex::Feature(feature.clone())
    }
}

/// How [`Data::split`] sizes its first partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitBy {
    /// Exactly this many objects
    Size(usize),
    /// This fraction of the objects, rounded half to even
    Ratio(f64),
}

/// A dataset of objects described by features
pub struct Data {
    source: ObjectSource,
    atomic: Vec<Feature>,
    features: Vec<Feature>,
}

impl Data {
    /// Create data from rows, synthesizing one generic feature per column
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        Self::with_features(rows, (0..width).map(Feature::generic).collect())
    }

    /// Create data from rows described by the given features
    ///
    /// The features become the atomic features of the stored columns, so a
    /// derived feature passed here reads its column instead of computing it.
    pub fn with_features(rows: Vec<Row>, features: Vec<Feature>) -> Result<Self> {
        ensure_unique(&features)?;
        let atomic: Vec<Feature> = features.iter().map(Feature::to_atomic).collect();

        for (i, row) in rows.iter().enumerate() {
            if row.len() != atomic.len() {
                return Err(Error::InvalidArgument(format!(
                    "Object {} has {} values, expected {}",
                    i,
                    row.len(),
                    atomic.len()
                )));
            }
        }

        debug!(
            nobjects = rows.len(),
            nfeatures = atomic.len(),
            "created materialized data"
        );

        Ok(Self {
            source: ObjectSource::Materialized(rows),
            features: atomic.clone(),
            atomic,
        })
    }

    /// Create data over a one-shot stream of rows
    ///
    /// Without explicit features the first row is peeked to count the
    /// columns. Rows of the wrong width fail when they are consumed.
    pub fn from_stream<I>(rows: I, features: Option<Vec<Feature>>) -> Result<Self>
    where
        I: Iterator<Item = Result<Row>> + 'static,
    {
        let mut rows = rows.peekable();
        let features = match features {
            Some(features) => features,
            None => {
                let width = match rows.peek() {
                    Some(Ok(row)) => row.len(),
                    _ => 0,
                };
                (0..width).map(Feature::generic).collect()
            }
        };
        ensure_unique(&features)?;
        let atomic: Vec<Feature> = features.iter().map(Feature::to_atomic).collect();

        let width = atomic.len();
        let checked = rows.enumerate().map(move |(i, row)| {
            row.and_then(|row| {
                if row.len() == width {
                    Ok(row)
                } else {
                    Err(Error::InvalidArgument(format!(
                        "Object {} has {} values, expected {}",
                        i,
                        row.len(),
                        width
                    )))
                }
            })
        });

        debug!(nfeatures = width, "created streaming data");

        Ok(Self {
            source: ObjectSource::Streaming(RefCell::new(Box::new(checked))),
            features: atomic.clone(),
            atomic,
        })
    }

    /// Check if objects come from a one-shot stream
    pub fn is_lazy(&self) -> bool {
        matches!(self.source, ObjectSource::Streaming(_))
    }

    /// Drain a stream into memory; materialized data is returned unchanged
    pub fn materialize(self) -> Result<Self> {
        match self.source {
            ObjectSource::Materialized(_) => Ok(self),
            ObjectSource::Streaming(stream) => {
                let rows = stream.into_inner().collect::<Result<Vec<_>>>()?;
                debug!(nobjects = rows.len(), "materialized streaming data");
                Ok(Self {
                    source: ObjectSource::Materialized(rows),
                    atomic: self.atomic,
                    features: self.features,
                })
            }
        }
    }

    /// Copy of the working feature list
    pub fn features(&self) -> Vec<Feature> {
        self.features.clone()
    }

    /// Replace the working feature list
    pub fn set_features(&mut self, features: Vec<Feature>) -> Result<()> {
        ensure_unique(&features)?;
        self.features = features;
        Ok(())
    }

    /// Append a feature to the working feature list
    pub fn push_feature(&mut self, feature: Feature) -> Result<()> {
        if self.features.contains(&feature) {
            return Err(Error::DuplicateFeatures(vec![feature.to_string()]));
        }
        self.features.push(feature);
        Ok(())
    }

    /// Features of the stored columns, fixed at construction
    pub fn atomic_features(&self) -> &[Feature] {
        &self.atomic
    }

    /// Number of working features
    pub fn nfeatures(&self) -> usize {
        self.features.len()
    }

    /// Number of objects, unknown for streaming data
    pub fn nobjects(&self) -> Option<usize> {
        match &self.source {
            ObjectSource::Materialized(rows) => Some(rows.len()),
            ObjectSource::Streaming(_) => None,
        }
    }

    /// Objects with one value per working feature
    ///
    /// Lazy for streaming data, materialized otherwise.
    pub fn objects(&self) -> Result<Sequence<'_, Object>> {
        let bound = self.bind(&self.features)?;
        self.map_rows(move |row| eval_row(&bound, row).map(Object::new))
    }

    /// Evaluate one feature over every object and collect the values
    pub fn column(&self, feature: &Feature) -> Result<Vec<Value>> {
        feature.evaluate(self)?.into_vec()
    }

    /// Object at `index` with every working feature
    pub fn row(&self, index: usize) -> Result<Object> {
        self.object_at(index, ColumnIndex::All)
    }

    /// Object at `index` restricted to the selected columns
    pub fn object_at(&self, index: usize, cols: impl Into<ColumnIndex>) -> Result<Object> {
        let features = self.select_features(&cols.into())?;
        let rows = self.rows()?;
        let row = rows.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: rows.len(),
        })?;
        eval_row(&self.bind(&features)?, row).map(Object::new)
    }

    /// New data with a range of objects and the selected columns
    ///
    /// Row and column ranges are clamped to the available counts.
    pub fn slice(&self, rows: impl RangeBounds<usize>, cols: impl Into<ColumnIndex>) -> Result<Data> {
        let features = self.select_features(&cols.into())?;
        let stored = self.rows()?;
        let start = match rows.start_bound() {
            RangeBound::Included(&s) => s,
            RangeBound::Excluded(&s) => s.saturating_add(1),
            RangeBound::Unbounded => 0,
        }
        .min(stored.len());
        let end = match rows.end_bound() {
            RangeBound::Included(&e) => e.saturating_add(1),
            RangeBound::Excluded(&e) => e,
            RangeBound::Unbounded => stored.len(),
        }
        .clamp(start, stored.len());
        self.project(&stored[start..end], features)
    }

    /// Join the features of two data instances with the same objects
    ///
    /// Both operands must have the same number of objects and disjoint
    /// working features. Each resulting object is the left object followed
    /// by the right one.
    pub fn concat(&self, other: &Data) -> Result<Data> {
        let shared: Vec<String> = self
            .features
            .iter()
            .filter(|f| other.features.contains(f))
            .map(ToString::to_string)
            .collect();
        if !shared.is_empty() {
            return Err(Error::SchemaMismatch(format!(
                "Features present in both operands: {}",
                shared.join(", ")
            )));
        }

        let left = self.computed_rows()?;
        let right = other.computed_rows()?;
        if left.len() != right.len() {
            return Err(Error::SchemaMismatch(format!(
                "Cannot concatenate {} objects with {} objects",
                left.len(),
                right.len()
            )));
        }

        let rows = left
            .into_iter()
            .zip(right)
            .map(|(mut l, r)| {
                l.extend(r);
                l
            })
            .collect();
        let features = self.features.iter().chain(&other.features).cloned().collect();
        Data::with_features(rows, features)
    }

    /// Dense numeric view: one row per object, one column per working feature
    pub fn matrix(&self) -> Result<Array2<f64>> {
        let computed = self.computed_rows()?;
        let (n, k) = (computed.len(), self.features.len());
        let mut flat = Vec::with_capacity(n * k);
        for row in &computed {
            for (value, feature) in row.iter().zip(&self.features) {
                flat.push(value.as_f64().ok_or_else(|| {
                    Error::TypeMismatch(format!("Feature {feature} has non-numeric value {value:?}"))
                })?);
            }
        }
        Array2::from_shape_vec((n, k), flat).map_err(|e| Error::InvalidArgument(e.to_string()))
    }

    /// Sliding windows over one linear feature
    ///
    /// Object `k` of the result holds the values at positions `k..k + period`,
    /// described by `period` generic features.
    pub fn get_autoregression_data(&self, feature: &Feature, period: usize) -> Result<Data> {
        if feature.scale().is_categorical() {
            return Err(Error::InvalidArgument(format!(
                "Autoregression requires a linear feature, got {feature}"
            )));
        }
        if period == 0 {
            return Err(Error::InvalidArgument("Period must be greater than 0".into()));
        }

        let values = self.column(feature)?;
        if period > values.len() {
            return Err(Error::InvalidArgument(format!(
                "Period {} exceeds the {} available values",
                period,
                values.len()
            )));
        }

        Data::new(values.windows(period).map(<[Value]>::to_vec).collect())
    }

    /// Randomly split the objects into a sample and its complement
    pub fn split(&self, by: SplitBy) -> Result<(Data, Data)> {
        self.split_with_rng(by, &mut rand::thread_rng())
    }

    /// [`Data::split`] drawing from the given random number generator
    ///
    /// Both partitions keep the original relative order of their objects.
    pub fn split_with_rng<R: Rng + ?Sized>(&self, by: SplitBy, rng: &mut R) -> Result<(Data, Data)> {
        let stored = self.rows()?;
        let n = stored.len();
        let size = match by {
            SplitBy::Size(size) => size,
            SplitBy::Ratio(ratio) => {
                if !(0.0..=1.0).contains(&ratio) {
                    return Err(Error::InvalidArgument(format!(
                        "Ratio must be within [0, 1], got {ratio}"
                    )));
                }
                (ratio * n as f64).round_ties_even() as usize
            }
        };
        if size > n {
            return Err(Error::InvalidArgument(format!(
                "Cannot sample {size} objects out of {n}"
            )));
        }

        let mut selected = vec![false; n];
        for index in rand::seq::index::sample(rng, n, size).into_vec() {
            selected[index] = true;
        }
        let mut sample = Vec::with_capacity(size);
        let mut rest = Vec::with_capacity(n - size);
        for (row, &chosen) in stored.iter().zip(&selected) {
            if chosen {
                sample.push(row);
            } else {
                rest.push(row);
            }
        }

        debug!(sample = sample.len(), rest = rest.len(), "split data");

        Ok((
            self.project(sample, self.features.clone())?,
            self.project(rest, self.features.clone())?,
        ))
    }

    /// Apply `f` to every stored row, lazily for streaming data
    pub(crate) fn map_rows<'a, T: 'a>(
        &'a self,
        mut f: impl FnMut(&[Value]) -> Result<T> + 'a,
    ) -> Result<Sequence<'a, T>> {
        match &self.source {
            ObjectSource::Materialized(rows) => rows
                .iter()
                .map(|row| f(row.as_slice()))
                .collect::<Result<Vec<_>>>()
                .map(Sequence::Materialized),
            ObjectSource::Streaming(stream) => Ok(Sequence::Lazy(Box::new(std::iter::from_fn(
                move || {
                    let next = stream.borrow_mut().next()?;
                    Some(next.and_then(|row| f(row.as_slice())))
                },
            )))),
        }
    }

    /// Stored rows; drains the stream of streaming data
    pub(crate) fn rows(&self) -> Result<Cow<'_, [Row]>> {
        match &self.source {
            ObjectSource::Materialized(rows) => Ok(Cow::Borrowed(rows)),
            ObjectSource::Streaming(stream) => {
                warn!("consuming streaming data for an aggregate operation");
                let mut stream = stream.borrow_mut();
                let rows = stream.by_ref().collect::<Result<Vec<_>>>()?;
                Ok(Cow::Owned(rows))
            }
        }
    }

    /// Working-feature values of every object
    pub(crate) fn computed_rows(&self) -> Result<Vec<Row>> {
        let bound = self.bind(&self.features)?;
        self.rows()?.iter().map(|row| eval_row(&bound, row)).collect()
    }

    fn bind(&self, features: &[Feature]) -> Result<Vec<Bound>> {
        features.iter().map(|f| f.bind(&self.atomic)).collect()
    }

    fn select_features(&self, cols: &ColumnIndex) -> Result<Vec<Feature>> {
        let n = self.features.len();
        match cols {
            ColumnIndex::All => Ok(self.features.clone()),
            ColumnIndex::At(position) => self
                .features
                .get(*position)
                .map(|f| vec![f.clone()])
                .ok_or(Error::IndexOutOfBounds { index: *position, len: n }),
            ColumnIndex::Range(range) => {
                let start = range.start.min(n);
                let end = range.end.clamp(start, n);
                Ok(self.features[start..end].to_vec())
            }
            ColumnIndex::Feature(feature) => self
                .features
                .iter()
                .find(|f| *f == feature)
                .map(|f| vec![f.clone()])
                .ok_or_else(|| Error::FeatureNotFound(feature.to_string())),
        }
    }

    /// New materialized data holding `features` computed over `rows`
    fn project<'r>(&self, rows: impl IntoIterator<Item = &'r Row>, features: Vec<Feature>) -> Result<Data> {
        let bound = self.bind(&features)?;
        let computed = rows
            .into_iter()
            .map(|row| eval_row(&bound, row))
            .collect::<Result<Vec<_>>>()?;
        Data::with_features(computed, features)
    }

    /// Compare feature-aligned values, ignoring feature order
    fn equals(&self, other: &Data) -> Result<bool> {
        if self.features.len() != other.features.len() {
            return Ok(false);
        }
        let Some(positions) = self
            .features
            .iter()
            .map(|f| other.features.iter().position(|g| g == f))
            .collect::<Option<Vec<usize>>>()
        else {
            return Ok(false);
        };

        let left = self.computed_rows()?;
        let right = other.computed_rows()?;
        if left.len() != right.len() {
            return Ok(false);
        }
        Ok(left.iter().zip(&right).all(|(l, r)| {
            positions.iter().enumerate().all(|(i, &j)| l[i] == r[j])
        }))
    }
}

fn eval_row(bound: &[Bound], row: &[Value]) -> Result<Row> {
    bound.iter().map(|b| b.eval(row)).collect()
}

impl PartialEq for Data {
    /// Equal when both hold the same feature set and, aligning features by
    /// equality, the same values object by object. Errors compare unequal.
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl Add for Data {
    type Output = Result<Data>;

    fn add(self, rhs: Data) -> Result<Data> {
        self.concat(&rhs)
    }
}

impl Add<&Data> for &Data {
    type Output = Result<Data>;

    fn add(self, rhs: &Data) -> Result<Data> {
        self.concat(rhs)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("nobjects", &self.nobjects())
            .field("features", &self.features)
            .field("lazy", &self.is_lazy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stream(rows: Vec<Row>) -> impl Iterator<Item = Result<Row>> {
        rows.into_iter().map(Ok)
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn test_objects() {
        let data = Data::new(vec![row![1, 2]]).unwrap();
        let objects = data.objects().unwrap();
        assert!(!objects.is_lazy());
        let objects = objects.into_vec().unwrap();
        assert_eq!(objects, vec![Object::new(row![1, 2])]);
        assert_eq!(objects[0].get("f1"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_objects_stream() {
        let data = Data::from_stream(stream(vec![row![1, 2]]), None).unwrap();
        assert!(data.is_lazy());
        assert_eq!(data.nfeatures(), 2);
        let objects = data.objects().unwrap();
        assert!(objects.is_lazy());
        assert_eq!(objects.into_vec().unwrap(), vec![Object::new(row![1, 2])]);
    }

    #[test]
    fn test_stream_is_one_shot() {
        init_tracing();
        let data = Data::from_stream(stream(vec![row![1], row![2]]), None).unwrap();
        assert_eq!(data.column(&Feature::new("f0")).unwrap(), row![1, 2]);
        assert!(data.objects().unwrap().into_vec().unwrap().is_empty());
    }

    #[test]
    fn test_stream_row_width_checked_on_consumption() {
        let data = Data::from_stream(stream(vec![row![1, 2], row![3]]), None).unwrap();
        let mut objects = data.objects().unwrap().into_iter();
        assert!(objects.next().unwrap().is_ok());
        assert!(objects.next().unwrap().unwrap_err().is_validation());
    }

    #[test]
    fn test_materialize() {
        let data = Data::from_stream(stream(vec![row![1], row![2]]), None)
            .unwrap()
            .materialize()
            .unwrap();
        assert!(!data.is_lazy());
        assert_eq!(data.nobjects(), Some(2));
        assert_eq!(data, Data::new(vec![row![1], row![2]]).unwrap());
    }

    #[test]
    fn test_features_returns_copy() {
        let data = Data::new(vec![row![0]]).unwrap();
        let mut features = data.features();
        features.push(Feature::new("extra"));
        assert_eq!(data.nfeatures(), 1);
        assert_eq!(data.atomic_features(), &[Feature::new("f0")]);
    }

    #[test]
    fn test_push_derived_feature() {
        let a = Feature::linear("a");
        let mut data = Data::with_features(vec![row![0]], vec![a.clone()]).unwrap();
        data.push_feature(&a + 1).unwrap();
        assert_eq!(data.row(0).unwrap(), row![0, 1]);
        assert!(data.push_feature(&a + 1).is_err());
    }

    #[test]
    fn test_set_features_decrease() {
        let mut data = Data::new(vec![row![0, 1]]).unwrap();
        let f0 = data.features()[0].clone();
        data.set_features(vec![f0 - 1]).unwrap();
        assert_eq!(data.objects().unwrap().into_vec().unwrap(), vec![Object::new(row![-1])]);
    }

    #[test]
    fn test_set_features_constant_power() {
        let mut data = Data::new(vec![row![0]]).unwrap();
        let f0 = data.features()[0].clone();
        data.set_features(vec![f0.pow(0)]).unwrap();
        assert_eq!(data.row(0).unwrap(), row![1]);
    }

    #[test]
    fn test_set_features_rejects_duplicates() {
        let mut data = Data::new(vec![row![0]]).unwrap();
        let err = data.set_features(vec![Feature::new("f0"), Feature::new("f0")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateFeatures(_)));
        assert_eq!(data.nfeatures(), 1);
    }

    #[test]
    fn test_init_rejects_similar_features() {
        let err = Data::with_features(vec![row![0, 0]], vec![Feature::new("f0"), Feature::new("f0")])
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_init_rejects_ragged_rows() {
        assert!(Data::new(vec![row![0, 1], row![2]]).is_err());
    }

    #[test]
    fn test_eq() {
        let (f1, f2) = (Feature::new("f1"), Feature::new("f2"));
        let make = |rows: Vec<Row>, features: Vec<Feature>| Data::with_features(rows, features).unwrap();

        assert_eq!(Data::new(vec![row![0, 1]]).unwrap(), Data::new(vec![row![0, 1]]).unwrap());
        assert_eq!(
            make(vec![row![0, 1]], vec![f1.clone(), f2.clone()]),
            make(vec![row![0, 1]], vec![f1.clone(), f2.clone()])
        );
        assert_eq!(
            make(vec![row![0, 1]], vec![f1.clone(), f2.clone()]),
            make(vec![row![1, 0]], vec![f2.clone(), f1.clone()])
        );
        assert_ne!(
            make(vec![row![0, 1]], vec![f1.clone(), f2.clone()]),
            make(vec![row![0, 1]], vec![f2, f1])
        );
    }

    #[test]
    fn test_eq_large_integers() {
        assert_ne!(
            Data::new(vec![row![9_007_199_254_740_993_i64]]).unwrap(),
            Data::new(vec![row![9_007_199_254_740_992_i64]]).unwrap()
        );
    }

    #[test]
    fn test_eq_different_lengths() {
        assert_ne!(
            Data::new(vec![row![0], row![1]]).unwrap(),
            Data::new(vec![row![0]]).unwrap()
        );
    }

    #[test]
    fn test_getitem_one() {
        let data = Data::new(vec![row![0]]).unwrap();
        assert_eq!(data.object_at(0, 0usize).unwrap(), row![0]);
    }

    #[test]
    fn test_getitem() {
        let data = Data::new(vec![row![0, 1], row![2, 3]]).unwrap();
        let features = data.features();
        assert_eq!(data.slice(.., ..).unwrap(), data);
        assert_eq!(data.object_at(0, ..).unwrap(), row![0, 1]);
        assert_eq!(data.row(0).unwrap(), row![0, 1]);
        assert_eq!(data.row(1).unwrap(), row![2, 3]);
        assert_eq!(
            data.slice(.., 0usize).unwrap(),
            Data::with_features(vec![row![0], row![2]], vec![features[0].clone()]).unwrap()
        );
        assert_eq!(
            data.slice(.., 1usize).unwrap(),
            Data::with_features(vec![row![1], row![3]], vec![features[1].clone()]).unwrap()
        );
        assert_eq!(data.slice(1.., ..).unwrap(), Data::new(vec![row![2, 3]]).unwrap());
    }

    #[test]
    fn test_getitem_many() {
        let data = Data::new(vec![row![0, 1, 2]]).unwrap();
        assert_eq!(
            data.slice(.., 0..2).unwrap(),
            Data::with_features(vec![row![0, 1]], data.features()[0..2].to_vec()).unwrap()
        );
        assert_eq!(data.slice(.., 1..10).unwrap().nfeatures(), 2);
        assert_eq!(data.slice(.., ..).unwrap(), data);
    }

    #[test]
    fn test_getitem_feature() {
        let data = Data::with_features(vec![row![0, 1]], vec![Feature::new("f1"), Feature::new("f2")]).unwrap();
        assert_eq!(
            data.slice(.., Feature::new("f1")).unwrap(),
            Data::with_features(vec![row![0]], vec![Feature::new("f1")]).unwrap()
        );
        assert_eq!(
            data.slice(.., Feature::new("f2")).unwrap(),
            Data::with_features(vec![row![1]], vec![Feature::new("f2")]).unwrap()
        );
    }

    #[test]
    fn test_getitem_derived_feature_keeps_values() {
        let mut data = Data::new(vec![row![2], row![3]]).unwrap();
        let squared = data.features()[0].pow(2);
        data.push_feature(squared.clone()).unwrap();
        let selected = data.slice(.., &squared).unwrap();
        assert_eq!(selected.column(&squared).unwrap(), row![4, 9]);
    }

    #[test]
    fn test_getitem_lookup_failures() {
        let data = Data::new(vec![row![0, 1]]).unwrap();
        assert!(data.row(5).unwrap_err().is_lookup());
        assert!(data.object_at(0, 7usize).unwrap_err().is_lookup());
        assert!(data.slice(.., Feature::nominal("f0")).unwrap_err().is_lookup());
    }

    #[test]
    fn test_add_different_number_objects() {
        let left = Data::with_features(vec![row![0], row![1]], vec![Feature::new("f1")]).unwrap();
        let right = Data::with_features(vec![row![1]], vec![Feature::new("f2")]).unwrap();
        assert!(matches!(left + right, Err(Error::SchemaMismatch(_))));
    }

    #[test]
    fn test_add_features_intersected() {
        let left = Data::new(vec![row![0]]).unwrap();
        let right = Data::new(vec![row![1]]).unwrap();
        assert!(matches!(left + right, Err(Error::SchemaMismatch(_))));
    }

    #[test]
    fn test_add() {
        let a = Data::with_features(vec![row![0]], vec![Feature::new("f1")]).unwrap();
        let b = Data::with_features(vec![row![1]], vec![Feature::new("f2")]).unwrap();
        let ab = (&a + &b).unwrap();
        let ba = (&b + &a).unwrap();
        assert_eq!(ab, ba, "Not commutative operation");
        assert_eq!(
            ab,
            Data::with_features(vec![row![0, 1]], vec![Feature::new("f1"), Feature::new("f2")]).unwrap()
        );
        assert_eq!(ab.nfeatures(), 2);
    }

    #[test]
    fn test_get_autoregression_data() {
        let data = Data::new(vec![row![0, 1], row![2, 3], row![4, 5], row![6, 7], row![8, 9]]).unwrap();
        let result = data.get_autoregression_data(&data.features()[0], 3).unwrap();
        let expected = Data::new(vec![row![0, 2, 4], row![2, 4, 6], row![4, 6, 8]]).unwrap();
        assert_eq!(result, expected);
        assert_eq!(result.nfeatures(), 3);
    }

    #[test]
    fn test_get_autoregression_data_period_too_long() {
        let data = Data::new(vec![row![0], row![1]]).unwrap();
        assert!(data.get_autoregression_data(&data.features()[0], 3).unwrap_err().is_validation());
        assert!(data.get_autoregression_data(&data.features()[0], 0).is_err());
    }

    #[test]
    fn test_get_autoregression_data_requires_linear() {
        let data = Data::with_features(vec![row!["a"]], vec![Feature::nominal("x")]).unwrap();
        assert!(data.get_autoregression_data(&Feature::nominal("x"), 1).is_err());
    }

    #[test]
    fn test_matrix() {
        let mut data = Data::new(vec![row![0, 1], row![2, 3], row![4, 5]]).unwrap();
        assert_eq!(
            data.matrix().unwrap(),
            ndarray::array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]
        );

        let f0 = data.features()[0].clone();
        data.push_feature(f0.pow(2)).unwrap();
        assert_eq!(
            data.matrix().unwrap(),
            ndarray::array![[0.0, 1.0, 0.0], [2.0, 3.0, 4.0], [4.0, 5.0, 16.0]]
        );
    }

    #[test]
    fn test_matrix_rejects_strings() {
        let data = Data::with_features(vec![row!["a"]], vec![Feature::nominal("x")]).unwrap();
        assert!(matches!(data.matrix(), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_split_size() {
        let data = Data::new(vec![row![0], row![1], row![2]]).unwrap();
        let (d1, d2) = data.split(SplitBy::Size(1)).unwrap();
        assert_eq!(d1.nobjects(), Some(1));
        assert_eq!(d2.nobjects(), Some(2));
        assert_eq!(d1.features(), data.features());
    }

    #[test]
    fn test_split_ratio() {
        let data = Data::new((0..100).map(|x| row![x]).collect()).unwrap();
        let (d1, d2) = data.split(SplitBy::Ratio(0.05)).unwrap();
        assert_eq!(d1.nobjects(), Some(5));
        assert_eq!(d2.nobjects(), Some(95));
    }

    #[test]
    fn test_split_partitions_objects() {
        let data = Data::new((0..10).map(|x| row![x]).collect()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (d1, d2) = data.split_with_rng(SplitBy::Size(4), &mut rng).unwrap();
        let f0 = Feature::new("f0");
        let mut values: Vec<i64> = d1
            .column(&f0)
            .unwrap()
            .into_iter()
            .chain(d2.column(&f0).unwrap())
            .map(|v| match v {
                Value::Int(i) => i,
                other => panic!("unexpected value {other:?}"),
            })
            .collect();
        values.sort_unstable();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_invalid() {
        let data = Data::new(vec![row![0], row![1]]).unwrap();
        assert!(data.split(SplitBy::Size(3)).is_err());
        assert!(data.split(SplitBy::Ratio(1.5)).is_err());
    }

    proptest! {
        #[test]
        fn prop_concat_commutes(values in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20)) {
            let left = Data::with_features(
                values.iter().map(|(a, _)| row![*a]).collect(),
                vec![Feature::new("a")],
            ).unwrap();
            let right = Data::with_features(
                values.iter().map(|(_, b)| row![*b]).collect(),
                vec![Feature::new("b")],
            ).unwrap();
            prop_assert_eq!((&left + &right).unwrap(), (&right + &left).unwrap());
        }

        #[test]
        fn prop_split_sizes_sum(n in 0usize..50, size in 0usize..50, seed in any::<u64>()) {
            let data = Data::new((0..n).map(|x| row![x as i64]).collect()).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            match data.split_with_rng(SplitBy::Size(size), &mut rng) {
                Ok((d1, d2)) => {
                    prop_assert_eq!(d1.nobjects(), Some(size));
                    prop_assert_eq!(d2.nobjects(), Some(n - size));
                }
                Err(err) => {
                    prop_assert!(size > n);
                    prop_assert!(err.is_validation());
                }
            }
        }

        #[test]
        fn prop_window_count(len in 1usize..30, period in 1usize..30) {
            let data = Data::new((0..len).map(|x| row![x as i64]).collect()).unwrap();
            let result = data.get_autoregression_data(&Feature::new("f0"), period);
            if period <= len {
                let result = result.unwrap();
                prop_assert_eq!(result.nobjects(), Some(len - period + 1));
                prop_assert_eq!(result.nfeatures(), period);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}

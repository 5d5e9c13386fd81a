//! Materialized or lazy sequences produced by evaluation

use std::fmt;

use crate::error::Result;

/// Values computed from a [`Data`](crate::Data) instance
///
/// The variant mirrors the object source of the data the sequence was
/// computed from: materialized data yields [`Sequence::Materialized`], a
/// one-shot stream yields [`Sequence::Lazy`], whose items are computed (and
/// may fail) only when iterated.
pub enum Sequence<'a, T> {
    /// All values computed up front
    Materialized(Vec<T>),

    /// Values computed on iteration
    Lazy(Box<dyn Iterator<Item = Result<T>> + 'a>),
}

impl<'a, T: 'a> Sequence<'a, T> {
    /// Check if values are computed on iteration
    pub fn is_lazy(&self) -> bool {
        matches!(self, Sequence::Lazy(_))
    }

    /// Collect every value, forcing a lazy sequence
    pub fn into_vec(self) -> Result<Vec<T>> {
        match self {
            Sequence::Materialized(values) => Ok(values),
            Sequence::Lazy(iter) => iter.collect(),
        }
    }

    /// Transform every value, keeping the laziness of the sequence
    pub fn map<U: 'a>(self, mut f: impl FnMut(T) -> U + 'a) -> Sequence<'a, U> {
        match self {
            Sequence::Materialized(values) => {
                Sequence::Materialized(values.into_iter().map(f).collect())
            }
            Sequence::Lazy(iter) => Sequence::Lazy(Box::new(iter.map(move |item| item.map(&mut f)))),
        }
    }
}

impl<'a, T: 'a> IntoIterator for Sequence<'a, T> {
    type Item = Result<T>;
    type IntoIter = Box<dyn Iterator<Item = Result<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Sequence::Materialized(values) => Box::new(values.into_iter().map(Ok)),
            Sequence::Lazy(iter) => iter,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Materialized(values) => f.debug_tuple("Materialized").field(values).finish(),
            Sequence::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_materialized_map() {
        let seq = Sequence::Materialized(vec![1, 2]).map(|x| x * 10);
        assert!(!seq.is_lazy());
        assert_eq!(seq.into_vec().unwrap(), vec![10, 20]);
    }

    #[test]
    fn test_lazy_error_surfaces_on_collect() {
        let items: Vec<Result<i32>> = vec![Ok(1), Err(Error::InvalidArgument("bad".into()))];
        let seq = Sequence::Lazy(Box::new(items.into_iter())).map(|x| x + 1);
        assert!(seq.is_lazy());
        assert!(seq.into_vec().is_err());
    }
}

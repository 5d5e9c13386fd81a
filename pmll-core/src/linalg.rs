//! Small dense linear algebra helpers

use ndarray::Array2;

use crate::error::{Error, Result};

/// Pivots smaller than this are treated as zero
const SINGULAR_EPSILON: f64 = 1e-12;

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting
pub(crate) fn invert(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(Error::InvalidArgument(format!(
            "Cannot invert a {}x{} matrix",
            n,
            a.ncols()
        )));
    }

    let mut m = a.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        // Row with the largest magnitude in this column becomes the pivot
        let mut pivot = col;
        for row in (col + 1)..n {
            if m[[row, col]].abs() > m[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if m[[pivot, col]].abs() < SINGULAR_EPSILON {
            return Err(Error::SingularMatrix);
        }

        if pivot != col {
            for j in 0..n {
                m.swap([pivot, j], [col, j]);
                inv.swap([pivot, j], [col, j]);
            }
        }

        let diag = m[[col, col]];
        for j in 0..n {
            m[[col, j]] /= diag;
            inv[[col, j]] /= diag;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                let (dm, dinv) = (factor * m[[col, j]], factor * inv[[col, j]]);
                m[[row, j]] -= dm;
                inv[[row, j]] -= dinv;
            }
        }
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_invert_exact() {
        let a = array![[1.0, 2.0], [2.0, 5.0]];
        assert_eq!(invert(&a).unwrap(), array![[5.0, -2.0], [-2.0, 1.0]]);
    }

    #[test]
    fn test_invert_identity_product() {
        let a = array![[4.0, 7.0, 2.0], [3.0, 6.0, 1.0], [2.0, 5.0, 3.0]];
        let product = a.dot(&invert(&a).unwrap());
        for ((i, j), value) in product.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_singular() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(invert(&a), Err(Error::SingularMatrix)));
    }
}

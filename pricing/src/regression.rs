use log::debug;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PricingErr, Result};

/// Ordinary least squares linear regression with an intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fits `y ≈ x · coef + intercept` by least squares.
    ///
    /// Both sides are centered before solving, so the intercept never competes with the
    /// columns. The centered system is solved through an SVD and yields the minimum-norm
    /// solution when `x` is rank deficient (as one-hot blocks always are once centered).
    ///
    /// # Arguments
    /// * `x` - The design matrix, one row per sample.
    /// * `y` - The target of each sample.
    ///
    /// # Errors
    /// Fails on empty input, mismatched lengths or a non-finite solution.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self> {
        let (n, p) = x.dim();
        if n != y.len() {
            return Err(PricingErr::SizeMismatch {
                a: "x rows",
                b: "y",
                got: n,
                expected: y.len(),
            });
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(PricingErr::EmptyDataset)?;
        let y_mean = y.mean().ok_or(PricingErr::EmptyDataset)?;

        let xc = &x - &x_mean;
        let a = DMatrix::from_fn(n, p, |i, j| xc[[i, j]]);
        let b = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

        // constant columns (or a single row) leave nothing to solve for
        let coef = if xc.iter().all(|v| *v == 0.0) {
            vec![0.0; p]
        } else {
            let svd = a.svd(true, true);
            let s_max = svd.singular_values.max();
            let eps = s_max * n.max(p) as f64 * f64::EPSILON;
            let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
            debug!(rows = n, cols = p, rank = rank; "solving least squares");

            svd.solve(&b, eps).map_err(PricingErr::Solver)?.iter().copied().collect()
        };

        let intercept = y_mean - x_mean.dot(&ArrayView1::from(&coef[..]));

        if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
            return Err(PricingErr::NonFiniteValue {
                what: "the fitted coefficients",
            });
        }

        Ok(Self { coef, intercept })
    }

    pub fn coef(&self) -> &[f64] {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns the number of input columns the model was fitted on.
    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    /// Predicts one value per row of `x`.
    ///
    /// # Errors
    /// Returns `SizeMismatch` if `x` doesn't have `n_features()` columns.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features() {
            return Err(PricingErr::SizeMismatch {
                a: "input columns",
                b: "coefficients",
                got: x.ncols(),
                expected: self.n_features(),
            });
        }

        Ok(x.dot(&ArrayView1::from(&self.coef[..])) + self.intercept)
    }
}

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PricingErr, Result};

/// Removes the mean and scales every column to unit variance.
///
/// The statistics are learned once in `fit` and reused unchanged for every later transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Learns the per-column mean and population standard deviation of `x`.
    ///
    /// Columns with (near) zero variance get a scale of 1 so they map to 0 instead of NaN.
    ///
    /// # Errors
    /// Returns `EmptyDataset` if `x` has no rows.
    pub fn fit(x: ArrayView2<f64>) -> Result<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or(PricingErr::EmptyDataset)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < 10.0 * f64::EPSILON { 1.0 } else { s });

        Ok(Self {
            mean: mean.to_vec(),
            scale: scale.to_vec(),
        })
    }

    /// Returns the number of columns this scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Checks that a deserialized scaler has one finite, positive scale per mean.
    ///
    /// # Errors
    /// Returns `SizeMismatch` if the lengths differ and `NonFiniteValue` for a bad statistic.
    pub fn validate(&self) -> Result<()> {
        if self.scale.len() != self.mean.len() {
            return Err(PricingErr::SizeMismatch {
                a: "scaler scale",
                b: "scaler mean",
                got: self.scale.len(),
                expected: self.mean.len(),
            });
        }

        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(PricingErr::NonFiniteValue { what: "a scaler mean" });
        }

        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(PricingErr::NonFiniteValue { what: "a scaler scale" });
        }

        Ok(())
    }

    /// Standardizes every row of `x`.
    ///
    /// # Errors
    /// Returns `SizeMismatch` if `x` doesn't have as many columns as the fitted data.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(PricingErr::SizeMismatch {
                a: "input columns",
                b: "scaler",
                got: x.ncols(),
                expected: self.n_features(),
            });
        }

        let mean = ArrayView1::from(&self.mean[..]);
        let scale = ArrayView1::from(&self.scale[..]);
        Ok((&x - &mean) / &scale)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn standardizes_to_zero_mean_unit_variance() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let z = scaler.transform(x.view()).unwrap();

        for col in z.columns() {
            assert!(col.mean().unwrap().abs() < 1e-12);
            assert!((col.std(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let x = array![[5.0], [5.0], [5.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        assert_eq!(scaler.scale(), &[1.0]);

        let z = scaler.transform(array![[5.0], [7.0]].view()).unwrap();
        assert_eq!(z, array![[0.0], [2.0]]);
    }

    #[test]
    fn reuses_training_statistics() {
        let scaler = StandardScaler::fit(array![[0.0], [2.0]].view()).unwrap();
        assert_eq!(scaler.mean(), &[1.0]);
        assert_eq!(scaler.scale(), &[1.0]);

        let z = scaler.transform(array![[10.0]].view()).unwrap();
        assert_eq!(z, array![[9.0]]);
    }

    #[test]
    fn rejects_wrong_width() {
        let scaler = StandardScaler::fit(array![[0.0, 1.0]].view()).unwrap();
        let err = scaler.transform(array![[1.0]].view()).unwrap_err();
        assert!(matches!(err, PricingErr::SizeMismatch { got: 1, expected: 2, .. }));
    }

    #[test]
    fn mismatched_statistics_are_invalid() {
        let mut scaler = StandardScaler::fit(array![[0.0, 1.0], [2.0, 3.0]].view()).unwrap();
        assert!(scaler.validate().is_ok());

        scaler.scale.push(1.0);
        let err = scaler.validate().unwrap_err();
        assert!(matches!(err, PricingErr::SizeMismatch { got: 3, expected: 2, .. }));

        scaler.scale = vec![1.0, 0.0];
        assert!(matches!(
            scaler.validate(),
            Err(PricingErr::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn empty_input_fails() {
        let x = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            StandardScaler::fit(x.view()),
            Err(PricingErr::EmptyDataset)
        ));
    }
}

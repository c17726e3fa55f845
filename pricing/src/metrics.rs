use std::fmt;

use ndarray::ArrayView1;

/// Goodness-of-fit figures for a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub samples: usize,
    pub r2: f64,
    pub rmse: f64,
}

impl Scores {
    /// Scores `y_pred` against `y`. Both must have the same length.
    ///
    /// R² is 1 for a perfect fit; when `y` is constant it is 1 for a perfect fit and 0 otherwise.
    pub fn new(y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> Self {
        let samples = y.len();
        let mean = y.mean().unwrap_or_default();

        let ss_res: f64 = y_pred.iter().zip(&y).map(|(p, t)| (t - p).powi(2)).sum();
        let ss_tot: f64 = y.iter().map(|t| (t - mean).powi(2)).sum();

        let r2 = match (ss_tot == 0.0, ss_res == 0.0) {
            (false, _) => 1.0 - ss_res / ss_tot,
            (true, true) => 1.0,
            (true, false) => 0.0,
        };

        let rmse = if samples == 0 {
            0.0
        } else {
            (ss_res / samples as f64).sqrt()
        };

        Self { samples, r2, rmse }
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples={} r2={:.4} rmse={:.2}",
            self.samples, self.r2, self.rmse
        )
    }
}

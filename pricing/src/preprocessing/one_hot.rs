use std::collections::BTreeSet;

use ndarray::ArrayViewMut1;
use serde::{Deserialize, Serialize};

/// One-hot encoder for a single categorical column.
///
/// Categories are the distinct values seen while fitting, kept sorted so the column layout is
/// deterministic. Values never seen while fitting encode as an all-zero block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    /// Learns the set of categories from `values`.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let categories: BTreeSet<&str> = values.into_iter().collect();
        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    /// Returns the number of indicator columns this encoder writes.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether the categories are strictly increasing, which `position` relies on.
    pub fn is_sorted(&self) -> bool {
        self.categories.windows(2).all(|w| w[0] < w[1])
    }

    /// Returns the indicator position of `value`, if it was seen while fitting.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Writes the indicator block of `value` into `out`, which must be `width()` long.
    ///
    /// # Returns
    /// Whether `value` is a known category.
    pub fn encode(&self, value: &str, mut out: ArrayViewMut1<f64>) -> bool {
        out.fill(0.0);
        match self.position(value) {
            Some(idx) => {
                out[idx] = 1.0;
                true
            }
            None => false,
        }
    }
}

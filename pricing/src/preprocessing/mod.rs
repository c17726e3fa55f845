mod one_hot;
mod scaler;

pub use one_hot::OneHotEncoder;
pub use scaler::StandardScaler;

use log::debug;
use ndarray::{Array1, Array2, Axis, s};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PricingErr, Result},
    record::FeatureRecord,
    schema::{CATEGORICAL_FEATURES, NUMERIC_FEATURES},
};

/// Turns feature records into the numeric matrix the regressor is fitted on.
///
/// The output lays out the standardized numeric features first, followed by one one-hot block
/// per categorical feature, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransformer {
    numeric: Vec<String>,
    categorical: Vec<String>,
    scaler: StandardScaler,
    encoders: Vec<OneHotEncoder>,
}

impl FeatureTransformer {
    /// Fits the scaler and one encoder per categorical feature on `records`.
    ///
    /// # Errors
    /// Fails if `records` is empty or a record lacks a feature or holds an unreadable value.
    pub fn fit(records: &[FeatureRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(PricingErr::EmptyDataset);
        }

        let numeric = numeric_matrix(records)?;
        let scaler = StandardScaler::fit(numeric.view())?;

        let encoders = CATEGORICAL_FEATURES
            .iter()
            .map(|f| -> Result<OneHotEncoder> {
                let values = records
                    .iter()
                    .map(|r| r.category(f.name))
                    .collect::<Result<Vec<_>>>()?;
                Ok(OneHotEncoder::fit(values.iter().map(|v| &**v)))
            })
            .collect::<Result<Vec<_>>>()?;

        let transformer = Self {
            numeric: NUMERIC_FEATURES.iter().map(|f| f.name.to_string()).collect(),
            categorical: CATEGORICAL_FEATURES.iter().map(|f| f.name.to_string()).collect(),
            scaler,
            encoders,
        };

        debug!(
            rows = records.len(),
            outputs = transformer.n_outputs();
            "fitted feature transformer"
        );

        Ok(transformer)
    }

    /// Checks that a deserialized transformer matches the schema compiled into this build.
    ///
    /// # Errors
    /// Returns `SchemaMismatch`, `SizeMismatch`, `NonFiniteValue` or `UnsortedCategories`
    /// describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        let expected: Vec<&str> = NUMERIC_FEATURES
            .iter()
            .chain(CATEGORICAL_FEATURES.iter())
            .map(|f| f.name)
            .collect();
        let got: Vec<&str> = self
            .numeric
            .iter()
            .chain(self.categorical.iter())
            .map(String::as_str)
            .collect();

        if expected != got || self.numeric.len() != NUMERIC_FEATURES.len() {
            return Err(PricingErr::SchemaMismatch {
                expected: expected.join(", "),
                got: got.join(", "),
            });
        }

        self.scaler.validate()?;
        if self.scaler.n_features() != self.numeric.len() {
            return Err(PricingErr::SizeMismatch {
                a: "scaler",
                b: "numeric features",
                got: self.scaler.n_features(),
                expected: self.numeric.len(),
            });
        }

        if self.encoders.len() != self.categorical.len() {
            return Err(PricingErr::SizeMismatch {
                a: "encoders",
                b: "categorical features",
                got: self.encoders.len(),
                expected: self.categorical.len(),
            });
        }

        if let Some(name) = self
            .categorical
            .iter()
            .zip(&self.encoders)
            .find_map(|(name, enc)| (!enc.is_sorted()).then_some(name))
        {
            return Err(PricingErr::UnsortedCategories {
                feature: name.clone(),
            });
        }

        Ok(())
    }

    /// Returns the width of the transformed matrix.
    pub fn n_outputs(&self) -> usize {
        self.scaler.n_features() + self.encoders.iter().map(OneHotEncoder::width).sum::<usize>()
    }

    /// Returns a readable name for each output column, e.g. `Size` or `Brand=Hasbro`.
    pub fn output_names(&self) -> Vec<String> {
        let numeric = self.numeric.iter().cloned();
        let one_hot = self
            .categorical
            .iter()
            .zip(&self.encoders)
            .flat_map(|(name, enc)| enc.categories().iter().map(move |c| format!("{name}={c}")));

        numeric.chain(one_hot).collect()
    }

    /// Transforms every record into one row of the output matrix.
    ///
    /// Required features must be present; categories unseen at fit time encode as zeros.
    ///
    /// # Errors
    /// Fails if a record lacks a feature or holds a value that can't be read as its kind.
    pub fn transform(&self, records: &[FeatureRecord]) -> Result<Array2<f64>> {
        let numeric = numeric_matrix(records)?;
        let scaled = self.scaler.transform(numeric.view())?;

        let n_numeric = scaled.ncols();
        let mut out = Array2::<f64>::zeros((records.len(), self.n_outputs()));
        out.slice_mut(s![.., ..n_numeric]).assign(&scaled);

        for (record, mut row) in records.iter().zip(out.axis_iter_mut(Axis(0))) {
            let mut offset = n_numeric;
            for (feature, enc) in CATEGORICAL_FEATURES.iter().zip(&self.encoders) {
                let value = record.category(feature.name)?;
                let end = offset + enc.width();
                enc.encode(&value, row.slice_mut(s![offset..end]));
                offset = end;
            }
        }

        Ok(out)
    }

    /// Transforms a single record.
    pub fn transform_one(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let out = self.transform(std::slice::from_ref(record))?;
        Ok(out.row(0).to_owned())
    }
}

fn numeric_matrix(records: &[FeatureRecord]) -> Result<Array2<f64>> {
    let mut x = Array2::zeros((records.len(), NUMERIC_FEATURES.len()));
    for (record, mut row) in records.iter().zip(x.axis_iter_mut(Axis(0))) {
        for (feature, cell) in NUMERIC_FEATURES.iter().zip(row.iter_mut()) {
            *cell = record.numeric(feature.name)?;
        }
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(category: &str, brand: &str, size: f64, weight: f64) -> FeatureRecord {
        FeatureRecord::new()
            .with("Category", category)
            .with("Brand", brand)
            .with("AgeGroup", "5+")
            .with("Size", size)
            .with("Weight", weight)
            .with("Material", "Plastic")
            .with("Condition", "New")
    }

    fn records() -> Vec<FeatureRecord> {
        vec![
            toy("Doll", "Mattel", 30.0, 0.5),
            toy("Action Figure", "Hasbro", 10.0, 0.2),
            toy("Doll", "Hasbro", 20.0, 0.8),
        ]
    }

    #[test]
    fn output_layout() {
        let t = FeatureTransformer::fit(&records()).unwrap();

        // 2 numeric + 2 categories + 2 brands + 1 + 1 + 1
        assert_eq!(t.n_outputs(), 9);
        assert_eq!(
            t.output_names(),
            vec![
                "Size",
                "Weight",
                "Category=Action Figure",
                "Category=Doll",
                "Brand=Hasbro",
                "Brand=Mattel",
                "AgeGroup=5+",
                "Material=Plastic",
                "Condition=New",
            ]
        );
        assert!(t.validate().is_ok());
    }

    #[test]
    fn known_record_encodes_one_hot_blocks() {
        let t = FeatureTransformer::fit(&records()).unwrap();
        let row = t.transform_one(&toy("Doll", "Hasbro", 20.0, 0.5)).unwrap();

        assert!(row[0].abs() < 1e-12);
        assert_eq!(row.slice(s![2..]).to_vec(), vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn unknown_category_encodes_zeros() {
        let t = FeatureTransformer::fit(&records()).unwrap();
        let row = t
            .transform_one(&toy("Robot", "UnknownBrandXYZ", 20.0, 0.5))
            .unwrap();

        assert_eq!(row.slice(s![2..6]).to_vec(), vec![0.0; 4]);
        assert_eq!(row.slice(s![6..]).to_vec(), vec![1.0; 3]);
    }

    #[test]
    fn missing_feature_fails_transform() {
        let t = FeatureTransformer::fit(&records()).unwrap();
        let mut record = FeatureRecord::new();
        record.insert("Size", 1.0);
        record.insert("Weight", 1.0);

        assert!(matches!(
            t.transform_one(&record),
            Err(PricingErr::MissingFeature { feature: "Category" })
        ));
    }

    #[test]
    fn tampered_schema_is_rejected() {
        let mut t = FeatureTransformer::fit(&records()).unwrap();
        t.numeric[0] = "Size (cm)".to_string();
        assert!(matches!(t.validate(), Err(PricingErr::SchemaMismatch { .. })));
    }
}

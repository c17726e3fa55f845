use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, info};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    error::{PricingErr, Result},
    metrics::Scores,
    preprocessing::FeatureTransformer,
    record::FeatureRecord,
    regression::LinearRegression,
};

/// Version of the on-disk artifact layout. Bump whenever the serialized shape changes.
pub const FORMAT_VERSION: u32 = 1;

/// A fitted feature transformer followed by a fitted linear regression.
///
/// This is the artifact the trainer writes and the predictor loads. It's immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    format_version: u32,
    transformer: FeatureTransformer,
    regressor: LinearRegression,
}

#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

impl Pipeline {
    /// Fits the transformer and then the regressor on `dataset`.
    ///
    /// # Errors
    /// Fails if a record can't be transformed or the least squares solve fails.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        let transformer = FeatureTransformer::fit(dataset.records())?;
        let x = transformer.transform(dataset.records())?;
        let y = ArrayView1::from(dataset.targets());
        let regressor = LinearRegression::fit(x.view(), y)?;

        debug!(
            rows = dataset.len(),
            features = regressor.n_features();
            "fitted pipeline"
        );

        Ok(Self {
            format_version: FORMAT_VERSION,
            transformer,
            regressor,
        })
    }

    pub fn transformer(&self) -> &FeatureTransformer {
        &self.transformer
    }

    pub fn regressor(&self) -> &LinearRegression {
        &self.regressor
    }

    /// Predicts the value of a single toy.
    ///
    /// # Errors
    /// Fails if the record lacks a feature, holds an unreadable value or the result isn't finite.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let predictions = self.predict_batch(std::slice::from_ref(record))?;
        Ok(predictions[0])
    }

    /// Predicts the value of every record, in order.
    pub fn predict_batch(&self, records: &[FeatureRecord]) -> Result<Array1<f64>> {
        let x = self.transformer.transform(records)?;
        let y_pred = self.regressor.predict(x.view())?;

        if y_pred.iter().any(|v| !v.is_finite()) {
            return Err(PricingErr::NonFiniteValue {
                what: "the prediction",
            });
        }

        Ok(y_pred)
    }

    /// Scores the pipeline's predictions against the targets of `dataset`.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Scores> {
        let y_pred = self.predict_batch(dataset.records())?;
        Ok(Scores::new(y_pred.view(), ArrayView1::from(dataset.targets())))
    }

    /// Writes the artifact to `path`, replacing any previous one.
    ///
    /// The artifact is first written next to `path` and then renamed over it, so readers never
    /// observe a partially written file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");

        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }

        fs::rename(&tmp, path)?;
        info!("saved model to {}", path.display());
        Ok(())
    }

    /// Reads an artifact previously written by `save`.
    ///
    /// # Errors
    /// Fails if the file is missing or malformed, was written with another format version, or
    /// doesn't match the feature schema of this build.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let pipeline = Self::from_json(&raw)?;
        info!("loaded model from {}", path.display());
        Ok(pipeline)
    }

    /// Parses and validates an artifact from its JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let Header { format_version } = serde_json::from_str(raw)?;
        if format_version != FORMAT_VERSION {
            return Err(PricingErr::UnsupportedVersion {
                got: format_version,
                expected: FORMAT_VERSION,
            });
        }

        let pipeline: Self = serde_json::from_str(raw)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        self.transformer.validate()?;

        let outputs = self.transformer.n_outputs();
        if self.regressor.n_features() != outputs {
            return Err(PricingErr::SizeMismatch {
                a: "regressor",
                b: "transformer outputs",
                got: self.regressor.n_features(),
                expected: outputs,
            });
        }

        Ok(())
    }
}

use std::path::Path;

use log::{debug, error};
use pricing::{FeatureRecord, Pipeline};

use crate::error::{PredictErr, Result};

/// The prediction service: a loaded pipeline, shared read-only by every request.
///
/// Constructing one is the transition into the ready state; there is no way back short of
/// dropping it.
#[derive(Debug)]
pub struct PredictorService {
    pipeline: Pipeline,
    expose_error_details: bool,
}

impl PredictorService {
    /// Wraps an already loaded pipeline.
    ///
    /// # Arguments
    /// * `pipeline` - The fitted pipeline used for every prediction.
    /// * `expose_error_details` - Whether inference errors carry their full chain to the caller.
    pub fn new(pipeline: Pipeline, expose_error_details: bool) -> Self {
        Self {
            pipeline,
            expose_error_details,
        }
    }

    /// Loads the artifact at `path` and builds the service around it.
    ///
    /// # Errors
    /// Fails if the artifact is missing, corrupt or doesn't match this build's schema.
    pub fn load<P: AsRef<Path>>(path: P, expose_error_details: bool) -> pricing::Result<Self> {
        let pipeline = Pipeline::load(path)?;
        Ok(Self::new(pipeline, expose_error_details))
    }

    /// Estimates the price of the toy described by `record`, rounded to 2 decimals.
    ///
    /// # Errors
    /// Returns `MissingFeatures` if required keys are absent and `Inference` if the pipeline fails.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let missing = record.missing_features();
        if !missing.is_empty() {
            debug!("rejecting record, missing {missing:?}");
            return Err(PredictErr::MissingFeatures(missing));
        }

        match self.pipeline.predict(record) {
            Ok(price) => Ok(round_price(price)),
            Err(e) => {
                let trace = format!("{:?}", anyhow::Error::new(e).context("predicting toy price"));
                error!("Error occurred: {trace}");

                Err(PredictErr::Inference {
                    details: self.expose_error_details.then_some(trace),
                })
            }
        }
    }
}

/// Rounds to 2 decimal places, exact halves to the even cent.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round_ties_even() / 100.0
}

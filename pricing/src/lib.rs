//! Toy price estimation: the feature schema, dataset loading, preprocessing and the linear
//! regression pipeline shared by the trainer and the prediction service.

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod record;
pub mod regression;
pub mod schema;

pub use dataset::Dataset;
pub use error::{PricingErr, Result};
pub use metrics::Scores;
pub use pipeline::Pipeline;
pub use record::FeatureRecord;

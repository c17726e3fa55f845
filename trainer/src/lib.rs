pub mod config;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use pricing::{Dataset, Pipeline, Scores};
use rand::{SeedableRng, rngs::StdRng};

pub use config::TrainerConfig;

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub rows: usize,
    pub features: usize,
    /// Each transformed column's name paired with its fitted coefficient.
    pub coefficients: Vec<(String, f64)>,
    pub intercept: f64,
    pub in_sample: Scores,
    pub holdout: Option<Scores>,
}

/// Loads the dataset, fits the pipeline on every row and writes the artifact.
///
/// When a validation fraction is configured, a separate pipeline is first fitted on a shuffled
/// training split and scored on the held out rows; that pipeline is discarded.
///
/// # Errors
/// Fails if the dataset can't be loaded, the fit fails or the artifact can't be written.
pub fn run(config: &TrainerConfig) -> Result<TrainingReport> {
    let dataset = Dataset::from_csv_path(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
    info!(rows = dataset.len(); "dataset loaded");

    let holdout = if config.validation_fraction > 0.0 {
        evaluate_holdout(&dataset, config)?
    } else {
        None
    };

    let pipeline = Pipeline::fit(&dataset).context("fitting the pipeline")?;
    let in_sample = pipeline.evaluate(&dataset)?;
    let features = pipeline.transformer().n_outputs();
    info!("in-sample fit: {in_sample}, features={features}");

    let regressor = pipeline.regressor();
    let coefficients: Vec<(String, f64)> = pipeline
        .transformer()
        .output_names()
        .into_iter()
        .zip(regressor.coef().iter().copied())
        .collect();
    for (name, coef) in &coefficients {
        debug!("coefficient {name} = {coef:.4}");
    }
    debug!(intercept = regressor.intercept(); "fitted intercept");

    pipeline
        .save(&config.model_path)
        .with_context(|| format!("writing model to {}", config.model_path.display()))?;

    Ok(TrainingReport {
        rows: dataset.len(),
        features,
        coefficients,
        intercept: regressor.intercept(),
        in_sample,
        holdout,
    })
}

fn evaluate_holdout(dataset: &Dataset, config: &TrainerConfig) -> Result<Option<Scores>> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (train, holdout) = match dataset.split(config.validation_fraction, &mut rng) {
        Ok(parts) => parts,
        Err(e) => {
            warn!("skipping holdout evaluation: {e}");
            return Ok(None);
        }
    };

    let pipeline = Pipeline::fit(&train).context("fitting the holdout pipeline")?;
    let scores = pipeline.evaluate(&holdout)?;
    info!("holdout fit: {scores}");
    Ok(Some(scores))
}

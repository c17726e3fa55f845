use std::{env, path::PathBuf};

use anyhow::{Context, Result, bail};

const DEFAULT_DATASET_PATH: &str = "toys_data.csv";
const DEFAULT_MODEL_PATH: &str = "toy_price_model.json";

/// Where the trainer reads from and writes to, and how it evaluates the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    /// Fraction of rows held out for evaluation, `0` disables the holdout run.
    pub validation_fraction: f64,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset_path: DEFAULT_DATASET_PATH.into(),
            model_path: DEFAULT_MODEL_PATH.into(),
            validation_fraction: 0.0,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that can't be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for unset keys.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DATASET_PATH") {
            config.dataset_path = path.into();
        }

        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = path.into();
        }

        if let Some(raw) = lookup("VALIDATION_FRACTION") {
            let fraction: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("VALIDATION_FRACTION is not a number: {raw}"))?;

            if !(0.0..1.0).contains(&fraction) {
                bail!("VALIDATION_FRACTION must be in [0, 1), got {fraction}");
            }
            config.validation_fraction = fraction;
        }

        if let Some(raw) = lookup("SEED") {
            let seed = raw
                .trim()
                .parse()
                .with_context(|| format!("SEED is not an unsigned integer: {raw}"))?;
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

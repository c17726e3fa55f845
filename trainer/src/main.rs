use anyhow::Result;
use log::info;

use trainer::TrainerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainerConfig::from_env()?;
    let report = trainer::run(&config)?;

    info!(
        rows = report.rows,
        features = report.features;
        "model saved as {}",
        config.model_path.display()
    );

    Ok(())
}

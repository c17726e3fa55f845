use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result};
use log::{info, warn};

use predictor::{PredictorService, ServerConfig, routes};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    let service = PredictorService::load(&config.model_path, config.expose_error_details)
        .with_context(|| format!("loading model {}", config.model_path.display()))?;

    if config.expose_error_details {
        warn!("500 responses include internal error details, set EXPOSE_ERROR_DETAILS=false to hide them");
    }

    let service = web::Data::new(service);
    let addr = config.addr();
    info!("listening at {addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}

use actix_cors::Cors;
use actix_web::{
    HttpRequest, post,
    error::JsonPayloadError,
    web::{self, Json},
};
use log::debug;
use pricing::FeatureRecord;
use serde::{Deserialize, Serialize};

use crate::{error::PredictErr, service::PredictorService};

/// Body of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
}

#[post("/predict")]
pub async fn predict(
    service: web::Data<PredictorService>,
    record: Json<FeatureRecord>,
) -> Result<Json<PredictionResponse>, PredictErr> {
    let predicted_price = service.predict(&record)?;
    debug!(predicted_price = predicted_price; "served prediction");
    Ok(Json(PredictionResponse { predicted_price }))
}

/// Registers the prediction route and its JSON extractor settings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(predict);
}

/// Accepts requests from any origin, with any method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("rejecting body: {err}");
        PredictErr::InvalidBody(err.to_string()).into()
    })
}

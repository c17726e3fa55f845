use std::{error::Error, fmt};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

/// The predictor module's result type.
pub type Result<T> = std::result::Result<T, PredictErr>;

/// Request-level failures of the prediction endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictErr {
    /// The record lacks required features, listed in the fixed required order.
    MissingFeatures(Vec<&'static str>),
    /// The body isn't a JSON object.
    InvalidBody(String),
    /// Transforming the record or running the model failed.
    ///
    /// `details` holds the full error chain, unless the service is configured to hide it.
    Inference { details: Option<String> },
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl fmt::Display for PredictErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictErr::MissingFeatures(missing) => {
                let quoted: Vec<String> = missing.iter().map(|m| format!("'{m}'")).collect();
                write!(f, "Missing features: [{}]", quoted.join(", "))
            }
            PredictErr::InvalidBody(_) => write!(f, "Invalid request body"),
            PredictErr::Inference { .. } => write!(f, "An error occurred during prediction"),
        }
    }
}

impl Error for PredictErr {}

impl ResponseError for PredictErr {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictErr::MissingFeatures(_) | PredictErr::InvalidBody(_) => StatusCode::BAD_REQUEST,
            PredictErr::Inference { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            PredictErr::MissingFeatures(_) => None,
            PredictErr::InvalidBody(msg) => Some(msg.clone()),
            PredictErr::Inference { details } => details.clone(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

pub use config::ServerConfig;
pub use error::PredictErr;
pub use service::PredictorService;

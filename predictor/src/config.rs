use std::{env, path::PathBuf};

use anyhow::{Context, Result, bail};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MODEL_PATH: &str = "toy_price_model.json";

/// Immutable startup settings of the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    /// Whether 500 responses carry the internal error chain.
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: DEFAULT_MODEL_PATH.into(),
            expose_error_details: true,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that can't be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }

        if let Some(raw) = lookup("PORT") {
            config.port = raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?;
        }

        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = path.into();
        }

        if let Some(raw) = lookup("EXPOSE_ERROR_DETAILS") {
            config.expose_error_details = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => bail!("EXPOSE_ERROR_DETAILS must be true or false, got {other}"),
            };
        }

        Ok(config)
    }

    /// Returns the `host:port` pair the listener binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:5000");
        assert!(config.expose_error_details);
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("MODEL_PATH", "/models/toys.json"),
            ("EXPOSE_ERROR_DETAILS", "False"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.model_path, PathBuf::from("/models/toys.json"));
        assert!(!config.expose_error_details);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("EXPOSE_ERROR_DETAILS", "maybe")])).is_err());
    }
}

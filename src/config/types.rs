use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::api::{ApiConfig, PaymentsConfig};
use super::logging::LoggingConfig;
use super::store::TokenStoreConfig;

/// Prefix of environment variables overlaid on the YAML file,
/// e.g. `VIEWER_PAYMENTS__PUBLISHABLE_KEY`.
pub const ENV_PREFIX: &str = "VIEWER_";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("payments.publishable_key is required before the client can start")]
    MissingPublishableKey,
    #[error("api.endpoint '{endpoint}' is not a usable http(s) URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("api.token_header '{0}' is not a valid HTTP header name")]
    InvalidTokenHeader(String),
    #[error(
        "invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error"
    )]
    InvalidLogLevel(String),
}

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: API endpoint, payment provider, token store and logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub token_store: TokenStoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigV1 {
    /// Checks the startup preconditions: a publishable payment key, an absolute
    /// http(s) endpoint and a valid token header name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payments.publishable_key.trim().is_empty() {
            return Err(ConfigError::MissingPublishableKey);
        }

        let endpoint = url::Url::parse(&self.api.endpoint).map_err(|e| {
            ConfigError::InvalidEndpoint {
                endpoint: self.api.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.api.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", endpoint.scheme()),
            });
        }

        http::HeaderName::from_bytes(self.api.token_header.as_bytes())
            .map_err(|_| ConfigError::InvalidTokenHeader(self.api.token_header.clone()))?;

        Ok(())
    }
}

/// Extract a `ConfigV1` from an already assembled figment.
pub fn config_from_figment(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = figment.extract::<Config>().map_err(Box::new)?;
    match config {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from a YAML file, with `VIEWER_`-prefixed environment variables
/// layered on top (`__` separates nested keys).
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, ConfigError> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    config_from_figment(figment)
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> String {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TokenStoreBackend, DEFAULT_TOKEN_HEADER, DEFAULT_TOKEN_SLOT};

    const MINIMAL: &str = r#"
version: "1.0.0"
api:
  endpoint: "http://localhost:9000/api"
payments:
  publishable_key: "pk_test_123"
"#;

    fn parse(yaml: &str) -> Result<ConfigV1, ConfigError> {
        config_from_figment(Figment::new().merge(Yaml::string(yaml)))
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(MINIMAL).expect("minimal config should load");
        assert_eq!(config.api.token_header, DEFAULT_TOKEN_HEADER);
        assert!(config.token_store.enabled);
        assert_eq!(config.token_store.backend, TokenStoreBackend::SessionFile);
        assert_eq!(config.token_store.path, None);
        assert_eq!(config.token_store.slot, DEFAULT_TOKEN_SLOT);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_config_is_read() {
        let config = parse(
            r#"
version: "1.0.0"
api:
  endpoint: "https://tinyhouse.example.com/api"
  token_header: "X-Session-Token"
payments:
  publishable_key: "pk_live_abc"
token_store:
  type: session_file
  path: /run/user/1000/tinyhouse
  slot: session
logging:
  level: debug
  format: json
"#,
        )
        .expect("config should load");

        assert_eq!(config.api.token_header, "X-Session-Token");
        assert_eq!(config.token_store.backend, TokenStoreBackend::SessionFile);
        assert_eq!(config.token_store.slot, "session");
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result = parse(
            r#"
version: "2.0.0"
api:
  endpoint: "http://localhost:9000/api"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn missing_publishable_key_fails_validation() {
        let config = parse(
            r#"
version: "1.0.0"
api:
  endpoint: "http://localhost:9000/api"
"#,
        )
        .expect("config should load");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingPublishableKey)
        ));
    }

    #[test]
    fn publishable_key_comes_from_the_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
version: "1.0.0"
api:
  endpoint: "http://localhost:9000/api"
"#,
            )?;
            jail.set_env("VIEWER_PAYMENTS__PUBLISHABLE_KEY", "pk_env");

            let config = load_config("config.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.payments.publishable_key, "pk_env");
            assert!(config.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL)?;
            jail.set_env("VIEWER_API__TOKEN_HEADER", "X-Session-Token");

            let config = load_config("config.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.api.token_header, "X-Session-Token");
            assert_eq!(config.payments.publishable_key, "pk_test_123");
            Ok(())
        });
    }

    #[test]
    fn relative_endpoint_fails_validation() {
        let mut config = parse(MINIMAL).expect("config should load");
        config.api.endpoint = "/api".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn bad_header_name_fails_validation() {
        let mut config = parse(MINIMAL).expect("config should load");
        config.api.token_header = "X CSRF".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTokenHeader(_))
        ));
    }

    #[test]
    fn schema_mentions_every_section() {
        let schema = config_schema();
        for section in ["api", "payments", "token_store", "logging"] {
            assert!(schema.contains(section), "schema is missing '{}'", section);
        }
    }
}

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::{LoggerError, Result, UserId};

pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logger: LoggerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Request logging options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Emit structured records instead of positional text lines.
    pub json: bool,
    /// Take the client address from `X-Forwarded-For`.
    pub trust_proxy: bool,
    /// Largest JSON request body buffered to populate the logged input.
    pub max_input_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// API key to user id.
    pub api_keys: HashMap<String, UserId>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            json: false,
            trust_proxy: false,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl Config {
    /// Loads `CONFIG_PATH` (YAML) when set, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(|e| LoggerError::config(e.to_string()))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| LoggerError::config(format!("invalid SERVER_PORT: {port}")))?;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logger.json = parse_flag("LOG_JSON", &json)?;
        }
        if let Some(trust_proxy) = lookup("LOG_TRUST_PROXY") {
            self.logger.trust_proxy = parse_flag("LOG_TRUST_PROXY", &trust_proxy)?;
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(LoggerError::config(format!("invalid {key}: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| pairs.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(!config.logger.json);
        assert!(!config.logger.trust_proxy);
        assert_eq!(config.logger.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(config.server.port, 8080);
        assert!(config.auth.api_keys.is_empty());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml(
            r#"
logger:
  json: true
auth:
  api_keys:
    secret: 7
    other: "svc-reports"
"#,
        )
        .unwrap();

        assert!(config.logger.json);
        assert_eq!(config.logger.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.api_keys["secret"], UserId::Int(7));
        assert_eq!(config.auth.api_keys["other"], UserId::Str("svc-reports".into()));
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        let result = Config::from_yaml("server:\n  port: not-a-port\n");
        assert!(matches!(result, Err(LoggerError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("SERVER_PORT", "9000"),
                ("LOG_JSON", "true"),
                ("LOG_TRUST_PROXY", "1"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(config.logger.json);
        assert!(config.logger.trust_proxy);
    }

    #[test]
    fn test_env_rejects_bad_flag() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("LOG_JSON", "maybe")]));

        assert!(matches!(result, Err(LoggerError::Config(_))));
    }
}

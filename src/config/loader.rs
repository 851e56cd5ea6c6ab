//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Command-line and environment overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub backend_url: Option<String>,
}

/// Load the configuration file if given (defaults otherwise), apply overrides
/// and validate the result.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<ProxyConfig, ConfigError> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(ConfigError::Io)?,
        None => String::new(),
    };
    parse_config(&content, overrides)
}

/// Parse TOML text, apply overrides and validate the result.
///
/// Empty text yields the built-in defaults.
pub fn parse_config(content: &str, overrides: Overrides) -> Result<ProxyConfig, ConfigError> {
    let mut config: ProxyConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    if let Some(bind_address) = overrides.bind_address {
        config.listener.bind_address = bind_address;
    }
    if let Some(backend_url) = overrides.backend_url {
        config.backend.url = backend_url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        fs::write(&path, "[backend]\nurl = \"http://file.example.com\"\n").unwrap();

        let config = resolve_config(
            Some(&path),
            Overrides {
                bind_address: Some("127.0.0.1:7000".into()),
                backend_url: Some("http://env.example.com:8443".into()),
            },
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.backend.url, "http://env.example.com:8443");
    }

    #[test]
    fn invalid_override_is_reported() {
        let err = resolve_config(
            None,
            Overrides {
                bind_address: None,
                backend_url: Some("not a url".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("backend.url"));
    }

    #[test]
    fn example_config_is_valid() {
        let config = parse_config(include_str!("../../gateway.toml"), Overrides::default()).unwrap();
        assert_eq!(config.backend.timeout_secs, 300);
        assert_eq!(config.proxy.path_prefix, "/api");
    }

    #[test]
    fn no_file_means_defaults() {
        let config = resolve_config(None, Overrides::default()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.backend.url, "https://test93.p4books.cloud");
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            parse_config("[backend", Overrides::default()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = resolve_config(Some(Path::new("/definitely/not/here.toml")), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

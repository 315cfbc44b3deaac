//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid config file syntax")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("portico.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("Failed to read"));
        assert!(display.contains("portico.toml"));

        let validation_err = ConfigError::Validation("bad field".to_string());
        assert!(format!("{validation_err}").contains("bad field"));
    }
}

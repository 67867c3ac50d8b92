//! Configuration loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, Result};

/// Tuning configuration for the mapping core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Number of encrypted field names grouped into a single decryption
    /// collaborator call (default: 20). Bounds the payload of each call;
    /// a row with more qualifying fields is decrypted in multiple calls.
    #[serde(default = "default_decrypt_batch_size")]
    pub decrypt_batch_size: usize,
}

fn default_decrypt_batch_size() -> usize {
    20
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            decrypt_batch_size: default_decrypt_batch_size(),
        }
    }
}

impl MapperConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.decrypt_batch_size == 0 {
            return Err(MapperError::configuration(
                "decrypt_batch_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_batch_size() {
        let config = MapperConfig::default();
        assert_eq!(config.decrypt_batch_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let config = MapperConfig::from_yaml("decrypt_batch_size: 5").unwrap();
        assert_eq!(config.decrypt_batch_size, 5);
    }

    #[test]
    fn test_from_yaml_defaults_missing_fields() {
        let config = MapperConfig::from_yaml("{}").unwrap();
        assert_eq!(config.decrypt_batch_size, 20);
    }

    #[test]
    fn test_zero_batch_size_is_configuration_error() {
        let err = MapperConfig::from_yaml("decrypt_batch_size: 0").unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decrypt_batch_size: 8").unwrap();

        let config = MapperConfig::load(file.path()).unwrap();
        assert_eq!(config.decrypt_batch_size, 8);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = MapperConfig::load("/nonexistent/mapper.yaml").unwrap_err();
        assert!(matches!(err, MapperError::Io(_)));
    }
}

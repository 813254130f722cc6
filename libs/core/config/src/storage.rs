use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

/// Which product store backs the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile store, lost on restart
    Memory,
    /// JSON document on local disk
    File(PathBuf),
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File(_) => "file",
        }
    }
}

/// Store selection loaded from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl FromEnv for StorageConfig {
    /// Reads from environment variables:
    /// - CATALOG_STORE: `memory` (default) or `file`
    /// - CATALOG_DATA_FILE: defaults to `data/products.json`, used by `file`
    fn from_env() -> Result<Self, ConfigError> {
        let kind = env_or_default("CATALOG_STORE", "memory");

        let backend = match kind.trim().to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => {
                let path = env_or_default("CATALOG_DATA_FILE", "data/products.json");
                StorageBackend::File(PathBuf::from(path))
            }
            other => {
                return Err(ConfigError::ParseError {
                    key: "CATALOG_STORE".to_string(),
                    details: format!("unknown store '{}', expected 'memory' or 'file'", other),
                })
            }
        };

        Ok(Self { backend })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults_to_memory() {
        temp_env::with_vars(
            [("CATALOG_STORE", None::<&str>), ("CATALOG_DATA_FILE", None)],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Memory);
                assert_eq!(config.backend.name(), "memory");
            },
        );
    }

    #[test]
    fn test_storage_file_uses_default_path() {
        temp_env::with_vars(
            [("CATALOG_STORE", Some("File")), ("CATALOG_DATA_FILE", None)],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(
                    config.backend,
                    StorageBackend::File(PathBuf::from("data/products.json"))
                );
            },
        );
    }

    #[test]
    fn test_storage_file_custom_path() {
        temp_env::with_vars(
            [
                ("CATALOG_STORE", Some("file")),
                ("CATALOG_DATA_FILE", Some("/var/lib/catalog/products.json")),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(
                    config.backend,
                    StorageBackend::File(PathBuf::from("/var/lib/catalog/products.json"))
                );
            },
        );
    }

    #[test]
    fn test_storage_unknown_backend_is_rejected() {
        temp_env::with_var("CATALOG_STORE", Some("postgres"), || {
            let err = StorageConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("CATALOG_STORE"));
        });
    }
}

//! Service configuration.
//!
//! Provides upload limits, credential generation settings and the location
//! of the role policy. Configuration is loaded from environment variables
//! with sensible defaults for local development.

use pushboard_org::keys::API_KEY_LENGTH;
use pushboard_rbac::{RbacError, RoleTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// The role policy file could not be read.
    #[error("Failed to read role policy {path}: {message}")]
    PolicyFile {
        /// Path that was read.
        path: String,
        /// I/O error message.
        message: String,
    },

    /// The role policy file was read but is not a valid policy.
    #[error("Invalid role policy: {0}")]
    Policy(#[from] RbacError),
}

/// Configuration for the Pushboard services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppsConfig {
    /// Length of generated API keys and secrets.
    pub api_key_length: usize,

    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: u64,

    /// Length of the random prefix added to uploaded file names.
    pub upload_prefix_length: usize,

    /// JSON role policy to load instead of the built-in segments policy.
    pub role_policy_path: Option<String>,

    /// Base URL images are served from.
    pub image_base_url: String,
}

impl Default for AppsConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            api_key_length: API_KEY_LENGTH,
            max_upload_bytes: 10 * 1024 * 1024,
            upload_prefix_length: 10,
            role_policy_path: None,
            image_base_url: "http://localhost:3000/uploads".to_string(),
        }
    }
}

impl AppsConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PUSHBOARD_API_KEY_LENGTH`: Generated key length (default: 20)
    /// - `PUSHBOARD_UPLOAD_MAX_BYTES`: Upload size limit (default: 10 MiB)
    /// - `PUSHBOARD_UPLOAD_PREFIX_LENGTH`: Random file name prefix length (default: 10)
    /// - `PUSHBOARD_ROLE_POLICY_PATH`: JSON role policy file (default: built-in)
    /// - `PUSHBOARD_IMAGE_BASE_URL`: Image URL base (default: http://localhost:3000/uploads)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_key_length: std::env::var("PUSHBOARD_API_KEY_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.api_key_length),
            max_upload_bytes: std::env::var("PUSHBOARD_UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_upload_bytes),
            upload_prefix_length: std::env::var("PUSHBOARD_UPLOAD_PREFIX_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.upload_prefix_length),
            role_policy_path: std::env::var("PUSHBOARD_ROLE_POLICY_PATH")
                .ok()
                .filter(|s| !s.is_empty()),
            image_base_url: std::env::var("PUSHBOARD_IMAGE_BASE_URL")
                .unwrap_or(default.image_base_url),
        }
    }

    /// Check that the values can be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key_length < 16 {
            return Err(ConfigError::InvalidValue {
                key: "PUSHBOARD_API_KEY_LENGTH".to_string(),
                message: format!("must be at least 16, got {}", self.api_key_length),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PUSHBOARD_UPLOAD_MAX_BYTES".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Build the role table: the configured policy file, or the built-in
    /// segments policy when none is configured.
    pub fn load_role_table(&self) -> Result<RoleTable, ConfigError> {
        match &self.role_policy_path {
            None => Ok(RoleTable::segments_default()),
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFile {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(RoleTable::from_json(&json)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushboard_rbac::{Role, SEGMENTS_ROUTE};

    #[test]
    fn test_default_config() {
        let config = AppsConfig::default();
        assert_eq!(config.api_key_length, 20);
        assert_eq!(config.upload_prefix_length, 10);
        assert!(config.role_policy_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_keys() {
        let mut config = AppsConfig::default();
        config.api_key_length = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_default_role_table() {
        let table = AppsConfig::default().load_role_table().unwrap();
        assert!(table.is_method_allowed(Role::User, SEGMENTS_ROUTE, pushboard_rbac::Method::Get));
    }

    #[test]
    fn test_role_table_from_file() {
        let path = std::env::temp_dir().join(format!("pushboard-policy-{}.json", uuid::Uuid::now_v7()));
        std::fs::write(
            &path,
            r#"[{ "role": "guest", "rules": [{ "resource_pattern": "/api/status", "methods": ["get"] }] }]"#,
        )
        .unwrap();

        let config = AppsConfig {
            role_policy_path: Some(path.to_string_lossy().into_owned()),
            ..AppsConfig::default()
        };
        let table = config.load_role_table().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(table.is_method_allowed(Role::Guest, "/api/status", pushboard_rbac::Method::Get));
        assert!(!table.has_role(Role::User));
    }

    #[test]
    fn test_role_table_missing_file() {
        let config = AppsConfig {
            role_policy_path: Some("/nonexistent/pushboard/policy.json".to_string()),
            ..AppsConfig::default()
        };
        assert!(matches!(
            config.load_role_table(),
            Err(ConfigError::PolicyFile { .. })
        ));
    }
}

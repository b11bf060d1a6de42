//! # Configuration
//!
//! Layered client configuration, lowest precedence first:
//!
//! 1. Built-in defaults (`http://localhost:8000/api`, no token, no identity)
//! 2. TOML file (`--config <path>`, or `ward.toml` in the working directory if present)
//! 3. Environment: `WARD_URL`, `WARD_TOKEN`, `WARD_IDENTITY`
//! 4. Command-line flags
//!
//! ```toml
//! base_url = "https://ward.example.com/api"
//! token = "eyJhbGciOi..."
//! identity = "ops@example.com"
//! ```

use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;

/// Backend root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ward.toml";

/// Maximum config file size (64 KiB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Client configuration after all layers are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WardConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub identity: Option<String>,
}

impl WardConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, AppError> {
        toml::from_str(contents).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load the file layer.
    ///
    /// An explicit path must exist. Without one, `ward.toml` is used when
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply the environment layer from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply the environment layer from an arbitrary lookup.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env_from(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            base_url: get("WARD_URL").or(self.base_url),
            token: get("WARD_TOKEN").or(self.token),
            identity: get("WARD_IDENTITY").or(self.identity),
        }
    }

    /// Apply the command-line layer.
    #[must_use]
    pub fn with_overrides(
        self,
        base_url: Option<String>,
        token: Option<String>,
        identity: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.or(self.base_url),
            token: token.or(self.token),
            identity: identity.or(self.identity),
        }
    }

    /// The effective backend root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = WardConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn toml_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "base_url = \"https://ward.example.com/api\"\nidentity = \"a@x.com\""
        )
        .expect("write");

        let config = WardConfig::load(Some(file.path())).expect("load");

        assert_eq!(config.base_url(), "https://ward.example.com/api");
        assert_eq!(config.identity.as_deref(), Some("a@x.com"));
        assert!(config.token.is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = WardConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = WardConfig::from_toml_str("base_url = \"http://h\"\nretries = 3\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let file = WardConfig::from_toml_str("base_url = \"http://file\"\ntoken = \"file-token\"\n")
            .expect("parse");
        let env: HashMap<&str, &str> =
            HashMap::from([("WARD_URL", "http://env"), ("WARD_TOKEN", "")]);

        let config = file
            .with_env_from(|k| env.get(k).map(|v| (*v).to_string()))
            .with_overrides(None, None, Some("flag@x.com".to_string()));

        assert_eq!(config.base_url(), "http://env");
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(config.identity.as_deref(), Some("flag@x.com"));

        let config = config.with_overrides(Some("http://flag".to_string()), None, None);
        assert_eq!(config.base_url(), "http://flag");
    }
}

use crate::constants::{
    DEFAULT_CREDENTIALS_FILE, PROVIDER_KEY_COLUMN, RADIUS_API_URL,
};
use crate::error::{EnrichError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run configuration, read from `radius_zips.toml`.
///
/// ```toml
/// [lookup]
/// delay_ms = 250
///
/// [[providers]]
/// file = "providers/standard.csv"
/// label_column = "provider_name"
/// output_column = "standard_providers"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub providers: Vec<ProviderTable>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    pub url: String,
    pub credentials: PathBuf,
    pub cache_dir: PathBuf,
    pub timeout_seconds: u64,
    /// Pause after every remote request, to stay under the service's rate limit
    pub delay_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: RADIUS_API_URL.to_string(),
            credentials: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            cache_dir: PathBuf::from("."),
            timeout_seconds: 30,
            delay_ms: 0,
        }
    }
}

/// An auxiliary table joined onto the output by zip code.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderTable {
    pub file: PathBuf,
    pub label_column: String,
    #[serde(default = "default_key_column")]
    pub key_column: String,
    pub output_column: Option<String>,
}

fn default_key_column() -> String {
    PROVIDER_KEY_COLUMN.to_string()
}

impl ProviderTable {
    pub fn new(file: impl Into<PathBuf>, label_column: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            label_column: label_column.into(),
            key_column: default_key_column(),
            output_column: None,
        }
    }

    pub fn with_key_column(mut self, key_column: impl Into<String>) -> Self {
        self.key_column = key_column.into();
        self
    }

    pub fn with_output_column(mut self, output_column: impl Into<String>) -> Self {
        self.output_column = Some(output_column.into());
        self
    }

    /// Name of the column written to the output table
    pub fn output_name(&self) -> &str {
        self.output_column.as_deref().unwrap_or(&self.label_column)
    }
}

impl Config {
    /// Parse a config file. Relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EnrichError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: Config = toml::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        debug!(
            "Loaded config from {} with {} provider tables",
            path.display(),
            config.providers.len()
        );
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.lookup.credentials);
        resolve(&mut self.lookup.cache_dir);
        for provider in &mut self.providers {
            resolve(&mut provider.file);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.lookup.url, RADIUS_API_URL);
        assert_eq!(config.lookup.credentials, PathBuf::from("secrets.json"));
        assert_eq!(config.lookup.delay_ms, 0);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radius_zips.toml");
        fs::write(
            &path,
            r#"
[lookup]
cache_dir = "state"
delay_ms = 250

[[providers]]
file = "standard.csv"
label_column = "provider_name"
output_column = "standard_providers"

[[providers]]
file = "/srv/data/premium.csv"
label_column = "name"
key_column = "zip"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.lookup.cache_dir, dir.path().join("state"));
        assert_eq!(config.lookup.credentials, dir.path().join("secrets.json"));
        assert_eq!(config.lookup.timeout_seconds, 30);
        assert_eq!(config.lookup.delay_ms, 250);

        let standard = &config.providers[0];
        assert_eq!(standard.file, dir.path().join("standard.csv"));
        assert_eq!(standard.key_column, "zip_code");
        assert_eq!(standard.output_name(), "standard_providers");

        let premium = &config.providers[1];
        assert_eq!(premium.file, PathBuf::from("/srv/data/premium.csv"));
        assert_eq!(premium.key_column, "zip");
        assert_eq!(premium.output_name(), "name");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, EnrichError::Config(_)));
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("radius_zips.toml")).unwrap();
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radius_zips.toml");
        fs::write(&path, "[lookup]\nradius = 5\n").unwrap();
        assert!(matches!(Config::load(&path).unwrap_err(), EnrichError::Toml(_)));
    }
}

//! Registry and catalog configuration, loaded from TOML.
//!
//! ```toml
//! [registry]
//! allow_late_registration = false
//!
//! [catalog]
//! builtins = true
//! categories = ["finance", "health"]
//! ```
use crate::calculators;
use crate::store::{Registry, RegistryError};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Set to `1` or `true` to enable late registration regardless of the file.
pub const ENV_ALLOW_LATE_REGISTRATION: &str = "CALC_CATALOG_ALLOW_LATE_REGISTRATION";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Invalid config: {0}")]
    Parse(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Keep accepting registrations after the registry is sealed (hot reload).
    pub allow_late_registration: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuiltinsConfig {
    pub builtins: bool,
    /// Only register built-ins in these categories. `None` registers all of them.
    pub categories: Option<Vec<String>>,
}

impl Default for BuiltinsConfig {
    fn default() -> Self {
        Self { builtins: true, categories: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub registry: RegistryConfig,
    pub catalog: BuiltinsConfig,
}

impl CatalogConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        Ok(config.with_env_overrides(|k| std::env::var(k).ok()))
    }

    /// Applies overrides from `lookup`, which is `std::env::var` outside of tests.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_ALLOW_LATE_REGISTRATION) {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.registry.allow_late_registration = true,
                "0" | "false" | "no" => self.registry.allow_late_registration = false,
                _ => {}
            }
        }
        self
    }
}

/// Constructs, populates and seals a registry. Any registration error aborts the build.
pub fn build_registry(config: &CatalogConfig) -> Result<Registry, ConfigError> {
    build_registry_with(config, |_| Ok(()))
}

/// Like `build_registry`, with a hook that registers additional calculators before sealing.
pub fn build_registry_with<F>(config: &CatalogConfig, extra: F) -> Result<Registry, ConfigError>
where
    F: FnOnce(&Registry) -> Result<(), RegistryError>,
{
    let registry = if config.registry.allow_late_registration {
        Registry::with_late_registration()
    } else {
        Registry::new()
    };

    if config.catalog.builtins {
        calculators::register_categories(&registry, config.catalog.categories.as_deref())?;
    }
    extra(&registry)?;
    registry.seal();
    info!(
        calculators = registry.len(),
        late_registration = registry.allows_late_registration(),
        "calculator catalog ready"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CalculatorDescriptor;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert!(config.catalog.builtins);
        assert!(!config.registry.allow_late_registration);
    }

    #[test]
    fn test_parse_sections() {
        let config = CatalogConfig::from_toml_str(
            r#"
            [registry]
            allow_late_registration = true

            [catalog]
            categories = ["health"]
            "#,
        )
        .unwrap();
        assert!(config.registry.allow_late_registration);
        assert_eq!(config.catalog.categories, Some(vec!["health".to_string()]));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CatalogConfig::from_toml_str("[registry]\nallow_late = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_override() {
        let config = CatalogConfig::default()
            .with_env_overrides(|k| (k == ENV_ALLOW_LATE_REGISTRATION).then(|| "TRUE".to_string()));
        assert!(config.registry.allow_late_registration);

        let unchanged = CatalogConfig::default().with_env_overrides(|_| Some("maybe".to_string()));
        assert!(!unchanged.registry.allow_late_registration);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\nbuiltins = false").unwrap();
        let config = CatalogConfig::load(file.path()).unwrap();
        assert!(!config.catalog.builtins);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_build_registry_seals() {
        let registry = build_registry(&CatalogConfig::default()).unwrap();
        assert!(registry.is_sealed());
        assert_eq!(registry.len(), 5);
        let late = registry.register(
            calculators::bmi::descriptor(),
            calculators::bmi::BmiCalculator::new(),
        );
        assert!(late.is_err());
    }

    #[test]
    fn test_build_registry_aborts_on_duplicate() {
        let err = build_registry_with(&CatalogConfig::default(), |reg| {
            reg.register(
                CalculatorDescriptor::new("bmi", "Another BMI", "health"),
                calculators::bmi::BmiCalculator::new(),
            )
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Registry(RegistryError::DuplicateId(ref id)) if id == "bmi"
        ));
    }
}

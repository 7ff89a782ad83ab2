//! Configuration for starting the embedded JVM.
//!
//! This module provides [`JvmConfig`] and its builder. The configuration
//! decides which classpath sources are assembled (user-supplied entries,
//! bundled jars, plugin-package jars, the system classpath) and which VM
//! options are passed on start.
//!
//! # Example
//!
//! ```
//! use weka_bridge::JvmConfig;
//!
//! let config = JvmConfig::builder()
//!     .class_path("/opt/extra/my-filters.jar")
//!     .packages(true)
//!     .max_heap_size("2g")
//!     .build()
//!     .expect("valid config");
//!
//! assert!(config.bundled);
//! ```

use crate::error::{Result, ResultExt, WekaError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the embedded JVM.
///
/// Use [`JvmConfig::builder()`] to create a new configuration with a fluent API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JvmConfig {
    /// Additional classpath entries, added before everything else.
    /// Default: empty
    pub class_path: Vec<PathBuf>,

    /// Whether to add the jars from the bundled library directory.
    /// Default: true
    pub bundled: bool,

    /// Explicit bundled library directory.
    /// If None, `WEKA_BRIDGE_LIB_DIR`, `lib/` next to the executable and the
    /// crate's own `lib/` directory are tried in that order.
    /// Default: None
    pub bundled_dir: Option<PathBuf>,

    /// Whether to add the jars of installed Weka packages.
    /// A `weka_home` enables them as well, see [`packages_enabled`](Self::packages_enabled).
    /// Default: false
    pub packages: bool,

    /// Alternative Weka home directory (the parent of `packages/`).
    /// If None, `WEKA_HOME` or `~/.wekafiles` is used.
    /// Setting it implies `packages`.
    /// Default: None
    pub weka_home: Option<PathBuf>,

    /// Whether to append the entries of the `CLASSPATH` environment variable.
    /// Default: false
    pub system_classpath: bool,

    /// Maximum heap size (the `-Xmx` parameter, e.g. `512m` or `4g`).
    /// Default: None (JVM default)
    pub max_heap_size: Option<String>,
}

impl Default for JvmConfig {
    fn default() -> Self {
        Self {
            class_path: Vec::new(),
            bundled: true,
            bundled_dir: None,
            packages: false,
            weka_home: None,
            system_classpath: false,
            max_heap_size: None,
        }
    }
}

impl JvmConfig {
    /// Create a new configuration builder.
    pub fn builder() -> JvmConfigBuilder {
        JvmConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .context(format!("Failed to read config {}", path.display()))?;
        let config: JvmConfig = serde_json::from_str(&text)?;
        config
            .validate()
            .map_err(|e| WekaError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Whether package jars go on the classpath: `packages` is set or a
    /// `weka_home` is given.
    pub fn packages_enabled(&self) -> bool {
        self.packages || self.weka_home.is_some()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if let Some(ref heap) = self.max_heap_size {
            if !is_valid_heap_size(heap) {
                return Err(ConfigValidationError::InvalidHeapSize(heap.clone()));
            }
        }

        if let Some(entry) = self.class_path.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(ConfigValidationError::EmptyClassPathEntry(
                entry.display().to_string(),
            ));
        }

        Ok(())
    }

    /// The VM option for the configured heap size, if any.
    pub(crate) fn heap_option(&self) -> Option<String> {
        self.max_heap_size.as_ref().map(|size| format!("-Xmx{}", size))
    }
}

/// `-Xmx` accepts a number with an optional k/m/g unit suffix.
fn is_valid_heap_size(size: &str) -> bool {
    let digits = size.strip_suffix(['k', 'K', 'm', 'M', 'g', 'G']).unwrap_or(size);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid max heap size '{0}' (expected e.g. 512m or 4g)")]
    InvalidHeapSize(String),

    #[error("Empty classpath entry: '{0}'")]
    EmptyClassPathEntry(String),
}

/// Builder for [`JvmConfig`].
#[derive(Debug, Default)]
pub struct JvmConfigBuilder {
    config: JvmConfig,
}

impl JvmConfigBuilder {
    /// Append one user-supplied classpath entry.
    pub fn class_path(mut self, entry: impl Into<PathBuf>) -> Self {
        self.config.class_path.push(entry.into());
        self
    }

    /// Append several user-supplied classpath entries.
    pub fn class_paths<I, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config
            .class_path
            .extend(entries.into_iter().map(Into::into));
        self
    }

    /// Set whether bundled jars are added.
    pub fn bundled(mut self, bundled: bool) -> Self {
        self.config.bundled = bundled;
        self
    }

    /// Set the bundled library directory.
    pub fn bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.bundled_dir = Some(dir.into());
        self
    }

    /// Set whether Weka package jars are added.
    pub fn packages(mut self, packages: bool) -> Self {
        self.config.packages = packages;
        self
    }

    /// Use an alternative Weka home directory; implies `packages(true)`.
    pub fn weka_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.config.weka_home = Some(home.into());
        self.config.packages = true;
        self
    }

    /// Set whether the system `CLASSPATH` is appended.
    pub fn system_classpath(mut self, system_classpath: bool) -> Self {
        self.config.system_classpath = system_classpath;
        self
    }

    /// Set the maximum heap size (e.g. `512m`, `4g`).
    pub fn max_heap_size(mut self, size: impl Into<String>) -> Self {
        self.config.max_heap_size = Some(size.into());
        self
    }

    /// Build the configuration, validating it.
    pub fn build(self) -> Result<JvmConfig> {
        self.config
            .validate()
            .map_err(|e| WekaError::InvalidConfig(e.to_string()))?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JvmConfig::default();
        assert!(config.class_path.is_empty());
        assert!(config.bundled);
        assert!(!config.packages);
        assert!(!config.system_classpath);
        assert!(config.max_heap_size.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = JvmConfig::builder()
            .class_path("a.jar")
            .class_paths(["b.jar", "c.jar"])
            .bundled(false)
            .system_classpath(true)
            .max_heap_size("512m")
            .build()
            .unwrap();

        assert_eq!(
            config.class_path,
            vec![
                PathBuf::from("a.jar"),
                PathBuf::from("b.jar"),
                PathBuf::from("c.jar")
            ]
        );
        assert!(!config.bundled);
        assert!(config.system_classpath);
        assert_eq!(config.heap_option().as_deref(), Some("-Xmx512m"));
    }

    #[test]
    fn test_weka_home_enables_packages() {
        let config = JvmConfig::builder().weka_home("/tmp/wh").build().unwrap();
        assert!(config.packages);
        assert_eq!(config.weka_home, Some(PathBuf::from("/tmp/wh")));
    }

    #[test]
    fn test_weka_home_in_json_enables_packages() {
        let config: JvmConfig = serde_json::from_str(r#"{"weka_home": "/tmp/wh"}"#).unwrap();
        assert!(!config.packages);
        assert!(config.packages_enabled());

        let config: JvmConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.packages_enabled());
    }

    #[test]
    fn test_heap_size_validation() {
        for valid in ["512m", "4g", "4G", "1024", "64k"] {
            assert!(is_valid_heap_size(valid), "{} should be valid", valid);
        }
        for invalid in ["", "m", "4gb", "-1g", "1.5g", "lots"] {
            assert!(!is_valid_heap_size(invalid), "{} should be invalid", invalid);
        }

        let result = JvmConfig::builder().max_heap_size("4gb").build();
        assert!(matches!(result, Err(WekaError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_classpath_entry_rejected() {
        let result = JvmConfig::builder().class_path("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_json_defaults_missing_fields() {
        let config: JvmConfig =
            serde_json::from_str(r#"{"packages": true, "max_heap_size": "1g"}"#).unwrap();
        assert!(config.packages);
        assert!(config.bundled);
        assert_eq!(config.max_heap_size.as_deref(), Some("1g"));
    }
}

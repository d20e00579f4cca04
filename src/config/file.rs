//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::profile::SuiteProfile;
use super::AppConfig;
use crate::models::{RendererType, SceneType, TestConfig};

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./render-tester.yaml",
    "./render-tester.yml",
    "./render-tester.json",
    "./.render-tester.yaml",
    "~/.config/render-tester/config.yaml",
];

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Full configuration file structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// User-defined suites
    #[serde(default)]
    pub suites: Vec<SuiteProfile>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            suites: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from `path`, or from the first standard location, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::find() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Like [`Self::load_or_default`], but a file that fails to load is
    /// replaced by defaults and its error handed back to the caller
    pub fn load_or_fallback(path: Option<&Path>) -> (Self, Option<anyhow::Error>) {
        match Self::load_or_default(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        let mut names = HashSet::new();
        for suite in &self.suites {
            if suite.name.trim().is_empty() {
                anyhow::bail!("Suite name must not be empty");
            }
            if !names.insert(suite.name.as_str()) {
                anyhow::bail!("Duplicate suite name: {}", suite.name);
            }
            if suite.tests.is_empty() {
                anyhow::bail!("Suite '{}' has no tests", suite.name);
            }
        }

        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            version: default_version(),
            app: AppConfig {
                library_dir: Some(PathBuf::from("./vendor")),
                ..AppConfig::default()
            },
            suites: vec![
                SuiteProfile::new(
                    "nightly",
                    vec![
                        TestConfig::performance().with_renderer(RendererType::OpenGl4_6),
                        TestConfig::performance().with_renderer(RendererType::Vulkan1_2),
                        TestConfig::quality().with_scene(SceneType::ManyCharacters),
                    ],
                )
                .with_description("OpenGL and Vulkan throughput plus a quality pass"),
            ],
        }
    }

    /// Get suite by name
    pub fn suite(&self, name: &str) -> Option<&SuiteProfile> {
        self.suites.iter().find(|s| s.name == name)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.version, "1.0");
        assert!(config.suites.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_example() {
        let config = ConfigFile::example();
        assert!(config.validate().is_ok());
        assert!(config.suite("nightly").is_some());
    }

    #[test]
    fn test_config_file_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.suites, config.suites);
    }

    #[test]
    fn test_partial_suite_uses_test_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "version: \"1.0\"\n\
             suites:\n\
             \x20 - name: vk\n\
             \x20   tests:\n\
             \x20     - renderer: vulkan_1_1\n\
             \x20       scene: many_cubes\n\
             \x20       duration_secs: 3\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        let test = &config.suite("vk").unwrap().tests[0];
        assert_eq!(test.renderer, RendererType::Vulkan1_1);
        assert_eq!(test.scene, SceneType::ManyCubes);
        assert_eq!(test.duration_secs, 3);
        assert_eq!(test.width, 1920);
        assert_eq!(config.app.resource, "GLVIEW.RMX");
    }

    #[test]
    fn test_validate_rejects_bad_suites() {
        let mut config = ConfigFile::default();
        config.version = "9.9".to_string();
        assert!(config.validate().is_err());

        let mut config = ConfigFile::default();
        config.suites.push(SuiteProfile::new("", vec![TestConfig::default()]));
        assert!(config.validate().is_err());

        let mut config = ConfigFile::default();
        config.suites.push(SuiteProfile::new("empty", Vec::new()));
        assert!(config.validate().is_err());

        let mut config = ConfigFile::default();
        config.suites.push(SuiteProfile::new("dup", vec![TestConfig::default()]));
        config.suites.push(SuiteProfile::new("dup", vec![TestConfig::quality()]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "version: \"2.0\"\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn test_fallback_on_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("render-tester.yaml");
        std::fs::write(&path, "version: \"2.0\"\n").unwrap();

        assert!(ConfigFile::load_or_default(Some(&path)).is_err());

        let (config, err) = ConfigFile::load_or_fallback(Some(&path));
        assert_eq!(config, ConfigFile::default());
        let err = err.expect("broken file must be reported");
        assert!(format!("{err:#}").contains("Unsupported config version: 2.0"));

        let good = dir.path().join("good.yaml");
        ConfigFile::example().save(&good).unwrap();
        let (config, err) = ConfigFile::load_or_fallback(Some(&good));
        assert!(err.is_none());
        assert_eq!(config, ConfigFile::example());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }
}

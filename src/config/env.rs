//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "RENDER_TESTER";

/// Settings read from `RENDER_TESTER_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Engine library directory from RENDER_TESTER_LIBRARY_DIR
    pub library_dir: Option<String>,
    /// Resource package from RENDER_TESTER_RESOURCE
    pub resource: Option<String>,
    /// Config file from RENDER_TESTER_CONFIG
    pub config_file: Option<String>,
    /// Output format from RENDER_TESTER_FORMAT
    pub format: Option<String>,
    /// Results directory from RENDER_TESTER_RESULTS_DIR
    pub results_dir: Option<String>,
    /// Verbose from RENDER_TESTER_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            library_dir: get_env("LIBRARY_DIR"),
            resource: get_env("RESOURCE"),
            config_file: get_env("CONFIG"),
            format: get_env("FORMAT"),
            results_dir: get_env("RESULTS_DIR"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.library_dir.is_some()
            || self.resource.is_some()
            || self.config_file.is_some()
            || self.format.is_some()
            || self.results_dir.is_some()
            || self.verbose.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_LIBRARY_DIR: {:?}", ENV_PREFIX, self.library_dir);
        println!("  {}_RESOURCE:    {:?}", ENV_PREFIX, self.resource);
        println!("  {}_CONFIG:      {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_FORMAT:      {:?}", ENV_PREFIX, self.format);
        println!("  {}_RESULTS_DIR: {:?}", ENV_PREFIX, self.results_dir);
        println!("  {}_VERBOSE:     {:?}", ENV_PREFIX, self.verbose);
    }
}

/// Get environment variable with prefix, ignoring empty values
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn library_dir(self, dir: impl Into<String>) -> Self {
        self.var("LIBRARY_DIR", dir)
    }

    pub fn resource(self, resource: impl Into<String>) -> Self {
        self.var("RESOURCE", resource)
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.var("FORMAT", format)
    }

    pub fn results_dir(self, dir: impl Into<String>) -> Self {
        self.var("RESULTS_DIR", dir)
    }

    pub fn verbose(self, verbose: bool) -> Self {
        self.var("VERBOSE", verbose.to_string())
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

#[cfg(test)]
impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all RENDER_TESTER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_LIBRARY_DIR   Directory containing the engine library");
    println!("  {ENV_PREFIX}_RESOURCE      Resource package path (default GLVIEW.RMX)");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_FORMAT        Output format (table, json, csv, summary)");
    println!("  {ENV_PREFIX}_RESULTS_DIR   Directory for stored runs");
    println!("  {ENV_PREFIX}_VERBOSE       Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_LIBRARY_DIR=C:\\infogl");
    println!("  render-tester suite opengl-versions");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    /// Tests touching process environment run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.library_dir.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_builder() {
        let _lock = env_lock();
        let _guard = EnvBuilder::new()
            .library_dir("/opt/infogl")
            .resource("assets/GLVIEW.RMX")
            .results_dir("/tmp/render-results")
            .verbose(true)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.library_dir, Some("/opt/infogl".to_string()));
        assert_eq!(config.resource, Some("assets/GLVIEW.RMX".to_string()));
        assert_eq!(config.results_dir, Some("/tmp/render-results".to_string()));
        assert_eq!(config.verbose, Some(true));
        assert!(config.has_any());
    }

    #[test]
    fn test_env_guard_restores() {
        let _lock = env_lock();
        let key = format!("{ENV_PREFIX}_FORMAT");
        let before = env::var(&key).ok();
        {
            let _guard = EnvBuilder::new().format("csv").apply_scoped();
            assert_eq!(env::var(&key).ok(), Some("csv".to_string()));
        }
        assert_eq!(env::var(&key).ok(), before);
    }
}

//! Test suites
//!
//! Built-in suites plus whatever the config file defines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{RendererType, SceneType, TestConfig};

/// Named, ordered list of test configurations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuiteProfile {
    /// Suite name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Tests, run in this order
    #[serde(default)]
    pub tests: Vec<TestConfig>,
}

impl SuiteProfile {
    pub fn new(name: impl Into<String>, tests: Vec<TestConfig>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tests,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_test(mut self, test: TestConfig) -> Self {
        self.tests.push(test);
        self
    }

    /// One OpenGL 4.5 single-cube run
    pub fn basic() -> Self {
        Self::new(
            "basic",
            vec![TestConfig::default_preset()
                .with_renderer(RendererType::OpenGl4_5)
                .with_scene(SceneType::SingleCube)
                .with_duration(5)],
        )
        .with_description("Single cube on OpenGL 4.5 for 5s")
    }

    /// One Vulkan 1.2 many-cubes run
    pub fn vulkan() -> Self {
        Self::new(
            "vulkan",
            vec![TestConfig::default_preset()
                .with_renderer(RendererType::Vulkan1_2)
                .with_scene(SceneType::ManyCubes)
                .with_duration(5)],
        )
        .with_description("Many cubes on Vulkan 1.2 for 5s")
    }

    /// Performance runs across OpenGL versions
    pub fn opengl_versions() -> Self {
        let tests = [
            RendererType::OpenGl3_3,
            RendererType::OpenGl4_0,
            RendererType::OpenGl4_2,
            RendererType::OpenGl4_5,
        ]
        .into_iter()
        .map(|renderer| {
            TestConfig::performance()
                .with_renderer(renderer)
                .with_scene(SceneType::ManyCubes)
                .with_duration(10)
        })
        .collect();

        Self::new("opengl-versions", tests)
            .with_description("Many cubes on OpenGL 3.3, 4.0, 4.2 and 4.5")
    }

    /// Performance, default and quality presets side by side
    pub fn quality() -> Self {
        let medium = TestConfig {
            fog: true,
            ..TestConfig::default_preset()
                .with_multisample(4)
                .with_anisotropy(4)
        };

        Self::new("quality", Vec::new())
            .with_description("Low, medium and high quality settings")
            .with_test(TestConfig::performance())
            .with_test(medium)
            .with_test(TestConfig::quality())
    }

    /// OpenGL 4.5 against Vulkan 1.2 on the same scene
    pub fn api_comparison() -> Self {
        let tests = [RendererType::OpenGl4_5, RendererType::Vulkan1_2]
            .into_iter()
            .map(|renderer| {
                TestConfig::performance()
                    .with_renderer(renderer)
                    .with_scene(SceneType::ManyCharacters)
                    .with_duration(15)
            })
            .collect();

        Self::new("api-comparison", tests)
            .with_description("Many characters on OpenGL 4.5 and Vulkan 1.2")
    }

    /// Many cubes at 720p, 1080p, 1440p and 4K
    pub fn resolution_scaling() -> Self {
        let tests = [(1280, 720), (1920, 1080), (2560, 1440), (3840, 2160)]
            .into_iter()
            .map(|(width, height)| {
                TestConfig::performance()
                    .with_scene(SceneType::ManyCubes)
                    .with_resolution(width, height)
                    .with_duration(8)
            })
            .collect();

        Self::new("resolution-scaling", tests)
            .with_description("Many cubes from 720p up to 4K")
    }

    /// Every non-raytracing scene on OpenGL 4.5
    pub fn comprehensive() -> Self {
        let tests = [
            SceneType::SingleCube,
            SceneType::ManyCubes,
            SceneType::Character,
            SceneType::ManyCharacters,
        ]
        .into_iter()
        .map(|scene| {
            TestConfig::default_preset()
                .with_renderer(RendererType::OpenGl4_5)
                .with_scene(scene)
                .with_duration(12)
        })
        .collect();

        Self::new("comprehensive", tests)
            .with_description("All four scenes on OpenGL 4.5")
    }

    /// Built-in suites
    pub fn predefined() -> Vec<SuiteProfile> {
        vec![
            Self::basic(),
            Self::vulkan(),
            Self::opengl_versions(),
            Self::quality(),
            Self::api_comparison(),
            Self::resolution_scaling(),
            Self::comprehensive(),
        ]
    }

    /// Find a built-in suite by name
    pub fn find(name: &str) -> Option<SuiteProfile> {
        Self::predefined().into_iter().find(|p| p.name == name)
    }

    /// Total rendering time requested by the suite, in seconds
    pub fn total_duration_secs(&self) -> i64 {
        self.tests.iter().map(|t| i64::from(t.duration_secs)).sum()
    }
}

/// Lookup over built-in and user-defined suites
pub struct ProfileManager {
    suites: HashMap<String, SuiteProfile>,
}

impl ProfileManager {
    /// Create a manager holding the built-in suites
    pub fn new() -> Self {
        let mut manager = Self {
            suites: HashMap::new(),
        };

        for suite in SuiteProfile::predefined() {
            manager.add_suite(suite);
        }

        manager
    }

    /// Add a suite, replacing any suite of the same name
    pub fn add_suite(&mut self, suite: SuiteProfile) {
        self.suites.insert(suite.name.clone(), suite);
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteProfile> {
        self.suites.get(name)
    }

    /// Suites sorted by name
    pub fn list_suites(&self) -> Vec<&SuiteProfile> {
        let mut suites: Vec<_> = self.suites.values().collect();
        suites.sort_by(|a, b| a.name.cmp(&b.name));
        suites
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_suite() {
        let suite = SuiteProfile::basic();
        assert_eq!(suite.tests.len(), 1);
        assert_eq!(suite.tests[0].renderer, RendererType::OpenGl4_5);
        assert_eq!(suite.tests[0].scene, SceneType::SingleCube);
        assert_eq!(suite.tests[0].duration_secs, 5);
    }

    #[test]
    fn test_vulkan_suite() {
        let suite = SuiteProfile::vulkan();
        assert_eq!(suite.tests.len(), 1);
        assert_eq!(suite.tests[0].renderer, RendererType::Vulkan1_2);
        assert_eq!(suite.tests[0].scene, SceneType::ManyCubes);
        assert!(suite.tests[0].renderer.is_vulkan());
    }

    #[test]
    fn test_opengl_versions_suite() {
        let suite = SuiteProfile::opengl_versions();
        let renderers: Vec<_> = suite.tests.iter().map(|t| t.renderer).collect();
        assert_eq!(
            renderers,
            vec![
                RendererType::OpenGl3_3,
                RendererType::OpenGl4_0,
                RendererType::OpenGl4_2,
                RendererType::OpenGl4_5,
            ]
        );
        assert!(suite.tests.iter().all(|t| t.scene == SceneType::ManyCubes));
        assert_eq!(suite.total_duration_secs(), 40);
    }

    #[test]
    fn test_quality_suite_levels() {
        let suite = SuiteProfile::quality();
        assert_eq!(suite.tests[0], TestConfig::performance());
        assert_eq!(suite.tests[2], TestConfig::quality());

        let medium = &suite.tests[1];
        assert_eq!(medium.scene, SceneType::SingleCube);
        assert_eq!((medium.multisample_count, medium.max_anisotropy), (4, 4));
        assert!(medium.fog);
        assert!(!medium.transparency);
    }

    #[test]
    fn test_resolution_scaling_suite() {
        let suite = SuiteProfile::resolution_scaling();
        assert_eq!(suite.tests.len(), 4);
        assert_eq!((suite.tests[3].width, suite.tests[3].height), (3840, 2160));
    }

    #[test]
    fn test_predefined_names_unique() {
        let suites = SuiteProfile::predefined();
        let mut names: Vec<_> = suites.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), suites.len());
        assert!(suites.iter().all(|s| !s.tests.is_empty()));
    }

    #[test]
    fn test_find_suite() {
        let suite = SuiteProfile::find("api-comparison");
        let suite = suite.unwrap();
        assert_eq!(suite.tests[1].renderer, RendererType::Vulkan1_2);
        assert!(suite.tests.iter().all(|t| t.scene == SceneType::ManyCharacters));
        assert!(suite.tests.iter().all(|t| t.multisample_count == 0));
        assert!(SuiteProfile::find("missing").is_none());
    }

    #[test]
    fn test_profile_manager() {
        let mut manager = ProfileManager::new();
        assert!(manager.suite("basic").is_some());

        manager.add_suite(SuiteProfile::new("custom", vec![TestConfig::quality()]));
        assert_eq!(manager.suite("custom").map(|s| s.tests.len()), Some(1));

        let names: Vec<_> = manager.list_suites().iter().map(|s| s.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}

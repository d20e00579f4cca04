//! Rendering test configuration models
//!
//! Defines renderers, scenes, framebuffer settings and the per-test configuration.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering APIs supported by the engine.
///
/// The declaration order is the wire code sent in the `<renderer>` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererType {
    Gdi,
    #[serde(rename = "opengl_2_0")]
    OpenGl2_0,
    #[serde(rename = "opengl_3_0")]
    OpenGl3_0,
    #[serde(rename = "opengl_3_1")]
    OpenGl3_1,
    #[serde(rename = "opengl_3_2")]
    OpenGl3_2,
    #[serde(rename = "opengl_3_3")]
    OpenGl3_3,
    #[serde(rename = "opengl_4_0")]
    OpenGl4_0,
    #[serde(rename = "opengl_4_1")]
    OpenGl4_1,
    #[serde(rename = "opengl_4_2")]
    OpenGl4_2,
    #[serde(rename = "opengl_4_3")]
    OpenGl4_3,
    #[serde(rename = "opengl_4_4")]
    OpenGl4_4,
    #[serde(rename = "opengl_4_5")]
    OpenGl4_5,
    #[serde(rename = "opengl_4_6")]
    OpenGl4_6,
    #[serde(rename = "vulkan_1_0")]
    Vulkan1_0,
    #[serde(rename = "vulkan_1_1")]
    Vulkan1_1,
    #[serde(rename = "vulkan_1_2")]
    Vulkan1_2,
}

impl RendererType {
    /// Wire code understood by the engine
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get renderer display name
    pub fn name(&self) -> &'static str {
        match self {
            RendererType::Gdi => "GDI",
            RendererType::OpenGl2_0 => "OpenGL 2.0",
            RendererType::OpenGl3_0 => "OpenGL 3.0",
            RendererType::OpenGl3_1 => "OpenGL 3.1",
            RendererType::OpenGl3_2 => "OpenGL 3.2",
            RendererType::OpenGl3_3 => "OpenGL 3.3",
            RendererType::OpenGl4_0 => "OpenGL 4.0",
            RendererType::OpenGl4_1 => "OpenGL 4.1",
            RendererType::OpenGl4_2 => "OpenGL 4.2",
            RendererType::OpenGl4_3 => "OpenGL 4.3",
            RendererType::OpenGl4_4 => "OpenGL 4.4",
            RendererType::OpenGl4_5 => "OpenGL 4.5",
            RendererType::OpenGl4_6 => "OpenGL 4.6",
            RendererType::Vulkan1_0 => "Vulkan 1.0",
            RendererType::Vulkan1_1 => "Vulkan 1.1",
            RendererType::Vulkan1_2 => "Vulkan 1.2",
        }
    }

    /// Version string sent in the `<test>` element.
    ///
    /// GDI shares the 2.0 test set; every Vulkan renderer runs the 1.0 set.
    pub fn test_version(&self) -> &'static str {
        match self {
            RendererType::Gdi | RendererType::OpenGl2_0 => "2.0",
            RendererType::OpenGl3_0 => "3.0",
            RendererType::OpenGl3_1 => "3.1",
            RendererType::OpenGl3_2 => "3.2",
            RendererType::OpenGl3_3 => "3.3",
            RendererType::OpenGl4_0 => "4.0",
            RendererType::OpenGl4_1 => "4.1",
            RendererType::OpenGl4_2 => "4.2",
            RendererType::OpenGl4_3 => "4.3",
            RendererType::OpenGl4_4 => "4.4",
            RendererType::OpenGl4_5 => "4.5",
            RendererType::OpenGl4_6 => "4.6",
            RendererType::Vulkan1_0 | RendererType::Vulkan1_1 | RendererType::Vulkan1_2 => "1.0",
        }
    }

    pub fn is_vulkan(&self) -> bool {
        matches!(
            self,
            RendererType::Vulkan1_0 | RendererType::Vulkan1_1 | RendererType::Vulkan1_2
        )
    }

    /// Get all renderers in wire-code order
    pub fn all() -> Vec<RendererType> {
        vec![
            RendererType::Gdi,
            RendererType::OpenGl2_0,
            RendererType::OpenGl3_0,
            RendererType::OpenGl3_1,
            RendererType::OpenGl3_2,
            RendererType::OpenGl3_3,
            RendererType::OpenGl4_0,
            RendererType::OpenGl4_1,
            RendererType::OpenGl4_2,
            RendererType::OpenGl4_3,
            RendererType::OpenGl4_4,
            RendererType::OpenGl4_5,
            RendererType::OpenGl4_6,
            RendererType::Vulkan1_0,
            RendererType::Vulkan1_1,
            RendererType::Vulkan1_2,
        ]
    }

    /// Parse from string
    ///
    /// Accepts short forms (`gl46`, `vk12`), dotted forms (`opengl-4.6`,
    /// `vulkan 1.2`) and the wire code itself.
    pub fn from_str(s: &str) -> Option<RendererType> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        if let Ok(code) = normalized.parse::<i32>() {
            return Self::from_code(code);
        }

        let normalized = normalized
            .replace("opengl", "gl")
            .replace("vulkan", "vk");

        match normalized.as_str() {
            "gdi" => Some(RendererType::Gdi),
            "gl20" => Some(RendererType::OpenGl2_0),
            "gl30" => Some(RendererType::OpenGl3_0),
            "gl31" => Some(RendererType::OpenGl3_1),
            "gl32" => Some(RendererType::OpenGl3_2),
            "gl33" => Some(RendererType::OpenGl3_3),
            "gl40" => Some(RendererType::OpenGl4_0),
            "gl41" => Some(RendererType::OpenGl4_1),
            "gl42" => Some(RendererType::OpenGl4_2),
            "gl43" => Some(RendererType::OpenGl4_3),
            "gl44" => Some(RendererType::OpenGl4_4),
            "gl45" => Some(RendererType::OpenGl4_5),
            "gl46" | "gl" => Some(RendererType::OpenGl4_6),
            "vk10" | "vk1" => Some(RendererType::Vulkan1_0),
            "vk11" => Some(RendererType::Vulkan1_1),
            "vk12" | "vk" => Some(RendererType::Vulkan1_2),
            _ => None,
        }
    }

    /// Parse from wire code
    pub fn from_code(code: i32) -> Option<RendererType> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::all().get(idx).copied())
    }
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canned test scenes shipped in the resource package
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    SingleCube,
    ManyCubes,
    Character,
    ManyCharacters,
    Raytracing,
}

impl SceneType {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneType::SingleCube => "Single Cube",
            SceneType::ManyCubes => "Many Cubes",
            SceneType::Character => "Character",
            SceneType::ManyCharacters => "Many Characters",
            SceneType::Raytracing => "Raytracing",
        }
    }

    pub fn all() -> Vec<SceneType> {
        vec![
            SceneType::SingleCube,
            SceneType::ManyCubes,
            SceneType::Character,
            SceneType::ManyCharacters,
            SceneType::Raytracing,
        ]
    }

    /// Parse from string or scene code
    pub fn from_str(s: &str) -> Option<SceneType> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "0" | "singlecube" | "cube" => Some(SceneType::SingleCube),
            "1" | "manycubes" | "cubes" => Some(SceneType::ManyCubes),
            "2" | "character" => Some(SceneType::Character),
            "3" | "manycharacters" | "characters" => Some(SceneType::ManyCharacters),
            "4" | "raytracing" | "rt" => Some(SceneType::Raytracing),
            _ => None,
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Framebuffer color formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FramebufferFormat {
    #[default]
    #[serde(alias = "linear")]
    RgbLinear,
    Srgb,
    Hdr,
}

impl FramebufferFormat {
    /// Value sent in the `<fbformat>` element
    pub fn xml_value(&self) -> &'static str {
        match self {
            FramebufferFormat::RgbLinear => "Linear",
            FramebufferFormat::Srgb => "sRGB",
            FramebufferFormat::Hdr => "HDR",
        }
    }

    pub fn from_str(s: &str) -> Option<FramebufferFormat> {
        match s.to_lowercase().as_str() {
            "linear" | "rgb" | "rgb-linear" | "rgblinear" => Some(FramebufferFormat::RgbLinear),
            "srgb" => Some(FramebufferFormat::Srgb),
            "hdr" => Some(FramebufferFormat::Hdr),
            _ => None,
        }
    }
}

/// Framebuffer kinds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramebufferType {
    #[default]
    Default,
    PixelBuffer,
    FramebufferObject,
}

impl FramebufferType {
    /// Value sent in the `<fbenable>` element
    pub fn xml_value(&self) -> &'static str {
        match self {
            FramebufferType::Default => "Default",
            FramebufferType::PixelBuffer => "PixelBuffer",
            FramebufferType::FramebufferObject => "FrameBufferObject",
        }
    }

    pub fn from_str(s: &str) -> Option<FramebufferType> {
        match s.to_lowercase().as_str() {
            "default" => Some(FramebufferType::Default),
            "pbuffer" | "pixelbuffer" | "pixel-buffer" => Some(FramebufferType::PixelBuffer),
            "fbo" | "framebufferobject" | "framebuffer-object" => {
                Some(FramebufferType::FramebufferObject)
            }
            _ => None,
        }
    }
}

/// Configuration of a single rendering test
///
/// Plain value type. Nothing is range-checked; the engine receives
/// whatever is set here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub renderer: RendererType,

    pub fullscreen: bool,
    pub width: i32,
    pub height: i32,
    pub vsync: bool,

    pub fog: bool,
    pub transparency: bool,
    pub user_clip_plane: bool,
    /// 0 disables MSAA, otherwise 2/4/8/16 samples
    pub multisample_count: i32,
    /// 0 disables anisotropic filtering, otherwise 1-16
    pub max_anisotropy: i32,
    pub texture_lod: i32,

    pub fb_format: FramebufferFormat,
    pub fb_type: FramebufferType,

    pub scene: SceneType,
    pub duration_secs: i32,
    pub debug_output: bool,

    pub pixel_format: i32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            renderer: RendererType::OpenGl4_6,
            fullscreen: false,
            width: 1920,
            height: 1080,
            vsync: false,
            fog: false,
            transparency: false,
            user_clip_plane: false,
            multisample_count: 0,
            max_anisotropy: 0,
            texture_lod: 0,
            fb_format: FramebufferFormat::RgbLinear,
            fb_type: FramebufferType::Default,
            scene: SceneType::SingleCube,
            duration_secs: 10,
            debug_output: false,
            pixel_format: 1,
        }
    }
}

impl TestConfig {
    /// Short single-cube run at 1080p
    pub fn default_preset() -> Self {
        Self {
            duration_secs: 5,
            ..Self::default()
        }
    }

    /// Throughput-oriented run with MSAA and anisotropic filtering off
    pub fn performance() -> Self {
        Self {
            scene: SceneType::ManyCubes,
            duration_secs: 30,
            multisample_count: 0,
            max_anisotropy: 0,
            ..Self::default()
        }
    }

    /// Every quality feature enabled
    pub fn quality() -> Self {
        Self {
            scene: SceneType::Character,
            duration_secs: 15,
            multisample_count: 8,
            max_anisotropy: 16,
            fog: true,
            transparency: true,
            fb_format: FramebufferFormat::Hdr,
            ..Self::default()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_preset()),
            "performance" | "perf" => Some(Self::performance()),
            "quality" => Some(Self::quality()),
            _ => None,
        }
    }

    pub fn with_renderer(mut self, renderer: RendererType) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_scene(mut self, scene: SceneType) -> Self {
        self.scene = scene;
        self
    }

    pub fn with_resolution(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_duration(mut self, secs: i32) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_multisample(mut self, samples: i32) -> Self {
        self.multisample_count = samples;
        self
    }

    pub fn with_anisotropy(mut self, level: i32) -> Self {
        self.max_anisotropy = level;
        self
    }

    pub fn with_fb_format(mut self, format: FramebufferFormat) -> Self {
        self.fb_format = format;
        self
    }

    /// One-line description used in progress output
    pub fn describe(&self) -> String {
        format!(
            "{} / {} @ {}x{} ({}s)",
            self.renderer, self.scene, self.width, self.height, self.duration_secs
        )
    }
}

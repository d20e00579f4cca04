//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use anyhow::{anyhow, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::models::{FramebufferFormat, FramebufferType, RendererType, SceneType, TestConfig};

/// Rendering benchmark test runner
#[derive(Parser, Debug)]
#[command(name = "render-tester")]
#[command(version)]
#[command(about = "Run OpenGL and Vulkan rendering benchmarks through the infogl engine")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing the engine library
    #[arg(long, global = true)]
    pub library_dir: Option<String>,

    /// Resource package passed to the engine
    #[arg(long, global = true)]
    pub resource: Option<String>,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single rendering test
    Run(RunArgs),

    /// Run a named test suite
    Suite(SuiteArgs),

    /// List renderers, scenes and suites
    List(ListArgs),

    /// Show CPU information reported by the engine
    Cpu,

    /// Print the XML payload for a test without running it
    Xml(XmlArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// View stored results
    Results(ResultsArgs),
}

impl Command {
    /// Whether the command must stop on a config file that fails to load.
    ///
    /// Commands that inspect or repair the config, and those that never use
    /// it, fall back to defaults instead.
    pub fn requires_config(&self) -> bool {
        matches!(
            self,
            Command::Run(_) | Command::Suite(_) | Command::Cpu | Command::Results(_)
        )
    }
}

/// Test configuration flags, applied on top of a preset
#[derive(ClapArgs, Debug, Default)]
pub struct TestArgs {
    /// Preset to start from (default, performance, quality)
    #[arg(short, long, default_value = "default")]
    pub preset: String,

    /// Renderer (gl46, gl33, vk12, gdi, or numeric code)
    #[arg(short, long)]
    pub renderer: Option<String>,

    /// Scene (single-cube, many-cubes, character, many-characters, raytracing)
    #[arg(short, long)]
    pub scene: Option<String>,

    /// Window width
    #[arg(long)]
    pub width: Option<i32>,

    /// Window height
    #[arg(long)]
    pub height: Option<i32>,

    /// Test duration in seconds
    #[arg(short, long)]
    pub duration: Option<i32>,

    /// Multisample count
    #[arg(long)]
    pub msaa: Option<i32>,

    /// Maximum anisotropy
    #[arg(long)]
    pub anisotropy: Option<i32>,

    /// Texture LOD bias
    #[arg(long)]
    pub lod: Option<i32>,

    /// Framebuffer format (linear, srgb, hdr)
    #[arg(long)]
    pub fb_format: Option<String>,

    /// Framebuffer type (default, pbuffer, fbo)
    #[arg(long)]
    pub fb_type: Option<String>,

    /// Pixel format index
    #[arg(long)]
    pub pixel_format: Option<i32>,

    /// Run fullscreen
    #[arg(long)]
    pub fullscreen: bool,

    /// Enable vertical sync
    #[arg(long)]
    pub vsync: bool,

    /// Enable fog
    #[arg(long)]
    pub fog: bool,

    /// Enable transparency
    #[arg(long)]
    pub transparency: bool,

    /// Enable user clip plane
    #[arg(long)]
    pub clip_plane: bool,

    /// Enable engine debug output
    #[arg(long)]
    pub debug_output: bool,
}

impl TestArgs {
    /// Build the test configuration these flags describe
    pub fn to_config(&self) -> Result<TestConfig> {
        let mut config = TestConfig::preset(&self.preset)
            .ok_or_else(|| anyhow!("Unknown preset: {}", self.preset))?;

        if let Some(renderer) = &self.renderer {
            config.renderer = RendererType::from_str(renderer)
                .ok_or_else(|| anyhow!("Unknown renderer: {renderer}"))?;
        }
        if let Some(scene) = &self.scene {
            config.scene =
                SceneType::from_str(scene).ok_or_else(|| anyhow!("Unknown scene: {scene}"))?;
        }
        if let Some(format) = &self.fb_format {
            let format = FramebufferFormat::from_str(format)
                .ok_or_else(|| anyhow!("Unknown framebuffer format: {format}"))?;
            config = config.with_fb_format(format);
        }
        if let Some(fb_type) = &self.fb_type {
            config.fb_type = FramebufferType::from_str(fb_type)
                .ok_or_else(|| anyhow!("Unknown framebuffer type: {fb_type}"))?;
        }

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(msaa) = self.msaa {
            config.multisample_count = msaa;
        }
        if let Some(anisotropy) = self.anisotropy {
            config.max_anisotropy = anisotropy;
        }
        if let Some(lod) = self.lod {
            config.texture_lod = lod;
        }
        if let Some(pixel_format) = self.pixel_format {
            config.pixel_format = pixel_format;
        }

        config.fullscreen |= self.fullscreen;
        config.vsync |= self.vsync;
        config.fog |= self.fog;
        config.transparency |= self.transparency;
        config.user_clip_plane |= self.clip_plane;
        config.debug_output |= self.debug_output;

        Ok(config)
    }
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub test: TestArgs,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Store the run in the results directory
    #[arg(long)]
    pub save: bool,
}

/// Arguments for suite command
#[derive(Parser, Debug)]
pub struct SuiteArgs {
    /// Suite name (see `list --suites`)
    pub name: String,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Store the run in the results directory
    #[arg(long)]
    pub save: bool,

    /// Also write the report to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show renderers
    #[arg(short, long)]
    pub renderers: bool,

    /// Show scenes
    #[arg(short, long)]
    pub scenes: bool,

    /// Show suites
    #[arg(short = 'S', long)]
    pub suites: bool,
}

impl ListArgs {
    /// No filter selected means show everything
    pub fn show_all(&self) -> bool {
        !self.renderers && !self.scenes && !self.suites
    }
}

/// Arguments for xml command
#[derive(Parser, Debug)]
pub struct XmlArgs {
    #[command(flatten)]
    pub test: TestArgs,

    /// Display mode index to embed instead of looking it up
    #[arg(long, allow_hyphen_values = true)]
    pub display_mode: Option<i32>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Destination path
        #[arg(default_value = "render-tester.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Validate a configuration file
    Validate {
        /// File to validate; the discovered config file if omitted
        path: Option<String>,
    },

    /// Describe supported environment variables
    Env,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Show a specific run; the latest if omitted
    #[arg(long)]
    pub run: Option<String>,

    /// List stored runs
    #[arg(short, long)]
    pub list: bool,

    /// Output format
    #[arg(short, long)]
    pub format: Option<String>,

    /// Export the run to a file (.json or .csv)
    #[arg(short, long)]
    pub export: Option<String>,

    /// Delete a stored run
    #[arg(long, conflicts_with_all = ["run", "list", "export"])]
    pub delete: Option<String>,
}

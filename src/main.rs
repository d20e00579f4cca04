//! render-tester - rendering benchmark runner
//!
//! A CLI tool that drives the closed-source infogl rendering engine: it
//! serializes test configurations to the engine's XML format, runs them one
//! after another and reports average FPS per test.
//!
//! ## Usage
//!
//! ```bash
//! # One default test (OpenGL 4.6, single cube, 1080p, 5s)
//! render-tester run
//!
//! # Vulkan 1.2 with the quality preset
//! render-tester run --preset quality --renderer vk12 --save
//!
//! # Built-in suite
//! render-tester suite opengl-versions
//!
//! # Inspect the payload without loading the engine
//! render-tester xml --renderer gl45 --scene many-cubes
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod cli;
mod config;
mod engine;
mod executor;
mod models;
mod output;
mod payload;
mod platform;
mod results;
mod utils;

use cli::Args;
use config::{AppConfig, ConfigFile, EnvConfig, ProfileManager};
use executor::RenderingTester;
use models::{RendererType, RunSummary, SceneType, TestConfig};
use output::{OutputFormat, ResultFormatter};
use results::{ExportFormat, ResultsStorage, StoredRun};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (settings, config_error) = load_settings(&args)?;
    init_logger(LogLevel::from_verbose(settings.app.verbose));
    if let Some(e) = config_error {
        warn!("Ignoring config file, using defaults: {e:#}");
    }

    match args.command {
        cli::Command::Run(run_args) => {
            run_single(run_args, &settings.app).await?;
        }
        cli::Command::Suite(suite_args) => {
            run_suite(suite_args, &settings).await?;
        }
        cli::Command::List(list_args) => {
            list_catalog(list_args, &settings);
        }
        cli::Command::Cpu => {
            show_cpu(&settings.app)?;
        }
        cli::Command::Xml(xml_args) => {
            print_xml(xml_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, args.config.as_deref(), &settings)?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args, &settings.app)?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment, then command-line flags.
///
/// Commands that don't need the config file get defaults when it fails to
/// load; the error comes back alongside so it can be logged.
fn load_settings(args: &Args) -> Result<(ConfigFile, Option<anyhow::Error>)> {
    let env = EnvConfig::load();
    let path = args.config.clone().or_else(|| env.config_file.clone());
    let path = path.as_deref().map(Path::new);

    let (mut settings, config_error) = if args.command.requires_config() {
        (ConfigFile::load_or_default(path)?, None)
    } else {
        ConfigFile::load_or_fallback(path)
    };
    settings.app.apply_env(&env);

    if let Some(dir) = &args.library_dir {
        settings.app.library_dir = Some(PathBuf::from(dir));
    }
    if let Some(resource) = &args.resource {
        settings.app.resource = resource.clone();
    }
    if args.verbose {
        settings.app.verbose = true;
    }

    Ok((settings, config_error))
}

fn build_tester(app: &AppConfig) -> RenderingTester {
    RenderingTester::new(app.library_dir.clone(), Some(app.resource.clone()))
}

fn output_format(flag: Option<&str>, app: &AppConfig) -> Result<OutputFormat> {
    let name = flag.unwrap_or(app.format.as_str());
    OutputFormat::from_str(name).ok_or_else(|| anyhow!("Unknown output format: {name}"))
}

fn save_run(
    app: &AppConfig,
    name: &str,
    started_at: chrono::DateTime<Utc>,
    tester: &RenderingTester,
    configs: &[TestConfig],
    summary: &RunSummary,
) -> Result<()> {
    let mut run = StoredRun::new(name, tester.resource_path())
        .with_started_at(started_at)
        .with_cpu(tester.cpu_info());
    run.record(configs, &summary.results);

    let storage = ResultsStorage::from_option(app.results_dir.as_deref());
    let path = storage.save(&run)?;
    println!("\n✓ Run {} saved to {}", run.id, path.display());
    Ok(())
}

async fn run_single(args: cli::RunArgs, app: &AppConfig) -> Result<()> {
    let config = args.test.to_config()?;
    let formatter = ResultFormatter::new(output_format(args.format.as_deref(), app)?);

    let mut tester = build_tester(app);
    if let Err(e) = tester.initialize() {
        return Err(anyhow!(e).context("Engine initialization failed"));
    }

    info!("Running {}", config.describe());
    let started_at = Utc::now();
    let result = tester.run_single_test(&config).await;

    let configs = std::slice::from_ref(&config);
    let summary = RunSummary::new("single", vec![result]);
    let cpu = tester.cpu_specification();
    println!("{}", formatter.format_summary(&summary, configs, Some(&cpu)));

    if args.save {
        save_run(app, "single", started_at, &tester, configs, &summary)?;
    }

    if !summary.is_all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_suite(args: cli::SuiteArgs, settings: &ConfigFile) -> Result<()> {
    let app = &settings.app;
    let mut manager = ProfileManager::new();
    for suite in &settings.suites {
        manager.add_suite(suite.clone());
    }

    let suite = manager.suite(&args.name).cloned().ok_or_else(|| {
        let names: Vec<_> = manager.list_suites().iter().map(|s| s.name.clone()).collect();
        anyhow!("Unknown suite: {} (available: {})", args.name, names.join(", "))
    })?;

    let format = output_format(args.format.as_deref(), app)?;
    let formatter = ResultFormatter::new(format);
    let progress_formatter = ResultFormatter::new(OutputFormat::Table);

    let mut tester = build_tester(app);
    if let Err(e) = tester.initialize() {
        return Err(anyhow!(e).context("Engine initialization failed"));
    }

    let cpu = tester.cpu_specification();
    println!(
        "Suite '{}': {} tests, about {}s of rendering",
        suite.name,
        suite.tests.len(),
        suite.total_duration_secs()
    );
    println!("CPU: {cpu}\n");

    let started_at = Utc::now();
    let tests = suite.tests.clone();
    let summary = tester
        .run_suite(&suite, |completed, total, result| {
            let config = tests.get(completed - 1);
            println!(
                "{}",
                progress_formatter.format_progress(completed, total, config, result)
            );
        })
        .await;

    println!("{}", formatter.format_summary(&summary, &suite.tests, Some(&cpu)));

    if let Some(path) = &args.output {
        output::write_results_to_file(path, &summary, &suite.tests, format)
            .with_context(|| format!("Failed to write report to {path}"))?;
        println!("✓ Report written to {path}");
    }

    if args.save {
        save_run(app, &suite.name, started_at, &tester, &suite.tests, &summary)?;
    }

    if !summary.is_all_passed() {
        warn!("{} of {} tests failed", summary.failed, summary.total);
        std::process::exit(1);
    }
    Ok(())
}

fn list_catalog(args: cli::ListArgs, settings: &ConfigFile) {
    let show_all = args.show_all();

    if show_all || args.renderers {
        println!("\nRenderers:");
        println!("──────────────────────────────────────────────────────────────────────");
        for renderer in RendererType::all() {
            let shared = if renderer.is_vulkan() {
                " (shared by all Vulkan versions)"
            } else {
                ""
            };
            println!(
                "  {:2}. {:12} [test set {}]{}",
                renderer.code(),
                renderer.name(),
                renderer.test_version(),
                shared
            );
        }
    }

    if show_all || args.scenes {
        println!("\nScenes:");
        println!("──────────────────────────────────────────────────────────────────────");
        for scene in SceneType::all() {
            println!("  {:2}. {}", scene.code(), scene.name());
        }
    }

    if show_all || args.suites {
        let mut manager = ProfileManager::new();
        for suite in &settings.suites {
            manager.add_suite(suite.clone());
        }

        println!("\nSuites:");
        println!("──────────────────────────────────────────────────────────────────────");
        for suite in manager.list_suites() {
            println!(
                "  {:20} - {} ({} tests)",
                suite.name,
                suite.description,
                suite.tests.len()
            );
        }
    }

    println!();
}

fn show_cpu(app: &AppConfig) -> Result<()> {
    let mut tester = build_tester(app);
    if let Err(e) = tester.initialize() {
        return Err(anyhow!(e).context("Engine initialization failed"));
    }

    let Some(cpu) = tester.cpu_info() else {
        println!("{}", executor::CPU_INFO_UNAVAILABLE);
        return Ok(());
    };

    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("\n┌─────────────────────────────────────────────────────────────┐");
    println!("│ CPU Information                                             │");
    println!("├─────────────────────────────────────────────────────────────┤");
    println!("│ Name:          {:44} │", text(&cpu.name));
    println!("│ Code name:     {:44} │", text(&cpu.code_name));
    println!("│ Vendor:        {:44} │", text(&cpu.vendor_name));
    println!("│ Package:       {:44} │", text(&cpu.package));
    println!("│ Technology:    {:44} │", text(&cpu.technology));
    println!("│ Cores/Threads: {:44} │", format!("{}/{}", cpu.cores, cpu.threads));
    println!(
        "│ Frequency:     {:44} │",
        format!("{} GHz ({} MHz)", cpu.freq_ghz, cpu.freq_mhz)
    );
    println!(
        "│ Family/Model:  {:44} │",
        format!(
            "{}/{} (ext {}/{}), stepping {}",
            cpu.family, cpu.model, cpu.ext_family, cpu.ext_model, cpu.stepping
        )
    );
    println!("│ Max TDP:       {:44} │", format!("{} W", cpu.max_tdp));
    println!("└─────────────────────────────────────────────────────────────┘");
    println!("\n{}", text(&cpu.specification));
    if let Some(instructions) = &cpu.instructions {
        println!("Instructions: {instructions}");
    }

    Ok(())
}

fn print_xml(args: cli::XmlArgs) -> Result<()> {
    let config = args.test.to_config()?;
    let display_mode = args
        .display_mode
        .unwrap_or_else(|| platform::find_display_mode(config.width, config.height));

    print!("{}", payload::build_xml(&config, display_mode));
    Ok(())
}

fn manage_config(
    args: cli::ConfigArgs,
    config_path: Option<&str>,
    settings: &ConfigFile,
) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { path, force } => {
            let target = Path::new(&path);
            if target.exists() && !force {
                anyhow::bail!("Configuration file already exists: {path}. Use --force to overwrite.");
            }

            ConfigFile::example().save(target)?;
            println!("✓ Configuration file created: {path}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show => {
            println!("{}", serde_yaml::to_string(settings)?);
            let env = EnvConfig::load();
            if env.has_any() {
                env.print_summary();
            }
        }

        cli::ConfigAction::Validate { path } => {
            let path = path
                .or_else(|| config_path.map(str::to_string))
                .or_else(|| ConfigFile::find().map(|p| p.to_string_lossy().to_string()))
                .ok_or_else(|| anyhow!("No configuration file found"))?;

            match ConfigFile::load(&path) {
                Ok(config) => {
                    println!("✓ Configuration file is valid: {path}");
                    println!("  {} suite(s) defined", config.suites.len());
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e:#}");
                    return Err(e);
                }
            }
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
        }
    }

    Ok(())
}

fn show_results(args: cli::ResultsArgs, app: &AppConfig) -> Result<()> {
    let storage = ResultsStorage::from_option(app.results_dir.as_deref());

    if let Some(id) = &args.delete {
        storage.delete(id)?;
        println!("✓ Run {id} deleted");
        return Ok(());
    }

    if args.list {
        let runs = storage.list_runs()?;
        if runs.is_empty() {
            println!("\n📭 No stored results found in {}", storage.base_dir().display());
            println!("   Run tests with: render-tester suite <name> --save");
            return Ok(());
        }

        println!("\n┌─────────────────────────────────────────────────────────────┐");
        println!("│ Stored Runs                                                 │");
        println!("├─────────────────────────────────────────────────────────────┤");
        for run in runs {
            let score = run
                .average_score
                .map(|s| format!("{s:.1} FPS"))
                .unwrap_or_else(|| "N/A".to_string());
            println!(
                "│ {:20} │ {:16} │ {}/{} │ {}",
                run.id, run.name, run.passed, run.total, score
            );
        }
        println!("└─────────────────────────────────────────────────────────────┘");
        return Ok(());
    }

    let run = match &args.run {
        Some(id) => storage.load(id)?,
        None => match storage.latest()? {
            Some(run) => run,
            None => {
                println!("\n📭 No stored results found in {}", storage.base_dir().display());
                return Ok(());
            }
        },
    };

    let formatter = ResultFormatter::new(output_format(args.format.as_deref(), app)?);
    let cpu = run.cpu.as_ref().and_then(|c| c.specification.clone());
    println!("Run {} ({})", run.id, run.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "{}",
        formatter.format_summary(&run.summary(), &run.configs(), cpu.as_deref())
    );

    if let Some(export_path) = &args.export {
        let path = PathBuf::from(export_path);
        let format = ExportFormat::from_extension(&path).unwrap_or_else(|| {
            warn!("Unknown export extension, writing JSON");
            ExportFormat::Json
        });
        storage.export(&run, &path, format)?;
        println!("\n✓ Results exported to: {}", path.display());
    }

    Ok(())
}

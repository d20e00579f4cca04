//! Results storage and retrieval
//!
//! Runs are stored as one pretty-printed JSON file each.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::engine::CpuInfo;
use crate::models::{RunSummary, TestConfig, TestResult};
use crate::output::write_csv;

/// Stored run with every configuration and its result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    /// Unique run ID
    pub id: String,

    /// Suite name, or "single" for a one-off test
    pub name: String,

    pub started_at: DateTime<Utc>,

    pub completed_at: DateTime<Utc>,

    /// Resource package the engine was initialized with
    pub resource: String,

    /// CPU identification, when the engine provided it
    pub cpu: Option<CpuInfo>,

    pub environment: EnvironmentInfo,

    /// Tests in run order
    pub tests: Vec<StoredTest>,
}

/// One configuration and what it produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTest {
    pub config: TestConfig,
    pub result: TestResult,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredRun {
    /// Create an empty run starting now
    pub fn new(name: impl Into<String>, resource: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_run_id(),
            name: name.into(),
            started_at: now,
            completed_at: now,
            resource: resource.into(),
            cpu: None,
            environment: EnvironmentInfo::default(),
            tests: Vec::new(),
        }
    }

    pub fn with_cpu(mut self, cpu: Option<CpuInfo>) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Record configurations and results, paired by position
    pub fn record(&mut self, configs: &[TestConfig], results: &[TestResult]) {
        self.tests.extend(
            configs
                .iter()
                .zip(results)
                .map(|(config, result)| StoredTest {
                    config: config.clone(),
                    result: result.clone(),
                }),
        );
        self.completed_at = Utc::now();
    }

    pub fn configs(&self) -> Vec<TestConfig> {
        self.tests.iter().map(|t| t.config.clone()).collect()
    }

    /// Rebuild the run summary
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(
            &self.name,
            self.tests.iter().map(|t| t.result.clone()).collect(),
        )
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Results storage manager
pub struct ResultsStorage {
    /// Base directory for results
    base_dir: PathBuf,
}

impl ResultsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Storage under the platform data directory
    pub fn default_dir() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("render-tester")
            .join("results");
        Self::new(base_dir)
    }

    /// Storage in `dir` if given, the default directory otherwise
    pub fn from_option(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::default_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.base_dir.join(format!("{run_id}.json"))
    }

    /// Save a run
    pub fn save(&self, run: &StoredRun) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create results directory: {}",
                self.base_dir.display()
            )
        })?;

        let path = self.run_path(&run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, run).context("Failed to write results")?;
        writer.flush().context("Failed to write results")?;

        info!("Saved test results to {}", path.display());
        Ok(path)
    }

    /// Load a run by ID
    pub fn load(&self, run_id: &str) -> Result<StoredRun> {
        let path = self.run_path(run_id);
        let run = self
            .load_from_path(&path)
            .with_context(|| format!("Run not found: {run_id}"))?;
        debug!("Loaded test results from {}", path.display());
        Ok(run)
    }

    /// Load from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<StoredRun> {
        let file = File::open(path).context("Failed to open results file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("Failed to parse results")
    }

    /// All readable runs, newest first
    pub fn load_all(&self) -> Result<Vec<StoredRun>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        debug!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    /// Brief information on every run, newest first
    pub fn list_runs(&self) -> Result<Vec<RunInfo>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|run| {
                let summary = run.summary();
                RunInfo {
                    id: run.id,
                    name: run.name,
                    started_at: run.started_at,
                    total: summary.total,
                    passed: summary.passed,
                    average_score: summary.average_score(),
                }
            })
            .collect())
    }

    /// Most recent run
    pub fn latest(&self) -> Result<Option<StoredRun>> {
        Ok(self.load_all()?.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, run_id: &str) -> Result<()> {
        let path = self.run_path(run_id);
        if !path.exists() {
            anyhow::bail!("Run not found: {run_id}");
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete {}", path.display()))?;
        info!("Deleted results: {}", path.display());
        Ok(())
    }

    /// Export run to a file
    pub fn export(&self, run: &StoredRun, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Json => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, run)?;
                writer.flush()?;
            }
            ExportFormat::Csv => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let tests = run.tests.iter().map(|t| (Some(&t.config), &t.result));
                let mut writer = write_csv(BufWriter::new(file), tests)?;
                writer.flush()?;
            }
        }

        info!("Exported results to {}", path.display());
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub average_score: Option<f64>,
}

/// Export format
#[derive(Clone, Copy, Debug)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

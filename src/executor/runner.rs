//! Rendering test runner
//!
//! Owns the engine binding and turns test configurations into results.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::SuiteProfile;
use crate::engine::{
    self, CpuInfo, EngineError, EngineRecord, NativeEngine, RenderingEngine,
    DEFAULT_RESOURCE_PACKAGE, STATUS_OK,
};
use crate::models::{RunSummary, TestConfig, TestResult};
use crate::payload;
use crate::platform::{self, DisplayModeSource, SystemDisplayModes};
use crate::utils::Timer;

/// Message used when the engine returns no usable result
pub const NO_RESULTS_MESSAGE: &str = "No test results returned";

/// Text reported by [`RenderingTester::cpu_specification`] before initialization
pub const CPU_INFO_UNAVAILABLE: &str = "CPU information not available";

/// Runs rendering tests through the engine library
///
/// Tests run strictly one after another; each call waits for the engine
/// to return before the next one starts.
pub struct RenderingTester {
    library_dir: Option<PathBuf>,
    resource_path: String,
    engine: Option<Arc<dyn RenderingEngine>>,
    display_modes: Arc<dyn DisplayModeSource>,
    last_error: String,
    initialized: bool,
}

impl RenderingTester {
    /// Create a tester that loads the engine library from `library_dir`
    /// (or the default search path) on first use.
    pub fn new(library_dir: Option<PathBuf>, resource_path: Option<String>) -> Self {
        Self {
            library_dir,
            resource_path: resource_path
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_RESOURCE_PACKAGE.to_string()),
            engine: None,
            display_modes: Arc::new(SystemDisplayModes),
            last_error: String::new(),
            initialized: false,
        }
    }

    /// Create a tester around an already bound engine
    pub fn with_engine(engine: Arc<dyn RenderingEngine>) -> Self {
        let mut tester = Self::new(None, None);
        tester.engine = Some(engine);
        tester
    }

    pub fn with_display_modes(mut self, display_modes: Arc<dyn DisplayModeSource>) -> Self {
        self.display_modes = display_modes;
        self
    }

    pub fn with_resource_path(mut self, path: impl Into<String>) -> Self {
        self.resource_path = path.into();
        self
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Load the engine library and its resource package.
    ///
    /// Idempotent once it has succeeded. On failure the error is also
    /// kept as [`Self::last_error`].
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }

        platform::setup_dpi_awareness();

        let engine = match &self.engine {
            Some(engine) => engine.clone(),
            None => {
                let path = engine::library_path(self.library_dir.as_deref());
                match NativeEngine::load(&path) {
                    Ok(native) => {
                        let engine: Arc<dyn RenderingEngine> = Arc::new(native);
                        self.engine = Some(engine.clone());
                        engine
                    }
                    Err(e) => return Err(self.record_error(e)),
                }
            }
        };

        let status = match engine.init_resource_package(&self.resource_path) {
            Ok(status) => status,
            Err(e) => return Err(self.record_error(e)),
        };
        if status < 0 {
            let err = EngineError::ResourcePackage {
                path: self.resource_path.clone(),
                status,
            };
            return Err(self.record_error(err));
        }

        self.initialized = true;
        info!("Rendering tester initialized with {}", self.resource_path);
        Ok(())
    }

    fn record_error(&mut self, err: EngineError) -> EngineError {
        self.last_error = err.to_string();
        error!("{}", self.last_error);
        err
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Last initialization error, empty if none occurred
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// CPU identification, available once initialized
    pub fn cpu_info(&self) -> Option<CpuInfo> {
        if !self.initialized {
            return None;
        }
        self.engine.as_ref().map(|engine| engine.read_cpu_info())
    }

    /// CPU specification string, or a placeholder when unavailable
    pub fn cpu_specification(&self) -> String {
        self.cpu_info()
            .and_then(|info| info.specification)
            .unwrap_or_else(|| CPU_INFO_UNAVAILABLE.to_string())
    }

    /// XML payload that would be sent for `config`
    pub fn payload_for(&self, config: &TestConfig) -> String {
        let display_mode = self.display_modes.find(config.width, config.height);
        payload::build_xml(config, display_mode)
    }

    /// Run one test, initializing first if needed.
    ///
    /// Never fails outright: every problem ends up in the returned result.
    pub async fn run_single_test(&mut self, config: &TestConfig) -> TestResult {
        if self.initialize().is_err() {
            return TestResult::fail(0, self.last_error.clone());
        }

        let Some(engine) = self.engine.clone() else {
            return TestResult::fail(0, NO_RESULTS_MESSAGE);
        };

        let xml = self.payload_for(config);
        debug!("Running test with config: {}", xml);

        let timer = Timer::start(config.describe());
        let output = tokio::task::spawn_blocking(move || engine.run_rendering_tests(&xml)).await;
        let elapsed_ms = timer.stop().as_millis() as u64;

        let result = match output {
            Ok(Ok(records)) => interpret_output(records),
            Ok(Err(e)) => {
                error!("Test execution failed: {}", e);
                TestResult::fail(0, e.to_string())
            }
            Err(e) => {
                let err = EngineError::TaskFailed(e.to_string());
                error!("{}", err);
                TestResult::fail(0, err.to_string())
            }
        };

        result.with_elapsed(elapsed_ms)
    }

    /// Run every configuration in order
    pub async fn run_multiple_tests(&mut self, configs: &[TestConfig]) -> Vec<TestResult> {
        self.run_multiple_tests_with_progress(configs, |_, _, _| {})
            .await
    }

    /// Run every configuration in order, calling `progress` after each test
    /// with (completed, total, result). `completed` runs from 1 to total.
    pub async fn run_multiple_tests_with_progress<F>(
        &mut self,
        configs: &[TestConfig],
        mut progress: F,
    ) -> Vec<TestResult>
    where
        F: FnMut(usize, usize, &TestResult),
    {
        let total = configs.len();
        let mut results = Vec::with_capacity(total);

        for (i, config) in configs.iter().enumerate() {
            let result = self.run_single_test(config).await;
            progress(i + 1, total, &result);
            results.push(result);
        }

        results
    }

    /// Run a suite and summarize it
    pub async fn run_suite<F>(&mut self, suite: &SuiteProfile, progress: F) -> RunSummary
    where
        F: FnMut(usize, usize, &TestResult),
    {
        info!("Running suite '{}' ({} tests)", suite.name, suite.tests.len());

        let results = self
            .run_multiple_tests_with_progress(&suite.tests, progress)
            .await;
        let summary = RunSummary::new(&suite.name, results);

        info!(
            "Suite '{}' completed - Pass: {}/{} in {}ms",
            suite.name, summary.passed, summary.total, summary.total_duration_ms
        );

        summary
    }
}

/// Translate the engine's output into a test result.
///
/// Only the head record decides the outcome: a missing list or a null
/// status is a failure with [`NO_RESULTS_MESSAGE`], "OK" is a pass with the
/// engine's FPS and index, anything else is a failure carrying the status
/// text verbatim.
pub fn interpret_output(records: Option<Vec<EngineRecord>>) -> TestResult {
    let records = records.unwrap_or_default();

    let Some(head) = records.first() else {
        error!("Test execution failed - no results returned");
        return TestResult::fail(0, NO_RESULTS_MESSAGE);
    };

    let result = match head.status.as_deref() {
        None => {
            error!("Test execution failed - no results returned");
            TestResult::fail(0, NO_RESULTS_MESSAGE)
        }
        Some(STATUS_OK) => {
            let result = TestResult::pass(head.index, f64::from(head.fps));
            info!(
                "Test {} passed with {:.2} FPS",
                result.test_index, result.average_fps
            );
            result
        }
        Some(status) => {
            error!("Test {} failed: {}", head.index, status);
            TestResult::fail(head.index, status)
        }
    };

    for extra in records.iter().skip(1) {
        debug!(
            "Additional engine record: test {} status={:?} fps={:.2} duration={}s",
            extra.index, extra.status, extra.fps, extra.duration
        );
    }

    result
}

//! Test result models
//!
//! Defines the per-test result and the summary of a batch of tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a single rendering test
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test index reported by the engine
    pub test_index: i32,
    pub passed: bool,
    pub average_fps: f64,
    pub error_message: Option<String>,
    /// Wall-clock time spent in the engine call
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl TestResult {
    pub fn pass(test_index: i32, average_fps: f64) -> Self {
        Self {
            test_index,
            passed: true,
            average_fps,
            error_message: None,
            elapsed_ms: 0,
        }
    }

    pub fn fail(test_index: i32, message: impl Into<String>) -> Self {
        Self {
            test_index,
            passed: false,
            average_fps: 0.0,
            error_message: Some(message.into()),
            elapsed_ms: 0,
        }
    }

    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn status_str(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.passed {
            "✓"
        } else {
            "✗"
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Test {}", self.symbol(), self.test_index)?;
        if self.passed {
            write!(f, ": {:.2} FPS", self.average_fps)?;
        }
        write!(f, " [{}ms]", self.elapsed_ms)?;
        if let Some(msg) = &self.error_message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of a batch of tests
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn new(name: impl Into<String>, results: Vec<TestResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let total_duration_ms = results.iter().map(|r| r.elapsed_ms).sum();

        Self {
            name: name.into(),
            total,
            passed,
            failed: total - passed,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Mean FPS over the passed tests
    pub fn average_score(&self) -> Option<f64> {
        if self.passed == 0 {
            return None;
        }
        let sum: f64 = self
            .results
            .iter()
            .filter(|r| r.passed)
            .map(|r| r.average_fps)
            .sum();
        Some(sum / self.passed as f64)
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {}",
            self.total, self.passed, self.failed
        )?;
        match self.average_score() {
            Some(score) => writeln!(
                f,
                "Average Score: {:.1} FPS | Duration: {}ms",
                score, self.total_duration_ms
            ),
            None => writeln!(f, "Average Score: n/a | Duration: {}ms", self.total_duration_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass(3, 144.5);
        assert!(result.passed);
        assert_eq!(result.test_index, 3);
        assert!(result.error_message.is_none());

        let failed = TestResult::fail(4, "Device lost");
        assert!(!failed.passed);
        assert_eq!(failed.average_fps, 0.0);
        assert_eq!(failed.error_message.as_deref(), Some("Device lost"));
    }

    #[test]
    fn test_default_result_is_failure() {
        let result = TestResult::default();
        assert!(!result.passed);
        assert_eq!(result.test_index, 0);
    }

    #[test]
    fn test_result_display() {
        let result = TestResult::pass(1, 60.0).with_elapsed(5000);
        assert_eq!(result.to_string(), "✓ Test 1: 60.00 FPS [5000ms]");

        let failed = TestResult::fail(2, "Timeout");
        assert!(failed.to_string().ends_with("- Timeout"));
    }

    #[test]
    fn test_run_summary() {
        let results = vec![
            TestResult::pass(1, 100.0).with_elapsed(10),
            TestResult::fail(2, "Unsupported"),
            TestResult::pass(3, 50.0).with_elapsed(20),
        ];

        let summary = RunSummary::new("suite", results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_duration_ms, 30);
        assert_eq!(summary.average_score(), Some(75.0));
        assert!(!summary.is_all_passed());
    }

    #[test]
    fn test_average_score_without_passes() {
        let summary = RunSummary::new("empty", vec![TestResult::fail(0, "x")]);
        assert_eq!(summary.average_score(), None);
        assert_eq!(summary.pass_rate(), 0.0);
    }
}

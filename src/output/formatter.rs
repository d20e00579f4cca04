//! Output formatters for test results
//!
//! Provides JSON, Table, CSV and summary output formats.

use anyhow::anyhow;
use serde::Serialize;
use std::io::{IsTerminal, Write};

use crate::models::{RunSummary, TestConfig, TestResult};
use crate::utils::format_duration_ms;

/// Columns of every CSV report and export
pub const CSV_HEADER: [&str; 10] = [
    "test_index",
    "renderer",
    "scene",
    "width",
    "height",
    "duration_secs",
    "passed",
    "average_fps",
    "elapsed_ms",
    "error",
];

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// A result next to the configuration that produced it
#[derive(Serialize)]
struct ReportEntry<'a> {
    config: Option<&'a TestConfig>,
    #[serde(flatten)]
    result: &'a TestResult,
}

/// Run report as serialized to JSON
#[derive(Serialize)]
struct ReportJson<'a> {
    name: &'a str,
    cpu: Option<&'a str>,
    total: usize,
    passed: usize,
    failed: usize,
    average_score: Option<f64>,
    total_duration_ms: u64,
    tests: Vec<ReportEntry<'a>>,
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    /// Colors are on only when stdout is a terminal
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: std::io::stdout().is_terminal(),
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn status_label(&self, result: &TestResult) -> &'static str {
        match (self.colorize, result.passed) {
            (true, true) => "\x1b[32m✓ PASS\x1b[0m",
            (true, false) => "\x1b[31m✗ FAIL\x1b[0m",
            (false, true) => "✓ PASS",
            (false, false) => "✗ FAIL",
        }
    }

    fn format_result_table(&self, result: &TestResult, config: Option<&TestConfig>) -> String {
        let label = config.map(TestConfig::describe).unwrap_or_default();
        let fps = if result.passed {
            format!("{:>9.2} FPS", result.average_fps)
        } else {
            format!("{:>13}", "-")
        };

        let mut line = format!(
            "{:3}. {:44} {} {} [{:>6}ms]",
            result.test_index,
            label,
            fps,
            self.status_label(result),
            result.elapsed_ms
        );
        if let Some(msg) = &result.error_message {
            line.push_str(&format!(" {msg}"));
        }
        line
    }

    /// One line per completed test while a batch is running
    pub fn format_progress(
        &self,
        completed: usize,
        total: usize,
        config: Option<&TestConfig>,
        result: &TestResult,
    ) -> String {
        let label = config.map(TestConfig::describe).unwrap_or_default();
        let outcome = if result.passed {
            format!("{:.2} FPS", result.average_fps)
        } else {
            result.error_message.clone().unwrap_or_default()
        };
        format!(
            "[{}/{}] {} {} - {}",
            completed,
            total,
            self.status_label(result),
            label,
            outcome
        )
    }

    /// Format a finished run; `configs` are matched to results by position
    pub fn format_summary(
        &self,
        summary: &RunSummary,
        configs: &[TestConfig],
        cpu: Option<&str>,
    ) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary, configs, cpu),
            OutputFormat::Json => {
                serde_json::to_string(&report_json(summary, configs, cpu)).unwrap_or_default()
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(&report_json(summary, configs, cpu))
                    .unwrap_or_default()
            }
            OutputFormat::Csv => self.format_summary_csv(summary, configs),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(
        &self,
        summary: &RunSummary,
        configs: &[TestConfig],
        cpu: Option<&str>,
    ) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  Benchmark: {:48} ║\n", summary.name));
        if let Some(cpu) = cpu {
            output.push_str(&format!("║  CPU: {:54} ║\n", cpu));
        }
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for (i, result) in summary.results.iter().enumerate() {
            output.push_str(&format!(
                "║  {}\n",
                self.format_result_table(result, configs.get(i))
            ));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:2} | Pass: {} | Fail: {} | Pass Rate: {:5.1}%\n",
            summary.total,
            pass_str,
            fail_str,
            summary.pass_rate()
        ));
        let score = summary
            .average_score()
            .map(|s| format!("{s:.1} FPS"))
            .unwrap_or_else(|| "n/a".to_string());
        output.push_str(&format!(
            "║  Average Score: {} | Duration: {}\n",
            score,
            format_duration_ms(summary.total_duration_ms)
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output.push_str(&self.format_fps_bars(summary, configs));

        output
    }

    /// FPS of each passed test relative to the fastest one
    fn format_fps_bars(&self, summary: &RunSummary, configs: &[TestConfig]) -> String {
        let best = summary
            .results
            .iter()
            .filter(|r| r.passed)
            .map(|r| r.average_fps)
            .fold(0.0_f64, f64::max);
        if best <= 0.0 {
            return String::new();
        }

        let mut output = String::from("\n FPS:\n");
        for (i, result) in summary.results.iter().enumerate() {
            let label = configs.get(i).map(TestConfig::describe).unwrap_or_default();
            if !result.passed {
                output.push_str(&format!(" {:44} {:20} failed\n", label, ""));
                continue;
            }
            let bar_len = ((result.average_fps / best) * 20.0).round().clamp(0.0, 20.0) as usize;
            output.push_str(&format!(
                " {:44} {}{} {:.1}\n",
                label,
                "█".repeat(bar_len),
                "░".repeat(20 - bar_len),
                result.average_fps
            ));
        }
        output
    }

    fn format_summary_csv(&self, summary: &RunSummary, configs: &[TestConfig]) -> String {
        let tests = summary
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| (configs.get(i), result));
        write_csv(Vec::new(), tests)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        let score = summary
            .average_score()
            .map(|s| format!("{s:.1} FPS"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "{}: {}/{} passed ({:.1}%), average score {} in {}",
            summary.name,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            score,
            format_duration_ms(summary.total_duration_ms)
        )
    }
}

fn report_json<'a>(
    summary: &'a RunSummary,
    configs: &'a [TestConfig],
    cpu: Option<&'a str>,
) -> ReportJson<'a> {
    ReportJson {
        name: &summary.name,
        cpu,
        total: summary.total,
        passed: summary.passed,
        failed: summary.failed,
        average_score: summary.average_score(),
        total_duration_ms: summary.total_duration_ms,
        tests: summary
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| ReportEntry {
                config: configs.get(i),
                result,
            })
            .collect(),
    }
}

fn csv_row(config: Option<&TestConfig>, result: &TestResult) -> [String; 10] {
    let (renderer, scene, width, height, duration) = match config {
        Some(c) => (
            c.renderer.name().to_string(),
            c.scene.name().to_string(),
            c.width.to_string(),
            c.height.to_string(),
            c.duration_secs.to_string(),
        ),
        None => Default::default(),
    };

    [
        result.test_index.to_string(),
        renderer,
        scene,
        width,
        height,
        duration,
        result.passed.to_string(),
        format!("{:.2}", result.average_fps),
        result.elapsed_ms.to_string(),
        result.error_message.clone().unwrap_or_default(),
    ]
}

/// Write [`CSV_HEADER`] and one row per test, handing the writer back
pub fn write_csv<'a, W: Write>(
    writer: W,
    tests: impl IntoIterator<Item = (Option<&'a TestConfig>, &'a TestResult)>,
) -> anyhow::Result<W> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for (config, result) in tests {
        out.write_record(csv_row(config, result))?;
    }
    out.into_inner()
        .map_err(|e| anyhow!("Failed to write CSV: {}", e.error()))
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write a run report to a file, without colors
pub fn write_results_to_file(
    path: &str,
    summary: &RunSummary,
    configs: &[TestConfig],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary, configs, None);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RendererType, SceneType};

    fn sample() -> (RunSummary, Vec<TestConfig>) {
        let configs = vec![
            TestConfig::default().with_scene(SceneType::ManyCubes),
            TestConfig::default().with_renderer(RendererType::Vulkan1_2),
        ];
        let summary = RunSummary::new(
            "sample",
            vec![
                TestResult::pass(1, 120.0).with_elapsed(5000),
                TestResult::fail(2, "Vulkan \"1.2\" not supported"),
            ],
        );
        (summary, configs)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_color_follows_terminal() {
        let formatter = ResultFormatter::new(OutputFormat::Table);
        assert_eq!(formatter.colorize, std::io::stdout().is_terminal());

        let (summary, configs) = sample();
        let output = formatter.no_color().format_summary(&summary, &configs, None);
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_brief_summary() {
        let (summary, configs) = sample();
        let output =
            ResultFormatter::new(OutputFormat::Summary).format_summary(&summary, &configs, None);
        assert_eq!(
            output,
            "sample: 1/2 passed (50.0%), average score 120.0 FPS in 5.0s"
        );
    }

    #[test]
    fn test_format_progress() {
        let formatter = ResultFormatter::default().no_color();
        let config = TestConfig::default_preset();
        let line = formatter.format_progress(2, 5, Some(&config), &TestResult::pass(2, 99.5));
        assert!(line.starts_with("[2/5] ✓ PASS"));
        assert!(line.contains("OpenGL 4.6"));
        assert!(line.ends_with("99.50 FPS"));
    }

    #[test]
    fn test_table_report() {
        let (summary, configs) = sample();
        let output = ResultFormatter::default().no_color().format_summary(
            &summary,
            &configs,
            Some("Test CPU"),
        );
        assert!(output.contains("Benchmark: sample"));
        assert!(output.contains("CPU: Test CPU"));
        assert!(output.contains("Average Score: 120.0 FPS"));
        assert!(output.contains("████████████████████ 120.0"));
    }

    #[test]
    fn test_csv_report() {
        let (summary, configs) = sample();
        let output = ResultFormatter::new(OutputFormat::Csv).format_summary(&summary, &configs, None);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[2].ends_with("\"Vulkan \"\"1.2\"\" not supported\""));

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][1], "OpenGL 4.6");
        assert_eq!(&rows[0][2], "Many Cubes");
        assert_eq!(&rows[0][6], "true");
        assert_eq!(&rows[1][1], "Vulkan 1.2");
        assert_eq!(&rows[1][9], "Vulkan \"1.2\" not supported");
    }

    #[test]
    fn test_csv_without_config() {
        let result = TestResult::fail(0, "No test results returned");
        let bytes = write_csv(Vec::new(), [(None, &result)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("0,,,,,,false,0.00,0,No test results returned")
        );
    }

    #[test]
    fn test_json_report() {
        let (summary, configs) = sample();
        let output =
            ResultFormatter::new(OutputFormat::Json).format_summary(&summary, &configs, None);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["average_score"], 120.0);
        assert_eq!(value["tests"][0]["average_fps"], 120.0);
        assert_eq!(value["tests"][1]["config"]["renderer"], "vulkan_1_2");
    }

    #[test]
    fn test_write_results_to_file() {
        let (summary, configs) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_results_to_file(path.to_str().unwrap(), &summary, &configs, OutputFormat::Csv)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("test_index,renderer"));
    }
}

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use super::csv::{self, ReportInput};
use super::output::OutputWriter;
use super::{console, markdown, trends};
use crate::config::{AnalysisConfig, OutputFormat};
use crate::error::Result;
use crate::insights::{AnalysisReport, ProcessedData};

pub const SUMMARY_CSV: &str = "builds_summary.csv";
pub const REPOSITORY_CSV: &str = "repository_stats.csv";
pub const WORKFLOW_CSV: &str = "workflow_stats.csv";
pub const DAILY_CSV: &str = "daily_trends.csv";
pub const HOURLY_CSV: &str = "hourly_distribution.csv";
pub const MACHINE_TYPE_CSV: &str = "machine_type_stats.csv";
pub const ANALYSIS_JSON: &str = "analysis.json";

/// Renders processed data into the configured output formats.
pub struct ReportGenerator {
    formats: Vec<OutputFormat>,
    pretty: bool,
    print_summary: bool,
}

impl ReportGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            formats: config.output_formats.clone(),
            pretty: false,
            print_summary: true,
        }
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn print_summary(mut self, print_summary: bool) -> Self {
        self.print_summary = print_summary;
        self
    }

    fn emits(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Writes every enabled artifact into `dir` and returns the written
    /// paths in write order. The first failed write aborts the run.
    pub fn generate(&self, data: &ProcessedData, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut writer = OutputWriter::create(dir)?;

        if self.emits(OutputFormat::Csv) {
            write_tables(&mut writer, data)?;
        }

        if self.emits(OutputFormat::Markdown) {
            for doc in markdown::render(ReportInput::PeriodStatistics(&data.statistics))? {
                writer.write(&doc.file_name, &doc.content)?;
            }
        }

        if self.emits(OutputFormat::Json) {
            let json = self.analysis_json(data, Utc::now())?;
            writer.write(ANALYSIS_JSON, &json)?;
        }

        let written = writer.into_written();
        info!("Wrote {} report files to {}", written.len(), dir.display());

        if self.print_summary {
            println!(
                "{}",
                console::summary(&data.statistics, &data.workflow_analysis)
            );
        }

        Ok(written)
    }

    fn analysis_json(&self, data: &ProcessedData, generated_at: DateTime<Utc>) -> Result<String> {
        let report = AnalysisReport::from_processed(data, generated_at);
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}

fn write_tables(writer: &mut OutputWriter, data: &ProcessedData) -> Result<()> {
    writer.write_csv(
        SUMMARY_CSV,
        &csv::render(ReportInput::PeriodStatistics(&data.statistics)),
    )?;
    writer.write_csv(
        REPOSITORY_CSV,
        &csv::render(ReportInput::RepositoryAnalysis(&data.repository_analysis)),
    )?;
    writer.write_csv(
        WORKFLOW_CSV,
        &csv::render(ReportInput::WorkflowAnalysis(&data.workflow_analysis)),
    )?;
    writer.write_csv(DAILY_CSV, &trends::daily_trends(&data.builds))?;
    writer.write_csv(HOURLY_CSV, &trends::hourly_distribution(&data.builds))?;
    writer.write_csv(MACHINE_TYPE_CSV, &trends::machine_type_stats(&data.builds))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::analysis::DataProcessor;
    use crate::error::BuildLensError;
    use crate::models::fixtures::{in_repository, timed};
    use chrono::TimeZone;

    fn processed() -> ProcessedData {
        let builds = vec![
            in_repository(timed("success", "primary", 10), "ios"),
            in_repository(timed("error", "primary", 20), "ios"),
            in_repository(timed("success", "nightly", 30), "android"),
        ];
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap();

        DataProcessor::new(AnalysisConfig::default())
            .with_reference_time(now)
            .process(&builds)
            .unwrap()
    }

    fn generator(formats: Vec<OutputFormat>) -> ReportGenerator {
        let config = AnalysisConfig {
            output_formats: formats,
            ..AnalysisConfig::default()
        };
        ReportGenerator::new(&config).print_summary(false)
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_formats_write_csv_and_markdown() {
        let tmp = tempfile::tempdir().unwrap();

        let written = generator(vec![OutputFormat::Csv, OutputFormat::Markdown])
            .generate(&processed(), tmp.path())
            .unwrap();

        assert_eq!(
            file_names(&written),
            [
                SUMMARY_CSV,
                REPOSITORY_CSV,
                WORKFLOW_CSV,
                DAILY_CSV,
                HOURLY_CSV,
                MACHINE_TYPE_CSV,
                "report_7_days.md",
                "report_30_days.md",
                "report_90_days.md",
                "report_all_time.md",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_markdown_only() {
        let tmp = tempfile::tempdir().unwrap();

        let written = generator(vec![OutputFormat::Markdown])
            .generate(&processed(), tmp.path())
            .unwrap();

        assert_eq!(written.len(), 4);
        assert!(!tmp.path().join(SUMMARY_CSV).exists());
    }

    #[test]
    fn test_csv_content_written_with_bom() {
        let tmp = tempfile::tempdir().unwrap();

        generator(vec![OutputFormat::Csv])
            .generate(&processed(), tmp.path())
            .unwrap();

        let summary = fs::read_to_string(tmp.path().join(SUMMARY_CSV)).unwrap();
        assert!(summary.starts_with("\u{FEFF}Period,Total Builds"));
        assert!(summary.contains("\n7 days,3,2,1,0,66.7,"));

        let hourly = fs::read_to_string(tmp.path().join(HOURLY_CSV)).unwrap();
        assert_eq!(hourly.lines().count(), 25);
        assert!(hourly.contains("\n10:00,3,66.7\n"));

        let workflows = fs::read_to_string(tmp.path().join(WORKFLOW_CSV)).unwrap();
        assert!(workflows.contains("\nprimary,2,15.00,50.0\n"));
    }

    #[test]
    fn test_json_report() {
        let tmp = tempfile::tempdir().unwrap();

        let written = generator(vec![OutputFormat::Json])
            .pretty(true)
            .generate(&processed(), tmp.path())
            .unwrap();

        assert_eq!(file_names(&written), [ANALYSIS_JSON]);
        let json = fs::read_to_string(tmp.path().join(ANALYSIS_JSON)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_builds"], 3);
        assert_eq!(value["statistics"]["all time"]["total_builds"], 3);
        assert_eq!(
            value["repository_analysis"]["repository_workflows"]["ios"][0],
            "primary(2)"
        );
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_write_failure_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("out");
        fs::write(&blocker, "").unwrap();

        let err = generator(vec![OutputFormat::Csv])
            .generate(&processed(), &blocker)
            .unwrap_err();

        assert!(matches!(err, BuildLensError::Output { .. }));
    }
}

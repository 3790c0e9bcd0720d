use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{BuildLensError, Result};
use crate::report::markdown_file_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub periods: Vec<Period>,
    pub thresholds: Thresholds,
    pub output_formats: Vec<OutputFormat>,
    pub performance: PerformanceSettings,
}

/// A named relative window. `days: None` means all time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    pub min_workflow_executions: usize,
    pub min_failure_rate: f64,
    pub top_workflow_count: usize,
    pub max_duration_hours: u32,
    pub min_duration_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Markdown,
    Json,
}

/// Advisory knobs; analysis results never depend on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceSettings {
    pub batch_size: usize,
    pub enable_parallel_processing: bool,
    #[serde(rename = "maxMemoryUsageMB")]
    pub max_memory_usage_mb: usize,
}

impl Period {
    pub fn new(name: &str, days: Option<i64>) -> Self {
        Self {
            name: name.to_string(),
            days,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            periods: vec![
                Period::new("7 days", Some(7)),
                Period::new("30 days", Some(30)),
                Period::new("90 days", Some(90)),
                Period::new("all time", None),
            ],
            thresholds: Thresholds::default(),
            output_formats: vec![OutputFormat::Csv, OutputFormat::Markdown],
            performance: PerformanceSettings::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_workflow_executions: 5,
            min_failure_rate: 50.0,
            top_workflow_count: 3,
            max_duration_hours: 24,
            min_duration_seconds: 0,
        }
    }
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            enable_parallel_processing: true,
            max_memory_usage_mb: 512,
        }
    }
}

impl Thresholds {
    pub fn max_duration_seconds(&self) -> f64 {
        f64::from(self.max_duration_hours) * 3600.0
    }
}

impl AnalysisConfig {
    /// Loads a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BuildLensError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| BuildLensError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Periods must be non-empty, named, and unique both by name and by
    /// the markdown file each one is written to.
    pub fn validate(&self) -> Result<()> {
        if self.periods.is_empty() {
            return Err(BuildLensError::Config(
                "At least one period must be configured".to_string(),
            ));
        }
        if let Some(period) = self.periods.iter().find(|p| p.name.trim().is_empty()) {
            return Err(BuildLensError::Config(format!(
                "Period names must not be empty (days: {:?})",
                period.days
            )));
        }

        let mut names = HashSet::new();
        let mut file_names = HashSet::new();
        for period in &self.periods {
            if !names.insert(period.name.as_str()) {
                return Err(BuildLensError::Config(format!(
                    "Duplicate period name '{}'",
                    period.name
                )));
            }
            let file_name = markdown_file_name(&period.name);
            if !file_names.insert(file_name.clone()) {
                return Err(BuildLensError::Config(format!(
                    "Period '{}' would overwrite {file_name}",
                    period.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();

        let names: Vec<_> = config.periods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["7 days", "30 days", "90 days", "all time"]);
        assert_eq!(config.periods[3].days, None);
        assert_eq!(config.thresholds.min_workflow_executions, 5);
        assert!((config.thresholds.min_failure_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.thresholds.top_workflow_count, 3);
        assert!((config.thresholds.max_duration_seconds() - 86_400.0).abs() < f64::EPSILON);
        assert_eq!(
            config.output_formats,
            vec![OutputFormat::Csv, OutputFormat::Markdown]
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{
            "thresholds": {"topWorkflowCount": 10},
            "outputFormats": ["json"]
        }"#;

        let config = AnalysisConfig::from_json(json).unwrap();

        assert_eq!(config.thresholds.top_workflow_count, 10);
        assert_eq!(config.thresholds.min_workflow_executions, 5);
        assert_eq!(config.output_formats, vec![OutputFormat::Json]);
        assert_eq!(config.periods.len(), 4);
    }

    #[test]
    fn test_full_config_parses_camel_case_keys() {
        let json = r#"{
            "periods": [{"name": "week", "days": 7}, {"name": "ever", "days": null}],
            "thresholds": {
                "minWorkflowExecutions": 2,
                "minFailureRate": 25.5,
                "topWorkflowCount": 5,
                "maxDurationHours": 6,
                "minDurationSeconds": 10
            },
            "outputFormats": ["csv", "markdown", "json"],
            "performance": {"batchSize": 50, "enableParallelProcessing": false, "maxMemoryUsageMB": 128}
        }"#;

        let config = AnalysisConfig::from_json(json).unwrap();

        assert_eq!(config.periods, vec![Period::new("week", Some(7)), Period::new("ever", None)]);
        assert_eq!(config.thresholds.min_duration_seconds, 10);
        assert_eq!(config.thresholds.max_duration_hours, 6);
        assert_eq!(config.performance.max_memory_usage_mb, 128);
        assert!(!config.performance.enable_parallel_processing);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = AnalysisConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let parsed = AnalysisConfig::from_json(&json).unwrap();

        assert_eq!(parsed, config);
        assert!(json.contains("\"maxMemoryUsageMB\":512"));
        assert!(json.contains("\"outputFormats\":[\"csv\",\"markdown\"]"));
    }

    #[test]
    fn test_rejects_empty_periods() {
        let err = AnalysisConfig::from_json(r#"{"periods": []}"#).unwrap_err();
        assert!(matches!(err, BuildLensError::Config(_)));
    }

    #[test]
    fn test_rejects_duplicate_period_names() {
        let json = r#"{"periods": [
            {"name": "recent", "days": 7},
            {"name": "recent", "days": null}
        ]}"#;

        let err = AnalysisConfig::from_json(json).unwrap_err();

        assert!(matches!(err, BuildLensError::Config(ref m) if m.contains("recent")));
    }

    #[test]
    fn test_rejects_periods_sharing_a_report_file() {
        let json = r#"{"periods": [{"name": "7 days", "days": 7}, {"name": "7_days", "days": 7}]}"#;

        let err = AnalysisConfig::from_json(json).unwrap_err();

        assert!(matches!(err, BuildLensError::Config(ref m) if m.contains("report_7_days.md")));
    }

    #[test]
    fn test_rejects_unknown_output_format() {
        let err = AnalysisConfig::from_json(r#"{"outputFormats": ["pdf"]}"#).unwrap_err();
        assert!(matches!(err, BuildLensError::Config(_)));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(AnalysisConfig::load(None).unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = AnalysisConfig::load(Some(Path::new("/nonexistent/buildlens.json"))).unwrap_err();
        assert!(matches!(err, BuildLensError::Config(_)));
    }
}

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info, warn};

use super::calculator::{DefaultStatisticsCalculator, StatisticsCalculator};
use super::period::filter_by_period;
use super::repositories::{DefaultRepositoryAnalyzer, RepositoryAnalyzer};
use super::validator::{BuildValidator, Validator};
use super::workflows::{DefaultWorkflowAnalyzer, WorkflowAnalyzer};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::insights::ProcessedData;
use crate::models::BuildRecord;

/// Runs validation, per-period statistics and both analyzers over one batch.
///
/// Every collaborator is built from the configuration by [`DataProcessor::new`]
/// and can be swapped with the `with_*` methods.
pub struct DataProcessor {
    config: AnalysisConfig,
    now: DateTime<Utc>,
    validator: Box<dyn Validator>,
    calculator: Box<dyn StatisticsCalculator>,
    workflow_analyzer: Box<dyn WorkflowAnalyzer>,
    repository_analyzer: Box<dyn RepositoryAnalyzer>,
}

impl DataProcessor {
    pub fn new(config: AnalysisConfig) -> Self {
        let thresholds = &config.thresholds;

        Self {
            now: Utc::now(),
            validator: Box::new(BuildValidator::new(thresholds)),
            calculator: Box::new(DefaultStatisticsCalculator::new(thresholds)),
            workflow_analyzer: Box::new(DefaultWorkflowAnalyzer::new(thresholds)),
            repository_analyzer: Box::new(DefaultRepositoryAnalyzer::new(
                thresholds,
                Box::new(DefaultStatisticsCalculator::new(thresholds)),
            )),
            config,
        }
    }

    /// Fixes the instant relative periods are measured from.
    #[must_use]
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub fn with_calculator(mut self, calculator: Box<dyn StatisticsCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    #[must_use]
    pub fn with_workflow_analyzer(mut self, analyzer: Box<dyn WorkflowAnalyzer>) -> Self {
        self.workflow_analyzer = analyzer;
        self
    }

    #[must_use]
    pub fn with_repository_analyzer(mut self, analyzer: Box<dyn RepositoryAnalyzer>) -> Self {
        self.repository_analyzer = analyzer;
        self
    }

    pub fn process(&self, builds: &[BuildRecord]) -> Result<ProcessedData> {
        self.config.validate()?;

        let performance = &self.config.performance;
        debug!(
            "Performance hints: batch size {}, parallel {}, memory {} MB",
            performance.batch_size,
            performance.enable_parallel_processing,
            performance.max_memory_usage_mb
        );

        let validated = self.validator.validate(builds)?;
        info!("{} of {} builds passed validation", validated.len(), builds.len());

        if validated.is_empty() {
            warn!("No valid builds to analyze");
        }

        let mut statistics = IndexMap::new();
        for period in &self.config.periods {
            let filtered = filter_by_period(&validated, period, self.now)?;
            if filtered.is_empty() {
                debug!("No builds in period '{}'", period.name);
                continue;
            }
            let stats = self.calculator.calculate(&filtered, &period.name)?;
            statistics.insert(period.name.clone(), stats);
        }

        let workflow_analysis = self.workflow_analyzer.analyze(&validated);
        let repository_analysis =
            self.repository_analyzer
                .analyze(&validated, &self.config.periods, self.now)?;

        info!(
            "Analyzed {} periods, {} repositories",
            statistics.len(),
            repository_analysis.repository_stats.len()
        );

        Ok(ProcessedData {
            builds: validated.into_iter().cloned().collect(),
            statistics,
            workflow_analysis,
            repository_analysis,
        })
    }
}

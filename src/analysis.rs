mod calculator;
mod duration;
mod period;
mod processor;
mod repositories;
mod stats;
mod validator;
mod workflows;

pub use calculator::{DefaultStatisticsCalculator, StatisticsCalculator};
pub use duration::{average_elapsed, elapsed_seconds, DurationBounds};
pub use period::filter_by_period;
pub use processor::DataProcessor;
pub use repositories::{DefaultRepositoryAnalyzer, RepositoryAnalyzer};
pub use stats::rate;
pub use validator::{BuildValidator, Validator};
pub use workflows::{DefaultWorkflowAnalyzer, WorkflowAnalyzer};

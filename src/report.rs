mod console;
mod csv;
mod generator;
mod markdown;
mod output;
mod trends;

pub use csv::{render as render_csv, ReportInput};
pub use generator::{
    ReportGenerator, ANALYSIS_JSON, DAILY_CSV, HOURLY_CSV, MACHINE_TYPE_CSV, REPOSITORY_CSV,
    SUMMARY_CSV, WORKFLOW_CSV,
};
pub use markdown::{file_name as markdown_file_name, render as render_markdown, MarkdownDocument};

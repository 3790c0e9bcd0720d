pub mod analysis;
pub mod auth;
pub mod config;
pub mod error;
pub mod insights;
pub mod models;
pub mod providers;
pub mod report;
pub mod timestamp;

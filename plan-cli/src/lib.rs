pub mod app;
pub mod config;
pub mod logging;
pub mod plan_file;
pub mod report;

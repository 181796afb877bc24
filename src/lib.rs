pub mod app;
pub mod config;
pub mod credential;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod input;
pub mod output;
pub mod ratio;
pub mod report;
pub mod steam;
pub mod throttle;

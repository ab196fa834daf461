pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod services;
pub mod text;

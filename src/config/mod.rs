// src/config/mod.rs

pub mod analysis;
pub mod cli;

pub use analysis::AnalysisConfig;
pub use cli::{Args, LogFormat, OutputFormat};

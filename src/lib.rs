#![allow(non_snake_case)]

// Library surface shared by the `reviewblaster` binary and the integration tests.
pub mod aggregator;
pub mod config;
pub mod data_model;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod utils;

pub use aggregator::Aggregator;
pub use error::{PipelineError, Result};
pub use executor::{LineOutcome, PipelineExecutor, RunStats};
pub use report::AnalysisReport;

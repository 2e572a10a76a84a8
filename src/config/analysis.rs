use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::utils::text::Tokenizer;

/// Settings for one analysis run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Field separator; the published dataset uses tabs.
    pub delimiter: String,
    /// Entries shown in each report.
    pub top_k: usize,
    /// Worker threads for aggregation. 1 runs everything on the calling thread.
    pub jobs: usize,
    /// Keep a word-count map per product (memory heavy on large inputs).
    pub track_product_words: bool,
    /// Stop words on top of the built-in English list.
    pub extra_stop_words: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            delimiter: "\t".to_string(),
            top_k: 10,
            jobs: 1,
            track_product_words: false,
            extra_stop_words: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "AnalysisConfig: delimiter must not be empty".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(PipelineError::ConfigValidationError(
                "AnalysisConfig: top_k must be greater than 0".to_string(),
            ));
        }
        if self.jobs == 0 {
            return Err(PipelineError::ConfigValidationError(
                "AnalysisConfig: jobs must be greater than 0".to_string(),
            ));
        }
        if let Some(idx) = self
            .extra_stop_words
            .iter()
            .position(|w| w.trim().is_empty())
        {
            return Err(PipelineError::ConfigValidationError(format!(
                "AnalysisConfig: extra stop word at index {} is empty",
                idx
            )));
        }
        Ok(())
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(&self.extra_stop_words)
    }
}

// --- Command-Line Arguments Struct ---
// Lives in the library so tests can build `Args` without spawning the binary.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AnalysisConfig;
use crate::error::{PipelineError, Result};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Rank the most frequent review words and the most reviewed products of a
/// tab-separated customer review dataset.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input TSV file. Falls back to REVIEWBLASTER_INPUT.
    #[arg(env = "REVIEWBLASTER_INPUT")]
    pub input_file: Option<PathBuf>,

    /// Field delimiter
    #[arg(short, long, default_value = "\t")]
    pub delimiter: String,

    /// Number of entries in each report
    #[arg(short = 'k', long, default_value_t = 10)]
    pub top_k: usize,

    /// Worker threads for aggregation (1 = single-threaded)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Also count words per product and show them for the reported products
    #[arg(long)]
    pub product_words: bool,

    /// Additional stop word (repeatable)
    #[arg(long = "stop-word")]
    pub stop_words: Vec<String>,

    /// Report format on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Optional: write Prometheus metrics in text format to this file at exit
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// The input path, required for a run.
    pub fn input_path(&self) -> Result<&PathBuf> {
        self.input_file.as_ref().ok_or_else(|| {
            PipelineError::ConfigError(
                "No input file given (pass a path or set REVIEWBLASTER_INPUT)".to_string(),
            )
        })
    }

    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let config = AnalysisConfig {
            delimiter: self.delimiter.clone(),
            top_k: self.top_k,
            jobs: self.jobs,
            track_product_words: self.product_words,
            extra_stop_words: self.stop_words.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["reviewblaster", "reviews.tsv"]).unwrap();
        assert_eq!(args.input_path().unwrap(), &PathBuf::from("reviews.tsv"));
        let config = args.analysis_config().unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "reviewblaster",
            "reviews.tsv",
            "-k",
            "5",
            "--jobs",
            "4",
            "--delimiter",
            ",",
            "--product-words",
            "--stop-word",
            "br",
            "--stop-word",
            "product",
            "--format",
            "json",
            "--no-progress",
        ])
        .unwrap();
        let config = args.analysis_config().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.jobs, 4);
        assert_eq!(config.delimiter, ",");
        assert!(config.track_product_words);
        assert_eq!(config.extra_stop_words, vec!["br", "product"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.no_progress);
    }

    #[test]
    fn test_invalid_top_k() {
        let args = Args::try_parse_from(["reviewblaster", "reviews.tsv", "-k", "0"]).unwrap();
        assert!(matches!(
            args.analysis_config(),
            Err(PipelineError::ConfigValidationError(_))
        ));
    }
}

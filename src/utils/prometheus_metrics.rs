// src/utils/prometheus_metrics.rs

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use prometheus::{
    gather, register_counter, register_histogram, Counter, Encoder, Histogram, TextEncoder,
};

use crate::error::{PipelineError, Result};

pub static LINES_READ_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "reviewblaster_lines_read_total",
        "Total number of input lines read, header included."
    )
    .expect("Failed to register LINES_READ_TOTAL counter")
});

pub static ROWS_INGESTED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "reviewblaster_rows_ingested_total",
        "Total number of review rows aggregated."
    )
    .expect("Failed to register ROWS_INGESTED_TOTAL counter")
});

pub static ROWS_MISSING_FIELDS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "reviewblaster_rows_missing_fields_total",
        "Total number of rows skipped because a field was absent."
    )
    .expect("Failed to register ROWS_MISSING_FIELDS_TOTAL counter")
});

pub static ROWS_TOO_MANY_FIELDS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "reviewblaster_rows_too_many_fields_total",
        "Total number of rows with more fields than the header."
    )
    .expect("Failed to register ROWS_TOO_MANY_FIELDS_TOTAL counter")
});

pub static ROWS_NUMERIC_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "reviewblaster_rows_numeric_errors_total",
        "Total number of rows with a non-numeric integer field."
    )
    .expect("Failed to register ROWS_NUMERIC_ERRORS_TOTAL counter")
});

pub static RUN_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "reviewblaster_run_duration_seconds",
        "Histogram of input processing durations (first line to last aggregation)."
    )
    .expect("Failed to register RUN_DURATION_SECONDS histogram")
});

/// Metrics of the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    encoder
        .encode(&gather(), &mut buffer)
        .map_err(|e| PipelineError::Unexpected(format!("Could not encode prometheus metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| PipelineError::Unexpected(format!("Prometheus metrics UTF-8 error: {}", e)))
}

pub fn write_metrics_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let text = encode_metrics()?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_registered_counters() {
        LINES_READ_TOTAL.inc();
        ROWS_INGESTED_TOTAL.inc_by(0.0);
        let text = encode_metrics().unwrap();
        assert!(text.contains("reviewblaster_lines_read_total"));
        assert!(text.contains("reviewblaster_rows_ingested_total"));
    }

    #[test]
    fn test_write_metrics_file() {
        LINES_READ_TOTAL.inc();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.prom");
        write_metrics_file(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("# TYPE reviewblaster_lines_read_total counter"));
    }
}

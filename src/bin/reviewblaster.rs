// src/bin/reviewblaster.rs

//! # ReviewBlaster
//!
//! Reads a tab-separated customer review dump (header line first, one review per
//! line), counts the words of every review body and groups reviews by product.
//! At the end it prints the total number of reviews, the most frequent words and
//! the most reviewed products.
//!
//! Logs go to stderr through `tracing`; the report goes to stdout, either as
//! text or as JSON (`--format json`). `--jobs N` aggregates on N threads.

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::HumanDuration;
use tracing::{error, info};
use ReviewBlaster::config::{Args, OutputFormat};
use ReviewBlaster::executor::PipelineExecutor;
use ReviewBlaster::pipeline::readers::{BaseReader, TsvReader};
use ReviewBlaster::utils::common::{create_progress_bar, init_tracing};
use ReviewBlaster::utils::prometheus_metrics::write_metrics_file;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_format);

    let config = args.analysis_config()?;
    let input = args.input_path()?;

    info!("ReviewBlaster started.");
    info!("Input file: {}", input.display());
    info!(
        delimiter = ?config.delimiter,
        top_k = config.top_k,
        jobs = config.jobs,
        product_words = config.track_product_words,
        "Analysis settings"
    );

    let reader = TsvReader::open(input)
        .with_context(|| format!("Failed to open input file {}", input.display()))?;

    let mut executor = PipelineExecutor::new(&config);
    let start = Instant::now();

    let run_result = if args.no_progress {
        executor.run_reader(reader)
    } else {
        let pb_template = "{spinner:.green} [{elapsed_precise}] {msg} Lines: {pos} ({per_sec})";
        let pb = create_progress_bar(0, "Reading reviews", pb_template);
        let result = executor.run_with_progress(reader.read_lines(), &pb);
        pb.finish_with_message(format!("Finished reading in {}", HumanDuration(start.elapsed())));
        result
    };

    if let Err(e) = run_result {
        error!("Run aborted: {}", e);
        return Err(e).context(format!("Failed while reading {}", input.display()));
    }

    let report = executor.report();
    match args.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    let stats = executor.stats();
    info!("--------------------");
    info!("Run Summary:");
    info!("  Lines Read: {}", stats.lines_read);
    info!("  Reviews Aggregated: {}", stats.rows_ingested);
    info!("  Rows Rejected: {}", stats.rows_rejected());
    info!("    - Missing Fields: {}", stats.rows_missing_fields);
    info!("    - Too Many Fields: {}", stats.rows_too_many_fields);
    info!("    - Invalid Numbers: {}", stats.rows_numeric_errors);
    info!("  Distinct Words: {}", executor.aggregator().distinct_words());
    info!("  Products: {}", executor.aggregator().product_count());
    info!("  Elapsed: {}", HumanDuration(start.elapsed()));
    info!("--------------------");

    if let Some(path) = &args.metrics_file {
        write_metrics_file(path)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        info!("Metrics written to {}", path.display());
    }

    Ok(())
}

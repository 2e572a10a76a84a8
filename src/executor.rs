use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::config::AnalysisConfig;
use crate::data_model::Review;
use crate::error::{PipelineError, Result};
use crate::pipeline::readers::{BaseReader, LineParser, ParsedLine};
use crate::pipeline::record_builder::build_review;
use crate::ranker::{most_frequent_words, most_reviewed_products};
use crate::report::AnalysisReport;
use crate::utils::prometheus_metrics::*;

/// Counters for one run. Every line read lands in exactly one bucket besides
/// `lines_read`: the header, an ingested row or one of the rejection reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub lines_read: u64,
    pub header_columns: usize,
    pub rows_ingested: u64,
    pub rows_missing_fields: u64,
    pub rows_too_many_fields: u64,
    pub rows_numeric_errors: u64,
}

impl RunStats {
    pub fn rows_rejected(&self) -> u64 {
        self.rows_missing_fields + self.rows_too_many_fields + self.rows_numeric_errors
    }
}

/// What happened to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Header,
    Ingested,
    /// At least one field was absent; the row is dropped without an error.
    MissingFields,
    /// A row-scoped error was logged and the row dropped.
    Rejected,
}

/// Drives a run: parse, build, tokenize and aggregate line by line, then rank.
///
/// With `jobs > 1` rows are still parsed and built in input order, but the
/// aggregation is deferred to [`PipelineExecutor::finish`], which shards the
/// reviews by product id and aggregates the shards on a rayon pool.
pub struct PipelineExecutor {
    config: AnalysisConfig,
    parser: LineParser,
    aggregator: Aggregator,
    stats: RunStats,
    pending: Vec<(u64, Review)>,
    next_sequence: u64,
}

impl PipelineExecutor {
    pub fn new(config: &AnalysisConfig) -> Self {
        PipelineExecutor {
            config: config.clone(),
            parser: LineParser::new(config.delimiter.clone()),
            aggregator: Aggregator::new(config.tokenizer(), config.track_product_words),
            stats: RunStats::default(),
            pending: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Aggregated state. In sharded mode this is only complete after `finish`.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Header column names, once the first line has been processed.
    pub fn columns(&self) -> Option<&[String]> {
        self.parser.columns()
    }

    fn is_sharded(&self) -> bool {
        self.config.jobs > 1
    }

    /// Processes one line, returning row-scoped errors to the caller instead of
    /// counting them.
    pub fn try_process_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.stats.lines_read += 1;
        LINES_READ_TOTAL.inc();

        let fields = match self.parser.parse_line(line)? {
            ParsedLine::Header(columns) => {
                debug!(columns = columns.len(), "Parsed header");
                self.stats.header_columns = columns.len();
                return Ok(LineOutcome::Header);
            }
            ParsedLine::Row(fields) => fields,
        };

        match build_review(&fields)? {
            Some(review) => {
                self.dispatch(review);
                self.stats.rows_ingested += 1;
                ROWS_INGESTED_TOTAL.inc();
                Ok(LineOutcome::Ingested)
            }
            None => {
                debug!(
                    line_number = self.parser.line_number(),
                    "Skipping row with missing fields"
                );
                self.stats.rows_missing_fields += 1;
                ROWS_MISSING_FIELDS_TOTAL.inc();
                Ok(LineOutcome::MissingFields)
            }
        }
    }

    /// Processes one line. Row-scoped errors are logged, counted and turned into
    /// [`LineOutcome::Rejected`]; anything else is returned.
    pub fn process_line(&mut self, line: &str) -> Result<LineOutcome> {
        match self.try_process_line(line) {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_row_scoped() => {
                let line_number = self.parser.line_number();
                match e {
                    PipelineError::TooManyFields { .. } => {
                        self.stats.rows_too_many_fields += 1;
                        ROWS_TOO_MANY_FIELDS_TOTAL.inc();
                    }
                    _ => {
                        self.stats.rows_numeric_errors += 1;
                        ROWS_NUMERIC_ERRORS_TOTAL.inc();
                    }
                }
                warn!(line_number, error = %e, "Rejecting row");
                Ok(LineOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, review: Review) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if self.is_sharded() {
            self.pending.push((sequence, review));
        } else {
            self.aggregator.ingest_at(sequence, review);
        }
    }

    /// Aggregates rows buffered for sharded mode. A no-op for single-threaded
    /// runs and safe to call more than once.
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let jobs = self.config.jobs;
        let pending = std::mem::take(&mut self.pending);

        let mut shards: Vec<Vec<(u64, Review)>> = (0..jobs).map(|_| Vec::new()).collect();
        for (sequence, review) in pending {
            let shard = shard_for(review.product_id(), jobs);
            shards[shard].push((sequence, review));
        }
        debug!(
            shard_sizes = ?shards.iter().map(Vec::len).collect::<Vec<_>>(),
            "Aggregating shards"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| {
                PipelineError::Unexpected(format!("Could not build aggregation pool: {}", e))
            })?;

        let template = self.aggregator.empty_like();
        let partials: Vec<Aggregator> = pool.install(|| {
            shards
                .into_par_iter()
                .map(|shard| {
                    let mut partial = template.empty_like();
                    for (sequence, review) in shard {
                        partial.ingest_at(sequence, review);
                    }
                    partial
                })
                .collect()
        });

        for partial in partials {
            self.aggregator.merge(partial);
        }
        Ok(())
    }

    /// Consumes `lines` and aggregates them. The first line is the header.
    /// Stops at the first fatal error.
    pub fn run<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        self.run_inner(lines, None)
    }

    /// Like [`PipelineExecutor::run`], ticking `pb` once per line.
    pub fn run_with_progress<I>(&mut self, lines: I, pb: &ProgressBar) -> Result<()>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        self.run_inner(lines, Some(pb))
    }

    pub fn run_reader<R: BaseReader>(&mut self, reader: R) -> Result<()> {
        self.run(reader.read_lines())
    }

    fn run_inner<I>(&mut self, lines: I, pb: Option<&ProgressBar>) -> Result<()>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let timer = RUN_DURATION_SECONDS.start_timer();
        for line in lines {
            let line = line?;
            self.process_line(&line)?;
            if let Some(pb) = pb {
                pb.inc(1);
            }
        }
        self.finish()?;
        timer.observe_duration();

        if self.stats.lines_read == 0 {
            warn!("Input was empty, no header found");
        }
        info!(
            lines_read = self.stats.lines_read,
            rows_ingested = self.stats.rows_ingested,
            rows_rejected = self.stats.rows_rejected(),
            distinct_words = self.aggregator.distinct_words(),
            products = self.aggregator.product_count(),
            "Finished reading input"
        );
        Ok(())
    }

    /// Ranks the aggregated state with the configured `top_k`.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            total_reviews: self.aggregator.total_reviews(),
            stats: self.stats.clone(),
            words: most_frequent_words(&self.aggregator, self.config.top_k),
            products: most_reviewed_products(&self.aggregator, self.config.top_k),
        }
    }
}

fn shard_for(product_id: &str, jobs: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    product_id.hash(&mut hasher);
    (hasher.finish() % jobs as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::schema::header_line;

    fn row(review_id: &str, product_id: &str, title: &str, rating: &str, body: &str) -> String {
        [
            "US", "111", review_id, product_id, "900", title, "Electronics", rating, "0", "0",
            "N", "Y", "Headline", body, "2015-08-31",
        ]
        .join("\t")
    }

    fn sample_lines() -> Vec<String> {
        vec![
            header_line("\t"),
            row("R1", "P1", "HDMI Cable", "5", "Great cable, great price"),
            row("R2", "P1", "HDMI Cable", "4", "Works great"),
            row("R3", "P2", "Headphones", "5", "Sound quality is great"),
            row("R4", "P1", "HDMI Cable", "3", "Cable is fine"),
            row("R5", "P2", "Headphones", "2", "Sound is tinny"),
        ]
    }

    fn run_lines(config: &AnalysisConfig, lines: &[String]) -> PipelineExecutor {
        let mut executor = PipelineExecutor::new(config);
        executor
            .run(lines.iter().cloned().map(Ok))
            .expect("run should succeed");
        executor
    }

    #[test]
    fn test_end_to_end_product_report() {
        let executor = run_lines(&AnalysisConfig::default(), &sample_lines());
        let report = executor.report();

        assert_eq!(report.total_reviews, 5);
        let products: Vec<(&str, &str, u64)> = report
            .products
            .entries
            .iter()
            .map(|p| (p.product_id.as_str(), p.product_title.as_str(), p.review_count))
            .collect();
        assert_eq!(
            products,
            vec![("P1", "HDMI Cable", 3), ("P2", "Headphones", 2)]
        );
        assert_eq!(report.products.remaining, 0);
        assert_eq!(report.words.entries[0].word, "great");
        assert_eq!(report.words.entries[0].count, 4);
        assert_eq!(executor.stats().header_columns, 15);
        assert_eq!(executor.stats().lines_read, 6);
    }

    #[test]
    fn test_numeric_error_excludes_row_and_continues() {
        let lines = vec![
            header_line("\t"),
            row("R1", "P1", "HDMI Cable", "five", "great"),
            row("R2", "P1", "HDMI Cable", "5", "great"),
        ];
        let executor = run_lines(&AnalysisConfig::default(), &lines);

        assert_eq!(executor.stats().rows_numeric_errors, 1);
        assert_eq!(executor.stats().rows_ingested, 1);
        assert!(executor.aggregator().review("R1").is_none());
        assert!(executor.aggregator().review("R2").is_some());
    }

    #[test]
    fn test_too_many_fields_is_counted() {
        let config = AnalysisConfig::default();
        let mut executor = PipelineExecutor::new(&config);
        assert_eq!(executor.process_line("a\tb\tc").unwrap(), LineOutcome::Header);
        assert!(matches!(
            executor.try_process_line("1\t2\t3\t4"),
            Err(PipelineError::TooManyFields {
                expected: 3,
                line_number: 2
            })
        ));
        assert_eq!(
            executor.process_line("1\t2\t3\t4").unwrap(),
            LineOutcome::Rejected
        );
        assert_eq!(executor.stats().rows_too_many_fields, 1);
        assert_eq!(executor.stats().rows_ingested, 0);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let mut fields: Vec<&str> = vec![
            "US", "111", "R1", "P1", "900", "HDMI Cable", "Electronics", "5", "0", "0", "N", "Y",
            "Headline", "Body",
        ];
        let short = fields.join("\t");
        fields.push("2015-08-31");
        let full = fields.join("\t");

        let lines = vec![header_line("\t"), short, full.replace("R1", "R2")];
        let executor = run_lines(&AnalysisConfig::default(), &lines);

        assert_eq!(executor.stats().rows_missing_fields, 1);
        assert_eq!(executor.stats().rows_ingested, 1);
        assert_eq!(executor.stats().rows_rejected(), 1);
    }

    #[test]
    fn test_fatal_error_stops_run() {
        let mut executor = PipelineExecutor::new(&AnalysisConfig::default());
        let lines = vec![
            Ok(header_line("\t")),
            Err(PipelineError::Unexpected("read failed".to_string())),
            Ok(row("R1", "P1", "HDMI Cable", "5", "great")),
        ];
        assert!(matches!(
            executor.run(lines),
            Err(PipelineError::Unexpected(_))
        ));
        assert_eq!(executor.stats().rows_ingested, 0);
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let executor = run_lines(&AnalysisConfig::default(), &[]);
        let report = executor.report();
        assert_eq!(report.total_reviews, 0);
        assert!(report.words.entries.is_empty());
        assert!(report.products.entries.is_empty());
        assert!(executor.columns().is_none());
    }

    #[test]
    fn test_sharded_matches_sequential() {
        let mut lines = vec![header_line("\t")];
        let bodies = [
            "great sound", "poor battery", "great value", "battery died fast", "love it",
            "sound is muddy", "value for money", "fast shipping",
        ];
        for i in 0..60 {
            lines.push(row(
                &format!("R{}", i),
                &format!("P{}", i % 7),
                &format!("Product {}", i % 7),
                "4",
                bodies[i % bodies.len()],
            ));
        }
        // Same review id under two products: the later row must win the index.
        lines.push(row("R3", "P6", "Replacement", "1", "broken"));

        let sequential = run_lines(&AnalysisConfig::default(), &lines);
        let sharded = run_lines(
            &AnalysisConfig {
                jobs: 4,
                ..Default::default()
            },
            &lines,
        );

        let left = sequential.report();
        let right = sharded.report();
        assert_eq!(left.total_reviews, right.total_reviews);
        assert_eq!(left.words, right.words);
        assert_eq!(left.products, right.products);
        assert_eq!(left.stats, right.stats);
        assert_eq!(
            sharded.aggregator().review("R3").map(Review::product_id),
            Some("P6")
        );
    }

    #[test]
    fn test_run_with_progress_ticks_per_line() {
        let mut executor = PipelineExecutor::new(&AnalysisConfig::default());
        let pb = ProgressBar::hidden();
        executor
            .run_with_progress(sample_lines().into_iter().map(Ok), &pb)
            .unwrap();
        assert_eq!(pb.position(), 6);
    }
}

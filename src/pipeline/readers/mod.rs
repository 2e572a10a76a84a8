// src/pipeline/readers/mod.rs

pub mod base_reader;
pub mod line_parser;
pub mod tsv_reader;

pub use base_reader::BaseReader;
pub use line_parser::{LineParser, ParsedLine};
pub use tsv_reader::TsvReader;

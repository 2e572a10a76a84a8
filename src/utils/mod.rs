// Utils

pub mod common;
pub mod prometheus_metrics;
pub mod text;

pub use text::{Tokenizer, ENGLISH_STOP_WORDS};

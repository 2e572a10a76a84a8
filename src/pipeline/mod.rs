// src/pipeline/mod.rs

pub mod readers;
pub mod record_builder;
pub mod schema;

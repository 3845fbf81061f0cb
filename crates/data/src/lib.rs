//! Record store adapters for the surveillance pipeline.
//!
//! This crate provides:
//! - The [`RecordStore`] trait injected into the pipeline
//! - A CSV store with BOM-aware UTF-8 and Latin-1 fallback decoding
//! - An in-memory store for embedding and tests

pub mod csv_store;
pub mod decode;
pub mod error;
pub mod parse;
pub mod store;

pub use csv_store::{parse_csv_bytes, CsvRecordStore, LoadReport, SkippedRow};
pub use decode::SourceEncoding;
pub use error::StoreError;
pub use store::{InMemoryRecordStore, RecordStore};

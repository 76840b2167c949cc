//! Output module for writing collected records
//!
//! The only sink is a CSV file: one header row from the declared schema,
//! one row per record, written once after the crawl fully succeeds.

mod csv_sink;

pub use csv_sink::CsvSink;

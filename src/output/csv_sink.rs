//! CSV sink for product records

use crate::record::{ProductRecord, SCHEMA, VARIANTS_COLUMN};
use crate::Result;
use std::path::PathBuf;

/// Writes an ordered record sequence to a CSV file
///
/// Columns come from the declared schema in [`crate::record`], in declared
/// order, with the `variant_prices` column appended only when variant
/// resolution was enabled for the run.
pub struct CsvSink {
    path: PathBuf,
    include_variants: bool,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, include_variants: bool) -> Self {
        CsvSink {
            path: path.into(),
            include_variants,
        }
    }

    /// Writes the header and all records, then flushes
    ///
    /// Row order is exactly the input order; the sink never reorders.
    pub fn write_all(&self, records: &[ProductRecord]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        let mut header: Vec<&str> = SCHEMA.iter().map(|(name, _)| *name).collect();
        if self.include_variants {
            header.push(VARIANTS_COLUMN);
        }
        writer.write_record(&header)?;

        for record in records {
            let mut row: Vec<String> = SCHEMA.iter().map(|(_, get)| get(record)).collect();
            if self.include_variants {
                row.push(record.encode_variants());
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;

        tracing::info!(
            records = records.len(),
            path = %self.path.display(),
            "wrote CSV output"
        );

        Ok(())
    }
}

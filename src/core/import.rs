//! Bulk import pipeline: read candidate rows from a CSV or JSON export,
//! clean and validate each, collapse duplicates, and upload the survivors
//! to the CRM in fixed-size, fixed-delay batches.

use crate::core::dedupe::{dedupe_contacts, DedupeResult};
use crate::core::mapper;
use crate::domain::model::{BatchOutcome, ContactRecord, ImportSummary, SourceRecord};
use crate::domain::ports::CrmApi;
use crate::utils::error::{Result, SyncError};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;

pub struct ImportPipeline<'a, C: CrmApi> {
    crm: &'a C,
    batch_size: usize,
    batch_delay: Duration,
}

impl<'a, C: CrmApi> ImportPipeline<'a, C> {
    pub fn new(crm: &'a C, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            crm,
            batch_size,
            batch_delay,
        }
    }

    /// Full bulk run: read, map, dedupe, write the review file, and (when
    /// `import` is set) upload. Per-row and per-chunk failures land in the
    /// summary; only I/O and parse failures on the input abort the run.
    pub async fn run(&self, input: &Path, import: bool) -> Result<ImportSummary> {
        let rows = read_records(input)?;
        tracing::info!("Read {} rows from {}", rows.len(), input.display());

        let mut summary = ImportSummary {
            total: rows.len(),
            ..Default::default()
        };

        let mut contacts = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let outcome = mapper::map_row(row, index);
            summary.errors.extend(outcome.errors);
            summary.warnings.extend(outcome.warnings);
            if let Some(contact) = outcome.contact {
                contacts.push(contact);
            }
        }
        summary.valid = contacts.len();
        summary.invalid = summary.total - summary.valid;

        for warning in &summary.warnings {
            tracing::warn!("{}", warning);
        }

        let DedupeResult { unique, duplicates } = dedupe_contacts(contacts);
        summary.duplicates = duplicates;
        summary.ready = unique.len();

        let review_path = cleaned_output_path(input);
        write_cleaned_csv(&unique, &review_path)?;
        tracing::info!("Cleaned data exported to {}", review_path.display());

        if import {
            let outcome = self.upload(&unique).await;
            summary.created = outcome.created;
            summary.errors.extend(outcome.errors);
        }

        Ok(summary)
    }

    /// Upload contacts in fixed-size chunks with a fixed delay between
    /// chunks (not after the last). A failed chunk is recorded and the
    /// run continues; the throttle is deliberately dumb, not adaptive.
    pub async fn upload(&self, contacts: &[ContactRecord]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let total_batches = contacts.len().div_ceil(self.batch_size);

        for (index, chunk) in contacts.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            tracing::info!(
                "Uploading batch {}/{} ({} contacts)",
                batch_number,
                total_batches,
                chunk.len()
            );

            match self.crm.batch_create(chunk).await {
                Ok(created) => outcome.created += created,
                Err(e) => {
                    tracing::error!("Batch {} failed: {}", batch_number, e);
                    outcome.errors.push(format!("Batch {}: {}", batch_number, e));
                }
            }

            if batch_number < total_batches {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        outcome
    }
}

/// Read source rows from a `.csv` file (every cell a string) or a `.json`
/// file holding an array of objects (numeric cells keep their type, which
/// is how Excel serial dates reach the date cleaner).
pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv_records(path),
        "json" => read_json_records(path),
        other => Err(SyncError::Input {
            message: format!(
                "Unsupported input format '{}': expected .csv or .json",
                other
            ),
        }),
    }
}

fn read_csv_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut data = HashMap::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            data.insert(header.to_string(), Value::String(cell.to_string()));
        }
        records.push(SourceRecord { data });
    }
    Ok(records)
}

fn read_json_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let file = std::fs::File::open(path)?;
    let rows: Vec<HashMap<String, Value>> = serde_json::from_reader(file)?;
    Ok(rows
        .into_iter()
        .map(|data| SourceRecord { data })
        .collect())
}

fn cleaned_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("import");
    input.with_file_name(format!("{}_cleaned.csv", stem))
}

/// Write the deduplicated contacts to a review CSV next to the input, one
/// column per property seen across the set.
pub fn write_cleaned_csv(contacts: &[ContactRecord], path: &Path) -> Result<()> {
    let columns: BTreeSet<&str> = contacts
        .iter()
        .flat_map(|c| c.properties.keys().map(String::as_str))
        .collect();
    let columns: Vec<&str> = columns.into_iter().collect();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for contact in contacts {
        let row: Vec<&str> = columns
            .iter()
            .map(|column| contact.get(column).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

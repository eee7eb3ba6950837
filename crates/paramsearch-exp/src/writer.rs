use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use paramsearch_core::errors::{ErrorInfo, PsError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::hash::stable_hash_bytes;
use crate::table::{Row, SampleTable};

/// Decimal digits written for parameter values unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 6;
/// Enough digits to round-trip any f64.
pub const MAX_PRECISION: usize = 17;

/// Outcome of a successful append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: usize,
    pub fingerprint: String,
}

/// Renders the header line followed by one line per row.
pub fn render_table(table: &SampleTable, precision: usize) -> Result<Vec<u8>, PsError> {
    check_precision(precision)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(table.header())
        .map_err(|err| wrap_csv("table-write-header", err))?;
    for row in table.rows() {
        writer
            .write_record(row_cells(row, precision))
            .map_err(|err| wrap_csv("table-write-row", err))?;
    }
    writer.into_inner().map_err(|err| {
        PsError::Io(
            ErrorInfo::new("table-flush", "failed to flush rendered table")
                .with_hint(err.to_string()),
        )
    })
}

/// Appends `table` as a header plus body block to `path`, creating the file.
///
/// The block is rendered in memory first; the file is only opened once
/// rendering succeeded. Existing content is never truncated.
pub fn append_table(
    path: &Path,
    table: &SampleTable,
    precision: usize,
) -> Result<WriteSummary, PsError> {
    validate_output_path(path)?;
    let bytes = render_table(table, precision)?;
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| io_error("table-open", "failed to open output table", path, err))?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|err| io_error("table-write", "failed to append output table", path, err))?;

    let fingerprint = stable_hash_bytes(&bytes);
    info!(
        path = %path.display(),
        rows = table.len(),
        bytes = bytes.len(),
        %fingerprint,
        "appended sample table"
    );
    Ok(WriteSummary {
        path: path.to_path_buf(),
        rows: table.len(),
        bytes: bytes.len(),
        fingerprint,
    })
}

/// Rejects empty paths and paths naming an existing directory.
pub fn validate_output_path(path: &Path) -> Result<(), PsError> {
    if path.as_os_str().is_empty() {
        return Err(PsError::config(
            "output_path",
            "output-path-empty",
            "output path must not be empty",
        ));
    }
    if path.is_dir() {
        return Err(PsError::InvalidConfig(
            ErrorInfo::new("output-path-dir", "output path is a directory")
                .with_context("path", path.display().to_string())
                .with_hint("pass a file path such as params.csv"),
        ));
    }
    Ok(())
}

pub fn check_precision(precision: usize) -> Result<(), PsError> {
    if precision > MAX_PRECISION {
        return Err(PsError::config(
            "precision",
            "precision-range",
            format!("precision must be at most {MAX_PRECISION}, got {precision}"),
        ));
    }
    Ok(())
}

fn row_cells(row: &Row, precision: usize) -> Vec<String> {
    let mut cells = Vec::with_capacity(row.width());
    cells.push(row.row_code.to_string());
    if let Some(device) = &row.device_code {
        cells.push(device.to_string());
    }
    cells.extend(row.values.iter().map(|value| format!("{value:.precision$}")));
    cells
}

fn ensure_parent(path: &Path) -> Result<(), PsError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| {
                io_error(
                    "table-create-dir",
                    "failed to create output directory",
                    parent,
                    err,
                )
            })
        }
        _ => Ok(()),
    }
}

fn io_error(code: &str, message: &str, path: &Path, err: std::io::Error) -> PsError {
    PsError::Io(
        ErrorInfo::new(code, message)
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

fn wrap_csv(code: &str, err: csv::Error) -> PsError {
    PsError::Io(ErrorInfo::new(code, "CSV rendering failure").with_hint(err.to_string()))
}

use paramsearch_core::errors::PsError;
use sha2::{Digest, Sha256};

use crate::table::SampleTable;
use crate::writer::render_table;

/// Hex SHA-256 of the table exactly as it would be written at `precision`.
///
/// Two runs that report the same fingerprint wrote byte-identical blocks.
pub fn table_fingerprint(table: &SampleTable, precision: usize) -> Result<String, PsError> {
    let bytes = render_table(table, precision)?;
    Ok(stable_hash_bytes(&bytes))
}

/// Hex SHA-256 of raw bytes.
pub fn stable_hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

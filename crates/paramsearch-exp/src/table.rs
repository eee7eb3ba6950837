use std::fmt::{self, Display};

use paramsearch_core::errors::{ErrorInfo, PsError};
use paramsearch_core::CombineMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::ParameterSet;

/// Header of the zero-based row index column.
pub const ROW_CODE_COLUMN: &str = "row_code";
/// Header of the device assignment column.
pub const DEVICE_CODE_COLUMN: &str = "device_code";
/// Largest number of rows a product table may expand to.
pub const MAX_GRID_ROWS: usize = 10_000_000;

/// Device assigned to a row: the bare round-robin id or its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceCode {
    Id(usize),
    Label(String),
}

impl Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCode::Id(id) => write!(f, "{id}"),
            DeviceCode::Label(label) => f.write_str(label),
        }
    }
}

/// One parameter combination with its row code and optional device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub row_code: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_code: Option<DeviceCode>,
    pub values: Vec<f64>,
}

impl Row {
    /// Number of cells the row occupies in the written table.
    pub fn width(&self) -> usize {
        1 + usize::from(self.device_code.is_some()) + self.values.len()
    }
}

/// Fully materialised table handed to the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl SampleTable {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count shared by the header and every row.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn has_devices(&self) -> bool {
        self.header.get(1).map(String::as_str) == Some(DEVICE_CODE_COLUMN)
    }

    /// Parameter names in column order.
    pub fn param_names(&self) -> &[String] {
        let skip = if self.has_devices() { 2 } else { 1 };
        &self.header[skip..]
    }
}

/// Label function rendering device ids as `prefix` followed by the id.
pub fn prefix_label(prefix: impl Into<String>) -> impl Fn(usize) -> String {
    let prefix = prefix.into();
    move |id| format!("{prefix}{id}")
}

/// Builds the final table from ordered names and their value sequences.
///
/// `CombineMode::Product` enumerates the Cartesian product with the first
/// sequence as the outermost loop. `CombineMode::Zip` pairs sequences by
/// position and requires equal lengths. Every row gets a zero-based row code
/// in iteration order. With `device_count > 0` rows are assigned devices
/// round-robin by row code, rendered through `device_label` when one is given.
/// Nothing is built unless every check passes.
pub fn assemble(
    names: &[String],
    values: &[Vec<f64>],
    device_count: i64,
    device_label: Option<&dyn Fn(usize) -> String>,
    mode: CombineMode,
) -> Result<SampleTable, PsError> {
    if device_count < 0 {
        return Err(PsError::InvalidConfig(
            ErrorInfo::new(
                "negative-device-count",
                format!("num_gpu must be >= 0, got {device_count}"),
            )
            .with_context("flag", "num_gpu"),
        ));
    }
    let device_count = usize::try_from(device_count).map_err(|_| {
        PsError::config("num_gpu", "device-count-range", "num_gpu does not fit in usize")
    })?;
    if names.len() != values.len() {
        return Err(PsError::DimensionMismatch(
            ErrorInfo::new(
                "names-values-length",
                "every parameter name needs exactly one value sequence",
            )
            .with_context("names", names.len().to_string())
            .with_context("sequences", values.len().to_string()),
        ));
    }

    let combos = match mode {
        CombineMode::Product => product_rows(values)?,
        CombineMode::Zip => zip_rows(names, values)?,
    };

    let mut header = Vec::with_capacity(names.len() + 2);
    header.push(ROW_CODE_COLUMN.to_string());
    if device_count > 0 {
        header.push(DEVICE_CODE_COLUMN.to_string());
    }
    header.extend(names.iter().cloned());

    let rows: Vec<Row> = combos
        .into_iter()
        .enumerate()
        .map(|(row_code, values)| {
            let device_code = (device_count > 0).then(|| {
                let id = row_code % device_count;
                match device_label {
                    Some(label) => DeviceCode::Label(label(id)),
                    None => DeviceCode::Id(id),
                }
            });
            Row {
                row_code,
                device_code,
                values,
            }
        })
        .collect();

    debug!(
        rows = rows.len(),
        columns = header.len(),
        devices = device_count,
        ?mode,
        "assembled sample table"
    );
    Ok(SampleTable { header, rows })
}

/// [`assemble`] over a builder result.
pub fn assemble_set(
    set: &ParameterSet,
    device_count: i64,
    device_label: Option<&dyn Fn(usize) -> String>,
    mode: CombineMode,
) -> Result<SampleTable, PsError> {
    assemble(&set.names, &set.values, device_count, device_label, mode)
}

fn product_rows(values: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PsError> {
    let total = values
        .iter()
        .try_fold(1usize, |acc, seq| acc.checked_mul(seq.len()))
        .filter(|total| *total <= MAX_GRID_ROWS)
        .ok_or_else(|| {
            PsError::InvalidSpec(
                ErrorInfo::new(
                    "grid-too-large",
                    format!("grid expands to more than {MAX_GRID_ROWS} rows"),
                )
                .with_hint("reduce the per-parameter counts"),
            )
        })?;
    let mut combos = Vec::with_capacity(total);
    let mut cursor = vec![0usize; values.len()];
    for _ in 0..total {
        combos.push(
            cursor
                .iter()
                .zip(values)
                .map(|(&idx, seq)| seq[idx])
                .collect(),
        );
        // Odometer step: the last sequence varies fastest.
        for slot in (0..cursor.len()).rev() {
            cursor[slot] += 1;
            if cursor[slot] < values[slot].len() {
                break;
            }
            cursor[slot] = 0;
        }
    }
    Ok(combos)
}

fn zip_rows(names: &[String], values: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PsError> {
    let Some(first) = values.first() else {
        return Ok(Vec::new());
    };
    let expected = first.len();
    if let Some((idx, seq)) = values
        .iter()
        .enumerate()
        .find(|(_, seq)| seq.len() != expected)
    {
        return Err(PsError::DimensionMismatch(
            ErrorInfo::new(
                "zip-length",
                "random-mode sequences must all have the same length",
            )
            .with_context("param", names[idx].as_str())
            .with_context("expected", expected.to_string())
            .with_context("actual", seq.len().to_string()),
        ));
    }
    Ok((0..expected)
        .map(|row| values.iter().map(|seq| seq[row]).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn product_nests_first_sequence_outermost() {
        let table = assemble(
            &names(&["a", "b"]),
            &[vec![1.0, 2.0], vec![10.0, 20.0, 30.0]],
            0,
            None,
            CombineMode::Product,
        )
        .unwrap();
        let combos: Vec<Vec<f64>> = table.rows().iter().map(|row| row.values.clone()).collect();
        assert_eq!(
            combos,
            vec![
                vec![1.0, 10.0],
                vec![1.0, 20.0],
                vec![1.0, 30.0],
                vec![2.0, 10.0],
                vec![2.0, 20.0],
                vec![2.0, 30.0],
            ]
        );
        assert_eq!(table.header(), ["row_code", "a", "b"]);
        assert!(!table.has_devices());
    }

    #[test]
    fn zip_pairs_by_position() {
        let table = assemble(
            &names(&["x", "y"]),
            &[vec![0.1, 0.2], vec![5.0, 6.0]],
            0,
            None,
            CombineMode::Zip,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].values, vec![0.2, 6.0]);
        assert_eq!(table.rows()[1].row_code, 1);
    }

    #[test]
    fn zip_rejects_ragged_sequences() {
        let err = assemble(
            &names(&["x", "y"]),
            &[vec![0.1, 0.2], vec![5.0]],
            0,
            None,
            CombineMode::Zip,
        )
        .unwrap_err();
        assert!(matches!(err, PsError::DimensionMismatch(_)));
        assert_eq!(err.info().context.get("param").map(String::as_str), Some("y"));
    }

    #[test]
    fn names_and_sequences_must_pair_up() {
        let err = assemble(&names(&["x"]), &[], 0, None, CombineMode::Product).unwrap_err();
        assert_eq!(err.info().code, "names-values-length");
    }

    #[test]
    fn negative_device_count_is_config_error() {
        let err = assemble(&names(&["x"]), &[vec![1.0]], -1, None, CombineMode::Zip)
            .unwrap_err();
        assert!(matches!(err, PsError::InvalidConfig(_)));
    }

    #[test]
    fn devices_cycle_with_labels() {
        let label = prefix_label("cuda:");
        let table = assemble(
            &names(&["x"]),
            &[vec![0.0, 1.0, 2.0, 3.0, 4.0]],
            3,
            Some(&label),
            CombineMode::Zip,
        )
        .unwrap();
        let devices: Vec<String> = table
            .rows()
            .iter()
            .map(|row| row.device_code.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(devices, ["cuda:0", "cuda:1", "cuda:2", "cuda:0", "cuda:1"]);
        assert_eq!(table.header(), ["row_code", "device_code", "x"]);
        assert_eq!(table.param_names(), ["x"]);
    }

    #[test]
    fn oversized_product_fails_before_expanding() {
        let wide = vec![0.0; 4_000];
        let err = assemble(
            &names(&["a", "b"]),
            &[wide.clone(), wide],
            0,
            None,
            CombineMode::Product,
        )
        .unwrap_err();
        assert!(matches!(err, PsError::InvalidSpec(_)));
        assert_eq!(err.info().code, "grid-too-large");
    }

    #[test]
    fn empty_sequence_yields_empty_product() {
        let table = assemble(
            &names(&["a", "b"]),
            &[vec![1.0, 2.0], vec![]],
            2,
            None,
            CombineMode::Product,
        )
        .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 4);
    }
}

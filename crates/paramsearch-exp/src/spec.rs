//! Named parameter shapes as gathered from the command line or a plan file.

use std::collections::BTreeMap;

use paramsearch_core::errors::{ErrorInfo, PsError};
use paramsearch_core::SamplingMode;
use serde::{Deserialize, Serialize};

/// Column names the assembler owns; parameters may not reuse them.
pub const RESERVED_COLUMNS: [&str; 2] = ["row_code", "device_code"];

/// Linear range expanded by grid search: `count` points from `start` to `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub start: f64,
    pub stop: f64,
    pub count: i64,
}

impl GridRange {
    pub fn new(start: f64, stop: f64, count: i64) -> Self {
        Self { start, stop, count }
    }
}

/// Two-number distribution shape for the random modes.
///
/// The fields read as `(mean, stddev)` for normal sampling and as
/// `(low, high)` for uniform and log-uniform sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomShape(pub f64, pub f64);

/// Unvalidated mapping from parameter name to its raw numeric tuple.
///
/// Iteration is in lexicographic name order, which is also the column order
/// of every table built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecMap {
    entries: BTreeMap<String, Vec<f64>>,
}

impl SpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, rejecting duplicates and reserved column names.
    pub fn insert(&mut self, name: impl Into<String>, shape: Vec<f64>) -> Result<(), PsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PsError::InvalidSpec(ErrorInfo::new(
                "empty-param-name",
                "parameter names must not be empty",
            )));
        }
        if RESERVED_COLUMNS.contains(&name.as_str()) {
            return Err(PsError::spec(
                &name,
                "reserved-param-name",
                format!("'{name}' is reserved for the table's own columns"),
            ));
        }
        if self.entries.contains_key(&name) {
            return Err(PsError::spec(
                &name,
                "duplicate-param",
                format!("parameter '{name}' was given more than once"),
            ));
        }
        self.entries.insert(name, shape);
        Ok(())
    }

    /// Parses `text` with [`parse_shape`] and inserts the result.
    pub fn insert_text(&mut self, name: &str, text: &str) -> Result<(), PsError> {
        let shape = parse_shape(name, text)?;
        self.insert(name, shape)
    }

    /// Moves every entry of `other` into `self`; any shared name is a duplicate.
    pub fn merge(&mut self, other: SpecMap) -> Result<(), PsError> {
        for (name, shape) in other.entries {
            self.insert(name, shape)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Interprets every entry as `(start, stop, count)`.
    pub fn to_grid(&self) -> Result<BTreeMap<String, GridRange>, PsError> {
        let mut out = BTreeMap::new();
        for (name, shape) in &self.entries {
            check_arity(name, shape, SamplingMode::Grid)?;
            let count = shape[2];
            if count.fract() != 0.0 || !count.is_finite() {
                return Err(PsError::spec(
                    name,
                    "grid-count",
                    format!("grid count must be an integer, got {count}"),
                ));
            }
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if count >= i64::MAX as f64 || count < i64::MIN as f64 {
                return Err(PsError::spec(
                    name,
                    "grid-count",
                    format!("grid count {count} is out of range"),
                ));
            }
            out.insert(
                name.clone(),
                GridRange::new(shape[0], shape[1], count as i64),
            );
        }
        Ok(out)
    }

    /// Interprets every entry as a two-number shape for `mode`.
    pub fn to_random(&self, mode: SamplingMode) -> Result<BTreeMap<String, RandomShape>, PsError> {
        let mut out = BTreeMap::new();
        for (name, shape) in &self.entries {
            check_arity(name, shape, mode)?;
            out.insert(name.clone(), RandomShape(shape[0], shape[1]));
        }
        Ok(out)
    }
}

impl FromIterator<(String, Vec<f64>)> for SpecMap {
    /// Collects without duplicate checks; later entries win.
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn check_arity(name: &str, shape: &[f64], mode: SamplingMode) -> Result<(), PsError> {
    if shape.len() == mode.arity() {
        return Ok(());
    }
    Err(PsError::InvalidSpec(
        ErrorInfo::new(
            "shape-arity",
            format!(
                "{mode} parameters take {} numbers, got {}",
                mode.arity(),
                shape.len()
            ),
        )
        .with_context("param", name)
        .with_hint(format!("write --{name}={}", mode.shape_hint())),
    ))
}

/// Parses a tuple such as `(0.1,1.0,3)`, `[0,1]` or `1e-4, 1e-1`.
pub fn parse_shape(name: &str, text: &str) -> Result<Vec<f64>, PsError> {
    let trimmed = text.trim();
    let inner = strip_delimiters(trimmed);
    if inner.trim().is_empty() {
        return Err(PsError::spec(
            name,
            "empty-shape",
            "parameter shape must contain at least one number",
        ));
    }
    inner
        .split(',')
        .map(|piece| {
            let piece = piece.trim();
            piece.parse::<f64>().map_err(|_| {
                PsError::InvalidSpec(
                    ErrorInfo::new("non-numeric-shape", format!("'{piece}' is not a number"))
                        .with_context("param", name)
                        .with_context("value", trimmed),
                )
            })
        })
        .collect()
}

fn strip_delimiters(text: &str) -> &str {
    for (open, close) in [('(', ')'), ('[', ']')] {
        if let Some(rest) = text.strip_prefix(open) {
            if let Some(inner) = rest.strip_suffix(close) {
                return inner;
            }
        }
    }
    text
}

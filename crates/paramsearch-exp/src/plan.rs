use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use paramsearch_core::errors::{ErrorInfo, PsError};
use serde::{Deserialize, Serialize};

use crate::spec::{parse_shape, SpecMap};

/// YAML document listing parameter shapes under `params`.
///
/// ```yaml
/// params:
///   lr: [0.0001, 0.1]
///   dropout: "(0.0, 0.5)"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub params: BTreeMap<String, ShapeValue>,
}

/// A shape written either as a YAML sequence or in flag syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeValue {
    Numbers(Vec<f64>),
    Text(String),
}

/// Reads and parses a plan file from disk.
pub fn load_plan(path: &Path) -> Result<SpecMap, PsError> {
    let text = fs::read_to_string(path).map_err(|err| {
        PsError::InvalidConfig(
            ErrorInfo::new("plan-read", "failed to read plan file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    parse_plan(&text).map_err(|err| match err {
        PsError::InvalidSpec(info) => {
            PsError::InvalidSpec(info.with_context("plan", path.display().to_string()))
        }
        other => other,
    })
}

/// Parses plan YAML into a [`SpecMap`].
pub fn parse_plan(text: &str) -> Result<SpecMap, PsError> {
    let plan: PlanFile = serde_yaml::from_str(text).map_err(|err| {
        PsError::InvalidSpec(
            ErrorInfo::new("plan-parse", "plan file is not valid YAML for a parameter plan")
                .with_hint(err.to_string()),
        )
    })?;
    let mut specs = SpecMap::new();
    for (name, value) in plan.params {
        let shape = match value {
            ShapeValue::Numbers(numbers) => numbers,
            ShapeValue::Text(text) => parse_shape(&name, &text)?,
        };
        specs.insert(name, shape)?;
    }
    Ok(specs)
}

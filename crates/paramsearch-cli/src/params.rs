//! Collects free-form `--name=(...)` flags into a [`SpecMap`].

use paramsearch_core::errors::{ErrorInfo, PsError};
use paramsearch_exp::SpecMap;

/// Option names that belong to the command itself, in normalised form.
const COMMAND_OPTIONS: [&str; 7] = [
    "num_gpu",
    "gpu_prefix",
    "num_sample",
    "seed_value",
    "precision",
    "plan",
    "log_level",
];

/// Parses trailing parameter tokens.
///
/// Accepted forms are `--name=(a,b)`, `--name=a,b`, `--name=[a,b]` and
/// `--name (a,b)`. Dashes inside names become underscores, so `--weight-decay`
/// names the `weight_decay` column.
pub fn gather_params(tokens: &[String]) -> Result<SpecMap, PsError> {
    let mut specs = SpecMap::new();
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        let Some(flag) = token.strip_prefix("--") else {
            return Err(PsError::InvalidSpec(
                ErrorInfo::new(
                    "param-flag-syntax",
                    format!("expected a parameter flag, got '{token}'"),
                )
                .with_hint("write parameters as --name=(a,b,...)"),
            ));
        };
        let (raw_name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, value.to_string()),
            None => {
                let value = iter.next().ok_or_else(|| {
                    PsError::spec(flag, "param-missing-value", "parameter flag has no value")
                })?;
                (flag, value.clone())
            }
        };
        let name = raw_name.replace('-', "_");
        if COMMAND_OPTIONS.contains(&name.as_str()) {
            return Err(PsError::InvalidConfig(
                ErrorInfo::new(
                    "option-after-params",
                    format!("--{raw_name} appeared among the parameter flags"),
                )
                .with_context("flag", name.as_str())
                .with_hint("place command options before the first parameter flag"),
            ));
        }
        specs.insert_text(&name, &value)?;
    }
    Ok(specs)
}

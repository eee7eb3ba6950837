use std::collections::BTreeMap;

use paramsearch_core::errors::{ErrorInfo, PsError};
use paramsearch_core::rng::RngHandle;
use paramsearch_core::SamplingMode;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::spec::{GridRange, RandomShape};
use crate::table::MAX_GRID_ROWS;

/// Non-positive log-uniform low bounds at most this far below zero count as zero.
pub const LOGUNIFORM_ZERO_TOLERANCE: f64 = 1e-8;

/// Replacement low bound for log-uniform ranges that start at zero.
pub const LOGUNIFORM_NUDGED_LOW: f64 = f64::EPSILON;

/// Ordered parameter names with one value sequence per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl ParameterSet {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Value sequence for `name`, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|idx| self.values[idx].as_slice())
    }
}

/// Expands each range into `count` evenly spaced points, endpoints included.
pub fn build_grid(specs: &BTreeMap<String, GridRange>) -> Result<ParameterSet, PsError> {
    ensure_non_empty(specs.len())?;
    let mut names = Vec::with_capacity(specs.len());
    let mut values = Vec::with_capacity(specs.len());
    for (name, range) in specs {
        ensure_finite(name, &[range.start, range.stop])?;
        if range.count < 1 {
            return Err(PsError::InvalidSpec(
                ErrorInfo::new(
                    "grid-count",
                    format!("grid count must be at least 1, got {}", range.count),
                )
                .with_context("param", name),
            ));
        }
        let count = usize::try_from(range.count)
            .ok()
            .filter(|count| *count <= MAX_GRID_ROWS)
            .ok_or_else(|| {
                PsError::InvalidSpec(
                    ErrorInfo::new(
                        "grid-too-large",
                        format!(
                            "grid count {} exceeds the {MAX_GRID_ROWS} row limit",
                            range.count
                        ),
                    )
                    .with_context("param", name),
                )
            })?;
        let points = linspace(range.start, range.stop, count);
        debug!(param = %name, count = points.len(), "expanded grid range");
        names.push(name.clone());
        values.push(points);
    }
    Ok(ParameterSet { names, values })
}

/// `count` points from `start` to `stop`; the last point is exactly `stop`.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            points[count - 1] = stop;
            points
        }
    }
}

/// Draws `sample_count` values per parameter from a generator seeded by `seed`.
///
/// `None` seeds from entropy. With a seed the output is bit-identical across
/// calls.
pub fn build_random(
    specs: &BTreeMap<String, RandomShape>,
    mode: SamplingMode,
    sample_count: usize,
    seed: Option<u64>,
) -> Result<ParameterSet, PsError> {
    let mut rng = RngHandle::from_optional_seed(seed);
    build_random_with(specs, mode, sample_count, &mut rng)
}

/// Same as [`build_random`] but draws from a caller supplied generator.
///
/// Parameters consume the generator one after another in name order, each
/// taking all of its samples before the next starts.
pub fn build_random_with(
    specs: &BTreeMap<String, RandomShape>,
    mode: SamplingMode,
    sample_count: usize,
    rng: &mut RngHandle,
) -> Result<ParameterSet, PsError> {
    if mode == SamplingMode::Grid {
        return Err(PsError::InvalidConfig(ErrorInfo::new(
            "grid-not-random",
            "grid mode is enumerated with build_grid, not sampled",
        )));
    }
    if sample_count < 1 {
        return Err(PsError::config(
            "num_sample",
            "num-sample",
            "num_sample must be at least 1",
        ));
    }
    ensure_non_empty(specs.len())?;

    // Validate everything before the first draw.
    let samplers = specs
        .iter()
        .map(|(name, shape)| Ok((name, Sampler::new(name, *shape, mode)?)))
        .collect::<Result<Vec<_>, PsError>>()?;

    let mut names = Vec::with_capacity(samplers.len());
    let mut values = Vec::with_capacity(samplers.len());
    for (name, sampler) in samplers {
        let column: Vec<f64> = (0..sample_count)
            .map(|_| sampler.draw(rng.inner_mut()))
            .collect();
        debug!(param = %name, %mode, samples = column.len(), "drew random column");
        names.push(name.clone());
        values.push(column);
    }
    Ok(ParameterSet { names, values })
}

#[derive(Debug, Clone)]
enum Sampler {
    Constant(f64),
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
    LogUniform(Uniform<f64>),
}

impl Sampler {
    fn new(name: &str, shape: RandomShape, mode: SamplingMode) -> Result<Self, PsError> {
        let RandomShape(first, second) = shape;
        ensure_finite(name, &[first, second])?;
        match mode {
            SamplingMode::Normal => {
                if second < 0.0 {
                    return Err(PsError::spec(
                        name,
                        "normal-stddev",
                        format!("stddev must be >= 0, got {second}"),
                    ));
                }
                Normal::new(first, second)
                    .map(Sampler::Normal)
                    .map_err(|err| PsError::spec(name, "normal-stddev", err.to_string()))
            }
            SamplingMode::Uniform => {
                if first > second {
                    return Err(PsError::spec(
                        name,
                        "uniform-bounds",
                        format!("low ({first}) must not exceed high ({second})"),
                    ));
                }
                if first == second {
                    return Ok(Sampler::Constant(first));
                }
                if !(second - first).is_finite() {
                    return Err(PsError::spec(
                        name,
                        "uniform-bounds",
                        "uniform range width overflows f64",
                    ));
                }
                Ok(Sampler::Uniform(Uniform::new(first, second)))
            }
            SamplingMode::LogUniform => {
                let mut low = first;
                let high = second;
                if low <= 0.0 && low.abs() <= LOGUNIFORM_ZERO_TOLERANCE {
                    warn!(
                        param = %name,
                        low,
                        nudged = LOGUNIFORM_NUDGED_LOW,
                        "log-uniform low bound is zero, using machine epsilon"
                    );
                    low = LOGUNIFORM_NUDGED_LOW;
                }
                if low <= 0.0 {
                    return Err(PsError::InvalidSpec(
                        ErrorInfo::new(
                            "loguniform-bounds",
                            format!("log-uniform low bound must be positive, got {low}"),
                        )
                        .with_context("param", name),
                    ));
                }
                if high <= low {
                    return Err(PsError::InvalidSpec(
                        ErrorInfo::new(
                            "loguniform-bounds",
                            format!("log-uniform high ({high}) must exceed low ({low})"),
                        )
                        .with_context("param", name),
                    ));
                }
                let (ln_low, ln_high) = (low.ln(), high.ln());
                if ln_high <= ln_low {
                    return Err(PsError::InvalidSpec(
                        ErrorInfo::new(
                            "loguniform-bounds",
                            format!("log-uniform range [{low}, {high}) collapses in log space"),
                        )
                        .with_context("param", name)
                        .with_hint("widen the range so ln(low) < ln(high)"),
                    ));
                }
                Ok(Sampler::LogUniform(Uniform::new(ln_low, ln_high)))
            }
            SamplingMode::Grid => Err(PsError::InvalidConfig(ErrorInfo::new(
                "grid-not-random",
                "grid mode is enumerated, not sampled",
            ))),
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Constant(value) => *value,
            Sampler::Normal(dist) => dist.sample(rng),
            Sampler::Uniform(dist) => dist.sample(rng),
            Sampler::LogUniform(dist) => dist.sample(rng).exp(),
        }
    }
}

fn ensure_non_empty(len: usize) -> Result<(), PsError> {
    if len == 0 {
        return Err(PsError::InvalidSpec(
            ErrorInfo::new("empty-param-set", "at least one parameter is required")
                .with_hint("pass parameters as --name=(...)"),
        ));
    }
    Ok(())
}

fn ensure_finite(name: &str, bounds: &[f64]) -> Result<(), PsError> {
    if let Some(bad) = bounds.iter().find(|value| !value.is_finite()) {
        return Err(PsError::spec(
            name,
            "non-finite-bound",
            format!("bounds must be finite numbers, got {bad}"),
        ));
    }
    Ok(())
}

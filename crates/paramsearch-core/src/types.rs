use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Sampling strategy selected by the CLI subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Exhaustive grid over linearly spaced ranges.
    Grid,
    /// Gaussian draws parameterised by `(mean, stddev)`.
    Normal,
    /// Uniform draws over `[low, high)`.
    Uniform,
    /// Log-uniform draws over `[low, high)`.
    LogUniform,
}

impl SamplingMode {
    /// How per-parameter sequences are fused into rows for this mode.
    pub const fn combine_mode(self) -> CombineMode {
        match self {
            SamplingMode::Grid => CombineMode::Product,
            SamplingMode::Normal | SamplingMode::Uniform | SamplingMode::LogUniform => {
                CombineMode::Zip
            }
        }
    }

    /// Number of numbers a parameter shape must carry in this mode.
    pub const fn arity(self) -> usize {
        match self {
            SamplingMode::Grid => 3,
            SamplingMode::Normal | SamplingMode::Uniform | SamplingMode::LogUniform => 2,
        }
    }

    /// Human readable shape description used in diagnostics.
    pub const fn shape_hint(self) -> &'static str {
        match self {
            SamplingMode::Grid => "(start,stop,count)",
            SamplingMode::Normal => "(mean,stddev)",
            SamplingMode::Uniform | SamplingMode::LogUniform => "(low,high)",
        }
    }
}

impl Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SamplingMode::Grid => "grid",
            SamplingMode::Normal => "normal",
            SamplingMode::Uniform => "uniform",
            SamplingMode::LogUniform => "loguniform",
        };
        f.write_str(name)
    }
}

/// Row construction strategy used by the table assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Cartesian product, first sequence outermost.
    Product,
    /// Positional pairing of equally long sequences.
    Zip,
}

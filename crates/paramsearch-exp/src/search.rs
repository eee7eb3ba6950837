use paramsearch_core::errors::PsError;
use paramsearch_core::SamplingMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{build_grid, build_random, ParameterSet};
use crate::spec::SpecMap;
use crate::table::{assemble_set, prefix_label, SampleTable};

/// Everything one invocation needs to produce a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub mode: SamplingMode,
    pub specs: SpecMap,
    /// Samples per parameter; ignored by grid mode.
    #[serde(default = "SearchRequest::default_num_sample")]
    pub num_sample: usize,
    #[serde(default)]
    pub num_gpu: i64,
    #[serde(default)]
    pub gpu_prefix: Option<String>,
    #[serde(default)]
    pub seed_value: Option<u64>,
}

impl SearchRequest {
    const fn default_num_sample() -> usize {
        1
    }

    pub fn grid(specs: SpecMap) -> Self {
        Self::new(SamplingMode::Grid, specs)
    }

    pub fn random(mode: SamplingMode, specs: SpecMap, num_sample: usize) -> Self {
        Self {
            num_sample,
            ..Self::new(mode, specs)
        }
    }

    fn new(mode: SamplingMode, specs: SpecMap) -> Self {
        Self {
            mode,
            specs,
            num_sample: Self::default_num_sample(),
            num_gpu: 0,
            gpu_prefix: None,
            seed_value: None,
        }
    }

    pub fn with_devices(mut self, num_gpu: i64, gpu_prefix: Option<String>) -> Self {
        self.num_gpu = num_gpu;
        self.gpu_prefix = gpu_prefix;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed_value = seed;
        self
    }
}

/// Expands the request's specs into per-parameter value sequences.
pub fn build_parameter_set(request: &SearchRequest) -> Result<ParameterSet, PsError> {
    match request.mode {
        SamplingMode::Grid => build_grid(&request.specs.to_grid()?),
        mode => build_random(
            &request.specs.to_random(mode)?,
            mode,
            request.num_sample,
            request.seed_value,
        ),
    }
}

/// Builds the parameter set and assembles it into the final table.
pub fn generate(request: &SearchRequest) -> Result<SampleTable, PsError> {
    debug!(
        mode = %request.mode,
        params = request.specs.len(),
        seed = ?request.seed_value,
        "generating parameter table"
    );
    let set = build_parameter_set(request)?;
    let label = request.gpu_prefix.as_deref().map(prefix_label);
    assemble_set(
        &set,
        request.num_gpu,
        label.as_ref().map(|f| f as &dyn Fn(usize) -> String),
        request.mode.combine_mode(),
    )
}

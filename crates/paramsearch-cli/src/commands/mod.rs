pub mod grid;
pub mod random;

use std::path::PathBuf;

use clap::Args;
use paramsearch_core::errors::PsError;
use paramsearch_exp::{
    append_table, check_precision, generate, load_plan, validate_output_path, SearchRequest,
    SpecMap, WriteSummary, DEFAULT_PRECISION,
};
use tracing::debug;

use crate::params::gather_params;

/// Arguments shared by every sampling subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// CSV file the table is appended to.
    pub output_path: PathBuf,
    /// Number of devices rows are dealt across; 0 omits the device column.
    #[arg(
        long = "num-gpu",
        visible_alias = "num_gpu",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub num_gpu: i64,
    /// Prefix turning device ids into labels such as `cuda:0`.
    #[arg(long = "gpu-prefix", visible_alias = "gpu_prefix")]
    pub gpu_prefix: Option<String>,
    /// Decimal digits written for parameter values.
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    pub precision: usize,
    /// YAML plan listing additional parameters under `params`.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Parameter flags, e.g. --lr=(0.001,0.1,5).
    #[arg(
        value_name = "PARAMS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub params: Vec<String>,
}

impl TableArgs {
    /// Flag parameters merged with the plan file, if one was given.
    pub fn specs(&self) -> Result<SpecMap, PsError> {
        let mut specs = gather_params(&self.params)?;
        if let Some(plan) = &self.plan {
            specs.merge(load_plan(plan)?)?;
        }
        Ok(specs)
    }
}

/// Validates output settings, builds the table and appends it.
///
/// Output path and precision are checked before any sampling happens.
pub fn write_request(
    args: &TableArgs,
    request: &SearchRequest,
) -> Result<WriteSummary, PsError> {
    validate_output_path(&args.output_path)?;
    check_precision(args.precision)?;
    let table = generate(request)?;
    debug!(rows = table.len(), columns = table.width(), "table ready");
    append_table(&args.output_path, &table, args.precision)
}

use clap::Args;
use paramsearch_core::errors::PsError;
use paramsearch_core::SamplingMode;
use paramsearch_exp::{SearchRequest, WriteSummary};

use super::{write_request, TableArgs};

#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Samples drawn per parameter.
    #[arg(long = "num-sample", visible_alias = "num_sample", default_value_t = 1)]
    pub num_sample: usize,
    /// Seed for reproducible draws; omit for an entropy-seeded run.
    #[arg(long = "seed-value", visible_alias = "seed_value")]
    pub seed_value: Option<u64>,
    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(mode: SamplingMode, args: &RandomArgs) -> Result<WriteSummary, PsError> {
    let request = SearchRequest::random(mode, args.table.specs()?, args.num_sample)
        .with_devices(args.table.num_gpu, args.table.gpu_prefix.clone())
        .with_seed(args.seed_value);
    write_request(&args.table, &request)
}

use clap::Args;
use paramsearch_core::errors::PsError;
use paramsearch_exp::{SearchRequest, WriteSummary};

use super::{write_request, TableArgs};

#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(args: &GridArgs) -> Result<WriteSummary, PsError> {
    let request = SearchRequest::grid(args.table.specs()?)
        .with_devices(args.table.num_gpu, args.table.gpu_prefix.clone());
    write_request(&args.table, &request)
}

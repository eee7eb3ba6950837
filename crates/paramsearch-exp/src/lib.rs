//! Hyperparameter table construction: parameter specs, grid and random
//! builders, row assembly with device assignment, and CSV output.

mod builder;
mod hash;
mod plan;
mod search;
mod spec;
mod table;
mod writer;

pub use paramsearch_core::{CombineMode, ErrorInfo, PsError, SamplingMode};
pub use builder::{
    build_grid, build_random, build_random_with, linspace, ParameterSet, LOGUNIFORM_NUDGED_LOW,
    LOGUNIFORM_ZERO_TOLERANCE,
};
pub use hash::{stable_hash_bytes, table_fingerprint};
pub use plan::{load_plan, parse_plan, PlanFile, ShapeValue};
pub use search::{build_parameter_set, generate, SearchRequest};
pub use spec::{parse_shape, GridRange, RandomShape, SpecMap, RESERVED_COLUMNS};
pub use table::{
    assemble, assemble_set, prefix_label, DeviceCode, Row, SampleTable, DEVICE_CODE_COLUMN,
    MAX_GRID_ROWS, ROW_CODE_COLUMN,
};
pub use writer::{
    append_table, check_precision, render_table, validate_output_path, WriteSummary,
    DEFAULT_PRECISION, MAX_PRECISION,
};

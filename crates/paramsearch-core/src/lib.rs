#![deny(missing_docs)]
#![doc = "Core error taxonomy, sampling modes and seeded randomness for paramsearch."]

pub mod errors;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, PsError};
pub use rng::RngHandle;
pub use types::{CombineMode, SamplingMode};

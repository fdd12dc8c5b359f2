// crates/submorph-core/src/lib.rs

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod cancel;
pub mod dictionary;
pub mod error;
pub mod logging;
pub mod mode;
pub mod options;
pub mod stats;
pub mod types;

pub use cancel::Cancel;
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use logging::{Logger, NullLogger, TracingLogger};
pub use mode::{Mode, ModeParams};
pub use options::{InducerOptions, MergeStrategy};
pub use stats::{Statistics, StrategyCounts};
pub use types::*;

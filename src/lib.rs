pub mod cliopt;
pub mod codec;
pub mod context;
pub mod error;
pub mod metric;
pub mod model;
pub mod output;
pub mod runner;

pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use metric::{Counter, Gauge, Untyped};

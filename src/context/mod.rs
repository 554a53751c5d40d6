mod context;
mod structured;

pub use context::*;
pub use structured::*;

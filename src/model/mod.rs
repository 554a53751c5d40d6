mod family;
mod labels;
mod timestamp;
mod types;

pub use family::*;
pub use labels::*;
pub use timestamp::*;
pub use types::*;

use crate::error::Result;
use crate::model::{MetricFamily, SampleValue};

pub trait Encoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>>;
}

// Shortest representation that round-trips: 3 instead of 3.0, 12.15 kept.
pub(super) fn format_value(value: SampleValue) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        value.to_string()
    }
}

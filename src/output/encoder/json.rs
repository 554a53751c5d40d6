use super::encoder::Encoder;
use crate::context::StructuredMetric;
use crate::error::{Error, ErrorKind, Result};
use crate::model::MetricFamily;

// [
//   [
//     {"namespace": "kubernetes", "subsystem": "network", "name": "load",
//      "description": "Network load", "value": 2.0, "timestamp": 1622104500.1234567,
//      "labels": {"app": "cmetrics", "hostname": "calyptia.com"}}
//   ]
// ]
pub struct JsonEncoder {}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        let metrics = families
            .iter()
            .map(StructuredMetric::from_family)
            .collect::<Vec<_>>();

        let mut buf = serde_json::to_vec(&metrics).map_err(|e| {
            Error::from(("JSON serialization failed", e)).into_kind(ErrorKind::Encoding)
        })?;
        buf.push(b'\n');
        Ok(buf)
    }
}

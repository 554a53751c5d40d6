use std::fmt::Write;

use super::encoder::{format_value, Encoder};
use super::prometheus::escape_label_value;
use crate::error::Result;
use crate::model::{MetricFamily, TimestampTrait};

// Human readable dump, one line per instance:
// 2021-05-27T08:35:00.123456789Z kubernetes_network_load{hostname="calyptia.com"} = 2
pub struct TextEncoder {}

impl TextEncoder {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format(&self, families: &[MetricFamily]) -> String {
        let mut out = String::new();
        for family in families {
            let fqname = family.identity().fqname();
            for instance in family.instances() {
                let _ = write!(
                    out,
                    "{} {}",
                    instance.timestamp().to_rfc3339_nanos(),
                    fqname
                );

                let labels = family
                    .labels()
                    .pairs(instance.key())
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                    .collect::<Vec<_>>();
                if !labels.is_empty() {
                    let _ = write!(out, "{{{}}}", labels.join(","));
                }

                let _ = writeln!(out, " = {}", format_value(instance.value()));
            }
        }
        out
    }
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for TextEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        Ok(self.format(families).into_bytes())
    }
}

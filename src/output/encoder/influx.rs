use std::fmt::Write;

use super::encoder::{format_value, Encoder};
use crate::error::Result;
use crate::model::MetricFamily;

// kubernetes_network load=1 1622104500123456789
// kubernetes_network,hostname=calyptia.com,app=cmetrics load=2 1622104500123456789
pub struct InfluxEncoder {}

impl InfluxEncoder {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format(&self, families: &[MetricFamily]) -> String {
        let mut out = String::new();
        for family in families {
            self.format_family(&mut out, family);
        }
        out
    }

    fn format_family(&self, out: &mut String, family: &MetricFamily) {
        let measurement = escape_measurement(&family.identity().measurement());
        let field = escape_tag(&family.identity().name);

        let mut ts_buffer = itoa::Buffer::new();
        for instance in family.instances() {
            out.push_str(&measurement);
            for (k, v) in family.labels().pairs(instance.key()) {
                let _ = write!(out, ",{}={}", escape_tag(k), escape_tag(v));
            }
            let _ = write!(out, " {}={}", field, format_value(instance.value()));
            out.push(' ');
            out.push_str(ts_buffer.format(instance.timestamp()));
            out.push('\n');
        }
    }
}

impl Default for InfluxEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for InfluxEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        Ok(self.format(families).into_bytes())
    }
}

fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

// Tag keys, tag values and field keys share the same rules.
fn escape_tag(s: &str) -> String {
    escape(s, &[',', ' ', '='])
}

fn escape(s: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

use std::fmt::Write;

use super::encoder::{format_value, Encoder};
use crate::error::Result;
use crate::model::{MetricFamily, TimestampTrait};

// # HELP kubernetes_network_load Network load
// # TYPE kubernetes_network_load counter
// kubernetes_network_load 1 1622104500000
// kubernetes_network_load{hostname="calyptia.com",app="cmetrics"} 2 1622104500000
pub struct PrometheusEncoder {
    add_timestamp: bool,
}

impl PrometheusEncoder {
    pub fn new(add_timestamp: bool) -> Self {
        Self { add_timestamp }
    }

    pub fn format(&self, families: &[MetricFamily]) -> String {
        let mut out = String::new();
        for family in families {
            self.format_family(&mut out, family);
        }
        out
    }

    fn format_family(&self, out: &mut String, family: &MetricFamily) {
        if family.instances().is_empty() {
            return;
        }

        let fqname = family.identity().fqname();
        let _ = writeln!(
            out,
            "# HELP {} {}",
            fqname,
            escape_help(&family.identity().description)
        );
        let _ = writeln!(out, "# TYPE {} {}", fqname, family.metric_type());

        for instance in family.instances() {
            out.push_str(&fqname);

            let mut pairs = family.labels().pairs(instance.key()).peekable();
            if pairs.peek().is_some() {
                let labels = pairs
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                    .collect::<Vec<_>>();
                let _ = write!(out, "{{{}}}", labels.join(","));
            }

            let _ = write!(out, " {}", format_value(instance.value()));
            if self.add_timestamp {
                let _ = write!(out, " {}", instance.timestamp().to_millis());
            }
            out.push('\n');
        }
    }
}

impl Default for PrometheusEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Encoder for PrometheusEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        Ok(self.format(families).into_bytes())
    }
}

fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

pub(super) fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelKey, LabelSet, MetricIdentity, MetricType};

    const TS: u64 = 1_622_104_500_123_456_789;

    fn counter() -> Result<MetricFamily> {
        let mut family = MetricFamily::new(
            MetricType::Counter,
            MetricIdentity::new("kubernetes", "network", "load", "Network load"),
            LabelSet::new(vec!["hostname", "app"]),
        );
        family.add(TS, 1.0, &LabelKey::none())?;
        family.add(TS, 1.0, &LabelKey::from(&["calyptia.com", "cmetrics"]))?;
        family.add(TS, 1.0, &LabelKey::from(&["calyptia.com", "cmetrics"]))?;
        Ok(family)
    }

    #[test]
    fn test_prometheus_counter() -> Result<()> {
        let out = PrometheusEncoder::new(true).format(&[counter()?]);
        assert_eq!(
            out,
            "# HELP kubernetes_network_load Network load\n\
             # TYPE kubernetes_network_load counter\n\
             kubernetes_network_load 1 1622104500123\n\
             kubernetes_network_load{hostname=\"calyptia.com\",app=\"cmetrics\"} 2 1622104500123\n"
        );
        Ok(())
    }

    #[test]
    fn test_prometheus_static_labels_without_timestamp() -> Result<()> {
        let mut family = MetricFamily::new(
            MetricType::Gauge,
            MetricIdentity::new("cmt", "labels", "test", "Static labels test"),
            LabelSet::new(vec!["host", "app"]),
        );
        family.set(TS, 1.0, &LabelKey::none())?;
        family.set(TS, 2.0, &LabelKey::from(&["calyptia.com", "cmetrics"]))?;
        family.add_label("dev", "Calyptia");
        family.add_label("lang", "C");

        let out = PrometheusEncoder::new(false).format(&[family]);
        assert_eq!(
            out,
            "# HELP cmt_labels_test Static labels test\n\
             # TYPE cmt_labels_test gauge\n\
             cmt_labels_test{dev=\"Calyptia\",lang=\"C\"} 1\n\
             cmt_labels_test{dev=\"Calyptia\",lang=\"C\",host=\"calyptia.com\",app=\"cmetrics\"} 2\n"
        );
        Ok(())
    }

    #[test]
    fn test_prometheus_escaping() -> Result<()> {
        let mut family = MetricFamily::new(
            MetricType::Untyped,
            MetricIdentity::new("", "", "weird", "multi\nline \\ help"),
            LabelSet::new(vec!["path"]),
        );
        family.set(TS, 12.15, &LabelKey::from("C:\\dir \"x\""))?;

        let out = PrometheusEncoder::new(false).format(&[family]);
        assert_eq!(
            out,
            "# HELP weird multi\\nline \\\\ help\n\
             # TYPE weird untyped\n\
             weird{path=\"C:\\\\dir \\\"x\\\"\"} 12.15\n"
        );
        Ok(())
    }

    #[test]
    fn test_prometheus_skips_empty_family() {
        let family = MetricFamily::new(
            MetricType::Counter,
            MetricIdentity::new("a", "b", "c", "d"),
            LabelSet::default(),
        );
        assert_eq!(PrometheusEncoder::default().format(&[family]), "");
    }
}

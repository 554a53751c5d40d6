use prost::Message;

use super::encoder::Encoder;
use super::prompb::{Label, MetadataType, MetricMetadata, Sample, TimeSeries, WriteRequest};
use crate::error::Result;
use crate::model::{MetricFamily, MetricType, TimestampTrait};

const NAME_LABEL: &str = "__name__";

/// Prometheus remote write `WriteRequest`: one time series per instance, with
/// `__name__` first, then static labels, then dynamic ones, and one metadata
/// entry per non-empty family. The payload is not snappy-compressed; that
/// belongs to the transport.
pub struct RemoteWriteEncoder {}

impl RemoteWriteEncoder {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format(&self, families: &[MetricFamily]) -> Vec<u8> {
        self.write_request(families).encode_to_vec()
    }

    fn write_request(&self, families: &[MetricFamily]) -> WriteRequest {
        let mut request = WriteRequest::default();

        for family in families {
            if family.instances().is_empty() {
                continue;
            }

            let fqname = family.identity().fqname();
            for instance in family.instances() {
                let mut labels = vec![label(NAME_LABEL, &fqname)];
                labels.extend(
                    family
                        .labels()
                        .pairs(instance.key())
                        .map(|(k, v)| label(k, v)),
                );

                request.timeseries.push(TimeSeries {
                    labels,
                    samples: vec![Sample {
                        value: instance.value(),
                        timestamp: instance.timestamp().to_millis(),
                    }],
                });
            }

            request.metadata.push(MetricMetadata {
                r#type: metadata_type(family.metric_type()) as i32,
                metric_family_name: fqname,
                help: family.identity().description.clone(),
                unit: String::new(),
            });
        }

        request
    }
}

impl Default for RemoteWriteEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for RemoteWriteEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        Ok(self.format(families))
    }
}

fn label(name: &str, value: &str) -> Label {
    Label {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

fn metadata_type(metric_type: MetricType) -> MetadataType {
    match metric_type {
        MetricType::Counter => MetadataType::Counter,
        MetricType::Gauge => MetadataType::Gauge,
        MetricType::Untyped => MetadataType::Unknown,
    }
}

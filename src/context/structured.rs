use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{MetricFamily, TimestampTrait};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredMetric {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub description: String,
    pub value: f64,
    // Seconds since the epoch.
    pub timestamp: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_labels: Option<BTreeMap<String, String>>,
}

impl StructuredMetric {
    pub fn from_family(family: &MetricFamily) -> Vec<Self> {
        let id = family.identity();
        let labels = family.labels();

        let static_labels = if labels.statics().is_empty() {
            None
        } else {
            Some(labels.statics().iter().cloned().collect())
        };

        family
            .instances()
            .iter()
            .map(|instance| {
                let dynamic = if instance.key().is_default() {
                    None
                } else {
                    Some(
                        labels
                            .names()
                            .iter()
                            .cloned()
                            .zip(instance.key().values().iter().cloned())
                            .collect(),
                    )
                };

                Self {
                    namespace: id.namespace.clone(),
                    subsystem: id.subsystem.clone(),
                    name: id.name.clone(),
                    description: id.description.clone(),
                    value: instance.value(),
                    timestamp: instance.timestamp().to_secs_f64(),
                    labels: dynamic,
                    static_labels: static_labels.clone(),
                }
            })
            .collect()
    }
}

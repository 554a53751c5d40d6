use log::debug;

use super::labels::{LabelKey, LabelSet};
use super::timestamp::Timestamp;
use super::types::{MetricType, SampleValue};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricIdentity {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub description: String,
}

impl MetricIdentity {
    pub fn new<S: Into<String>>(namespace: S, subsystem: S, name: S, description: S) -> Self {
        Self {
            namespace: namespace.into(),
            subsystem: subsystem.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// `namespace_subsystem_name`, empty parts skipped.
    pub fn fqname(&self) -> String {
        join_non_empty(&[&self.namespace, &self.subsystem, &self.name])
    }

    /// `namespace_subsystem`, used as the InfluxDB measurement. Falls back to
    /// the bare name when both prefixes are empty.
    pub fn measurement(&self) -> String {
        let prefix = join_non_empty(&[&self.namespace, &self.subsystem]);
        if prefix.is_empty() {
            self.name.clone()
        } else {
            prefix
        }
    }
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    key: LabelKey,
    value: SampleValue,
    timestamp: Timestamp,
}

impl Instance {
    pub fn new(key: LabelKey, value: SampleValue, timestamp: Timestamp) -> Self {
        Self {
            key,
            value,
            timestamp,
        }
    }

    #[inline]
    pub fn key(&self) -> &LabelKey {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// One typed metric definition with all of its label-distinguished instances.
///
/// Instances keep first-seen order. The type-dependent rules live here so that
/// decoded families obey the same contract as the typed handles.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    identity: MetricIdentity,
    labels: LabelSet,
    metric_type: MetricType,
    instances: Vec<Instance>,
}

impl MetricFamily {
    pub fn new(metric_type: MetricType, identity: MetricIdentity, labels: LabelSet) -> Self {
        Self {
            identity,
            labels,
            metric_type,
            instances: vec![],
        }
    }

    #[inline]
    pub fn identity(&self) -> &MetricIdentity {
        &self.identity
    }

    #[inline]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    #[inline]
    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    #[inline]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn add_label<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.labels.add_static(key, value);
    }

    pub fn instance(&self, key: &LabelKey) -> Result<Option<&Instance>> {
        self.labels.check_key(key)?;
        Ok(self.instances.iter().find(|i| &i.key == key))
    }

    pub fn get(&self, key: &LabelKey) -> Result<Option<SampleValue>> {
        Ok(self.instance(key)?.map(Instance::value))
    }

    /// Writes `value`. Counters and untyped metrics refuse to go backwards, or
    /// to take NaN, and report that as `Ok(false)`.
    pub fn set(&mut self, ts: Timestamp, value: SampleValue, key: &LabelKey) -> Result<bool> {
        self.labels.check_key(key)?;

        if self.metric_type.is_monotonic() {
            if value.is_nan() {
                debug!("{} {}: rejected NaN", self.metric_type, self.identity.fqname());
                return Ok(false);
            }
            if let Some(current) = self.get(key)? {
                if value < current {
                    debug!(
                        "{} {}: rejected set {} below current value {}",
                        self.metric_type,
                        self.identity.fqname(),
                        value,
                        current
                    );
                    return Ok(false);
                }
            }
        }

        self.write(ts, value, key);
        Ok(true)
    }

    pub fn add(&mut self, ts: Timestamp, delta: SampleValue, key: &LabelKey) -> Result<bool> {
        if !self.metric_type.can_add() {
            return Err(Error::unsupported(&format!(
                "{} metrics can't be incremented",
                self.metric_type
            )));
        }
        self.labels.check_key(key)?;

        if self.metric_type.is_monotonic() && (delta.is_nan() || delta < 0.0) {
            debug!(
                "{} {}: rejected delta {}",
                self.metric_type,
                self.identity.fqname(),
                delta
            );
            return Ok(false);
        }

        let current = self.get(key)?.unwrap_or(0.0);
        self.write(ts, current + delta, key);
        Ok(true)
    }

    pub fn sub(&mut self, ts: Timestamp, delta: SampleValue, key: &LabelKey) -> Result<bool> {
        if !self.metric_type.can_sub() {
            return Err(Error::unsupported(&format!(
                "{} metrics can't be decremented",
                self.metric_type
            )));
        }
        self.labels.check_key(key)?;

        let current = self.get(key)?.unwrap_or(0.0);
        self.write(ts, current - delta, key);
        Ok(true)
    }

    // Raw write, no type rules. The decoder uses it to restore instances.
    pub(crate) fn write(&mut self, ts: Timestamp, value: SampleValue, key: &LabelKey) {
        match self.instances.iter_mut().find(|i| &i.key == key) {
            Some(instance) => {
                instance.value = value;
                instance.timestamp = ts;
            }
            None => self.instances.push(Instance::new(key.clone(), value, ts)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn family(metric_type: MetricType) -> MetricFamily {
        MetricFamily::new(
            metric_type,
            MetricIdentity::new("kubernetes", "network", "load", "Network load"),
            LabelSet::new(vec!["hostname", "app"]),
        )
    }

    #[test]
    fn test_fqname_skips_empty_parts() {
        let id = MetricIdentity::new("kubernetes", "network", "load", "");
        assert_eq!(id.fqname(), "kubernetes_network_load");
        assert_eq!(id.measurement(), "kubernetes_network");

        let id = MetricIdentity::new("", "network", "load", "");
        assert_eq!(id.fqname(), "network_load");
        assert_eq!(id.measurement(), "network");

        let id = MetricIdentity::new("", "", "load", "");
        assert_eq!(id.fqname(), "load");
        assert_eq!(id.measurement(), "load");
    }

    #[test]
    fn test_gauge_set_any_direction() -> Result<()> {
        let mut gauge = family(MetricType::Gauge);
        let key = LabelKey::none();
        assert_eq!(gauge.get(&key)?, None);

        assert!(gauge.set(1, 10.0, &key)?);
        assert!(gauge.set(2, -3.5, &key)?);
        assert_eq!(gauge.get(&key)?, Some(-3.5));
        assert_eq!(gauge.instances()[0].timestamp(), 2);
        Ok(())
    }

    #[test]
    fn test_monotonic_set() -> Result<()> {
        for metric_type in &[MetricType::Counter, MetricType::Untyped] {
            let mut metric = family(*metric_type);
            let key = LabelKey::from(&["localhost", "cmetrics"]);

            assert!(metric.set(1, 5.0, &key)?);
            assert!(metric.set(2, 5.0, &key)?);
            assert!(!metric.set(3, 4.0, &key)?);
            assert_eq!(metric.get(&key)?, Some(5.0));
            assert_eq!(metric.instances()[0].timestamp(), 2);
        }
        Ok(())
    }

    #[test]
    fn test_monotonic_set_rejects_nan() -> Result<()> {
        let mut counter = family(MetricType::Counter);
        let key = LabelKey::none();

        assert!(!counter.set(1, f64::NAN, &key)?);
        assert!(counter.instances().is_empty());

        assert!(counter.set(2, 10.0, &key)?);
        assert!(!counter.set(3, f64::NAN, &key)?);
        assert!(!counter.set(4, 1.0, &key)?);
        assert_eq!(counter.get(&key)?, Some(10.0));
        assert!(!counter.add(5, f64::NAN, &key)?);
        assert_eq!(counter.get(&key)?, Some(10.0));

        let mut gauge = family(MetricType::Gauge);
        assert!(gauge.set(1, f64::NAN, &key)?);
        assert!(gauge.get(&key)?.map_or(false, f64::is_nan));
        Ok(())
    }

    // A negative delta would move a counter backwards: it's refused and the
    // value stays, instead of becoming previous + delta.
    #[test]
    fn test_counter_add_negative_delta_is_refused() -> Result<()> {
        let mut counter = family(MetricType::Counter);
        let key = LabelKey::from(&["localhost", "cmetrics"]);

        assert!(counter.add(1, 3.0, &key)?);
        assert!(!counter.add(2, -1.0, &key)?);
        assert_eq!(counter.get(&key)?, Some(3.0));
        assert_eq!(counter.instances()[0].timestamp(), 1);

        let mut fresh = family(MetricType::Counter);
        assert!(!fresh.add(1, -1.0, &key)?);
        assert!(fresh.instances().is_empty());
        Ok(())
    }

    #[test]
    fn test_add_and_sub_capabilities() -> Result<()> {
        let key = LabelKey::none();

        let mut untyped = family(MetricType::Untyped);
        let err = untyped.add(1, 1.0, &key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert!(untyped.instances().is_empty());

        let mut counter = family(MetricType::Counter);
        assert!(counter.add(1, 1.5, &key)?);
        assert!(counter.add(2, 1.0, &key)?);
        assert_eq!(counter.get(&key)?, Some(2.5));
        assert!(!counter.add(3, -1.0, &key)?);
        assert_eq!(
            counter.sub(4, 1.0, &key).unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );

        let mut gauge = family(MetricType::Gauge);
        assert!(gauge.sub(1, 2.0, &key)?);
        assert_eq!(gauge.get(&key)?, Some(-2.0));
        Ok(())
    }

    #[test]
    fn test_instances_first_seen_order() -> Result<()> {
        let mut gauge = family(MetricType::Gauge);
        gauge.add(1, 1.0, &LabelKey::from(&["b", "x"]))?;
        gauge.add(2, 1.0, &LabelKey::none())?;
        gauge.add(3, 1.0, &LabelKey::from(&["a", "x"]))?;
        gauge.add(4, 1.0, &LabelKey::from(&["b", "x"]))?;

        let keys = gauge
            .instances()
            .iter()
            .map(|i| i.key().values().join(","))
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["b,x", "", "a,x"]);
        assert_eq!(gauge.get(&LabelKey::from(&["b", "x"]))?, Some(2.0));
        Ok(())
    }

    #[test]
    fn test_arity_mismatch() {
        let mut gauge = family(MetricType::Gauge);
        let err = gauge.set(1, 1.0, &LabelKey::from("only-one")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LabelArity);
        assert!(gauge.instances().is_empty());
    }
}

use std::marker::PhantomData;

use super::kind::{Decrement, Increment, Kind};
use crate::error::{Error, Result};
use crate::model::{
    LabelKey, LabelSet, MetricFamily, MetricIdentity, SampleValue, Timestamp,
    TimestampTrait,
};
use crate::output::encoder::{
    Encoder, InfluxEncoder, MsgpackEncoder, PrometheusEncoder, TextEncoder,
};

/// A metric handle. It starts empty and becomes usable after [`Metric::create`];
/// every other call made before that fails with `NotInitialized`.
///
/// Mutations are stamped with the current wall-clock time and report whether
/// they were applied: counters and untyped metrics refuse to move backwards.
#[derive(Debug)]
pub struct Metric<K> {
    family: Option<MetricFamily>,
    kind: PhantomData<K>,
}

impl<K: Kind> Metric<K> {
    pub fn new() -> Self {
        Self {
            family: None,
            kind: PhantomData,
        }
    }

    /// Assigns the identity and the dynamic label dimensions. Calling it again
    /// on a created handle starts a fresh family.
    pub fn create<I, N>(
        &mut self,
        namespace: &str,
        subsystem: &str,
        name: &str,
        description: &str,
        labels: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        self.family = Some(MetricFamily::new(
            K::TYPE,
            MetricIdentity::new(namespace, subsystem, name, description),
            LabelSet::new(labels),
        ));
        self
    }

    pub fn family(&self) -> Result<&MetricFamily> {
        self.family
            .as_ref()
            .ok_or_else(|| Error::not_initialized(K::TYPE.as_str()))
    }

    fn family_mut(&mut self) -> Result<&mut MetricFamily> {
        self.family
            .as_mut()
            .ok_or_else(|| Error::not_initialized(K::TYPE.as_str()))
    }

    pub fn into_family(self) -> Result<MetricFamily> {
        self.family
            .ok_or_else(|| Error::not_initialized(K::TYPE.as_str()))
    }

    pub fn val(&self) -> Result<Option<SampleValue>> {
        self.val_with(LabelKey::none())
    }

    pub fn val_with<L: Into<LabelKey>>(&self, labels: L) -> Result<Option<SampleValue>> {
        self.family()?.get(&labels.into())
    }

    pub fn set(&mut self, value: SampleValue) -> Result<bool> {
        self.set_with(value, LabelKey::none())
    }

    pub fn set_with<L: Into<LabelKey>>(&mut self, value: SampleValue, labels: L) -> Result<bool> {
        self.family_mut()?.set(Timestamp::now(), value, &labels.into())
    }

    pub fn add_label(&mut self, key: &str, value: &str) -> Result<bool> {
        self.family_mut()?.add_label(key, value);
        Ok(true)
    }

    pub fn to_prometheus(&self) -> Result<String> {
        Ok(PrometheusEncoder::new(true).format(std::slice::from_ref(self.family()?)))
    }

    pub fn to_influx(&self) -> Result<String> {
        Ok(InfluxEncoder::new().format(std::slice::from_ref(self.family()?)))
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(TextEncoder::new().format(std::slice::from_ref(self.family()?)))
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        MsgpackEncoder::new().encode(std::slice::from_ref(self.family()?))
    }
}

impl<K: Kind> Default for Metric<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Increment> Metric<K> {
    pub fn inc(&mut self) -> Result<bool> {
        self.add_with(1.0, LabelKey::none())
    }

    pub fn inc_with<L: Into<LabelKey>>(&mut self, labels: L) -> Result<bool> {
        self.add_with(1.0, labels)
    }

    pub fn add(&mut self, delta: SampleValue) -> Result<bool> {
        self.add_with(delta, LabelKey::none())
    }

    pub fn add_with<L: Into<LabelKey>>(&mut self, delta: SampleValue, labels: L) -> Result<bool> {
        self.family_mut()?.add(Timestamp::now(), delta, &labels.into())
    }
}

impl<K: Decrement> Metric<K> {
    pub fn dec(&mut self) -> Result<bool> {
        self.sub_with(1.0, LabelKey::none())
    }

    pub fn dec_with<L: Into<LabelKey>>(&mut self, labels: L) -> Result<bool> {
        self.sub_with(1.0, labels)
    }

    pub fn sub(&mut self, delta: SampleValue) -> Result<bool> {
        self.sub_with(delta, LabelKey::none())
    }

    pub fn sub_with<L: Into<LabelKey>>(&mut self, delta: SampleValue, labels: L) -> Result<bool> {
        self.family_mut()?.sub(Timestamp::now(), delta, &labels.into())
    }
}

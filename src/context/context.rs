use log::debug;

use super::structured::StructuredMetric;
use crate::codec::{self, Records};
use crate::error::{Error, Result};
use crate::metric::{Kind, Metric};
use crate::model::MetricFamily;
use crate::output::encoder::{
    Encoder, InfluxEncoder, MsgpackEncoder, PrometheusEncoder, RemoteWriteEncoder, TextEncoder,
};

/// Anything that can hand its metric families over to a [`Context`].
pub trait FamilySource {
    fn metric_families(&self) -> Result<&[MetricFamily]>;
}

impl<K: Kind> FamilySource for Metric<K> {
    fn metric_families(&self) -> Result<&[MetricFamily]> {
        Ok(std::slice::from_ref(self.family()?))
    }
}

impl FamilySource for MetricFamily {
    fn metric_families(&self) -> Result<&[MetricFamily]> {
        Ok(std::slice::from_ref(self))
    }
}

impl FamilySource for Context {
    fn metric_families(&self) -> Result<&[MetricFamily]> {
        self.families()
    }
}

/// An ordered collection of metric families, filled either by decoding wire
/// records or by concatenating metrics, ready to be rendered or re-encoded.
///
/// The context also remembers where the last decoded record ended, so that
/// calling [`Context::decode`] repeatedly walks a buffer made of concatenated
/// records one record at a time.
#[derive(Debug, Clone, Default)]
pub struct Context {
    families: Vec<MetricFamily>,
    cursor: usize,
}

impl Context {
    pub fn new() -> Self {
        Self {
            families: vec![],
            cursor: 0,
        }
    }

    /// Decodes the record at the cursor (0 for a fresh context).
    pub fn decode(&mut self, buf: &[u8]) -> Result<()> {
        self.decode_at(buf, None, None)
    }

    /// Decodes one record of `buf[..length]` starting at `offset`, replacing
    /// the context content with it. `length` defaults to the whole buffer and
    /// `offset` to the cursor. On success the cursor moves right after the
    /// record; on failure the context and the cursor are left untouched.
    pub fn decode_at(
        &mut self,
        buf: &[u8],
        length: Option<usize>,
        offset: Option<usize>,
    ) -> Result<()> {
        let length = length.unwrap_or_else(|| buf.len());
        if length > buf.len() {
            return Err(Error::malformed(format!(
                "length {} exceeds the buffer size {}",
                length,
                buf.len()
            )));
        }

        let offset = offset.unwrap_or(self.cursor);
        if offset >= length {
            return Err(Error::malformed(format!(
                "no record at offset {} of a {} bytes buffer",
                offset, length
            )));
        }

        let (family, consumed) = codec::decode_family(&buf[offset..length])?;
        self.families = vec![family];
        self.cursor = offset + consumed;
        Ok(())
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn records(buf: &[u8]) -> Records<'_> {
        Records::new(buf)
    }

    /// Calls `f` with a single-record context for every record of `buf`, in
    /// order. Returns the number of records seen, or the error of a trailing
    /// partial or corrupt record.
    pub fn feed_each<F>(buf: &[u8], mut f: F) -> Result<usize>
    where
        F: FnMut(&Context),
    {
        let mut count = 0;
        for family in Records::new(buf) {
            let context = Context {
                families: vec![family?],
                cursor: 0,
            };
            f(&context);
            count += 1;
        }
        debug!("fed {} records from {} bytes", count, buf.len());
        Ok(count)
    }

    /// Appends every family of `source` after the ones already held. Nothing
    /// is merged: families sharing a name stay distinct records.
    pub fn concat<S: FamilySource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let families = source.metric_families()?;
        self.families.extend_from_slice(families);
        Ok(())
    }

    pub fn push(&mut self, family: MetricFamily) {
        self.families.push(family);
    }

    /// Fails with `NotInitialized` until something was decoded or merged.
    pub fn families(&self) -> Result<&[MetricFamily]> {
        if self.families.is_empty() {
            return Err(Error::not_initialized("context"));
        }
        Ok(&self.families)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn encode<E: Encoder + ?Sized>(&self, encoder: &E) -> Result<Vec<u8>> {
        encoder.encode(self.families()?)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        self.encode(&MsgpackEncoder::new())
    }

    pub fn to_prometheus(&self) -> Result<String> {
        Ok(PrometheusEncoder::new(true).format(self.families()?))
    }

    pub fn to_influx(&self) -> Result<String> {
        Ok(InfluxEncoder::new().format(self.families()?))
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(TextEncoder::new().format(self.families()?))
    }

    pub fn to_remote_write(&self) -> Result<Vec<u8>> {
        self.encode(&RemoteWriteEncoder::new())
    }

    /// One list per family, one entry per instance.
    pub fn metrics(&self) -> Result<Vec<Vec<StructuredMetric>>> {
        Ok(self
            .families()?
            .iter()
            .map(StructuredMetric::from_family)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::metric::{Counter, Gauge, Untyped};

    fn gauge() -> Result<Gauge> {
        let mut gauge = Gauge::new();
        gauge.create("kubernetes", "network", "load", "Network load", &["hostname", "app"]);
        gauge.set(2.0)?;
        gauge.inc_with(&["localhost", "cmetrics"])?;
        gauge.add_with(10.0, &["localhost", "test"])?;
        Ok(gauge)
    }

    fn counter() -> Result<Counter> {
        let mut counter = Counter::new();
        counter.create("kubernetes", "network", "load", "Network load", &["hostname", "app"]);
        counter.inc()?;
        counter.inc_with(&["localhost", "cmetrics"])?;
        counter.add_with(10.5, &["localhost", "test"])?;
        Ok(counter)
    }

    #[test]
    fn test_empty_context_is_not_initialized() {
        let context = Context::new();
        for err in vec![
            context.to_prometheus().unwrap_err(),
            context.to_influx().unwrap_err(),
            context.to_text().unwrap_err(),
            context.to_msgpack().unwrap_err(),
            context.to_remote_write().unwrap_err(),
            context.metrics().unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotInitialized);
        }
    }

    #[test]
    fn test_decode_explicit_offsets() -> Result<()> {
        let (gauge, counter) = (gauge()?, counter()?);
        let mut wired = gauge.to_msgpack()?;
        wired.extend(counter.to_msgpack()?);

        let mut context = Context::new();
        context.decode_at(&wired, Some(wired.len()), None)?;
        let first = context.to_msgpack()?;
        assert_eq!(context.to_influx()?, gauge.to_influx()?);

        context.decode_at(&wired, Some(wired.len()), Some(first.len()))?;
        assert_eq!(context.to_influx()?, counter.to_influx()?);
        assert_eq!(context.cursor(), wired.len());
        Ok(())
    }

    #[test]
    fn test_decode_implicit_cursor() -> Result<()> {
        let (gauge, counter) = (gauge()?, counter()?);
        let mut wired = gauge.to_msgpack()?;
        wired.extend(counter.to_msgpack()?);

        let mut context = Context::new();
        context.decode(&wired)?;
        assert_eq!(context.to_prometheus()?, gauge.to_prometheus()?);
        context.decode(&wired)?;
        assert_eq!(context.to_prometheus()?, counter.to_prometheus()?);

        // Nothing left, the last decoded record stays in place.
        let err = context.decode(&wired).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert_eq!(context.to_prometheus()?, counter.to_prometheus()?);

        context.reset_cursor();
        context.decode(&wired)?;
        assert_eq!(context.to_prometheus()?, gauge.to_prometheus()?);
        Ok(())
    }

    #[test]
    fn test_decode_bad_arguments() -> Result<()> {
        let wired = gauge()?.to_msgpack()?;
        let mut context = Context::new();

        let err = context
            .decode_at(&wired, Some(wired.len() + 1), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);

        // Length cutting the record short.
        let err = context
            .decode_at(&wired, Some(wired.len() - 1), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(context.is_empty());
        assert_eq!(context.cursor(), 0);
        Ok(())
    }

    #[test]
    fn test_feed_each() -> Result<()> {
        let (gauge, counter) = (gauge()?, counter()?);
        let mut wired = gauge.to_msgpack()?;
        wired.extend(counter.to_msgpack()?);

        let mut seen = vec![];
        let count = Context::feed_each(&wired, |context| {
            seen.push(context.to_influx().unwrap());
        })?;
        assert_eq!(count, 2);
        assert_eq!(seen, vec![gauge.to_influx()?, counter.to_influx()?]);

        wired.extend(&[0x82, 0xa4]);
        let mut calls = 0;
        let err = Context::feed_each(&wired, |_| calls += 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert_eq!(calls, 2);
        Ok(())
    }

    #[test]
    fn test_concat_keeps_call_order() -> Result<()> {
        let mut untyped = Untyped::new();
        untyped.create("cmt", "labels", "test", "Static labels test", Vec::<&str>::new());
        untyped.set(1.0)?;

        let (gauge, counter) = (gauge()?, counter()?);
        let mut context = Context::new();
        context.concat(&counter)?;
        context.concat(&gauge)?;
        context.concat(&untyped)?;
        context.concat(&counter)?;
        assert_eq!(context.len(), 4);

        let buf = context.to_msgpack()?;
        let decoded = Context::records(&buf).collect::<Result<Vec<_>>>()?;
        assert_eq!(decoded, context.families()?.to_vec());
        assert_eq!(
            decoded.iter().map(|f| f.metric_type()).collect::<Vec<_>>(),
            vec![
                crate::model::MetricType::Counter,
                crate::model::MetricType::Gauge,
                crate::model::MetricType::Untyped,
                crate::model::MetricType::Counter,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_concat_onto_decoded() -> Result<()> {
        let (gauge, counter) = (gauge()?, counter()?);
        let mut context = Context::new();
        context.decode(&gauge.to_msgpack()?)?;
        context.concat(&counter)?;

        let mut other = Context::new();
        other.concat(&context)?;
        assert_eq!(other.len(), 2);

        let uninitialized = Counter::new();
        assert_eq!(
            other.concat(&uninitialized).unwrap_err().kind(),
            ErrorKind::NotInitialized
        );
        assert_eq!(other.len(), 2);
        Ok(())
    }
}

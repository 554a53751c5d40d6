use std::convert::TryFrom;

use log::trace;
use rmpv::ValueRef;

use super::value::{as_array, as_f64, as_map, as_string, as_strings, as_u64};
use super::*;
use crate::error::{Error, ErrorKind, Result};
use crate::model::{LabelKey, LabelSet, MetricFamily, MetricIdentity, MetricType};

// Deepest valid path is record > meta > static_labels > pair.
const MAX_DEPTH: usize = 8;

/// Decodes exactly one record from the start of `buf`. Returns the family and
/// the number of bytes the record occupies, so the caller can continue with
/// the next record of a concatenated buffer.
pub fn decode_family(buf: &[u8]) -> Result<(MetricFamily, usize)> {
    let mut rd = buf;
    let v = rmpv::decode::read_value_ref_with_max_depth(&mut rd, MAX_DEPTH).map_err(|e| {
        Error::from(("couldn't read metric record", e)).into_kind(ErrorKind::MalformedRecord)
    })?;
    let consumed = buf.len() - rd.len();

    let family = decode_record(&v)?;
    trace!(
        "decoded {} {} with {} instances from {} bytes",
        family.metric_type(),
        family.identity().fqname(),
        family.instances().len(),
        consumed
    );
    Ok((family, consumed))
}

fn decode_record(v: &ValueRef) -> Result<MetricFamily> {
    let mut meta = None;
    let mut values = None;
    for (k, v) in as_map(v, "record")? {
        match as_string(k, "record key")?.as_str() {
            KEY_META => meta = Some(v),
            KEY_VALUES => values = Some(v),
            _ => {} // ignore all other keys
        }
    }

    let meta = meta.ok_or_else(|| Error::malformed("record has no 'meta'"))?;
    let values = values.ok_or_else(|| Error::malformed("record has no 'values'"))?;

    let mut family = decode_meta(meta)?;
    for value in as_array(values, KEY_VALUES)? {
        decode_instance(&mut family, value)?;
    }
    Ok(family)
}

fn decode_meta(v: &ValueRef) -> Result<MetricFamily> {
    let mut metric_type = None;
    let mut identity = None;
    let mut names = vec![];
    let mut statics = vec![];

    for (k, v) in as_map(v, KEY_META)? {
        match as_string(k, "meta key")?.as_str() {
            KEY_TYPE => metric_type = Some(MetricType::try_from(as_u64(v, KEY_TYPE)?)?),
            KEY_OPTS => identity = Some(decode_opts(v)?),
            KEY_LABELS => names = as_strings(v, KEY_LABELS)?,
            KEY_STATIC_LABELS => {
                for pair in as_array(v, KEY_STATIC_LABELS)? {
                    match as_strings(pair, KEY_STATIC_LABELS)?.as_slice() {
                        [k, v] => statics.push((k.clone(), v.clone())),
                        _ => {
                            return Err(Error::malformed(
                                "static label should be a [key, value] pair",
                            ))
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let metric_type = metric_type.ok_or_else(|| Error::malformed("meta has no 'type'"))?;
    let identity = identity.ok_or_else(|| Error::malformed("meta has no 'opts'"))?;

    let mut labels = LabelSet::new(names);
    for (k, v) in statics {
        labels.add_static(k, v);
    }
    Ok(MetricFamily::new(metric_type, identity, labels))
}

fn decode_opts(v: &ValueRef) -> Result<MetricIdentity> {
    let mut identity = MetricIdentity::default();
    let mut has_name = false;

    for (k, v) in as_map(v, KEY_OPTS)? {
        match as_string(k, "opts key")?.as_str() {
            KEY_NAMESPACE => identity.namespace = as_string(v, KEY_NAMESPACE)?,
            KEY_SUBSYSTEM => identity.subsystem = as_string(v, KEY_SUBSYSTEM)?,
            KEY_NAME => {
                identity.name = as_string(v, KEY_NAME)?;
                has_name = true;
            }
            KEY_DESCRIPTION => identity.description = as_string(v, KEY_DESCRIPTION)?,
            _ => {}
        }
    }

    if !has_name {
        return Err(Error::malformed("opts has no 'name'"));
    }
    Ok(identity)
}

fn decode_instance(family: &mut MetricFamily, v: &ValueRef) -> Result<()> {
    let mut ts = None;
    let mut value = None;
    let mut key = LabelKey::none();

    for (k, v) in as_map(v, KEY_VALUES)? {
        match as_string(k, "value key")?.as_str() {
            KEY_TIMESTAMP => ts = Some(as_u64(v, KEY_TIMESTAMP)?),
            KEY_VALUE => value = Some(as_f64(v, KEY_VALUE)?),
            KEY_LABELS => key = LabelKey::from(as_strings(v, KEY_LABELS)?),
            _ => {}
        }
    }

    let ts = ts.ok_or_else(|| Error::malformed("value has no 'ts'"))?;
    let value = value.ok_or_else(|| Error::malformed("value has no 'value'"))?;

    family
        .labels()
        .check_key(&key)
        .map_err(|e| e.into_kind(ErrorKind::MalformedRecord))?;
    family.write(ts, value, &key);
    Ok(())
}

use log::trace;
use rmpv::ValueRef;

use super::*;
use crate::error::{Error, ErrorKind, Result};
use crate::model::{Instance, MetricFamily};

// Keys are always written in the same order so that re-encoding a decoded
// record yields the very same bytes.
//
// {
//   "meta": {
//     "type": 0,
//     "opts": {"ns": "kubernetes", "ss": "network", "name": "load", "desc": "Network load"},
//     "labels": ["hostname", "app"],
//     "static_labels": [["dev", "Calyptia"]]
//   },
//   "values": [
//     {"ts": 1622104500123456789, "value": 2.0, "labels": ["calyptia.com", "cmetrics"]}
//   ]
// }
pub fn encode_family(buf: &mut Vec<u8>, family: &MetricFamily) -> Result<()> {
    let start = buf.len();
    let id = family.identity();

    let opts = ValueRef::Map(vec![
        (KEY_NAMESPACE.into(), id.namespace.as_str().into()),
        (KEY_SUBSYSTEM.into(), id.subsystem.as_str().into()),
        (KEY_NAME.into(), id.name.as_str().into()),
        (KEY_DESCRIPTION.into(), id.description.as_str().into()),
    ]);

    let names = ValueRef::Array(
        family
            .labels()
            .names()
            .iter()
            .map(|n| n.as_str().into())
            .collect(),
    );

    let statics = ValueRef::Array(
        family
            .labels()
            .statics()
            .iter()
            .map(|(k, v)| ValueRef::Array(vec![k.as_str().into(), v.as_str().into()]))
            .collect(),
    );

    let meta = ValueRef::Map(vec![
        (
            KEY_TYPE.into(),
            ValueRef::Integer(family.metric_type().wire_tag().into()),
        ),
        (KEY_OPTS.into(), opts),
        (KEY_LABELS.into(), names),
        (KEY_STATIC_LABELS.into(), statics),
    ]);

    let values = ValueRef::Array(family.instances().iter().map(instance_value).collect());

    let record = ValueRef::Map(vec![(KEY_META.into(), meta), (KEY_VALUES.into(), values)]);

    rmpv::encode::write_value_ref(buf, &record).map_err(|e| {
        Error::from(("couldn't write metric record", e)).into_kind(ErrorKind::Encoding)
    })?;

    trace!(
        "encoded {} {} with {} instances into {} bytes",
        family.metric_type(),
        id.fqname(),
        family.instances().len(),
        buf.len() - start
    );
    Ok(())
}

fn instance_value(instance: &Instance) -> ValueRef<'_> {
    ValueRef::Map(vec![
        (
            KEY_TIMESTAMP.into(),
            ValueRef::Integer(instance.timestamp().into()),
        ),
        (KEY_VALUE.into(), ValueRef::F64(instance.value())),
        (
            KEY_LABELS.into(),
            ValueRef::Array(
                instance
                    .key()
                    .values()
                    .iter()
                    .map(|v| v.as_str().into())
                    .collect(),
            ),
        ),
    ])
}

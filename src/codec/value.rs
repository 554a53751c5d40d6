use rmpv::ValueRef;

use crate::error::{Error, Result};

pub(super) fn as_map<'a, 'b>(
    v: &'b ValueRef<'a>,
    what: &str,
) -> Result<&'b [(ValueRef<'a>, ValueRef<'a>)]> {
    match v {
        ValueRef::Map(map) => Ok(map),
        _ => Err(Error::malformed(format!(
            "msgpack value type for '{}' should be 'map'",
            what
        ))),
    }
}

pub(super) fn as_array<'a, 'b>(v: &'b ValueRef<'a>, what: &str) -> Result<&'b [ValueRef<'a>]> {
    match v {
        ValueRef::Array(items) => Ok(items),
        _ => Err(Error::malformed(format!(
            "msgpack value type for '{}' should be 'array'",
            what
        ))),
    }
}

pub(super) fn as_string(v: &ValueRef, what: &str) -> Result<String> {
    match v {
        ValueRef::String(s) => s
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::malformed(format!("invalid utf-8 string for '{}'", what))),
        _ => Err(Error::malformed(format!(
            "msgpack value type for '{}' should be 'string'",
            what
        ))),
    }
}

pub(super) fn as_strings(v: &ValueRef, what: &str) -> Result<Vec<String>> {
    as_array(v, what)?
        .iter()
        .map(|item| as_string(item, what))
        .collect()
}

pub(super) fn as_u64(v: &ValueRef, what: &str) -> Result<u64> {
    match v {
        ValueRef::Integer(i) => i
            .as_u64()
            .ok_or_else(|| Error::malformed(format!("out of range u64 value for '{}'", what))),
        _ => Err(Error::malformed(format!(
            "msgpack value type for '{}' should be 'integer'",
            what
        ))),
    }
}

pub(super) fn as_f64(v: &ValueRef, what: &str) -> Result<f64> {
    match v {
        ValueRef::F64(f) => Ok(*f),
        ValueRef::F32(f) => Ok(f64::from(*f)),
        ValueRef::Integer(i) => i
            .as_f64()
            .ok_or_else(|| Error::malformed(format!("invalid number for '{}'", what))),
        _ => Err(Error::malformed(format!(
            "msgpack value type for '{}' should be 'float'",
            what
        ))),
    }
}

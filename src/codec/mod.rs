mod decode;
mod encode;
mod records;
mod value;

pub use decode::decode_family;
pub use encode::encode_family;
pub use records::Records;

const KEY_META: &str = "meta";
const KEY_VALUES: &str = "values";

const KEY_TYPE: &str = "type";
const KEY_OPTS: &str = "opts";
const KEY_LABELS: &str = "labels";
const KEY_STATIC_LABELS: &str = "static_labels";

const KEY_NAMESPACE: &str = "ns";
const KEY_SUBSYSTEM: &str = "ss";
const KEY_NAME: &str = "name";
const KEY_DESCRIPTION: &str = "desc";

const KEY_TIMESTAMP: &str = "ts";
const KEY_VALUE: &str = "value";

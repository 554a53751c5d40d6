mod encoder;
mod influx;
mod json;
mod msgpack;
mod prometheus;
mod prompb;
mod remote_write;
mod text;

pub use encoder::Encoder;
pub use influx::InfluxEncoder;
pub use json::JsonEncoder;
pub use msgpack::MsgpackEncoder;
pub use prometheus::PrometheusEncoder;
pub use remote_write::RemoteWriteEncoder;
pub use text::TextEncoder;

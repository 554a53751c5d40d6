use super::encoder::Encoder;
use crate::codec;
use crate::error::Result;
use crate::model::MetricFamily;

/// Wire encoder: one self-delimiting record per family, concatenated.
pub struct MsgpackEncoder {}

impl MsgpackEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for MsgpackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for MsgpackEncoder {
    fn encode(&self, families: &[MetricFamily]) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(256 * families.len());
        for family in families {
            codec::encode_family(&mut buf, family)?;
        }
        Ok(buf)
    }
}

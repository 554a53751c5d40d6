use log::warn;

use super::decode::decode_family;
use crate::error::Result;
use crate::model::MetricFamily;

/// Walks a buffer of back-to-back records. Stops after the first malformed
/// record, which is yielded as an error.
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }

    /// Position right after the last successfully decoded record.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<MetricFamily>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        match decode_family(&self.buf[self.offset..]) {
            Ok((family, consumed)) => {
                self.offset += consumed;
                Some(Ok(family))
            }
            Err(e) => {
                warn!("stopped at malformed record at offset {}: {}", self.offset, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

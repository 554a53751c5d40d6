use std::io::{Read, Write};

use log::info;

use crate::context::Context;
use crate::error::Result;
use crate::output::Encoder;

// reader -> concatenated wire records -> Context (concat) -> Encoder -> writer
pub struct Runner {
    encoder: Box<dyn Encoder>,
}

impl Runner {
    pub fn new(encoder: Box<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Returns the number of records rendered.
    pub fn run<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<usize> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| ("couldn't read input", e))?;

        let mut context = Context::new();
        for family in Context::records(&buf) {
            context.concat(&family?)?;
        }
        info!("read {} records from {} bytes", context.len(), buf.len());

        let out = context.encode(self.encoder.as_ref())?;
        writer
            .write_all(&out)
            .and_then(|_| writer.flush())
            .map_err(|e| ("writer failed", e))?;

        Ok(context.len())
    }
}

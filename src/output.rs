use std::io::{self, Write};

use serde_json::Value;

pub trait Writer {
    fn write(&mut self, value: &Value) -> io::Result<()>;
}

/// Writes one compact JSON document per line.
pub struct LineWriter<W> {
    inner: W,
    delim: u8,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            delim: b'\n',
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer for LineWriter<W> {
    fn write(&mut self, value: &Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, value)?;
        self.inner.write_all(&[self.delim])
    }
}

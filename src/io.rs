use anyhow::Result;
use byteorder::ReadBytesExt;
use std::io::{BufRead, ErrorKind, Write};

pub enum Input {
    Reader(Box<dyn BufRead + 'static>),
}

impl Input {
    /// Next byte, or `None` at end of input.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        match self {
            Input::Reader(reader) => match reader.as_mut().read_u8() {
                Ok(ch) => Ok(Some(ch)),
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
                Err(err) => Err(err.into()),
            },
        }
    }

    /// Reads the next line as raw bytes, without its `\n` or `\r\n`
    /// terminator. Returns `None` at end of input. Bytes are not required to
    /// be valid UTF-8.
    pub fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            match self.read_byte()? {
                Some(b'\n') => break,
                Some(ch) => line.push(ch),
                None if line.is_empty() => return Ok(None),
                None => return Ok(Some(line)),
            }
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

pub enum Output {
    Buffer(Vec<u8>),
    Writer(Box<dyn Write + 'static>),
}

impl Output {
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        match self {
            Self::Buffer(buf) => {
                buf.extend_from_slice(line.as_bytes());
                buf.push(b'\n');
                Ok(())
            }
            Self::Writer(w) => {
                w.write_all(line.as_bytes())?;
                w.write_all(b"\n").map_err(anyhow::Error::from)
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        match self {
            Self::Buffer(_) => Ok(()),
            Self::Writer(w) => w.flush().map_err(anyhow::Error::from),
        }
    }
}

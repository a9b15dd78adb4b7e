//! Minimal CBOR writer for export documents.
//!
//! Only the items the document format needs are supported: unsigned and
//! negative integers, byte and text strings, definite and indefinite arrays,
//! booleans, `null`, `undefined` and double-precision floats. Heads always
//! use the shortest argument encoding (RFC 8949, section 4.2.1), so output
//! depends on nothing but the values written.
//!
//! Output goes through a [`Sink`]. [`SizeProbe`] only counts bytes, which is
//! how the assembler learns the document size before writing it into a
//! [`FixedBuffer`] of exactly that capacity.

use crate::error::ExportError;

const MAJOR_UINT: u8 = 0;
const MAJOR_NEGINT: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;

const INDEFINITE_ARRAY: u8 = 0x9f;
const BREAK: u8 = 0xff;
const FALSE: u8 = 0xf4;
const TRUE: u8 = 0xf5;
const NULL: u8 = 0xf6;
const UNDEFINED: u8 = 0xf7;
const FLOAT64: u8 = 0xfb;

/// Destination for encoded bytes.
pub trait Sink {
    fn put(&mut self, bytes: &[u8]) -> Result<(), ExportError>;

    /// Number of bytes accepted so far.
    fn written(&self) -> usize;
}

/// Counts bytes without storing them.
#[derive(Debug, Default)]
pub struct SizeProbe {
    len: usize,
}

impl SizeProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for SizeProbe {
    fn put(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.len += bytes.len();
        Ok(())
    }

    fn written(&self) -> usize {
        self.len
    }
}

/// Buffer that refuses to grow past the capacity it was created with.
#[derive(Debug)]
pub struct FixedBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl FixedBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        FixedBuffer {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Sink for FixedBuffer {
    fn put(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        let needed = self.buf.len() + bytes.len();
        if needed > self.capacity {
            return Err(ExportError::BufferOverflow {
                capacity: self.capacity,
                needed,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn written(&self) -> usize {
        self.buf.len()
    }
}

impl Sink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn written(&self) -> usize {
        self.len()
    }
}

/// CBOR item writer over a [`Sink`].
#[derive(Debug)]
pub struct Encoder<S> {
    sink: S,
}

impl<S: Sink> Encoder<S> {
    pub fn new(sink: S) -> Self {
        Encoder { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn head(&mut self, major: u8, value: u64) -> Result<(), ExportError> {
        let major = major << 5;
        if value < 24 {
            self.sink.put(&[major | value as u8])
        } else if value <= u64::from(u8::MAX) {
            self.sink.put(&[major | 24, value as u8])
        } else if value <= u64::from(u16::MAX) {
            self.sink.put(&[major | 25])?;
            self.sink.put(&(value as u16).to_be_bytes())
        } else if value <= u64::from(u32::MAX) {
            self.sink.put(&[major | 26])?;
            self.sink.put(&(value as u32).to_be_bytes())
        } else {
            self.sink.put(&[major | 27])?;
            self.sink.put(&value.to_be_bytes())
        }
    }

    pub fn uint(&mut self, value: u64) -> Result<(), ExportError> {
        self.head(MAJOR_UINT, value)
    }

    pub fn int(&mut self, value: i64) -> Result<(), ExportError> {
        if value >= 0 {
            self.head(MAJOR_UINT, value as u64)
        } else {
            // -1 - value, computed without overflow for i64::MIN
            self.head(MAJOR_NEGINT, !(value as u64))
        }
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.head(MAJOR_BYTES, bytes.len() as u64)?;
        self.sink.put(bytes)
    }

    pub fn text(&mut self, text: &str) -> Result<(), ExportError> {
        self.head(MAJOR_TEXT, text.len() as u64)?;
        self.sink.put(text.as_bytes())
    }

    /// Starts a definite-length array of `len` items.
    pub fn array(&mut self, len: usize) -> Result<(), ExportError> {
        self.head(MAJOR_ARRAY, len as u64)
    }

    /// Starts an indefinite-length array; close it with [`end`](Self::end).
    pub fn begin_array(&mut self) -> Result<(), ExportError> {
        self.sink.put(&[INDEFINITE_ARRAY])
    }

    pub fn end(&mut self) -> Result<(), ExportError> {
        self.sink.put(&[BREAK])
    }

    pub fn bool(&mut self, value: bool) -> Result<(), ExportError> {
        self.sink.put(&[if value { TRUE } else { FALSE }])
    }

    pub fn null(&mut self) -> Result<(), ExportError> {
        self.sink.put(&[NULL])
    }

    pub fn undefined(&mut self) -> Result<(), ExportError> {
        self.sink.put(&[UNDEFINED])
    }

    pub fn f64(&mut self, value: f64) -> Result<(), ExportError> {
        self.sink.put(&[FLOAT64])?;
        self.sink.put(&value.to_be_bytes())
    }

    /// Writes `value` as an unsigned int, or `null` when absent.
    pub fn opt_uint(&mut self, value: Option<u64>) -> Result<(), ExportError> {
        match value {
            Some(v) => self.uint(v),
            None => self.null(),
        }
    }
}

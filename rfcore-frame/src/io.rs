//! Byte-granular sources and sinks.
//!
//! The radio FIFOs can only be accessed one byte at a time through a data
//! register, and the receive FIFO cannot be rewound. The header codec is
//! therefore written against these two traits instead of against slices, so
//! the same code drives the hardware FIFO and an in-memory buffer.

/// Something bytes can be popped from, one at a time, in wire order.
pub trait ByteSource {
    /// Pop the next byte.
    fn read_byte(&mut self) -> u8;

    /// Pop `N` bytes, in wire order.
    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        for b in out.iter_mut() {
            *b = self.read_byte();
        }
        out
    }

    /// Pop a little-endian `u16`.
    fn read_u16_le(&mut self) -> u16 {
        u16::from_le_bytes(self.read_array())
    }
}

/// Something bytes can be pushed into, one at a time, in wire order.
pub trait ByteSink {
    /// Push one byte.
    fn write_byte(&mut self, byte: u8);

    /// Push every byte of `bytes`, in order.
    fn write_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Push a little-endian `u16`.
    fn write_u16_le(&mut self, value: u16) {
        self.write_all(&value.to_le_bytes());
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }
}

/// A [`ByteSource`] over a byte slice.
///
/// Reading past the end yields `0x00`, the same way an exhausted hardware
/// FIFO keeps returning a stale value instead of failing. Use
/// [`BufferReader::overrun`] to find out whether that happened.
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    buffer: &'a [u8],
    pos: usize,
    overrun: bool,
}

impl<'a> BufferReader<'a> {
    /// Create a reader positioned at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            pos: 0,
            overrun: false,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes that have not been consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.pos.min(self.buffer.len())..]
    }

    /// Returns `true` if a read went past the end of the buffer.
    pub fn overrun(&self) -> bool {
        self.overrun
    }
}

impl ByteSource for BufferReader<'_> {
    fn read_byte(&mut self) -> u8 {
        match self.buffer.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                b
            }
            None => {
                self.overrun = true;
                0
            }
        }
    }
}

/// A [`ByteSink`] over a mutable byte slice.
///
/// # Panics
///
/// Writing past the end of the buffer panics, like indexing would.
#[derive(Debug)]
pub struct BufferWriter<'a> {
    buffer: &'a mut [u8],
    pos: usize,
}

impl<'a> BufferWriter<'a> {
    /// Create a writer positioned at the start of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.pos]
    }
}

impl ByteSink for BufferWriter<'_> {
    fn write_byte(&mut self, byte: u8) {
        self.buffer[self.pos] = byte;
        self.pos += 1;
    }
}

#[cfg(any(feature = "std", test))]
impl ByteSink for std::vec::Vec<u8> {
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }
}

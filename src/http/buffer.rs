//! Fixed-capacity receive buffer.
//!
//! Bytes live in `data[position..position + length]`. Refills append after
//! the unconsumed region; once everything has been consumed the position
//! returns to the start so the next refill can use the whole capacity.

use crate::error::Result;
use crate::net::Transport;

/// Default receive buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Smallest capacity accepted by [`ReceiveBuffer::with_capacity`].
pub const MIN_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct ReceiveBuffer {
    data: Box<[u8]>,
    position: usize,
    length: usize,
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ReceiveBuffer {
    /// Allocate a buffer of `capacity` bytes (raised to [`MIN_CAPACITY`]).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.max(MIN_CAPACITY)].into_boxed_slice(),
            position: 0,
            length: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unconsumed bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The unconsumed bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.position..self.position + self.length]
    }

    /// Mark `amount` bytes as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `amount` exceeds [`len`](Self::len).
    pub fn consume(&mut self, amount: usize) {
        assert!(amount <= self.length, "consumed past end of receive buffer");
        self.position += amount;
        self.length -= amount;
    }

    /// Copy up to `out.len()` unconsumed bytes into `out` and consume them.
    pub fn take_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.length);
        out[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.consume(n);
        n
    }

    /// Drop all content and rewind.
    pub fn clear(&mut self) {
        self.position = 0;
        self.length = 0;
    }

    /// Read once from `transport` into the free space after the unconsumed
    /// bytes. Returns the number of bytes received; `0` means the peer
    /// closed the stream (or, if the buffer is full, that there was no room).
    pub fn fill_from<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<usize> {
        if self.length == 0 {
            self.position = 0;
        }

        let start = self.position + self.length;
        if start == self.data.len() {
            return Ok(0);
        }

        let n = transport.recv(&mut self.data[start..])?;
        self.length += n;
        debug_assert!(self.position + self.length <= self.data.len());
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Chunks(Vec<Vec<u8>>);

    impl Transport for Chunks {
        fn send(&mut self, buf: &[u8]) -> Result<usize> {
            Ok(buf.len())
        }

        fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let chunk = self.0.remove(0);
            assert!(chunk.len() <= buf.len());
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }

        fn disconnect(&mut self) -> Result<()> {
            Err(Error::other("unused"))
        }
    }

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(ReceiveBuffer::with_capacity(0).capacity(), MIN_CAPACITY);
        assert_eq!(ReceiveBuffer::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn position_rewinds_only_when_drained() {
        let mut transport = Chunks(vec![b"abcdef".to_vec(), b"gh".to_vec(), b"ij".to_vec()]);
        let mut buf = ReceiveBuffer::with_capacity(16);

        assert_eq!(buf.fill_from(&mut transport).unwrap(), 6);
        buf.consume(4);
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.as_slice(), b"ef");

        // Still holding "ef": the refill appends and keeps the position.
        assert_eq!(buf.fill_from(&mut transport).unwrap(), 2);
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.as_slice(), b"efgh");

        let mut out = [0u8; 8];
        assert_eq!(buf.take_into(&mut out), 4);
        assert_eq!(&out[..4], b"efgh");
        assert!(buf.is_empty());

        // Drained: the next refill starts over at zero.
        assert_eq!(buf.fill_from(&mut transport).unwrap(), 2);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.as_slice(), b"ij");
    }

    #[test]
    fn full_buffer_reads_nothing() {
        let mut transport = Chunks(vec![vec![b'x'; 16], b"y".to_vec()]);
        let mut buf = ReceiveBuffer::with_capacity(16);
        assert_eq!(buf.fill_from(&mut transport).unwrap(), 16);
        assert_eq!(buf.fill_from(&mut transport).unwrap(), 0);
        assert_eq!(buf.len(), 16);
    }
}

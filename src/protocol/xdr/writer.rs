//! Reusable output buffer for the encoders.
//!
//! A connection typically owns one encoder and pushes many messages through
//! it. `XdrWriter` keeps its allocation between messages: [`XdrWriter::reset`]
//! forgets the content but not the capacity. It also supports reserving a
//! 32-bit slot that is filled in once the following bytes are known, which
//! is how record marking headers get their length.

use std::io::Write;

/// Initial capacity of encoder buffers
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Growable byte buffer implementing [`Write`] with backpatching support.
#[derive(Debug, Clone, Default)]
pub struct XdrWriter {
    buffer: Vec<u8>,
}

impl XdrWriter {
    /// Creates a writer with [`DEFAULT_BUFFER_CAPACITY`] preallocated
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Bytes written since the last reset
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Writes a placeholder word and returns its offset for [`XdrWriter::patch_u32`]
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(&[0; 4]);
        offset
    }

    /// Overwrites a previously reserved word with a big endian value.
    ///
    /// # Panics
    ///
    /// Panics if `offset` does not point at 4 already written bytes.
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.buffer[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Copies out the bytes from `offset` to the end and drops them from the writer
    pub fn split_off(&mut self, offset: usize) -> Vec<u8> {
        let tail = self.buffer[offset..].to_vec();
        self.buffer.truncate(offset);
        tail
    }

    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    /// Forgets the content, keeping the allocation for the next message
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Flushes the encoded bytes out of the writer.
    ///
    /// The writer is left empty with a fresh allocation of the same capacity.
    pub fn take(&mut self) -> Vec<u8> {
        let capacity = self.buffer.capacity();
        std::mem::replace(&mut self.buffer, Vec::with_capacity(capacity))
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

impl Write for XdrWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.buffer.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::xdr::Serialize;

    #[test]
    fn patches_reserved_word() {
        let mut writer = XdrWriter::with_capacity(16);
        7_u32.serialize(&mut writer).unwrap();
        let slot = writer.reserve_u32();
        9_u32.serialize(&mut writer).unwrap();
        writer.patch_u32(slot, 0xdead_beef);

        assert_eq!(writer.as_slice(), &[0, 0, 0, 7, 0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 9]);
    }

    #[test]
    fn reset_keeps_allocation() {
        let mut writer = XdrWriter::with_capacity(64);
        writer.write_all(&[1; 48]).unwrap();
        let capacity = writer.capacity();
        writer.reset();

        assert!(writer.is_empty());
        assert_eq!(writer.capacity(), capacity);
    }

    #[test]
    fn take_leaves_empty_writer() {
        let mut writer = XdrWriter::with_capacity(32);
        writer.write_all(b"abcd").unwrap();

        assert_eq!(writer.take(), b"abcd".to_vec());
        assert!(writer.is_empty());
        assert!(writer.capacity() >= 32);
    }

    #[test]
    fn split_off_moves_tail() {
        let mut writer = XdrWriter::new();
        writer.write_all(&[1, 2, 3, 4, 5, 6]).unwrap();

        assert_eq!(writer.split_off(4), vec![5, 6]);
        assert_eq!(writer.as_slice(), &[1, 2, 3, 4]);
    }
}

//! RPC message framing as specified in RFC 5531 (previously RFC 1057 section 10).
//!
//! This module implements the Record Marking Standard used to send RPC messages
//! over stream transports such as TCP. A record is sent as one or more fragments,
//! each prefixed with a 4-byte big endian header:
//!
//! - The highest bit is set on the last fragment of the record
//! - The lower 31 bits contain the fragment length
//!
//! The encoder side offers two paths. [`write_fragments`] frames a record that
//! is already complete. [`start_record`]/[`end_record`] reserve the header,
//! let the caller write the record body in place and patch the length once it
//! is known, so the common single fragment case needs no extra copy.
//!
//! The decoder side, [`RecordMarkingDecoder`], is fed bytes as they arrive and
//! hands out complete records, keeping partially received fragments between calls.

use std::io::Write;

use tracing::{debug, trace};

use crate::error::{DecodeError, EncodeError};
use crate::protocol::xdr::XdrWriter;

/// Highest bit of the fragment header, set on the last fragment of a record
pub const LAST_FRAGMENT: u32 = 1 << 31;

/// Maximum fragment size is 2^31 - 1 bytes
pub const MAX_FRAGMENT_SIZE: usize = (1 << 31) - 1;

/// Size of the fragment header
pub const HEADER_SIZE: usize = 4;

/// Builds the fragment header word.
///
/// Bits of `length` above the lower 31 are discarded, callers keep `length`
/// within [`MAX_FRAGMENT_SIZE`].
pub fn fragment_header(is_last: bool, length: usize) -> u32 {
    let length = (length & MAX_FRAGMENT_SIZE) as u32;
    if is_last {
        length | LAST_FRAGMENT
    } else {
        length
    }
}

/// Splits a fragment header word into the last fragment flag and the length
pub fn parse_header(header: u32) -> (bool, usize) {
    ((header & LAST_FRAGMENT) != 0, (header & !LAST_FRAGMENT) as usize)
}

/// Writes one fragment header.
///
/// A `length` above [`MAX_FRAGMENT_SIZE`] cannot be expressed and is
/// reported as [`EncodeError::LengthOverflow`].
pub fn write_header<W: Write>(dest: &mut W, is_last: bool, length: usize) -> std::io::Result<()> {
    if length > MAX_FRAGMENT_SIZE {
        return Err(EncodeError::LengthOverflow(length).into_io());
    }
    dest.write_all(&fragment_header(is_last, length).to_be_bytes())
}

/// Writes data as record-marked fragments
///
/// The record is divided into fragments of at most `fragment_size` bytes,
/// all but the last one without the last fragment flag. An empty record
/// is a single empty last fragment.
pub fn write_fragments<W: Write>(
    dest: &mut W,
    record: &[u8],
    fragment_size: usize,
) -> std::io::Result<()> {
    let fragment_size = fragment_size.clamp(1, MAX_FRAGMENT_SIZE);
    if record.is_empty() {
        return write_header(dest, true, 0);
    }

    let mut offset = 0;
    while offset < record.len() {
        let size = std::cmp::min(record.len() - offset, fragment_size);
        let is_last = offset + size >= record.len();

        trace!("Writing fragment length:{}, last:{}", size, is_last);
        write_header(dest, is_last, size)?;
        dest.write_all(&record[offset..offset + size])?;

        offset += size;
    }

    Ok(())
}

/// Position of a reserved fragment header inside an [`XdrWriter`].
///
/// Returned by [`start_record`], consumed by [`end_record`].
#[derive(Debug)]
#[must_use = "a started record must be finished with end_record"]
pub struct RecordMark {
    offset: usize,
}

impl RecordMark {
    /// Offset of the first byte of the record body
    pub fn body_offset(&self) -> usize {
        self.offset + HEADER_SIZE
    }
}

/// Reserves the header of a record whose body is about to be written to `writer`
pub fn start_record(writer: &mut XdrWriter) -> RecordMark {
    RecordMark { offset: writer.reserve_u32() }
}

/// Finishes a record started with [`start_record`].
///
/// If the body fits into one fragment the reserved header is patched in place.
/// Otherwise the header is dropped and the body re-emitted as a multi-fragment
/// record, which costs one copy of the body.
///
/// Fails with [`EncodeError::StaleRecordMark`] when the writer was reset or
/// truncated below the reserved header since [`start_record`].
pub fn end_record(
    writer: &mut XdrWriter,
    mark: RecordMark,
    fragment_size: usize,
) -> Result<(), EncodeError> {
    let fragment_size = fragment_size.clamp(1, MAX_FRAGMENT_SIZE);
    let Some(body_len) = writer.len().checked_sub(mark.body_offset()) else {
        return Err(EncodeError::StaleRecordMark(mark.offset));
    };
    if body_len <= fragment_size {
        writer.patch_u32(mark.offset, fragment_header(true, body_len));
        return Ok(());
    }

    debug!("Record of {} bytes exceeds fragment size {}, re-fragmenting", body_len, fragment_size);
    let body = writer.split_off(mark.body_offset());
    writer.truncate(mark.offset);
    write_fragments(writer, &body, fragment_size)?;
    Ok(())
}

/// Frames complete records into a reusable buffer.
///
/// One encoder is meant to be owned by a connection and reused for every
/// outgoing record; the buffer keeps its allocation between records.
#[derive(Debug)]
pub struct RecordMarkingEncoder {
    writer: XdrWriter,
    fragment_size: usize,
}

impl Default for RecordMarkingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordMarkingEncoder {
    pub fn new() -> Self {
        Self { writer: XdrWriter::new(), fragment_size: MAX_FRAGMENT_SIZE }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { writer: XdrWriter::with_capacity(capacity), fragment_size: MAX_FRAGMENT_SIZE }
    }

    /// Limits the size of emitted fragments, clamped to `1..=MAX_FRAGMENT_SIZE`
    pub fn with_fragment_size(mut self, fragment_size: usize) -> Self {
        self.fragment_size = fragment_size.clamp(1, MAX_FRAGMENT_SIZE);
        self
    }

    pub fn fragment_size(&self) -> usize {
        self.fragment_size
    }

    /// Frames `record` alone and returns the encoded bytes
    pub fn encode_record(&mut self, record: &[u8]) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        self.write_record(record)?;
        Ok(self.writer.as_slice())
    }

    /// Appends a framed `record` after what is already buffered
    pub fn write_record(&mut self, record: &[u8]) -> Result<(), EncodeError> {
        write_fragments(&mut self.writer, record, self.fragment_size)?;
        Ok(())
    }

    /// Reserves a header in the buffer, the body is then written through [`Self::writer`]
    pub fn start_record(&mut self) -> RecordMark {
        start_record(&mut self.writer)
    }

    pub fn end_record(&mut self, mark: RecordMark) -> Result<(), EncodeError> {
        end_record(&mut self.writer, mark, self.fragment_size)
    }

    pub fn writer(&mut self) -> &mut XdrWriter {
        &mut self.writer
    }

    pub fn as_slice(&self) -> &[u8] {
        self.writer.as_slice()
    }

    pub fn reset(&mut self) {
        self.writer.reset();
    }

    /// Moves the buffered bytes out, leaving the encoder empty
    pub fn take(&mut self) -> Vec<u8> {
        self.writer.take()
    }
}

/// Reassembles records from a byte stream.
///
/// Bytes are added with [`Self::push`] in arrival order; [`Self::read_record`]
/// returns `Ok(None)` until the last fragment of a record has fully arrived.
/// Fragment payloads are moved into the record under construction as soon as
/// they are received, so only headers and not yet consumed bytes stay buffered.
#[derive(Debug, Default)]
pub struct RecordMarkingDecoder {
    /// Received bytes, the ones before `consumed` are already processed
    buffer: Vec<u8>,
    consumed: usize,
    /// Payload of the record under construction
    record: Vec<u8>,
    /// Header of the fragment being read: last flag and bytes still expected
    fragment: Option<(bool, usize)>,
    max_record_length: Option<usize>,
}

impl RecordMarkingDecoder {
    /// Creates a decoder without a record length limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects records longer than `max_record_length` bytes.
    ///
    /// The limit is checked against each fragment header before its payload
    /// arrives. Once [`DecodeError::RecordTooLong`] is returned the stream is
    /// out of sync and the decoder should be dropped.
    pub fn with_max_record_length(mut self, max_record_length: usize) -> Self {
        self.max_record_length = Some(max_record_length);
        self
    }

    /// Feeds received bytes
    pub fn push(&mut self, bytes: &[u8]) {
        self.compact();
        self.buffer.extend_from_slice(bytes);
    }

    /// True when no part of a record is pending
    pub fn is_idle(&self) -> bool {
        self.pending().is_empty() && self.record.is_empty() && self.fragment.is_none()
    }

    /// Number of received bytes held by the decoder, including partial records
    pub fn buffered_len(&self) -> usize {
        self.pending().len() + self.record.len()
    }

    /// Returns the next complete record, or `Ok(None)` if more bytes are needed
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>, DecodeError> {
        let res = self.next_fragments();
        self.compact();
        res
    }

    /// Feeds `bytes` and returns the next complete record, if any
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Option<Vec<u8>>, DecodeError> {
        self.push(bytes);
        self.read_record()
    }

    fn pending(&self) -> &[u8] {
        &self.buffer[self.consumed..]
    }

    /// Drops processed bytes once they make up at least half of the buffer,
    /// so that each byte is moved a bounded number of times.
    fn compact(&mut self) {
        if self.consumed == self.buffer.len() {
            self.buffer.clear();
            self.consumed = 0;
        } else if self.consumed > 0 && self.consumed >= self.buffer.len() / 2 {
            self.buffer.drain(..self.consumed);
            self.consumed = 0;
        }
    }

    fn next_fragments(&mut self) -> Result<Option<Vec<u8>>, DecodeError> {
        loop {
            let (is_last, remaining) = match self.fragment {
                Some(fragment) => fragment,
                None => {
                    let pending = self.pending();
                    if pending.len() < HEADER_SIZE {
                        return Ok(None);
                    }
                    let mut header = [0_u8; HEADER_SIZE];
                    header.copy_from_slice(&pending[..HEADER_SIZE]);
                    let (is_last, length) = parse_header(u32::from_be_bytes(header));
                    trace!("Reading fragment length:{}, last:{}", length, is_last);

                    if let Some(max) = self.max_record_length {
                        let total = self.record.len().saturating_add(length);
                        if total > max {
                            debug!("RPC record length {} exceeds max {}", total, max);
                            return Err(DecodeError::RecordTooLong { length: total, max });
                        }
                    }
                    self.consumed += HEADER_SIZE;
                    (is_last, length)
                }
            };

            let available = std::cmp::min(remaining, self.pending().len());
            let start = self.consumed;
            self.record.extend_from_slice(&self.buffer[start..start + available]);
            self.consumed += available;

            if available < remaining {
                self.fragment = Some((is_last, remaining - available));
                return Ok(None);
            }
            self.fragment = None;

            if is_last {
                trace!("Finished reading record length:{}", self.record.len());
                return Ok(Some(std::mem::take(&mut self.record)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        assert_eq!(fragment_header(true, 5), 0x8000_0005);
        assert_eq!(fragment_header(false, MAX_FRAGMENT_SIZE), 0x7fff_ffff);
        assert_eq!(parse_header(0x8000_0010), (true, 16));
        assert_eq!(parse_header(0x0000_0010), (false, 16));
    }

    #[test]
    fn header_rejects_oversized_length() {
        let mut out = Vec::new();
        let err = write_header(&mut out, true, MAX_FRAGMENT_SIZE + 1).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_record_is_one_last_fragment() {
        let mut encoder = RecordMarkingEncoder::new();
        assert_eq!(encoder.encode_record(&[]).unwrap(), &[0x80, 0, 0, 0]);
    }

    #[test]
    fn splits_by_fragment_size() {
        let mut encoder = RecordMarkingEncoder::new().with_fragment_size(2);
        let encoded = encoder.encode_record(&[1, 2, 3, 4, 5]).unwrap().to_vec();
        assert_eq!(
            encoded,
            vec![0, 0, 0, 2, 1, 2, 0, 0, 0, 2, 3, 4, 0x80, 0, 0, 1, 5]
        );
    }

    #[test]
    fn fragment_size_is_clamped() {
        assert_eq!(RecordMarkingEncoder::new().with_fragment_size(0).fragment_size(), 1);
        assert_eq!(
            RecordMarkingEncoder::new().with_fragment_size(usize::MAX).fragment_size(),
            MAX_FRAGMENT_SIZE
        );
    }

    #[test]
    fn backpatches_single_fragment() {
        let mut writer = XdrWriter::new();
        let mark = start_record(&mut writer);
        writer.write_all(&[9, 8, 7]).unwrap();
        end_record(&mut writer, mark, MAX_FRAGMENT_SIZE).unwrap();

        assert_eq!(writer.as_slice(), &[0x80, 0, 0, 3, 9, 8, 7]);
    }

    #[test]
    fn re_fragments_oversized_body() {
        let mut writer = XdrWriter::new();
        writer.write_all(&[0xaa]).unwrap();
        let mark = start_record(&mut writer);
        writer.write_all(&[1, 2, 3]).unwrap();
        end_record(&mut writer, mark, 2).unwrap();

        assert_eq!(writer.as_slice(), &[0xaa, 0, 0, 0, 2, 1, 2, 0x80, 0, 0, 1, 3]);
    }

    #[test]
    fn decoder_keeps_partial_fragments() {
        let mut decoder = RecordMarkingDecoder::new();
        assert_eq!(decoder.decode(&[0, 0, 0]).unwrap(), None);
        assert_eq!(decoder.decode(&[2, 1]).unwrap(), None);
        assert_eq!(decoder.decode(&[2, 0x80, 0, 0]).unwrap(), None);
        assert!(!decoder.is_idle());
        assert_eq!(decoder.decode(&[1, 3]).unwrap(), Some(vec![1, 2, 3]));
        assert!(decoder.is_idle());
    }

    #[test]
    fn decoder_returns_records_one_by_one() {
        let mut decoder = RecordMarkingDecoder::new();
        decoder.push(&[0x80, 0, 0, 1, 7, 0x80, 0, 0, 0]);

        assert_eq!(decoder.read_record().unwrap(), Some(vec![7]));
        assert_eq!(decoder.read_record().unwrap(), Some(vec![]));
        assert_eq!(decoder.read_record().unwrap(), None);
    }

    #[test]
    fn decoder_enforces_record_limit() {
        let mut decoder = RecordMarkingDecoder::new().with_max_record_length(4);
        decoder.push(&[0, 0, 0, 3, 1, 2, 3, 0x80, 0, 0, 2]);

        assert_eq!(
            decoder.read_record(),
            Err(DecodeError::RecordTooLong { length: 5, max: 4 })
        );
    }

    #[test]
    fn end_record_rejects_reset_writer() {
        let mut encoder = RecordMarkingEncoder::new();
        let mark = encoder.start_record();
        encoder.reset();

        match encoder.end_record(mark) {
            Err(EncodeError::StaleRecordMark(0)) => {}
            other => panic!("expected StaleRecordMark, got {other:?}"),
        }
        assert!(encoder.as_slice().is_empty());
    }

    #[test]
    fn decoder_tracks_consumed_bytes() {
        let mut decoder = RecordMarkingDecoder::new();
        decoder.push(&[0x80, 0, 0, 1, 7, 0x80, 0, 0, 2, 1]);

        assert_eq!(decoder.read_record().unwrap(), Some(vec![7]));
        assert_eq!(decoder.buffered_len(), 5);
        assert_eq!(decoder.read_record().unwrap(), None);
        assert_eq!(decoder.buffered_len(), 1);

        decoder.push(&[2, 0x80]);
        assert_eq!(decoder.read_record().unwrap(), Some(vec![1, 2]));
        assert_eq!(decoder.buffered_len(), 1);
        assert!(!decoder.is_idle());
    }
}

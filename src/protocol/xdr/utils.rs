use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::error::DecodeError;

pub const ALIGNMENT: usize = 4;

pub fn padding_len(src_len: usize) -> usize {
    (ALIGNMENT - (src_len % ALIGNMENT)) % ALIGNMENT
}

/// Consumes the padding after an opaque of `src_len` bytes.
/// Padding content is not checked, readers must accept any value.
pub fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let mut padding_buffer: [u8; ALIGNMENT] = Default::default();
        src.read_exact(&mut padding_buffer[..pad_len])?;
    }
    Ok(())
}

pub fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let padding_buffer: [u8; ALIGNMENT] = Default::default();
        dest.write_all(&padding_buffer[..pad_len])?;
    }
    Ok(())
}

/// Reads exactly `length` bytes into `dest` without trusting `length` for
/// allocation: memory grows only as bytes actually arrive.
pub fn read_bounded(length: usize, dest: &mut Vec<u8>, src: &mut impl Read) -> std::io::Result<()> {
    dest.clear();
    let read = Read::take(&mut *src, length as u64).read_to_end(dest)?;
    if read < length {
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}

pub fn invalid_data(m: &str) -> std::io::Error {
    DecodeError::Malformed(m.to_string()).into()
}

/// Runs `decode` at the cursor position as one transaction.
///
/// A short buffer yields `Ok(None)`. On `Ok(None)` and on errors the cursor
/// is moved back to where it was, so the caller can retry with more bytes.
pub fn try_decode<B, T, F>(
    cursor: &mut std::io::Cursor<B>,
    decode: F,
) -> Result<Option<T>, DecodeError>
where
    B: AsRef<[u8]>,
    F: FnOnce(&mut std::io::Cursor<B>) -> std::io::Result<T>,
{
    let start = cursor.position();
    let res = crate::error::incomplete_or(decode(cursor));
    match &res {
        Ok(Some(_)) => {}
        Ok(None) => {
            trace!("Short buffer at offset {}, rewinding", start);
            cursor.set_position(start);
        }
        Err(err) => {
            debug!("Cannot decode message at offset {}: {}", start, err);
            cursor.set_position(start);
        }
    }
    res
}

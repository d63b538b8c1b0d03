//! Error types returned by the codec entry points.
//!
//! Deep inside the XDR layer every failure travels as a [`std::io::Error`], the
//! same way the `Serialize`/`Deserialize` traits report them. The kind carries
//! the category:
//!
//! - `UnexpectedEof` - the buffer ended early. This is not an error at the entry
//!   points, it becomes `Ok(None)` ("need more bytes").
//! - `InvalidData` - the bytes are structurally wrong. Becomes [`DecodeError`].
//! - `InvalidInput` - the caller asked to encode something the wire cannot
//!   express. Becomes [`EncodeError`].
//!
//! When a more precise reason is known, the typed error rides inside the
//! `io::Error` and is recovered by downcasting.

use std::fmt;
use std::io;

/// A message that can never decode, no matter how many more bytes arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `msg_type` was neither CALL (0) nor REPLY (1)
    UnknownMessageType(u32),
    /// `reply_stat` was neither MSG_ACCEPTED (0) nor MSG_DENIED (1)
    UnknownReplyStat(u32),
    /// `accept_stat` outside of RFC 5531 range
    UnknownAcceptStat(u32),
    /// `reject_stat` was neither RPC_MISMATCH (0) nor AUTH_ERROR (1)
    UnknownRejectStat(u32),
    /// An opaque_auth body declared more than 400 bytes
    AuthBodyTooLong(u32),
    /// NFS procedure number outside of 0..=21
    UnknownProcedure(u32),
    /// A record grew past the configured limit while reassembling fragments
    RecordTooLong { length: usize, max: usize },
    /// Any other structural violation (bad enum value, bad bool, bad UTF-8...)
    Malformed(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownMessageType(v) => write!(f, "unknown RPC message type {v}"),
            DecodeError::UnknownReplyStat(v) => write!(f, "unknown RPC reply status {v}"),
            DecodeError::UnknownAcceptStat(v) => write!(f, "unknown RPC accept status {v}"),
            DecodeError::UnknownRejectStat(v) => write!(f, "unknown RPC reject status {v}"),
            DecodeError::AuthBodyTooLong(v) => {
                write!(f, "opaque auth body of {v} bytes exceeds 400 bytes")
            }
            DecodeError::UnknownProcedure(v) => write!(f, "unknown NFSv3 procedure {v}"),
            DecodeError::RecordTooLong { length, max } => {
                write!(f, "RPC record length {length} exceeds max {max}")
            }
            DecodeError::Malformed(msg) => write!(f, "malformed message: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

impl DecodeError {
    /// Classifies an error raised while decoding.
    ///
    /// Returns `None` for a short buffer, which callers must treat as
    /// "not decodable yet".
    pub(crate) fn from_io(err: io::Error) -> Option<DecodeError> {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            return None;
        }
        let fallback = err.to_string();
        let decoded = match err.into_inner() {
            Some(inner) => match inner.downcast::<DecodeError>() {
                Ok(typed) => *typed,
                Err(other) => DecodeError::Malformed(other.to_string()),
            },
            None => DecodeError::Malformed(fallback),
        };
        Some(decoded)
    }
}

/// Converts the outcome of a decode attempt into the entry point contract.
pub(crate) fn incomplete_or<T>(res: io::Result<T>) -> Result<Option<T>, DecodeError> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(err) => match DecodeError::from_io(err) {
            None => Ok(None),
            Some(err) => Err(err),
        },
    }
}

/// A value the caller asked to encode cannot be represented on the wire.
#[derive(Debug)]
pub enum EncodeError {
    /// opaque_auth body is longer than 400 bytes
    AuthBodyTooLong(usize),
    /// A discriminated union was given a discriminant it cannot carry
    InvalidDiscriminant(String),
    /// A length does not fit the 32-bit XDR length prefix
    LengthOverflow(usize),
    /// File handle is longer than NFS3_FHSIZE
    FileHandleTooLong(usize),
    /// The record header reserved at this offset is gone from the writer
    StaleRecordMark(usize),
    /// The underlying writer failed
    Io(io::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::AuthBodyTooLong(len) => {
                write!(f, "opaque auth body of {len} bytes exceeds 400 bytes")
            }
            EncodeError::InvalidDiscriminant(msg) => write!(f, "invalid discriminant: {msg}"),
            EncodeError::LengthOverflow(len) => {
                write!(f, "length {len} does not fit into an XDR length prefix")
            }
            EncodeError::FileHandleTooLong(len) => {
                write!(f, "file handle of {len} bytes exceeds NFS3_FHSIZE")
            }
            EncodeError::StaleRecordMark(offset) => {
                write!(f, "record header reserved at offset {offset} is no longer in the buffer")
            }
            EncodeError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl EncodeError {
    /// Wraps the error so it can travel through `Serialize::serialize`.
    pub(crate) fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidInput, self)
    }
}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> Self {
        let typed = err.get_ref().is_some_and(|inner| inner.is::<EncodeError>());
        if !typed {
            return EncodeError::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<EncodeError>()) {
            Some(Ok(typed)) => *typed,
            Some(Err(other)) => EncodeError::Io(io::Error::new(io::ErrorKind::Other, other)),
            None => EncodeError::Io(io::Error::from(io::ErrorKind::Other)),
        }
    }
}

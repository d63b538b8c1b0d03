//! RPC (Remote Procedure Call) protocol implementation as specified in RFC 5531 (previously RFC 1057).
//!
//! The RPC protocol enables programs to call procedures on remote systems as if
//! they were local calls. It forms the foundation for all NFS operations by
//! providing a standard mechanism for client-server communication.
//!
//! This module covers the byte level of RPC version 2:
//!
//! 1. Message framing for stream transports using the Record Marking Standard (`wire`)
//! 2. Encoding and decoding of call and reply messages (`message`)
//! 3. Reading and writing records over tokio streams (`stream`)
//!
//! The wire types themselves live in [`crate::protocol::xdr::rpc`].

pub mod message;
pub mod stream;
pub mod wire;

/// Largest record accepted by [`stream::RecordReader`] by default
pub const MAX_RPC_RECORD_LENGTH: usize = 16 * 1024 * 1024;

pub use message::{RpcMessageDecoder, RpcMessageEncoder};
pub use stream::{write_record, RecordReader};
pub use wire::{
    end_record, start_record, write_fragments, write_header, RecordMark, RecordMarkingDecoder,
    RecordMarkingEncoder, LAST_FRAGMENT, MAX_FRAGMENT_SIZE,
};

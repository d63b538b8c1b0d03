//! Protocol module implements the wire formats of the NFS version 3 protocol stack.
//!
//! This module contains three main components, from the bottom up:
//!
//! - `xdr`: External Data Representation (XDR) for serialization and deserialization
//!   of data structures according to RFC 4506, plus the RPC and NFSv3 wire types.
//!
//! - `rpc`: Remote Procedure Call (RPC) record marking and message codecs as
//!   defined in RFC 5531 (previously RFC 1057).
//!
//! - `nfs`: NFS version 3 procedure messages (RFC 1813) and the single pass
//!   encoder producing record-marked RPC messages.
//!
//! Decoding runs the other way round: record marking yields a record, the RPC
//! decoder yields a message, and its parameters or results go to the NFS decoder.

pub mod nfs;
pub mod rpc;
pub mod xdr;

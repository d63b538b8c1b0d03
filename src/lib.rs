//! NFS3 Wire - byte level codecs for ONC RPC and the NFS version 3 protocol
//!
//! This library translates between in-memory NFSv3 requests and responses and
//! the exact bytes exchanged over a stream transport. It does not implement a
//! server or a client: no file system, no dispatch, no retransmission handling.
//!
//! ## Layers
//!
//! - XDR primitives and the `Serialize`/`Deserialize` traits (`xdr`)
//! - Record Marking framing of RPC messages on byte streams (`protocol::rpc::wire`)
//! - RPC call and reply messages with opaque authentication (`protocol::rpc::message`)
//! - NFSv3 procedure arguments and results (`protocol::nfs::v3`)
//! - `FullNfsv3Encoder`, writing all of the above in a single pass
//!
//! ## Partial input
//!
//! Decoders work on whatever bytes have been received so far. When the input
//! ends too early they return `Ok(None)` and leave the cursor untouched, so the
//! call can be repeated once more bytes arrive. Malformed input is reported as
//! [`error::DecodeError`].
//!
//! ## Standards Compliance
//!
//! This implementation follows these RFCs:
//! - RFC 1813: NFS Version 3 Protocol Specification
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2 (obsoletes RFC 1831)
//! - RFC 4506: XDR: External Data Representation Standard (obsoletes RFC 1832)

pub mod error;
pub mod protocol;

pub use error::{DecodeError, EncodeError};
pub use protocol::nfs::v3::{
    FullNfsv3Encoder, Nfsv3Decoder, Nfsv3Encoder, Nfsv3Message, Nfsv3Request, Nfsv3Response,
};
pub use protocol::rpc::{
    RecordMarkingDecoder, RecordMarkingEncoder, RpcMessageDecoder, RpcMessageEncoder,
};
pub use protocol::xdr;

#[doc(hidden)]
pub use num_traits;

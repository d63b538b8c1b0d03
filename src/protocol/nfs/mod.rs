//! NFS protocol messages.
//!
//! - `v3`: The NFS version 3 protocol as specified in RFC 1813. Requests and
//!   responses of the NULL procedure and all 21 operations, such as READ,
//!   WRITE, LOOKUP, CREATE, etc., along with the encoders and decoders that
//!   move them in and out of RPC messages.

pub mod v3;

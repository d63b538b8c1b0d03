//! This module provides data structures for the Remote Procedure Call (RPC) protocol
//! as defined in RFC 5531 (previously RFC 1057). These structures handle serialization and deserialization
//! of RPC messages between client and server.
//!
//! A message is a fixed header followed by an opaque tail: the procedure
//! parameters of a call or the results of a successful reply. The tail is
//! not interpreted here, it belongs to the program being called (NFS, for
//! example) and is kept as raw bytes.

// Keep the RFC 5531 type names
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::cast::FromPrimitive;

use super::*;
use crate::error::{DecodeError, EncodeError};

/// The only RPC protocol version in use
pub const RPC_VERSION: u32 = 2;

/// Upper bound of an `opaque_auth` body length
pub const MAX_AUTH_BYTES: usize = 400;

/// Discriminant of the top-level message union
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum msg_type {
    CALL = 0,
    REPLY = 1,
}

/// Discriminant of the reply union
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum reply_stat {
    MSG_ACCEPTED = 0,
    MSG_DENIED = 1,
}

/// Discriminant of the accepted reply union
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum accept_stat {
    /// RPC executed successfully
    SUCCESS = 0,
    /// Remote hasn't exported program
    PROG_UNAVAIL = 1,
    /// Remote can't support version
    PROG_MISMATCH = 2,
    /// Program can't support procedure
    PROC_UNAVAIL = 3,
    /// Procedure can't decode params
    GARBAGE_ARGS = 4,
    /// Memory allocation failure and similar
    SYSTEM_ERR = 5,
}

/// Discriminant of the rejected reply union
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum reject_stat {
    /// RPC version number != 2
    RPC_MISMATCH = 0,
    /// Remote can't authenticate caller
    AUTH_ERROR = 1,
}

/// Authentication status codes indicating why authentication failed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum auth_stat {
    /// Success
    AUTH_OK = 0,
    /// Invalid credentials provided by client (checksum/signature verification failed)
    #[default]
    AUTH_BADCRED = 1,
    /// Credentials rejected - client needs to establish a new session
    AUTH_REJECTEDCRED = 2,
    /// Invalid verifier provided by client (checksum/signature verification failed)
    AUTH_BADVERF = 3,
    /// Verifier rejected due to expiration or replay attempt
    AUTH_REJECTEDVERF = 4,
    /// Authentication mechanism too weak for requested operation
    AUTH_TOOWEAK = 5,
    /// Bogus response verifier
    AUTH_INVALIDRESP = 6,
    /// Reason unknown
    AUTH_FAILED = 7,
    /// Kerberos generic error
    AUTH_KERB_GENERIC = 8,
    /// Time of credential expired
    AUTH_TIMEEXPIRE = 9,
    /// Problem with ticket file
    AUTH_TKT_FILE = 10,
    /// Can't decode authenticator
    AUTH_DECODE = 11,
    /// Wrong net address in ticket
    AUTH_NET_ADDR = 12,
    /// No credentials for user
    RPCSEC_GSS_CREDPROBLEM = 13,
    /// Problem with context
    RPCSEC_GSS_CTXPROBLEM = 14,
}
SerializeEnum!(auth_stat);
DeserializeEnum!(auth_stat);

/// Authentication flavor (mechanism) identifiers for RPC
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum auth_flavor {
    /// No authentication
    AUTH_NULL = 0,
    /// UNIX-style authentication (uid/gid)
    AUTH_UNIX = 1,
    /// Short-form authentication
    AUTH_SHORT = 2,
    /// DES authentication
    AUTH_DES = 3,
    /// GSS-API based security
    RPCSEC_GSS = 6,
    /* and more to be defined */
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// UNIX-style credentials, the body of an `AUTH_UNIX` opaque_auth
pub struct auth_unix {
    /// Timestamp to prevent replay attacks
    pub stamp: u32,
    /// The name of the client machine
    pub machinename: Vec<u8>,
    /// The effective user ID of the caller
    pub uid: u32,
    /// The effective group ID of the caller
    pub gid: u32,
    /// A list of additional group IDs for the caller
    pub gids: Vec<u32>,
}
DeserializeStruct!(auth_unix, stamp, machinename, uid, gid, gids);
SerializeStruct!(auth_unix, stamp, machinename, uid, gid, gids);

/// Authentication data structure used in RPC protocol for both client and server authentication.
///
/// The RPC protocol provides bidirectional authentication between caller and service:
/// - Call messages contain two auth fields: credentials and verifier
/// - Reply messages contain one auth field: response verifier
///
/// Each auth field is an `auth_flavor` number plus at most
/// [`MAX_AUTH_BYTES`] of opaque data interpreted by that mechanism.
/// The flavor is kept as a plain number so that unknown mechanisms still
/// pass through the codec.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct opaque_auth {
    /// The authentication mechanism being used
    pub flavor: u32,
    /// The opaque authentication data associated with that mechanism
    pub body: Vec<u8>,
}

impl opaque_auth {
    /// `AUTH_NULL` with an empty body
    pub fn null() -> Self {
        Self::default()
    }

    pub fn new(flavor: auth_flavor, body: Vec<u8>) -> Self {
        Self { flavor: flavor as u32, body }
    }

    /// Builds an `AUTH_UNIX` credential out of its body structure
    pub fn unix(cred: &auth_unix) -> std::io::Result<Self> {
        let mut body = Vec::new();
        cred.serialize(&mut body)?;
        Ok(Self::new(auth_flavor::AUTH_UNIX, body))
    }

    /// The known mechanism, if any
    pub fn auth_flavor(&self) -> Option<auth_flavor> {
        auth_flavor::from_u32(self.flavor)
    }
}

impl Serialize for opaque_auth {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        if self.body.len() > MAX_AUTH_BYTES {
            return Err(EncodeError::AuthBodyTooLong(self.body.len()).into_io());
        }
        self.flavor.serialize(dest)?;
        self.body.serialize(dest)
    }
}

impl Deserialize for opaque_auth {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.flavor.deserialize(src)?;
        let length = deserialize::<u32>(src)?;
        if length as usize > MAX_AUTH_BYTES {
            return Err(DecodeError::AuthBodyTooLong(length).into());
        }
        utils::read_bounded(length as usize, &mut self.body, src)?;
        utils::read_padding(length as usize, src)
    }
}

/// Information about program version mismatch
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct mismatch_info {
    /// Lowest version supported
    pub low: u32,
    /// Highest version supported
    pub high: u32,
}
DeserializeStruct!(mismatch_info, low, high);
SerializeStruct!(mismatch_info, low, high);

/// Response data for an accepted RPC call, discriminated by accept_stat.
///
/// This enum represents the possible outcomes of an accepted RPC call:
/// - SUCCESS: Call completed successfully, response data is protocol-specific
/// - PROG_UNAVAIL: The requested program is not available on this server
/// - PROG_MISMATCH: Program version mismatch, includes supported version range
/// - PROC_UNAVAIL: The requested procedure is not available in this program
/// - GARBAGE_ARGS: The server could not decode the call arguments
/// - SYSTEM_ERR: The server failed for reasons unrelated to the call
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum accept_body {
    /// Call completed successfully
    #[default]
    SUCCESS,
    /// Program is not available on this server
    PROG_UNAVAIL,
    /// Program version mismatch, includes supported version range
    PROG_MISMATCH(mismatch_info),
    /// Requested procedure is not available
    PROC_UNAVAIL,
    /// Server could not decode the call arguments
    GARBAGE_ARGS,
    /// Server side failure
    SYSTEM_ERR,
}

impl accept_body {
    pub fn stat(&self) -> accept_stat {
        match self {
            accept_body::SUCCESS => accept_stat::SUCCESS,
            accept_body::PROG_UNAVAIL => accept_stat::PROG_UNAVAIL,
            accept_body::PROG_MISMATCH(_) => accept_stat::PROG_MISMATCH,
            accept_body::PROC_UNAVAIL => accept_stat::PROC_UNAVAIL,
            accept_body::GARBAGE_ARGS => accept_stat::GARBAGE_ARGS,
            accept_body::SYSTEM_ERR => accept_stat::SYSTEM_ERR,
        }
    }
}

impl Serialize for accept_body {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        (self.stat() as u32).serialize(dest)?;
        if let accept_body::PROG_MISMATCH(v) = self {
            v.serialize(dest)?;
        }

        Ok(())
    }
}

impl Deserialize for accept_body {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let stat = deserialize::<u32>(src)?;
        *self = match accept_stat::from_u32(stat) {
            Some(accept_stat::SUCCESS) => accept_body::SUCCESS,
            Some(accept_stat::PROG_UNAVAIL) => accept_body::PROG_UNAVAIL,
            Some(accept_stat::PROG_MISMATCH) => accept_body::PROG_MISMATCH(deserialize(src)?),
            Some(accept_stat::PROC_UNAVAIL) => accept_body::PROC_UNAVAIL,
            Some(accept_stat::GARBAGE_ARGS) => accept_body::GARBAGE_ARGS,
            Some(accept_stat::SYSTEM_ERR) => accept_body::SYSTEM_ERR,
            None => return Err(DecodeError::UnknownAcceptStat(stat).into()),
        };

        Ok(())
    }
}

/// Reply sent when an RPC call is rejected by the server.
///
/// The call can be rejected for two reasons:
/// 1. RPC Version Mismatch (RPC_MISMATCH):
///    - Server is not running a compatible version of the RPC protocol
///    - Server returns the lowest and highest supported RPC versions
///
/// 2. Authentication Error (AUTH_ERROR):
///    - Server refuses to authenticate the caller
///    - Returns specific auth failure status code
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum rejected_reply {
    /// RPC version mismatch - includes supported version range
    RPC_MISMATCH(mismatch_info),
    /// Authentication failed - includes specific error code
    AUTH_ERROR(auth_stat),
}

impl Default for rejected_reply {
    fn default() -> rejected_reply {
        rejected_reply::AUTH_ERROR(auth_stat::default())
    }
}

impl Serialize for rejected_reply {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            rejected_reply::RPC_MISMATCH(v) => {
                (reject_stat::RPC_MISMATCH as u32).serialize(dest)?;
                v.serialize(dest)?;
            }
            rejected_reply::AUTH_ERROR(v) => {
                (reject_stat::AUTH_ERROR as u32).serialize(dest)?;
                v.serialize(dest)?;
            }
        }

        Ok(())
    }
}

impl Deserialize for rejected_reply {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let stat = deserialize::<u32>(src)?;
        *self = match reject_stat::from_u32(stat) {
            Some(reject_stat::RPC_MISMATCH) => rejected_reply::RPC_MISMATCH(deserialize(src)?),
            Some(reject_stat::AUTH_ERROR) => rejected_reply::AUTH_ERROR(deserialize(src)?),
            None => return Err(DecodeError::UnknownRejectStat(stat).into()),
        };

        Ok(())
    }
}

/// A CALL message.
///
/// `params` holds the already encoded procedure arguments, empty when the
/// procedure takes none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcCallMessage {
    /// Transaction identifier used to match calls and replies
    pub xid: u32,
    /// RPC version, must be 2
    pub rpcvers: u32,
    /// The program to call
    pub prog: u32,
    /// The version of the program
    pub vers: u32,
    /// The procedure within the program to call
    pub proc: u32,
    /// Authentication credentials for the caller
    pub cred: opaque_auth,
    /// Authentication verifier for the caller
    pub verf: opaque_auth,
    /// Procedure specific parameters
    pub params: Vec<u8>,
}

impl Default for RpcCallMessage {
    fn default() -> Self {
        Self {
            xid: 0,
            rpcvers: RPC_VERSION,
            prog: 0,
            vers: 0,
            proc: 0,
            cred: opaque_auth::null(),
            verf: opaque_auth::null(),
            params: Vec::new(),
        }
    }
}

/// A REPLY to a call that the server accepted.
///
/// Even though the call was accepted, there could still be an error in
/// processing it, see `reply_data`. `results` is only meaningful on SUCCESS.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RpcAcceptedReplyMessage {
    /// Transaction identifier of the call being answered
    pub xid: u32,
    /// Authentication verifier from server
    pub verf: opaque_auth,
    /// Reply status, with the supported range on PROG_MISMATCH
    pub reply_data: accept_body,
    /// Procedure specific results
    pub results: Vec<u8>,
}

/// A REPLY to a call that the server refused to run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RpcRejectedReplyMessage {
    /// Transaction identifier of the call being answered
    pub xid: u32,
    /// Why the call was rejected
    pub reply_data: rejected_reply,
}

/// RPC message structure as defined in RFC 5531 (previously RFC 1057).
///
/// Each RPC message begins with a transaction identifier (xid) followed by a
/// discriminated union containing either a CALL or REPLY message body.
///
/// The xid serves several purposes:
/// - Clients use it to match REPLY messages with their corresponding CALL messages
/// - Servers use it to detect retransmitted requests
/// - The xid in a REPLY always matches the xid from the initiating CALL
///
/// Note: The xid is not a sequence number and should not be treated as such by servers.
/// It is only used for request/response matching and duplicate detection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RpcMessage {
    Call(RpcCallMessage),
    AcceptedReply(RpcAcceptedReplyMessage),
    RejectedReply(RpcRejectedReplyMessage),
}

impl Default for RpcMessage {
    fn default() -> Self {
        RpcMessage::Call(RpcCallMessage::default())
    }
}

impl RpcMessage {
    pub fn xid(&self) -> u32 {
        match self {
            RpcMessage::Call(v) => v.xid,
            RpcMessage::AcceptedReply(v) => v.xid,
            RpcMessage::RejectedReply(v) => v.xid,
        }
    }
}

/// Writes everything of a CALL up to, not including, the parameters
#[allow(clippy::too_many_arguments)]
pub fn serialize_call_header<W: Write>(
    dest: &mut W,
    xid: u32,
    rpcvers: u32,
    prog: u32,
    vers: u32,
    proc: u32,
    cred: &opaque_auth,
    verf: &opaque_auth,
) -> std::io::Result<()> {
    xid.serialize(dest)?;
    (msg_type::CALL as u32).serialize(dest)?;
    rpcvers.serialize(dest)?;
    prog.serialize(dest)?;
    vers.serialize(dest)?;
    proc.serialize(dest)?;
    cred.serialize(dest)?;
    verf.serialize(dest)
}

/// Writes everything of an accepted REPLY up to, not including, the results
pub fn serialize_accepted_header<W: Write>(
    dest: &mut W,
    xid: u32,
    verf: &opaque_auth,
    reply_data: &accept_body,
) -> std::io::Result<()> {
    xid.serialize(dest)?;
    (msg_type::REPLY as u32).serialize(dest)?;
    (reply_stat::MSG_ACCEPTED as u32).serialize(dest)?;
    verf.serialize(dest)?;
    reply_data.serialize(dest)
}

/// Writes a complete rejected REPLY
pub fn serialize_rejected<W: Write>(
    dest: &mut W,
    xid: u32,
    reply_data: &rejected_reply,
) -> std::io::Result<()> {
    xid.serialize(dest)?;
    (msg_type::REPLY as u32).serialize(dest)?;
    (reply_stat::MSG_DENIED as u32).serialize(dest)?;
    reply_data.serialize(dest)
}

impl Serialize for RpcMessage {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            RpcMessage::Call(v) => {
                serialize_call_header(
                    dest, v.xid, v.rpcvers, v.prog, v.vers, v.proc, &v.cred, &v.verf,
                )?;
                dest.write_all(&v.params)
            }
            RpcMessage::AcceptedReply(v) => {
                serialize_accepted_header(dest, v.xid, &v.verf, &v.reply_data)?;
                dest.write_all(&v.results)
            }
            RpcMessage::RejectedReply(v) => serialize_rejected(dest, v.xid, &v.reply_data),
        }
    }
}

/// Reads one message. For calls and accepted replies everything left in
/// `src` is taken as the parameters or results, so `src` must be exactly
/// one record.
impl Deserialize for RpcMessage {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let xid = deserialize::<u32>(src)?;
        let mtype = deserialize::<u32>(src)?;
        *self = match msg_type::from_u32(mtype) {
            Some(msg_type::CALL) => {
                let mut call = RpcCallMessage { xid, ..Default::default() };
                call.rpcvers.deserialize(src)?;
                call.prog.deserialize(src)?;
                call.vers.deserialize(src)?;
                call.proc.deserialize(src)?;
                call.cred.deserialize(src)?;
                call.verf.deserialize(src)?;
                src.read_to_end(&mut call.params)?;
                RpcMessage::Call(call)
            }
            Some(msg_type::REPLY) => {
                let stat = deserialize::<u32>(src)?;
                match reply_stat::from_u32(stat) {
                    Some(reply_stat::MSG_ACCEPTED) => {
                        let mut reply = RpcAcceptedReplyMessage { xid, ..Default::default() };
                        reply.verf.deserialize(src)?;
                        reply.reply_data.deserialize(src)?;
                        src.read_to_end(&mut reply.results)?;
                        RpcMessage::AcceptedReply(reply)
                    }
                    Some(reply_stat::MSG_DENIED) => RpcMessage::RejectedReply(
                        RpcRejectedReplyMessage { xid, reply_data: deserialize(src)? },
                    ),
                    None => return Err(DecodeError::UnknownReplyStat(stat).into()),
                }
            }
            None => return Err(DecodeError::UnknownMessageType(mtype).into()),
        };

        Ok(())
    }
}

fn accepted(xid: u32, reply_data: accept_body) -> RpcMessage {
    RpcMessage::AcceptedReply(RpcAcceptedReplyMessage {
        xid,
        verf: opaque_auth::null(),
        reply_data,
        results: Vec::new(),
    })
}

/// Creates a reply message indicating that the requested procedure is not available
pub fn proc_unavail_reply_message(xid: u32) -> RpcMessage {
    accepted(xid, accept_body::PROC_UNAVAIL)
}

/// Creates a reply message indicating that the requested program is not available
pub fn prog_unavail_reply_message(xid: u32) -> RpcMessage {
    accepted(xid, accept_body::PROG_UNAVAIL)
}

/// Creates a reply message indicating a program version mismatch
pub fn prog_mismatch_reply_message(xid: u32, accepted_ver: u32) -> RpcMessage {
    accepted(xid, accept_body::PROG_MISMATCH(mismatch_info { low: accepted_ver, high: accepted_ver }))
}

/// Creates a reply message indicating that the arguments could not be decoded
pub fn garbage_args_reply_message(xid: u32) -> RpcMessage {
    accepted(xid, accept_body::GARBAGE_ARGS)
}

/// Creates a reply message indicating a server side failure
pub fn system_err_reply_message(xid: u32) -> RpcMessage {
    accepted(xid, accept_body::SYSTEM_ERR)
}

/// Creates a reply message indicating an RPC version mismatch
pub fn rpc_vers_mismatch(xid: u32) -> RpcMessage {
    RpcMessage::RejectedReply(RpcRejectedReplyMessage {
        xid,
        reply_data: rejected_reply::RPC_MISMATCH(mismatch_info {
            low: RPC_VERSION,
            high: RPC_VERSION,
        }),
    })
}

/// Creates a reply message refusing the caller's credentials
pub fn auth_error_reply_message(xid: u32, stat: auth_stat) -> RpcMessage {
    RpcMessage::RejectedReply(RpcRejectedReplyMessage {
        xid,
        reply_data: rejected_reply::AUTH_ERROR(stat),
    })
}

/// Creates a successful reply message with no additional data
pub fn make_success_reply(xid: u32) -> RpcMessage {
    accepted(xid, accept_body::SUCCESS)
}

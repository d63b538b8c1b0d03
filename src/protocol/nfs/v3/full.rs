//! Single pass encoder for record-marked NFSv3 RPC messages.
//!
//! Writing an NFS call the layered way takes three buffers: the NFS body,
//! the RPC message wrapping it, and the record wrapping that. This encoder
//! writes all three layers into one buffer instead. It reserves the record
//! header, writes the RPC header and the NFS body right after it, and patches
//! the header once the length is known. A message larger than the fragment
//! size falls back to re-emitting the body as several fragments.

use tracing::trace;

use crate::error::EncodeError;
use crate::protocol::nfs::v3::{Nfsv3Request, Nfsv3Response};
use crate::protocol::rpc::wire::{end_record, start_record, MAX_FRAGMENT_SIZE};
use crate::protocol::xdr::nfs3;
use crate::protocol::xdr::rpc::{
    accept_body, opaque_auth, rejected_reply, serialize_accepted_header, serialize_call_header,
    serialize_rejected, RPC_VERSION,
};
use crate::protocol::xdr::{Serialize, XdrWriter};

/// Writes `RM(RPC(NFSv3))` messages into a reusable buffer
#[derive(Debug)]
pub struct FullNfsv3Encoder {
    writer: XdrWriter,
    fragment_size: usize,
}

impl Default for FullNfsv3Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FullNfsv3Encoder {
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

    /// Encodes an NFSv3 CALL of the procedure matching `request`
    pub fn encode_call(
        &mut self,
        xid: u32,
        cred: &opaque_auth,
        verf: &opaque_auth,
        request: &Nfsv3Request,
    ) -> Result<&[u8], EncodeError> {
        trace!("Encoding NFSv3 call xid:{} {:?}", xid, request.procedure());
        self.encode_record(|writer| {
            serialize_call_header(
                writer,
                xid,
                RPC_VERSION,
                nfs3::PROGRAM,
                nfs3::VERSION,
                request.procedure() as u32,
                cred,
                verf,
            )?;
            request.serialize(writer)
        })
    }

    /// Encodes a successful REPLY carrying `response`
    pub fn encode_accepted_reply(
        &mut self,
        xid: u32,
        verf: &opaque_auth,
        response: &Nfsv3Response,
    ) -> Result<&[u8], EncodeError> {
        trace!("Encoding NFSv3 reply xid:{} {:?}", xid, response.procedure());
        self.encode_record(|writer| {
            serialize_accepted_header(writer, xid, verf, &accept_body::SUCCESS)?;
            response.serialize(writer)
        })
    }

    /// Encodes an accepted REPLY without results, such as PROC_UNAVAIL
    pub fn encode_accept_error(
        &mut self,
        xid: u32,
        verf: &opaque_auth,
        reply_data: &accept_body,
    ) -> Result<&[u8], EncodeError> {
        self.encode_record(|writer| serialize_accepted_header(writer, xid, verf, reply_data))
    }

    /// Encodes a rejected REPLY
    pub fn encode_rejected_reply(
        &mut self,
        xid: u32,
        reply_data: &rejected_reply,
    ) -> Result<&[u8], EncodeError> {
        self.encode_record(|writer| serialize_rejected(writer, xid, reply_data))
    }

    /// Moves the last encoded message out of the encoder
    pub fn take(&mut self) -> Vec<u8> {
        self.writer.take()
    }

    fn encode_record<F>(&mut self, body: F) -> Result<&[u8], EncodeError>
    where
        F: FnOnce(&mut XdrWriter) -> std::io::Result<()>,
    {
        self.writer.reset();
        let mark = start_record(&mut self.writer);
        let res = body(&mut self.writer)
            .map_err(EncodeError::from)
            .and_then(|()| end_record(&mut self.writer, mark, self.fragment_size));
        match res {
            Ok(()) => Ok(self.writer.as_slice()),
            Err(err) => {
                self.writer.reset();
                Err(err)
            }
        }
    }
}

//! Encoding and decoding of whole RPC messages.
//!
//! The encoder owns a reusable [`XdrWriter`] and hands out a view of the
//! encoded message; the view stays valid until the next call. The decoder
//! reads one message from a cursor over a complete record: the call
//! parameters and reply results are whatever bytes follow the header.

use std::io::Cursor;

use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::protocol::xdr::rpc::{
    RpcAcceptedReplyMessage, RpcCallMessage, RpcMessage, RpcRejectedReplyMessage,
};
use crate::protocol::xdr::{self, Serialize, XdrWriter};

/// Serializes RPC messages into a reusable buffer
#[derive(Debug, Default)]
pub struct RpcMessageEncoder {
    writer: XdrWriter,
}

impl RpcMessageEncoder {
    pub fn new() -> Self {
        Self { writer: XdrWriter::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { writer: XdrWriter::with_capacity(capacity) }
    }

    /// Encodes `message` and returns its bytes
    pub fn encode_message(&mut self, message: &RpcMessage) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        trace!("Encoding RPC message xid:{}", message.xid());
        if let Err(err) = message.serialize(&mut self.writer) {
            self.writer.reset();
            return Err(err.into());
        }
        Ok(self.writer.as_slice())
    }

    pub fn encode_call(&mut self, call: &RpcCallMessage) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        let res = xdr::rpc::serialize_call_header(
            &mut self.writer,
            call.xid,
            call.rpcvers,
            call.prog,
            call.vers,
            call.proc,
            &call.cred,
            &call.verf,
        )
        .and_then(|()| std::io::Write::write_all(&mut self.writer, &call.params));
        self.finish(res)
    }

    pub fn encode_accepted_reply(
        &mut self,
        reply: &RpcAcceptedReplyMessage,
    ) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        let res = xdr::rpc::serialize_accepted_header(
            &mut self.writer,
            reply.xid,
            &reply.verf,
            &reply.reply_data,
        )
        .and_then(|()| std::io::Write::write_all(&mut self.writer, &reply.results));
        self.finish(res)
    }

    pub fn encode_rejected_reply(
        &mut self,
        reply: &RpcRejectedReplyMessage,
    ) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        let res = xdr::rpc::serialize_rejected(&mut self.writer, reply.xid, &reply.reply_data);
        self.finish(res)
    }

    /// Moves the last encoded message out of the encoder
    pub fn take(&mut self) -> Vec<u8> {
        self.writer.take()
    }

    fn finish(&mut self, res: std::io::Result<()>) -> Result<&[u8], EncodeError> {
        match res {
            Ok(()) => Ok(self.writer.as_slice()),
            Err(err) => {
                self.writer.reset();
                Err(err.into())
            }
        }
    }
}

/// Parses RPC messages out of complete records.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcMessageDecoder;

impl RpcMessageDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the message starting at the cursor position.
    ///
    /// Returns `Ok(None)` with the cursor untouched if the buffer ends before
    /// the message header does. Unknown message types, reply statuses and
    /// oversized auth bodies are hard errors.
    pub fn decode_message<B: AsRef<[u8]>>(
        &self,
        cursor: &mut Cursor<B>,
    ) -> Result<Option<RpcMessage>, DecodeError> {
        xdr::utils::try_decode(cursor, |src| xdr::deserialize::<RpcMessage>(src))
    }
}

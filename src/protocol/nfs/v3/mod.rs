//! NFSv3 (Network File System version 3) message codec as specified in RFC 1813.
//!
//! This module covers the NULL procedure and all 21 procedure calls defined in
//! the NFS version 3 protocol:
//!
//! 1. GETATTR - Get file attributes
//! 2. SETATTR - Set file attributes
//! 3. LOOKUP - Look up file name
//! 4. ACCESS - Check access permission
//! 5. READLINK - Read from symbolic link
//! 6. READ - Read from file
//! 7. WRITE - Write to file
//! 8. CREATE - Create a file
//! 9. MKDIR - Create a directory
//! 10. SYMLINK - Create a symbolic link
//! 11. MKNOD - Create a special device
//! 12. REMOVE - Remove a file
//! 13. RMDIR - Remove a directory
//! 14. RENAME - Rename a file or directory
//! 15. LINK - Create a hard link
//! 16. READDIR - Read from directory
//! 17. READDIRPLUS - Extended read from directory
//! 18. FSSTAT - Get file system statistics
//! 19. FSINFO - Get file system information
//! 20. PATHCONF - Get path configuration
//! 21. COMMIT - Commit cached data
//!
//! A request or response body does not say which procedure it belongs to;
//! that is carried by the RPC header. Decoding therefore always takes the
//! procedure number next to the bytes.

use std::io::{Cursor, Read, Write};

use num_traits::cast::FromPrimitive;
use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::protocol::xdr::nfs3::*;
use crate::protocol::xdr::rpc::msg_type;
use crate::protocol::xdr::{self, deserialize, Serialize, XdrWriter};

pub mod full;

pub use full::FullNfsv3Encoder;

/// Declares the request and response enums, one variant per procedure,
/// together with their procedure-keyed encoding.
macro_rules! nfs3_procedures {
    ($($variant:ident = $procedure:ident($args:ty, $res:ty)),* $(,)?) => {
        /// Arguments of an NFSv3 call
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Nfsv3Request {
            $($variant($args),)*
        }

        /// Results of an NFSv3 call
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Nfsv3Response {
            $($variant($res),)*
        }

        impl Nfsv3Request {
            pub fn procedure(&self) -> NFSProcedure {
                match self {
                    $(Nfsv3Request::$variant(_) => NFSProcedure::$procedure,)*
                }
            }

            fn deserialize_for<R: Read>(
                procedure: NFSProcedure,
                src: &mut R,
            ) -> std::io::Result<Self> {
                Ok(match procedure {
                    $(NFSProcedure::$procedure => Nfsv3Request::$variant(deserialize(src)?),)*
                })
            }
        }

        impl Nfsv3Response {
            pub fn procedure(&self) -> NFSProcedure {
                match self {
                    $(Nfsv3Response::$variant(_) => NFSProcedure::$procedure,)*
                }
            }

            fn deserialize_for<R: Read>(
                procedure: NFSProcedure,
                src: &mut R,
            ) -> std::io::Result<Self> {
                Ok(match procedure {
                    $(NFSProcedure::$procedure => Nfsv3Response::$variant(deserialize(src)?),)*
                })
            }
        }

        impl Serialize for Nfsv3Request {
            fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
                match self {
                    $(Nfsv3Request::$variant(args) => args.serialize(dest),)*
                }
            }
        }

        impl Serialize for Nfsv3Response {
            fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
                match self {
                    $(Nfsv3Response::$variant(res) => res.serialize(dest),)*
                }
            }
        }
    };
}

nfs3_procedures! {
    Null = NFSPROC3_NULL((), ()),
    GetAttr = NFSPROC3_GETATTR(GETATTR3args, GETATTR3res),
    SetAttr = NFSPROC3_SETATTR(SETATTR3args, SETATTR3res),
    Lookup = NFSPROC3_LOOKUP(LOOKUP3args, LOOKUP3res),
    Access = NFSPROC3_ACCESS(ACCESS3args, ACCESS3res),
    ReadLink = NFSPROC3_READLINK(READLINK3args, READLINK3res),
    Read = NFSPROC3_READ(READ3args, READ3res),
    Write = NFSPROC3_WRITE(WRITE3args, WRITE3res),
    Create = NFSPROC3_CREATE(CREATE3args, CREATE3res),
    MkDir = NFSPROC3_MKDIR(MKDIR3args, MKDIR3res),
    SymLink = NFSPROC3_SYMLINK(SYMLINK3args, SYMLINK3res),
    MkNod = NFSPROC3_MKNOD(MKNOD3args, MKNOD3res),
    Remove = NFSPROC3_REMOVE(REMOVE3args, REMOVE3res),
    RmDir = NFSPROC3_RMDIR(RMDIR3args, RMDIR3res),
    Rename = NFSPROC3_RENAME(RENAME3args, RENAME3res),
    Link = NFSPROC3_LINK(LINK3args, LINK3res),
    ReadDir = NFSPROC3_READDIR(READDIR3args, READDIR3res),
    ReadDirPlus = NFSPROC3_READDIRPLUS(READDIRPLUS3args, READDIRPLUS3res),
    FsStat = NFSPROC3_FSSTAT(FSSTAT3args, FSSTAT3res),
    FsInfo = NFSPROC3_FSINFO(FSINFO3args, FSINFO3res),
    PathConf = NFSPROC3_PATHCONF(PATHCONF3args, PATHCONF3res),
    Commit = NFSPROC3_COMMIT(COMMIT3args, COMMIT3res),
}

/// Either side of an NFSv3 exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nfsv3Message {
    Request(Nfsv3Request),
    Response(Nfsv3Response),
}

impl Nfsv3Message {
    pub fn procedure(&self) -> NFSProcedure {
        match self {
            Nfsv3Message::Request(request) => request.procedure(),
            Nfsv3Message::Response(response) => response.procedure(),
        }
    }
}

impl Serialize for Nfsv3Message {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            Nfsv3Message::Request(request) => request.serialize(dest),
            Nfsv3Message::Response(response) => response.serialize(dest),
        }
    }
}

fn procedure_from_u32(procedure: u32) -> Result<NFSProcedure, DecodeError> {
    NFSProcedure::from_u32(procedure).ok_or(DecodeError::UnknownProcedure(procedure))
}

/// Serializes NFSv3 procedure bodies, the RPC call parameters or reply results
#[derive(Debug, Default)]
pub struct Nfsv3Encoder {
    writer: XdrWriter,
}

impl Nfsv3Encoder {
    pub fn new() -> Self {
        Self { writer: XdrWriter::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { writer: XdrWriter::with_capacity(capacity) }
    }

    pub fn encode_message(&mut self, message: &Nfsv3Message) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        trace!("Encoding NFSv3 {:?}", message.procedure());
        if let Err(err) = message.serialize(&mut self.writer) {
            self.writer.reset();
            return Err(err.into());
        }
        Ok(self.writer.as_slice())
    }

    pub fn encode_request(&mut self, request: &Nfsv3Request) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        if let Err(err) = request.serialize(&mut self.writer) {
            self.writer.reset();
            return Err(err.into());
        }
        Ok(self.writer.as_slice())
    }

    pub fn encode_response(&mut self, response: &Nfsv3Response) -> Result<&[u8], EncodeError> {
        self.writer.reset();
        if let Err(err) = response.serialize(&mut self.writer) {
            self.writer.reset();
            return Err(err.into());
        }
        Ok(self.writer.as_slice())
    }

    /// Moves the last encoded body out of the encoder
    pub fn take(&mut self) -> Vec<u8> {
        self.writer.take()
    }
}

/// Parses NFSv3 procedure bodies.
///
/// Every method returns `Ok(None)` and leaves the cursor where it was when
/// the buffer ends early. An unknown procedure number is a hard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Nfsv3Decoder;

impl Nfsv3Decoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode_request<B: AsRef<[u8]>>(
        &self,
        cursor: &mut Cursor<B>,
        procedure: u32,
    ) -> Result<Option<Nfsv3Request>, DecodeError> {
        let procedure = procedure_from_u32(procedure)?;
        xdr::utils::try_decode(cursor, |src| Nfsv3Request::deserialize_for(procedure, src))
    }

    pub fn decode_response<B: AsRef<[u8]>>(
        &self,
        cursor: &mut Cursor<B>,
        procedure: u32,
    ) -> Result<Option<Nfsv3Response>, DecodeError> {
        let procedure = procedure_from_u32(procedure)?;
        xdr::utils::try_decode(cursor, |src| Nfsv3Response::deserialize_for(procedure, src))
    }

    /// Decodes a call body for `msg_type::CALL`, a reply body for `msg_type::REPLY`
    pub fn decode_message<B: AsRef<[u8]>>(
        &self,
        cursor: &mut Cursor<B>,
        procedure: u32,
        kind: msg_type,
    ) -> Result<Option<Nfsv3Message>, DecodeError> {
        Ok(match kind {
            msg_type::CALL => self.decode_request(cursor, procedure)?.map(Nfsv3Message::Request),
            msg_type::REPLY => {
                self.decode_response(cursor, procedure)?.map(Nfsv3Message::Response)
            }
        })
    }
}

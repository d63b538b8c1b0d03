//! Module contains XDR data structures related to file operations for NFS version 3 protocol
//! as defined in RFC 1813.
//!
//! This module includes data structures for the following operations:
//! - GETATTR: Get file attributes (procedure 1)
//! - SETATTR: Set file attributes (procedure 2)
//! - ACCESS: Check access permission (procedure 4)
//! - READLINK: Read from symbolic link (procedure 5)
//! - READ: Read data from a file (procedure 6)
//! - WRITE: Write data to a file (procedure 7)
//! - LINK: Create a hard link (procedure 15)
//! - COMMIT: Commit asynchronously written data to stable storage (procedure 21)

// RFC 1813 type names (READ3args, COMMIT3resok)
#![allow(non_camel_case_types)]

use num_derive::{FromPrimitive, ToPrimitive};

use super::*;

/// Arguments for the GETATTR procedure (procedure 1) as defined in RFC 1813 section 3.3.1
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GETATTR3args {
    /// File handle of the object whose attributes are requested
    pub object: nfs_fh3,
}
DeserializeStruct!(GETATTR3args, object);
SerializeStruct!(GETATTR3args, object);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GETATTR3resok {
    pub obj_attributes: fattr3,
}
DeserializeStruct!(GETATTR3resok, obj_attributes);
SerializeStruct!(GETATTR3resok, obj_attributes);

/// GETATTR carries nothing on failure
pub type GETATTR3res = Nfs3Result<GETATTR3resok, ()>;

/// Arguments for SETATTR operations as defined in RFC 1813 section 3.3.2
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SETATTR3args {
    /// File handle for target file
    pub object: nfs_fh3,
    /// New attributes to set
    pub new_attributes: sattr3,
    /// Guard condition for atomic change
    pub guard: sattrguard3,
}
DeserializeStruct!(SETATTR3args, object, new_attributes, guard);
SerializeStruct!(SETATTR3args, object, new_attributes, guard);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SETATTR3resok {
    pub obj_wcc: wcc_data,
}
DeserializeStruct!(SETATTR3resok, obj_wcc);
SerializeStruct!(SETATTR3resok, obj_wcc);

/// Weak cache consistency data is returned on failure too
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SETATTR3resfail {
    pub obj_wcc: wcc_data,
}
DeserializeStruct!(SETATTR3resfail, obj_wcc);
SerializeStruct!(SETATTR3resfail, obj_wcc);

pub type SETATTR3res = Nfs3Result<SETATTR3resok, SETATTR3resfail>;

/// Arguments for the ACCESS procedure (procedure 4) as defined in RFC 1813 section 3.3.4
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ACCESS3args {
    /// File handle of the object to check
    pub object: nfs_fh3,
    /// Bit mask of `ACCESS3_*` permissions to check
    pub access: u32,
}
DeserializeStruct!(ACCESS3args, object, access);
SerializeStruct!(ACCESS3args, object, access);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ACCESS3resok {
    pub obj_attributes: post_op_attr,
    /// Subset of the requested bits that the caller is granted
    pub access: u32,
}
DeserializeStruct!(ACCESS3resok, obj_attributes, access);
SerializeStruct!(ACCESS3resok, obj_attributes, access);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ACCESS3resfail {
    pub obj_attributes: post_op_attr,
}
DeserializeStruct!(ACCESS3resfail, obj_attributes);
SerializeStruct!(ACCESS3resfail, obj_attributes);

pub type ACCESS3res = Nfs3Result<ACCESS3resok, ACCESS3resfail>;

/// Arguments for the READLINK procedure (procedure 5) as defined in RFC 1813 section 3.3.5
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READLINK3args {
    pub symlink: nfs_fh3,
}
DeserializeStruct!(READLINK3args, symlink);
SerializeStruct!(READLINK3args, symlink);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READLINK3resok {
    pub symlink_attributes: post_op_attr,
    /// Target of the symbolic link
    pub data: nfspath3,
}
DeserializeStruct!(READLINK3resok, symlink_attributes, data);
SerializeStruct!(READLINK3resok, symlink_attributes, data);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct READLINK3resfail {
    pub symlink_attributes: post_op_attr,
}
DeserializeStruct!(READLINK3resfail, symlink_attributes);
SerializeStruct!(READLINK3resfail, symlink_attributes);

pub type READLINK3res = Nfs3Result<READLINK3resok, READLINK3resfail>;

/// Arguments for the READ procedure (procedure 6) as defined in RFC 1813 section 3.3.6
/// Used to read data from a regular file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READ3args {
    /// File handle for the file to be read
    pub file: nfs_fh3,
    /// Position within the file to begin reading
    pub offset: offset3,
    /// Number of bytes of data to read
    pub count: count3,
}
DeserializeStruct!(READ3args, file, offset, count);
SerializeStruct!(READ3args, file, offset, count);

/// Successful response for the READ procedure as defined in RFC 1813 section 3.3.6
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READ3resok {
    /// File attributes after the operation
    pub file_attributes: post_op_attr,
    /// Number of bytes actually read
    pub count: count3,
    /// True if the end of file was reached
    pub eof: bool,
    /// The data read from the file
    pub data: Vec<u8>,
}
DeserializeStruct!(READ3resok, file_attributes, count, eof, data);
SerializeStruct!(READ3resok, file_attributes, count, eof, data);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct READ3resfail {
    pub file_attributes: post_op_attr,
}
DeserializeStruct!(READ3resfail, file_attributes);
SerializeStruct!(READ3resfail, file_attributes);

pub type READ3res = Nfs3Result<READ3resok, READ3resfail>;

/// Enumeration specifying how data should be written to storage
/// as defined in RFC 1813 section 3.3.7
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum stable_how {
    /// Data may be buffered before writing to stable storage
    /// The server may return before the data is committed to stable storage
    #[default]
    UNSTABLE = 0,
    /// Data must be committed to stable storage before returning
    /// Only the data for this request is guaranteed to be committed
    DATA_SYNC = 1,
    /// All file system data must be committed to stable storage before returning
    /// This includes the data and all metadata for this request
    FILE_SYNC = 2,
}
SerializeEnum!(stable_how);
DeserializeEnum!(stable_how);

/// Arguments for the WRITE procedure (procedure 7) as defined in RFC 1813 section 3.3.7
/// Used to write data to a regular file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE3args {
    /// File handle for the file to write
    pub file: nfs_fh3,
    /// Position within the file to begin writing
    pub offset: offset3,
    /// Number of bytes of data to write
    pub count: count3,
    /// How to commit the data to storage
    pub stable: stable_how,
    /// The data to be written
    pub data: Vec<u8>,
}
DeserializeStruct!(WRITE3args, file, offset, count, stable, data);
SerializeStruct!(WRITE3args, file, offset, count, stable, data);

/// Successful response for the WRITE procedure as defined in RFC 1813 section 3.3.7
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE3resok {
    /// File attributes before and after the operation
    pub file_wcc: wcc_data,
    /// Number of bytes actually written
    pub count: count3,
    /// How the data was committed to stable storage
    pub committed: stable_how,
    /// Write verifier to detect server restarts
    pub verf: writeverf3,
}
DeserializeStruct!(WRITE3resok, file_wcc, count, committed, verf);
SerializeStruct!(WRITE3resok, file_wcc, count, committed, verf);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE3resfail {
    pub file_wcc: wcc_data,
}
DeserializeStruct!(WRITE3resfail, file_wcc);
SerializeStruct!(WRITE3resfail, file_wcc);

pub type WRITE3res = Nfs3Result<WRITE3resok, WRITE3resfail>;

/// Arguments for the LINK procedure (procedure 15) as defined in RFC 1813 section 3.3.15
/// Used to create a hard link to a file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LINK3args {
    /// File handle for the target file
    pub file: nfs_fh3,
    /// Directory and name for the new link
    pub link: diropargs3,
}
DeserializeStruct!(LINK3args, file, link);
SerializeStruct!(LINK3args, file, link);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LINK3resok {
    pub file_attributes: post_op_attr,
    pub linkdir_wcc: wcc_data,
}
DeserializeStruct!(LINK3resok, file_attributes, linkdir_wcc);
SerializeStruct!(LINK3resok, file_attributes, linkdir_wcc);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LINK3resfail {
    pub file_attributes: post_op_attr,
    pub linkdir_wcc: wcc_data,
}
DeserializeStruct!(LINK3resfail, file_attributes, linkdir_wcc);
SerializeStruct!(LINK3resfail, file_attributes, linkdir_wcc);

pub type LINK3res = Nfs3Result<LINK3resok, LINK3resfail>;

/// Arguments for the COMMIT procedure (procedure 21) as defined in RFC 1813 section 3.3.21
/// Used to commit pending writes to stable storage
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct COMMIT3args {
    /// File handle for the file to commit
    pub file: nfs_fh3,
    /// Position within the file to start committing
    pub offset: offset3,
    /// Number of bytes to commit
    pub count: count3,
}
DeserializeStruct!(COMMIT3args, file, offset, count);
SerializeStruct!(COMMIT3args, file, offset, count);

/// Successful response for the COMMIT procedure as defined in RFC 1813 section 3.3.21
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct COMMIT3resok {
    /// File attributes before and after the operation
    pub file_wcc: wcc_data,
    /// Write verifier to detect server restarts
    pub verf: writeverf3,
}
DeserializeStruct!(COMMIT3resok, file_wcc, verf);
SerializeStruct!(COMMIT3resok, file_wcc, verf);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct COMMIT3resfail {
    pub file_wcc: wcc_data,
}
DeserializeStruct!(COMMIT3resfail, file_wcc);
SerializeStruct!(COMMIT3resfail, file_wcc);

pub type COMMIT3res = Nfs3Result<COMMIT3resok, COMMIT3resfail>;

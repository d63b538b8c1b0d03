//! Module contains XDR data structures related to directories for NFS version 3 protocol
//! as defined in RFC 1813.
//!
//! This module includes data structures for the following directory operations:
//! - LOOKUP: Look up a file name (procedure 3)
//! - CREATE: Create a regular file (procedure 8)
//! - MKDIR: Create a directory (procedure 9)
//! - SYMLINK: Create a symbolic link (procedure 10)
//! - MKNOD: Create a special device (procedure 11)
//! - REMOVE: Remove a file (procedure 12)
//! - RMDIR: Remove a directory (procedure 13)
//! - RENAME: Rename a file or directory (procedure 14)
//! - READDIR: Read from a directory (procedure 16)
//! - READDIRPLUS: Extended read from a directory (procedure 17)
//!
//! Directory listings are linked lists on the wire (`entry3 *nextentry`).
//! Here they are plain vectors, read and written with a loop over the
//! value-follows booleans so that a long listing never recurses.

// RFC 1813 type names (READDIR3args, MKDIR3resok)
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use super::*;

/// Arguments for the LOOKUP procedure (procedure 3) as defined in RFC 1813 section 3.3.3
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LOOKUP3args {
    pub what: diropargs3,
}
DeserializeStruct!(LOOKUP3args, what);
SerializeStruct!(LOOKUP3args, what);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LOOKUP3resok {
    /// File handle of the object found
    pub object: nfs_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);
SerializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LOOKUP3resfail {
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(LOOKUP3resfail, dir_attributes);
SerializeStruct!(LOOKUP3resfail, dir_attributes);

pub type LOOKUP3res = Nfs3Result<LOOKUP3resok, LOOKUP3resfail>;

/// File creation modes for CREATE operations
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum createmode3 {
    /// Normal file creation - doesn't error if file exists
    #[default]
    UNCHECKED = 0,
    /// Return error if file exists
    GUARDED = 1,
    /// Use exclusive create mechanism (with verifier)
    EXCLUSIVE = 2,
}
SerializeEnum!(createmode3);
DeserializeEnum!(createmode3);

/// How CREATE should behave, keyed by `createmode3`.
///
/// UNCHECKED and GUARDED carry the initial attributes, EXCLUSIVE carries
/// only the verifier used to detect retransmissions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum createhow3 {
    UNCHECKED(sattr3),
    GUARDED(sattr3),
    EXCLUSIVE(createverf3),
}

impl Default for createhow3 {
    fn default() -> Self {
        createhow3::UNCHECKED(sattr3::default())
    }
}

impl createhow3 {
    pub fn mode(&self) -> createmode3 {
        match self {
            createhow3::UNCHECKED(_) => createmode3::UNCHECKED,
            createhow3::GUARDED(_) => createmode3::GUARDED,
            createhow3::EXCLUSIVE(_) => createmode3::EXCLUSIVE,
        }
    }
}

impl Serialize for createhow3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.mode().serialize(dest)?;
        match self {
            createhow3::UNCHECKED(attr) | createhow3::GUARDED(attr) => attr.serialize(dest),
            createhow3::EXCLUSIVE(verf) => verf.serialize(dest),
        }
    }
}

impl Deserialize for createhow3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<createmode3>(src)? {
            createmode3::UNCHECKED => createhow3::UNCHECKED(deserialize(src)?),
            createmode3::GUARDED => createhow3::GUARDED(deserialize(src)?),
            createmode3::EXCLUSIVE => createhow3::EXCLUSIVE(deserialize(src)?),
        };
        Ok(())
    }
}

/// Arguments for the CREATE procedure (procedure 8) as defined in RFC 1813 section 3.3.8
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CREATE3args {
    /// Directory where the file should be created and its name
    pub dirops: diropargs3,
    pub how: createhow3,
}
DeserializeStruct!(CREATE3args, dirops, how);
SerializeStruct!(CREATE3args, dirops, how);

/// Successful response of the object creating procedures:
/// CREATE, MKDIR, SYMLINK and MKNOD share this layout
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CREATE3resok {
    /// Handle of the new object, servers may omit it
    pub obj: post_op_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(CREATE3resok, obj, obj_attributes, dir_wcc);
SerializeStruct!(CREATE3resok, obj, obj_attributes, dir_wcc);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CREATE3resfail {
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(CREATE3resfail, dir_wcc);
SerializeStruct!(CREATE3resfail, dir_wcc);

pub type CREATE3res = Nfs3Result<CREATE3resok, CREATE3resfail>;

pub type MKDIR3resok = CREATE3resok;
pub type MKDIR3resfail = CREATE3resfail;
pub type MKDIR3res = Nfs3Result<MKDIR3resok, MKDIR3resfail>;

pub type SYMLINK3resok = CREATE3resok;
pub type SYMLINK3resfail = CREATE3resfail;
pub type SYMLINK3res = Nfs3Result<SYMLINK3resok, SYMLINK3resfail>;

pub type MKNOD3resok = CREATE3resok;
pub type MKNOD3resfail = CREATE3resfail;
pub type MKNOD3res = Nfs3Result<MKNOD3resok, MKNOD3resfail>;

/// Arguments for the MKDIR procedure (procedure 9)
/// as defined in RFC 1813 section 3.3.9
/// Used to create a new directory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MKDIR3args {
    /// Directory where new directory should be created and its name
    pub dirops: diropargs3,
    /// Initial attributes for the new directory
    pub attributes: sattr3,
}
DeserializeStruct!(MKDIR3args, dirops, attributes);
SerializeStruct!(MKDIR3args, dirops, attributes);

/// Data for creating a symbolic link
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct symlinkdata3 {
    /// Attributes for the symbolic link
    pub symlink_attributes: sattr3,
    /// Target path for the symbolic link
    pub symlink_data: nfspath3,
}
DeserializeStruct!(symlinkdata3, symlink_attributes, symlink_data);
SerializeStruct!(symlinkdata3, symlink_attributes, symlink_data);

/// Arguments for the SYMLINK procedure (procedure 10)
/// as defined in RFC 1813 section 3.3.10
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SYMLINK3args {
    /// Directory where symbolic link should be created and its name
    pub dirops: diropargs3,
    /// Target path and attributes for the symbolic link
    pub symlink: symlinkdata3,
}
DeserializeStruct!(SYMLINK3args, dirops, symlink);
SerializeStruct!(SYMLINK3args, dirops, symlink);

/// Attributes and device numbers of a character or block special file
/// as defined in RFC 1813 section 3.3.11
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct devicedata3 {
    pub dev_attributes: sattr3,
    /// Major and minor device numbers
    pub spec: specdata3,
}
DeserializeStruct!(devicedata3, dev_attributes, spec);
SerializeStruct!(devicedata3, dev_attributes, spec);

/// What MKNOD should create, keyed by `ftype3`.
///
/// Devices carry attributes and device numbers, sockets and FIFOs only
/// attributes. The remaining types carry nothing; servers answer them with
/// NFS3ERR_BADTYPE but they are still valid on the wire.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum mknoddata3 {
    NF3CHR(devicedata3),
    NF3BLK(devicedata3),
    NF3SOCK(sattr3),
    NF3FIFO(sattr3),
    NF3REG,
    NF3DIR,
    NF3LNK,
}

impl Default for mknoddata3 {
    fn default() -> Self {
        mknoddata3::NF3FIFO(sattr3::default())
    }
}

impl mknoddata3 {
    pub fn ftype(&self) -> ftype3 {
        match self {
            mknoddata3::NF3CHR(_) => ftype3::NF3CHR,
            mknoddata3::NF3BLK(_) => ftype3::NF3BLK,
            mknoddata3::NF3SOCK(_) => ftype3::NF3SOCK,
            mknoddata3::NF3FIFO(_) => ftype3::NF3FIFO,
            mknoddata3::NF3REG => ftype3::NF3REG,
            mknoddata3::NF3DIR => ftype3::NF3DIR,
            mknoddata3::NF3LNK => ftype3::NF3LNK,
        }
    }
}

impl Serialize for mknoddata3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.ftype().serialize(dest)?;
        match self {
            mknoddata3::NF3CHR(device) | mknoddata3::NF3BLK(device) => device.serialize(dest),
            mknoddata3::NF3SOCK(attr) | mknoddata3::NF3FIFO(attr) => attr.serialize(dest),
            mknoddata3::NF3REG | mknoddata3::NF3DIR | mknoddata3::NF3LNK => Ok(()),
        }
    }
}

impl Deserialize for mknoddata3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<ftype3>(src)? {
            ftype3::NF3CHR => mknoddata3::NF3CHR(deserialize(src)?),
            ftype3::NF3BLK => mknoddata3::NF3BLK(deserialize(src)?),
            ftype3::NF3SOCK => mknoddata3::NF3SOCK(deserialize(src)?),
            ftype3::NF3FIFO => mknoddata3::NF3FIFO(deserialize(src)?),
            ftype3::NF3REG => mknoddata3::NF3REG,
            ftype3::NF3DIR => mknoddata3::NF3DIR,
            ftype3::NF3LNK => mknoddata3::NF3LNK,
        };
        Ok(())
    }
}

/// Arguments for the MKNOD procedure (procedure 11)
/// as defined in RFC 1813 section 3.3.11
/// Used to create a special device file, FIFO, or socket
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MKNOD3args {
    /// Directory where the special file should be created and its name
    pub dirops: diropargs3,
    /// Type and device information for the special file
    pub what: mknoddata3,
}
DeserializeStruct!(MKNOD3args, dirops, what);
SerializeStruct!(MKNOD3args, dirops, what);

/// Arguments for the REMOVE procedure (procedure 12) as defined in RFC 1813 section 3.3.12
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct REMOVE3args {
    pub object: diropargs3,
}
DeserializeStruct!(REMOVE3args, object);
SerializeStruct!(REMOVE3args, object);

/// Result arm of REMOVE and RMDIR, identical on success and failure
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct REMOVE3resok {
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(REMOVE3resok, dir_wcc);
SerializeStruct!(REMOVE3resok, dir_wcc);

pub type REMOVE3resfail = REMOVE3resok;
pub type REMOVE3res = Nfs3Result<REMOVE3resok, REMOVE3resfail>;

/// Arguments for the RMDIR procedure (procedure 13) as defined in RFC 1813 section 3.3.13
pub type RMDIR3args = REMOVE3args;
pub type RMDIR3resok = REMOVE3resok;
pub type RMDIR3resfail = REMOVE3resok;
pub type RMDIR3res = Nfs3Result<RMDIR3resok, RMDIR3resfail>;

/// Arguments for the RENAME procedure (procedure 14) as defined in RFC 1813 section 3.3.14
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RENAME3args {
    pub from: diropargs3,
    pub to: diropargs3,
}
DeserializeStruct!(RENAME3args, from, to);
SerializeStruct!(RENAME3args, from, to);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RENAME3resok {
    pub fromdir_wcc: wcc_data,
    pub todir_wcc: wcc_data,
}
DeserializeStruct!(RENAME3resok, fromdir_wcc, todir_wcc);
SerializeStruct!(RENAME3resok, fromdir_wcc, todir_wcc);

pub type RENAME3resfail = RENAME3resok;
pub type RENAME3res = Nfs3Result<RENAME3resok, RENAME3resfail>;

/// Arguments for the READDIR procedure (procedure 16)
/// as defined in RFC 1813 section 3.3.16
/// Used to read entries from a directory. The server returns a variable number of directory entries,
/// up to the specified count limit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIR3args {
    /// File handle for the directory to be read
    pub dir: nfs_fh3,
    /// Cookie indicating where to start reading directory entries
    /// A cookie value of 0 means start at beginning of directory
    pub cookie: cookie3,
    /// Cookie verifier to detect whether directory has changed
    pub cookieverf: cookieverf3,
    /// Maximum number of bytes of directory information to return
    pub count: count3,
}
DeserializeStruct!(READDIR3args, dir, cookie, cookieverf, count);
SerializeStruct!(READDIR3args, dir, cookie, cookieverf, count);

/// Directory entry returned by READDIR operation
/// as defined in RFC 1813 section 3.3.16
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct entry3 {
    /// File identifier (inode number)
    pub fileid: fileid3,
    /// Name of the directory entry
    pub name: filename3,
    /// Cookie for the next READDIR operation
    pub cookie: cookie3,
}
DeserializeStruct!(entry3, fileid, name, cookie);
SerializeStruct!(entry3, fileid, name, cookie);

/// Writes `entries` as an XDR linked list followed by the `eof` flag
fn serialize_entries<T: Serialize, W: Write>(
    entries: &[T],
    eof: bool,
    dest: &mut W,
) -> std::io::Result<()> {
    for entry in entries {
        true.serialize(dest)?;
        entry.serialize(dest)?;
    }
    false.serialize(dest)?;
    eof.serialize(dest)
}

/// Reads an XDR linked list into `entries`, in wire order, then the `eof` flag
fn deserialize_entries<T: Deserialize + Default, R: Read>(
    entries: &mut Vec<T>,
    src: &mut R,
) -> std::io::Result<bool> {
    entries.clear();
    while deserialize::<bool>(src)? {
        entries.push(deserialize(src)?);
    }
    deserialize::<bool>(src)
}

/// Entries of one READDIR reply
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct dirlist3 {
    pub entries: Vec<entry3>,
    /// No entries follow the last one returned
    pub eof: bool,
}

impl Serialize for dirlist3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        serialize_entries(&self.entries, self.eof, dest)
    }
}

impl Deserialize for dirlist3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.eof = deserialize_entries(&mut self.entries, src)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIR3resok {
    pub dir_attributes: post_op_attr,
    pub cookieverf: cookieverf3,
    pub reply: dirlist3,
}
DeserializeStruct!(READDIR3resok, dir_attributes, cookieverf, reply);
SerializeStruct!(READDIR3resok, dir_attributes, cookieverf, reply);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIR3resfail {
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(READDIR3resfail, dir_attributes);
SerializeStruct!(READDIR3resfail, dir_attributes);

pub type READDIR3res = Nfs3Result<READDIR3resok, READDIR3resfail>;

/// Arguments for the READDIRPLUS procedure (procedure 17)
/// as defined in RFC 1813 section 3.3.17
/// READDIRPLUS returns directory entries along with their attributes and file handles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIRPLUS3args {
    /// Directory file handle
    pub dir: nfs_fh3,
    /// Cookie from previous READDIRPLUS - where to start reading
    pub cookie: cookie3,
    /// Cookie verifier to detect changed directories
    pub cookieverf: cookieverf3,
    /// Maximum number of bytes of directory information to return
    pub dircount: count3,
    /// Maximum number of bytes of attribute information to return
    pub maxcount: count3,
}
DeserializeStruct!(READDIRPLUS3args, dir, cookie, cookieverf, dircount, maxcount);
SerializeStruct!(READDIRPLUS3args, dir, cookie, cookieverf, dircount, maxcount);

/// Directory entry with additional attributes for READDIRPLUS operation
/// as defined in RFC 1813 section 3.3.17
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct entryplus3 {
    /// File identifier (inode number) uniquely identifying the file within the filesystem
    pub fileid: fileid3,
    /// Name of the directory entry (filename)
    pub name: filename3,
    /// Cookie value that can be used in subsequent READDIRPLUS calls to resume listing
    pub cookie: cookie3,
    /// File attributes for this directory entry
    pub name_attributes: post_op_attr,
    /// File handle for this directory entry
    pub name_handle: post_op_fh3,
}
DeserializeStruct!(entryplus3, fileid, name, cookie, name_attributes, name_handle);
SerializeStruct!(entryplus3, fileid, name, cookie, name_attributes, name_handle);

/// Entries of one READDIRPLUS reply
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct dirlistplus3 {
    pub entries: Vec<entryplus3>,
    pub eof: bool,
}

impl Serialize for dirlistplus3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        serialize_entries(&self.entries, self.eof, dest)
    }
}

impl Deserialize for dirlistplus3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.eof = deserialize_entries(&mut self.entries, src)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIRPLUS3resok {
    pub dir_attributes: post_op_attr,
    pub cookieverf: cookieverf3,
    pub reply: dirlistplus3,
}
DeserializeStruct!(READDIRPLUS3resok, dir_attributes, cookieverf, reply);
SerializeStruct!(READDIRPLUS3resok, dir_attributes, cookieverf, reply);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIRPLUS3resfail {
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(READDIRPLUS3resfail, dir_attributes);
SerializeStruct!(READDIRPLUS3resfail, dir_attributes);

pub type READDIRPLUS3res = Nfs3Result<READDIRPLUS3resok, READDIRPLUS3resfail>;

//! This module implements file system operation types defined in RFC 1813 (NFS Version 3 Protocol)
//! for operations related to file system information and statistics.
//!
//! It includes data structures for the following operations:
//! - FSSTAT: Get file system statistics (procedure 18)
//! - FSINFO: Get file system information (procedure 19)
//! - PATHCONF: Get path configuration information (procedure 20)

// Keep the RFC 1813 type names
#![allow(non_camel_case_types)]

use super::*;

// Section 3.3.19. Procedure 19: FSINFO - Get static file system Information
// The following constants are used in fsinfo to construct the bitmask 'properties',
// which represents the file system properties.

/// If this bit is 1 (TRUE), the file system supports hard links.
pub const FSF3_LINK: u32 = 0x0001;

/// If this bit is 1 (TRUE), the file system supports symbolic links.
pub const FSF3_SYMLINK: u32 = 0x0002;

/// If this bit is 1 (TRUE), the information returned by
/// PATHCONF is identical for every file and directory
/// in the file system. If it is 0 (FALSE), the client
/// should retrieve PATHCONF information for each file
/// and directory as required.
pub const FSF3_HOMOGENEOUS: u32 = 0x0008;

/// If this bit is 1 (TRUE), the server will set the
/// times for a file via SETATTR if requested (to the
/// accuracy indicated by time_delta). If it is 0
/// (FALSE), the server cannot set times as requested.
pub const FSF3_CANSETTIME: u32 = 0x0010;

/// Arguments shared by FSSTAT and FSINFO
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FSSTAT3args {
    /// Any file handle within the file system
    pub fsroot: nfs_fh3,
}
DeserializeStruct!(FSSTAT3args, fsroot);
SerializeStruct!(FSSTAT3args, fsroot);

pub type FSINFO3args = FSSTAT3args;

/// File system statistics returned by FSSTAT procedure
/// as defined in RFC 1813 section 3.3.18
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FSSTAT3resok {
    /// File system attributes
    pub obj_attributes: post_op_attr,
    /// Total size of file system in bytes
    pub tbytes: size3,
    /// Free space in bytes
    pub fbytes: size3,
    /// Free space available to user in bytes (considering quotas)
    pub abytes: size3,
    /// Total number of file slots
    pub tfiles: size3,
    /// Number of free file slots
    pub ffiles: size3,
    /// Number of free file slots available to user (considering quotas)
    pub afiles: size3,
    /// Time for which this information is valid (seconds)
    /// Zero means the information is always valid
    pub invarsec: u32,
}
DeserializeStruct!(
    FSSTAT3resok,
    obj_attributes,
    tbytes,
    fbytes,
    abytes,
    tfiles,
    ffiles,
    afiles,
    invarsec
);
SerializeStruct!(
    FSSTAT3resok,
    obj_attributes,
    tbytes,
    fbytes,
    abytes,
    tfiles,
    ffiles,
    afiles,
    invarsec
);

/// Failure arm of FSSTAT, FSINFO and PATHCONF
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FSSTAT3resfail {
    pub obj_attributes: post_op_attr,
}
DeserializeStruct!(FSSTAT3resfail, obj_attributes);
SerializeStruct!(FSSTAT3resfail, obj_attributes);

pub type FSSTAT3res = Nfs3Result<FSSTAT3resok, FSSTAT3resfail>;

/// File system information structure returned by FSINFO procedure
/// as defined in RFC 1813 section 3.3.19
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FSINFO3resok {
    /// File system attributes
    pub obj_attributes: post_op_attr,
    /// Maximum read request supported by server (bytes)
    pub rtmax: u32,
    /// Preferred read request size (bytes)
    pub rtpref: u32,
    /// Suggested read request multiple (bytes)
    /// Requests should be a multiple of this value
    pub rtmult: u32,
    /// Maximum write request supported by server (bytes)
    pub wtmax: u32,
    /// Preferred write request size (bytes)
    pub wtpref: u32,
    /// Suggested write request multiple (bytes)
    /// Requests should be a multiple of this value
    pub wtmult: u32,
    /// Preferred directory read request size (bytes)
    pub dtpref: u32,
    /// Maximum file size supported (bytes)
    pub maxfilesize: size3,
    /// Server time granularity (resolution of time values)
    pub time_delta: nfstime3,
    /// Bit mask of file system properties (FSF3_* constants)
    pub properties: u32,
}
DeserializeStruct!(
    FSINFO3resok,
    obj_attributes,
    rtmax,
    rtpref,
    rtmult,
    wtmax,
    wtpref,
    wtmult,
    dtpref,
    maxfilesize,
    time_delta,
    properties
);
SerializeStruct!(
    FSINFO3resok,
    obj_attributes,
    rtmax,
    rtpref,
    rtmult,
    wtmax,
    wtpref,
    wtmult,
    dtpref,
    maxfilesize,
    time_delta,
    properties
);

pub type FSINFO3resfail = FSSTAT3resfail;
pub type FSINFO3res = Nfs3Result<FSINFO3resok, FSINFO3resfail>;

/// Arguments for the PATHCONF procedure (procedure 20) as defined in RFC 1813 section 3.3.20
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PATHCONF3args {
    pub object: nfs_fh3,
}
DeserializeStruct!(PATHCONF3args, object);
SerializeStruct!(PATHCONF3args, object);

/// Path configuration information returned by PATHCONF procedure
/// as defined in RFC 1813 section 3.3.20
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PATHCONF3resok {
    /// File system attributes
    pub obj_attributes: post_op_attr,
    /// Maximum number of hard links to a file
    pub linkmax: u32,
    /// Maximum length of a file name
    pub name_max: u32,
    /// If true, long names are not truncated but return error
    pub no_trunc: bool,
    /// If true, changing file ownership is restricted to privileged users
    pub chown_restricted: bool,
    /// If true, file names are case insensitive (FOO equals foo)
    pub case_insensitive: bool,
    /// If true, file name case is preserved
    pub case_preserving: bool,
}
DeserializeStruct!(
    PATHCONF3resok,
    obj_attributes,
    linkmax,
    name_max,
    no_trunc,
    chown_restricted,
    case_insensitive,
    case_preserving
);
SerializeStruct!(
    PATHCONF3resok,
    obj_attributes,
    linkmax,
    name_max,
    no_trunc,
    chown_restricted,
    case_insensitive,
    case_preserving
);

pub type PATHCONF3resfail = FSSTAT3resfail;
pub type PATHCONF3res = Nfs3Result<PATHCONF3resok, PATHCONF3resfail>;

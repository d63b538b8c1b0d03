#![allow(dead_code)]

use std::sync::Once;

use nfs3_wire::xdr::nfs3::{
    fattr3, ftype3, nfs_fh3, nfstime3, sattr3, set_atime, set_mtime, specdata3, wcc_attr,
    wcc_data,
};
use nfs3_wire::xdr::rpc::{auth_unix, opaque_auth};

/// Routes codec traces to the test output
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

pub fn fh(data: &[u8]) -> nfs_fh3 {
    nfs_fh3 { data: data.to_vec() }
}

pub fn time(seconds: u32, nseconds: u32) -> nfstime3 {
    nfstime3 { seconds, nseconds }
}

pub fn file_attributes(fileid: u64) -> fattr3 {
    fattr3 {
        ftype: ftype3::NF3REG,
        mode: 0o644,
        nlink: 1,
        uid: 1000,
        gid: 1000,
        size: 5_000_000_000,
        used: 5_000_001_024,
        rdev: specdata3::default(),
        fsid: 0xdead_beef_0000_0001,
        fileid,
        atime: time(1_700_000_000, 1),
        mtime: time(1_700_000_100, 999_999_999),
        ctime: time(1_700_000_200, 0),
    }
}

pub fn dir_attributes(fileid: u64) -> fattr3 {
    fattr3 { ftype: ftype3::NF3DIR, mode: 0o755, nlink: 2, size: 4096, used: 4096, ..file_attributes(fileid) }
}

pub fn wcc(size: u64) -> wcc_data {
    wcc_data {
        before: Some(wcc_attr { size, mtime: time(10, 20), ctime: time(30, 40) }),
        after: Some(file_attributes(7)),
    }
}

pub fn new_attributes() -> sattr3 {
    sattr3 {
        mode: Some(0o600),
        uid: None,
        gid: Some(100),
        size: Some(0),
        atime: set_atime::SET_TO_SERVER_TIME,
        mtime: set_mtime::SET_TO_CLIENT_TIME(time(1_600_000_000, 500)),
    }
}

pub fn unix_cred() -> opaque_auth {
    opaque_auth::unix(&auth_unix {
        stamp: 0x1234_5678,
        machinename: b"client".to_vec(),
        uid: 1000,
        gid: 1000,
        gids: vec![1000, 27, 100],
    })
    .expect("serialize auth_unix")
}

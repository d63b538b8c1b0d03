use std::io::Cursor;

mod support;

use nfs3_wire::xdr::nfs3::*;
use nfs3_wire::xdr::rpc::msg_type;
use nfs3_wire::{
    DecodeError, EncodeError, Nfsv3Decoder, Nfsv3Encoder, Nfsv3Message, Nfsv3Request,
    Nfsv3Response,
};

use support::{dir_attributes, fh, file_attributes, new_attributes, time, wcc};

fn dirop(dir: &[u8], name: &str) -> diropargs3 {
    diropargs3 { dir: fh(dir), name: name.into() }
}

fn check_request(request: Nfsv3Request) -> Vec<u8> {
    let mut encoder = Nfsv3Encoder::new();
    let bytes = encoder.encode_request(&request).expect("encode request").to_vec();
    assert_eq!(bytes.len() % 4, 0, "{:?}", request.procedure());

    let mut cursor = Cursor::new(bytes.as_slice());
    let decoded = Nfsv3Decoder::new()
        .decode_request(&mut cursor, request.procedure() as u32)
        .expect("decode request")
        .expect("complete request");
    assert_eq!(decoded, request);
    assert_eq!(cursor.position() as usize, bytes.len());
    bytes
}

fn check_response(response: Nfsv3Response) -> Vec<u8> {
    let mut encoder = Nfsv3Encoder::new();
    let bytes = encoder.encode_response(&response).expect("encode response").to_vec();
    assert_eq!(bytes.len() % 4, 0, "{:?}", response.procedure());

    let mut cursor = Cursor::new(bytes.as_slice());
    let decoded = Nfsv3Decoder::new()
        .decode_response(&mut cursor, response.procedure() as u32)
        .expect("decode response")
        .expect("complete response");
    assert_eq!(decoded, response);
    assert_eq!(cursor.position() as usize, bytes.len());
    bytes
}

#[test]
fn test_every_procedure_request() {
    support::init_tracing();

    let requests = vec![
        Nfsv3Request::Null(()),
        Nfsv3Request::GetAttr(GETATTR3args { object: fh(&[1, 2, 3]) }),
        Nfsv3Request::SetAttr(SETATTR3args {
            object: fh(&[4; 32]),
            new_attributes: new_attributes(),
            guard: Some(time(5, 6)),
        }),
        Nfsv3Request::Lookup(LOOKUP3args { what: dirop(&[1], "name.txt") }),
        Nfsv3Request::Access(ACCESS3args {
            object: fh(&[1]),
            access: ACCESS3_READ | ACCESS3_LOOKUP | ACCESS3_EXECUTE,
        }),
        Nfsv3Request::ReadLink(READLINK3args { symlink: fh(&[2]) }),
        Nfsv3Request::Read(READ3args { file: fh(&[3]), offset: 1 << 40, count: 65536 }),
        Nfsv3Request::Write(WRITE3args {
            file: fh(&[3]),
            offset: 12,
            count: 5,
            stable: stable_how::FILE_SYNC,
            data: b"hello".to_vec(),
        }),
        Nfsv3Request::Create(CREATE3args {
            dirops: dirop(&[1], "new"),
            how: createhow3::GUARDED(new_attributes()),
        }),
        Nfsv3Request::MkDir(MKDIR3args { dirops: dirop(&[1], "sub"), attributes: sattr3::default() }),
        Nfsv3Request::SymLink(SYMLINK3args {
            dirops: dirop(&[1], "link"),
            symlink: symlinkdata3 {
                symlink_attributes: sattr3::default(),
                symlink_data: "../target".into(),
            },
        }),
        Nfsv3Request::MkNod(MKNOD3args {
            dirops: dirop(&[1], "tty"),
            what: mknoddata3::NF3CHR(devicedata3 {
                dev_attributes: new_attributes(),
                spec: specdata3 { specdata1: 4, specdata2: 64 },
            }),
        }),
        Nfsv3Request::Remove(REMOVE3args { object: dirop(&[1], "old") }),
        Nfsv3Request::RmDir(RMDIR3args { object: dirop(&[1], "sub") }),
        Nfsv3Request::Rename(RENAME3args { from: dirop(&[1], "a"), to: dirop(&[2], "b") }),
        Nfsv3Request::Link(LINK3args { file: fh(&[3]), link: dirop(&[1], "hard") }),
        Nfsv3Request::ReadDir(READDIR3args {
            dir: fh(&[1]),
            cookie: 3,
            cookieverf: [7; 8],
            count: 4096,
        }),
        Nfsv3Request::ReadDirPlus(READDIRPLUS3args {
            dir: fh(&[1]),
            cookie: 0,
            cookieverf: [0; 8],
            dircount: 1024,
            maxcount: 8192,
        }),
        Nfsv3Request::FsStat(FSSTAT3args { fsroot: fh(&[1]) }),
        Nfsv3Request::FsInfo(FSINFO3args { fsroot: fh(&[1]) }),
        Nfsv3Request::PathConf(PATHCONF3args { object: fh(&[1]) }),
        Nfsv3Request::Commit(COMMIT3args { file: fh(&[3]), offset: 0, count: 0 }),
    ];

    let procedures: Vec<u32> = requests.iter().map(|r| r.procedure() as u32).collect();
    assert_eq!(procedures, (0..=21).collect::<Vec<u32>>());

    for request in requests {
        check_request(request);
    }
}

#[test]
fn test_every_procedure_response() {
    let post_op = Some(file_attributes(3));
    let created = CREATE3resok {
        obj: Some(fh(&[9, 9])),
        obj_attributes: post_op,
        dir_wcc: wcc(4096),
    };

    let responses = vec![
        Nfsv3Response::Null(()),
        Nfsv3Response::GetAttr(Nfs3Result::Ok(GETATTR3resok { obj_attributes: file_attributes(3) })),
        Nfsv3Response::SetAttr(Nfs3Result::Ok(SETATTR3resok { obj_wcc: wcc(0) })),
        Nfsv3Response::Lookup(Nfs3Result::Ok(LOOKUP3resok {
            object: fh(&[3]),
            obj_attributes: post_op,
            dir_attributes: Some(dir_attributes(1)),
        })),
        Nfsv3Response::Access(Nfs3Result::Ok(ACCESS3resok {
            obj_attributes: None,
            access: ACCESS3_READ,
        })),
        Nfsv3Response::ReadLink(Nfs3Result::Ok(READLINK3resok {
            symlink_attributes: None,
            data: "/etc/hosts".into(),
        })),
        Nfsv3Response::Read(Nfs3Result::Ok(READ3resok {
            file_attributes: post_op,
            count: 3,
            eof: true,
            data: vec![1, 2, 3],
        })),
        Nfsv3Response::Write(Nfs3Result::Ok(WRITE3resok {
            file_wcc: wcc(12),
            count: 5,
            committed: stable_how::UNSTABLE,
            verf: [1, 2, 3, 4, 5, 6, 7, 8],
        })),
        Nfsv3Response::Create(Nfs3Result::Ok(created.clone())),
        Nfsv3Response::MkDir(Nfs3Result::Ok(created.clone())),
        Nfsv3Response::SymLink(Nfs3Result::Ok(CREATE3resok { obj: None, ..created.clone() })),
        Nfsv3Response::MkNod(Nfs3Result::Ok(created)),
        Nfsv3Response::Remove(Nfs3Result::Ok(REMOVE3resok { dir_wcc: wcc(4096) })),
        Nfsv3Response::RmDir(Nfs3Result::Ok(RMDIR3resok { dir_wcc: wcc_data::default() })),
        Nfsv3Response::Rename(Nfs3Result::Ok(RENAME3resok {
            fromdir_wcc: wcc(1),
            todir_wcc: wcc(2),
        })),
        Nfsv3Response::Link(Nfs3Result::Ok(LINK3resok {
            file_attributes: post_op,
            linkdir_wcc: wcc(4096),
        })),
        Nfsv3Response::ReadDir(Nfs3Result::Ok(READDIR3resok {
            dir_attributes: None,
            cookieverf: [0; 8],
            reply: dirlist3 { entries: Vec::new(), eof: true },
        })),
        Nfsv3Response::ReadDirPlus(Nfs3Result::Ok(READDIRPLUS3resok {
            dir_attributes: None,
            cookieverf: [0; 8],
            reply: dirlistplus3 { entries: Vec::new(), eof: false },
        })),
        Nfsv3Response::FsStat(Nfs3Result::Ok(FSSTAT3resok {
            obj_attributes: None,
            tbytes: 1 << 40,
            fbytes: 1 << 39,
            abytes: 1 << 38,
            tfiles: 1_000_000,
            ffiles: 999_000,
            afiles: 998_000,
            invarsec: 0,
        })),
        Nfsv3Response::FsInfo(Nfs3Result::Ok(FSINFO3resok {
            obj_attributes: None,
            rtmax: 1 << 20,
            rtpref: 1 << 20,
            rtmult: 4096,
            wtmax: 1 << 20,
            wtpref: 1 << 20,
            wtmult: 4096,
            dtpref: 8192,
            maxfilesize: u64::MAX,
            time_delta: time(0, 1),
            properties: FSF3_LINK | FSF3_SYMLINK | FSF3_HOMOGENEOUS | FSF3_CANSETTIME,
        })),
        Nfsv3Response::PathConf(Nfs3Result::Ok(PATHCONF3resok {
            obj_attributes: None,
            linkmax: 32000,
            name_max: 255,
            no_trunc: true,
            chown_restricted: true,
            case_insensitive: false,
            case_preserving: true,
        })),
        Nfsv3Response::Commit(Nfs3Result::Ok(COMMIT3resok { file_wcc: wcc(0), verf: [8; 8] })),
    ];

    let procedures: Vec<u32> = responses.iter().map(|r| r.procedure() as u32).collect();
    assert_eq!(procedures, (0..=21).collect::<Vec<u32>>());

    for response in responses {
        check_response(response);
    }
}

#[test]
fn test_getattr_layout() {
    let bytes = check_request(Nfsv3Request::GetAttr(GETATTR3args {
        object: fh(&[1, 2, 3, 4, 5, 6, 7, 8]),
    }));
    assert_eq!(bytes, vec![0, 0, 0, 8, 1, 2, 3, 4, 5, 6, 7, 8]);

    // fattr3 is 84 bytes after the status
    let bytes = check_response(Nfsv3Response::GetAttr(Nfs3Result::Ok(GETATTR3resok {
        obj_attributes: file_attributes(1),
    })));
    assert_eq!(bytes.len(), 4 + 84);
}

#[test]
fn test_failure_arms() {
    let bytes = check_response(Nfsv3Response::GetAttr(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_STALE,
        (),
    )));
    assert_eq!(bytes, vec![0, 0, 0, 70]);

    let bytes = check_response(Nfsv3Response::SetAttr(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_NOT_SYNC,
        SETATTR3resfail { obj_wcc: wcc_data::default() },
    )));
    assert_eq!(bytes, vec![0, 0, 0x27, 0x12, 0, 0, 0, 0, 0, 0, 0, 0]);

    check_response(Nfsv3Response::Lookup(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_NOENT,
        LOOKUP3resfail { dir_attributes: Some(dir_attributes(1)) },
    )));
    check_response(Nfsv3Response::Create(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_EXIST,
        CREATE3resfail { dir_wcc: wcc(4096) },
    )));
    check_response(Nfsv3Response::Rename(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_NOTEMPTY,
        RENAME3resok { fromdir_wcc: wcc(1), todir_wcc: wcc_data::default() },
    )));
    check_response(Nfsv3Response::FsInfo(Nfs3Result::Fail(
        nfsstat3::NFS3ERR_SERVERFAULT,
        FSSTAT3resfail { obj_attributes: None },
    )));
}

#[test]
fn test_ok_status_cannot_carry_failure() {
    let mut encoder = Nfsv3Encoder::new();
    let response = Nfsv3Response::GetAttr(Nfs3Result::Fail(nfsstat3::NFS3_OK, ()));
    match encoder.encode_response(&response) {
        Err(EncodeError::InvalidDiscriminant(_)) => {}
        other => panic!("expected InvalidDiscriminant, got {other:?}"),
    }
}

#[test]
fn test_create_modes() {
    let bytes = check_request(Nfsv3Request::Create(CREATE3args {
        dirops: dirop(&[1, 2, 3, 4], "x"),
        how: createhow3::EXCLUSIVE([0xa5; 8]),
    }));
    // fh, name "x", mode EXCLUSIVE, verifier
    assert_eq!(bytes.len(), 8 + 8 + 4 + 8);
    assert_eq!(&bytes[16..20], &[0, 0, 0, 2]);
    assert_eq!(&bytes[20..], &[0xa5; 8]);

    let bytes = check_request(Nfsv3Request::Create(CREATE3args {
        dirops: dirop(&[1, 2, 3, 4], "x"),
        how: createhow3::UNCHECKED(sattr3::default()),
    }));
    // empty sattr3 is six FALSE/DONT_CHANGE words
    assert_eq!(bytes.len(), 8 + 8 + 4 + 24);
    assert_eq!(&bytes[16..20], &[0, 0, 0, 0]);
}

#[test]
fn test_mknod_types() {
    let socket = check_request(Nfsv3Request::MkNod(MKNOD3args {
        dirops: dirop(&[1, 2, 3, 4], "s"),
        what: mknoddata3::NF3SOCK(sattr3::default()),
    }));
    assert_eq!(&socket[16..20], &[0, 0, 0, 6]);
    assert_eq!(socket.len(), 20 + 24);

    let block = check_request(Nfsv3Request::MkNod(MKNOD3args {
        dirops: dirop(&[1, 2, 3, 4], "b"),
        what: mknoddata3::NF3BLK(devicedata3 {
            dev_attributes: sattr3::default(),
            spec: specdata3 { specdata1: 8, specdata2: 1 },
        }),
    }));
    assert_eq!(&block[16..20], &[0, 0, 0, 3]);
    assert_eq!(&block[block.len() - 8..], &[0, 0, 0, 8, 0, 0, 0, 1]);

    let fifo = check_request(Nfsv3Request::MkNod(MKNOD3args {
        dirops: dirop(&[1, 2, 3, 4], "f"),
        what: mknoddata3::NF3FIFO(new_attributes()),
    }));
    assert_eq!(&fifo[16..20], &[0, 0, 0, 7]);

    let regular = check_request(Nfsv3Request::MkNod(MKNOD3args {
        dirops: dirop(&[1, 2, 3, 4], "r"),
        what: mknoddata3::NF3REG,
    }));
    assert_eq!(regular.len(), 20);
}

#[test]
fn test_readdir_entries_keep_order() {
    let names = ["..", ".", "zeta", "alpha", "m"];
    let entries: Vec<entry3> = names
        .iter()
        .enumerate()
        .map(|(i, name)| entry3 { fileid: 100 + i as u64, name: (*name).into(), cookie: i as u64 + 1 })
        .collect();

    let response = Nfsv3Response::ReadDir(Nfs3Result::Ok(READDIR3resok {
        dir_attributes: Some(dir_attributes(1)),
        cookieverf: [3; 8],
        reply: dirlist3 { entries, eof: false },
    }));
    check_response(response);

    let empty = check_response(Nfsv3Response::ReadDir(Nfs3Result::Ok(READDIR3resok {
        dir_attributes: None,
        cookieverf: [0; 8],
        reply: dirlist3 { entries: Vec::new(), eof: true },
    })));
    assert_eq!(empty.len(), 24);
    assert_eq!(&empty[16..], &[0, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_readdirplus_entries_keep_order() {
    let entries: Vec<entryplus3> = (0..50_u64)
        .map(|i| entryplus3 {
            fileid: i,
            name: format!("file-{i}").as_str().into(),
            cookie: i + 1,
            name_attributes: (i % 2 == 0).then(|| file_attributes(i)),
            name_handle: (i % 3 == 0).then(|| fh(&i.to_be_bytes())),
        })
        .collect();

    let response = Nfsv3Response::ReadDirPlus(Nfs3Result::Ok(READDIRPLUS3resok {
        dir_attributes: None,
        cookieverf: [1; 8],
        reply: dirlistplus3 { entries, eof: true },
    }));
    check_response(response);
}

#[test]
fn test_message_dispatch_by_kind() {
    let request = Nfsv3Request::Commit(COMMIT3args { file: fh(&[1]), offset: 0, count: 0 });
    let mut encoder = Nfsv3Encoder::new();
    let bytes = encoder.encode_message(&Nfsv3Message::Request(request.clone())).expect("encode").to_vec();

    let decoder = Nfsv3Decoder::new();
    let mut cursor = Cursor::new(bytes.as_slice());
    assert_eq!(
        decoder.decode_message(&mut cursor, 21, msg_type::CALL).expect("decode"),
        Some(Nfsv3Message::Request(request))
    );
}

#[test]
fn test_unknown_procedure() {
    let decoder = Nfsv3Decoder::new();
    let mut cursor = Cursor::new(&[0_u8; 16][..]);
    assert_eq!(decoder.decode_request(&mut cursor, 22), Err(DecodeError::UnknownProcedure(22)));
    assert_eq!(decoder.decode_response(&mut cursor, 1000), Err(DecodeError::UnknownProcedure(1000)));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_short_buffer_rewinds() {
    support::init_tracing();

    let bytes = check_request(Nfsv3Request::Lookup(LOOKUP3args { what: dirop(&[1, 2], "name") }));
    let decoder = Nfsv3Decoder::new();

    for cut in [0, 3, 4, 8, bytes.len() - 1] {
        let mut cursor = Cursor::new(&bytes[..cut]);
        assert_eq!(decoder.decode_request(&mut cursor, 3).expect("short buffer"), None, "cut {cut}");
        assert_eq!(cursor.position(), 0);
    }
}

#[test]
fn test_malformed_bodies() {
    let decoder = Nfsv3Decoder::new();

    // nfsstat3 value 3 is not defined
    let mut cursor = Cursor::new(&[0_u8, 0, 0, 3][..]);
    assert!(matches!(decoder.decode_response(&mut cursor, 1), Err(DecodeError::Malformed(_))));
    assert_eq!(cursor.position(), 0);

    // createmode3 value 3
    let mut bytes = check_request(Nfsv3Request::Create(CREATE3args {
        dirops: dirop(&[1, 2, 3, 4], "x"),
        how: createhow3::EXCLUSIVE([0; 8]),
    }));
    bytes[19] = 3;
    let mut cursor = Cursor::new(bytes.as_slice());
    assert!(matches!(decoder.decode_request(&mut cursor, 8), Err(DecodeError::Malformed(_))));

    // file handle of 65 bytes
    let mut bytes = vec![0, 0, 0, 65];
    bytes.extend_from_slice(&[0; 68]);
    let mut cursor = Cursor::new(bytes.as_slice());
    assert!(matches!(decoder.decode_request(&mut cursor, 1), Err(DecodeError::Malformed(_))));
}

#[test]
fn test_oversized_handle_is_not_encoded() {
    let mut encoder = Nfsv3Encoder::new();
    let request = Nfsv3Request::GetAttr(GETATTR3args { object: fh(&[0; 65]) });
    match encoder.encode_request(&request) {
        Err(EncodeError::FileHandleTooLong(65)) => {}
        other => panic!("expected FileHandleTooLong, got {other:?}"),
    }
}

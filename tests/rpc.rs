use std::io::Cursor;

mod support;

use nfs3_wire::xdr::nfs3;
use nfs3_wire::xdr::rpc::{
    accept_body, auth_error_reply_message, auth_flavor, auth_stat, auth_unix,
    garbage_args_reply_message, make_success_reply, mismatch_info, opaque_auth,
    proc_unavail_reply_message, prog_mismatch_reply_message, prog_unavail_reply_message,
    rejected_reply, rpc_vers_mismatch, system_err_reply_message, RpcAcceptedReplyMessage,
    RpcCallMessage, RpcMessage, RpcRejectedReplyMessage,
};
use nfs3_wire::xdr::deserialize;
use nfs3_wire::{DecodeError, EncodeError, RpcMessageDecoder, RpcMessageEncoder};

fn roundtrip(message: &RpcMessage) -> RpcMessage {
    let mut encoder = RpcMessageEncoder::new();
    let bytes = encoder.encode_message(message).expect("encode rpc message").to_vec();

    let mut cursor = Cursor::new(bytes.as_slice());
    let decoded = RpcMessageDecoder::new()
        .decode_message(&mut cursor)
        .expect("decode rpc message")
        .expect("complete rpc message");
    assert_eq!(cursor.position() as usize, bytes.len());
    decoded
}

fn getattr_call(xid: u32) -> RpcCallMessage {
    RpcCallMessage {
        xid,
        prog: nfs3::PROGRAM,
        vers: nfs3::VERSION,
        proc: 1,
        cred: support::unix_cred(),
        params: vec![0, 0, 0, 4, 1, 2, 3, 4],
        ..Default::default()
    }
}

#[test]
fn test_call_layout() {
    let call = RpcCallMessage {
        xid: 0x0102_0304,
        prog: nfs3::PROGRAM,
        vers: nfs3::VERSION,
        proc: 0,
        ..Default::default()
    };
    let mut encoder = RpcMessageEncoder::new();
    let bytes = encoder.encode_call(&call).expect("encode call");

    #[rustfmt::skip]
    let expected: [u8; 40] = [
        1, 2, 3, 4,
        0, 0, 0, 0, // CALL
        0, 0, 0, 2, // rpcvers
        0, 1, 0x86, 0xa3, // 100003
        0, 0, 0, 3,
        0, 0, 0, 0, // NULL
        0, 0, 0, 0, 0, 0, 0, 0, // cred
        0, 0, 0, 0, 0, 0, 0, 0, // verf
    ];
    assert_eq!(bytes, &expected[..]);
}

#[test]
fn test_call_bijection() {
    support::init_tracing();

    let message = RpcMessage::Call(getattr_call(12345));
    assert_eq!(roundtrip(&message), message);

    let RpcMessage::Call(call) = roundtrip(&message) else {
        panic!("expected call, got {message:?}");
    };
    assert_eq!(call.cred.auth_flavor(), Some(auth_flavor::AUTH_UNIX));
    let cred = deserialize::<auth_unix>(&mut call.cred.body.as_slice()).expect("auth_unix body");
    assert_eq!(cred.machinename, b"client");
    assert_eq!(cred.gids, vec![1000, 27, 100]);
}

#[test]
fn test_unknown_auth_flavor_passes_through() {
    let mut call = getattr_call(1);
    call.cred = opaque_auth { flavor: 390_003, body: vec![1, 2, 3] };
    let message = RpcMessage::Call(call);

    let decoded = roundtrip(&message);
    assert_eq!(decoded, message);
    let RpcMessage::Call(call) = decoded else {
        panic!("expected call");
    };
    assert_eq!(call.cred.auth_flavor(), None);
}

#[test]
fn test_accepted_reply_bijection() {
    let success = RpcMessage::AcceptedReply(RpcAcceptedReplyMessage {
        xid: 9,
        verf: opaque_auth::new(auth_flavor::AUTH_SHORT, vec![0xab; 6]),
        reply_data: accept_body::SUCCESS,
        results: vec![0, 0, 0, 0],
    });
    assert_eq!(roundtrip(&success), success);

    let mismatch = RpcMessage::AcceptedReply(RpcAcceptedReplyMessage {
        xid: 10,
        reply_data: accept_body::PROG_MISMATCH(mismatch_info { low: 3, high: 3 }),
        ..Default::default()
    });
    assert_eq!(roundtrip(&mismatch), mismatch);
}

#[test]
fn test_rejected_reply_bijection() {
    let messages = [
        RpcMessage::RejectedReply(RpcRejectedReplyMessage {
            xid: 11,
            reply_data: rejected_reply::RPC_MISMATCH(mismatch_info { low: 2, high: 2 }),
        }),
        RpcMessage::RejectedReply(RpcRejectedReplyMessage {
            xid: 12,
            reply_data: rejected_reply::AUTH_ERROR(auth_stat::AUTH_TOOWEAK),
        }),
    ];
    for message in &messages {
        assert_eq!(&roundtrip(message), message);
    }
}

#[test]
fn test_reply_helpers() {
    let cases = [
        (proc_unavail_reply_message(1), accept_body::PROC_UNAVAIL),
        (prog_unavail_reply_message(2), accept_body::PROG_UNAVAIL),
        (
            prog_mismatch_reply_message(3, nfs3::VERSION),
            accept_body::PROG_MISMATCH(mismatch_info { low: 3, high: 3 }),
        ),
        (garbage_args_reply_message(4), accept_body::GARBAGE_ARGS),
        (system_err_reply_message(5), accept_body::SYSTEM_ERR),
        (make_success_reply(6), accept_body::SUCCESS),
    ];
    for (message, expected) in cases {
        match roundtrip(&message) {
            RpcMessage::AcceptedReply(reply) => {
                assert_eq!(reply.reply_data, expected);
                assert_eq!(reply.xid, message.xid());
                assert!(reply.results.is_empty());
            }
            other => panic!("expected accepted reply, got {other:?}"),
        }
    }

    match roundtrip(&rpc_vers_mismatch(7)) {
        RpcMessage::RejectedReply(reply) => assert_eq!(
            reply.reply_data,
            rejected_reply::RPC_MISMATCH(mismatch_info { low: 2, high: 2 })
        ),
        other => panic!("expected rejected reply, got {other:?}"),
    }
    match roundtrip(&auth_error_reply_message(8, auth_stat::AUTH_REJECTEDCRED)) {
        RpcMessage::RejectedReply(reply) => {
            assert_eq!(reply.reply_data, rejected_reply::AUTH_ERROR(auth_stat::AUTH_REJECTEDCRED))
        }
        other => panic!("expected rejected reply, got {other:?}"),
    }
}

#[test]
fn test_partial_message_leaves_cursor() {
    support::init_tracing();

    let mut encoder = RpcMessageEncoder::new();
    let bytes = encoder.encode_call(&getattr_call(12345)).expect("encode call").to_vec();

    let mut cursor = Cursor::new(&bytes[..20]);
    let decoder = RpcMessageDecoder::new();
    assert_eq!(decoder.decode_message(&mut cursor).expect("short buffer"), None);
    assert_eq!(cursor.position(), 0);

    // the credential body is cut
    let mut cursor = Cursor::new(&bytes[..36]);
    assert_eq!(decoder.decode_message(&mut cursor).expect("short buffer"), None);
    assert_eq!(cursor.position(), 0);

    let mut cursor = Cursor::new(bytes.as_slice());
    let decoded = decoder.decode_message(&mut cursor).expect("decode").expect("complete");
    assert_eq!(decoded.xid(), 12345);
}

#[test]
fn test_auth_body_limit_on_encode() {
    let mut call = getattr_call(1);
    call.cred = opaque_auth::new(auth_flavor::AUTH_UNIX, vec![0; 401]);

    let mut encoder = RpcMessageEncoder::new();
    match encoder.encode_call(&call) {
        Err(EncodeError::AuthBodyTooLong(401)) => {}
        other => panic!("expected AuthBodyTooLong, got {other:?}"),
    }

    call.cred = opaque_auth::new(auth_flavor::AUTH_UNIX, vec![0; 400]);
    let message = RpcMessage::Call(call);
    assert_eq!(roundtrip(&message), message);
}

#[test]
fn test_auth_body_limit_on_decode() {
    #[rustfmt::skip]
    let bytes: [u8; 32] = [
        0, 0, 0, 1,
        0, 0, 0, 0,
        0, 0, 0, 2,
        0, 1, 0x86, 0xa3,
        0, 0, 0, 3,
        0, 0, 0, 1,
        0, 0, 0, 1, // AUTH_UNIX
        0xff, 0xff, 0xff, 0xff,
    ];
    let mut cursor = Cursor::new(&bytes[..]);
    assert_eq!(
        RpcMessageDecoder::new().decode_message(&mut cursor),
        Err(DecodeError::AuthBodyTooLong(u32::MAX))
    );
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_unknown_discriminants() {
    let decoder = RpcMessageDecoder::new();

    let mut cursor = Cursor::new(&[0, 0, 0, 1, 0, 0, 0, 2][..]);
    assert_eq!(decoder.decode_message(&mut cursor), Err(DecodeError::UnknownMessageType(2)));

    let mut cursor = Cursor::new(&[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 5][..]);
    assert_eq!(decoder.decode_message(&mut cursor), Err(DecodeError::UnknownReplyStat(5)));

    #[rustfmt::skip]
    let accepted = [
        0, 0, 0, 1,
        0, 0, 0, 1, // REPLY
        0, 0, 0, 0, // MSG_ACCEPTED
        0, 0, 0, 0, 0, 0, 0, 0, // verf
        0, 0, 0, 9,
    ];
    let mut cursor = Cursor::new(&accepted[..]);
    assert_eq!(decoder.decode_message(&mut cursor), Err(DecodeError::UnknownAcceptStat(9)));

    let mut cursor = Cursor::new(&[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 7][..]);
    assert_eq!(decoder.decode_message(&mut cursor), Err(DecodeError::UnknownRejectStat(7)));
}

#[test]
fn test_results_are_rest_of_record() {
    let mut encoder = RpcMessageEncoder::new();
    let reply = RpcAcceptedReplyMessage { xid: 5, results: vec![1, 2, 3, 4, 5, 6, 7, 8], ..Default::default() };
    let bytes = encoder.encode_accepted_reply(&reply).expect("encode").to_vec();
    assert_eq!(bytes.len(), 24 + 8);

    let mut cursor = Cursor::new(bytes);
    match RpcMessageDecoder::new().decode_message(&mut cursor).expect("decode") {
        Some(RpcMessage::AcceptedReply(decoded)) => assert_eq!(decoded, reply),
        other => panic!("expected accepted reply, got {other:?}"),
    }
}

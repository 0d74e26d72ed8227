// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn encode_returns_json_without_a_length_prefix() {
    let response = Response::Saved;
    let encoded = encode(&response).expect("encode failed");
    let json_str = std::str::from_utf8(&encoded).expect("utf8");
    assert!(json_str.starts_with('{'));
}

#[tokio::test]
async fn write_then_read_message_roundtrips() {
    let original = b"hello submap";
    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.expect("write");
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read");
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_prefixes_with_a_big_endian_length() {
    let data = b"submap-notification";
    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_rejects_a_length_prefix_over_the_cap() {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&((MAX_PAYLOAD_BYTES + 1) as u32).to_be_bytes());
    let mut cursor = std::io::Cursor::new(buffer);
    let err = read_message(&mut cursor).await.expect_err("oversized");
    assert!(matches!(err, ProtocolError::PayloadTooLarge(_, _)));
}

#[test]
fn request_roundtrips_through_json() {
    let request = Request::SubmitSubmap { robot_name: "r1".to_string(), path: "/data/s1.json".to_string() };
    let encoded = encode(&request).expect("encode");
    let decoded: Request = decode(&encoded).expect("decode");
    match decoded {
        Request::SubmitSubmap { robot_name, path } => {
            assert_eq!(robot_name, "r1");
            assert_eq!(path, "/data/s1.json");
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[tokio::test]
async fn write_response_then_read_request_style_roundtrip_via_read_message() {
    let response = Response::RobotMissionsDeleted { count: 3 };
    let mut buffer = Vec::new();
    write_response(&mut buffer, &response).await.expect("write");

    let mut cursor = std::io::Cursor::new(buffer);
    let payload = read_message(&mut cursor).await.expect("read");
    let decoded: Response = decode(&payload).expect("decode");
    match decoded {
        Response::RobotMissionsDeleted { count } => assert_eq!(count, 3),
        other => panic!("unexpected variant: {other:?}"),
    }
}

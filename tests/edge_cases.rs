#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests: unknown fields, truncated and malformed input, values that
//! do not fit their declared types, and resource limits

use message_codec::core::wire::WireKind;
use message_codec::messages::{
    ChannelNonce, CommitmentInfo, Failure, HtlcInfo, NodeId, Ping,
    SignLocalCommitmentTxPhase2Request,
};
use message_codec::protocol::descriptor::{Cardinality, FieldDescriptor, FieldType, ScalarKind};
use message_codec::{
    decode, encode, Codec, DecodeError, EncodeError, FieldValue, MessageDescriptor,
    MessageInstance, MessageType, ProtocolError, Value,
};

message_codec::message! {
    struct Tree {
        1 => child: optional Box<Tree>,
        2 => leaf: optional u32,
    }
}

fn deep_tree(levels: usize) -> Tree {
    let mut tree = Tree {
        child: None,
        leaf: Some(1),
    };
    for _ in 0..levels {
        tree = Tree {
            child: Some(Box::new(tree)),
            leaf: None,
        };
    }
    tree
}

// ============================================================================
// UNKNOWN FIELDS
// ============================================================================

#[test]
fn test_unknown_fields_of_every_kind_are_skipped() {
    let known = encode(&Failure {
        code: None,
        message: Some("ok".to_string()),
    })
    .unwrap();

    let unknowns: [&[u8]; 4] = [
        // field 15, varint (max length)
        &[0x78, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        // field 15, fixed64
        &[0x79, 1, 2, 3, 4, 5, 6, 7, 8],
        // field 15, length-delimited
        &[0x7a, 0x03, 0xde, 0xad, 0x00],
        // field 15, fixed32
        &[0x7d, 1, 2, 3, 4],
    ];

    for unknown in unknowns {
        for position in [0usize, 1] {
            let mut bytes = Vec::new();
            if position == 0 {
                bytes.extend_from_slice(unknown);
                bytes.extend_from_slice(&known);
            } else {
                bytes.extend_from_slice(&known);
                bytes.extend_from_slice(unknown);
            }
            let failure = decode::<Failure>(&bytes).expect("unknown field must be skipped");
            assert_eq!(failure.message.as_deref(), Some("ok"));
            assert_eq!(failure.code, None);
        }
    }
}

#[test]
fn test_unknown_field_with_large_number() {
    // field 536870911 (the maximum), varint
    let bytes = [0xf8, 0xff, 0xff, 0xff, 0x0f, 0x01];
    assert_eq!(decode::<Ping>(&bytes).unwrap(), Ping::default());
}

#[test]
fn test_truncated_unknown_field_fails() {
    assert!(matches!(
        decode::<Ping>(&[0x79, 1, 2, 3]),
        Err(DecodeError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        decode::<Ping>(&[0x7a, 0x05, 0x00]),
        Err(DecodeError::LengthOutOfBounds { .. })
    ));
}

#[test]
fn test_group_wire_kinds_rejected() {
    for kind in [3u8, 4, 6, 7] {
        let bytes = [(15 << 3) | kind, 0x00];
        assert!(
            matches!(
                decode::<Ping>(&bytes),
                Err(DecodeError::UnsupportedWireKind { kind: k, offset: 0 }) if k == kind
            ),
            "wire kind {kind} should be rejected"
        );
    }
}

// ============================================================================
// TRUNCATION
// ============================================================================

#[test]
fn test_truncation_inside_any_field_fails() {
    let request = SignLocalCommitmentTxPhase2Request {
        node_id: Some(NodeId {
            node_id: Some(vec![0x03; 33]),
        }),
        channel_nonce: Some(ChannelNonce {
            data: Some(vec![0x11; 8]),
        }),
        commitment_info: Some(CommitmentInfo {
            feerate_per_kw: Some(300),
            offered_htlcs: vec![HtlcInfo {
                value_sat: Some(1_000),
                payment_hash: Some(vec![0x22; 32]),
                cltv_expiry: Some(144),
            }],
            ..Default::default()
        }),
    };
    let bytes = encode(&request).unwrap();

    // Top-level field boundaries: every other prefix cuts a field
    let mut boundaries = vec![0usize];
    let mut pos = 0usize;
    while pos < bytes.len() {
        let len = bytes[pos + 1] as usize;
        pos += 2 + len;
        boundaries.push(pos);
    }
    assert_eq!(*boundaries.last().unwrap(), bytes.len());

    for cut in 0..bytes.len() {
        let result = decode::<SignLocalCommitmentTxPhase2Request>(&bytes[..cut]);
        if boundaries.contains(&cut) {
            assert!(result.is_ok(), "prefix of {cut} bytes ends on a field boundary");
        } else {
            assert!(result.is_err(), "prefix of {cut} bytes should fail");
        }
    }
}

#[test]
fn test_truncated_tag_fails() {
    // a tag varint with the continuation bit set and nothing after it
    assert_eq!(
        decode::<Ping>(&[0x0a, 0x00, 0x80]),
        Err(DecodeError::UnexpectedEof { offset: 3 })
    );
}

#[test]
fn test_truncated_fixed_values() {
    message_codec::message! {
        struct Fixed {
            1 => a: optional message_codec::protocol::Fixed32,
            2 => b: optional message_codec::protocol::Fixed64,
        }
    }
    assert!(decode::<Fixed>(&[0x0d, 1, 2, 3]).is_err());
    assert!(decode::<Fixed>(&[0x11, 1, 2, 3, 4, 5, 6, 7]).is_err());
    assert!(decode::<Fixed>(&[0x0d, 1, 2, 3, 4]).is_ok());
}

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[test]
fn test_field_number_zero_rejected() {
    assert!(matches!(
        decode::<Ping>(&[0x02, 0x00]),
        Err(DecodeError::InvalidFieldNumber { number: 0, offset: 0 })
    ));
}

#[test]
fn test_overlong_varint_rejected() {
    let mut bytes = vec![0x08];
    bytes.extend_from_slice(&[0x80; 10]);
    bytes.push(0x01);
    assert!(matches!(
        decode::<CommitmentInfo>(&bytes),
        Err(DecodeError::VarintOverflow { offset: 1 })
    ));
}

#[test]
fn test_wire_kind_mismatch() {
    // Ping.message is a string but arrives as a varint
    assert_eq!(
        decode::<Ping>(&[0x08, 0x01]),
        Err(DecodeError::WireKindMismatch {
            field: "message",
            expected: WireKind::LengthDelimited,
            actual: WireKind::Varint,
        })
    );
}

#[test]
fn test_invalid_utf8() {
    assert_eq!(
        decode::<Ping>(&[0x0a, 0x02, 0xc3, 0x28]),
        Err(DecodeError::InvalidUtf8 { field: "message" })
    );
}

#[test]
fn test_uint32_out_of_range_on_decode() {
    // 2^32 as a varint
    let bytes = [0x08, 0x80, 0x80, 0x80, 0x80, 0x10];
    assert!(matches!(
        decode::<CommitmentInfo>(&bytes),
        Err(DecodeError::ValueOutOfRange { field: "feerate_per_kw", .. })
    ));
}

#[test]
fn test_unknown_enum_number_rejected() {
    assert!(matches!(
        decode::<Failure>(&[0x08, 0x2a]),
        Err(DecodeError::InvalidEnumValue { field: "code", value: 42, .. })
    ));
}

#[test]
fn test_bool_accepts_any_nonzero() {
    let ping = decode::<Ping>(&[0x10, 0x05]).unwrap();
    assert_eq!(ping.button_protection, Some(true));
}

#[test]
fn test_errors_carry_absolute_offsets() {
    // commitment_info (field 4) containing a truncated uint32
    let bytes = [0x22, 0x02, 0x08, 0x80];
    assert_eq!(
        decode::<SignLocalCommitmentTxPhase2Request>(&bytes),
        Err(DecodeError::UnexpectedEof { offset: 4 })
    );
}

// ============================================================================
// ENCODE VALIDATION
// ============================================================================

#[test]
fn test_encode_type_mismatch() {
    let mut ping = MessageInstance::new(Ping::descriptor());
    ping.set("message", 5u32).unwrap();
    assert!(matches!(
        ping.encode(),
        Err(EncodeError::TypeMismatch { field: "message", .. })
    ));
}

#[test]
fn test_encode_cardinality_mismatch() {
    let mut info = MessageInstance::new(CommitmentInfo::descriptor());
    info.set_field("feerate_per_kw", FieldValue::Repeated(vec![Value::UInt(1)]))
        .unwrap();
    assert!(matches!(
        info.encode(),
        Err(EncodeError::CardinalityMismatch { field: "feerate_per_kw", .. })
    ));

    let mut info = MessageInstance::new(CommitmentInfo::descriptor());
    info.set("offered_htlcs", HtlcInfo::default().to_instance())
        .unwrap();
    assert!(matches!(
        info.encode(),
        Err(EncodeError::CardinalityMismatch { field: "offered_htlcs", .. })
    ));
}

#[test]
fn test_encode_out_of_range() {
    let mut info = MessageInstance::new(CommitmentInfo::descriptor());
    info.set("feerate_per_kw", u64::from(u32::MAX) + 1).unwrap();
    assert!(matches!(
        info.encode(),
        Err(EncodeError::ValueOutOfRange { field: "feerate_per_kw", .. })
    ));
}

#[test]
fn test_encode_wrong_nested_type() {
    let mut request = MessageInstance::new(SignLocalCommitmentTxPhase2Request::descriptor());
    request
        .set("node_id", ChannelNonce::default().to_instance())
        .unwrap();
    assert_eq!(
        request.encode(),
        Err(EncodeError::MessageMismatch {
            field: "node_id",
            expected: "NodeId",
            actual: "ChannelNonce",
        })
    );
}

#[test]
fn test_encode_invalid_enum() {
    let mut failure = MessageInstance::new(Failure::descriptor());
    failure.set("code", Value::Enum(0)).unwrap();
    assert!(matches!(
        failure.encode(),
        Err(EncodeError::InvalidEnumValue { value: 0, .. })
    ));
}

#[test]
fn test_assignment_to_undeclared_field() {
    let mut ping = MessageInstance::new(Ping::descriptor());
    assert!(matches!(
        ping.set("pong", true),
        Err(ProtocolError::UnknownField { message: "Ping", .. })
    ));
}

#[test]
fn test_handwritten_descriptor() {
    static RAW: MessageDescriptor = MessageDescriptor {
        name: "Raw",
        wire_type: None,
        fields: &[FieldDescriptor {
            number: 3,
            name: "counter",
            field_type: FieldType::Scalar(ScalarKind::SInt32),
            cardinality: Cardinality::Single,
        }],
    };
    let mut raw = MessageInstance::new(&RAW);
    raw.set("counter", -3i32).unwrap();
    let bytes = Codec::default().encode_instance(&raw).unwrap();
    assert_eq!(bytes, vec![0x18, 0x05]);
    assert_eq!(Codec::default().decode_instance(&RAW, &bytes).unwrap(), raw);
}

// ============================================================================
// RESOURCE LIMITS
// ============================================================================

#[test]
fn test_depth_limit() {
    let codec = Codec::new(1024 * 1024, 4);
    assert!(codec.encode(&deep_tree(4)).is_ok());
    assert_eq!(
        codec.encode(&deep_tree(5)),
        Err(EncodeError::RecursionLimit { max_depth: 4 })
    );

    let bytes = Codec::default().encode(&deep_tree(5)).unwrap();
    assert_eq!(
        codec.decode::<Tree>(&bytes),
        Err(DecodeError::RecursionLimit { max_depth: 4 })
    );
    assert_eq!(Codec::default().decode::<Tree>(&bytes).unwrap(), deep_tree(5));
}

#[test]
fn test_hostile_nesting_is_bounded() {
    // 2_000 levels of field 1 wrapping the previous level
    let mut bytes: Vec<u8> = Vec::new();
    for _ in 0..2_000 {
        let mut outer = vec![0x0a];
        let mut len = bytes.len() as u64;
        loop {
            let byte = (len & 0x7f) as u8;
            len >>= 7;
            if len == 0 {
                outer.push(byte);
                break;
            }
            outer.push(byte | 0x80);
        }
        outer.extend_from_slice(&bytes);
        bytes = outer;
    }
    assert!(matches!(
        decode::<Tree>(&bytes),
        Err(DecodeError::RecursionLimit { .. })
    ));
}

#[test]
fn test_size_limit() {
    let codec = Codec::new(16, 8);
    let ping = Ping {
        message: Some("x".repeat(32)),
        ..Default::default()
    };
    assert!(matches!(
        codec.encode(&ping),
        Err(EncodeError::MessageTooLarge { max: 16, .. })
    ));
    let bytes = encode(&ping).unwrap();
    assert!(matches!(
        codec.decode::<Ping>(&bytes),
        Err(DecodeError::MessageTooLarge { size: 34, max: 16 })
    ));
}

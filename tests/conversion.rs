//! Integration tests for the human-readable and JSON views of messages

#![allow(clippy::expect_used, clippy::unwrap_used)]

use message_codec::messages::{
    ChannelNonce, CommitmentInfo, HtlcInfo, NodeId, Ping, SignLocalCommitmentTxPhase2Request,
};
use message_codec::protocol::format::format_message;
use message_codec::protocol::json::{from_json, message_from_json, message_to_json, to_json};
use message_codec::{decode, encode, MessageType, ProtocolError};
use serde_json::json;

fn request() -> SignLocalCommitmentTxPhase2Request {
    SignLocalCommitmentTxPhase2Request {
        node_id: Some(NodeId {
            node_id: Some(vec![0x02, 0xff]),
        }),
        channel_nonce: Some(ChannelNonce {
            data: Some(b"n".to_vec()),
        }),
        commitment_info: Some(CommitmentInfo {
            feerate_per_kw: Some(253),
            offered_htlcs: vec![
                HtlcInfo {
                    value_sat: Some(1),
                    ..Default::default()
                },
                HtlcInfo {
                    cltv_expiry: Some(2),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }),
    }
}

#[test]
fn test_format_nested_request() {
    let expected = "\
SignLocalCommitmentTxPhase2Request {
    node_id: NodeId {
        node_id: 2 bytes 02ff
    }
    channel_nonce: ChannelNonce {
        data: 1 bytes 6e
    }
    commitment_info: CommitmentInfo {
        feerate_per_kw: 253
        offered_htlcs: [
            HtlcInfo {
                value_sat: 1
            }
            HtlcInfo {
                cltv_expiry: 2
            }
        ]
    }
}";
    assert_eq!(format_message(&request().to_instance()), expected);
}

#[test]
fn test_json_shape() {
    let json = message_to_json(&request());
    assert_eq!(
        json,
        json!({
            "node_id": { "node_id": "02ff" },
            "channel_nonce": { "data": "6e" },
            "commitment_info": {
                "feerate_per_kw": 253,
                "offered_htlcs": [
                    { "value_sat": 1 },
                    { "cltv_expiry": 2 }
                ]
            }
        })
    );
}

#[test]
fn test_json_and_wire_agree() {
    let json = json!({
        "commitment_info": {
            "to_local_value_sat": 5000,
            "received_htlcs": [{ "payment_hash": "00ff" }]
        },
        "channel_nonce": null
    });
    let instance = from_json(SignLocalCommitmentTxPhase2Request::descriptor(), &json).unwrap();
    let bytes = instance.encode().unwrap();
    let typed = decode::<SignLocalCommitmentTxPhase2Request>(&bytes).unwrap();

    let info = typed.commitment_info.as_ref().unwrap();
    assert_eq!(info.to_local_value_sat, Some(5000));
    assert_eq!(info.received_htlcs[0].payment_hash, Some(vec![0x00, 0xff]));
    assert!(typed.channel_nonce.is_none());

    assert_eq!(to_json(&instance), message_to_json(&typed));
}

#[test]
fn test_json_roundtrip_through_text() {
    let original = request();
    let text = serde_json::to_string(&message_to_json(&original)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let back: SignLocalCommitmentTxPhase2Request = message_from_json(&value).unwrap();
    assert_eq!(back, original);
    assert_eq!(encode(&back).unwrap(), encode(&original).unwrap());
}

#[test]
fn test_json_nested_unknown_key_rejected() {
    let json = json!({ "node_id": { "pubkey": "00" } });
    assert!(matches!(
        from_json(SignLocalCommitmentTxPhase2Request::descriptor(), &json),
        Err(ProtocolError::UnknownField { message: "NodeId", .. })
    ));
}

#[test]
fn test_json_keys_follow_declaration_order() {
    let ping = Ping {
        message: Some("m".into()),
        button_protection: Some(true),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_string(&message_to_json(&ping)).unwrap(),
        r#"{"message":"m","button_protection":true}"#
    );

    let text = serde_json::to_string(&message_to_json(&request())).unwrap();
    let node = text.find("\"node_id\"").unwrap();
    let nonce = text.find("\"channel_nonce\"").unwrap();
    let info = text.find("\"commitment_info\"").unwrap();
    assert!(node < nonce && nonce < info);
}

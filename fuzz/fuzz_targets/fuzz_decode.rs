#![no_main]

use libfuzzer_sys::fuzz_target;
use message_codec::messages::{AnyMessage, SignLocalCommitmentTxPhase2Request};

fuzz_target!(|data: &[u8]| {
    // First two bytes select the wire type, the rest is the payload
    if data.len() < 2 {
        return;
    }
    let wire_type = u16::from_be_bytes([data[0], data[1]]);
    let payload = &data[2..];

    if let Ok(message) = AnyMessage::decode(wire_type, payload) {
        // Anything that decodes must re-encode and decode to the same value
        let (wire_type, bytes) = message.encode().expect("decoded message must encode");
        let again = AnyMessage::decode(wire_type, &bytes).expect("re-encoded message must decode");
        assert_eq!(again, message);
    }
    let _ = message_codec::decode::<SignLocalCommitmentTxPhase2Request>(payload);
});

#![allow(clippy::unwrap_used)]

use message_codec::messages::{AnyMessage, CommitmentInfo, HtlcInfo, Ping};
use message_codec::utils::metrics::global_metrics;
use message_codec::{decode, encode, Codec};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_encode_decode_heavy() {
    let iterations = 5_000usize;
    let htlc_counts = [0usize, 1, 4, 16, 64];
    let codec = Arc::new(Codec::default());

    let handles: Vec<_> = htlc_counts
        .iter()
        .map(|&count| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for i in 0..iterations {
                    let info = CommitmentInfo {
                        feerate_per_kw: Some(i as u32),
                        offered_htlcs: (0..count)
                            .map(|n| HtlcInfo {
                                value_sat: Some((n + i) as u64),
                                ..Default::default()
                            })
                            .collect(),
                        ..Default::default()
                    };
                    let bytes = codec.encode(&info).unwrap();
                    let decoded: CommitmentInfo = codec.decode(&bytes).unwrap();
                    assert_eq!(decoded, info);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_registry_dispatch() {
    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..1_000 {
                    let ping = Ping {
                        message: Some(format!("{t}-{i}")),
                        ..Default::default()
                    };
                    let (wire_type, bytes) = AnyMessage::from(ping.clone()).encode().unwrap();
                    assert_eq!(
                        AnyMessage::decode(wire_type, &bytes).unwrap(),
                        AnyMessage::Ping(ping)
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn metrics_count_across_threads() {
    let before = global_metrics().snapshot();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..250 {
                    let bytes = encode(&Ping::default()).unwrap();
                    decode::<Ping>(&bytes).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let after = global_metrics().snapshot();
    assert!(after.messages_encoded >= before.messages_encoded + 1_000);
    assert!(after.messages_decoded >= before.messages_decoded + 1_000);
}

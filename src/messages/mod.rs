//! # Message Definitions
//!
//! Concrete message types exchanged with the device. Each definition is pure
//! data: a field table plus, for top-level messages, a transport wire type.
//! All behavior comes from the generic codec.

use crate::{message, message_registry, proto_enum};

proto_enum! {
    /// Reason carried by a [`Failure`] response.
    pub enum FailureType {
        UnexpectedMessage = 1,
        ButtonExpected = 2,
        DataError = 3,
        ActionCancelled = 4,
        PinExpected = 5,
        PinCancelled = 6,
        PinInvalid = 7,
        InvalidSignature = 8,
        ProcessError = 9,
        NotEnoughFunds = 10,
        NotInitialized = 11,
        PinMismatch = 12,
        WipeCodeMismatch = 13,
        InvalidSession = 14,
        FirmwareError = 99,
    }
}

message! {
    /// Start or resume a session.
    pub struct Initialize = 0 {
        1 => session_id: optional Vec<u8>,
    }
}

message! {
    /// Liveness check; the device echoes `message` back in a [`Success`].
    pub struct Ping = 1 {
        1 => message: optional String,
        2 => button_protection: optional bool,
        3 => pin_protection: optional bool,
        4 => passphrase_protection: optional bool,
    }
}

message! {
    pub struct Success = 2 {
        1 => message: optional String,
    }
}

message! {
    pub struct Failure = 3 {
        1 => code: optional FailureType,
        2 => message: optional String,
    }
}

message! {
    /// Public key identifying a lightning node.
    pub struct NodeId {
        1 => node_id: optional Vec<u8>,
    }
}

message! {
    /// Per-channel nonce the device derives channel keys from.
    pub struct ChannelNonce {
        1 => data: optional Vec<u8>,
    }
}

message! {
    pub struct HtlcInfo {
        1 => value_sat: optional u64,
        2 => payment_hash: optional Vec<u8>,
        3 => cltv_expiry: optional u32,
    }
}

message! {
    /// Parameters of a commitment transaction the device is asked to sign.
    pub struct CommitmentInfo {
        1 => feerate_per_kw: optional u32,
        2 => to_local_value_sat: optional u64,
        3 => to_remote_value_sat: optional u64,
        4 => offered_htlcs: repeated HtlcInfo,
        5 => received_htlcs: repeated HtlcInfo,
        6 => commitment_number: optional u64,
    }
}

message! {
    pub struct SignLocalCommitmentTxPhase2Request = 865 {
        1 => node_id: optional NodeId,
        2 => channel_nonce: optional ChannelNonce,
        4 => commitment_info: optional CommitmentInfo,
    }
}

message! {
    pub struct SignLocalCommitmentTxPhase2Reply = 866 {
        1 => signature: optional Vec<u8>,
        2 => htlc_signatures: repeated Vec<u8>,
    }
}

message_registry! {
    /// Every top-level message this crate knows how to decode.
    pub enum AnyMessage {
        Initialize,
        Ping,
        Success,
        Failure,
        SignLocalCommitmentTxPhase2Request,
        SignLocalCommitmentTxPhase2Reply,
    }
}

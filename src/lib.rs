//! # Message Codec
//!
//! Protobuf-compatible message framework for talking to hardware wallets.
//!
//! Every message type is a static field table (number, name, type,
//! cardinality) plus, for top-level messages, a transport wire type. One
//! generic encoder and one generic decoder walk those tables; the message
//! definitions themselves carry no code.
//!
//! ## Quick Start
//! ```rust
//! use message_codec::messages::{Failure, FailureType};
//! use message_codec::{decode, encode};
//!
//! let failure = Failure {
//!     code: Some(FailureType::ActionCancelled),
//!     message: Some("Cancelled".to_string()),
//! };
//! let bytes = encode(&failure).unwrap();
//! assert_eq!(&bytes[..2], &[0x08, 0x04]);
//! assert_eq!(decode::<Failure>(&bytes).unwrap(), failure);
//! ```
//!
//! ## Dynamic Instances
//! ```rust
//! use message_codec::messages::Ping;
//! use message_codec::{Codec, MessageInstance, MessageType};
//!
//! let mut ping = MessageInstance::new(Ping::descriptor());
//! ping.set("message", "hello").unwrap();
//! let bytes = Codec::default().encode_instance(&ping).unwrap();
//! let back = Codec::default().decode_instance(Ping::descriptor(), &bytes).unwrap();
//! assert_eq!(back, ping);
//! ```
//!
//! ## Modules
//! - [`core`]: varints, wire kinds, the generic encoder/decoder and [`Codec`]
//! - [`protocol`]: descriptors, dynamic values, the message contract and macros
//! - [`messages`]: concrete message definitions and the [`AnyMessage`](messages::AnyMessage) registry
//! - [`config`]: limits and logging configuration
//! - [`utils`]: logging setup and metrics

pub mod config;
pub mod core;
pub mod error;
pub mod messages;
pub mod protocol;
pub mod utils;

pub use crate::config::CodecConfig;
pub use crate::core::codec::{decode, encode, Codec};
pub use crate::error::{DecodeError, EncodeError, ProtocolError, Result};
pub use crate::protocol::{
    FieldValue, MessageDescriptor, MessageInstance, MessageType, ProtoValue, Value, WireMessage,
};

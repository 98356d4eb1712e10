//! # Codec
//!
//! [`Codec`] is the entry point to the encoder and decoder. It applies the
//! configured size and depth limits, records metrics and logs outcomes.
//!
//! ## Usage
//! ```rust
//! use message_codec::core::codec::Codec;
//! use message_codec::messages::Ping;
//!
//! let codec = Codec::default();
//! let ping = Ping { message: Some("hello".to_string()), ..Default::default() };
//! let bytes = codec.encode(&ping).expect("encode");
//! let back: Ping = codec.decode(&bytes).expect("decode");
//! assert_eq!(ping, back);
//! ```

use crate::config::{CodecConfig, LimitsConfig};
use crate::core::decoder::Decoder;
use crate::core::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::protocol::descriptor::MessageDescriptor;
use crate::protocol::instance::MessageInstance;
use crate::protocol::message::MessageType;
use crate::utils::metrics::global_metrics;
use bytes::{Bytes, BytesMut};
use tracing::debug;

/// Encoder/decoder pair with resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    max_message_size: usize,
    max_depth: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl Codec {
    pub fn new(max_message_size: usize, max_depth: usize) -> Self {
        Self {
            max_message_size,
            max_depth,
        }
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(limits.max_message_size, limits.max_depth)
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::from_limits(&config.limits)
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Serialize a dynamic instance.
    pub fn encode_instance(&self, instance: &MessageInstance) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(instance, &mut out)?;
        Ok(out)
    }

    /// Serialize a dynamic instance into a shareable buffer for the transport layer.
    pub fn encode_bytes(&self, instance: &MessageInstance) -> Result<Bytes, EncodeError> {
        let mut out = BytesMut::new();
        self.encode_into(instance, &mut out)?;
        Ok(out.freeze())
    }

    fn encode_into<B>(&self, instance: &MessageInstance, out: &mut B) -> Result<(), EncodeError>
    where
        B: bytes::BufMut + AsRef<[u8]>,
    {
        let start = out.as_ref().len();
        let result = Encoder::new(self.max_depth)
            .encode(instance, out)
            .and_then(|()| {
                let size = out.as_ref().len() - start;
                if size > self.max_message_size {
                    Err(EncodeError::MessageTooLarge {
                        size,
                        max: self.max_message_size,
                    })
                } else {
                    Ok(size)
                }
            });

        match result {
            Ok(size) => {
                global_metrics().message_encoded(size as u64);
                debug!(message = instance.type_name(), bytes = size, "Encoded message");
                Ok(())
            }
            Err(e) => {
                global_metrics().encode_error();
                debug!(message = instance.type_name(), error = %e, "Encode failed");
                Err(e)
            }
        }
    }

    /// Parse bytes into a dynamic instance of `descriptor`.
    pub fn decode_instance(
        &self,
        descriptor: &'static MessageDescriptor,
        input: &[u8],
    ) -> Result<MessageInstance, DecodeError> {
        let result = if input.len() > self.max_message_size {
            Err(DecodeError::MessageTooLarge {
                size: input.len(),
                max: self.max_message_size,
            })
        } else {
            Decoder::new(self.max_depth).decode(descriptor, input)
        };

        match result {
            Ok(instance) => {
                global_metrics().message_decoded(input.len() as u64);
                debug!(message = descriptor.name, bytes = input.len(), "Decoded message");
                Ok(instance)
            }
            Err(e) => {
                global_metrics().decode_error();
                debug!(message = descriptor.name, error = %e, "Decode failed");
                Err(e)
            }
        }
    }

    /// Serialize a typed message.
    pub fn encode<M: MessageType>(&self, message: &M) -> Result<Vec<u8>, EncodeError> {
        self.encode_instance(&message.to_instance())
    }

    /// Parse bytes into a typed message.
    pub fn decode<M: MessageType>(&self, input: &[u8]) -> Result<M, DecodeError> {
        let instance = self.decode_instance(M::descriptor(), input)?;
        M::from_instance(instance)
    }
}

/// Serialize a typed message with default limits.
pub fn encode<M: MessageType>(message: &M) -> Result<Vec<u8>, EncodeError> {
    Codec::default().encode(message)
}

/// Parse a typed message with default limits.
pub fn decode<M: MessageType>(input: &[u8]) -> Result<M, DecodeError> {
    Codec::default().decode(input)
}

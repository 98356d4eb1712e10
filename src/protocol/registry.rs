//! # Message Registry
//!
//! [`message_registry!`](crate::message_registry) declares a closed sum type
//! over a set of top-level message types. The generated enum routes frames by
//! their transport wire type: known types decode into their typed variant,
//! anything else is kept verbatim in an `Unknown` variant so it can be
//! forwarded or logged without loss.
//!
//! ```rust
//! use message_codec::messages::{AnyMessage, Ping};
//!
//! let ping = AnyMessage::from(Ping { message: Some("hi".into()), ..Default::default() });
//! let (wire_type, bytes) = ping.encode().unwrap();
//! assert_eq!(wire_type, 1);
//! assert_eq!(AnyMessage::decode(wire_type, &bytes).unwrap(), ping);
//!
//! let raw = AnyMessage::decode(60000, &[0x08, 0x01]).unwrap();
//! assert!(matches!(raw, AnyMessage::Unknown { wire_type: 60000, .. }));
//! ```

/// Declare a registry enum over top-level message types.
#[macro_export]
macro_rules! message_registry {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $msg:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $msg($msg), )*
            /// Frame whose wire type is not registered
            Unknown {
                wire_type: u16,
                payload: ::std::vec::Vec<u8>,
            },
        }

        impl $name {
            /// Wire types of every registered message, in declaration order.
            pub fn wire_types() -> &'static [u16] {
                const WIRE_TYPES: &[u16] = &[
                    $( <$msg as $crate::protocol::message::WireMessage>::WIRE_TYPE, )*
                ];
                WIRE_TYPES
            }

            pub fn is_registered(wire_type: u16) -> bool {
                Self::wire_types().contains(&wire_type)
            }

            pub fn descriptor_for(
                wire_type: u16,
            ) -> ::std::option::Option<&'static $crate::protocol::descriptor::MessageDescriptor> {
                $(
                    if wire_type == <$msg as $crate::protocol::message::WireMessage>::WIRE_TYPE {
                        return ::std::option::Option::Some(
                            <$msg as $crate::protocol::message::MessageType>::descriptor(),
                        );
                    }
                )*
                ::std::option::Option::None
            }

            /// Problems with the registry itself: duplicate wire types and
            /// invalid descriptor tables. Empty means valid.
            pub fn validate() -> ::std::vec::Vec<::std::string::String> {
                let mut errors = ::std::vec::Vec::new();
                let wire_types = Self::wire_types();
                for (i, wire_type) in wire_types.iter().enumerate() {
                    if wire_types[i + 1..].contains(wire_type) {
                        errors.push(format!("wire type {} registered more than once", wire_type));
                    }
                }
                $(
                    errors.extend(
                        <$msg as $crate::protocol::message::MessageType>::descriptor().validate(),
                    );
                )*
                errors
            }

            pub fn wire_type(&self) -> u16 {
                match self {
                    $( Self::$msg(_) => <$msg as $crate::protocol::message::WireMessage>::WIRE_TYPE, )*
                    Self::Unknown { wire_type, .. } => *wire_type,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$msg(_) => stringify!($msg), )*
                    Self::Unknown { .. } => "Unknown",
                }
            }

            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown { .. })
            }

            /// Decode a frame payload with default limits.
            pub fn decode(
                wire_type: u16,
                payload: &[u8],
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                Self::decode_with(&$crate::core::codec::Codec::default(), wire_type, payload)
            }

            pub fn decode_with(
                codec: &$crate::core::codec::Codec,
                wire_type: u16,
                payload: &[u8],
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                $(
                    if wire_type == <$msg as $crate::protocol::message::WireMessage>::WIRE_TYPE {
                        return codec.decode::<$msg>(payload).map(Self::$msg);
                    }
                )*
                ::std::result::Result::Ok(Self::Unknown {
                    wire_type,
                    payload: payload.to_vec(),
                })
            }

            /// Encode with default limits, returning `(wire_type, payload)`.
            pub fn encode(
                &self,
            ) -> ::std::result::Result<(u16, ::std::vec::Vec<u8>), $crate::error::EncodeError> {
                self.encode_with(&$crate::core::codec::Codec::default())
            }

            pub fn encode_with(
                &self,
                codec: &$crate::core::codec::Codec,
            ) -> ::std::result::Result<(u16, ::std::vec::Vec<u8>), $crate::error::EncodeError> {
                let payload = match self {
                    $( Self::$msg(message) => codec.encode(message)?, )*
                    Self::Unknown { payload, .. } => payload.clone(),
                };
                ::std::result::Result::Ok((self.wire_type(), payload))
            }

            /// Dynamic view of a known message; `None` for `Unknown`.
            pub fn to_instance(
                &self,
            ) -> ::std::option::Option<$crate::protocol::instance::MessageInstance> {
                match self {
                    $(
                        Self::$msg(message) => ::std::option::Option::Some(
                            $crate::protocol::message::MessageType::to_instance(message),
                        ),
                    )*
                    Self::Unknown { .. } => ::std::option::Option::None,
                }
            }
        }

        $(
            impl ::std::convert::From<$msg> for $name {
                fn from(message: $msg) -> Self {
                    Self::$msg(message)
                }
            }
        )*
    };
}

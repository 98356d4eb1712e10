//! Declaration macros for message and enum types.
//!
//! [`message!`](crate::message) turns a field list into a struct with one
//! `Option<T>` (or `Vec<T>` for repeated fields) per field, a static
//! descriptor table and the [`MessageType`](crate::protocol::message::MessageType)
//! conversions. A `= N` after the struct name makes it a top-level message with
//! wire type `N`.
//!
//! ```rust
//! message_codec::proto_enum! {
//!     pub enum Coin {
//!         Bitcoin = 0,
//!         Testnet = 1,
//!     }
//! }
//!
//! message_codec::message! {
//!     pub struct GetAddress = 29 {
//!         1 => address_n: repeated u32,
//!         2 => coin: optional Coin,
//!         3 => show_display: optional bool,
//!     }
//! }
//!
//! use message_codec::protocol::message::{MessageType, WireMessage};
//!
//! let request = GetAddress {
//!     address_n: vec![44 | 0x8000_0000, 0x8000_0000],
//!     coin: Some(Coin::Testnet),
//!     ..Default::default()
//! };
//! assert_eq!(GetAddress::WIRE_TYPE, 29);
//! let bytes = request.encode().unwrap();
//! assert_eq!(GetAddress::decode(&bytes).unwrap(), request);
//! ```

/// Declare a message type.
#[macro_export]
macro_rules! message {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(= $wire:literal)? {
            $(
                $(#[$field_meta:meta])*
                $number:literal => $field:ident : $card:ident $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::__proto_field_type!($card $ty),
            )*
        }

        impl $crate::protocol::message::MessageType for $name {
            fn descriptor() -> &'static $crate::protocol::descriptor::MessageDescriptor {
                static DESCRIPTOR: $crate::protocol::descriptor::MessageDescriptor =
                    $crate::protocol::descriptor::MessageDescriptor {
                        name: stringify!($name),
                        wire_type: $crate::__proto_wire_type!($($wire)?),
                        fields: &[
                            $(
                                $crate::protocol::descriptor::FieldDescriptor {
                                    number: $number,
                                    name: stringify!($field),
                                    field_type:
                                        <$ty as $crate::protocol::message::ProtoValue>::FIELD_TYPE,
                                    cardinality: $crate::__proto_cardinality!($card),
                                },
                            )*
                        ],
                    };
                &DESCRIPTOR
            }

            fn to_instance(&self) -> $crate::protocol::instance::MessageInstance {
                #[allow(unused_mut)]
                let mut instance = $crate::protocol::instance::MessageInstance::new(
                    <Self as $crate::protocol::message::MessageType>::descriptor(),
                );
                $( $crate::__proto_put!($card, instance, $number, &self.$field); )*
                instance
            }

            #[allow(unused_mut, unused_variables)]
            fn from_instance(
                mut instance: $crate::protocol::instance::MessageInstance,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                ::std::result::Result::Ok(Self {
                    $( $field: $crate::__proto_take!($card, instance, $number)?, )*
                })
            }
        }

        impl $crate::protocol::message::ProtoValue for $name {
            const FIELD_TYPE: $crate::protocol::descriptor::FieldType =
                $crate::protocol::descriptor::FieldType::Message(
                    <$name as $crate::protocol::message::MessageType>::descriptor,
                );

            fn to_value(&self) -> $crate::protocol::value::Value {
                $crate::protocol::value::Value::Message(
                    $crate::protocol::message::MessageType::to_instance(self),
                )
            }

            fn from_value(
                value: $crate::protocol::value::Value,
                field: &'static $crate::protocol::descriptor::FieldDescriptor,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                match value {
                    $crate::protocol::value::Value::Message(instance)
                        if ::std::ptr::eq(
                            instance.descriptor(),
                            <$name as $crate::protocol::message::MessageType>::descriptor(),
                        ) =>
                    {
                        <$name as $crate::protocol::message::MessageType>::from_instance(instance)
                    }
                    other => Err($crate::protocol::message::conversion_mismatch::<Self>(
                        &other, field,
                    )),
                }
            }
        }

        $(
            impl $crate::protocol::message::WireMessage for $name {
                const WIRE_TYPE: u16 = $wire;
            }
        )?
    };
}

/// Declare an enum type carried as a varint.
#[macro_export]
macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )*
        }

        impl $name {
            pub fn descriptor() -> &'static $crate::protocol::descriptor::EnumDescriptor {
                static DESCRIPTOR: $crate::protocol::descriptor::EnumDescriptor =
                    $crate::protocol::descriptor::EnumDescriptor {
                        name: stringify!($name),
                        values: &[ $( ($value, stringify!($variant)), )* ],
                    };
                &DESCRIPTOR
            }

            pub fn from_i32(value: i32) -> ::std::option::Option<Self> {
                match value {
                    $( $value => ::std::option::Option::Some(Self::$variant), )*
                    _ => ::std::option::Option::None,
                }
            }

            pub fn as_i32(self) -> i32 {
                self as i32
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }
        }

        impl $crate::protocol::message::ProtoValue for $name {
            const FIELD_TYPE: $crate::protocol::descriptor::FieldType =
                $crate::protocol::descriptor::FieldType::Enum($name::descriptor);

            fn to_value(&self) -> $crate::protocol::value::Value {
                $crate::protocol::value::Value::Enum(*self as i32)
            }

            fn from_value(
                value: $crate::protocol::value::Value,
                field: &'static $crate::protocol::descriptor::FieldDescriptor,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                match value {
                    $crate::protocol::value::Value::Enum(number) => Self::from_i32(number).ok_or(
                        $crate::error::DecodeError::InvalidEnumValue {
                            field: field.name,
                            enum_name: stringify!($name),
                            value: number,
                        },
                    ),
                    other => Err($crate::protocol::message::conversion_mismatch::<Self>(
                        &other, field,
                    )),
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __proto_field_type {
    (optional $ty:ty) => { ::std::option::Option<$ty> };
    (repeated $ty:ty) => { ::std::vec::Vec<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __proto_cardinality {
    (optional) => {
        $crate::protocol::descriptor::Cardinality::Single
    };
    (repeated) => {
        $crate::protocol::descriptor::Cardinality::Repeated
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __proto_wire_type {
    () => {
        ::std::option::Option::None
    };
    ($wire:literal) => {
        ::std::option::Option::Some($wire)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __proto_put {
    (optional, $instance:ident, $number:literal, $value:expr) => {
        $crate::protocol::message::put_optional(&mut $instance, $number, $value)
    };
    (repeated, $instance:ident, $number:literal, $value:expr) => {
        $crate::protocol::message::put_repeated(&mut $instance, $number, $value)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __proto_take {
    (optional, $instance:ident, $number:literal) => {
        $crate::protocol::message::take_optional(&mut $instance, $number)
    };
    (repeated, $instance:ident, $number:literal) => {
        $crate::protocol::message::take_repeated(&mut $instance, $number)
    };
}

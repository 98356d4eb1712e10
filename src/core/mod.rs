//! # Core Codec Components
//!
//! Wire-level encoding and the generic, descriptor-driven encoder and decoder.
//!
//! ## Components
//! - **Varint**: LEB128 varints and zigzag mapping for signed integers
//! - **Wire**: Tags, wire kinds and skipping of unknown fields
//! - **Encoder / Decoder**: Walk a message's field table
//! - **Codec**: Limits, metrics and logging around both directions
//!
//! ## Wire Format
//! ```text
//! [Tag varint: (field_number << 3) | wire_kind] [Value] ...
//! ```
//!
//! ## Security
//! - Maximum message size: 16MB by default, checked before decoding
//! - Maximum nesting depth: 32 by default
//! - Length prefixes are validated against the remaining input before slicing

pub mod codec;
pub(crate) mod decoder;
pub(crate) mod encoder;
pub mod varint;
pub mod wire;

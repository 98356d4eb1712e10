//! Wire kinds, tags and field skipping.
//!
//! Every encoded field starts with a tag varint holding
//! `(field_number << 3) | wire_kind`. The wire kind alone determines how many
//! bytes the value occupies, which is what makes skipping unknown fields
//! possible.

use crate::core::varint::{decode_varint, encode_varint};
use crate::error::DecodeError;
use bytes::BufMut;

/// Largest field number representable in a tag
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Value framing used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireKind {
    /// Numeric identifier placed in the low three bits of a tag
    pub fn as_u8(self) -> u8 {
        match self {
            WireKind::Varint => 0,
            WireKind::Fixed64 => 1,
            WireKind::LengthDelimited => 2,
            WireKind::Fixed32 => 5,
        }
    }

    /// Groups (3, 4) and the reserved values (6, 7) are not supported.
    pub fn from_u8(kind: u8) -> Option<Self> {
        match kind {
            0 => Some(WireKind::Varint),
            1 => Some(WireKind::Fixed64),
            2 => Some(WireKind::LengthDelimited),
            5 => Some(WireKind::Fixed32),
            _ => None,
        }
    }

    /// Whether repeated values of this kind may appear packed.
    pub fn is_packable(self) -> bool {
        !matches!(self, WireKind::LengthDelimited)
    }
}

/// A decoded field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field_number: u32,
    pub kind: WireKind,
}

impl Tag {
    pub fn new(field_number: u32, kind: WireKind) -> Self {
        Self { field_number, kind }
    }

    pub fn to_u64(self) -> u64 {
        (u64::from(self.field_number) << 3) | u64::from(self.kind.as_u8())
    }

    pub fn encode(self, out: &mut impl BufMut) {
        encode_varint(self.to_u64(), out);
    }

    /// Read a tag from the front of `input`. Returns the tag and bytes consumed.
    pub fn decode(input: &[u8], offset: usize) -> Result<(Self, usize), DecodeError> {
        let (raw, used) = decode_varint(input, offset)?;
        let kind_bits = (raw & 0x07) as u8;
        let number = raw >> 3;

        if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
            return Err(DecodeError::InvalidFieldNumber { number, offset });
        }
        let kind = WireKind::from_u8(kind_bits).ok_or(DecodeError::UnsupportedWireKind {
            kind: kind_bits,
            offset,
        })?;

        Ok((Self::new(number as u32, kind), used))
    }
}

/// Split a length-delimited payload off the front of `input`.
///
/// Returns the payload and the total number of bytes consumed including the
/// length prefix.
pub fn read_length_delimited(input: &[u8], offset: usize) -> Result<(&[u8], usize), DecodeError> {
    let (length, used) = decode_varint(input, offset)?;
    let remaining = input.len() - used;
    if length > remaining as u64 {
        return Err(DecodeError::LengthOutOfBounds {
            offset,
            length,
            remaining,
        });
    }
    let end = used + length as usize;
    Ok((&input[used..end], end))
}

/// Read `N` little-endian bytes off the front of `input`.
pub fn read_fixed<const N: usize>(input: &[u8], offset: usize) -> Result<[u8; N], DecodeError> {
    match input.get(..N) {
        Some(bytes) => {
            let mut out = [0u8; N];
            out.copy_from_slice(bytes);
            Ok(out)
        }
        None => Err(DecodeError::UnexpectedEof {
            offset: offset + input.len(),
        }),
    }
}

/// Number of bytes a value of `kind` occupies at the front of `input`.
///
/// Used to step over fields the descriptor table does not know about.
pub fn skip_value(kind: WireKind, input: &[u8], offset: usize) -> Result<usize, DecodeError> {
    match kind {
        WireKind::Varint => decode_varint(input, offset).map(|(_, used)| used),
        WireKind::Fixed64 => read_fixed::<8>(input, offset).map(|_| 8),
        WireKind::Fixed32 => read_fixed::<4>(input, offset).map(|_| 4),
        WireKind::LengthDelimited => read_length_delimited(input, offset).map(|(_, used)| used),
    }
}

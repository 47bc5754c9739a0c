use std::fmt::{Debug, Display, Formatter};

use structbuf::{Packer, Unpack};

/// Attribute type: a 16-bit Bluetooth SIG UUID or a full 128-bit UUID
/// ([Vol 3] Part B, Section 2.5.1). The two forms are never equal to each
/// other, even if the 128-bit value is the expansion of the 16-bit one. Both
/// are serialized little-endian.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum Uuid {
    Uuid16(u16),
    Uuid128(u128),
}

impl Uuid {
    /// Returns the serialized length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Uuid16(_) => 2,
            Self::Uuid128(_) => 16,
        }
    }

    /// Returns the 16-bit value of a 16-bit UUID.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> Option<u16> {
        match self {
            Self::Uuid16(v) => Some(v),
            Self::Uuid128(_) => None,
        }
    }

    /// Compares two UUIDs in a const context.
    #[inline]
    #[must_use]
    pub const fn const_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Uuid16(a), Self::Uuid16(b)) => a == b,
            (Self::Uuid128(a), Self::Uuid128(b)) => a == b,
            _ => false,
        }
    }
}

impl From<u16> for Uuid {
    #[inline]
    fn from(v: u16) -> Self {
        Self::Uuid16(v)
    }
}

impl From<u128> for Uuid {
    #[inline]
    fn from(v: u128) -> Self {
        Self::Uuid128(v)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = ();

    /// Decodes a 2- or 16-byte little-endian UUID.
    #[inline]
    fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
        match v.len() {
            2 => Ok(Self::Uuid16(v.unpack().u16())),
            16 => Ok(Self::Uuid128(v.unpack().u128())),
            _ => Err(()),
        }
    }
}

impl Debug for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        #[allow(clippy::cast_possible_truncation)]
        match *self {
            Self::Uuid16(v) => write!(f, "{v:#06X}"),
            Self::Uuid128(v) => write!(
                f,
                "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
                (v >> 96) as u32,
                (v >> 80) as u16,
                (v >> 64) as u16,
                (v >> 48) as u16,
                (v & ((1 << 48) - 1)) as u64
            ),
        }
    }
}

impl Display for Uuid {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Extension trait for encoding UUIDs.
pub trait UuidPacker {
    /// Writes a 2- or 16-byte little-endian UUID.
    fn uuid(&mut self, u: Uuid) -> &mut Self;
}

impl UuidPacker for Packer<'_> {
    #[inline]
    fn uuid(&mut self, u: Uuid) -> &mut Self {
        match u {
            Uuid::Uuid16(v) => self.u16(v),
            Uuid::Uuid128(v) => self.u128(v),
        }
    }
}

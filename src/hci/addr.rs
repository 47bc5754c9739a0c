use std::fmt::{Debug, Display, Formatter};

/// 48-bit untyped device address stored in little-endian byte order
/// ([Vol 6] Part B, Section 1.3).
#[derive(
    Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RawAddr([u8; 6]);

impl RawAddr {
    /// Returns the address in little-endian byte order.
    #[inline(always)]
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for RawAddr {
    #[inline]
    fn from(v: [u8; 6]) -> Self {
        Self(v)
    }
}

impl AsRef<[u8]> for RawAddr {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Debug for RawAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // [Vol 3] Part C, Section 3.2.1.3
        let a = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a[5], a[4], a[3], a[2], a[1], a[0]
        )
    }
}

impl Display for RawAddr {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let a = RawAddr::from([0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
        assert_eq!(a.to_string(), "11:22:33:44:55:66");
        assert_eq!(a.as_ref(), &[0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
    }
}

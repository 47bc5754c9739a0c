use std::ops::Deref;

use structbuf::{Pack, Packer, StructBuf};

/// Maximum limit of any [`LimitedBuf`]. Equal to the largest ATT PDU
/// ([Vol 3] Part F, Section 3.2.9).
pub const BUF_CAP: usize = 517;

/// PDU encoding buffer whose limit is the largest PDU that may be produced in
/// the current context (usually the negotiated ATT MTU). The limit never
/// exceeds [`BUF_CAP`] and the relationship `len <= lim <= BUF_CAP` always
/// holds. Writes past the limit panic; encoders size their output with
/// [`LimitedBuf::remaining`] first.
#[derive(Debug)]
#[must_use]
pub struct LimitedBuf(StructBuf);

impl LimitedBuf {
    /// Creates a new empty buffer with the specified limit, which is clamped
    /// to [`BUF_CAP`].
    #[inline]
    pub fn new(lim: usize) -> Self {
        Self(StructBuf::new(lim.min(BUF_CAP)))
    }

    /// Returns the buffer capacity limit.
    #[inline(always)]
    #[must_use]
    pub fn lim(&self) -> usize {
        self.0.lim()
    }

    /// Returns the number of additional bytes that can be written to the
    /// buffer.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lim() - self.len()
    }

    /// Clears the buffer and sets a new limit, which is clamped to
    /// [`BUF_CAP`].
    #[inline]
    pub fn reset(&mut self, lim: usize) -> &mut Self {
        let lim = lim.min(BUF_CAP);
        if lim == self.lim() {
            self.0.clear();
        } else {
            self.0 = StructBuf::new(lim);
        }
        self
    }

    /// Clears the buffer, resetting its length to 0.
    #[inline]
    pub fn clear(&mut self) -> &mut Self {
        self.0.clear();
        self
    }
}

impl Default for LimitedBuf {
    /// Returns an empty buffer with the maximum limit.
    #[inline]
    fn default() -> Self {
        Self::new(BUF_CAP)
    }
}

impl Pack for LimitedBuf {
    #[inline]
    fn append(&mut self) -> Packer {
        self.0.append()
    }

    #[inline]
    fn at(&mut self, i: usize) -> Packer {
        self.0.at(i)
    }
}

impl AsRef<[u8]> for LimitedBuf {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Deref for LimitedBuf {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl From<&[u8]> for LimitedBuf {
    /// Copies at most [`BUF_CAP`] bytes of `v` into a new buffer.
    fn from(v: &[u8]) -> Self {
        let mut b = Self::default();
        b.append().put(&v[..v.len().min(BUF_CAP)]);
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf() {
        let mut b = LimitedBuf::new(4);
        assert_eq!(b.len(), 0);
        assert_eq!(b.lim(), 4);

        b.append().u8(1);
        assert_eq!(b.as_ref(), &[1]);

        b.append().u8(2).u16(0x0403_u16);
        assert_eq!(b.as_ref(), &[1, 2, 3, 4]);
        assert_eq!(b.remaining(), 0);

        b.reset(2);
        assert!(b.is_empty());
        assert_eq!(b.remaining(), 2);
        b.reset(2).append().u16(5_u16);
        assert_eq!(b.as_ref(), &[5, 0]);
    }

    #[test]
    #[should_panic]
    fn buf_limit() {
        let mut b = LimitedBuf::new(4);
        b.append().u8(1).u16(2_u16);
        b.append().u16(3_u16);
    }

    #[test]
    fn buf_lim_clamped() {
        assert_eq!(LimitedBuf::new(usize::MAX).lim(), BUF_CAP);
        let mut b = LimitedBuf::new(0);
        assert_eq!(b.reset(BUF_CAP + 1).lim(), BUF_CAP);
        assert_eq!(LimitedBuf::from(&[7_u8; BUF_CAP + 8][..]).len(), BUF_CAP);
    }
}

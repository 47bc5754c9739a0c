use std::fmt::{Debug, Display, Formatter};
use std::num::NonZeroU16;

use crate::util::name_of;

/// Attribute handle ([Vol 3] Part F, Section 3.2.2). Handle 0 is reserved and
/// cannot be represented.
#[derive(
    Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Handle(NonZeroU16);

impl Handle {
    /// First valid handle.
    pub const MIN: Self = Self(NonZeroU16::MIN);
    /// Last valid handle.
    pub const MAX: Self = Self(NonZeroU16::MAX);

    /// Wraps a raw handle. Returns `None` if the handle is invalid.
    #[inline]
    #[must_use]
    pub const fn new(h: u16) -> Option<Self> {
        match NonZeroU16::new(h) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    /// Returns the next handle or `None` if the maximum handle was reached.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0.get().wrapping_add(1))
    }

    /// Returns the raw handle value.
    #[inline(always)]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl Debug for Handle {
    #[allow(clippy::use_self)]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:#06X})", name_of!(Handle), self.0.get())
    }
}

impl Display for Handle {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl From<Handle> for u16 {
    #[inline]
    fn from(h: Handle) -> Self {
        h.0.get()
    }
}

impl From<Handle> for usize {
    #[inline]
    fn from(h: Handle) -> Self {
        Self::from(h.0.get())
    }
}

/// Inclusive range of attribute handles used by the discovery requests
/// ([Vol 3] Part F, Section 3.4.3).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[must_use]
pub struct HandleRange {
    start: Handle,
    end: Handle,
}

impl HandleRange {
    /// Handle range that includes all possible handles.
    pub const ALL: Self = Self {
        start: Handle::MIN,
        end: Handle::MAX,
    };

    /// Creates a new handle range `start..=end` from raw request parameters.
    /// Returns `None` if `start` is 0 or greater than `end`.
    #[inline]
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Option<Self> {
        match (Handle::new(start), Handle::new(end)) {
            (Some(s), Some(e)) if start <= end => Some(Self { start: s, end: e }),
            _ => None,
        }
    }

    /// Returns the starting handle.
    #[inline(always)]
    pub const fn start(self) -> Handle {
        self.start
    }

    /// Returns the ending handle.
    #[inline(always)]
    pub const fn end(self) -> Handle {
        self.end
    }

    /// Returns whether `h` is within the range.
    #[inline]
    #[must_use]
    pub fn contains(self, h: Handle) -> bool {
        self.start <= h && h <= self.end
    }
}

impl Default for HandleRange {
    /// Returns a handle range that includes all possible handles.
    #[inline(always)]
    fn default() -> Self {
        Self::ALL
    }
}

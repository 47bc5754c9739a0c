use tracing::trace;

use super::*;

/// Maximum length of a statically stored attribute value. This covers every
/// declaration value (a characteristic declaration with a 128-bit UUID is 19
/// bytes) and a CCCD value.
pub const MAX_STATIC_VAL: usize = 20;

/// Statically stored attribute value.
pub type Value = heapless::Vec<u8, MAX_STATIC_VAL>;

/// Error type returned by the attribute database.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("attribute database full ({0} entries)")]
    DatabaseFull(usize),
    #[error("{0} is not greater than the last handle")]
    HandleOrder(Handle),
    #[error("{0} not found")]
    NotFound(Handle),
    #[error("{0}-byte value exceeds static storage")]
    ValueTooLong(usize),
}

bitflags::bitflags! {
    /// Attribute access permissions ([Vol 3] Part F, Section 3.2.5).
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct Perms: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

/// Attribute table entry ([Vol 3] Part F, Section 3.2).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub handle: Handle,
    pub typ: Uuid,
    pub value: Value,
    pub perms: Perms,
}

impl Attribute {
    /// Creates a new attribute, copying `value` into static storage.
    pub fn new(handle: Handle, typ: Uuid, value: &[u8], perms: Perms) -> Result<Self, Error> {
        let value = Value::from_slice(value).map_err(|_| Error::ValueTooLong(value.len()))?;
        Ok(Self {
            handle,
            typ,
            value,
            perms,
        })
    }

    /// Returns whether the attribute is readable.
    #[inline(always)]
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.perms.contains(Perms::READ)
    }

    /// Returns whether the attribute is writable.
    #[inline(always)]
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.perms.contains(Perms::WRITE)
    }
}

/// Fixed-capacity attribute table holding at most `N` attributes in strictly
/// increasing handle order.
#[derive(Clone, Debug, Default)]
pub struct AttributeDatabase<const N: usize> {
    attrs: heapless::Vec<Attribute, N>,
}

impl<const N: usize> AttributeDatabase<N> {
    /// Creates an empty database.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attrs: heapless::Vec::new(),
        }
    }

    /// Returns the number of attributes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns whether the database is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Returns the maximum number of attributes.
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends an attribute. The handle must be greater than that of the
    /// previous attribute.
    pub fn add(&mut self, at: Attribute) -> Result<Handle, Error> {
        if self.attrs.is_full() {
            return Err(Error::DatabaseFull(N));
        }
        if matches!(self.attrs.last(), Some(last) if last.handle >= at.handle) {
            return Err(Error::HandleOrder(at.handle));
        }
        let hdl = at.handle;
        trace!("Add {hdl} {} {:02X?}", at.typ, at.value.as_slice());
        self.attrs.push(at).map_err(|_| Error::DatabaseFull(N))?;
        Ok(hdl)
    }

    /// Returns the attribute with handle `hdl`.
    #[inline]
    #[must_use]
    pub fn find_by_handle(&self, hdl: Handle) -> Option<&Attribute> {
        self.index(hdl).map(|i| &self.attrs[i])
    }

    /// Returns an iterator over attributes of type `typ` within `range` in
    /// handle order.
    #[inline]
    pub fn find_by_type(
        &self,
        range: HandleRange,
        typ: Uuid,
    ) -> impl Iterator<Item = &Attribute> + '_ {
        self.range(range).filter(move |at| at.typ == typ)
    }

    /// Returns an iterator over all attributes within `range` in handle order.
    #[inline]
    pub fn range(&self, range: HandleRange) -> impl Iterator<Item = &Attribute> + '_ {
        let i = self.attrs.partition_point(|at| at.handle < range.start());
        (self.attrs[i..].iter()).take_while(move |at| at.handle <= range.end())
    }

    /// Returns an iterator over all attributes in handle order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.attrs.iter()
    }

    /// Replaces the static value of attribute `hdl`.
    pub fn write(&mut self, hdl: Handle, v: &[u8]) -> Result<(), Error> {
        let i = self.index(hdl).ok_or(Error::NotFound(hdl))?;
        self.attrs[i].value = Value::from_slice(v).map_err(|_| Error::ValueTooLong(v.len()))?;
        Ok(())
    }

    #[inline]
    fn index(&self, hdl: Handle) -> Option<usize> {
        self.attrs.binary_search_by_key(&hdl, |at| at.handle).ok()
    }
}

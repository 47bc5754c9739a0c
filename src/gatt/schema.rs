use super::*;

/// Characteristic definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CharDef {
    pub uuid: Uuid,
    pub props: CharProps,
}

impl CharDef {
    /// Creates a characteristic definition.
    #[inline(always)]
    #[must_use]
    pub const fn new(uuid: Uuid, props: CharProps) -> Self {
        Self { uuid, props }
    }

    /// Returns the number of attributes used by the characteristic: the
    /// declaration, the value, and an optional CCCD.
    #[inline]
    #[must_use]
    pub const fn attr_count(&self) -> usize {
        2 + self.props.has_cccd() as usize
    }
}

/// Primary service definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServiceDef {
    pub uuid: Uuid,
    pub chars: &'static [CharDef],
}

impl ServiceDef {
    /// Creates a primary service definition.
    #[inline(always)]
    #[must_use]
    pub const fn new(uuid: Uuid, chars: &'static [CharDef]) -> Self {
        Self { uuid, chars }
    }

    /// Returns the number of attributes used by the service.
    #[must_use]
    pub const fn attr_count(&self) -> usize {
        let (mut n, mut i) = (1, 0);
        while i < self.chars.len() {
            n += self.chars[i].attr_count();
            i += 1;
        }
        n
    }
}

/// Static GATT schema: an ordered list of primary services, each with an
/// ordered list of characteristics.
///
/// Characteristics are identified by a dense index in schema order, which can
/// be resolved at compile time:
///
/// ```
/// use warble::att::Uuid;
/// use warble::gatt::{CharDef, CharProps, Schema, ServiceDef};
///
/// const SCHEMA: Schema = Schema::new(&[ServiceDef::new(
///     Uuid::Uuid16(0x180D),
///     &[CharDef::new(Uuid::Uuid16(0x2A37), CharProps::READ.union(CharProps::NOTIFY))],
/// )]);
/// const HEART_RATE: usize = match SCHEMA.char_index(Uuid::Uuid16(0x180D), Uuid::Uuid16(0x2A37)) {
///     Some(i) => i,
///     None => panic!("unknown characteristic"),
/// };
/// assert_eq!(HEART_RATE, 0);
/// assert_eq!(SCHEMA.attr_count(), 4);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schema {
    services: &'static [ServiceDef],
}

impl Schema {
    /// Creates a schema.
    #[inline(always)]
    #[must_use]
    pub const fn new(services: &'static [ServiceDef]) -> Self {
        Self { services }
    }

    /// Returns the service definitions.
    #[inline(always)]
    #[must_use]
    pub const fn services(&self) -> &'static [ServiceDef] {
        self.services
    }

    /// Returns the number of attributes in the generated database.
    #[must_use]
    pub const fn attr_count(&self) -> usize {
        let (mut n, mut i) = (0, 0);
        while i < self.services.len() {
            n += self.services[i].attr_count();
            i += 1;
        }
        n
    }

    /// Returns the total number of characteristics.
    #[must_use]
    pub const fn char_count(&self) -> usize {
        let (mut n, mut i) = (0, 0);
        while i < self.services.len() {
            n += self.services[i].chars.len();
            i += 1;
        }
        n
    }

    /// Returns the index of characteristic `chr` in service `svc`.
    #[must_use]
    pub const fn char_index(&self, svc: Uuid, chr: Uuid) -> Option<usize> {
        let (mut idx, mut i) = (0, 0);
        while i < self.services.len() {
            let s = &self.services[i];
            if s.uuid.const_eq(svc) {
                let mut j = 0;
                while j < s.chars.len() {
                    if s.chars[j].uuid.const_eq(chr) {
                        return Some(idx + j);
                    }
                    j += 1;
                }
            }
            idx += s.chars.len();
            i += 1;
        }
        None
    }

    /// Returns the definition of characteristic `idx`.
    #[must_use]
    pub const fn char_def(&self, idx: usize) -> Option<&'static CharDef> {
        let services = self.services;
        let (mut base, mut i) = (0, 0);
        while i < services.len() {
            let s = &services[i];
            if idx < base + s.chars.len() {
                return Some(&s.chars[idx - base]);
            }
            base += s.chars.len();
            i += 1;
        }
        None
    }

    /// Returns an iterator over all characteristic definitions in index order
    /// along with the index of their service.
    pub fn chars(&self) -> impl Iterator<Item = (usize, &'static CharDef)> {
        let services = self.services;
        (services.iter().enumerate()).flat_map(|(i, s)| s.chars.iter().map(move |c| (i, c)))
    }
}

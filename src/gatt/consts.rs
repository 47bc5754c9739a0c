use bitflags::bitflags;

use crate::att::Uuid;

bitflags! {
    /// Characteristic properties ([Vol 3] Part G, Section 3.3.1.1).
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    #[derive(serde::Deserialize, serde::Serialize)]
    #[repr(transparent)]
    pub struct CharProps: u8 {
        /// Permits broadcasts of the Characteristic Value.
        const BROADCAST = 0x01;
        /// Permits reads of the Characteristic Value.
        const READ = 0x02;
        /// Permit writes of the Characteristic Value without response.
        const WRITE_WITHOUT_RESPONSE = 0x04;
        /// Permits writes of the Characteristic Value with response.
        const WRITE = 0x08;
        /// Permits notifications of a Characteristic Value without
        /// acknowledgment. A CCCD is added to the characteristic.
        const NOTIFY = 0x10;
        /// Permits indications of a Characteristic Value with acknowledgment.
        /// A CCCD is added to the characteristic.
        const INDICATE = 0x20;
        /// Permits signed writes to the Characteristic Value.
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        /// Additional characteristic properties are defined in the
        /// Characteristic Extended Properties Descriptor.
        const EXTENDED_PROPERTIES = 0x80;
    }
}

impl CharProps {
    /// Returns whether the characteristic has a CCCD.
    #[inline]
    #[must_use]
    pub const fn has_cccd(self) -> bool {
        self.intersects(Self::NOTIFY.union(Self::INDICATE))
    }

    /// Returns whether the value can be written with or without response.
    #[inline]
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.intersects(Self::WRITE.union(Self::WRITE_WITHOUT_RESPONSE))
    }
}

bitflags! {
    /// Client Characteristic Configuration descriptor value
    /// ([Vol 3] Part G, Section 3.3.3.3).
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct Cccd: u16 {
        /// The Characteristic Value shall be notified.
        const NOTIFY = 1 << 0;
        /// The Characteristic Value shall be indicated.
        const INDICATE = 1 << 1;
    }
}

/// GATT attribute type declarations ([Vol 3] Part G, Section 3).
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[non_exhaustive]
#[repr(u16)]
pub enum Declaration {
    PrimaryService = 0x2800,
    SecondaryService = 0x2801,
    Include = 0x2802,
    Characteristic = 0x2803,
}

/// Characteristic descriptor types ([Vol 3] Part G, Section 3.3.3).
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[non_exhaustive]
#[repr(u16)]
pub enum Descriptor {
    CharacteristicExtendedProperties = 0x2900,
    CharacteristicUserDescription = 0x2901,
    ClientCharacteristicConfiguration = 0x2902,
}

impl Declaration {
    /// Returns the attribute type UUID.
    #[inline(always)]
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        Uuid::Uuid16(self as u16)
    }
}

impl Descriptor {
    /// Returns the attribute type UUID.
    #[inline(always)]
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        Uuid::Uuid16(self as u16)
    }
}

crate::util::impl_display_via_debug! { Declaration, Descriptor }

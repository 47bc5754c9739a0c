//! Length-type-value advertising and scan response data format:
//!
//! * [Vol 3] Part C, Section 11
//! * [Core Specification Supplement] Part A, Section 1
//! * [Assigned Numbers] Section 2.3

use std::ops::Deref;

use crate::att::Uuid;
use crate::hci::MAX_ADV_DATA;

use super::*;

bitflags::bitflags! {
    /// Advertising flags (\[CSS\] Part A, Section 1.3).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct AdvFlags: u8 {
        const LE_LIMITED = 1 << 0;
        const LE_GENERAL = 1 << 1;
        const NO_BREDR = 1 << 2;
    }
}

/// Advertising data types ([Assigned Numbers] Section 2.3).
#[derive(Clone, Copy, Debug, Eq, PartialEq, num_enum::IntoPrimitive)]
#[non_exhaustive]
#[repr(u8)]
pub enum AdType {
    Flags = 0x01,
    IncompleteServiceClass16 = 0x02,
    CompleteServiceClass16 = 0x03,
    IncompleteServiceClass128 = 0x06,
    CompleteServiceClass128 = 0x07,
    ShortLocalName = 0x08,
    CompleteLocalName = 0x09,
    TxPower = 0x0A,
    Appearance = 0x19,
    ManufacturerData = 0xFF,
}

/// Advertising or scan response data, limited to 31 bytes
/// ([Vol 4] Part E, Section 7.8.7).
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AdvData(heapless::Vec<u8, MAX_ADV_DATA>);

impl AdvData {
    /// Creates empty advertising data.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(heapless::Vec::new())
    }

    /// Creates advertising data from raw length-type-value bytes.
    pub fn from_raw(v: &[u8]) -> Result<Self> {
        let mut ad = Self::new();
        ad.0.extend_from_slice(v).map_err(|_| Error::AdvDataTooLong(v.len()))?;
        Ok(ad)
    }

    /// Returns data containing only the flags field.
    #[must_use]
    pub fn with_flags(f: AdvFlags) -> Self {
        let mut ad = Self::new();
        // Three bytes always fit
        let _ = ad.flags(f);
        ad
    }

    /// Appends advertising flags (\[CSS\] Part A, Section 1.3).
    pub fn flags(&mut self, f: AdvFlags) -> Result<&mut Self> {
        self.put(AdType::Flags, &[f.bits()])
    }

    /// Appends either a shortened or a complete local device name
    /// (\[CSS\] Part A, Section 1.2).
    pub fn local_name(&mut self, complete: bool, v: impl AsRef<str>) -> Result<&mut Self> {
        let typ = if complete {
            AdType::CompleteLocalName
        } else {
            AdType::ShortLocalName
        };
        self.put(typ, v.as_ref().as_bytes())
    }

    /// Appends service class UUIDs (\[CSS\] Part A, Section 1.1). 16-bit and
    /// 128-bit UUIDs are placed in separate fields. Empty fields are omitted.
    pub fn service_class(&mut self, complete: bool, uuids: &[Uuid]) -> Result<&mut Self> {
        let (t16, t128) = if complete {
            (AdType::CompleteServiceClass16, AdType::CompleteServiceClass128)
        } else {
            (AdType::IncompleteServiceClass16, AdType::IncompleteServiceClass128)
        };
        let mut v16: heapless::Vec<u8, MAX_ADV_DATA> = heapless::Vec::new();
        let mut v128: heapless::Vec<u8, MAX_ADV_DATA> = heapless::Vec::new();
        for &u in uuids {
            let r = match u {
                Uuid::Uuid16(v) => v16.extend_from_slice(&v.to_le_bytes()),
                Uuid::Uuid128(v) => v128.extend_from_slice(&v.to_le_bytes()),
            };
            r.map_err(|_| Error::AdvDataTooLong(self.0.len() + 2 + u.len()))?;
        }
        if !v16.is_empty() {
            self.put(t16, &v16)?;
        }
        if !v128.is_empty() {
            self.put(t128, &v128)?;
        }
        Ok(self)
    }

    /// Appends TX power level in dBm (\[CSS\] Part A, Section 1.5).
    pub fn tx_power(&mut self, dbm: i8) -> Result<&mut Self> {
        self.put(AdType::TxPower, &dbm.to_le_bytes())
    }

    /// Appends device appearance (\[CSS\] Part A, Section 1.12).
    pub fn appearance(&mut self, v: u16) -> Result<&mut Self> {
        self.put(AdType::Appearance, &v.to_le_bytes())
    }

    /// Appends manufacturer-specific data (\[CSS\] Part A, Section 1.4).
    pub fn manufacturer_data(&mut self, company_id: u16, v: &[u8]) -> Result<&mut Self> {
        let mut b: heapless::Vec<u8, MAX_ADV_DATA> = heapless::Vec::new();
        let need = self.0.len() + 4 + v.len();
        (b.extend_from_slice(&company_id.to_le_bytes()))
            .and_then(|_| b.extend_from_slice(v))
            .map_err(|_| Error::AdvDataTooLong(need))?;
        self.put(AdType::ManufacturerData, &b)
    }

    /// Appends a length-type-data field. The data is left unmodified if the
    /// field does not fit.
    fn put(&mut self, typ: AdType, v: &[u8]) -> Result<&mut Self> {
        let need = self.0.len() + 2 + v.len();
        if need > MAX_ADV_DATA {
            return Err(Error::AdvDataTooLong(need));
        }
        #[allow(clippy::cast_possible_truncation)]
        let hdr = [1 + v.len() as u8, u8::from(typ)];
        // Cannot fail after the length check
        let _ = self.0.extend_from_slice(&hdr);
        let _ = self.0.extend_from_slice(v);
        Ok(self)
    }
}

impl AsRef<[u8]> for AdvData {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Deref for AdvData {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

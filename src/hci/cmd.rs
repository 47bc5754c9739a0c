use std::ops::Deref;

use super::*;

/// HCI command header length ([Vol 4] Part E, Section 5.4.1).
const CMD_HDR: usize = 3;

/// Maximum advertising or scan response data length
/// ([Vol 4] Part E, Section 7.8.7).
pub const MAX_ADV_DATA: usize = 31;

/// Command buffer size. The largest command issued by the host core is
/// `HCI_LE_Set_Advertising_Data`.
pub const CMD_BUF: usize = CMD_HDR + 1 + MAX_ADV_DATA;

/// Encoded HCI command packet (`[opcode][len][params]`), without the transport
/// packet type indicator.
#[derive(Clone, Eq, PartialEq)]
pub struct Command(heapless::Vec<u8, CMD_BUF>);

impl Command {
    /// Creates a command with no parameters.
    #[must_use]
    pub fn new(opcode: Opcode) -> Self {
        let mut cmd = Self(heapless::Vec::new());
        cmd.u16(opcode).u8(0); // Length is updated as parameters are added
        cmd
    }

    /// Returns the command opcode.
    #[inline]
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        Opcode::from(u16::from_le_bytes([self.0[0], self.0[1]]))
    }

    /// Returns the command parameters.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[u8] {
        &self.0[CMD_HDR..]
    }

    /// Appends a u8 parameter.
    #[inline]
    pub fn u8(&mut self, v: impl Into<u8>) -> &mut Self {
        self.put([v.into()])
    }

    /// Appends a u16 parameter.
    #[inline]
    pub fn u16(&mut self, v: impl Into<u16>) -> &mut Self {
        self.put(v.into().to_le_bytes())
    }

    /// Appends a bool parameter.
    #[inline]
    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.put([u8::from(v)])
    }

    /// Appends raw parameter bytes. Bytes that do not fit in the command
    /// buffer are discarded.
    pub fn put(&mut self, v: impl AsRef<[u8]>) -> &mut Self {
        let v = v.as_ref();
        let n = v.len().min(self.0.capacity() - self.0.len());
        if n < v.len() {
            tracing::warn!("Command parameters truncated by {} bytes", v.len() - n);
        }
        // Cannot fail after truncation
        let _ = self.0.extend_from_slice(&v[..n]);
        if self.0.len() >= CMD_HDR {
            #[allow(clippy::cast_possible_truncation)]
            let n = (self.0.len() - CMD_HDR) as u8;
            self.0[CMD_HDR - 1] = n;
        }
        self
    }

    /// `HCI_Disconnect` ([Vol 4] Part E, Section 7.1.6).
    #[must_use]
    pub fn disconnect(handle: u16, reason: Status) -> Self {
        let mut cmd = Self::new(Opcode::Disconnect);
        cmd.u16(handle).u8(reason);
        cmd
    }

    /// `HCI_Reset` ([Vol 4] Part E, Section 7.3.2).
    #[inline]
    #[must_use]
    pub fn reset() -> Self {
        Self::new(Opcode::Reset)
    }

    /// `HCI_LE_Set_Advertising_Data` ([Vol 4] Part E, Section 7.8.7). The
    /// data is truncated to 31 bytes and zero-padded.
    #[must_use]
    pub fn le_set_advertising_data(data: &[u8]) -> Self {
        Self::adv_data(Opcode::LeSetAdvertisingData, data)
    }

    /// `HCI_LE_Set_Scan_Response_Data` ([Vol 4] Part E, Section 7.8.8). The
    /// data is truncated to 31 bytes and zero-padded.
    #[must_use]
    pub fn le_set_scan_response_data(data: &[u8]) -> Self {
        Self::adv_data(Opcode::LeSetScanResponseData, data)
    }

    /// `HCI_LE_Set_Advertising_Enable` ([Vol 4] Part E, Section 7.8.9).
    #[must_use]
    pub fn le_set_advertising_enable(enable: bool) -> Self {
        let mut cmd = Self::new(Opcode::LeSetAdvertisingEnable);
        cmd.bool(enable);
        cmd
    }

    /// `HCI_LE_Set_Scan_Enable` ([Vol 4] Part E, Section 7.8.11).
    #[must_use]
    pub fn le_set_scan_enable(enable: bool, filter_duplicates: bool) -> Self {
        let mut cmd = Self::new(Opcode::LeSetScanEnable);
        cmd.bool(enable).bool(filter_duplicates);
        cmd
    }

    /// `HCI_LE_Create_Connection_Cancel` ([Vol 4] Part E, Section 7.8.13).
    #[inline]
    #[must_use]
    pub fn le_create_connection_cancel() -> Self {
        Self::new(Opcode::LeCreateConnectionCancel)
    }

    fn adv_data(opcode: Opcode, data: &[u8]) -> Self {
        let data = &data[..data.len().min(MAX_ADV_DATA)];
        let mut pad = [0; MAX_ADV_DATA];
        pad[..data.len()].copy_from_slice(data);
        #[allow(clippy::cast_possible_truncation)]
        let n = data.len() as u8;
        let mut cmd = Self::new(opcode);
        cmd.u8(n).put(pad);
        cmd
    }
}

impl AsRef<[u8]> for Command {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Deref for Command {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:02X?}", self.opcode(), self.params())
    }
}

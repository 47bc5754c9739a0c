use crate::hci::{
    AddrType, AdvChanMap, AdvFilterPolicy, AdvType, Command, Opcode, RawAddr, ScanFilterPolicy,
    ScanType,
};

use super::*;

/// Legacy advertising parameters ([Vol 4] Part E, Section 7.8.5). Intervals
/// are in units of 0.625 ms.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AdvParams {
    pub interval_min: u16,
    pub interval_max: u16,
    pub adv_type: AdvType,
    pub own_addr_type: AddrType,
    pub chan_map: AdvChanMap,
    pub filter_policy: AdvFilterPolicy,
    /// Advertising data. Not sent to the controller if empty.
    pub data: AdvData,
    /// Scan response data. Not sent to the controller if empty.
    pub scan_rsp: AdvData,
}

impl Default for AdvParams {
    /// Returns general discoverable, connectable undirected advertising on all
    /// channels every 1.28 s.
    fn default() -> Self {
        Self {
            interval_min: 0x0800,
            interval_max: 0x0800,
            adv_type: AdvType::default(),
            own_addr_type: AddrType::default(),
            chan_map: AdvChanMap::default(),
            filter_policy: AdvFilterPolicy::default(),
            data: AdvData::with_flags(AdvFlags::LE_GENERAL | AdvFlags::NO_BREDR),
            scan_rsp: AdvData::new(),
        }
    }
}

impl AdvParams {
    /// Validates parameter ranges.
    pub fn validate(&self) -> Result<()> {
        // High duty cycle directed advertising ignores the interval
        if self.adv_type != AdvType::ConnectableDirectedHigh {
            check_range(
                "advertising interval",
                0x0020..=0x4000,
                self.interval_min,
                self.interval_max,
            )?;
        }
        if self.chan_map.is_empty() {
            return Err(Error::InvalidParam("advertising channel map"));
        }
        Ok(())
    }

    /// Returns `HCI_LE_Set_Advertising_Parameters` command. Peer address
    /// fields are only used for directed advertising and are zeroed.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(Opcode::LeSetAdvertisingParameters);
        (cmd.u16(self.interval_min).u16(self.interval_max))
            .u8(self.adv_type)
            .u8(self.own_addr_type)
            .u8(AddrType::Public)
            .put(RawAddr::default().to_le_bytes())
            .u8(self.chan_map.bits())
            .u8(self.filter_policy);
        cmd
    }
}

/// Scan parameters ([Vol 4] Part E, Section 7.8.10). Interval and window are
/// in units of 0.625 ms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ScanParams {
    pub scan_type: ScanType,
    pub interval: u16,
    pub window: u16,
    pub own_addr_type: AddrType,
    pub filter_policy: ScanFilterPolicy,
    /// Controller-side duplicate advertising report filtering.
    pub filter_duplicates: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            scan_type: ScanType::default(),
            interval: 0x0010,
            window: 0x0010,
            own_addr_type: AddrType::default(),
            filter_policy: ScanFilterPolicy::default(),
            filter_duplicates: true,
        }
    }
}

impl ScanParams {
    /// Validates parameter ranges.
    pub fn validate(&self) -> Result<()> {
        check_range("scan interval", 0x0004..=0x4000, self.window, self.interval)
    }

    /// Returns `HCI_LE_Set_Scan_Parameters` command.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(Opcode::LeSetScanParameters);
        (cmd.u8(self.scan_type).u16(self.interval).u16(self.window))
            .u8(self.own_addr_type)
            .u8(self.filter_policy);
        cmd
    }
}

/// Connection parameters used when initiating a connection
/// ([Vol 4] Part E, Section 7.8.12). Scan interval and window are in units of
/// 0.625 ms, connection interval in 1.25 ms, supervision timeout in 10 ms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ConnParams {
    pub scan_interval: u16,
    pub scan_window: u16,
    pub own_addr_type: AddrType,
    pub interval_min: u16,
    pub interval_max: u16,
    pub latency: u16,
    pub supervision_timeout: u16,
    pub min_ce_len: u16,
    pub max_ce_len: u16,
}

impl Default for ConnParams {
    /// Returns a 30-50 ms connection interval with a 5 s supervision timeout.
    fn default() -> Self {
        Self {
            scan_interval: 0x0060,
            scan_window: 0x0030,
            own_addr_type: AddrType::default(),
            interval_min: 0x0018,
            interval_max: 0x0028,
            latency: 0,
            supervision_timeout: 500,
            min_ce_len: 0,
            max_ce_len: 0,
        }
    }
}

impl ConnParams {
    /// Validates parameter ranges ([Vol 6] Part B, Section 4.5.2).
    pub fn validate(&self) -> Result<()> {
        check_range(
            "scan interval",
            0x0004..=0x4000,
            self.scan_window,
            self.scan_interval,
        )?;
        check_range(
            "connection interval",
            0x0006..=0x0C80,
            self.interval_min,
            self.interval_max,
        )?;
        if self.latency > 0x01F3 {
            return Err(Error::InvalidParam("peripheral latency"));
        }
        // Timeout must exceed (1 + latency) * interval_max * 2
        let min_timeout =
            (1 + u32::from(self.latency)) * u32::from(self.interval_max) * 125 / 500;
        if !(0x000A..=0x0C80).contains(&self.supervision_timeout)
            || u32::from(self.supervision_timeout) <= min_timeout
        {
            return Err(Error::InvalidParam("supervision timeout"));
        }
        if self.min_ce_len > self.max_ce_len {
            return Err(Error::InvalidParam("connection event length"));
        }
        Ok(())
    }

    /// Returns `HCI_LE_Create_Connection` command for the specified peer.
    /// The Filter Accept List is not used.
    #[must_use]
    pub fn command(&self, peer_addr_type: AddrType, peer_addr: RawAddr) -> Command {
        let mut cmd = Command::new(Opcode::LeCreateConnection);
        (cmd.u16(self.scan_interval).u16(self.scan_window))
            .u8(0_u8)
            .u8(peer_addr_type)
            .put(peer_addr.to_le_bytes())
            .u8(self.own_addr_type)
            .u16(self.interval_min)
            .u16(self.interval_max)
            .u16(self.latency)
            .u16(self.supervision_timeout)
            .u16(self.min_ce_len)
            .u16(self.max_ce_len);
        cmd
    }
}

/// Checks that `lo <= hi` and both are within `r`.
fn check_range(
    name: &'static str,
    r: std::ops::RangeInclusive<u16>,
    lo: u16,
    hi: u16,
) -> Result<()> {
    if lo <= hi && r.contains(&lo) && r.contains(&hi) {
        Ok(())
    } else {
        Err(Error::InvalidParam(name))
    }
}

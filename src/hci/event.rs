use tracing::trace;

use structbuf::Unpacker;

use super::*;

/// Decoded HCI event consumed by the GAP state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum HciEvent {
    /// `HCI_Command_Complete` ([Vol 4] Part E, Section 7.7.14). `status` is
    /// the first return parameter.
    CommandComplete {
        cmd_quota: u8,
        opcode: Opcode,
        status: Status,
    },
    /// `HCI_Command_Status` ([Vol 4] Part E, Section 7.7.15).
    CommandStatus {
        cmd_quota: u8,
        opcode: Opcode,
        status: Status,
    },
    DisconnectionComplete(DisconnectionComplete),
    LeConnectionComplete(LeConnectionComplete),
    /// Any other event.
    Other { code: u8 },
}

/// `HCI_Disconnection_Complete` event parameters
/// ([Vol 4] Part E, Section 7.7.5).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisconnectionComplete {
    pub status: Status,
    pub handle: u16,
    pub reason: Status,
}

/// `HCI_LE_Connection_Complete` and `HCI_LE_Enhanced_Connection_Complete`
/// event parameters ([Vol 4] Part E, Sections 7.7.65.1 and 7.7.65.10).
/// Connection interval and supervision timeout are in controller units of
/// 1.25 ms and 10 ms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeConnectionComplete {
    pub status: Status,
    pub handle: u16,
    pub role: Role,
    pub peer_addr_type: AddrType,
    pub peer_addr: RawAddr,
    pub interval: u16,
    pub latency: u16,
    pub supervision_timeout: u16,
}

/// Connection handle mask ([Vol 4] Part E, Section 5.4.2).
const HANDLE_MASK: u16 = 0x0FFF;

impl HciEvent {
    /// Decodes an HCI event packet (`[code][len][params]`). Returns `None` if
    /// the packet is truncated or a consumed event has invalid parameters.
    /// Parameters beyond those used by the host core are ignored.
    #[must_use]
    pub fn decode(pkt: &[u8]) -> Option<Self> {
        let mut hdr = Unpacker::new(pkt);
        let (code, n) = (hdr.u8(), usize::from(hdr.u8()));
        if !hdr.is_ok() || hdr.len() < n {
            return None;
        }
        let p = hdr.split_at(n).0;
        let Ok(code) = EventCode::try_from(code) else {
            return Some(Self::Other { code });
        };
        let e = match code {
            EventCode::CommandComplete => parse(p, |p| {
                let (cmd_quota, opcode) = (p.u8(), Opcode::from(p.u16()));
                // Opcode 0x0000 has no return parameters
                let status = if p.is_empty() {
                    Status::Success
                } else {
                    Status::from(p.u8())
                };
                Some(Self::CommandComplete {
                    cmd_quota,
                    opcode,
                    status,
                })
            }),
            EventCode::CommandStatus => parse(p, |p| {
                let (status, cmd_quota) = (Status::from(p.u8()), p.u8());
                Some(Self::CommandStatus {
                    cmd_quota,
                    opcode: Opcode::from(p.u16()),
                    status,
                })
            }),
            EventCode::DisconnectionComplete => parse(p, |p| {
                Some(Self::DisconnectionComplete(DisconnectionComplete {
                    status: Status::from(p.u8()),
                    handle: p.u16() & HANDLE_MASK,
                    reason: Status::from(p.u8()),
                }))
            }),
            EventCode::LeMetaEvent => return Self::decode_le(p),
        };
        trace!("HCI event: {e:?}");
        e
    }

    /// Decodes LE Meta event parameters.
    fn decode_le(mut p: Unpacker) -> Option<Self> {
        let sub = p.u8();
        let Ok(sub) = SubeventCode::try_from(sub) else {
            return p.is_ok().then_some(Self::Other {
                code: EventCode::LeMetaEvent as u8,
            });
        };
        parse(p, |p| {
            let (status, handle) = (Status::from(p.u8()), p.u16() & HANDLE_MASK);
            let role = Role::try_from(p.u8()).ok()?;
            let peer_addr_type = AddrType::try_from(p.u8()).ok()?;
            let peer_addr = p.addr();
            if sub == SubeventCode::EnhancedConnectionComplete {
                // Local and peer resolvable private addresses
                let _ = (p.addr(), p.addr());
            }
            Some(Self::LeConnectionComplete(LeConnectionComplete {
                status,
                handle,
                role,
                peer_addr_type,
                peer_addr,
                interval: p.u16(),
                latency: p.u16(),
                supervision_timeout: p.u16(),
            }))
        })
    }
}

/// Returns the result of calling `f` to unpack event parameters or `None` if
/// `f` reads past the end. Parameters that the host core does not use are
/// ignored.
#[inline]
fn parse<T>(p: Unpacker, f: impl FnOnce(&mut Unpacker) -> Option<T>) -> Option<T> {
    p.map_or(None, |p| {
        let v = f(p);
        p.take();
        v
    })
}

/// Extension trait providing HCI-specific [`Unpacker`] methods.
trait EventUnpacker {
    /// Returns the next `BD_ADDR`.
    fn addr(&mut self) -> RawAddr;
}

impl EventUnpacker for Unpacker<'_> {
    #[inline]
    fn addr(&mut self) -> RawAddr {
        let (lo, hi) = (self.u32().to_le_bytes(), self.u16().to_le_bytes());
        RawAddr::from([lo[0], lo[1], lo[2], lo[3], hi[0], hi[1]])
    }
}

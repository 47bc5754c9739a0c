use tracing::{debug, trace, warn};

use crate::hci::{
    AddrType, Command, DisconnectionComplete, HciEvent, LeConnectionComplete, Opcode, RawAddr,
    Role, Status,
};
use crate::BoundedQueue;

use super::*;

/// Capacity of the command and event queues.
pub const QUEUE_CAP: usize = 8;

/// Local device state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum State {
    #[default]
    Idle,
    Advertising,
    Scanning,
    /// Connection establishment initiated by the local device.
    Connecting,
    Connected,
}

crate::util::impl_display_via_debug! { State }

/// Established connection parameters. Interval is in units of 1.25 ms and
/// supervision timeout in 10 ms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConnectionInfo {
    pub handle: u16,
    pub role: Role,
    pub peer_addr_type: AddrType,
    pub peer_addr: RawAddr,
    pub interval: u16,
    pub latency: u16,
    pub supervision_timeout: u16,
}

impl From<&LeConnectionComplete> for ConnectionInfo {
    #[inline]
    fn from(c: &LeConnectionComplete) -> Self {
        Self {
            handle: c.handle,
            role: c.role,
            peer_addr_type: c.peer_addr_type,
            peer_addr: c.peer_addr,
            interval: c.interval,
            latency: c.latency,
            supervision_timeout: c.supervision_timeout,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisconnectionInfo {
    pub handle: u16,
    pub reason: Status,
}

/// Application-visible GAP event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum GapEvent {
    /// The controller accepted the advertising enable command.
    AdvertisingStarted,
    /// Advertising was stopped by the host, ended by a connection, or failed
    /// to start.
    AdvertisingStopped,
    Connected(ConnectionInfo),
    Disconnected(DisconnectionInfo),
    /// Connection establishment failed or was cancelled.
    ConnectionFailed(Status),
}

/// GAP state machine. Operations validate the current state, queue the HCI
/// commands that implement them, and transition optimistically. Controller
/// events confirm or revert the transition.
///
/// When the event queue is full, the oldest event is discarded to make room
/// for the newest one. When the command queue does not have room for all
/// commands of an operation, the operation fails without side effects.
#[derive(Debug, Default)]
pub struct Gap {
    state: State,
    conn: Option<ConnectionInfo>,
    /// Value of the outstanding `HCI_LE_Set_Advertising_Enable` command.
    adv_enable: Option<bool>,
    cmds: BoundedQueue<Command, QUEUE_CAP>,
    evts: BoundedQueue<GapEvent, QUEUE_CAP>,
}

impl Gap {
    /// Creates an idle state machine with empty queues.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            conn: None,
            adv_enable: None,
            cmds: BoundedQueue::new(),
            evts: BoundedQueue::new(),
        }
    }

    /// Returns the current state.
    #[inline(always)]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Returns the current connection, if any.
    #[inline]
    #[must_use]
    pub const fn connection(&self) -> Option<&ConnectionInfo> {
        self.conn.as_ref()
    }

    /// Returns the current connection handle, if any.
    #[inline]
    #[must_use]
    pub fn conn_handle(&self) -> Option<u16> {
        self.conn.map(|c| c.handle)
    }

    /// Starts legacy advertising from the idle state. Queues advertising
    /// parameters, non-empty advertising and scan response data, and the
    /// enable command.
    pub fn start_advertising(&mut self, p: &AdvParams) -> Result<()> {
        self.check_state("start_advertising", |s| s == State::Idle)?;
        p.validate()?;
        self.queue_all([
            Some(p.command()),
            (!p.data.is_empty()).then(|| Command::le_set_advertising_data(&p.data)),
            (!p.scan_rsp.is_empty()).then(|| Command::le_set_scan_response_data(&p.scan_rsp)),
            Some(Command::le_set_advertising_enable(true)),
        ])?;
        self.adv_enable = Some(true);
        self.set_state(State::Advertising);
        Ok(())
    }

    /// Stops advertising.
    pub fn stop_advertising(&mut self) -> Result<()> {
        self.check_state("stop_advertising", |s| s == State::Advertising)?;
        self.queue_command(Command::le_set_advertising_enable(false))?;
        self.adv_enable = Some(false);
        self.set_state(State::Idle);
        Ok(())
    }

    /// Starts scanning from the idle state. Advertising reports are not
    /// processed by the state machine.
    pub fn start_scanning(&mut self, p: &ScanParams) -> Result<()> {
        self.check_state("start_scanning", |s| s == State::Idle)?;
        p.validate()?;
        self.queue_all([
            Some(p.command()),
            Some(Command::le_set_scan_enable(true, p.filter_duplicates)),
        ])?;
        self.set_state(State::Scanning);
        Ok(())
    }

    /// Stops scanning.
    pub fn stop_scanning(&mut self) -> Result<()> {
        self.check_state("stop_scanning", |s| s == State::Scanning)?;
        self.queue_command(Command::le_set_scan_enable(false, false))?;
        self.set_state(State::Idle);
        Ok(())
    }

    /// Initiates a connection to the specified peer. Scanning, if active, is
    /// stopped first.
    pub fn connect(
        &mut self,
        peer_addr_type: AddrType,
        peer_addr: RawAddr,
        p: &ConnParams,
    ) -> Result<()> {
        self.check_state("connect", |s| matches!(s, State::Idle | State::Scanning))?;
        p.validate()?;
        let create = p.command(peer_addr_type, peer_addr);
        if self.state == State::Scanning {
            self.queue_all([Some(Command::le_set_scan_enable(false, false)), Some(create)])?;
        } else {
            self.queue_command(create)?;
        }
        self.set_state(State::Connecting);
        Ok(())
    }

    /// Cancels a pending connection attempt. The state changes when the
    /// controller reports the connection as failed or, if the cancellation
    /// raced with establishment, as complete.
    pub fn cancel_connect(&mut self) -> Result<()> {
        self.check_state("cancel_connect", |s| s == State::Connecting)?;
        self.queue_command(Command::le_create_connection_cancel())
    }

    /// Terminates the current connection. The state changes when the
    /// controller reports disconnection.
    pub fn disconnect(&mut self, handle: u16, reason: Status) -> Result<()> {
        self.check_state("disconnect", |s| s == State::Connected)?;
        if self.conn_handle() != Some(handle) {
            return Err(Error::UnknownConnection(handle));
        }
        self.queue_command(Command::disconnect(handle, reason))
    }

    /// Queues an arbitrary HCI command.
    pub fn queue_command(&mut self, cmd: Command) -> Result<()> {
        trace!("Queued command: {cmd:?}");
        self.cmds.push(cmd).map_err(|_| Error::CommandQueueFull)
    }

    /// Removes the next command to be sent to the controller.
    #[inline]
    pub fn next_command(&mut self) -> Option<Command> {
        self.cmds.pop()
    }

    /// Returns the number of commands waiting to be sent.
    #[inline]
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.cmds.len()
    }

    /// Removes the next application event.
    #[inline]
    pub fn poll_event(&mut self) -> Option<GapEvent> {
        self.evts.pop()
    }

    /// Updates the state from a controller event. Events that are not
    /// relevant in the current state are ignored.
    pub fn handle_event(&mut self, e: &HciEvent) {
        match *e {
            HciEvent::CommandComplete {
                opcode: Opcode::LeSetAdvertisingEnable,
                status,
                ..
            } => self.adv_enable_complete(status),
            HciEvent::CommandStatus {
                opcode: Opcode::LeCreateConnection,
                status,
                ..
            } if !status.is_ok() && self.state == State::Connecting => {
                warn!("Connection request rejected: {status}");
                self.set_state(State::Idle);
                self.push_event(GapEvent::ConnectionFailed(status));
            }
            HciEvent::LeConnectionComplete(ref c) => self.connection_complete(c),
            HciEvent::DisconnectionComplete(ref d) => self.disconnection_complete(d),
            _ => trace!("Ignored event: {e:?}"),
        }
    }

    fn adv_enable_complete(&mut self, status: Status) {
        match self.adv_enable.take() {
            Some(true) if status.is_ok() => {
                if self.state == State::Advertising {
                    self.push_event(GapEvent::AdvertisingStarted);
                }
            }
            Some(true) => {
                warn!("Failed to start advertising: {status}");
                if self.state == State::Advertising {
                    self.set_state(State::Idle);
                }
                self.push_event(GapEvent::AdvertisingStopped);
            }
            Some(false) if status.is_ok() => self.push_event(GapEvent::AdvertisingStopped),
            Some(false) => warn!("Failed to stop advertising: {status}"),
            None => trace!("Ignored advertising enable completion"),
        }
    }

    fn connection_complete(&mut self, c: &LeConnectionComplete) {
        let adv = match self.state {
            State::Advertising => true,
            State::Connecting => false,
            s => {
                warn!("Ignored connection complete in {s} state: {c:?}");
                return;
            }
        };
        if adv {
            self.adv_enable = None;
        }
        if !c.status.is_ok() {
            warn!("Connection failed: {}", c.status);
            self.set_state(State::Idle);
            self.push_event(GapEvent::ConnectionFailed(c.status));
            return;
        }
        let info = ConnectionInfo::from(c);
        self.conn = Some(info);
        self.set_state(State::Connected);
        if adv {
            self.push_event(GapEvent::AdvertisingStopped);
        }
        self.push_event(GapEvent::Connected(info));
    }

    fn disconnection_complete(&mut self, d: &DisconnectionComplete) {
        if self.state != State::Connected || self.conn_handle() != Some(d.handle) {
            trace!("Ignored disconnection complete: {d:?}");
            return;
        }
        if !d.status.is_ok() {
            warn!("Disconnect failed: {}", d.status);
            return;
        }
        self.conn = None;
        self.set_state(State::Idle);
        self.push_event(GapEvent::Disconnected(DisconnectionInfo {
            handle: d.handle,
            reason: d.reason,
        }));
    }

    /// Returns an error if the current state does not satisfy `ok`.
    #[inline]
    fn check_state(&self, op: &'static str, ok: impl FnOnce(State) -> bool) -> Result<()> {
        if ok(self.state) {
            Ok(())
        } else {
            Err(Error::InvalidState {
                op,
                state: self.state,
            })
        }
    }

    /// Queues all commands or none of them. `None` entries are skipped.
    fn queue_all<const N: usize>(&mut self, cmds: [Option<Command>; N]) -> Result<()> {
        if self.cmds.free() < cmds.iter().flatten().count() {
            return Err(Error::CommandQueueFull);
        }
        for cmd in cmds.into_iter().flatten() {
            self.queue_command(cmd)?;
        }
        Ok(())
    }

    fn push_event(&mut self, e: GapEvent) {
        debug!("GAP event: {e:?}");
        if let Some(old) = self.evts.push_evict(e) {
            warn!("Event queue full, dropped: {old:?}");
        }
    }

    #[inline]
    fn set_state(&mut self, s: State) {
        if self.state != s {
            debug!("GAP state: {} -> {s}", self.state);
            self.state = s;
        }
    }
}

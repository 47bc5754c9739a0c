//! Generic Access Profile ([Vol 3] Part C).
//!
//! [`Gap`] tracks the local device through advertising, scanning, connection
//! establishment, and disconnection. It turns requests into HCI commands on a
//! bounded command queue and turns HCI events into [`GapEvent`]s on a bounded
//! event queue. The state machine performs no I/O; the host moves commands to
//! the controller and feeds controller events back in.

pub use {ad::*, params::*, state::*};

mod ad;
mod params;
mod state;


/// Error type returned by GAP operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{op} is not allowed in {state:?} state")]
    InvalidState { op: &'static str, state: State },
    #[error("command queue is full")]
    CommandQueueFull,
    #[error("advertising data too long ({0} > 31 bytes)")]
    AdvDataTooLong(usize),
    #[error("invalid {0} parameter")]
    InvalidParam(&'static str),
    #[error("unknown connection handle {0:#06X}")]
    UnknownConnection(u16),
}

/// Common GAP result type.
pub type Result<T> = std::result::Result<T, Error>;

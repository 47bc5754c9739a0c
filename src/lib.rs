//! Bounded-memory Bluetooth LE host core.
//!
//! Turns whole ATT PDUs into GATT server operations and HCI events into GAP
//! connection lifecycle events, without performing any I/O. All protocol state
//! lives in fixed-capacity tables sized at compile time:
//!
//! * [`att`] - Attribute Protocol PDU codec and attribute database.
//! * [`gatt`] - GATT server built from a static service schema, with
//!   synchronous or asynchronous handler dispatch.
//! * [`gap`] - advertising/scanning/connection state machine producing HCI
//!   commands and application events.
//! * [`hci`] - HCI command encoder and the decoded event forms consumed by
//!   [`gap`].
//!
//! L2CAP reassembly, the HCI transport, and SMP are external to this crate.

pub use util::{BoundedQueue, LimitedBuf, WaitGroup, WaitGuard, BUF_CAP};

pub mod att;
pub mod gap;
pub mod gatt;
pub mod hci;

mod util;

//! Generic Attribute Profile ([Vol 3] Part G).
//!
//! A [`Server`] is generated from a static [`Schema`]. Applications bind
//! [`Io`] callbacks to characteristic values and feed complete ATT PDUs to
//! [`Server::handle_pdu`], which returns the response to send, if any.

pub use {
    consts::*,
    dispatch::{AsyncConfig, RspFn, Spawn, SpawnError, Task, ThreadSpawner, TokioSpawner},
    io::{Io, IoReq, Op, Writer},
    schema::*,
    server::*,
};

use crate::att::*;

mod consts;
mod dispatch;
mod io;
mod schema;
mod server;

#[cfg(test)]
mod tests;

/// Error type returned by the GATT server.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("schema requires {need} attributes, but capacity is {cap}")]
    TooManyAttributes { need: usize, cap: usize },
    #[error("schema defines {need} characteristics, but capacity is {cap}")]
    TooManyCharacteristics { need: usize, cap: usize },
    #[error("attribute handle space exhausted")]
    HandleOverflow,
    #[error("characteristic {chr} not found in service {svc}")]
    UnknownCharacteristic { svc: Uuid, chr: Uuid },
    #[error("invalid characteristic index {0}")]
    InvalidIndex(usize),
}

/// Common GATT result type.
pub type Result<T> = std::result::Result<T, Error>;

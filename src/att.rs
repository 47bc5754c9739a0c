//! Attribute Protocol ([Vol 3] Part F).

pub use {
    consts::*,
    db::{Attribute, AttributeDatabase, Error as DbError, Perms, Value, MAX_STATIC_VAL},
    handle::*,
    pdu::*,
    uuid::*,
};

mod consts;
mod db;
mod handle;
mod pdu;
mod uuid;

/// PDU response result.
pub type RspResult<T> = std::result::Result<T, ErrorRsp>;

/// `ATT_ERROR_RSP` PDU ([Vol 3] Part F, Section 3.4.1.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("ATT {req:#04X} for handle {hdl:#06X} failed with {err}")]
pub struct ErrorRsp {
    /// Raw opcode of the request that failed.
    pub req: u8,
    /// Attribute handle that caused the error or 0 if not applicable.
    pub hdl: u16,
    /// Reason for the failure.
    pub err: ErrorCode,
}

impl ErrorRsp {
    /// Creates a new error response.
    #[inline(always)]
    #[must_use]
    pub const fn new(req: u8, hdl: u16, err: ErrorCode) -> Self {
        Self { req, hdl, err }
    }

    /// Encodes the error response into `b`.
    #[inline]
    pub fn encode(self, b: &mut crate::LimitedBuf) -> &[u8] {
        encode_error_rsp(b, self.req, self.hdl, self.err)
    }
}

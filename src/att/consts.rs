use super::*;

/// Default and minimum LE ATT MTU ([Vol 3] Part F, Section 3.2.8).
pub const DEFAULT_MTU: u16 = 23;

/// Maximum supported ATT MTU. Equal to the longest attribute value plus the
/// largest response header.
pub const MAX_MTU: u16 = 517;

/// Maximum attribute value length ([Vol 3] Part F, Section 3.2.9).
pub const MAX_VAL_LEN: usize = 512;

/// Attribute opcode ([Vol 3] Part F, Section 3.3.1 and
/// [Vol 3] Part F, Section 3.4.8).
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[non_exhaustive]
#[repr(u8)]
pub enum Opcode {
    ErrorRsp = 0x01,
    ExchangeMtuReq = 0x02,
    ExchangeMtuRsp = 0x03,
    FindInformationReq = 0x04,
    FindInformationRsp = 0x05,
    FindByTypeValueReq = 0x06,
    FindByTypeValueRsp = 0x07,
    ReadByTypeReq = 0x08,
    ReadByTypeRsp = 0x09,
    ReadReq = 0x0A,
    ReadRsp = 0x0B,
    ReadBlobReq = 0x0C,
    ReadBlobRsp = 0x0D,
    ReadMultipleReq = 0x0E,
    ReadMultipleRsp = 0x0F,
    ReadByGroupTypeReq = 0x10,
    ReadByGroupTypeRsp = 0x11,
    WriteReq = 0x12,
    WriteRsp = 0x13,
    PrepareWriteReq = 0x16,
    PrepareWriteRsp = 0x17,
    ExecuteWriteReq = 0x18,
    ExecuteWriteRsp = 0x19,
    HandleValueNtf = 0x1B,
    HandleValueInd = 0x1D,
    HandleValueCfm = 0x1E,
    WriteCmd = 0x52,
    SignedWriteCmd = 0xD2,
}

impl Opcode {
    /// Returns whether the raw opcode has the Command Flag set. The server
    /// never responds to commands, not even with an error.
    #[inline]
    #[must_use]
    pub const fn is_cmd(op: u8) -> bool {
        op & (1 << 6) != 0
    }

    /// Returns a non-handle error response.
    #[inline]
    pub const fn err<R>(self, err: ErrorCode) -> RspResult<R> {
        Err(ErrorRsp::new(self as _, 0, err))
    }

    /// Returns a handle-specific error response.
    #[inline]
    pub const fn hdl_err<R>(self, err: ErrorCode, hdl: u16) -> RspResult<R> {
        Err(ErrorRsp::new(self as _, hdl, err))
    }

    /// Returns the PDU type.
    #[must_use]
    pub const fn typ(self) -> PduType {
        use {Opcode::*, PduType::*};
        #[allow(clippy::match_same_arms)]
        match self {
            ErrorRsp | ExchangeMtuRsp | FindInformationRsp | FindByTypeValueRsp
            | ReadByTypeRsp | ReadRsp | ReadBlobRsp | ReadMultipleRsp | ReadByGroupTypeRsp
            | WriteRsp | PrepareWriteRsp | ExecuteWriteRsp => Rsp,
            ExchangeMtuReq | FindInformationReq | FindByTypeValueReq | ReadByTypeReq
            | ReadReq | ReadBlobReq | ReadMultipleReq | ReadByGroupTypeReq | WriteReq
            | PrepareWriteReq | ExecuteWriteReq => Req,
            WriteCmd | SignedWriteCmd => Cmd,
            HandleValueNtf => Ntf,
            HandleValueInd => Ind,
            HandleValueCfm => Cfm,
        }
    }
}

/// Attribute PDU type ([Vol 3] Part F, Section 3.3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PduType {
    /// Command sent to a server by a client that does not invoke a response.
    Cmd,
    /// Request sent to a server by a client that invokes a response.
    Req,
    /// Response sent to a client by a server in response to a request.
    Rsp,
    /// Notification sent to a client by a server that does not invoke a
    /// confirmation.
    Ntf,
    /// Indication sent to a client by a server that invokes a confirmation.
    Ind,
    /// Confirmation sent to a server by a client to confirm receipt of an
    /// indication.
    Cfm,
}

/// ATT error codes ([Vol 3] Part F, Section 3.4.1.1). Unknown codes received
/// from a peer decode as [`ErrorCode::UnlikelyError`].
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    num_enum::IntoPrimitive,
    num_enum::TryFromPrimitive,
    thiserror::Error,
)]
#[non_exhaustive]
#[repr(u8)]
pub enum ErrorCode {
    /// The attribute handle given was not valid on this server.
    InvalidHandle = 0x01,
    /// The attribute cannot be read.
    ReadNotPermitted = 0x02,
    /// The attribute cannot be written.
    WriteNotPermitted = 0x03,
    /// The attribute PDU was invalid.
    InvalidPdu = 0x04,
    /// The attribute requires authentication before it can be read or written.
    InsufficientAuthentication = 0x05,
    /// ATT Server does not support the request received from the client.
    RequestNotSupported = 0x06,
    /// Offset specified was past the end of the attribute.
    InvalidOffset = 0x07,
    /// The attribute requires authorization before it can be read or written.
    InsufficientAuthorization = 0x08,
    /// Too many prepare writes have been queued.
    PrepareQueueFull = 0x09,
    /// No attribute found within the given attribute handle range.
    AttributeNotFound = 0x0A,
    /// The attribute cannot be read using the ATT_READ_BLOB_REQ PDU.
    AttributeNotLong = 0x0B,
    /// The Encryption Key Size used for encrypting this link is too short.
    EncryptionKeySizeTooShort = 0x0C,
    /// The attribute value length is invalid for the operation.
    InvalidAttributeValueLength = 0x0D,
    /// The request encountered an error that was unlikely and could not be
    /// completed.
    UnlikelyError = 0x0E,
    /// The attribute requires encryption before it can be read or written.
    InsufficientEncryption = 0x0F,
    /// The attribute type is not a supported grouping attribute.
    UnsupportedGroupType = 0x10,
    /// Insufficient resources to complete the request.
    InsufficientResources = 0x11,
}

impl ErrorCode {
    /// Converts a raw error code, mapping unknown values to
    /// [`ErrorCode::UnlikelyError`].
    #[inline]
    #[must_use]
    pub fn from_raw(v: u8) -> Self {
        Self::try_from(v).unwrap_or(Self::UnlikelyError)
    }
}

crate::util::impl_display_via_debug! { Opcode, ErrorCode }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_type() {
        assert_eq!(Opcode::WriteCmd.typ(), PduType::Cmd);
        assert!(Opcode::is_cmd(Opcode::WriteCmd.into()));
        assert!(Opcode::is_cmd(Opcode::SignedWriteCmd.into()));
        assert!(!Opcode::is_cmd(Opcode::WriteReq.into()));
        assert_eq!(Opcode::HandleValueCfm.typ(), PduType::Cfm);
    }

    #[test]
    fn error_code_raw() {
        assert_eq!(ErrorCode::from_raw(0x0A), ErrorCode::AttributeNotFound);
        assert_eq!(ErrorCode::from_raw(0x80), ErrorCode::UnlikelyError);
        assert_eq!(u8::from(ErrorCode::InvalidOffset), 0x07);
    }
}

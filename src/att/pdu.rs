use structbuf::{Pack, Packer, Unpacker};

use crate::LimitedBuf;

use super::*;

/// Decoded ATT PDU ([Vol 3] Part F, Section 3.4). Variable-length fields
/// borrow from the original byte slice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Pdu<'a> {
    ErrorRsp(ErrorRsp),
    ExchangeMtuReq {
        mtu: u16,
    },
    ExchangeMtuRsp {
        mtu: u16,
    },
    FindInformationReq {
        start: u16,
        end: u16,
    },
    FindInformationRsp {
        fmt: u8,
        data: &'a [u8],
    },
    FindByTypeValueReq {
        start: u16,
        end: u16,
        typ: u16,
        value: &'a [u8],
    },
    FindByTypeValueRsp {
        data: &'a [u8],
    },
    ReadByTypeReq {
        start: u16,
        end: u16,
        typ: Uuid,
    },
    ReadByTypeRsp {
        len: u8,
        data: &'a [u8],
    },
    ReadReq {
        hdl: u16,
    },
    ReadRsp {
        value: &'a [u8],
    },
    ReadBlobReq {
        hdl: u16,
        off: u16,
    },
    ReadBlobRsp {
        value: &'a [u8],
    },
    ReadByGroupTypeReq {
        start: u16,
        end: u16,
        typ: Uuid,
    },
    ReadByGroupTypeRsp {
        len: u8,
        data: &'a [u8],
    },
    WriteReq {
        hdl: u16,
        value: &'a [u8],
    },
    WriteRsp,
    WriteCmd {
        hdl: u16,
        value: &'a [u8],
    },
    HandleValueNtf {
        hdl: u16,
        value: &'a [u8],
    },
    HandleValueInd {
        hdl: u16,
        value: &'a [u8],
    },
    HandleValueCfm,
    /// PDU with an opcode that is not recognized or has no decoder.
    Unknown {
        opcode: u8,
        data: &'a [u8],
    },
}

impl<'a> Pdu<'a> {
    /// Decodes a complete ATT PDU. Returns `None` if the PDU is empty or
    /// shorter than the minimum length for its opcode. Unrecognized opcodes
    /// decode as [`Pdu::Unknown`].
    #[must_use]
    pub fn decode(pdu: &'a [u8]) -> Option<Self> {
        let (&op, params) = pdu.split_first()?;
        let Ok(opc) = Opcode::try_from(op) else {
            return Some(Self::Unknown {
                opcode: op,
                data: params,
            });
        };
        let p = Unpacker::new(params);
        #[allow(clippy::match_same_arms)]
        match opc {
            Opcode::ErrorRsp => parse(p, |p| {
                Some(Self::ErrorRsp(ErrorRsp::new(
                    p.u8(),
                    p.u16(),
                    ErrorCode::from_raw(p.u8()),
                )))
            }),
            Opcode::ExchangeMtuReq => parse(p, |p| Some(Self::ExchangeMtuReq { mtu: p.u16() })),
            Opcode::ExchangeMtuRsp => parse(p, |p| Some(Self::ExchangeMtuRsp { mtu: p.u16() })),
            Opcode::FindInformationReq => parse(p, |p| {
                Some(Self::FindInformationReq {
                    start: p.u16(),
                    end: p.u16(),
                })
            }),
            Opcode::FindInformationRsp => parse(p, |p| {
                Some(Self::FindInformationRsp {
                    fmt: p.u8(),
                    data: rest(p),
                })
            }),
            Opcode::FindByTypeValueReq => parse(p, |p| {
                Some(Self::FindByTypeValueReq {
                    start: p.u16(),
                    end: p.u16(),
                    typ: p.u16(),
                    value: rest(p),
                })
            }),
            Opcode::FindByTypeValueRsp => parse(p, |p| Some(Self::FindByTypeValueRsp { data: rest(p) })),
            Opcode::ReadByTypeReq => parse(p, |p| {
                let (start, end) = (p.u16(), p.u16());
                let typ = Uuid::try_from(rest(p)).ok()?;
                Some(Self::ReadByTypeReq { start, end, typ })
            }),
            Opcode::ReadByTypeRsp => parse(p, |p| {
                Some(Self::ReadByTypeRsp {
                    len: p.u8(),
                    data: rest(p),
                })
            }),
            Opcode::ReadReq => parse(p, |p| Some(Self::ReadReq { hdl: p.u16() })),
            Opcode::ReadRsp => parse(p, |p| Some(Self::ReadRsp { value: rest(p) })),
            Opcode::ReadBlobReq => parse(p, |p| {
                Some(Self::ReadBlobReq {
                    hdl: p.u16(),
                    off: p.u16(),
                })
            }),
            Opcode::ReadBlobRsp => parse(p, |p| Some(Self::ReadBlobRsp { value: rest(p) })),
            Opcode::ReadByGroupTypeReq => parse(p, |p| {
                let (start, end) = (p.u16(), p.u16());
                let typ = Uuid::try_from(rest(p)).ok()?;
                Some(Self::ReadByGroupTypeReq { start, end, typ })
            }),
            Opcode::ReadByGroupTypeRsp => parse(p, |p| {
                Some(Self::ReadByGroupTypeRsp {
                    len: p.u8(),
                    data: rest(p),
                })
            }),
            Opcode::WriteReq => parse(p, |p| {
                Some(Self::WriteReq {
                    hdl: p.u16(),
                    value: rest(p),
                })
            }),
            Opcode::WriteRsp => Some(Self::WriteRsp),
            Opcode::WriteCmd => parse(p, |p| {
                Some(Self::WriteCmd {
                    hdl: p.u16(),
                    value: rest(p),
                })
            }),
            Opcode::HandleValueNtf => parse(p, |p| {
                Some(Self::HandleValueNtf {
                    hdl: p.u16(),
                    value: rest(p),
                })
            }),
            Opcode::HandleValueInd => parse(p, |p| {
                Some(Self::HandleValueInd {
                    hdl: p.u16(),
                    value: rest(p),
                })
            }),
            Opcode::HandleValueCfm => Some(Self::HandleValueCfm),
            _ => Some(Self::Unknown {
                opcode: op,
                data: params,
            }),
        }
    }

    /// Returns the raw opcode.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        use Opcode::*;
        let op = match *self {
            Self::ErrorRsp(_) => ErrorRsp,
            Self::ExchangeMtuReq { .. } => ExchangeMtuReq,
            Self::ExchangeMtuRsp { .. } => ExchangeMtuRsp,
            Self::FindInformationReq { .. } => FindInformationReq,
            Self::FindInformationRsp { .. } => FindInformationRsp,
            Self::FindByTypeValueReq { .. } => FindByTypeValueReq,
            Self::FindByTypeValueRsp { .. } => FindByTypeValueRsp,
            Self::ReadByTypeReq { .. } => ReadByTypeReq,
            Self::ReadByTypeRsp { .. } => ReadByTypeRsp,
            Self::ReadReq { .. } => ReadReq,
            Self::ReadRsp { .. } => ReadRsp,
            Self::ReadBlobReq { .. } => ReadBlobReq,
            Self::ReadBlobRsp { .. } => ReadBlobRsp,
            Self::ReadByGroupTypeReq { .. } => ReadByGroupTypeReq,
            Self::ReadByGroupTypeRsp { .. } => ReadByGroupTypeRsp,
            Self::WriteReq { .. } => WriteReq,
            Self::WriteRsp => WriteRsp,
            Self::WriteCmd { .. } => WriteCmd,
            Self::HandleValueNtf { .. } => HandleValueNtf,
            Self::HandleValueInd { .. } => HandleValueInd,
            Self::HandleValueCfm => HandleValueCfm,
            Self::Unknown { opcode, .. } => return opcode,
        };
        op.into()
    }
}

/// Encodes a PDU into `b`, calling `f` to write the parameters after the
/// opcode. Any existing contents of `b` are discarded.
#[inline]
fn pack(b: &mut LimitedBuf, op: Opcode, f: impl FnOnce(&mut Packer)) -> &[u8] {
    f(b.clear().append().u8(op));
    &**b
}

/// Returns the result of calling `f` to unpack PDU parameters or `None` if `f`
/// reads past the end. Unread trailing parameters are ignored.
#[inline]
fn parse<'a, T>(p: Unpacker<'a>, f: impl FnOnce(&mut Unpacker<'a>) -> Option<T>) -> Option<T> {
    p.map_or(None, |p| {
        let v = f(p);
        p.take();
        v
    })
}

/// Returns all remaining bytes of `p`.
#[inline]
fn rest<'a>(p: &mut Unpacker<'a>) -> &'a [u8] {
    p.take().into_inner()
}

/// Returns the prefix of `v` that fits in `b` after a header of `hdr` bytes.
#[inline]
fn fit<'v>(b: &LimitedBuf, hdr: usize, v: &'v [u8]) -> &'v [u8] {
    &v[..v.len().min(b.lim().saturating_sub(hdr))]
}

/// Encodes an `ATT_ERROR_RSP` PDU ([Vol 3] Part F, Section 3.4.1.1).
pub fn encode_error_rsp(b: &mut LimitedBuf, req: u8, hdl: u16, err: ErrorCode) -> &[u8] {
    pack(b, Opcode::ErrorRsp, |p| {
        p.u8(req).u16(hdl).u8(err);
    })
}

/// Encodes an `ATT_EXCHANGE_MTU_REQ` PDU ([Vol 3] Part F, Section 3.4.2.1).
pub fn encode_exchange_mtu_req(b: &mut LimitedBuf, mtu: u16) -> &[u8] {
    pack(b, Opcode::ExchangeMtuReq, |p| {
        p.u16(mtu);
    })
}

/// Encodes an `ATT_EXCHANGE_MTU_RSP` PDU ([Vol 3] Part F, Section 3.4.2.2).
pub fn encode_exchange_mtu_rsp(b: &mut LimitedBuf, mtu: u16) -> &[u8] {
    pack(b, Opcode::ExchangeMtuRsp, |p| {
        p.u16(mtu);
    })
}

/// Encodes an `ATT_FIND_INFORMATION_REQ` PDU
/// ([Vol 3] Part F, Section 3.4.3.1).
pub fn encode_find_information_req(b: &mut LimitedBuf, start: u16, end: u16) -> &[u8] {
    pack(b, Opcode::FindInformationReq, |p| {
        p.u16(start).u16(end);
    })
}

/// Encodes an `ATT_FIND_BY_TYPE_VALUE_REQ` PDU
/// ([Vol 3] Part F, Section 3.4.3.3).
pub fn encode_find_by_type_value_req<'b>(
    b: &'b mut LimitedBuf,
    start: u16,
    end: u16,
    typ: u16,
    value: &[u8],
) -> &'b [u8] {
    let value = fit(b, 7, value);
    pack(b, Opcode::FindByTypeValueReq, |p| {
        p.u16(start).u16(end).u16(typ).put(value);
    })
}

/// Encodes an `ATT_READ_BY_TYPE_REQ` PDU ([Vol 3] Part F, Section 3.4.4.1).
pub fn encode_read_by_type_req(b: &mut LimitedBuf, start: u16, end: u16, typ: Uuid) -> &[u8] {
    pack(b, Opcode::ReadByTypeReq, |p| {
        p.u16(start).u16(end).uuid(typ);
    })
}

/// Encodes an `ATT_READ_REQ` PDU ([Vol 3] Part F, Section 3.4.4.3).
pub fn encode_read_req(b: &mut LimitedBuf, hdl: u16) -> &[u8] {
    pack(b, Opcode::ReadReq, |p| {
        p.u16(hdl);
    })
}

/// Encodes an `ATT_READ_RSP` PDU ([Vol 3] Part F, Section 3.4.4.4). The value
/// is truncated to `b.lim() - 1` bytes.
pub fn encode_read_rsp<'b>(b: &'b mut LimitedBuf, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 1, value);
    pack(b, Opcode::ReadRsp, |p| {
        p.put(value);
    })
}

/// Encodes an `ATT_READ_BLOB_REQ` PDU ([Vol 3] Part F, Section 3.4.4.5).
pub fn encode_read_blob_req(b: &mut LimitedBuf, hdl: u16, off: u16) -> &[u8] {
    pack(b, Opcode::ReadBlobReq, |p| {
        p.u16(hdl).u16(off);
    })
}

/// Encodes an `ATT_READ_BLOB_RSP` PDU ([Vol 3] Part F, Section 3.4.4.6). The
/// value is truncated to `b.lim() - 1` bytes.
pub fn encode_read_blob_rsp<'b>(b: &'b mut LimitedBuf, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 1, value);
    pack(b, Opcode::ReadBlobRsp, |p| {
        p.put(value);
    })
}

/// Encodes an `ATT_READ_BY_GROUP_TYPE_REQ` PDU
/// ([Vol 3] Part F, Section 3.4.4.9).
pub fn encode_read_by_group_type_req(
    b: &mut LimitedBuf,
    start: u16,
    end: u16,
    typ: Uuid,
) -> &[u8] {
    pack(b, Opcode::ReadByGroupTypeReq, |p| {
        p.u16(start).u16(end).uuid(typ);
    })
}

/// Encodes an `ATT_WRITE_REQ` PDU ([Vol 3] Part F, Section 3.4.5.1).
pub fn encode_write_req<'b>(b: &'b mut LimitedBuf, hdl: u16, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 3, value);
    pack(b, Opcode::WriteReq, |p| {
        p.u16(hdl).put(value);
    })
}

/// Encodes an `ATT_WRITE_RSP` PDU ([Vol 3] Part F, Section 3.4.5.2).
pub fn encode_write_rsp(b: &mut LimitedBuf) -> &[u8] {
    pack(b, Opcode::WriteRsp, |_| {})
}

/// Encodes an `ATT_WRITE_CMD` PDU ([Vol 3] Part F, Section 3.4.5.3).
pub fn encode_write_cmd<'b>(b: &'b mut LimitedBuf, hdl: u16, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 3, value);
    pack(b, Opcode::WriteCmd, |p| {
        p.u16(hdl).put(value);
    })
}

/// Encodes an `ATT_HANDLE_VALUE_NTF` PDU ([Vol 3] Part F, Section 3.4.7.1).
/// The value is truncated to `b.lim() - 3` bytes.
pub fn encode_notification<'b>(b: &'b mut LimitedBuf, hdl: u16, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 3, value);
    pack(b, Opcode::HandleValueNtf, |p| {
        p.u16(hdl).put(value);
    })
}

/// Encodes an `ATT_HANDLE_VALUE_IND` PDU ([Vol 3] Part F, Section 3.4.7.2).
/// The value is truncated to `b.lim() - 3` bytes.
pub fn encode_indication<'b>(b: &'b mut LimitedBuf, hdl: u16, value: &[u8]) -> &'b [u8] {
    let value = fit(b, 3, value);
    pack(b, Opcode::HandleValueInd, |p| {
        p.u16(hdl).put(value);
    })
}

/// Encodes an `ATT_HANDLE_VALUE_CFM` PDU ([Vol 3] Part F, Section 3.4.7.3).
pub fn encode_confirmation(b: &mut LimitedBuf) -> &[u8] {
    pack(b, Opcode::HandleValueCfm, |_| {})
}

/// Encoder for discovery responses that carry a list of equal-length entries
/// ([Vol 3] Part F, Section 3.4.3.2, 3.4.3.4, 3.4.4.2, and 3.4.4.10). The
/// list ends at the first entry whose length differs from the first one or
/// that does not fit within the buffer limit.
#[derive(Debug)]
pub struct EntryList<'b> {
    b: &'b mut LimitedBuf,
    op: Opcode,
    hdr: Option<fn(usize) -> u8>,
    len: Option<usize>,
}

impl<'b> EntryList<'b> {
    /// Creates an entry list for response `op`. If `hdr` is specified, it is
    /// called with the length of the first entry to obtain the header byte
    /// that follows the opcode.
    #[inline]
    pub fn new(b: &'b mut LimitedBuf, op: Opcode, hdr: Option<fn(usize) -> u8>) -> Self {
        b.clear();
        Self {
            b,
            op,
            hdr,
            len: None,
        }
    }

    /// Creates an entry list whose header byte is the entry length.
    #[inline]
    pub fn with_len(b: &'b mut LimitedBuf, op: Opcode) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        fn len(n: usize) -> u8 {
            n as u8
        }
        Self::new(b, op, Some(len as fn(usize) -> u8))
    }

    /// Returns whether no entries have been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len.is_none()
    }

    /// Returns the maximum entry length that fits in an empty list.
    #[inline]
    #[must_use]
    pub fn max_entry_len(&self) -> usize {
        let hdr = 1 + usize::from(self.hdr.is_some());
        self.b.lim().saturating_sub(hdr)
    }

    /// Calls `f` to write an entry of `n` bytes. Returns `false` without
    /// writing anything if the list is complete.
    pub fn push(&mut self, n: usize, f: impl FnOnce(&mut Packer)) -> bool {
        match self.len {
            None => {
                if n > self.max_entry_len() {
                    return false;
                }
                let mut p = self.b.append();
                p.u8(self.op);
                if let Some(hdr) = self.hdr {
                    p.u8(hdr(n));
                }
                self.len = Some(n);
            }
            Some(len) if len != n || self.b.remaining() < n => return false,
            Some(_) => {}
        }
        let before = self.b.len();
        f(&mut self.b.append());
        debug_assert_eq!(self.b.len() - before, n);
        true
    }

    /// Returns the encoded PDU or `None` if the list is empty.
    #[inline]
    #[must_use]
    pub fn finish(self) -> Option<&'b [u8]> {
        let b: &'b LimitedBuf = self.b;
        if self.len.is_some() {
            Some(b.as_ref())
        } else {
            None
        }
    }
}

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::util::name_of;
use crate::LimitedBuf;

use super::*;

/// Characteristic value I/O callback. The callback receives the request and a
/// [`Writer`] for the response. If it does not respond, the server sends an
/// empty `ATT_READ_RSP` for reads and an `ATT_WRITE_RSP` for write requests.
#[derive(Clone)]
#[repr(transparent)]
pub struct Io(Arc<dyn Fn(&IoReq, &mut Writer) + Send + Sync>);

impl Io {
    /// Creates an I/O callback from a closure.
    #[inline(always)]
    pub fn new(f: impl Fn(&IoReq, &mut Writer) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Returns an I/O callback for a method of `T`.
    #[inline(always)]
    pub fn with<T: Send + Sync + 'static>(
        this: &Arc<T>,
        f: impl Fn(&T, &IoReq, &mut Writer) + Send + Sync + 'static,
    ) -> Self {
        let this = Arc::clone(this);
        Self(Arc::new(move |req: &IoReq, w: &mut Writer| f(&this, req, w)))
    }

    /// Invokes the callback and returns the response disposition.
    pub(super) fn call(&self, ctx: IoCtx, value: &[u8], b: &mut LimitedBuf) -> Reply {
        b.reset(usize::from(ctx.mtu));
        let req = IoReq {
            conn: ctx.conn,
            op: Op::from_opcode(ctx.req),
            hdl: ctx.hdl,
            idx: ctx.idx,
            uuid: ctx.uuid,
            off: ctx.off,
            value,
        };
        let mut w = Writer::new(b, ctx.req, ctx.hdl, ctx.off);
        (self.0)(&req, &mut w);
        w.finish()
    }
}

impl Debug for Io {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        (f.debug_tuple(name_of!(Io)).field(&Arc::as_ptr(&self.0))).finish()
    }
}

impl<T: Fn(&IoReq, &mut Writer) + Send + Sync + 'static> From<T> for Io {
    #[inline(always)]
    fn from(f: T) -> Self {
        Self(Arc::new(f))
    }
}

/// Request operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    /// `ATT_READ_REQ` or `ATT_READ_BLOB_REQ`.
    Read,
    /// `ATT_WRITE_REQ`.
    Write,
    /// `ATT_WRITE_CMD`. Any response is discarded.
    WriteCmd,
}

impl Op {
    #[inline]
    const fn from_opcode(op: Opcode) -> Self {
        match op {
            Opcode::WriteReq => Self::Write,
            Opcode::WriteCmd => Self::WriteCmd,
            _ => Self::Read,
        }
    }
}

/// Parameters of a characteristic value request that are independent of the
/// request payload.
#[derive(Clone, Copy, Debug)]
pub(super) struct IoCtx {
    pub conn: u16,
    pub req: Opcode,
    pub hdl: Handle,
    pub idx: usize,
    pub uuid: Uuid,
    pub off: u16,
    pub mtu: u16,
}

/// Characteristic value read or write request.
#[derive(Clone, Copy, Debug)]
pub struct IoReq<'a> {
    conn: u16,
    op: Op,
    hdl: Handle,
    idx: usize,
    uuid: Uuid,
    off: u16,
    value: &'a [u8],
}

impl IoReq<'_> {
    /// Returns the connection handle.
    #[inline(always)]
    #[must_use]
    pub const fn conn(&self) -> u16 {
        self.conn
    }

    /// Returns the operation.
    #[inline(always)]
    #[must_use]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// Returns the characteristic value handle.
    #[inline(always)]
    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.hdl
    }

    /// Returns the characteristic index.
    #[inline(always)]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.idx
    }

    /// Returns the characteristic UUID.
    #[inline(always)]
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the read offset. Always 0 for writes.
    #[inline(always)]
    #[must_use]
    pub const fn offset(&self) -> u16 {
        self.off
    }

    /// Returns the written value. Always empty for reads.
    #[inline(always)]
    #[must_use]
    pub const fn value(&self) -> &[u8] {
        self.value
    }
}

/// Outcome of handling one PDU.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Reply {
    /// The response buffer contains a PDU to send.
    Send,
    /// Nothing to send.
    Silent,
}

/// Response writer passed to I/O callbacks. Each call replaces any previous
/// response.
#[derive(Debug)]
pub struct Writer<'a> {
    b: &'a mut LimitedBuf,
    req: Opcode,
    hdl: Handle,
    off: u16,
    done: bool,
}

impl<'a> Writer<'a> {
    #[inline]
    fn new(b: &'a mut LimitedBuf, req: Opcode, hdl: Handle, off: u16) -> Self {
        Self {
            b,
            req,
            hdl,
            off,
            done: false,
        }
    }

    /// Responds to a read with the complete attribute value. The request
    /// offset is applied and the result is truncated to fit the MTU. Responds
    /// with [`ErrorCode::InvalidOffset`] if the offset is past the end of `v`.
    /// For writes, this is equivalent to [`Writer::respond_write_ok`].
    pub fn respond(&mut self, v: impl AsRef<[u8]>) {
        let v = v.as_ref();
        match self.req {
            Opcode::ReadReq | Opcode::ReadBlobReq => {
                let Some(v) = v.get(usize::from(self.off)..) else {
                    return self.err(ErrorCode::InvalidOffset);
                };
                if self.req == Opcode::ReadReq {
                    encode_read_rsp(self.b, v);
                } else {
                    encode_read_blob_rsp(self.b, v);
                }
                self.done = true;
            }
            _ => self.respond_write_ok(),
        }
    }

    /// Acknowledges a write.
    pub fn respond_write_ok(&mut self) {
        if self.req == Opcode::WriteReq {
            encode_write_rsp(self.b);
        }
        self.done = true;
    }

    /// Responds with an error.
    pub fn err(&mut self, err: ErrorCode) {
        encode_error_rsp(self.b, self.req.into(), self.hdl.into(), err);
        self.done = true;
    }

    /// Returns whether a response was written.
    #[inline(always)]
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Writes the default response if the callback did not respond.
    fn finish(self) -> Reply {
        if self.req == Opcode::WriteCmd {
            return Reply::Silent;
        }
        if !self.done {
            match self.req {
                Opcode::ReadReq => encode_read_rsp(self.b, &[]),
                Opcode::ReadBlobReq => encode_read_blob_rsp(self.b, &[]),
                _ => encode_write_rsp(self.b),
            };
        }
        Reply::Send
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(req: Opcode, off: u16) -> IoCtx {
        IoCtx {
            conn: 0x40,
            req,
            hdl: Handle::new(3).unwrap(),
            idx: 0,
            uuid: Uuid::Uuid16(0x2A37),
            off,
            mtu: 23,
        }
    }

    #[test]
    fn default_response() {
        let io = Io::new(|_, _| {});
        let mut b = LimitedBuf::default();
        assert_eq!(io.call(ctx(Opcode::ReadReq, 0), &[], &mut b), Reply::Send);
        assert_eq!(b.as_ref(), &[0x0B]);
        assert_eq!(io.call(ctx(Opcode::WriteReq, 0), &[1], &mut b), Reply::Send);
        assert_eq!(b.as_ref(), &[0x13]);
        assert_eq!(io.call(ctx(Opcode::WriteCmd, 0), &[1], &mut b), Reply::Silent);
    }

    #[test]
    fn read_offset() {
        let io = Io::new(|req, w| {
            assert_eq!((req.conn(), req.op()), (0x40, Op::Read));
            w.respond([1, 2, 3]);
        });
        let mut b = LimitedBuf::default();
        io.call(ctx(Opcode::ReadBlobReq, 1), &[], &mut b);
        assert_eq!(b.as_ref(), &[0x0D, 2, 3]);
        io.call(ctx(Opcode::ReadBlobReq, 3), &[], &mut b);
        assert_eq!(b.as_ref(), &[0x0D]);
        io.call(ctx(Opcode::ReadBlobReq, 4), &[], &mut b);
        assert_eq!(b.as_ref(), &[0x01, 0x0C, 0x03, 0x00, 0x07]);
    }

    #[test]
    fn read_truncated() {
        let io = Io::new(|_, w| w.respond([0xAA; 64]));
        let mut b = LimitedBuf::default();
        io.call(ctx(Opcode::ReadReq, 0), &[], &mut b);
        assert_eq!(b.len(), 23);
    }

    #[test]
    fn method_callback() {
        struct Dev(u8);
        let dev = Arc::new(Dev(0x48));
        let io = Io::with(&dev, |d, _, w| w.respond([d.0]));
        let mut b = LimitedBuf::default();
        io.call(ctx(Opcode::ReadReq, 0), &[], &mut b);
        assert_eq!(b.as_ref(), &[0x0B, 0x48]);
    }
}

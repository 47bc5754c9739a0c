use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use structbuf::{Pack, Unpack};

use crate::{LimitedBuf, WaitGroup};

use super::dispatch::{AsyncDispatch, Job};
use super::io::{IoCtx, Reply};
use super::*;

/// Characteristic state.
#[derive(Debug)]
struct CharState {
    uuid: Uuid,
    props: CharProps,
    value: Handle,
    cccd: Option<Handle>,
    cfg: Cccd,
    io: Option<Io>,
}

/// Primary service handle range.
#[derive(Clone, Copy, Debug)]
struct Group {
    start: Handle,
    end: Handle,
    uuid: Uuid,
}

/// GATT server for a static schema. `ATTRS` and `CHARS` bound the number of
/// attributes and characteristics, and are usually set from
/// [`Schema::attr_count`] and [`Schema::char_count`]:
///
/// ```
/// use warble::att::Uuid;
/// use warble::gatt::{CharDef, CharProps, Schema, Server, ServiceDef};
///
/// const SCHEMA: Schema = Schema::new(&[ServiceDef::new(
///     Uuid::Uuid16(0x180F),
///     &[CharDef::new(Uuid::Uuid16(0x2A19), CharProps::READ)],
/// )]);
/// let srv = Server::<{ SCHEMA.attr_count() }, { SCHEMA.char_count() }>::new(SCHEMA).unwrap();
/// assert_eq!(srv.db().len(), 3);
/// ```
///
/// Handles are assigned sequentially from 1 in schema order: each service
/// declaration is followed by each of its characteristics as a declaration,
/// a value, and a CCCD if the characteristic supports notifications or
/// indications.
#[derive(Debug)]
pub struct Server<const ATTRS: usize = 64, const CHARS: usize = 16> {
    schema: Schema,
    db: AttributeDatabase<ATTRS>,
    chars: heapless::Vec<CharState, CHARS>,
    groups: heapless::Vec<Group, ATTRS>,
    mtu: u16,
    dispatch: Option<AsyncDispatch>,
    wg: Arc<WaitGroup>,
}

impl<const ATTRS: usize, const CHARS: usize> Server<ATTRS, CHARS> {
    /// Creates a server and populates its attribute database from `schema`.
    pub fn new(schema: Schema) -> Result<Self> {
        let (need, nchars) = (schema.attr_count(), schema.char_count());
        if need > ATTRS {
            return Err(Error::TooManyAttributes { need, cap: ATTRS });
        }
        if nchars > CHARS {
            return Err(Error::TooManyCharacteristics {
                need: nchars,
                cap: CHARS,
            });
        }
        let mut srv = Self {
            schema,
            db: AttributeDatabase::new(),
            chars: heapless::Vec::new(),
            groups: heapless::Vec::new(),
            mtu: DEFAULT_MTU,
            dispatch: None,
            wg: WaitGroup::new(),
        };
        let mut next = Some(Handle::MIN);
        let mut alloc = || {
            let h = next.ok_or(Error::HandleOverflow)?;
            next = h.next();
            Ok::<_, Error>(h)
        };
        let mut v = LimitedBuf::new(MAX_STATIC_VAL);
        for svc in schema.services() {
            let start = alloc()?;
            v.clear().append().uuid(svc.uuid);
            srv.add(start, Declaration::PrimaryService.uuid(), &v, Perms::READ)?;
            let mut end = start;
            for chr in svc.chars {
                let (decl, value) = (alloc()?, alloc()?);
                v.clear().append().u8(chr.props.bits()).u16(value).uuid(chr.uuid);
                srv.add(decl, Declaration::Characteristic.uuid(), &v, Perms::READ)?;
                srv.add(value, chr.uuid, &[], value_perms(chr.props))?;
                end = value;
                let cccd = if chr.props.has_cccd() {
                    end = alloc()?;
                    let typ = Descriptor::ClientCharacteristicConfiguration.uuid();
                    srv.add(end, typ, &[0, 0], Perms::READ | Perms::WRITE)?;
                    Some(end)
                } else {
                    None
                };
                let st = CharState {
                    uuid: chr.uuid,
                    props: chr.props,
                    value,
                    cccd,
                    cfg: Cccd::empty(),
                    io: None,
                };
                (srv.chars.push(st)).map_err(|_| Error::TooManyCharacteristics {
                    need: nchars,
                    cap: CHARS,
                })?;
            }
            (srv.groups.push(Group {
                start,
                end,
                uuid: svc.uuid,
            }))
            .map_err(|_| Error::TooManyAttributes { need, cap: ATTRS })?;
        }
        debug!(
            "GATT server with {} attributes and {} characteristics",
            srv.db.len(),
            srv.chars.len()
        );
        Ok(srv)
    }

    /// Returns the schema.
    #[inline(always)]
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the attribute database.
    #[inline(always)]
    #[must_use]
    pub const fn db(&self) -> &AttributeDatabase<ATTRS> {
        &self.db
    }

    /// Returns the negotiated ATT MTU.
    #[inline(always)]
    #[must_use]
    pub const fn mtu(&self) -> u16 {
        self.mtu
    }

    /// Returns the value handle of characteristic `idx`.
    #[inline]
    #[must_use]
    pub fn value_handle(&self, idx: usize) -> Option<Handle> {
        self.chars.get(idx).map(|c| c.value)
    }

    /// Returns the CCCD handle of characteristic `idx`.
    #[inline]
    #[must_use]
    pub fn cccd_handle(&self, idx: usize) -> Option<Handle> {
        self.chars.get(idx).and_then(|c| c.cccd)
    }

    /// Binds an I/O callback to characteristic `chr` of service `svc`,
    /// returning the characteristic index.
    pub fn bind(&mut self, svc: Uuid, chr: Uuid, io: impl Into<Io>) -> Result<usize> {
        let idx = (self.schema.char_index(svc, chr))
            .ok_or(Error::UnknownCharacteristic { svc, chr })?;
        self.bind_index(idx, io)?;
        Ok(idx)
    }

    /// Binds an I/O callback to characteristic `idx`, replacing any previous
    /// binding.
    pub fn bind_index(&mut self, idx: usize, io: impl Into<Io>) -> Result<()> {
        let c = self.chars.get_mut(idx).ok_or(Error::InvalidIndex(idx))?;
        debug!("Bound characteristic {idx} ({}) at {}", c.uuid, c.value);
        c.io = Some(io.into());
        Ok(())
    }

    /// Removes the I/O callback of characteristic `idx`.
    pub fn unbind(&mut self, idx: usize) -> Option<Io> {
        self.chars.get_mut(idx).and_then(|c| c.io.take())
    }

    /// Enables asynchronous dispatch of bound characteristic reads and
    /// writes. Requests are executed by `spawner`, and responses are passed
    /// to `on_rsp` in completion order. Requests that cannot be spawned or
    /// exceed `cfg.max_in_flight` are handled synchronously.
    ///
    /// `ATT_READ_BY_TYPE_REQ` is the exception: a single response may combine
    /// several characteristic values, so bound handlers matched by it are
    /// always called synchronously.
    pub fn enable_async(
        &mut self,
        spawner: impl Spawn + 'static,
        cfg: AsyncConfig,
        on_rsp: impl Fn(u16, &[u8]) + Send + Sync + 'static,
    ) {
        debug!("GATT async dispatch enabled: {cfg:?}");
        let on_rsp: RspFn = Arc::new(on_rsp);
        self.dispatch = Some(AsyncDispatch::new(
            Arc::new(spawner),
            cfg,
            on_rsp,
            Arc::clone(&self.wg),
        ));
    }

    /// Restores synchronous dispatch. Tasks already in flight still complete
    /// and deliver their responses.
    pub fn disable_async(&mut self) {
        self.dispatch = None;
    }

    /// Returns the wait group tracking asynchronous handler tasks.
    #[inline(always)]
    #[must_use]
    pub fn wait_group(&self) -> &Arc<WaitGroup> {
        &self.wg
    }

    /// Returns the client configuration of characteristic `idx`.
    #[inline]
    #[must_use]
    pub fn cccd(&self, idx: usize) -> Option<Cccd> {
        self.chars.get(idx).map(|c| c.cfg)
    }

    /// Returns whether the client enabled notifications for characteristic
    /// `idx`.
    #[inline]
    #[must_use]
    pub fn is_notify_enabled(&self, idx: usize) -> bool {
        self.cccd(idx).map_or(false, |c| c.contains(Cccd::NOTIFY))
    }

    /// Returns whether the client enabled indications for characteristic
    /// `idx`.
    #[inline]
    #[must_use]
    pub fn is_indicate_enabled(&self, idx: usize) -> bool {
        self.cccd(idx).map_or(false, |c| c.contains(Cccd::INDICATE))
    }

    /// Encodes a notification for characteristic `idx` into `b` if the client
    /// enabled notifications. The value is truncated to the MTU.
    pub fn notify<'b>(&self, idx: usize, v: &[u8], b: &'b mut LimitedBuf) -> Option<&'b [u8]> {
        let c = self.chars.get(idx)?;
        if !c.cfg.contains(Cccd::NOTIFY) {
            trace!("Notifications disabled for {}", c.value);
            return None;
        }
        b.reset(usize::from(self.mtu));
        Some(encode_notification(b, c.value.into(), v))
    }

    /// Encodes an indication for characteristic `idx` into `b` if the client
    /// enabled indications. The value is truncated to the MTU.
    pub fn indicate<'b>(&self, idx: usize, v: &[u8], b: &'b mut LimitedBuf) -> Option<&'b [u8]> {
        let c = self.chars.get(idx)?;
        if !c.cfg.contains(Cccd::INDICATE) {
            trace!("Indications disabled for {}", c.value);
            return None;
        }
        b.reset(usize::from(self.mtu));
        Some(encode_indication(b, c.value.into(), v))
    }

    /// Resets per-connection state: the MTU and all client configurations.
    pub fn reset(&mut self) {
        self.mtu = DEFAULT_MTU;
        for c in &mut self.chars {
            c.cfg = Cccd::empty();
            if let Some(h) = c.cccd {
                // Cannot fail for an existing CCCD handle
                let _ = self.db.write(h, &[0, 0]);
            }
        }
    }

    /// Logs the attribute table and characteristic bindings.
    pub fn dump(&self) {
        info!("GATT database (MTU {}):", self.mtu);
        for at in self.db.iter() {
            info!(
                "  [{:#06X}] {} {:?} {:02X?}",
                u16::from(at.handle),
                at.typ,
                at.perms,
                at.value.as_slice()
            );
        }
        for (i, c) in self.chars.iter().enumerate() {
            info!(
                "  char[{i}] {} {:?} value={} cccd={:?} bound={}",
                c.uuid,
                c.props,
                c.value,
                c.cfg,
                c.io.is_some()
            );
        }
    }

    /// Handles one complete ATT PDU received on connection `conn`. Returns
    /// the response PDU encoded into `rsp`, or `None` if there is nothing to
    /// send now. With asynchronous dispatch enabled, the response to a bound
    /// characteristic read or write is delivered later via the response
    /// callback.
    pub fn handle_pdu<'b>(
        &mut self,
        conn: u16,
        pdu: &[u8],
        rsp: &'b mut LimitedBuf,
    ) -> Option<&'b [u8]> {
        rsp.reset(usize::from(self.mtu));
        // [Vol 3] Part F, Section 3.3
        let Some(&op) = pdu.first() else {
            warn!("Empty ATT PDU from {conn:#06X}");
            return Some(encode_error_rsp(rsp, 0, 0, ErrorCode::InvalidPdu));
        };
        let r = match Pdu::decode(pdu) {
            Some(req) => {
                trace!("{conn:#06X} -> {req:02X?}");
                self.handle(conn, req, rsp)
            }
            None => Err(ErrorRsp::new(op, 0, ErrorCode::InvalidPdu)),
        };
        match r {
            Ok(Reply::Send) => {
                let rsp: &'b LimitedBuf = rsp;
                trace!("{conn:#06X} <- {:02X?}", rsp.as_ref());
                Some(rsp.as_ref())
            }
            Ok(Reply::Silent) => None,
            Err(e) if Opcode::is_cmd(e.req) => {
                warn!("Dropped command: {e}");
                None
            }
            Err(e) => {
                warn!("{e}");
                Some(e.encode(rsp))
            }
        }
    }

    /// Dispatches a decoded PDU to its handler.
    fn handle(&mut self, conn: u16, req: Pdu, rsp: &mut LimitedBuf) -> RspResult<Reply> {
        match req {
            Pdu::ExchangeMtuReq { mtu } => self.exchange_mtu(mtu, rsp),
            Pdu::FindInformationReq { start, end } => self.find_information(start, end, rsp),
            Pdu::FindByTypeValueReq {
                start,
                end,
                typ,
                value,
            } => self.find_by_type_value(start, end, typ, value, rsp),
            Pdu::ReadByTypeReq { start, end, typ } => {
                self.read_by_type(conn, start, end, typ, rsp)
            }
            Pdu::ReadReq { hdl } => self.read(conn, Opcode::ReadReq, hdl, 0, rsp),
            Pdu::ReadBlobReq { hdl, off } => self.read(conn, Opcode::ReadBlobReq, hdl, off, rsp),
            Pdu::ReadByGroupTypeReq { start, end, typ } => {
                self.read_by_group_type(start, end, typ, rsp)
            }
            Pdu::WriteReq { hdl, value } => self.write(conn, Opcode::WriteReq, hdl, value, rsp),
            Pdu::WriteCmd { hdl, value } => self.write(conn, Opcode::WriteCmd, hdl, value, rsp),
            Pdu::HandleValueCfm => {
                debug!("Indication confirmed by {conn:#06X}");
                Ok(Reply::Silent)
            }
            req => {
                let op = req.opcode();
                Err(ErrorRsp::new(op, 0, ErrorCode::RequestNotSupported))
            }
        }
    }

    /// Handles `ATT_EXCHANGE_MTU_REQ` ([Vol 3] Part F, Section 3.4.2).
    fn exchange_mtu(&mut self, client: u16, rsp: &mut LimitedBuf) -> RspResult<Reply> {
        self.mtu = client.clamp(DEFAULT_MTU, MAX_MTU);
        debug!("ATT MTU: {} (client {client})", self.mtu);
        encode_exchange_mtu_rsp(rsp, MAX_MTU);
        Ok(Reply::Send)
    }

    /// Handles `ATT_FIND_INFORMATION_REQ` ([Vol 3] Part F, Section 3.4.3.1).
    fn find_information(&self, start: u16, end: u16, rsp: &mut LimitedBuf) -> RspResult<Reply> {
        /// Returns the response format for entries of `n` bytes.
        fn fmt(n: usize) -> u8 {
            if n == 4 {
                0x01
            } else {
                0x02
            }
        }
        let op = Opcode::FindInformationReq;
        let range = range(op, start, end)?;
        let mut list = EntryList::new(rsp, Opcode::FindInformationRsp, Some(fmt as fn(_) -> _));
        for at in self.db.range(range) {
            if !list.push(2 + at.typ.len(), |p| {
                p.u16(at.handle).uuid(at.typ);
            }) {
                break;
            }
        }
        found(op, start, &list)
    }

    /// Handles `ATT_FIND_BY_TYPE_VALUE_REQ` ([Vol 3] Part F, Section 3.4.3.3).
    fn find_by_type_value(
        &self,
        start: u16,
        end: u16,
        typ: u16,
        value: &[u8],
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let op = Opcode::FindByTypeValueReq;
        let range = range(op, start, end)?;
        let mut list = EntryList::new(rsp, Opcode::FindByTypeValueRsp, None);
        if typ == u16::from(Declaration::PrimaryService) {
            let uuid = Uuid::try_from(value).ok();
            let it = (self.groups.iter()).filter(|g| range.contains(g.start) && Some(g.uuid) == uuid);
            for g in it {
                if !list.push(4, |p| {
                    p.u16(g.start).u16(g.end);
                }) {
                    break;
                }
            }
        } else {
            let it = (self.db.find_by_type(range, Uuid::Uuid16(typ)))
                .filter(|at| at.value.as_slice() == value);
            for at in it {
                if !list.push(4, |p| {
                    p.u16(at.handle).u16(at.handle);
                }) {
                    break;
                }
            }
        }
        found(op, start, &list)
    }

    /// Handles `ATT_READ_BY_TYPE_REQ` ([Vol 3] Part F, Section 3.4.4.1).
    /// Bound characteristic values are read synchronously.
    fn read_by_type(
        &self,
        conn: u16,
        start: u16,
        end: u16,
        typ: Uuid,
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let op = Opcode::ReadByTypeReq;
        let range = range(op, start, end)?;
        let mut tmp = LimitedBuf::new(usize::from(self.mtu));
        let mut list = EntryList::with_len(rsp, Opcode::ReadByTypeRsp);
        // Entry length must fit in the u8 length field
        let max_val = list.max_entry_len().min(usize::from(u8::MAX)) - 2;
        for at in self.db.find_by_type(range, typ) {
            if !at.is_readable() {
                if list.is_empty() {
                    return op.hdl_err(ErrorCode::ReadNotPermitted, at.handle.into());
                }
                break;
            }
            let v = match self.bound(at.handle) {
                Some((idx, io)) => {
                    let ctx = self.ctx(conn, Opcode::ReadReq, idx, 0);
                    io.call(ctx, &[], &mut tmp);
                    match Pdu::decode(&tmp) {
                        Some(Pdu::ReadRsp { value }) => value,
                        Some(Pdu::ErrorRsp(e)) if list.is_empty() => {
                            return op.hdl_err(e.err, e.hdl);
                        }
                        _ => break,
                    }
                }
                None => at.value.as_slice(),
            };
            let v = &v[..v.len().min(max_val)];
            if !list.push(2 + v.len(), |p| {
                p.u16(at.handle).put(v);
            }) {
                break;
            }
        }
        found(op, start, &list)
    }

    /// Handles `ATT_READ_REQ` and `ATT_READ_BLOB_REQ`
    /// ([Vol 3] Part F, Section 3.4.4.3 and 3.4.4.5).
    fn read(
        &self,
        conn: u16,
        op: Opcode,
        hdl: u16,
        off: u16,
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let at = self.attr(op, hdl)?;
        if !at.is_readable() {
            return op.hdl_err(ErrorCode::ReadNotPermitted, hdl);
        }
        if let Some((idx, io)) = self.bound(at.handle) {
            return Ok(self.invoke(io, self.ctx(conn, op, idx, off), &[], rsp));
        }
        let Some(v) = at.value.get(usize::from(off)..) else {
            return op.hdl_err(ErrorCode::InvalidOffset, hdl);
        };
        if op == Opcode::ReadReq {
            encode_read_rsp(rsp, v);
        } else {
            encode_read_blob_rsp(rsp, v);
        }
        Ok(Reply::Send)
    }

    /// Handles `ATT_READ_BY_GROUP_TYPE_REQ` ([Vol 3] Part F, Section 3.4.4.9).
    fn read_by_group_type(
        &self,
        start: u16,
        end: u16,
        typ: Uuid,
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let op = Opcode::ReadByGroupTypeReq;
        let range = range(op, start, end)?;
        if typ == Declaration::SecondaryService.uuid() {
            return op.hdl_err(ErrorCode::AttributeNotFound, start);
        }
        if typ != Declaration::PrimaryService.uuid() {
            return op.hdl_err(ErrorCode::UnsupportedGroupType, start);
        }
        let mut list = EntryList::with_len(rsp, Opcode::ReadByGroupTypeRsp);
        for g in (self.groups.iter()).filter(|g| range.contains(g.start)) {
            if !list.push(4 + g.uuid.len(), |p| {
                p.u16(g.start).u16(g.end).uuid(g.uuid);
            }) {
                break;
            }
        }
        found(op, start, &list)
    }

    /// Handles `ATT_WRITE_REQ` and `ATT_WRITE_CMD`
    /// ([Vol 3] Part F, Section 3.4.5).
    fn write(
        &mut self,
        conn: u16,
        op: Opcode,
        hdl: u16,
        value: &[u8],
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let at = self.attr(op, hdl)?;
        let (h, writable) = (at.handle, at.is_writable());
        if let Some(idx) = self.chars.iter().position(|c| c.cccd == Some(h)) {
            return self.write_cccd(op, idx, value, rsp);
        }
        if !writable {
            return op.hdl_err(ErrorCode::WriteNotPermitted, hdl);
        }
        if let Some((idx, io)) = self.bound(h) {
            return Ok(self.invoke(io, self.ctx(conn, op, idx, 0), value, rsp));
        }
        trace!("Write to unbound {h}");
        Ok(write_ack(op, rsp))
    }

    /// Updates the client configuration of characteristic `idx`
    /// ([Vol 3] Part G, Section 3.3.3.3).
    fn write_cccd(
        &mut self,
        op: Opcode,
        idx: usize,
        value: &[u8],
        rsp: &mut LimitedBuf,
    ) -> RspResult<Reply> {
        let c = &mut self.chars[idx];
        let Some(h) = c.cccd else {
            return op.err(ErrorCode::UnlikelyError);
        };
        let Some(raw) = (value.len() == 2).then(|| value.unpack().u16()) else {
            return op.hdl_err(ErrorCode::InvalidAttributeValueLength, h.into());
        };
        let mut allowed = Cccd::empty();
        allowed.set(Cccd::NOTIFY, c.props.contains(CharProps::NOTIFY));
        allowed.set(Cccd::INDICATE, c.props.contains(CharProps::INDICATE));
        c.cfg = Cccd::from_bits_truncate(raw) & allowed;
        debug!("Client configuration of {} ({}): {:?}", c.uuid, c.value, c.cfg);
        let bits = c.cfg.bits().to_le_bytes();
        (self.db.write(h, &bits)).map_err(|_| ErrorRsp::new(op.into(), h.into(), ErrorCode::UnlikelyError))?;
        Ok(write_ack(op, rsp))
    }

    /// Adds an attribute to the database.
    fn add(&mut self, h: Handle, typ: Uuid, v: &[u8], perms: Perms) -> Result<()> {
        self.db.add(Attribute::new(h, typ, v, perms)?)?;
        Ok(())
    }

    /// Invokes a bound I/O callback, asynchronously if possible.
    fn invoke(&self, io: &Io, ctx: IoCtx, value: &[u8], rsp: &mut LimitedBuf) -> Reply {
        let Some(d) = &self.dispatch else {
            return io.call(ctx, value, rsp);
        };
        let job = Job {
            ctx,
            io: io.clone(),
            value: LimitedBuf::from(value),
        };
        match d.submit(job) {
            Ok(()) => Reply::Silent,
            Err(job) => job.run(rsp),
        }
    }

    /// Returns the attribute with raw handle `hdl`.
    fn attr(&self, op: Opcode, hdl: u16) -> RspResult<&Attribute> {
        let Some(h) = Handle::new(hdl) else {
            return op.hdl_err(ErrorCode::InvalidHandle, hdl);
        };
        (self.db.find_by_handle(h)).map_or_else(|| op.hdl_err(ErrorCode::AttributeNotFound, hdl), Ok)
    }

    /// Returns the index and callback of the characteristic bound to value
    /// handle `h`.
    fn bound(&self, h: Handle) -> Option<(usize, &Io)> {
        (self.chars.iter().enumerate())
            .find(|(_, c)| c.value == h)
            .and_then(|(i, c)| c.io.as_ref().map(|io| (i, io)))
    }

    /// Returns the I/O context for characteristic `idx`.
    fn ctx(&self, conn: u16, req: Opcode, idx: usize, off: u16) -> IoCtx {
        let c = &self.chars[idx];
        IoCtx {
            conn,
            req,
            hdl: c.value,
            idx,
            uuid: c.uuid,
            off,
            mtu: self.mtu,
        }
    }
}

/// Returns the attribute permissions of a characteristic value.
fn value_perms(props: CharProps) -> Perms {
    let mut p = Perms::empty();
    p.set(Perms::READ, props.contains(CharProps::READ));
    p.set(Perms::WRITE, props.is_writable());
    p
}

/// Converts raw discovery request parameters to a handle range.
fn range(op: Opcode, start: u16, end: u16) -> RspResult<HandleRange> {
    HandleRange::new(start, end).map_or_else(|| op.hdl_err(ErrorCode::InvalidHandle, start), Ok)
}

/// Returns the result of a discovery request.
fn found(op: Opcode, start: u16, list: &EntryList<'_>) -> RspResult<Reply> {
    if list.is_empty() {
        return op.hdl_err(ErrorCode::AttributeNotFound, start);
    }
    Ok(Reply::Send)
}

/// Encodes the response to a successful write.
fn write_ack(op: Opcode, rsp: &mut LimitedBuf) -> Reply {
    if op == Opcode::WriteReq {
        encode_write_rsp(rsp);
        Reply::Send
    } else {
        Reply::Silent
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use matches::assert_matches;
use parking_lot::Mutex;

use crate::LimitedBuf;

use super::*;

const CONN: u16 = 0x0040;
const NUS: u128 = 0x6E40_0001_B5A3_F393_E0A9_E50E_24DC_CA9E;
const RW: CharProps = CharProps::READ
    .union(CharProps::WRITE)
    .union(CharProps::WRITE_WITHOUT_RESPONSE)
    .union(CharProps::INDICATE);

const SCHEMA: Schema = Schema::new(&[
    ServiceDef::new(
        Uuid::Uuid16(0x180D),
        &[
            CharDef::new(Uuid::Uuid16(0x2A37), CharProps::READ.union(CharProps::NOTIFY)),
            CharDef::new(Uuid::Uuid16(0x2A38), CharProps::READ),
        ],
    ),
    ServiceDef::new(Uuid::Uuid128(NUS), &[CharDef::new(Uuid::Uuid128(NUS + 1), RW)]),
    ServiceDef::new(
        Uuid::Uuid16(0x180F),
        &[CharDef::new(Uuid::Uuid16(0x2A19), CharProps::READ)],
    ),
]);

type TestServer = Server<{ SCHEMA.attr_count() }, { SCHEMA.char_count() }>;

fn server() -> TestServer {
    TestServer::new(SCHEMA).unwrap()
}

fn call(srv: &mut TestServer, pdu: &[u8]) -> Option<Vec<u8>> {
    let mut b = LimitedBuf::default();
    srv.handle_pdu(CONN, pdu, &mut b).map(<[u8]>::to_vec)
}

fn err(req: u8, hdl: u16, e: ErrorCode) -> Option<Vec<u8>> {
    let [lo, hi] = hdl.to_le_bytes();
    Some(vec![0x01, req, lo, hi, e.into()])
}

fn nus(v: u128) -> [u8; 16] {
    v.to_le_bytes()
}

#[test]
fn handles() {
    let srv = server();
    let hdls: Vec<u16> = srv.db().iter().map(|at| at.handle.into()).collect();
    assert_eq!(hdls, (1..=13).collect::<Vec<_>>());
    assert_eq!(srv.value_handle(0).map(u16::from), Some(3));
    assert_eq!(srv.cccd_handle(0).map(u16::from), Some(4));
    assert_eq!(srv.value_handle(1).map(u16::from), Some(6));
    assert_eq!(srv.cccd_handle(1), None);
    assert_eq!(srv.value_handle(2).map(u16::from), Some(9));
    assert_eq!(srv.cccd_handle(2).map(u16::from), Some(10));
    assert_eq!(srv.value_handle(3).map(u16::from), Some(13));
    assert_eq!(srv.value_handle(4), None);

    let decl = srv.db().find_by_handle(Handle::new(2).unwrap()).unwrap();
    assert_eq!(decl.typ, Declaration::Characteristic.uuid());
    assert_eq!(decl.value.as_slice(), &[0x12, 0x03, 0x00, 0x37, 0x2A]);
    let cccd = srv.db().find_by_handle(Handle::new(10).unwrap()).unwrap();
    assert_eq!(cccd.typ, Descriptor::ClientCharacteristicConfiguration.uuid());
    assert_eq!(cccd.perms, Perms::READ | Perms::WRITE);
    let ro = srv.db().find_by_handle(Handle::new(13).unwrap()).unwrap();
    assert!(ro.is_readable() && !ro.is_writable());
}

#[test]
fn capacity() {
    assert_matches!(
        Server::<4, 4>::new(SCHEMA),
        Err(Error::TooManyAttributes { need: 13, cap: 4 })
    );
    assert_matches!(
        Server::<13, 2>::new(SCHEMA),
        Err(Error::TooManyCharacteristics { need: 4, cap: 2 })
    );
    assert!(Server::<13, 4>::new(SCHEMA).is_ok());
}

#[test]
fn bind() {
    let mut srv = server();
    let idx = srv.bind(Uuid::Uuid16(0x180F), Uuid::Uuid16(0x2A19), |_: &IoReq, w: &mut Writer| {
        w.respond([100]);
    });
    assert_eq!(idx, Ok(3));
    assert_eq!(call(&mut srv, &[0x0A, 13, 0]), Some(vec![0x0B, 100]));
    assert!(srv.unbind(3).is_some());
    assert_eq!(call(&mut srv, &[0x0A, 13, 0]), Some(vec![0x0B]));
    assert_matches!(
        srv.bind(Uuid::Uuid16(0x180D), Uuid::Uuid16(0x2A19), |_: &IoReq, _: &mut Writer| {}),
        Err(Error::UnknownCharacteristic { .. })
    );
    assert_eq!(
        srv.bind_index(4, |_: &IoReq, _: &mut Writer| {}),
        Err(Error::InvalidIndex(4))
    );
}

#[test]
fn exchange_mtu() {
    let mut srv = server();
    assert_eq!(srv.mtu(), DEFAULT_MTU);
    assert_eq!(call(&mut srv, &[0x02, 0x00, 0x01]), Some(vec![0x03, 0x05, 0x02]));
    assert_eq!(srv.mtu(), 256);
    call(&mut srv, &[0x02, 10, 0]);
    assert_eq!(srv.mtu(), DEFAULT_MTU);
    call(&mut srv, &[0x02, 0xE8, 0x03]);
    assert_eq!(srv.mtu(), MAX_MTU);
    srv.reset();
    assert_eq!(srv.mtu(), DEFAULT_MTU);
}

#[test]
fn read_by_group_type() {
    let mut srv = server();
    let req = |start: u16| {
        let [lo, hi] = start.to_le_bytes();
        vec![0x10, lo, hi, 0xFF, 0xFF, 0x00, 0x28]
    };
    // 16-bit entry followed by a 128-bit one
    assert_eq!(
        call(&mut srv, &req(1)),
        Some(vec![0x11, 6, 1, 0, 6, 0, 0x0D, 0x18])
    );
    let mut want = vec![0x11, 20, 7, 0, 10, 0];
    want.extend_from_slice(&nus(NUS));
    assert_eq!(call(&mut srv, &req(7)), Some(want));
    assert_eq!(
        call(&mut srv, &req(8)),
        Some(vec![0x11, 6, 11, 0, 13, 0, 0x0F, 0x18])
    );
    assert_eq!(call(&mut srv, &req(14)), err(0x10, 14, ErrorCode::AttributeNotFound));
    assert_eq!(
        call(&mut srv, &[0x10, 1, 0, 0xFF, 0xFF, 0x03, 0x28]),
        err(0x10, 1, ErrorCode::UnsupportedGroupType)
    );
    assert_eq!(
        call(&mut srv, &[0x10, 1, 0, 0xFF, 0xFF, 0x01, 0x28]),
        err(0x10, 1, ErrorCode::AttributeNotFound)
    );
}

#[test]
fn find_information() {
    let mut srv = server();
    // Five 4-byte entries fit in the default MTU
    assert_eq!(
        call(&mut srv, &[0x04, 1, 0, 0xFF, 0xFF]),
        Some(vec![
            0x05, 0x01, 1, 0, 0x00, 0x28, 2, 0, 0x03, 0x28, 3, 0, 0x37, 0x2A, 4, 0, 0x02, 0x29,
            5, 0, 0x03, 0x28,
        ])
    );
    // Stops at the first 128-bit type
    call(&mut srv, &[0x02, 0x00, 0x02]);
    assert_eq!(
        call(&mut srv, &[0x04, 6, 0, 0xFF, 0xFF]),
        Some(vec![
            0x05, 0x01, 6, 0, 0x38, 0x2A, 7, 0, 0x00, 0x28, 8, 0, 0x03, 0x28,
        ])
    );
    let mut want = vec![0x05, 0x02, 9, 0];
    want.extend_from_slice(&nus(NUS + 1));
    assert_eq!(call(&mut srv, &[0x04, 9, 0, 0xFF, 0xFF]), Some(want));
    assert_eq!(
        call(&mut srv, &[0x04, 5, 0, 1, 0]),
        err(0x04, 5, ErrorCode::InvalidHandle)
    );
    assert_eq!(
        call(&mut srv, &[0x04, 0, 0, 5, 0]),
        err(0x04, 0, ErrorCode::InvalidHandle)
    );
    assert_eq!(
        call(&mut srv, &[0x04, 20, 0, 30, 0]),
        err(0x04, 20, ErrorCode::AttributeNotFound)
    );
}

#[test]
fn find_by_type_value() {
    let mut srv = server();
    assert_eq!(
        call(&mut srv, &[0x06, 1, 0, 0xFF, 0xFF, 0x00, 0x28, 0x0F, 0x18]),
        Some(vec![0x07, 11, 0, 13, 0])
    );
    let mut req = vec![0x06, 1, 0, 0xFF, 0xFF, 0x00, 0x28];
    req.extend_from_slice(&nus(NUS));
    assert_eq!(call(&mut srv, &req), Some(vec![0x07, 7, 0, 10, 0]));
    assert_eq!(
        call(&mut srv, &[0x06, 8, 0, 0xFF, 0xFF, 0x00, 0x28, 0x0D, 0x18]),
        err(0x06, 8, ErrorCode::AttributeNotFound)
    );
    // Non-grouping types match individual attributes
    assert_eq!(
        call(&mut srv, &[0x06, 1, 0, 0xFF, 0xFF, 0x02, 0x29, 0x00, 0x00]),
        Some(vec![0x07, 4, 0, 4, 0, 10, 0, 10, 0])
    );
}

#[test]
fn read_by_type() {
    let mut srv = server();
    // Characteristic declarations: two 7-byte entries before the 128-bit one
    assert_eq!(
        call(&mut srv, &[0x08, 1, 0, 0xFF, 0xFF, 0x03, 0x28]),
        Some(vec![
            0x09, 7, 2, 0, 0x12, 3, 0, 0x37, 0x2A, 5, 0, 0x02, 6, 0, 0x38, 0x2A,
        ])
    );
    srv.bind_index(1, |req: &IoReq, w: &mut Writer| {
        assert_eq!(req.op(), Op::Read);
        w.respond([0x55]);
    })
    .unwrap();
    assert_eq!(
        call(&mut srv, &[0x08, 1, 0, 0xFF, 0xFF, 0x38, 0x2A]),
        Some(vec![0x09, 3, 6, 0, 0x55])
    );
    srv.bind_index(1, |_: &IoReq, w: &mut Writer| w.err(ErrorCode::InsufficientAuthentication))
        .unwrap();
    assert_eq!(
        call(&mut srv, &[0x08, 1, 0, 0xFF, 0xFF, 0x38, 0x2A]),
        err(0x08, 6, ErrorCode::InsufficientAuthentication)
    );
    assert_eq!(
        call(&mut srv, &[0x08, 1, 0, 0xFF, 0xFF, 0x99, 0x2A]),
        err(0x08, 1, ErrorCode::AttributeNotFound)
    );
}

#[test]
fn read() {
    let mut srv = server();
    srv.bind(Uuid::Uuid16(0x180D), Uuid::Uuid16(0x2A37), |req: &IoReq, w: &mut Writer| {
        assert_eq!((req.conn(), req.index()), (CONN, 0));
        assert_eq!(req.uuid(), Uuid::Uuid16(0x2A37));
        w.respond([0x00, 0x48]);
    })
    .unwrap();
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), Some(vec![0x0B, 0x00, 0x48]));
    assert_eq!(call(&mut srv, &[0x0C, 3, 0, 1, 0]), Some(vec![0x0D, 0x48]));
    assert_eq!(call(&mut srv, &[0x0A, 6, 0]), Some(vec![0x0B]));
    assert_eq!(
        call(&mut srv, &[0x0C, 2, 0, 2, 0]),
        Some(vec![0x0D, 0x00, 0x37, 0x2A])
    );
    assert_eq!(
        call(&mut srv, &[0x0C, 2, 0, 6, 0]),
        err(0x0C, 2, ErrorCode::InvalidOffset)
    );
    assert_eq!(call(&mut srv, &[0x0A, 0, 0]), err(0x0A, 0, ErrorCode::InvalidHandle));
    assert_eq!(
        call(&mut srv, &[0x0A, 99, 0]),
        err(0x0A, 99, ErrorCode::AttributeNotFound)
    );
}

#[test]
fn write() {
    let mut srv = server();
    let log = Arc::new(Mutex::new(Vec::new()));
    let idx = srv.bind(Uuid::Uuid128(NUS), Uuid::Uuid128(NUS + 1), {
        let log = Arc::clone(&log);
        move |req: &IoReq, _: &mut Writer| log.lock().push((req.op(), req.value().to_vec()))
    });
    assert_eq!(idx, Ok(2));
    assert_eq!(call(&mut srv, &[0x12, 9, 0, 1, 2, 3]), Some(vec![0x13]));
    assert_eq!(call(&mut srv, &[0x52, 9, 0, 4]), None);
    assert_eq!(
        *log.lock(),
        [(Op::Write, vec![1, 2, 3]), (Op::WriteCmd, vec![4])]
    );
    assert_eq!(
        call(&mut srv, &[0x12, 6, 0, 1]),
        err(0x12, 6, ErrorCode::WriteNotPermitted)
    );
    assert_eq!(call(&mut srv, &[0x52, 6, 0, 1]), None);
    assert_eq!(call(&mut srv, &[0x52, 99, 0, 1]), None);

    // Unbound values are acknowledged without storing anything
    srv.unbind(idx.unwrap());
    assert_eq!(call(&mut srv, &[0x12, 9, 0, 1]), Some(vec![0x13]));
    assert_eq!(log.lock().len(), 2);
}

#[test]
fn write_ack() {
    let mut srv = server();
    srv.bind_index(2, |req: &IoReq, w: &mut Writer| {
        assert_eq!(req.value(), &[0xAA, 0xBB]);
        w.respond_write_ok();
    })
    .unwrap();
    assert_eq!(call(&mut srv, &[0x12, 9, 0, 0xAA, 0xBB]), Some(vec![0x13]));
    srv.bind_index(2, |_: &IoReq, w: &mut Writer| w.err(ErrorCode::InsufficientResources))
        .unwrap();
    assert_eq!(
        call(&mut srv, &[0x12, 9, 0, 0xAA, 0xBB]),
        err(0x12, 9, ErrorCode::InsufficientResources)
    );
    assert_eq!(call(&mut srv, &[0x52, 9, 0, 0xAA, 0xBB]), None);
}

#[test]
fn cccd() {
    let mut srv = server();
    let mut b = LimitedBuf::default();
    assert!(!srv.is_notify_enabled(0));
    assert!(srv.notify(0, &[0x00, 0x50], &mut b).is_none());

    assert_eq!(call(&mut srv, &[0x12, 4, 0, 0x01, 0x00]), Some(vec![0x13]));
    assert!(srv.is_notify_enabled(0));
    assert_eq!(srv.cccd(0), Some(Cccd::NOTIFY));
    assert_eq!(call(&mut srv, &[0x0A, 4, 0]), Some(vec![0x0B, 0x01, 0x00]));
    assert_eq!(
        srv.notify(0, &[0x00, 0x50], &mut b),
        Some(&[0x1B, 3, 0, 0x00, 0x50][..])
    );
    assert!(srv.indicate(0, &[1], &mut b).is_none());

    // Unsupported bits are ignored
    assert_eq!(call(&mut srv, &[0x12, 4, 0, 0x03, 0x00]), Some(vec![0x13]));
    assert!(!srv.is_indicate_enabled(0));
    assert_eq!(
        call(&mut srv, &[0x12, 4, 0, 0x01]),
        err(0x12, 4, ErrorCode::InvalidAttributeValueLength)
    );
    assert_eq!(
        call(&mut srv, &[0x12, 4, 0, 0x01, 0x00, 0x00]),
        err(0x12, 4, ErrorCode::InvalidAttributeValueLength)
    );
    assert!(srv.is_notify_enabled(0));
    assert_eq!(call(&mut srv, &[0x52, 4, 0, 0x00, 0x00]), None);
    assert!(!srv.is_notify_enabled(0));

    assert_eq!(call(&mut srv, &[0x12, 10, 0, 0x02, 0x00]), Some(vec![0x13]));
    assert!(srv.is_indicate_enabled(2));
    assert_eq!(
        srv.indicate(2, &[7], &mut b),
        Some(&[0x1D, 9, 0, 7][..])
    );
    srv.reset();
    assert!(!srv.is_indicate_enabled(2));
    assert_eq!(call(&mut srv, &[0x0A, 10, 0]), Some(vec![0x0B, 0x00, 0x00]));
}

#[test]
fn notify_truncated() {
    let mut srv = server();
    call(&mut srv, &[0x12, 4, 0, 0x01, 0x00]);
    let mut b = LimitedBuf::default();
    let ntf = srv.notify(0, &[0xAA; 64], &mut b).unwrap();
    assert_eq!(ntf.len(), usize::from(DEFAULT_MTU));
}

#[test]
fn invalid_pdu() {
    let mut srv = server();
    assert_eq!(call(&mut srv, &[]), err(0x00, 0, ErrorCode::InvalidPdu));
    assert_eq!(call(&mut srv, &[0x0A, 1]), err(0x0A, 0, ErrorCode::InvalidPdu));
    assert_eq!(
        call(&mut srv, &[0x20, 1]),
        err(0x20, 0, ErrorCode::RequestNotSupported)
    );
    assert_eq!(
        call(&mut srv, &[0x0B, 1]),
        err(0x0B, 0, ErrorCode::RequestNotSupported)
    );
    // Commands never get a response
    assert_eq!(call(&mut srv, &[0x52, 1]), None);
    assert_eq!(call(&mut srv, &[0x7F]), None);
    assert_eq!(call(&mut srv, &[0xD2, 3, 0, 1]), None);
    assert_eq!(call(&mut srv, &[0x1E]), None);
}

/// Binds `n` handlers that can only complete when all of them run
/// concurrently.
fn concurrent(srv: &mut TestServer, n: usize) -> Arc<Mutex<Vec<(u16, Vec<u8>)>>> {
    let barrier = Arc::new(Barrier::new(n));
    for idx in 0..n {
        let barrier = Arc::clone(&barrier);
        srv.bind_index(idx, move |_: &IoReq, w: &mut Writer| {
            barrier.wait();
            w.respond([idx as u8]);
        })
        .unwrap();
    }
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn async_threads() {
    let mut srv = server();
    let rsp = concurrent(&mut srv, 4);
    let cfg = AsyncConfig { max_in_flight: 4 };
    srv.enable_async(ThreadSpawner::new().name("gatt-io"), cfg, {
        let rsp = Arc::clone(&rsp);
        move |conn, pdu| rsp.lock().push((conn, pdu.to_vec()))
    });
    for hdl in [3, 6, 9, 13] {
        assert_eq!(call(&mut srv, &[0x0A, hdl, 0]), None);
    }
    assert!(srv.wait_group().wait_timeout(Duration::from_secs(10)));
    let mut rsp = rsp.lock().clone();
    rsp.sort();
    assert_eq!(
        rsp,
        (0..4_u8).map(|i| (CONN, vec![0x0B, i])).collect::<Vec<_>>()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn async_tokio() {
    let mut srv = server();
    let rsp = concurrent(&mut srv, 3);
    let spawner = TokioSpawner::current().unwrap();
    srv.enable_async(spawner, AsyncConfig::default(), {
        let rsp = Arc::clone(&rsp);
        move |conn, pdu| rsp.lock().push((conn, pdu.to_vec()))
    });
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), None);
    assert_eq!(call(&mut srv, &[0x0A, 6, 0]), None);
    // Write commands run in the background but never respond
    assert_eq!(call(&mut srv, &[0x52, 9, 0, 1]), None);
    tokio::time::timeout(Duration::from_secs(10), srv.wait_group().wait_async())
        .await
        .unwrap();
    let mut rsp = rsp.lock().clone();
    rsp.sort();
    assert_eq!(rsp, [(CONN, vec![0x0B, 0]), (CONN, vec![0x0B, 1])]);
}

#[derive(Debug)]
struct Refuse(Arc<AtomicUsize>);

impl Spawn for Refuse {
    fn spawn(&self, _: Task) -> std::result::Result<(), SpawnError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Err(SpawnError::Shutdown)
    }
}

#[test]
fn async_fallback() {
    let mut srv = server();
    srv.bind_index(0, |_: &IoReq, w: &mut Writer| w.respond([0x00, 0x48]))
        .unwrap();
    let (tries, rsp) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
    let on_rsp = {
        let rsp = Arc::clone(&rsp);
        move |_: u16, _: &[u8]| {
            rsp.fetch_add(1, Ordering::Relaxed);
        }
    };

    // Spawn failure
    srv.enable_async(Refuse(Arc::clone(&tries)), AsyncConfig::default(), on_rsp.clone());
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), Some(vec![0x0B, 0x00, 0x48]));
    assert_eq!(tries.load(Ordering::Relaxed), 1);
    assert!(srv.wait_group().is_empty());

    // No permits
    let cfg = AsyncConfig { max_in_flight: 0 };
    srv.enable_async(ThreadSpawner::new(), cfg, on_rsp);
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), Some(vec![0x0B, 0x00, 0x48]));

    srv.disable_async();
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), Some(vec![0x0B, 0x00, 0x48]));
    assert_eq!(rsp.load(Ordering::Relaxed), 0);
}

#[test]
fn async_tokio_shutdown() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .build()
        .unwrap();
    let handle = rt.handle().clone();
    rt.shutdown_background();

    let mut srv = server();
    srv.bind_index(0, |_: &IoReq, w: &mut Writer| w.respond([0x00, 0x48]))
        .unwrap();
    let rsp = Arc::new(Mutex::new(Vec::new()));
    srv.enable_async(TokioSpawner::new(handle), AsyncConfig::default(), {
        let rsp = Arc::clone(&rsp);
        move |conn, pdu| rsp.lock().push((conn, pdu.to_vec()))
    });

    // The runtime drops the task, so the request must still be answered once
    let sync = call(&mut srv, &[0x0A, 3, 0]);
    assert!(srv.wait_group().wait_timeout(Duration::from_secs(10)));
    let mut all = rsp.lock().clone();
    all.extend(sync.map(|v| (CONN, v)));
    assert_eq!(all, [(CONN, vec![0x0B, 0x00, 0x48])]);
    assert!(srv.wait_group().is_empty());
}

/// Executor that keeps tasks without running them.
struct Hold(Arc<Mutex<Vec<Task>>>);

impl Spawn for Hold {
    fn spawn(&self, task: Task) -> std::result::Result<(), SpawnError> {
        self.0.lock().push(task);
        Ok(())
    }
}

#[test]
fn async_task_dropped() {
    let mut srv = server();
    srv.bind_index(0, |_: &IoReq, w: &mut Writer| w.respond([0x00, 0x48]))
        .unwrap();
    let tasks = Arc::new(Mutex::new(Vec::new()));
    let rsp = Arc::new(Mutex::new(Vec::new()));
    srv.enable_async(Hold(Arc::clone(&tasks)), AsyncConfig::default(), {
        let rsp = Arc::clone(&rsp);
        move |conn, pdu| rsp.lock().push((conn, pdu.to_vec()))
    });
    assert_eq!(call(&mut srv, &[0x0A, 3, 0]), None);
    assert_eq!(srv.wait_group().len(), 1);
    assert!(rsp.lock().is_empty());

    tasks.lock().clear();
    assert_eq!(*rsp.lock(), [(CONN, vec![0x0B, 0x00, 0x48])]);
    assert!(srv.wait_group().is_empty());
}

#[test]
fn async_read_by_type_inline() {
    let mut srv = server();
    srv.bind_index(1, |_: &IoReq, w: &mut Writer| w.respond([0x55]))
        .unwrap();
    let tasks = Arc::new(Mutex::new(Vec::new()));
    srv.enable_async(Hold(Arc::clone(&tasks)), AsyncConfig::default(), |_, _| {
        unreachable!()
    });
    assert_eq!(
        call(&mut srv, &[0x08, 1, 0, 0xFF, 0xFF, 0x38, 0x2A]),
        Some(vec![0x09, 3, 6, 0, 0x55])
    );
    assert!(tasks.lock().is_empty());
    assert!(srv.wait_group().is_empty());
}

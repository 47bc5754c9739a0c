use matches::assert_matches;

use super::*;

#[test]
fn command() {
    let cmd = Command::disconnect(0x0040, Status::RemoteUserTerminatedConnection);
    assert_eq!(cmd.as_ref(), &[0x06, 0x04, 3, 0x40, 0x00, 0x13]);
    assert_eq!(cmd.opcode(), Opcode::Disconnect);
    assert_eq!(cmd.params(), &[0x40, 0x00, 0x13]);

    let cmd = Command::le_set_scan_enable(true, false);
    assert_eq!(cmd.as_ref(), &[0x0C, 0x20, 2, 1, 0]);
    assert_eq!(Command::reset().as_ref(), &[0x03, 0x0C, 0]);
    assert_eq!(format!("{cmd:?}"), "LeSetScanEnable[01, 00]");
}

#[test]
fn adv_data() {
    let cmd = Command::le_set_advertising_data(&[0x02, 0x01, 0x06]);
    assert_eq!(cmd.len(), CMD_BUF);
    assert_eq!(cmd[2], 32);
    assert_eq!(&cmd.params()[..4], &[3, 0x02, 0x01, 0x06]);
    assert!(cmd.params()[4..].iter().all(|&b| b == 0));

    let cmd = Command::le_set_scan_response_data(&[0xAA; 40]);
    assert_eq!(cmd.opcode(), Opcode::LeSetScanResponseData);
    assert_eq!(cmd.params()[0], 31);
    assert!(cmd.params()[1..].iter().all(|&b| b == 0xAA));
}

#[test]
fn command_complete() {
    let e = HciEvent::decode(&[0x0E, 4, 1, 0x0A, 0x20, 0x00]);
    assert_eq!(
        e,
        Some(HciEvent::CommandComplete {
            cmd_quota: 1,
            opcode: Opcode::LeSetAdvertisingEnable,
            status: Status::Success,
        })
    );
    let e = HciEvent::decode(&[0x0E, 4, 1, 0x0A, 0x20, 0x0C]);
    assert_matches!(
        e,
        Some(HciEvent::CommandComplete {
            status: Status::CommandDisallowed,
            ..
        })
    );
    // Quota update
    let e = HciEvent::decode(&[0x0E, 3, 5, 0x00, 0x00]);
    assert_matches!(
        e,
        Some(HciEvent::CommandComplete {
            cmd_quota: 5,
            opcode: Opcode::None,
            status: Status::Success,
        })
    );
}

#[test]
fn command_status() {
    let e = HciEvent::decode(&[0x0F, 4, 0x0C, 1, 0x0D, 0x20]);
    assert_eq!(
        e,
        Some(HciEvent::CommandStatus {
            cmd_quota: 1,
            opcode: Opcode::LeCreateConnection,
            status: Status::CommandDisallowed,
        })
    );
}

#[test]
fn disconnection_complete() {
    let e = HciEvent::decode(&[0x05, 4, 0x00, 0x40, 0x20, 0x13]);
    assert_eq!(
        e,
        Some(HciEvent::DisconnectionComplete(DisconnectionComplete {
            status: Status::Success,
            handle: 0x0040,
            reason: Status::RemoteUserTerminatedConnection,
        }))
    );
}

#[test]
fn le_connection_complete() {
    let pkt = [
        0x3E, 19, 0x01, 0x00, 0x40, 0x00, 0x01, 0x01, 0x66, 0x55, 0x44, 0x33, 0x22, 0xC1, 0x18,
        0x00, 0x00, 0x00, 0xF4, 0x01, 0x00,
    ];
    let want = LeConnectionComplete {
        status: Status::Success,
        handle: 0x0040,
        role: Role::Peripheral,
        peer_addr_type: AddrType::Random,
        peer_addr: RawAddr::from([0x66, 0x55, 0x44, 0x33, 0x22, 0xC1]),
        interval: 0x0018,
        latency: 0,
        supervision_timeout: 500,
    };
    assert_eq!(
        HciEvent::decode(&pkt),
        Some(HciEvent::LeConnectionComplete(want))
    );

    // Enhanced form carries two extra addresses before the interval
    let mut enh = pkt[..14].to_vec();
    enh[1] = 31;
    enh[2] = 0x0A;
    enh.extend_from_slice(&[0; 12]);
    enh.extend_from_slice(&pkt[14..]);
    assert_eq!(
        HciEvent::decode(&enh),
        Some(HciEvent::LeConnectionComplete(want))
    );

    let mut bad = pkt;
    bad[6] = 7; // Role
    assert_eq!(HciEvent::decode(&bad), None);
}

#[test]
fn other() {
    assert_eq!(
        HciEvent::decode(&[0x13, 5, 1, 0x40, 0x00, 1, 0]),
        Some(HciEvent::Other { code: 0x13 })
    );
    assert_eq!(
        HciEvent::decode(&[0x3E, 2, 0x02, 0x00]),
        Some(HciEvent::Other { code: 0x3E })
    );
    assert_eq!(HciEvent::decode(&[]), None);
    assert_eq!(HciEvent::decode(&[0x0E, 4, 1, 0x0A]), None);
    assert_eq!(HciEvent::decode(&[0x05, 1, 0x00]), None);
}

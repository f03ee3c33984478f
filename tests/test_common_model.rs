mod common;
use common::*;

use sunspec_bridge::sunspec::models::Model;
use sunspec_bridge::sunspec::{refresh, CommonModel, ModelFamily, RegisterBuffer};
use sunspec_bridge::Error;

#[test]
fn parses_header() {
    let mut buffer = RegisterBuffer::new(vec![0x5375, 0x6E53, 1, 65]);
    let header = CommonModel::parse_header(&mut buffer).unwrap();

    assert_eq!(header.id, 1);
    assert_eq!(header.length, 65);
}

#[test]
fn rejects_missing_magic() {
    let mut buffer = RegisterBuffer::new(vec![0x0000, 0x0000, 1, 65]);

    match CommonModel::parse_header(&mut buffer) {
        Err(Error::UnknownDeviceModel { family, .. }) => assert_eq!(family, ModelFamily::Common),
        other => panic!("expected unknown device model, got {:?}", other),
    }
}

#[test]
fn refresh_reads_header_then_declared_body() {
    let mut transport = SimulatedTransport::new().with_block(COMMON_ADDRESS, &Factory::common());
    let model: CommonModel = refresh(&mut transport, COMMON_ADDRESS).unwrap();

    assert_eq!(model.length, 65);
    assert_eq!(model.manufacturer, "Fronius");
    assert_eq!(model.model, "Symo 10.0-3-M");
    assert_eq!(model.version, "1.2.3");
    assert_eq!(model.serial_number, "SN12345678");
    assert_eq!(model.device_address, 1);

    assert_eq!(transport.reads, vec![(40_000, 4), (40_004, 65)]);
}

#[test]
fn wrong_model_id_never_reads_the_body() {
    let mut image = Factory::common();
    image[2] = 2;
    let mut transport = SimulatedTransport::new().with_block(COMMON_ADDRESS, &image);

    let err = refresh::<CommonModel, _>(&mut transport, COMMON_ADDRESS).unwrap_err();

    assert!(err.is_unknown_device_model());
    assert_eq!(transport.reads.len(), 1);
}

#[test]
fn short_body_is_an_underrun() {
    let mut image = Factory::common();
    image[3] = 40;
    let mut transport = SimulatedTransport::new().with_block(COMMON_ADDRESS, &image);

    let err = refresh::<CommonModel, _>(&mut transport, COMMON_ADDRESS).unwrap_err();
    assert!(err.is_buffer_underrun());
}

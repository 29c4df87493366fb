use super::*;
use cdev::io_buffer::UserSliceWriter;
use cdev::{CharDeviceFile, DeviceModule, FsError, InitError, OpenFlags};
use test_support::mock::i2c::I2cFailPoint;

use crate::config::{Bmp280Config, bmp280_reg};
use crate::{Bmp280, Calibration, modules};

const GOLDEN: i32 = 2253;

fn loaded(host: &HostKernel, bus: &Arc<MockI2cBus>) -> DeviceModule<Bmp280> {
    let mut module = modules::bmp280(host.services(), bus.clone(), &Bmp280Config::default());
    module.load().unwrap();
    module
}

fn open(host: &HostKernel) -> CharDeviceFile {
    host.open("pdev", OpenFlags::O_RDONLY).unwrap()
}

fn assert_bus_clean(bus: &MockI2cBus) {
    assert_eq!(bus.adapters_held(), 0);
    assert_eq!(bus.client_count(), 0);
    assert_eq!(bus.driver_count(), 0);
}

#[test]
fn test_load_reads_calibration_and_configures() {
    let host = host();
    let bus = calibrated_bus();
    let module = loaded(&host, &bus);

    assert_eq!(
        module.backend().calibration(),
        Some(Calibration {
            t1: 28000,
            t2: 26000,
            t3: -1000
        })
    );
    assert_eq!(bus.writes(), [(0xF5u8, 0xA0u8), (0xF4, 0xB7)]);
    assert_eq!(bus.adapters_held(), 1);
    assert_eq!(bus.client_count(), 1);
    assert_eq!(bus.driver_count(), 1);
    assert!(host.namespace.has_class("pdevclass"));
}

#[test]
fn test_read_golden_temperature() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);

    let mut out = [0u8; 4];
    assert_eq!(file.sys_read(Some(&mut out[..]), 4), 4);
    assert_eq!(i32::from_le_bytes(out), GOLDEN);
}

#[test]
fn test_read_ignores_extra_length() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);

    let mut out = [0xAAu8; 16];
    assert_eq!(file.read(&mut UserSliceWriter::new(&mut out)), Ok(4));
    assert_eq!(&out[..4], &GOLDEN.to_le_bytes());
    assert!(out[4..].iter().all(|&b| b == 0xAA));
}

#[test]
fn test_short_read_copies_prefix() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);

    let mut out = [0u8; 2];
    assert_eq!(file.sys_read(Some(&mut out[..]), 2), 2);
    assert_eq!(out, GOLDEN.to_le_bytes()[..2]);
}

#[test]
fn test_every_read_hits_the_bus() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);
    let before = bus.read_count();

    let mut out = [0u8; 4];
    file.sys_read(Some(&mut out[..]), 4);
    assert_eq!(bus.read_count(), before + 3);

    // 原始值改变后立即反映在下一次读取中
    bus.set_register(bmp280_reg::TEMP_MSB, 0x80);
    bus.set_register(bmp280_reg::TEMP_LSB, 0x00);
    bus.set_register(bmp280_reg::TEMP_XLSB, 0x00);
    file.sys_read(Some(&mut out[..]), 4);
    assert_eq!(bus.read_count(), before + 6);
    let expected = Calibration::from_raw(28000, 26000, (-1000i16) as u16)
        .compensate(crate::bmp280::raw_sample(0x80, 0, 0));
    assert_eq!(i32::from_le_bytes(out), expected);
    assert_ne!(expected, GOLDEN);
}

#[test]
fn test_copy_fault_returns_efault() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);

    let mut short = [0u8; 1];
    assert_eq!(
        file.sys_read(Some(&mut short[..]), 4),
        FsError::BadAddress.to_errno()
    );
    assert!(file.sys_read(Some(&mut short[..]), 4) < 0);
    assert_eq!(file.sys_read(None, 4), FsError::InvalidArgument.to_errno());
}

#[test]
fn test_bus_failure_during_read() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = open(&host);

    bus.fail_at(I2cFailPoint::Read(bmp280_reg::TEMP_LSB));
    let mut out = [0u8; 4];
    assert_eq!(
        file.sys_read(Some(&mut out[..]), 4),
        FsError::IoError.to_errno()
    );
    assert_eq!(out, [0u8; 4]);
}

#[test]
fn test_no_write_operation() {
    let host = host();
    let bus = calibrated_bus();
    let _module = loaded(&host, &bus);
    let file = host.open("pdev", OpenFlags::O_RDWR).unwrap();
    assert_eq!(
        file.sys_write(Some(&b"1"[..]), 1),
        FsError::NotSupported.to_errno()
    );
}

#[test]
fn test_unexpected_chip_id_is_not_fatal() {
    let host = host();
    let bus = calibrated_bus();
    bus.set_register(bmp280_reg::CHIP_ID, 0x60);
    let module = loaded(&host, &bus);
    assert!(module.is_loaded());
}

#[test]
fn test_teardown_releases_bus() {
    let host = host();
    let bus = calibrated_bus();
    let mut module = loaded(&host, &bus);
    module.unload();

    assert_bus_clean(&bus);
    assert!(host.is_clean());
    assert_eq!(module.backend().calibration(), None);
    assert_eq!(
        module.backend().read_temperature(),
        Err(FsError::NoDevice)
    );
}

#[test]
fn test_failure_at_each_substep_unwinds() {
    let cases = [
        (I2cFailPoint::Adapter, "i2c adapter"),
        (I2cFailPoint::Client, "i2c client"),
        (I2cFailPoint::Driver, "i2c driver"),
        (I2cFailPoint::Read(bmp280_reg::CHIP_ID), "chip id"),
        (I2cFailPoint::Read(bmp280_reg::DIG_T1), "calibration T1"),
        (I2cFailPoint::Read(bmp280_reg::DIG_T2), "calibration T2"),
        (I2cFailPoint::Read(bmp280_reg::DIG_T3), "calibration T3"),
        (I2cFailPoint::Write(bmp280_reg::CONFIG), "config"),
        (I2cFailPoint::Write(bmp280_reg::CTRL_MEAS), "ctrl_meas"),
    ];
    for (point, step) in cases {
        let host = host();
        let bus = calibrated_bus();
        bus.fail_at(point);
        let mut module =
            modules::bmp280(host.services(), bus.clone(), &Bmp280Config::default());

        match module.load() {
            Err(InitError::BackendUnavailable(fault)) => {
                assert_eq!(fault.step, step, "{:?}", point);
                assert_eq!(fault.cause, ServiceError::Io);
            }
            other => panic!("{:?}: unexpected result {:?}", point, other),
        }
        assert_bus_clean(&bus);
        assert!(host.is_clean(), "{:?} leaked kernel resources", point);
        assert!(!module.is_loaded());
        assert_eq!(module.backend().calibration(), None);
    }
}

#[test]
fn test_wrong_bus_reports_adapter() {
    let host = host();
    let bus = calibrated_bus();
    let config = Bmp280Config {
        bus: 3,
        ..Bmp280Config::default()
    };
    let mut module = modules::bmp280(host.services(), bus.clone(), &config);
    let err = module.load().unwrap_err();
    assert_eq!(
        err,
        InitError::BackendUnavailable(cdev::BackendFault::new(
            "i2c adapter",
            ServiceError::NoDevice
        ))
    );
    assert_eq!(err.to_errno(), ServiceError::NoDevice.to_errno());
    assert_bus_clean(&bus);
}

#[test]
fn test_reload_reads_calibration_again() {
    let host = host();
    let bus = calibrated_bus();
    let mut module = loaded(&host, &bus);
    module.unload();

    bus.set_word(bmp280_reg::DIG_T3, 0x8000);
    module.load().unwrap();
    assert_eq!(module.backend().calibration().map(|c| c.t3), Some(-32768));
}

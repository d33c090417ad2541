//! Testes para o registro de drives

#![cfg(test)]

use super::create_test_bus;
use super::sim::{SimDisk, SimIde};
use crate::drivers::block::{DriveRegistry, DriveType};
use crate::fs::fat::bpb::Bpb;
use crate::fs::{format_drive, FormatOptions, FsType};

#[test]
fn test_probe_finds_present_drives() {
    let (_sim, bus) = create_test_bus(
        SimIde::new()
            .with_disk(0, SimDisk::mb(64, "QEMU HARDDISK"))
            .with_disk(3, SimDisk::mb(2, "")),
    );

    let mut registry = DriveRegistry::new();
    assert_eq!(registry.probe(&bus), 2);
    assert_eq!(registry.count(), 2);

    let d0 = registry.drive(0).unwrap();
    assert!(d0.present);
    assert_eq!(d0.drive_type, DriveType::Ata);
    assert_eq!(d0.size_mb, 64);
    assert_eq!(d0.model, "QEMU HARDDISK");
    assert_eq!(d0.fs_type, FsType::Unknown);

    // Modelo vazio cai para o nome do slot
    assert_eq!(registry.drive(3).unwrap().model, "Secondary Slave");

    assert!(!registry.drive(1).unwrap().present);
    assert!(registry.device(1).is_none());
    assert_eq!(registry.device(0).unwrap().total_blocks(), 64 * 2048);
}

#[test]
fn test_probe_identify_failure_keeps_drive() {
    let (_sim, bus) = create_test_bus(
        SimIde::new()
            .with_disk(0, SimDisk::mb(8, "SLOW").hang_identify())
            .with_disk(2, SimDisk::mb(8, "CDROM").abort_identify()),
    );

    let mut registry = DriveRegistry::new();
    assert_eq!(registry.probe(&bus), 2);

    let slow = registry.drive(0).unwrap();
    assert!(slow.present);
    assert_eq!(slow.size_mb, 0);
    assert_eq!(slow.drive_type, DriveType::Ata);

    let cdrom = registry.drive(2).unwrap();
    assert_eq!(cdrom.drive_type, DriveType::Unknown);
}

#[test]
fn test_find_by_id() {
    let registry = DriveRegistry::new();
    assert_eq!(registry.find("ide0"), Some(0));
    assert_eq!(registry.find("ide3"), Some(3));
    assert_eq!(registry.find("ide4"), None);
    assert_eq!(registry.find("hda"), None);
}

#[test]
fn test_list_reports_format_state() {
    let (_sim, bus) = create_test_bus(
        SimIde::new()
            .with_disk(0, SimDisk::mb(64, "QEMU HARDDISK"))
            .with_disk(1, SimDisk::mb(16, "SPARE")),
    );
    let mut registry = DriveRegistry::new();
    registry.probe(&bus);

    let (info, device) = registry.entry_mut(0).unwrap();
    let device = device.unwrap();
    assert_eq!(
        format_drive(info, device.as_ref(), &FormatOptions::default()),
        Ok(FsType::Fat16)
    );

    let listing = registry.list();
    assert!(listing.starts_with("Drives detectados:\n"));
    assert!(listing.contains(" Drive 0: QEMU HARDDISK  id=ide0  DL=0x80  tamanho=64MB  [Formatado: FAT16]\n"));
    assert!(listing.contains(" Drive 1: SPARE  id=ide1  DL=0x81  tamanho=16MB  [Não formatado]\n"));
    assert!(!listing.contains("ide2"));
}

#[test]
fn test_list_updates_fs_type_from_disk() {
    let (sim, bus) = create_test_bus(SimIde::new().with_disk(0, SimDisk::mb(64, "DISK")));
    let mut registry = DriveRegistry::new();
    registry.probe(&bus);

    // Boot sector FAT32 escrito por outra ferramenta
    let mut boot = [0u8; 512];
    boot[11..13].copy_from_slice(&512u16.to_le_bytes());
    boot[13] = 1;
    boot[82..90].copy_from_slice(b"FAT32   ");
    boot[510] = 0x55;
    boot[511] = 0xAA;
    sim.put_sector(0, 0, boot);
    assert!(Bpb::parse(&boot).is_some());

    registry.list();
    assert_eq!(registry.drive(0).unwrap().fs_type, FsType::Fat32);
}

#[test]
fn test_attach_any_block_device() {
    let (_sim, bus) = create_test_bus(SimIde::new().with_disk(0, SimDisk::mb(4, "DISK")));
    let mut registry = DriveRegistry::new();
    registry.probe(&bus);

    let device = registry.device(0).unwrap();
    assert!(registry.attach(2, device, "espelho"));
    assert!(!registry.attach(4, registry.device(0).unwrap(), "x"));

    let info = registry.drive(2).unwrap();
    assert!(info.present);
    assert_eq!(info.size_mb, 4);
    assert_eq!(info.id, "ide2");
    assert_eq!(registry.count(), 2);
}

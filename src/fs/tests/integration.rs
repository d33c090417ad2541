//! Testes de integração: contexto completo sobre o IDE simulado

#![cfg(test)]

use crate::core::context::{Kernel, KERNEL};
use crate::drivers::block::tests::sim::{SimDisk, SimIde};
use crate::fs::{FormatError, FormatOptions, FsType, MountError};
use alloc::sync::Arc;

fn boot(sim: SimIde) -> (Arc<SimIde>, Kernel) {
    let sim = Arc::new(sim);
    let kernel = Kernel::boot(sim.clone()).unwrap();
    (sim, kernel)
}

#[test]
fn integration_format_mount_copy() {
    let (sim, mut kernel) = boot(
        SimIde::new()
            .with_disk(0, SimDisk::mb(64, "QEMU HARDDISK"))
            .with_disk(1, SimDisk::mb(16, "SPARE")),
    );
    assert_eq!(kernel.drives.count(), 2);
    assert_eq!(kernel.prompt(), "> ");

    assert_eq!(kernel.mount("ide0"), Err(MountError::NotFormatted));
    assert_eq!(kernel.format("ide0", &FormatOptions::default()), Ok(FsType::Fat16));
    assert_eq!(kernel.format("ide1", &FormatOptions::default()), Ok(FsType::Fat12));
    assert_eq!(kernel.format("ide2", &FormatOptions::default()), Err(FormatError::InvalidDrive));

    assert_eq!(kernel.mount("ide0"), Ok(0));
    assert_eq!(kernel.prompt(), "ide0> ");

    kernel.fs.create_entry("hello.txt").unwrap();
    kernel.fs.write_file("hello.txt", b"Hello, disk!").unwrap();
    assert_eq!(kernel.copy("hello.txt", "copy.txt"), Ok(12));

    // Drive montado não aceita formatação
    assert_eq!(
        kernel.format("ide0", &FormatOptions::default()),
        Err(FormatError::InvalidDrive)
    );

    // Trocar de drive grava a imagem no anterior
    assert_eq!(kernel.mount("ide1"), Ok(0));
    assert_eq!(kernel.prompt(), "ide1> ");
    assert_eq!(&sim.sector(0, 289 + 3)[0..11], b"HELLO   TXT");
    assert!(kernel.fs.find_entry("hello.txt").is_err());

    assert_eq!(kernel.mount("ide0"), Ok(0));
    let mut buf = [0u8; 32];
    assert_eq!(kernel.fs.read_file("copy.txt", &mut buf), Ok(12));
    assert_eq!(&buf[..12], b"Hello, disk!");

    let listing = kernel.list_drives();
    assert!(listing.contains("QEMU HARDDISK  id=ide0  DL=0x80  tamanho=64MB  [Formatado: FAT16]"));
    assert!(listing.contains("SPARE  id=ide1  DL=0x81  tamanho=16MB  [Formatado: FAT12]"));
}

#[test]
fn integration_fat32_volume() {
    let (sim, mut kernel) = boot(SimIde::new().with_disk(2, SimDisk::mb(513, "BIG DISK")));

    assert_eq!(kernel.format("ide2", &FormatOptions::default()), Ok(FsType::Fat32));
    assert_eq!(&sim.sector(2, 0)[82..90], b"FAT32   ");
    assert_eq!(sim.sector(2, 6), sim.sector(2, 0));

    assert_eq!(kernel.mount("ide2"), Ok(0));
    kernel.fs.create_entry("data.bin").unwrap();
    kernel.fs.write_file("data.bin", &[7u8; 100]).unwrap();

    assert_eq!(kernel.unmount("ide2"), Ok(()));
    assert_eq!(kernel.prompt(), "> ");
    assert_eq!(&sim.sector(2, 2092 + 3)[0..11], b"DATA    BIN");
    assert_eq!(kernel.unmount("ide2"), Err(MountError::InvalidDrive));
}

#[test]
fn integration_sync_writes_current_image() {
    let (sim, mut kernel) = boot(SimIde::new().with_disk(0, SimDisk::mb(16, "DISK")));

    kernel.format("ide0", &FormatOptions::default()).unwrap();
    kernel.mount("ide0").unwrap();
    kernel.fs.create_entry("a.txt").unwrap();
    assert_eq!(kernel.sync(), Ok(()));

    // FAT12 de 16 MB: imagem logo após 1 + 2*6 + 32 setores
    assert_eq!(&sim.sector(0, 45 + 3)[0..11], b"A       TXT");
}

#[test]
fn integration_boot_without_drives() {
    let (_sim, mut kernel) = boot(SimIde::new());
    assert_eq!(kernel.drives.count(), 0);
    assert_eq!(kernel.list_drives(), "Drives detectados:\n");
    assert_eq!(kernel.mount("ide0"), Err(MountError::InvalidDrive));
    assert!(kernel.bus().is_some());
}

#[test]
fn integration_global_context() {
    let kernel = Kernel::new().unwrap();
    let _ = kernel.install();

    let guard = KERNEL.lock();
    let kernel = guard.as_ref().unwrap();
    assert_eq!(kernel.prompt(), "> ");
    assert!(kernel.bus().is_none());
}

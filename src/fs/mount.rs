//! # Tabela de Montagem
//!
//! Liga um drive formatado ao RAM disk. Só existe uma visão ativa: montar
//! um drive desmonta todos os outros, gravando antes a imagem atual no
//! drive de origem.
//!
//! A imagem do RAM disk (512 blocos) fica no primeiro setor de dados do
//! volume (ver `Bpb::image_lba`), de modo que boot sector e FATs nunca são
//! sobrescritos.

use crate::drivers::block::ramdisk::{BLOCK_SIZE, MAX_BLOCKS, RAMDISK_SIZE};
use crate::drivers::block::{BlockDevice, DriveInfo, DriveRegistry};
use crate::fs::fat::{Bpb, FatFs};
use crate::fs::{FsType, MountError};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;

/// Capacidade da tabela
pub const MAX_MOUNTS: usize = 4;

/// Um slot da tabela de montagem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPoint {
    /// Índice no `DriveRegistry`
    pub drive: Option<usize>,
    pub mounted: bool,
    /// Cópia do id do drive (`ide0`..)
    pub mount_point: String,
    /// Setor inicial da imagem no drive
    pub image_lba: u64,
}

/// Tabela de montagem + montagem corrente.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    mounts: [MountPoint; MAX_MOUNTS],
    current: Option<usize>,
}

/// Lê o setor 0 e procura a assinatura FAT.
///
/// Efeito colateral: atualiza `drive.fs_type` quando o drive está formatado.
pub fn is_formatted(drive: &mut DriveInfo, device: &dyn BlockDevice) -> bool {
    if !drive.present {
        return false;
    }

    let mut sector = [0u8; 512];
    if device.read_block(0, &mut sector).is_err() {
        return false;
    }
    if sector[510] != 0x55 || sector[511] != 0xAA {
        return false;
    }

    let fat1x = &sector[54..58] == b"FAT1";
    let fat32 = &sector[82..86] == b"FAT3";
    if !fat1x && !fat32 {
        return false;
    }

    drive.fs_type = if fat1x && sector[58] == b'2' {
        FsType::Fat12
    } else if fat1x && sector[58] == b'6' {
        FsType::Fat16
    } else if fat32 && sector[86] == b'2' {
        FsType::Fat32
    } else {
        FsType::Unknown
    };
    true
}

/// Lê a imagem do RAM disk de um drive montável.
fn read_image(device: &dyn BlockDevice, image_lba: u64) -> Result<alloc::vec::Vec<u8>, MountError> {
    let mut image = vec![0u8; RAMDISK_SIZE];
    device.read_blocks(image_lba, &mut image)?;
    Ok(image)
}

/// Localiza a janela da imagem no volume.
fn locate_image(device: &dyn BlockDevice) -> Result<u64, MountError> {
    let mut sector = [0u8; 512];
    device.read_block(0, &mut sector)?;

    let bpb = Bpb::parse(&sector).ok_or(MountError::UnsupportedFs)?;
    let image_lba = bpb.image_lba();
    if !bpb.fits_image() || image_lba + MAX_BLOCKS as u64 > device.total_blocks() {
        return Err(MountError::UnsupportedFs);
    }
    Ok(image_lba)
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounts(&self) -> &[MountPoint] {
        &self.mounts
    }

    /// Índice da montagem corrente
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_mount(&self) -> Option<&MountPoint> {
        self.current.and_then(|i| self.mounts.get(i)).filter(|m| m.mounted)
    }

    /// Drive ligado à montagem corrente
    pub fn current_drive(&self) -> Option<usize> {
        self.current_mount().and_then(|m| m.drive)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounts.iter().filter(|m| m.mounted).count()
    }

    /// Slot em que `drive` está montado
    pub fn slot_of(&self, drive: usize) -> Option<usize> {
        self.mounts
            .iter()
            .position(|m| m.mounted && m.drive == Some(drive))
    }

    /// Prompt do shell: `"ide0> "` ou `"> "`.
    pub fn prompt(&self) -> String {
        match self.current_mount() {
            Some(m) => {
                let mut prompt = m.mount_point.clone();
                prompt.push_str("> ");
                prompt
            }
            None => String::from("> "),
        }
    }

    fn device_for(
        drives: &DriveRegistry,
        mount: &MountPoint,
    ) -> Result<Arc<dyn BlockDevice>, MountError> {
        mount
            .drive
            .and_then(|d| drives.device(d))
            .ok_or(MountError::InvalidDrive)
    }

    /// Grava o RAM disk no drive da montagem corrente.
    pub fn sync(&self, drives: &DriveRegistry, fs: &FatFs) -> Result<(), MountError> {
        let Some(mount) = self.current_mount() else {
            return Ok(());
        };
        let device = Self::device_for(drives, mount)?;

        device.write_blocks(mount.image_lba, fs.image())?;
        device.flush()?;

        crate::kdebug!("(MOUNT) Imagem gravada em:"; mount.mount_point.as_str());
        Ok(())
    }

    /// Monta o drive `index` do registro e o torna corrente.
    ///
    /// Montar o drive já montado é um no-op. Qualquer outra montagem é
    /// desfeita antes (com flush); em caso de erro nada muda.
    pub fn mount(
        &mut self,
        drives: &mut DriveRegistry,
        index: usize,
        fs: &mut FatFs,
    ) -> Result<usize, MountError> {
        let (id, model, device) = {
            let (info, device) = drives.entry_mut(index).ok_or(MountError::InvalidDrive)?;
            if !info.present {
                return Err(MountError::InvalidDrive);
            }
            let device = device.ok_or(MountError::InvalidDrive)?;
            if device.block_size() != BLOCK_SIZE {
                crate::kerror!("(MOUNT) Tamanho de bloco não suportado:", device.block_size());
                return Err(MountError::InvalidDrive);
            }

            if !is_formatted(info, device.as_ref()) {
                return Err(MountError::NotFormatted);
            }
            (info.id, info.model.clone(), device)
        };

        if let Some(slot) = self.slot_of(index) {
            return Ok(slot);
        }

        // Tudo que pode falhar no drive novo acontece antes de mexer na tabela
        let image_lba = locate_image(device.as_ref())?;
        let image = read_image(device.as_ref(), image_lba)?;

        for slot in 0..MAX_MOUNTS {
            if self.mounts[slot].mounted {
                crate::kinfo!("(MOUNT) Automount: desmontando"; " ", self.mounts[slot].mount_point.as_str());
                self.unmount(slot, drives, fs)?;
            }
        }

        let slot = self
            .mounts
            .iter()
            .position(|m| !m.mounted)
            .ok_or(MountError::TableFull)?;

        fs.load_image(&image).map_err(|_| MountError::IoError)?;

        self.mounts[slot] = MountPoint {
            drive: Some(index),
            mounted: true,
            mount_point: String::from(id),
            image_lba,
        };
        self.current = Some(slot);

        crate::kok!("(MOUNT) Automount: montado"; " ", id, " (", model.as_str(), ")");
        Ok(slot)
    }

    /// Desmonta o slot `mount_index`, gravando antes a imagem se ele for o corrente.
    pub fn unmount(
        &mut self,
        mount_index: usize,
        drives: &DriveRegistry,
        fs: &mut FatFs,
    ) -> Result<(), MountError> {
        let mounted = self
            .mounts
            .get(mount_index)
            .map_or(false, |m| m.mounted);
        if !mounted {
            return Err(MountError::InvalidDrive);
        }

        let was_current = self.current == Some(mount_index);
        if was_current {
            self.sync(drives, fs)?;
        }

        self.mounts[mount_index] = MountPoint::default();

        if was_current {
            self.current = None;
            while let Some(next) = self.mounts.iter().position(|m| m.mounted) {
                if self.activate(next, drives, fs) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Carrega a imagem de um slot montado e o torna corrente.
    ///
    /// Se a imagem não puder ser lida o slot é liberado: nenhuma montagem
    /// fica marcada sem poder virar corrente.
    fn activate(&mut self, slot: usize, drives: &DriveRegistry, fs: &mut FatFs) -> bool {
        let mount = &self.mounts[slot];
        let loaded = Self::device_for(drives, mount)
            .and_then(|device| read_image(device.as_ref(), mount.image_lba))
            .and_then(|image| fs.load_image(&image).map_err(|_| MountError::IoError));

        match loaded {
            Ok(()) => {
                self.current = Some(slot);
                true
            }
            Err(_) => {
                crate::kwarn!("(MOUNT) Falha ao ativar, liberando:"; " ", mount.mount_point.as_str());
                self.mounts[slot] = MountPoint::default();
                false
            }
        }
    }

    /// Torna corrente a montagem com id `id` (gravando a atual antes).
    pub fn set_current(
        &mut self,
        id: &str,
        drives: &DriveRegistry,
        fs: &mut FatFs,
    ) -> Result<(), MountError> {
        let slot = self
            .mounts
            .iter()
            .position(|m| m.mounted && m.mount_point == id)
            .ok_or(MountError::InvalidDrive)?;

        if self.current == Some(slot) {
            return Ok(());
        }

        self.sync(drives, fs)?;
        let previous = self.current.take();
        if self.activate(slot, drives, fs) {
            Ok(())
        } else {
            // A imagem anterior continua no RAM disk
            self.current = previous;
            Err(MountError::IoError)
        }
    }
}

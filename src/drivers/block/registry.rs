//! # Registro de Drives
//!
//! Tabela fixa com os 4 slots IDE. Preenchida no boot pelo probe
//! (presença + IDENTIFY); capacidade e tipo de FS podem ser atualizados
//! depois pela formatação e pela montagem.

use super::ata::{AtaDrive, DriveSlot, IdeBus};
use super::traits::BlockDevice;
use crate::fs::FsType;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;

/// Número de slots
pub const MAX_DRIVES: usize = 4;

/// Tipo de dispositivo detectado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveType {
    #[default]
    None,
    Ata,
    Atapi,
    Unknown,
}

/// Descritor de um slot.
#[derive(Debug, Clone)]
pub struct DriveInfo {
    pub slot: DriveSlot,
    pub drive_type: DriveType,
    pub fs_type: FsType,
    /// Capacidade em MB (0 = desconhecida)
    pub size_mb: u32,
    pub model: String,
    pub present: bool,
    /// Identificador de montagem (`ide0`..`ide3`)
    pub id: &'static str,
}

impl DriveInfo {
    fn empty(slot: DriveSlot) -> Self {
        Self {
            slot,
            drive_type: DriveType::None,
            fs_type: FsType::Unknown,
            size_mb: 0,
            model: String::new(),
            present: false,
            id: slot.id(),
        }
    }

    /// Setores de 512 bytes correspondentes a `size_mb`
    pub fn sectors(&self) -> u64 {
        self.size_mb as u64 * 2048
    }
}

/// Os 4 slots e os dispositivos associados.
pub struct DriveRegistry {
    drives: [DriveInfo; MAX_DRIVES],
    devices: [Option<Arc<dyn BlockDevice>>; MAX_DRIVES],
}

impl DriveRegistry {
    pub fn new() -> Self {
        Self {
            drives: core::array::from_fn(|i| DriveInfo::empty(DriveSlot::ALL[i])),
            devices: Default::default(),
        }
    }

    /// Sonda os 4 slots do barramento. Retorna quantos drives foram encontrados.
    ///
    /// Falha no IDENTIFY não derruba o probe: o drive fica presente com
    /// capacidade desconhecida.
    pub fn probe(&mut self, bus: &Arc<IdeBus>) -> usize {
        crate::kinfo!("(ATA) Detectando drives...");

        for slot in DriveSlot::ALL {
            let i = slot.index();
            self.drives[i] = DriveInfo::empty(slot);
            self.devices[i] = None;

            if !bus.detect(slot) {
                crate::kdebug!("(ATA) Slot vazio:"; slot.label());
                continue;
            }

            let info = &mut self.drives[i];
            info.present = true;
            info.drive_type = DriveType::Ata;
            info.model = String::from(slot.label());

            let sectors = match bus.identify(slot) {
                Ok(data) => {
                    info.size_mb = data.size_mb();
                    let model = data.model();
                    if !model.is_empty() {
                        info.model = model;
                    }
                    data.sectors() as u64
                }
                Err(e) => {
                    crate::kwarn!("(ATA) IDENTIFY falhou, tamanho desconhecido:"; slot.label());
                    if e == super::BlockError::IoError {
                        info.drive_type = DriveType::Unknown;
                    }
                    0
                }
            };

            crate::kinfo!("(ATA) Drive encontrado:"; slot.id(), " ", slot.label());
            crate::kdebug!("(ATA) Drive BIOS (DL):", slot.bios_number());
            crate::kdebug!("(ATA) Tamanho MB:", info.size_mb);

            self.devices[i] = Some(Arc::new(AtaDrive::new(bus.clone(), slot, sectors)));
        }

        let count = self.count();
        crate::kinfo!("(ATA) Drives detectados:", count);
        count
    }

    /// Associa um dispositivo qualquer a um slot (RAM, imagem, teste).
    pub fn attach(&mut self, index: usize, device: Arc<dyn BlockDevice>, model: &str) -> bool {
        let Some(slot) = DriveSlot::new(index) else {
            return false;
        };

        let bytes = device.total_blocks() * device.block_size() as u64;
        let info = &mut self.drives[index];
        *info = DriveInfo::empty(slot);
        info.present = true;
        info.drive_type = DriveType::Ata;
        info.size_mb = (bytes / (1024 * 1024)) as u32;
        info.model = String::from(model);

        self.devices[index] = Some(device);
        true
    }

    pub fn drive(&self, index: usize) -> Option<&DriveInfo> {
        self.drives.get(index)
    }

    pub fn drive_mut(&mut self, index: usize) -> Option<&mut DriveInfo> {
        self.drives.get_mut(index)
    }

    pub fn device(&self, index: usize) -> Option<Arc<dyn BlockDevice>> {
        self.devices.get(index).and_then(|d| d.clone())
    }

    /// Descritor e dispositivo juntos (para format/mount).
    pub fn entry_mut(
        &mut self,
        index: usize,
    ) -> Option<(&mut DriveInfo, Option<Arc<dyn BlockDevice>>)> {
        let device = self.device(index);
        self.drives.get_mut(index).map(|info| (info, device))
    }

    /// Resolve `ide0`..`ide3` para índice de slot.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.drives.iter().position(|d| d.id == id)
    }

    /// Drives presentes
    pub fn count(&self) -> usize {
        self.drives.iter().filter(|d| d.present).count()
    }

    pub fn drives(&self) -> &[DriveInfo] {
        &self.drives
    }

    /// Tabela de drives presentes, uma linha por drive.
    ///
    /// Lê o setor 0 de cada drive, atualizando `fs_type`.
    pub fn list(&mut self) -> String {
        let mut out = String::from("Drives detectados:\n");

        for i in 0..MAX_DRIVES {
            if !self.drives[i].present {
                continue;
            }

            let formatted = match self.devices[i].clone() {
                Some(device) => crate::fs::mount::is_formatted(&mut self.drives[i], device.as_ref()),
                None => false,
            };

            let d = &self.drives[i];
            let _ = write!(
                out,
                " Drive {}: {}  id={}  DL=0x{:02X}  tamanho={}MB  [",
                i,
                d.model,
                d.id,
                d.slot.bios_number(),
                d.size_mb
            );
            if formatted {
                let _ = write!(out, "Formatado: {}]", d.fs_type);
            } else {
                out.push_str("Não formatado]");
            }
            out.push('\n');
        }

        out
    }
}

impl Default for DriveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

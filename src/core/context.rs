//! # Contexto do Kernel
//!
//! Dono único do estado do sistema de arquivos. A ordem de construção é
//! fixa: RAM disk (FS vazio) → registro de drives → tabela de montagem.
//!
//! Em hosts com mais de uma thread, use `KERNEL`: um único mutex protege
//! RAM disk e tabela de montagem, garantindo uma operação por vez.

use crate::drivers::block::{self, DriveRegistry, IdeBus};
use crate::fs::{
    format_drive, CopyError, FatFs, FormatError, FormatOptions, FsError, FsType, MountError,
    MountTable,
};
use crate::hal::PortIo;
use alloc::string::String;
use alloc::sync::Arc;
use spin::Mutex;

/// Contexto global (vazio até `boot`).
pub static KERNEL: Mutex<Option<Kernel>> = Mutex::new(None);

/// Estado completo: FS em RAM, drives e montagens.
pub struct Kernel {
    pub fs: FatFs,
    pub drives: DriveRegistry,
    pub mounts: MountTable,
    bus: Option<Arc<IdeBus>>,
}

impl Kernel {
    /// Contexto sem drives, com FS em RAM vazio.
    pub fn new() -> Result<Self, FsError> {
        let mut fs = FatFs::new();
        fs.init()?;
        Ok(Self {
            fs,
            drives: DriveRegistry::new(),
            mounts: MountTable::new(),
            bus: None,
        })
    }

    /// Inicializa o FS em RAM e sonda o barramento IDE.
    pub fn boot(io: Arc<dyn PortIo>) -> Result<Self, FsError> {
        crate::kinfo!("(Kernel) Inicializando sistema de arquivos...");
        let mut kernel = Self::new()?;

        let (bus, drives) = block::init(io);
        kernel.drives = drives;
        kernel.bus = Some(bus);

        crate::kok!("(Kernel) Sistema de arquivos pronto");
        Ok(kernel)
    }

    /// Instala `self` no contexto global, devolvendo o anterior.
    pub fn install(self) -> Option<Kernel> {
        KERNEL.lock().replace(self)
    }

    pub fn bus(&self) -> Option<&Arc<IdeBus>> {
        self.bus.as_ref()
    }

    /// Formata o drive `id` (`ide0`..`ide3`).
    pub fn format(&mut self, id: &str, options: &FormatOptions) -> Result<FsType, FormatError> {
        let index = self.drives.find(id).ok_or(FormatError::InvalidDrive)?;
        if self.mounts.slot_of(index).is_some() {
            // Drive montado não pode ser formatado
            return Err(FormatError::InvalidDrive);
        }

        let (info, device) = self
            .drives
            .entry_mut(index)
            .ok_or(FormatError::InvalidDrive)?;
        let device = device.ok_or(FormatError::InvalidDrive)?;
        format_drive(info, device.as_ref(), options).map_err(|e| {
            crate::kfail!("(FORMAT) Formatação falhou:"; id);
            e
        })
    }

    /// Monta o drive `id` e o torna corrente.
    pub fn mount(&mut self, id: &str) -> Result<usize, MountError> {
        let index = self.drives.find(id).ok_or(MountError::InvalidDrive)?;
        self.mounts
            .mount(&mut self.drives, index, &mut self.fs)
            .map_err(|e| {
                crate::kfail!("(MOUNT) Montagem falhou:"; " ", id);
                e
            })
    }

    /// Desmonta o drive `id`.
    pub fn unmount(&mut self, id: &str) -> Result<(), MountError> {
        let index = self.drives.find(id).ok_or(MountError::InvalidDrive)?;
        let slot = self.mounts.slot_of(index).ok_or(MountError::InvalidDrive)?;
        self.mounts.unmount(slot, &self.drives, &mut self.fs)
    }

    /// Grava o FS em RAM no drive corrente.
    pub fn sync(&self) -> Result<(), MountError> {
        self.mounts.sync(&self.drives, &self.fs)
    }

    pub fn prompt(&self) -> String {
        self.mounts.prompt()
    }

    pub fn list_drives(&mut self) -> String {
        self.drives.list()
    }

    pub fn copy(&mut self, src: &str, dst: &str) -> Result<usize, CopyError> {
        self.fs.copy_file(src, dst)
    }
}

//! # Dispositivos de Bloco
//!
//! Drivers e camada de abstração para dispositivos de bloco.
//!
//! ## Dispositivos Suportados
//!
//! | Driver      | Status      | Descrição                          |
//! |-------------|-------------|------------------------------------|
//! | ATA/IDE     | Funcional   | PIO LBA28, 2 canais × master/slave |
//! | Ramdisk     | Funcional   | Imagem de 256 KiB do FS ativo      |

pub mod ata;
pub mod ramdisk;
pub mod registry;
pub mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use ata::{AtaDrive, DriveSlot, IdeBus, Timeout};
pub use ramdisk::RamDisk;
pub use registry::{DriveInfo, DriveRegistry, DriveType, MAX_DRIVES};
pub use traits::{BlockDevice, BlockError};

use crate::hal::PortIo;
use alloc::sync::Arc;

/// Cria o barramento IDE sobre `io` e sonda os 4 slots.
pub fn init(io: Arc<dyn PortIo>) -> (Arc<IdeBus>, DriveRegistry) {
    crate::kinfo!("(Block) Inicializando subsistema de dispositivos de bloco...");

    let bus = Arc::new(IdeBus::new(io));
    let mut registry = DriveRegistry::new();
    registry.probe(&bus);

    (bus, registry)
}

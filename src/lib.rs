//! Forge FAT Core.
//!
//! Núcleo de sistema de arquivos FAT do kernel: RAM disk, tabela de
//! diretório única, formatação FAT12/16/32 em dispositivos reais, detecção
//! de drives IDE e tabela de montagem.
//!
//! ```text
//! DriveRegistry ──► Formatter ──► MountTable ──► BlockStore (RamDisk)
//!  (probe IDE)     (boot sector)   (load/flush)      ▲
//!                                                    │
//!                         DirectoryTable / FileOps / ClusterAllocator
//! ```

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (Vec/Box/Arc/String)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
#[cfg(target_arch = "x86_64")]
pub mod arch; // Port I/O x86
pub mod drivers; // Serial (logs) e dispositivos de bloco
pub mod hal; // Traits de hardware (Port I/O)

// --- Módulos Centrais ---
pub mod core; // Logging e contexto do kernel
pub mod klib; // Utilitários internos (Bitmap)

// --- Subsistemas ---
pub mod fs; // RAM FS, formatador, montagem

pub use crate::core::context::Kernel;
pub use crate::drivers::block::{BlockDevice, BlockError};

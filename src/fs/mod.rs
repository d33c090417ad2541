//! Sistema de Arquivos.
//!
//! Submódulos:
//! - `fat`: FS de diretório único sobre o RAM disk.
//! - `format`: Formatação FAT12/16/32 de dispositivos reais.
//! - `mount`: Tabela de montagem (carrega/grava a imagem do RAM disk).
//! - `error`: Tipos de erro.

pub mod error;
pub mod fat;
pub mod format;
pub mod mount;

#[cfg(test)]
mod tests;

pub use error::{CopyError, FormatError, FsError, MountError};
pub use fat::FatFs;
pub use format::{detect_media_type, format_drive, FormatOptions, MediaType};
pub use mount::{MountPoint, MountTable, MAX_MOUNTS};

use core::fmt;

/// Sistema de arquivos detectado em um drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FsType {
    #[default]
    Unknown,
    Fat12,
    Fat16,
    Fat32,
    Ext2,
    Ext4,
    Ntfs,
}

impl FsType {
    /// String de tipo gravada no boot sector ("FAT12   " etc.)
    pub fn label(self) -> Option<&'static [u8; 8]> {
        match self {
            FsType::Fat12 => Some(b"FAT12   "),
            FsType::Fat16 => Some(b"FAT16   "),
            FsType::Fat32 => Some(b"FAT32   "),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FsType::Unknown => "Unknown",
            FsType::Fat12 => "FAT12",
            FsType::Fat16 => "FAT16",
            FsType::Fat32 => "FAT32",
            FsType::Ext2 => "EXT2",
            FsType::Ext4 => "EXT4",
            FsType::Ntfs => "NTFS",
        }
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! # RAM Disk
//!
//! Armazenamento de blocos em memória (256 KiB, blocos de 512 bytes).
//!
//! ## Layout usado pelo sistema de arquivos
//!
//! | Bloco  | Uso                         |
//! |--------|-----------------------------|
//! | 0      | Reservado                   |
//! | 1-2    | FAT                         |
//! | 3      | Diretório raiz              |
//! | 4+     | Clusters de dados           |
//!
//! O RAM disk é também a imagem que a tabela de montagem carrega de um
//! drive real e grava de volta nele.

use super::traits::BlockError;
use alloc::boxed::Box;
use alloc::vec;

/// Tamanho de um bloco em bytes
pub const BLOCK_SIZE: usize = 512;

/// Tamanho total do RAM disk
pub const RAMDISK_SIZE: usize = 256 * 1024;

/// Número de blocos endereçáveis
pub const MAX_BLOCKS: usize = RAMDISK_SIZE / BLOCK_SIZE;

/// Disco em memória.
pub struct RamDisk {
    data: Box<[u8]>,
}

impl RamDisk {
    /// Cria um RAM disk zerado.
    pub fn new() -> Self {
        Self {
            data: vec![0u8; RAMDISK_SIZE].into_boxed_slice(),
        }
    }

    /// Zera todo o armazenamento.
    pub fn init(&mut self) {
        self.data.fill(0);
        crate::kinfo!("(RamDisk) Inicializado. Blocos:", MAX_BLOCKS);
    }

    fn range(block: usize) -> Result<core::ops::Range<usize>, BlockError> {
        if block >= MAX_BLOCKS {
            return Err(BlockError::InvalidBlock);
        }
        let start = block * BLOCK_SIZE;
        Ok(start..start + BLOCK_SIZE)
    }

    /// Copia um bloco para `buf` (mínimo 512 bytes).
    pub fn read(&self, block: usize, buf: &mut [u8]) -> Result<(), BlockError> {
        let range = Self::range(block)?;
        if buf.len() < BLOCK_SIZE {
            return Err(BlockError::InvalidBuffer);
        }
        buf[..BLOCK_SIZE].copy_from_slice(&self.data[range]);
        Ok(())
    }

    /// Copia `buf` (mínimo 512 bytes) para um bloco.
    pub fn write(&mut self, block: usize, buf: &[u8]) -> Result<(), BlockError> {
        let range = Self::range(block)?;
        if buf.len() < BLOCK_SIZE {
            return Err(BlockError::InvalidBuffer);
        }
        self.data[range].copy_from_slice(&buf[..BLOCK_SIZE]);
        Ok(())
    }

    /// Visão somente leitura de um bloco.
    pub fn block(&self, block: usize) -> Result<&[u8; BLOCK_SIZE], BlockError> {
        let range = Self::range(block)?;
        <&[u8; BLOCK_SIZE]>::try_from(&self.data[range]).map_err(|_| BlockError::InvalidBlock)
    }

    /// Visão mutável de um bloco, com tamanho verificado.
    pub fn block_mut(&mut self, block: usize) -> Result<&mut [u8; BLOCK_SIZE], BlockError> {
        let range = Self::range(block)?;
        <&mut [u8; BLOCK_SIZE]>::try_from(&mut self.data[range])
            .map_err(|_| BlockError::InvalidBlock)
    }

    /// Imagem completa (para flush em disco).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Substitui a imagem inteira. `image` deve ter exatamente `RAMDISK_SIZE` bytes.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), BlockError> {
        if image.len() != RAMDISK_SIZE {
            return Err(BlockError::InvalidBuffer);
        }
        self.data.copy_from_slice(image);
        Ok(())
    }
}

impl Default for RamDisk {
    fn default() -> Self {
        Self::new()
    }
}

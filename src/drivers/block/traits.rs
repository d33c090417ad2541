//! # Camada de Abstração de Dispositivos de Bloco
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │        Formatter / MountTable (fs::format, mount)   │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              BlockDevice Trait                      │
//! │   read_block() write_block() block_size()           │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              DRIVERS (ATA PIO)                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! O RAM disk não passa por esta trait: o sistema de arquivos o acessa
//! diretamente por número de bloco.

use core::fmt;

/// Tipos de erro para dispositivos de bloco
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// Dispositivo não encontrado ou não inicializado
    NotFound,
    /// Endereço de bloco inválido (fora do intervalo)
    InvalidBlock,
    /// Erro de I/O durante leitura/escrita
    IoError,
    /// Dispositivo somente leitura
    ReadOnly,
    /// Tamanho do buffer incorreto
    InvalidBuffer,
    /// Dispositivo não respondeu dentro do limite de tentativas
    Timeout,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::NotFound => write!(f, "Dispositivo não encontrado"),
            BlockError::InvalidBlock => write!(f, "Endereço de bloco inválido"),
            BlockError::IoError => write!(f, "Erro de I/O"),
            BlockError::ReadOnly => write!(f, "Dispositivo somente leitura"),
            BlockError::InvalidBuffer => write!(f, "Tamanho do buffer inválido"),
            BlockError::Timeout => write!(f, "Timeout do dispositivo"),
        }
    }
}

/// Trait para dispositivos de bloco
///
/// # Exemplo
///
/// ```ignore
/// let mut buffer = [0u8; 512];
/// device.read_block(0, &mut buffer)?;
/// ```
pub trait BlockDevice: Send + Sync {
    /// Lê um único bloco do dispositivo
    ///
    /// # Argumentos
    /// * `lba` - Endereço Lógico de Bloco (Logical Block Address)
    /// * `buf` - Buffer para armazenar os dados (mínimo block_size bytes)
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError>;

    /// Escreve um único bloco no dispositivo
    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError>;

    /// Retorna o tamanho do bloco em bytes (normalmente 512)
    fn block_size(&self) -> usize;

    /// Retorna o número total de blocos no dispositivo
    fn total_blocks(&self) -> u64;

    /// Verifica se o dispositivo é somente leitura
    fn is_read_only(&self) -> bool {
        false
    }

    /// Força a escrita de dados em cache para o dispositivo
    fn flush(&self) -> Result<(), BlockError> {
        Ok(())
    }

    /// Lê múltiplos blocos contíguos
    fn read_blocks(&self, start_lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let block_size = self.block_size();
        if block_size == 0 || buf.len() % block_size != 0 {
            return Err(BlockError::InvalidBuffer);
        }

        for (i, chunk) in buf.chunks_exact_mut(block_size).enumerate() {
            self.read_block(start_lba + i as u64, chunk)?;
        }
        Ok(())
    }

    /// Escreve múltiplos blocos contíguos
    fn write_blocks(&self, start_lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        let block_size = self.block_size();
        if block_size == 0 || buf.len() % block_size != 0 {
            return Err(BlockError::InvalidBuffer);
        }

        for (i, chunk) in buf.chunks_exact(block_size).enumerate() {
            self.write_block(start_lba + i as u64, chunk)?;
        }
        Ok(())
    }
}

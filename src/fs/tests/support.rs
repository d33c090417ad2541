//! Dispositivo de bloco em memória para os testes.

#![cfg(test)]

use crate::drivers::block::{BlockDevice, BlockError};
use alloc::collections::BTreeMap;
use spin::Mutex;

const SECTOR: usize = 512;

struct State {
    sectors: BTreeMap<u64, [u8; SECTOR]>,
    /// Escritas restantes antes de falhar (`None` = sem limite)
    writes_left: Option<usize>,
    writes: usize,
    flushes: usize,
}

/// Disco esparso: setores nunca escritos leem como zero.
pub struct MemDisk {
    total: u64,
    read_only: bool,
    /// Tamanho de bloco anunciado (os dados continuam em setores de 512)
    block_size: usize,
    state: Mutex<State>,
}

impl MemDisk {
    pub fn new(total_blocks: u64) -> Self {
        Self {
            total: total_blocks,
            read_only: false,
            block_size: SECTOR,
            state: Mutex::new(State {
                sectors: BTreeMap::new(),
                writes_left: None,
                writes: 0,
                flushes: 0,
            }),
        }
    }

    pub fn mb(mb: u32) -> Self {
        Self::new(mb as u64 * 2048)
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Permite `n` escritas; as seguintes devolvem `IoError`.
    pub fn fail_writes_after(&self, n: usize) {
        self.state.lock().writes_left = Some(n);
    }

    pub fn heal(&self) {
        self.state.lock().writes_left = None;
    }

    pub fn sector(&self, lba: u64) -> [u8; SECTOR] {
        self.state
            .lock()
            .sectors
            .get(&lba)
            .copied()
            .unwrap_or([0u8; SECTOR])
    }

    pub fn put_sector(&self, lba: u64, sector: [u8; SECTOR]) {
        self.state.lock().sectors.insert(lba, sector);
    }

    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }

    pub fn flushes(&self) -> usize {
        self.state.lock().flushes
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        if lba >= self.total {
            return Err(BlockError::InvalidBlock);
        }
        if buf.len() < SECTOR {
            return Err(BlockError::InvalidBuffer);
        }
        buf[..SECTOR].copy_from_slice(&self.sector(lba));
        Ok(())
    }

    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        if self.read_only {
            return Err(BlockError::ReadOnly);
        }
        if lba >= self.total {
            return Err(BlockError::InvalidBlock);
        }
        if buf.len() < SECTOR {
            return Err(BlockError::InvalidBuffer);
        }

        let mut state = self.state.lock();
        match state.writes_left {
            Some(0) => return Err(BlockError::IoError),
            Some(ref mut n) => *n -= 1,
            None => {}
        }

        let mut sector = [0u8; SECTOR];
        sector.copy_from_slice(&buf[..SECTOR]);
        state.sectors.insert(lba, sector);
        state.writes += 1;
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn total_blocks(&self) -> u64 {
        self.total
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn flush(&self) -> Result<(), BlockError> {
        let mut state = self.state.lock();
        if state.writes_left == Some(0) {
            return Err(BlockError::IoError);
        }
        state.flushes += 1;
        Ok(())
    }
}

//! # Driver ATA/IDE
//!
//! Driver para controladores ATA/IDE em modo PIO, canais primário e
//! secundário, master e slave.
//!
//! ## Portas I/O (relativas à base do canal: 0x1F0 primário, 0x170 secundário)
//!
//! | Offset | Função           |
//! |--------|------------------|
//! | +0     | Data Register    |
//! | +1     | Error/Features   |
//! | +2     | Sector Count     |
//! | +3     | LBA Low          |
//! | +4     | LBA Mid          |
//! | +5     | LBA High         |
//! | +6     | Drive/Head       |
//! | +7     | Status/Command   |
//!
//! Todo acesso ao hardware passa por `hal::PortIo`; esperas são laços com
//! número máximo de tentativas (`Timeout`) e nunca travam para sempre.

use super::traits::{BlockDevice, BlockError};
use crate::hal::PortIo;
use alloc::string::String;
use alloc::sync::Arc;
use bitflags::bitflags;
use spin::Mutex;

/// Base do canal primário
pub const PRIMARY_BASE: u16 = 0x1F0;
/// Base do canal secundário
pub const SECONDARY_BASE: u16 = 0x170;

/// Tamanho de setor ATA
pub const SECTOR_SIZE: usize = 512;

/// Maior LBA endereçável em LBA28
pub const LBA28_MAX: u64 = 0x0FFF_FFFF;

/// Offsets dos registradores
mod regs {
    pub const DATA: u16 = 0;
    pub const SECTOR_COUNT: u16 = 2;
    pub const LBA_LO: u16 = 3;
    pub const LBA_MID: u16 = 4;
    pub const LBA_HI: u16 = 5;
    pub const DRIVE_HEAD: u16 = 6;
    pub const STATUS: u16 = 7;
    pub const COMMAND: u16 = 7;
}

/// Comandos ATA
pub mod cmd {
    pub const READ_SECTORS: u8 = 0x20;
    pub const WRITE_SECTORS: u8 = 0x30;
    pub const CACHE_FLUSH: u8 = 0xE7;
    pub const IDENTIFY: u8 = 0xEC;
}

bitflags! {
    /// Bits do Status Register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AtaStatus: u8 {
        const BSY = 0x80;
        const DRDY = 0x40;
        const DRQ = 0x08;
        const ERR = 0x01;
    }
}

/// Limite de tentativas de um laço de polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    pub attempts: u32,
}

impl Timeout {
    /// Espera padrão por BSY/DRQ
    pub const DEFAULT: Timeout = Timeout { attempts: 100_000 };
    /// Leituras de status após selecionar o drive, antes de testar presença
    pub const SETTLE: Timeout = Timeout { attempts: 1_000 };
}

impl Default for Timeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// SLOTS
// =============================================================================

/// Um dos 4 slots IDE (canal × master/slave).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveSlot(u8);

impl DriveSlot {
    pub const ALL: [DriveSlot; 4] = [DriveSlot(0), DriveSlot(1), DriveSlot(2), DriveSlot(3)];

    pub fn new(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(DriveSlot(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Porta base do canal
    pub fn base_port(self) -> u16 {
        if self.0 < 2 {
            PRIMARY_BASE
        } else {
            SECONDARY_BASE
        }
    }

    pub fn is_slave(self) -> bool {
        self.0 & 1 == 1
    }

    /// Byte de seleção CHS (0xA0 master / 0xB0 slave)
    fn select_byte(self) -> u8 {
        0xA0 | ((self.is_slave() as u8) << 4)
    }

    /// Byte de seleção LBA com os 4 bits altos do endereço
    fn lba_select(self, lba: u32) -> u8 {
        0xE0 | ((self.is_slave() as u8) << 4) | ((lba >> 24) & 0x0F) as u8
    }

    /// Identificador de montagem (`ide0`..`ide3`)
    pub fn id(self) -> &'static str {
        ["ide0", "ide1", "ide2", "ide3"][self.index()]
    }

    /// Nome legível do slot
    pub fn label(self) -> &'static str {
        [
            "Primary Master",
            "Primary Slave",
            "Secondary Master",
            "Secondary Slave",
        ][self.index()]
    }

    /// Número de drive BIOS (0x80 + índice)
    pub fn bios_number(self) -> u8 {
        0x80 + self.0
    }
}

// =============================================================================
// IDENTIFY
// =============================================================================

/// Payload de 256 words devolvido pelo IDENTIFY.
#[derive(Clone)]
pub struct IdentifyData {
    words: [u16; 256],
}

impl IdentifyData {
    pub fn from_words(words: [u16; 256]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u16; 256] {
        &self.words
    }

    /// Setores endereçáveis: LBA28 (words 60-61); se zero, 32 bits baixos
    /// do LBA48 (words 100-101).
    pub fn sectors(&self) -> u32 {
        let lba28 = self.words[60] as u32 | (self.words[61] as u32) << 16;
        if lba28 != 0 {
            lba28
        } else {
            self.words[100] as u32 | (self.words[101] as u32) << 16
        }
    }

    /// Capacidade em MB (setores / 2048)
    pub fn size_mb(&self) -> u32 {
        self.sectors() / 2048
    }

    /// Modelo (words 27-46, byte alto primeiro), sem espaços nas pontas.
    pub fn model(&self) -> String {
        let mut model = String::with_capacity(40);
        for &word in &self.words[27..47] {
            for byte in [(word >> 8) as u8, (word & 0xFF) as u8] {
                if byte.is_ascii_graphic() || byte == b' ' {
                    model.push(byte as char);
                }
            }
        }
        String::from(model.trim())
    }
}

// =============================================================================
// BARRAMENTO
// =============================================================================

/// Controlador IDE (dois canais) acessado via `PortIo`.
pub struct IdeBus {
    io: Arc<dyn PortIo>,
    timeout: Timeout,
    settle: Timeout,
    // Um comando por vez no controlador
    lock: Mutex<()>,
}

impl IdeBus {
    pub fn new(io: Arc<dyn PortIo>) -> Self {
        Self {
            io,
            timeout: Timeout::DEFAULT,
            settle: Timeout::SETTLE,
            lock: Mutex::new(()),
        }
    }

    /// Substitui o limite de polling de BSY/DRQ.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Substitui o número de leituras de acomodação do probe.
    pub fn with_settle(mut self, settle: Timeout) -> Self {
        self.settle = settle;
        self
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    #[inline]
    fn status(&self, base: u16) -> AtaStatus {
        AtaStatus::from_bits_retain(self.io.inb(base + regs::STATUS))
    }

    /// Espera BSY=0
    fn wait_not_busy(&self, base: u16) -> Result<AtaStatus, BlockError> {
        for _ in 0..self.timeout.attempts {
            let status = self.status(base);
            if !status.contains(AtaStatus::BSY) {
                return Ok(status);
            }
        }
        Err(BlockError::Timeout)
    }

    /// Espera DRQ=1 (ERR aborta)
    fn wait_drq(&self, base: u16) -> Result<(), BlockError> {
        for _ in 0..self.timeout.attempts {
            let status = self.status(base);
            if status.contains(AtaStatus::ERR) {
                return Err(BlockError::IoError);
            }
            if !status.contains(AtaStatus::BSY) && status.contains(AtaStatus::DRQ) {
                return Ok(());
            }
        }
        Err(BlockError::Timeout)
    }

    /// Seleciona o drive e verifica presença pelo status (0x00 ou 0xFF = ausente).
    pub fn detect(&self, slot: DriveSlot) -> bool {
        let _guard = self.lock.lock();
        let base = slot.base_port();

        self.io.outb(base + regs::DRIVE_HEAD, slot.select_byte());
        for _ in 0..self.settle.attempts {
            let _ = self.io.inb(base + regs::STATUS);
        }

        let status = self.io.inb(base + regs::STATUS);
        status != 0x00 && status != 0xFF
    }

    /// Executa IDENTIFY DEVICE.
    pub fn identify(&self, slot: DriveSlot) -> Result<IdentifyData, BlockError> {
        let _guard = self.lock.lock();
        let base = slot.base_port();

        self.io.outb(base + regs::DRIVE_HEAD, slot.select_byte());
        self.io.outb(base + regs::SECTOR_COUNT, 0);
        self.io.outb(base + regs::LBA_LO, 0);
        self.io.outb(base + regs::LBA_MID, 0);
        self.io.outb(base + regs::LBA_HI, 0);
        self.io.outb(base + regs::COMMAND, cmd::IDENTIFY);

        if self.io.inb(base + regs::STATUS) == 0 {
            return Err(BlockError::NotFound);
        }

        let status = self.wait_not_busy(base)?;
        if status.contains(AtaStatus::ERR) || !status.contains(AtaStatus::DRQ) {
            // ATAPI aborta IDENTIFY DEVICE com ERR
            return Err(BlockError::IoError);
        }

        let mut words = [0u16; 256];
        for word in words.iter_mut() {
            *word = self.io.inw(base + regs::DATA);
        }
        Ok(IdentifyData::from_words(words))
    }

    fn setup_lba(&self, slot: DriveSlot, lba: u32, command: u8) {
        let base = slot.base_port();
        self.io.outb(base + regs::DRIVE_HEAD, slot.lba_select(lba));
        self.io.outb(base + regs::SECTOR_COUNT, 1);
        self.io.outb(base + regs::LBA_LO, (lba & 0xFF) as u8);
        self.io.outb(base + regs::LBA_MID, ((lba >> 8) & 0xFF) as u8);
        self.io.outb(base + regs::LBA_HI, ((lba >> 16) & 0xFF) as u8);
        self.io.outb(base + regs::COMMAND, command);
    }

    /// Lê um setor (LBA28).
    pub fn read_sector(&self, slot: DriveSlot, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        if lba > LBA28_MAX {
            return Err(BlockError::InvalidBlock);
        }
        if buf.len() < SECTOR_SIZE {
            return Err(BlockError::InvalidBuffer);
        }

        let _guard = self.lock.lock();
        let base = slot.base_port();

        self.wait_not_busy(base)?;
        self.setup_lba(slot, lba as u32, cmd::READ_SECTORS);
        self.wait_drq(base)?;

        for pair in buf[..SECTOR_SIZE].chunks_exact_mut(2) {
            let word = self.io.inw(base + regs::DATA);
            pair.copy_from_slice(&word.to_le_bytes());
        }

        crate::ktrace!("(ATA) Setor lido:", lba);
        Ok(())
    }

    /// Escreve um setor (LBA28) e força CACHE FLUSH.
    pub fn write_sector(&self, slot: DriveSlot, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        if lba > LBA28_MAX {
            return Err(BlockError::InvalidBlock);
        }
        if buf.len() < SECTOR_SIZE {
            return Err(BlockError::InvalidBuffer);
        }

        let _guard = self.lock.lock();
        let base = slot.base_port();

        self.wait_not_busy(base)?;
        self.setup_lba(slot, lba as u32, cmd::WRITE_SECTORS);
        self.wait_drq(base)?;

        for pair in buf[..SECTOR_SIZE].chunks_exact(2) {
            self.io
                .outw(base + regs::DATA, u16::from_le_bytes([pair[0], pair[1]]));
        }

        self.io.outb(base + regs::COMMAND, cmd::CACHE_FLUSH);
        let status = self.wait_not_busy(base)?;
        if status.contains(AtaStatus::ERR) {
            return Err(BlockError::IoError);
        }

        crate::ktrace!("(ATA) Setor escrito:", lba);
        Ok(())
    }
}

// =============================================================================
// DISPOSITIVO
// =============================================================================

/// Drive ATA exposto como `BlockDevice`.
pub struct AtaDrive {
    bus: Arc<IdeBus>,
    slot: DriveSlot,
    /// Número total de setores (0 = desconhecido)
    sectors: u64,
}

impl AtaDrive {
    pub fn new(bus: Arc<IdeBus>, slot: DriveSlot, sectors: u64) -> Self {
        Self { bus, slot, sectors }
    }

    pub fn slot(&self) -> DriveSlot {
        self.slot
    }
}

impl BlockDevice for AtaDrive {
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        if lba >= self.sectors {
            return Err(BlockError::InvalidBlock);
        }
        self.bus.read_sector(self.slot, lba, buf)
    }

    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        if lba >= self.sectors {
            return Err(BlockError::InvalidBlock);
        }
        self.bus.write_sector(self.slot, lba, buf)
    }

    fn block_size(&self) -> usize {
        SECTOR_SIZE
    }

    fn total_blocks(&self) -> u64 {
        self.sectors
    }
}

//! # Diretório Raiz
//!
//! Tabela fixa de 16 entradas de 32 bytes guardada no bloco 3 do RAM disk.
//! A tabela é lida para um array tipado, alterada e escrita de volta; nunca
//! há ponteiro cru sobre o bloco.
//!
//! ## Formato de Entrada (32 bytes)
//!
//! | Offset | Tamanho | Descrição                    |
//! |--------|---------|------------------------------|
//! | 0x00   | 8       | Nome (maiúsculo, com espaços)|
//! | 0x08   | 3       | Extensão                     |
//! | 0x0B   | 1       | Atributos                    |
//! | 0x0C   | 1       | Reservado                    |
//! | 0x0D   | 1       | Criação (décimos de 10 ms)   |
//! | 0x0E   | 2       | Hora de criação              |
//! | 0x10   | 2       | Data de criação              |
//! | 0x12   | 2       | Último acesso                |
//! | 0x14   | 2       | Cluster alto (sempre 0)      |
//! | 0x16   | 2       | Hora de escrita              |
//! | 0x18   | 2       | Data de escrita              |
//! | 0x1A   | 2       | Cluster inicial              |
//! | 0x1C   | 4       | Tamanho do arquivo           |

use super::cluster::Cluster;
use super::layout::{DIR_ENTRY_SIZE, MAX_ROOT_ENTRIES, ROOT_DIR_BLOCK};
use super::FatFs;
use crate::drivers::block::ramdisk::{RamDisk, BLOCK_SIZE};
use crate::fs::FsError;
use alloc::string::String;
use bitflags::bitflags;

/// Slot nunca usado
pub const DIR_ENTRY_FREE: u8 = 0x00;
/// Slot apagado
pub const DIR_ENTRY_DELETED: u8 = 0xE5;
/// Forma gravada de um nome que começa com 0xE5
const DIR_ENTRY_KANJI: u8 = 0x05;

bitflags! {
    /// Atributos de arquivo
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttr: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN = 0x02;
        const SYSTEM = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE = 0x20;
    }
}

// =============================================================================
// NOMES 8.3
// =============================================================================

/// Nome 8.3 canônico, na forma gravada no disco.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortName {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    /// Nome ou extensão perderam caracteres
    pub truncated: bool,
}

/// Divide no primeiro '.', converte a-z para maiúsculas e completa com
/// espaços. Base acima de 8 ou extensão acima de 3 caracteres são cortadas
/// (reportado em `truncated`, nunca erro).
pub fn format_name_ext(raw: &str) -> ShortName {
    let bytes = raw.as_bytes();
    let (base, ext) = match bytes.iter().position(|&b| b == b'.') {
        Some(dot) => (&bytes[..dot], &bytes[dot + 1..]),
        None => (bytes, &[][..]),
    };

    let mut name = [b' '; 8];
    for (dst, &src) in name.iter_mut().zip(base) {
        *dst = src.to_ascii_uppercase();
    }

    let mut extension = [b' '; 3];
    for (dst, &src) in extension.iter_mut().zip(ext) {
        *dst = src.to_ascii_uppercase();
    }

    if name[0] == DIR_ENTRY_DELETED {
        name[0] = DIR_ENTRY_KANJI;
    }

    ShortName {
        name,
        ext: extension,
        truncated: base.len() > 8 || ext.len() > 3,
    }
}

// =============================================================================
// ENTRADA
// =============================================================================

/// Entrada de diretório (32 bytes no disco)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    pub attr: FileAttr,
    pub reserved: u8,
    pub creation_time_10ms: u8,
    pub creation_time: u16,
    pub creation_date: u16,
    pub last_access: u16,
    pub high_cluster: u16,
    pub write_time: u16,
    pub write_date: u16,
    /// Cabeça da cadeia de clusters (0 = nenhum)
    pub start_cluster: Cluster,
    pub file_size: u32,
}

impl DirEntry {
    /// Slot livre (todos os bytes zero)
    pub const EMPTY: DirEntry = DirEntry {
        name: [0; 8],
        ext: [0; 3],
        attr: FileAttr::empty(),
        reserved: 0,
        creation_time_10ms: 0,
        creation_time: 0,
        creation_date: 0,
        last_access: 0,
        high_cluster: 0,
        write_time: 0,
        write_date: 0,
        start_cluster: 0,
        file_size: 0,
    };

    /// Decodifica 32 bytes crus.
    pub fn parse(data: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let u16_at = |o: usize| u16::from_le_bytes([data[o], data[o + 1]]);

        let mut name = [0u8; 8];
        name.copy_from_slice(&data[0..8]);
        let mut ext = [0u8; 3];
        ext.copy_from_slice(&data[8..11]);

        Self {
            name,
            ext,
            attr: FileAttr::from_bits_retain(data[11]),
            reserved: data[12],
            creation_time_10ms: data[13],
            creation_time: u16_at(14),
            creation_date: u16_at(16),
            last_access: u16_at(18),
            high_cluster: u16_at(20),
            write_time: u16_at(22),
            write_date: u16_at(24),
            start_cluster: u16_at(26),
            file_size: u32::from_le_bytes([data[28], data[29], data[30], data[31]]),
        }
    }

    /// Codifica em 32 bytes.
    pub fn write_to(&self, out: &mut [u8; DIR_ENTRY_SIZE]) {
        out[0..8].copy_from_slice(&self.name);
        out[8..11].copy_from_slice(&self.ext);
        out[11] = self.attr.bits();
        out[12] = self.reserved;
        out[13] = self.creation_time_10ms;
        out[14..16].copy_from_slice(&self.creation_time.to_le_bytes());
        out[16..18].copy_from_slice(&self.creation_date.to_le_bytes());
        out[18..20].copy_from_slice(&self.last_access.to_le_bytes());
        out[20..22].copy_from_slice(&self.high_cluster.to_le_bytes());
        out[22..24].copy_from_slice(&self.write_time.to_le_bytes());
        out[24..26].copy_from_slice(&self.write_date.to_le_bytes());
        out[26..28].copy_from_slice(&self.start_cluster.to_le_bytes());
        out[28..32].copy_from_slice(&self.file_size.to_le_bytes());
    }

    pub fn is_free(&self) -> bool {
        self.name[0] == DIR_ENTRY_FREE
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == DIR_ENTRY_DELETED
    }

    /// Nem livre nem apagada
    pub fn is_live(&self) -> bool {
        !self.is_free() && !self.is_deleted()
    }

    pub fn is_directory(&self) -> bool {
        self.attr.contains(FileAttr::DIRECTORY)
    }

    pub fn matches(&self, name: &ShortName) -> bool {
        self.is_live() && self.name == name.name && self.ext == name.ext
    }

    /// `NOME.EXT` sem espaços (sem ponto quando não há extensão).
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(12);
        for (i, &c) in self.name.iter().enumerate() {
            if c == b' ' {
                break;
            }
            let c = if i == 0 && c == DIR_ENTRY_KANJI { DIR_ENTRY_DELETED } else { c };
            out.push(c as char);
        }

        let ext_len = self.ext.iter().rposition(|&c| c != b' ').map_or(0, |p| p + 1);
        if ext_len > 0 {
            out.push('.');
            for &c in &self.ext[..ext_len] {
                out.push(c as char);
            }
        }
        out
    }
}

// =============================================================================
// TABELA
// =============================================================================

/// Cópia tipada do bloco do diretório raiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTable {
    entries: [DirEntry; MAX_ROOT_ENTRIES],
}

impl DirectoryTable {
    pub const fn empty() -> Self {
        Self {
            entries: [DirEntry::EMPTY; MAX_ROOT_ENTRIES],
        }
    }

    pub fn from_block(block: &[u8; BLOCK_SIZE]) -> Self {
        let mut table = Self::empty();
        for (entry, raw) in table.entries.iter_mut().zip(block.chunks_exact(DIR_ENTRY_SIZE)) {
            if let Ok(raw) = <&[u8; DIR_ENTRY_SIZE]>::try_from(raw) {
                *entry = DirEntry::parse(raw);
            }
        }
        table
    }

    pub fn to_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        for (entry, raw) in self.entries.iter().zip(block.chunks_exact_mut(DIR_ENTRY_SIZE)) {
            if let Ok(raw) = <&mut [u8; DIR_ENTRY_SIZE]>::try_from(raw) {
                entry.write_to(raw);
            }
        }
    }

    /// Lê o bloco do diretório raiz.
    pub fn load(disk: &RamDisk) -> Result<Self, FsError> {
        Ok(Self::from_block(disk.block(ROOT_DIR_BLOCK)?))
    }

    /// Grava no bloco do diretório raiz.
    pub fn store(&self, disk: &mut RamDisk) -> Result<(), FsError> {
        self.to_block(disk.block_mut(ROOT_DIR_BLOCK)?);
        Ok(())
    }

    /// Todas as entradas em ordem de slot (inclui livres e apagadas)
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn live(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter().filter(|e| e.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn get(&self, slot: usize) -> Option<&DirEntry> {
        self.entries.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut DirEntry> {
        self.entries.get_mut(slot)
    }

    /// Primeiro slot vivo com o mesmo nome
    pub fn find(&self, name: &ShortName) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(name))
    }

    /// Ocupa o primeiro slot livre ou apagado com um arquivo vazio.
    pub fn claim(&mut self, name: &ShortName) -> Result<usize, FsError> {
        let slot = self
            .entries
            .iter()
            .position(|e| !e.is_live())
            .ok_or(FsError::DirectoryFull)?;

        self.entries[slot] = DirEntry {
            name: name.name,
            ext: name.ext,
            attr: FileAttr::ARCHIVE,
            ..DirEntry::EMPTY
        };
        Ok(slot)
    }

    /// Marca o slot como apagado.
    pub fn tombstone(&mut self, slot: usize) {
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.name[0] = DIR_ENTRY_DELETED;
        }
    }
}

impl Default for DirectoryTable {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// OPERAÇÕES
// =============================================================================

impl FatFs {
    /// Tabela do diretório raiz e número de entradas vivas.
    pub fn list_entries(&self) -> Result<(DirectoryTable, usize), FsError> {
        let table = DirectoryTable::load(&self.disk)?;
        let count = table.live_count();
        Ok((table, count))
    }

    /// Procura uma entrada viva pelo nome (sem distinção de caixa).
    pub fn find_entry(&self, name: &str) -> Result<DirEntry, FsError> {
        let table = DirectoryTable::load(&self.disk)?;
        let short = format_name_ext(name);
        table
            .find(&short)
            .and_then(|slot| table.get(slot).copied())
            .ok_or(FsError::NotFound)
    }

    /// Cria um arquivo vazio.
    pub fn create_entry(&mut self, name: &str) -> Result<DirEntry, FsError> {
        let mut table = DirectoryTable::load(&self.disk)?;
        let short = format_name_ext(name);

        if table.find(&short).is_some() {
            return Err(FsError::AlreadyExists);
        }
        if short.truncated {
            crate::kdebug!("(FAT) Nome truncado para 8.3:"; name);
        }

        let slot = table.claim(&short)?;
        table.store(&mut self.disk)?;

        crate::ktrace!("(FAT) Entrada criada no slot:", slot);
        table.get(slot).copied().ok_or(FsError::InvalidBlock)
    }

    /// Apaga um arquivo e libera seu cluster.
    pub fn delete_entry(&mut self, name: &str) -> Result<(), FsError> {
        let mut table = DirectoryTable::load(&self.disk)?;
        let short = format_name_ext(name);

        let slot = table.find(&short).ok_or(FsError::NotFound)?;
        let cluster = table.get(slot).map_or(0, |e| e.start_cluster);

        table.tombstone(slot);
        table.store(&mut self.disk)?;
        if cluster != 0 {
            self.clusters.free(cluster);
        }

        crate::ktrace!("(FAT) Entrada apagada no slot:", slot);
        Ok(())
    }
}

//! # Formatador FAT12/16/32
//!
//! Escolhe a geometria pela capacidade do drive e grava, setor a setor:
//!
//! ```text
//! setor 0        boot sector (BPB + 0x55AA)
//! setor 1        FSInfo (FAT32)
//! setor 6        cópia do boot sector (FAT32)
//! reservados..   FAT #1, FAT #2 (primeiro setor com as entradas reservadas)
//! ..             diretório raiz (FAT12/16) ou cluster raiz (FAT32)
//! dados..        janela da imagem do RAM disk (4 setores zerados, ou 512
//!                em formatação completa)
//! ```
//!
//! Qualquer falha de escrita aborta na hora com `WriteFailed`. Setores já
//! gravados ficam como estão; é preciso formatar de novo.

use crate::drivers::block::ata::LBA28_MAX;
use crate::drivers::block::ramdisk::MAX_BLOCKS;
use crate::drivers::block::{BlockDevice, DriveInfo};
use crate::fs::fat::layout::DATA_BLOCK_START;
use crate::fs::fat::Bpb;
use crate::fs::{FormatError, FsType};
use crate::klib::div_ceil;
use alloc::string::String;

/// Bytes por setor (fixo)
pub const BYTES_PER_SECTOR: u16 = 512;

const OEM_NAME: &[u8; 8] = b"NAOKER  ";
const DEFAULT_LABEL: &[u8; 11] = b"NO NAME    ";
const VOLUME_SERIAL: u32 = 0x1234_5678;
const EXT_BOOT_SIGNATURE: u8 = 0x29;

const FSINFO_LEAD_SIG: u32 = 0x4161_5252;
const FSINFO_STRUCT_SIG: u32 = 0x6141_7272;
const FSINFO_UNKNOWN: u32 = 0xFFFF_FFFF;

const FAT32_FSINFO_SECTOR: u16 = 1;
const FAT32_BACKUP_BOOT_SECTOR: u16 = 6;
/// Cópia do FSInfo, logo após a cópia do boot sector
const FAT32_BACKUP_FSINFO_SECTOR: u16 = 7;
const FAT32_ROOT_CLUSTER: u32 = 2;

/// Opções de formatação
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Rótulo do volume (até 11 bytes; vazio = "NO NAME")
    pub volume_label: String,
    /// Falso: zera também toda a janela da imagem do RAM disk
    pub quick_format: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            volume_label: String::new(),
            quick_format: true,
        }
    }
}

impl FormatOptions {
    /// Rótulo com 11 bytes, completado com espaços.
    pub fn label_bytes(&self) -> [u8; 11] {
        if self.volume_label.is_empty() {
            return *DEFAULT_LABEL;
        }
        let mut label = [b' '; 11];
        for (dst, &src) in label.iter_mut().zip(self.volume_label.as_bytes()) {
            *dst = src;
        }
        label
    }
}

// =============================================================================
// CLASSES DE MÍDIA
// =============================================================================

/// Classe de mídia escolhida pela capacidade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Floppy360K,
    Floppy720K,
    Floppy1_2M,
    Floppy1_44M,
    Floppy2_88M,
    /// Abaixo de 32 MB
    HddSmall,
    /// Até 512 MB
    HddMedium,
    HddLarge,
}

impl MediaType {
    /// Escada de limiares em KB para disquetes, em MB para discos.
    pub fn from_size_kb(size_kb: u64) -> Self {
        match size_kb {
            0..=400 => MediaType::Floppy360K,
            401..=800 => MediaType::Floppy720K,
            801..=1300 => MediaType::Floppy1_2M,
            1301..=1500 => MediaType::Floppy1_44M,
            1501..=3000 => MediaType::Floppy2_88M,
            _ => match size_kb / 1024 {
                0..=31 => MediaType::HddSmall,
                32..=512 => MediaType::HddMedium,
                _ => MediaType::HddLarge,
            },
        }
    }

    pub fn fat_type(self) -> FsType {
        match self {
            MediaType::HddMedium => FsType::Fat16,
            MediaType::HddLarge => FsType::Fat32,
            _ => FsType::Fat12,
        }
    }

    pub fn is_floppy(self) -> bool {
        !matches!(
            self,
            MediaType::HddSmall | MediaType::HddMedium | MediaType::HddLarge
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            MediaType::Floppy360K => "Floppy 360KB",
            MediaType::Floppy720K => "Floppy 720KB",
            MediaType::Floppy1_2M => "Floppy 1.2MB",
            MediaType::Floppy1_44M => "Floppy 1.44MB",
            MediaType::Floppy2_88M => "Floppy 2.88MB",
            MediaType::HddSmall => "Small HDD",
            MediaType::HddMedium => "Medium HDD",
            MediaType::HddLarge => "Large HDD",
        }
    }
}

/// Classe de mídia para uma capacidade em MB.
pub fn detect_media_type(size_mb: u32) -> MediaType {
    MediaType::from_size_kb(size_mb as u64 * 1024)
}

// =============================================================================
// GEOMETRIA
// =============================================================================

/// Geometria completa de um volume a ser formatado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub media: MediaType,
    pub fs_type: FsType,
    pub total_sectors: u32,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    /// Entradas do diretório raiz (0 em FAT32)
    pub root_entries: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u32,
    pub sectors_per_track: u16,
    pub heads: u16,
}

impl Geometry {
    /// Calcula a geometria para `media` num drive de `total_sectors` setores.
    pub fn new(media: MediaType, total_sectors: u32) -> Self {
        match media.fat_type() {
            FsType::Fat16 => Self::fat16(total_sectors),
            FsType::Fat32 => Self::fat32(total_sectors),
            _ if media.is_floppy() => Self::fat12_floppy(media, total_sectors),
            _ => Self::fat12_hdd(total_sectors),
        }
    }

    fn fat12_floppy(media: MediaType, device_sectors: u32) -> Self {
        let (total, spc, descriptor) = match media {
            MediaType::Floppy360K => (720, 2, 0xFD),
            MediaType::Floppy720K => (1440, 2, 0xF9),
            MediaType::Floppy1_2M => (2400, 1, 0xF9),
            MediaType::Floppy1_44M => (2880, 1, 0xF0),
            _ => (5760, 2, 0xF0),
        };

        let mut geo = Self {
            media,
            fs_type: FsType::Fat12,
            // Nunca anunciar mais setores do que o drive tem
            total_sectors: if device_sectors != 0 { total.min(device_sectors) } else { total },
            sectors_per_cluster: spc,
            reserved_sectors: 1,
            num_fats: 2,
            root_entries: 224,
            media_descriptor: descriptor,
            sectors_per_fat: 0,
            sectors_per_track: 18,
            heads: 2,
        };

        // 1.5 byte por entrada: um setor cobre spc*512/3*2 clusters
        let tmp = geo.data_area();
        let per_sector = spc as u64 * BYTES_PER_SECTOR as u64 / 3 * 2;
        geo.sectors_per_fat =
            ((tmp + per_sector - 1) / (per_sector + geo.num_fats as u64)) as u32;
        geo
    }

    fn fat12_hdd(total_sectors: u32) -> Self {
        let spc = if total_sectors < 16 * 2048 { 8 } else { 16 };
        let mut geo = Self::hdd(MediaType::HddSmall, FsType::Fat12, total_sectors, spc, 1, 512);

        let clusters = geo.data_area() / spc as u64;
        geo.sectors_per_fat = div_ceil((clusters + 2) * 3, 2 * BYTES_PER_SECTOR as u64) as u32;
        geo
    }

    fn fat16(total_sectors: u32) -> Self {
        let spc = match total_sectors / 2048 {
            0..=127 => 4,
            128..=255 => 8,
            _ => 16,
        };
        let mut geo = Self::hdd(MediaType::HddMedium, FsType::Fat16, total_sectors, spc, 1, 512);

        let clusters = geo.data_area() / spc as u64;
        geo.sectors_per_fat = div_ceil(clusters * 2, BYTES_PER_SECTOR as u64) as u32;
        geo
    }

    fn fat32(total_sectors: u32) -> Self {
        let spc = if total_sectors / 2048 < 8192 { 8 } else { 16 };
        let mut geo = Self::hdd(MediaType::HddLarge, FsType::Fat32, total_sectors, spc, 32, 0);

        let clusters = geo.data_area() / spc as u64;
        geo.sectors_per_fat = div_ceil(clusters * 4, BYTES_PER_SECTOR as u64) as u32;
        geo
    }

    fn hdd(
        media: MediaType,
        fs_type: FsType,
        total_sectors: u32,
        spc: u8,
        reserved: u16,
        root_entries: u16,
    ) -> Self {
        Self {
            media,
            fs_type,
            total_sectors,
            sectors_per_cluster: spc,
            reserved_sectors: reserved,
            num_fats: 2,
            root_entries,
            media_descriptor: 0xF8,
            sectors_per_fat: 0,
            sectors_per_track: 63,
            heads: 255,
        }
    }

    /// Setores depois dos reservados e do diretório raiz (FATs incluídas)
    fn data_area(&self) -> u64 {
        (self.total_sectors as u64)
            .saturating_sub(self.reserved_sectors as u64 + self.root_dir_sectors() as u64)
    }

    pub fn root_dir_sectors(&self) -> u32 {
        let bps = BYTES_PER_SECTOR as u32;
        (self.root_entries as u32 * 32 + bps - 1) / bps
    }

    /// Primeiro setor da cópia `copy` da FAT
    pub fn fat_lba(&self, copy: u8) -> u64 {
        self.reserved_sectors as u64 + copy as u64 * self.sectors_per_fat as u64
    }

    /// Diretório raiz (FAT12/16) ou cluster raiz (FAT32)
    pub fn root_lba(&self) -> u64 {
        self.fat_lba(self.num_fats)
    }

    /// Setores a zerar na região raiz
    pub fn root_sectors(&self) -> u32 {
        if self.fs_type == FsType::Fat32 {
            self.sectors_per_cluster as u32
        } else {
            self.root_dir_sectors()
        }
    }

    /// Boot sector completo.
    pub fn boot_sector(&self, label: &[u8; 11]) -> [u8; 512] {
        let mut s = [0u8; 512];
        let fat32 = self.fs_type == FsType::Fat32;

        s[0..3].copy_from_slice(if fat32 { &[0xEBu8, 0x58, 0x90] } else { &[0xEBu8, 0x3C, 0x90] });
        s[3..11].copy_from_slice(OEM_NAME);

        s[11..13].copy_from_slice(&BYTES_PER_SECTOR.to_le_bytes());
        s[13] = self.sectors_per_cluster;
        s[14..16].copy_from_slice(&self.reserved_sectors.to_le_bytes());
        s[16] = self.num_fats;
        s[17..19].copy_from_slice(&self.root_entries.to_le_bytes());

        if !fat32 && self.total_sectors < 65536 {
            s[19..21].copy_from_slice(&(self.total_sectors as u16).to_le_bytes());
        } else {
            s[32..36].copy_from_slice(&self.total_sectors.to_le_bytes());
        }

        s[21] = self.media_descriptor;
        if !fat32 {
            s[22..24].copy_from_slice(&(self.sectors_per_fat as u16).to_le_bytes());
        }
        s[24..26].copy_from_slice(&self.sectors_per_track.to_le_bytes());
        s[26..28].copy_from_slice(&self.heads.to_le_bytes());
        // 28..32: setores ocultos = 0

        let ext = if fat32 {
            s[36..40].copy_from_slice(&self.sectors_per_fat.to_le_bytes());
            // 40..44: flags e versão = 0
            s[44..48].copy_from_slice(&FAT32_ROOT_CLUSTER.to_le_bytes());
            s[48..50].copy_from_slice(&FAT32_FSINFO_SECTOR.to_le_bytes());
            s[50..52].copy_from_slice(&FAT32_BACKUP_BOOT_SECTOR.to_le_bytes());
            64
        } else {
            36
        };

        // Campos estendidos: assinatura, serial, rótulo, tipo
        s[ext] = EXT_BOOT_SIGNATURE;
        s[ext + 1..ext + 5].copy_from_slice(&VOLUME_SERIAL.to_le_bytes());
        let label_at = if fat32 { 71 } else { 43 };
        s[label_at..label_at + 11].copy_from_slice(label);
        if let Some(name) = self.fs_type.label() {
            s[label_at + 11..label_at + 19].copy_from_slice(name);
        }

        s[510] = 0x55;
        s[511] = 0xAA;
        s
    }

    /// Primeiro setor de cada FAT (entradas reservadas).
    pub fn fat_header(&self) -> [u8; 512] {
        let mut s = [0u8; 512];
        match self.fs_type {
            FsType::Fat32 => {
                s[0..4].copy_from_slice(&0x0FFF_FFF8u32.to_le_bytes());
                s[4..8].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
                // Entrada 2: cluster raiz, fim de cadeia
                s[8..12].copy_from_slice(&0x0FFF_FFFFu32.to_le_bytes());
            }
            FsType::Fat16 => {
                s[0] = self.media_descriptor;
                s[1] = 0xFF;
                s[2] = 0xFF;
                s[3] = 0xFF;
            }
            _ => {
                s[0] = self.media_descriptor;
                s[1] = 0xFF;
                s[2] = 0xFF;
            }
        }
        s
    }

    /// Setor FSInfo (apenas FAT32)
    pub fn fs_info(&self) -> Option<[u8; 512]> {
        if self.fs_type != FsType::Fat32 {
            return None;
        }
        let mut s = [0u8; 512];
        s[0..4].copy_from_slice(&FSINFO_LEAD_SIG.to_le_bytes());
        s[484..488].copy_from_slice(&FSINFO_STRUCT_SIG.to_le_bytes());
        s[488..492].copy_from_slice(&FSINFO_UNKNOWN.to_le_bytes());
        s[492..496].copy_from_slice(&FSINFO_UNKNOWN.to_le_bytes());
        s[510] = 0x55;
        s[511] = 0xAA;
        Some(s)
    }
}

// =============================================================================
// FORMATAÇÃO
// =============================================================================

fn write_sector(device: &dyn BlockDevice, lba: u64, sector: &[u8; 512]) -> Result<(), FormatError> {
    device.write_block(lba, sector).map_err(|e| {
        crate::kerror!("(FORMAT) Falha ao gravar setor:", lba);
        FormatError::from(e)
    })
}

/// Formata `device` (descrito por `drive`) com o FAT adequado à capacidade.
///
/// Em caso de sucesso atualiza `drive.fs_type` e retorna o tipo gravado.
pub fn format_drive(
    drive: &mut DriveInfo,
    device: &dyn BlockDevice,
    options: &FormatOptions,
) -> Result<FsType, FormatError> {
    if !drive.present {
        return Err(FormatError::InvalidDrive);
    }
    if drive.size_mb == 0 {
        crate::kerror!("(FORMAT) Drive com tamanho desconhecido:"; drive.id);
        return Err(FormatError::InvalidDrive);
    }
    if device.is_read_only() || device.block_size() != BYTES_PER_SECTOR as usize {
        return Err(FormatError::InvalidDrive);
    }

    let sectors = drive.sectors();
    if sectors > LBA28_MAX + 1 {
        return Err(FormatError::TooLarge);
    }

    let media = detect_media_type(drive.size_mb);
    let geo = Geometry::new(media, sectors as u32);

    crate::kinfo!("(FORMAT) Formatando:"; drive.id, " (", drive.model.as_str(), ")");
    crate::kinfo!("(FORMAT) Detectado:"; media.name(), " -> ", geo.fs_type.name());
    crate::kdebug!("(FORMAT) Setores por FAT:", geo.sectors_per_fat);

    let boot = geo.boot_sector(&options.label_bytes());
    let image_lba = Bpb::parse(&boot)
        .filter(|bpb| bpb.fits_image())
        .map(|bpb| bpb.image_lba())
        .ok_or(FormatError::Unsupported)?;

    // Boot sector (+ FSInfo e cópia em FAT32)
    crate::kinfo!("(FORMAT) Gravando boot sector...");
    write_sector(device, 0, &boot)?;
    if let Some(info) = geo.fs_info() {
        write_sector(device, FAT32_FSINFO_SECTOR as u64, &info)?;
        write_sector(device, FAT32_BACKUP_BOOT_SECTOR as u64, &boot)?;
        write_sector(device, FAT32_BACKUP_FSINFO_SECTOR as u64, &info)?;
    }

    // FATs
    crate::kinfo!("(FORMAT) Gravando tabelas FAT...");
    let zero = [0u8; 512];
    let header = geo.fat_header();
    for copy in 0..geo.num_fats {
        let start = geo.fat_lba(copy);
        write_sector(device, start, &header)?;
        for i in 1..geo.sectors_per_fat as u64 {
            write_sector(device, start + i, &zero)?;
        }
    }

    // Diretório raiz / cluster raiz
    crate::kinfo!("(FORMAT) Gravando diretório raiz...");
    let root = geo.root_lba();
    for i in 0..geo.root_sectors() as u64 {
        write_sector(device, root + i, &zero)?;
    }

    // Janela da imagem: FAT e diretório do RAM disk sempre vazios
    let window = if options.quick_format {
        DATA_BLOCK_START as u64
    } else {
        MAX_BLOCKS as u64
    };
    for i in 0..window {
        write_sector(device, image_lba + i, &zero)?;
    }

    device.flush().map_err(FormatError::from)?;

    drive.fs_type = geo.fs_type;
    crate::kok!("(FORMAT) Formatação concluída:"; geo.fs_type.name());
    Ok(geo.fs_type)
}

//! # BIOS Parameter Block (BPB)
//!
//! Parser do boot sector de volumes FAT em dispositivos reais.
//!
//! ## Estrutura do Boot Sector
//!
//! | Offset | Tamanho | Descrição                    |
//! |--------|---------|------------------------------|
//! | 0x00   | 3       | Jump instruction             |
//! | 0x03   | 8       | OEM Name                     |
//! | 0x0B   | 2       | Bytes por setor              |
//! | 0x0D   | 1       | Setores por cluster          |
//! | 0x0E   | 2       | Setores reservados           |
//! | 0x10   | 1       | Número de FATs               |
//! | 0x11   | 2       | Entradas no root (FAT12/16)  |
//! | 0x13   | 2       | Total de setores (16 bits)   |
//! | 0x15   | 1       | Media descriptor             |
//! | 0x16   | 2       | Setores por FAT (FAT12/16)   |
//! | 0x20   | 4       | Total de setores (32 bits)   |
//! | 0x24   | 4       | Setores por FAT (FAT32)      |
//! | 0x2C   | 4       | Cluster raiz (FAT32)         |
//! | 0x1FE  | 2       | Assinatura 0x55AA            |

use crate::fs::FsType;
use crate::drivers::block::ramdisk::MAX_BLOCKS;

/// BIOS Parameter Block
#[derive(Debug, Clone)]
pub struct Bpb {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    /// Entradas no diretório raiz (0 em FAT32)
    pub root_entry_count: u16,
    /// Total de setores (16-bit, 0 se usar 32-bit)
    pub total_sectors_16: u16,
    pub media: u8,
    /// Setores por FAT (0 em FAT32)
    pub sectors_per_fat_16: u16,
    pub total_sectors_32: u32,
    pub sectors_per_fat_32: u32,
    pub root_cluster: u32,
}

impl Bpb {
    /// Faz o parse do BPB a partir dos bytes do boot sector
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 512 {
            return None;
        }

        // Verificar assinatura de boot válida
        if data[510] != 0x55 || data[511] != 0xAA {
            return None;
        }

        let u16_at = |o: usize| u16::from_le_bytes([data[o], data[o + 1]]);
        let u32_at = |o: usize| u32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]]);

        let bpb = Self {
            bytes_per_sector: u16_at(11),
            sectors_per_cluster: data[13],
            reserved_sectors: u16_at(14),
            num_fats: data[16],
            root_entry_count: u16_at(17),
            total_sectors_16: u16_at(19),
            media: data[21],
            sectors_per_fat_16: u16_at(22),
            total_sectors_32: u32_at(32),
            sectors_per_fat_32: u32_at(36),
            root_cluster: u32_at(44),
        };

        if bpb.bytes_per_sector == 0 || bpb.sectors_per_cluster == 0 {
            return None;
        }
        Some(bpb)
    }

    /// Volume com layout FAT32 (sem root fixo, FAT em 32 bits)
    pub fn is_fat32_layout(&self) -> bool {
        self.sectors_per_fat_16 == 0
    }

    pub fn total_sectors(&self) -> u32 {
        if self.total_sectors_16 != 0 {
            self.total_sectors_16 as u32
        } else {
            self.total_sectors_32
        }
    }

    /// Retorna setores por FAT
    pub fn sectors_per_fat(&self) -> u32 {
        if self.sectors_per_fat_16 != 0 {
            self.sectors_per_fat_16 as u32
        } else {
            self.sectors_per_fat_32
        }
    }

    pub fn root_dir_sectors(&self) -> u32 {
        let bps = self.bytes_per_sector as u32;
        (self.root_entry_count as u32 * 32 + bps - 1) / bps
    }

    /// Retorna o primeiro setor do diretório raiz (FAT12/16 apenas)
    pub fn root_dir_sector(&self) -> u64 {
        self.reserved_sectors as u64 + self.num_fats as u64 * self.sectors_per_fat() as u64
    }

    /// Retorna o primeiro setor de dados
    pub fn first_data_sector(&self) -> u64 {
        self.root_dir_sector() + self.root_dir_sectors() as u64
    }

    /// Converte número de cluster para número de setor
    pub fn cluster_to_sector(&self, cluster: u32) -> u64 {
        self.first_data_sector()
            + cluster.saturating_sub(2) as u64 * self.sectors_per_cluster as u64
    }

    /// Determina o tipo de FAT pela contagem de clusters
    pub fn fat_type(&self) -> FsType {
        let overhead = self.first_data_sector();
        let data_sectors = (self.total_sectors() as u64).saturating_sub(overhead);
        let clusters = data_sectors / self.sectors_per_cluster as u64;

        if clusters < 4085 {
            FsType::Fat12
        } else if clusters < 65525 {
            FsType::Fat16
        } else {
            FsType::Fat32
        }
    }

    /// Setor onde começa a imagem do RAM disk montado.
    ///
    /// Primeiro setor de dados; em FAT32, logo após o cluster raiz.
    ///
    /// # Atenção
    ///
    /// Os clusters da janela continuam marcados como livres na FAT do volume.
    /// Outro sistema que grave no volume pode usá-los, e o próximo flush
    /// sobrescreve esses dados. Montar um volume FAT criado fora daqui lê os
    /// arquivos que estiverem na janela como se fossem a imagem (e o bloco 3
    /// como diretório raiz).
    pub fn image_lba(&self) -> u64 {
        if self.is_fat32_layout() {
            self.cluster_to_sector(self.root_cluster) + self.sectors_per_cluster as u64
        } else {
            self.first_data_sector()
        }
    }

    /// A imagem inteira cabe dentro do volume.
    pub fn fits_image(&self) -> bool {
        self.image_lba() + MAX_BLOCKS as u64 <= self.total_sectors() as u64
    }
}

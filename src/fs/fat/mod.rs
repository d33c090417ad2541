//! # Sistema de Arquivos FAT em RAM
//!
//! Diretório raiz único sobre o RAM disk, um cluster por arquivo.
//!
//! ## Estrutura
//!
//! | Arquivo      | Responsabilidade                         |
//! |--------------|------------------------------------------|
//! | `layout.rs`  | Blocos reservados e limites              |
//! | `cluster.rs` | Bitmap de clusters                       |
//! | `dir.rs`     | Entradas 8.3 e tabela do diretório raiz  |
//! | `file.rs`    | Leitura, escrita e cópia de arquivos     |
//! | `bpb.rs`     | Parser do boot sector de volumes reais   |

pub mod bpb;
pub mod cluster;
pub mod dir;
pub mod file;
pub mod layout;

pub use bpb::Bpb;
pub use cluster::{Cluster, ClusterAllocator};
pub use dir::{format_name_ext, DirEntry, DirectoryTable, FileAttr, ShortName};

use crate::drivers::block::ramdisk::{RamDisk, BLOCK_SIZE};
use crate::fs::FsError;
use layout::{FAT_BLOCKS, FAT_START_BLOCK, ROOT_DIR_BLOCK};

/// RAM disk + alocador de clusters.
pub struct FatFs {
    pub(crate) disk: RamDisk,
    pub(crate) clusters: ClusterAllocator,
}

impl FatFs {
    pub fn new() -> Self {
        Self {
            disk: RamDisk::new(),
            clusters: ClusterAllocator::new(),
        }
    }

    /// Zera o RAM disk e cria um sistema de arquivos vazio.
    pub fn init(&mut self) -> Result<(), FsError> {
        self.disk.init();
        self.format()
    }

    /// Zera FAT (blocos 1-2) e diretório raiz (bloco 3); libera todos os clusters.
    pub fn format(&mut self) -> Result<(), FsError> {
        let zero = [0u8; BLOCK_SIZE];
        for block in FAT_START_BLOCK..FAT_START_BLOCK + FAT_BLOCKS {
            self.disk.write(block, &zero)?;
        }
        self.disk.write(ROOT_DIR_BLOCK, &zero)?;
        self.clusters.reset();

        crate::kinfo!("(FAT) Ramdisk formatado (estilo FAT12).");
        Ok(())
    }

    /// Substitui a imagem inteira e reconstrói o bitmap de clusters.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), FsError> {
        self.disk.load_image(image)?;
        let table = DirectoryTable::load(&self.disk)?;
        self.clusters.rebuild(&table);
        Ok(())
    }

    /// Imagem completa do RAM disk
    pub fn image(&self) -> &[u8] {
        self.disk.as_bytes()
    }

    pub fn disk(&self) -> &RamDisk {
        &self.disk
    }

    pub fn disk_mut(&mut self) -> &mut RamDisk {
        &mut self.disk
    }

    pub fn clusters(&self) -> &ClusterAllocator {
        &self.clusters
    }

    pub fn clusters_mut(&mut self) -> &mut ClusterAllocator {
        &mut self.clusters
    }
}

impl Default for FatFs {
    fn default() -> Self {
        Self::new()
    }
}

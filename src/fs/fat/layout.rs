//! Layout do sistema de arquivos no RAM disk.

pub use crate::drivers::block::ramdisk::{BLOCK_SIZE, MAX_BLOCKS};

/// Primeiro bloco da FAT
pub const FAT_START_BLOCK: usize = 1;
/// Blocos ocupados pela FAT
pub const FAT_BLOCKS: usize = 2;
/// Bloco do diretório raiz
pub const ROOT_DIR_BLOCK: usize = 3;
/// Cluster N fica no bloco `DATA_BLOCK_START + N`
pub const DATA_BLOCK_START: usize = 4;

/// Capacidade do diretório raiz
pub const MAX_ROOT_ENTRIES: usize = 16;
/// Clusters de dados alocáveis (1..=MAX_DATA_CLUSTERS)
pub const MAX_DATA_CLUSTERS: usize = 500;

/// Tamanho de uma entrada de diretório
pub const DIR_ENTRY_SIZE: usize = 32;

/// Bloco de um cluster de dados
#[inline]
pub const fn cluster_block(cluster: u16) -> usize {
    DATA_BLOCK_START + cluster as usize
}

const _: () = assert!(MAX_ROOT_ENTRIES * DIR_ENTRY_SIZE <= BLOCK_SIZE);
const _: () = assert!(DATA_BLOCK_START + MAX_DATA_CLUSTERS < MAX_BLOCKS);

//! # Alocador de Clusters
//!
//! Bitmap sobre os clusters 1..=MAX_DATA_CLUSTERS (bit = cluster - 1).
//! Cluster 0 é inválido e sempre conta como usado.

use super::dir::DirectoryTable;
use super::layout::MAX_DATA_CLUSTERS;
use crate::klib::Bitmap;

/// Número de cluster de dados (0 = não alocado)
pub type Cluster = u16;

const WORDS: usize = (MAX_DATA_CLUSTERS + 63) / 64;

#[derive(Clone)]
pub struct ClusterAllocator {
    bitmap: Bitmap<WORDS>,
}

impl ClusterAllocator {
    pub const fn new() -> Self {
        Self {
            bitmap: Bitmap::new(MAX_DATA_CLUSTERS),
        }
    }

    #[inline]
    fn in_range(cluster: Cluster) -> bool {
        cluster != 0 && (cluster as usize) <= MAX_DATA_CLUSTERS
    }

    /// Menor cluster livre, já marcado como usado. `None` quando esgotado.
    pub fn allocate(&mut self) -> Option<Cluster> {
        let bit = self.bitmap.find_first_zero()?;
        self.bitmap.set(bit);
        let cluster = (bit + 1) as Cluster;
        crate::ktrace!("(FAT) Cluster alocado:", cluster);
        Some(cluster)
    }

    /// Libera um cluster. No-op para 0 ou fora do intervalo.
    pub fn free(&mut self, cluster: Cluster) {
        if Self::in_range(cluster) {
            self.bitmap.clear(cluster as usize - 1);
            crate::ktrace!("(FAT) Cluster liberado:", cluster);
        }
    }

    /// Cluster 0 e fora do intervalo contam como usados.
    pub fn is_used(&self, cluster: Cluster) -> bool {
        if !Self::in_range(cluster) {
            return true;
        }
        self.bitmap.test(cluster as usize - 1)
    }

    /// Marca um cluster como usado (reconstrução a partir do diretório).
    pub fn mark_used(&mut self, cluster: Cluster) {
        if Self::in_range(cluster) {
            self.bitmap.set(cluster as usize - 1);
        }
    }

    /// Libera todos os clusters.
    pub fn reset(&mut self) {
        self.bitmap.clear_all();
    }

    /// Recalcula o bitmap a partir das entradas vivas do diretório.
    pub fn rebuild(&mut self, table: &DirectoryTable) {
        self.reset();
        for entry in table.entries().iter().filter(|e| e.is_live()) {
            self.mark_used(entry.start_cluster);
        }
        crate::kdebug!("(FAT) Bitmap reconstruído. Usados:", self.bitmap.count_ones());
    }

    pub fn free_count(&self) -> usize {
        MAX_DATA_CLUSTERS - self.bitmap.count_ones()
    }
}

impl Default for ClusterAllocator {
    fn default() -> Self {
        Self::new()
    }
}

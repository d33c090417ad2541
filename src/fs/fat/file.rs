//! # Conteúdo de Arquivos
//!
//! Cada arquivo ocupa no máximo um cluster (= um bloco de 512 bytes).
//! Escrita sobrescreve; não há append nem cadeias.

use super::dir::DirectoryTable;
use super::layout::{cluster_block, MAX_DATA_CLUSTERS};
use super::FatFs;
use crate::drivers::block::ramdisk::BLOCK_SIZE;
use crate::fs::{CopyError, FsError};

#[inline]
fn valid_cluster(cluster: u16) -> bool {
    cluster != 0 && (cluster as usize) <= MAX_DATA_CLUSTERS
}

impl FatFs {
    /// Lê até `buf.len()` bytes do arquivo. Retorna quantos foram copiados.
    ///
    /// Entrada com cluster inválido devolve `Ok(0)`, indistinguível de um
    /// arquivo vazio.
    pub fn read_file(&self, name: &str, buf: &mut [u8]) -> Result<usize, FsError> {
        let entry = self.find_entry(name)?;
        if entry.is_directory() {
            return Err(FsError::NotFound);
        }
        if entry.file_size == 0 {
            return Ok(0);
        }

        let cluster = entry.start_cluster;
        if !valid_cluster(cluster) {
            crate::kwarn!("(FAT) Cluster inválido na leitura:", cluster);
            return Ok(0);
        }

        let len = (entry.file_size as usize).min(buf.len()).min(BLOCK_SIZE);
        let block = self.disk.block(cluster_block(cluster))?;
        buf[..len].copy_from_slice(&block[..len]);

        crate::ktrace!("(FAT) Bytes lidos:", len);
        Ok(len)
    }

    /// Sobrescreve o conteúdo do arquivo. `data` acima de 512 bytes é cortado.
    ///
    /// Aloca um cluster na primeira escrita. Entrada com cluster inválido
    /// devolve `Ok(0)` sem alterar nada.
    pub fn write_file(&mut self, name: &str, data: &[u8]) -> Result<usize, FsError> {
        let mut table = DirectoryTable::load(&self.disk)?;
        let short = super::dir::format_name_ext(name);
        let slot = table.find(&short).ok_or(FsError::NotFound)?;

        let size = data.len().min(BLOCK_SIZE);
        let current = table.get(slot).map_or(0, |e| e.start_cluster);

        let (cluster, fresh) = if current == 0 {
            (self.clusters.allocate().ok_or(FsError::NoSpace)?, true)
        } else {
            (current, false)
        };

        if !valid_cluster(cluster) {
            crate::kwarn!("(FAT) Cluster inválido na escrita:", cluster);
            return Ok(0);
        }

        let block = match self.disk.block_mut(cluster_block(cluster)) {
            Ok(block) => block,
            Err(e) => {
                if fresh {
                    self.clusters.free(cluster);
                }
                return Err(e.into());
            }
        };
        block[..size].copy_from_slice(&data[..size]);

        if let Some(entry) = table.get_mut(slot) {
            entry.start_cluster = cluster;
            entry.file_size = size as u32;
        }
        table.store(&mut self.disk)?;

        crate::ktrace!("(FAT) Bytes escritos:", size);
        Ok(size)
    }

    /// Copia `src` para um novo arquivo `dst`.
    ///
    /// Se a escrita falhar depois da criação, o destino é apagado.
    pub fn copy_file(&mut self, src: &str, dst: &str) -> Result<usize, CopyError> {
        if self.find_entry(src).is_err() {
            return Err(CopyError::SourceNotFound);
        }
        if self.find_entry(dst).is_ok() {
            return Err(CopyError::DestExists);
        }

        let mut buffer = [0u8; BLOCK_SIZE];
        let len = self
            .read_file(src, &mut buffer)
            .map_err(|_| CopyError::ReadFailed)?;

        self.create_entry(dst).map_err(|_| CopyError::CreateFailed)?;

        if self.write_file(dst, &buffer[..len]).is_err() {
            crate::kwarn!("(FAT) Cópia falhou, removendo destino:"; dst);
            if self.delete_entry(dst).is_err() {
                crate::kwarn!("(FAT) Destino não removido:"; dst);
            }
            return Err(CopyError::WriteFailed);
        }

        crate::kdebug!("(FAT) Arquivo copiado. Bytes:", len);
        Ok(len)
    }
}

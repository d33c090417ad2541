//! Testes para o módulo Filesystem
//!
//! Testes unitários e de integração do FS em RAM, do formatador e da
//! tabela de montagem.
//!
//! # Como Executar os Testes
//!
//! ```bash
//! # Todos os testes de filesystem
//! cargo test --package fatcore --lib fs::tests
//!
//! # Um módulo específico
//! cargo test --package fatcore --lib fs::tests::format
//!
//! # Um teste específico
//! cargo test --package fatcore --lib fs::tests::file::test_write_clamps_to_one_block
//! ```
//!
//! # Estrutura dos Testes
//!
//! - `support.rs` - `MemDisk`, dispositivo de bloco esparso em memória
//! - `dir.rs` - Nomes 8.3 e diretório raiz
//! - `cluster.rs` - Alocador de clusters
//! - `file.rs` - Leitura, escrita e cópia
//! - `format.rs` - Classes de mídia, geometria e formatação
//! - `mount.rs` - Tabela de montagem
//! - `integration.rs` - Contexto completo sobre o IDE simulado
//!
//! # Convenções
//!
//! - Prefixo `test_` para testes unitários
//! - Prefixo `integration_` para testes de integração

#![cfg(test)]

// Módulos de teste
pub mod cluster;
pub mod integration;
pub mod support;

use crate::drivers::block::{BlockDevice, DriveRegistry};
use crate::fs::FatFs;
use alloc::sync::Arc;
use support::MemDisk;

/// Helper: FS em RAM inicializado e vazio
pub fn create_test_fs() -> FatFs {
    let mut fs = FatFs::new();
    fs.init().unwrap();
    fs
}

/// Helper: registro com um `MemDisk` por tamanho (em MB), a partir do slot 0
pub fn create_test_drives(sizes_mb: &[u32]) -> (DriveRegistry, Vec<Arc<MemDisk>>) {
    let mut registry = DriveRegistry::new();
    let mut disks = Vec::new();
    for (i, &mb) in sizes_mb.iter().enumerate() {
        let disk = Arc::new(MemDisk::mb(mb));
        let device: Arc<dyn BlockDevice> = disk.clone();
        assert!(registry.attach(i, device, "MEMDISK"));
        disks.push(disk);
    }
    (registry, disks)
}

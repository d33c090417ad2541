//! # Testes de Dispositivos de Bloco
//!
//! Os testes rodam no host (`cargo test`) sobre um controlador IDE
//! simulado (`sim::SimIde`), que implementa `hal::PortIo`.
//!
//! ## Organização
//!
//! - `sim`: controlador simulado (também usado pelos testes de `fs`)
//! - `ata`: IDENTIFY, leitura/escrita de setor, timeouts
//! - `ramdisk`: limites de bloco e imagem
//! - `registry`: probe, listagem, `find`/`attach`
//! - `traits`: leitura/escrita de vários blocos

#![cfg(test)]

pub mod registry;
pub mod sim;

use super::ata::{IdeBus, Timeout};
use alloc::sync::Arc;
use sim::SimIde;

/// Barramento sobre o simulador, com esperas curtas.
pub fn create_test_bus(sim: SimIde) -> (Arc<SimIde>, Arc<IdeBus>) {
    let sim = Arc::new(sim);
    let bus = IdeBus::new(sim.clone())
        .with_timeout(Timeout { attempts: 1_000 })
        .with_settle(Timeout { attempts: 4 });
    (sim, Arc::new(bus))
}

//! Código específico de arquitetura.
//!
//! Apenas x86_64 é suportado; o restante do crate acessa hardware através
//! de `hal::PortIo`.

pub mod x86_64;

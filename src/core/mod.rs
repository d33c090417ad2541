//! Núcleo: logging e contexto global do kernel.

pub mod context;
pub mod logging;

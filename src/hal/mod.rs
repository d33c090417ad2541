//! Hardware Abstraction Layer (HAL)
//!
//! Interfaces de hardware usadas pelos drivers. O driver ATA só fala com
//! o barramento através de `PortIo`.

pub mod traits;

pub use traits::*;

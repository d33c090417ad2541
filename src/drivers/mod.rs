//! # Driver Layer
//!
//! Drivers usados pelo núcleo FAT.
//!
//! | Driver   | Arquivo      | Papel |
//! |----------|--------------|-------|
//! | Serial   | `serial.rs`  | Saída dos macros de log |
//! | Block    | `block/`     | RAM disk, ATA PIO, registro de drives |

pub mod block; // Dispositivos de bloco
pub mod serial; // UART 16550 / sink de log

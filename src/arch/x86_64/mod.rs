//! x86_64: instruções de I/O de porta.

pub mod ports;

pub use ports::X86Ports;

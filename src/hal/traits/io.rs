//! Trait de Port I/O

/// Abstração de portas de I/O (in/out de 8 e 16 bits).
///
/// Implementada por `arch::x86_64::X86Ports` em hardware real e por
/// barramentos simulados nos testes.
pub trait PortIo: Send + Sync {
    /// Lê um byte
    fn inb(&self, port: u16) -> u8;

    /// Escreve um byte
    fn outb(&self, port: u16, value: u8);

    /// Lê um word
    fn inw(&self, port: u16) -> u16;

    /// Escreve um word
    fn outw(&self, port: u16, value: u16);
}

/// Arquivo: x86_64/ports.rs
///
/// Propósito: Instruções de entrada/saída (I/O Ports) do x86.
/// Usadas pela UART (COM1) e pelos canais IDE primário/secundário.
///
/// Detalhes de Implementação:
/// - Usa `core::arch::asm!` para emitir instruções `in` e `out`.
/// - `X86Ports` expõe as mesmas operações através de `hal::PortIo`, para que o
///   driver ATA possa ser exercitado com um barramento simulado.
use crate::hal::PortIo;

/// Lê um byte de uma porta IO
#[inline]
pub fn inb(port: u16) -> u8 {
    let value: u8;
    // SAFETY: instrução `in` não toca memória
    unsafe {
        core::arch::asm!(
            "in al, dx",
            in("dx") port,
            out("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}

/// Escreve um byte em uma porta IO
#[inline]
pub fn outb(port: u16, value: u8) {
    // SAFETY: instrução `out` não toca memória
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}

/// Lê um word (16 bits) de uma porta IO
#[inline]
pub fn inw(port: u16) -> u16 {
    let value: u16;
    // SAFETY: instrução `in` não toca memória
    unsafe {
        core::arch::asm!(
            "in ax, dx",
            in("dx") port,
            out("ax") value,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}

/// Escreve um word em uma porta IO
#[inline]
pub fn outw(port: u16, value: u16) {
    // SAFETY: instrução `out` não toca memória
    unsafe {
        core::arch::asm!(
            "out dx, ax",
            in("dx") port,
            in("ax") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}

/// Barramento de portas real da máquina.
#[derive(Debug, Default, Clone, Copy)]
pub struct X86Ports;

impl PortIo for X86Ports {
    #[inline]
    fn inb(&self, port: u16) -> u8 {
        inb(port)
    }

    #[inline]
    fn outb(&self, port: u16, value: u8) {
        outb(port, value)
    }

    #[inline]
    fn inw(&self, port: u16) -> u16 {
        inw(port)
    }

    #[inline]
    fn outw(&self, port: u16, value: u16) {
        outw(port, value)
    }
}

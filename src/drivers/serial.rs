// =============================================================================
// SERIAL DRIVER
// =============================================================================
//
// Saída de log do núcleo FAT.
//
// ARQUITETURA:
// - Em bare metal x86_64 (target_os = "none"): bytes vão direto para COM1
//   (0x3F8) com espera no Line Status Register.
// - Em qualquer alvo: se um sink foi registrado com `set_sink`, cada
//   fragmento também é entregue a ele (é assim que testes no host capturam
//   os logs).
// - SEM core::fmt - hex é montado em buffer local de 18 bytes.
// - SEM alocação no caminho de emissão.
//
// FUNÇÕES DISPONÍVEIS:
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal (0x + 16 dígitos)
// - emit_nl()        : Envia newline (\r\n)
//
// =============================================================================

use spin::Mutex;

/// Destino alternativo de log (host, testes).
pub type LogSink = fn(&str);

static SINK: Mutex<Option<LogSink>> = Mutex::new(None);

/// Registra um sink para receber todos os fragmentos de log.
pub fn set_sink(sink: LogSink) {
    *SINK.lock() = Some(sink);
}

/// Remove o sink registrado.
pub fn clear_sink() {
    *SINK.lock() = None;
}

// =============================================================================
// COM1 (bare metal)
// =============================================================================

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
mod com1 {
    use crate::arch::x86_64::ports::{inb, outb};

    // Porta de dados da COM1
    const COM1_DATA: u16 = 0x3F8;
    // Line Status Register
    const COM1_STATUS: u16 = 0x3FD;

    /// Configura 38400 baud, 8N1, FIFO habilitado.
    pub fn init() {
        outb(COM1_DATA + 1, 0x00);
        outb(COM1_DATA + 3, 0x80);
        outb(COM1_DATA, 0x03);
        outb(COM1_DATA + 1, 0x00);
        outb(COM1_DATA + 3, 0x03);
        outb(COM1_DATA + 2, 0xC7);
        outb(COM1_DATA + 4, 0x0B);
    }

    #[inline(always)]
    pub fn emit(byte: u8) {
        // bit 5 do LSR = buffer de transmissão vazio
        while inb(COM1_STATUS) & 0x20 == 0 {}
        outb(COM1_DATA, byte);
    }
}

/// Inicializa a UART (no-op fora de bare metal).
pub fn init() {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    com1::init();
}

// =============================================================================
// FUNÇÕES DE ESCRITA
// =============================================================================

/// Envia uma string.
pub fn emit_str(s: &str) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    for b in s.bytes() {
        com1::emit(b);
    }

    // Copia o ponteiro para não chamar o sink com o lock preso
    let sink = *SINK.lock();
    if let Some(sink) = sink {
        sink(s);
    }
}

/// Envia uma nova linha (CRLF).
pub fn emit_nl() {
    emit_str("\r\n");
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
pub fn emit_hex(value: u64) {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut buf = [0u8; 18];
    buf[0] = b'0';
    buf[1] = b'x';
    for i in 0..16 {
        let nibble = (value >> ((15 - i) * 4)) & 0xF;
        buf[2 + i] = DIGITS[nibble as usize];
    }

    // Só há ASCII no buffer
    if let Ok(s) = ::core::str::from_utf8(&buf) {
        emit_str(s);
    }
}

//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno do núcleo.

pub mod bitmap;

pub use bitmap::Bitmap;

/// Divisão inteira arredondada para cima.
///
/// # Exemplo
/// `div_ceil(10, 4) -> 3`
#[inline]
pub const fn div_ceil(value: u64, divisor: u64) -> u64 {
    (value + divisor - 1) / divisor
}

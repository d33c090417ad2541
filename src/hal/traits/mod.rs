//! Traits do HAL
//!
//! Define as interfaces abstratas para hardware.

pub mod io;

pub use io::*;

//! Bitmap genérico

/// Bitmap de tamanho fixo, armazenado em `WORDS` palavras de 64 bits.
#[derive(Clone)]
pub struct Bitmap<const WORDS: usize> {
    data: [u64; WORDS],
    len: usize,
}

impl<const WORDS: usize> Bitmap<WORDS> {
    /// Cria bitmap zerado com `bits` bits úteis (limitado a `WORDS * 64`).
    pub const fn new(bits: usize) -> Self {
        let cap = WORDS * 64;
        Self {
            data: [0; WORDS],
            len: if bits < cap { bits } else { cap },
        }
    }

    /// Número de bits úteis
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Define um bit. Índices fora do bitmap são ignorados.
    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.data[index / 64] |= 1 << (index % 64);
        }
    }

    /// Limpa um bit. Índices fora do bitmap são ignorados.
    pub fn clear(&mut self, index: usize) {
        if index < self.len {
            self.data[index / 64] &= !(1 << (index % 64));
        }
    }

    /// Testa um bit (fora do bitmap = false)
    pub fn test(&self, index: usize) -> bool {
        index < self.len && (self.data[index / 64] & (1 << (index % 64))) != 0
    }

    /// Encontra primeiro bit livre (0)
    pub fn find_first_zero(&self) -> Option<usize> {
        for (i, &word) in self.data.iter().enumerate() {
            if word != u64::MAX {
                let index = i * 64 + word.trailing_ones() as usize;
                if index < self.len {
                    return Some(index);
                }
                return None;
            }
        }
        None
    }

    /// Zera todos os bits
    pub fn clear_all(&mut self) {
        self.data = [0; WORDS];
    }

    /// Quantidade de bits definidos
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }
}

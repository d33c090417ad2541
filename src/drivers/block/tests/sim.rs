//! Controlador IDE simulado (dois canais, master/slave) sobre `PortIo`.
//!
//! Suporta IDENTIFY, READ SECTORS, WRITE SECTORS e CACHE FLUSH com um
//! setor por comando. Canal sem drives devolve 0xFF (barramento flutuante);
//! slot vazio ao lado de um drive presente devolve 0x00.

#![cfg(test)]

use crate::hal::PortIo;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use spin::Mutex;

const STATUS_BSY: u8 = 0x80;
const STATUS_DRDY: u8 = 0x40;
const STATUS_DRQ: u8 = 0x08;
const STATUS_ERR: u8 = 0x01;

/// Um disco simulado.
#[derive(Clone)]
pub struct SimDisk {
    pub sectors: u32,
    pub model: &'static str,
    /// Words 60-61 zerados; capacidade apenas em 100-103
    pub lba48_only: bool,
    /// IDENTIFY deixa BSY preso
    pub hang_identify: bool,
    /// IDENTIFY aborta com ERR (comportamento ATAPI)
    pub abort_identify: bool,
    data: BTreeMap<u32, [u8; 512]>,
}

impl SimDisk {
    pub fn new(sectors: u32, model: &'static str) -> Self {
        Self {
            sectors,
            model,
            lba48_only: false,
            hang_identify: false,
            abort_identify: false,
            data: BTreeMap::new(),
        }
    }

    /// Disco com `mb` megabytes
    pub fn mb(mb: u32, model: &'static str) -> Self {
        Self::new(mb * 2048, model)
    }

    pub fn lba48_only(mut self) -> Self {
        self.lba48_only = true;
        self
    }

    pub fn hang_identify(mut self) -> Self {
        self.hang_identify = true;
        self
    }

    pub fn abort_identify(mut self) -> Self {
        self.abort_identify = true;
        self
    }

    fn identify_words(&self) -> [u16; 256] {
        let mut words = [0u16; 256];

        let mut model = [b' '; 40];
        for (dst, &src) in model.iter_mut().zip(self.model.as_bytes()) {
            *dst = src;
        }
        for (i, pair) in model.chunks_exact(2).enumerate() {
            words[27 + i] = (pair[0] as u16) << 8 | pair[1] as u16;
        }

        if !self.lba48_only {
            words[60] = (self.sectors & 0xFFFF) as u16;
            words[61] = (self.sectors >> 16) as u16;
        }
        words[83] = 1 << 10;
        words[100] = (self.sectors & 0xFFFF) as u16;
        words[101] = (self.sectors >> 16) as u16;
        words
    }
}

#[derive(Default)]
struct Channel {
    drives: [Option<SimDisk>; 2],
    selected: usize,
    regs: [u8; 8],
    status: u8,
    data_out: VecDeque<u16>,
    pending_write: Option<(u32, Vec<u16>)>,
}

impl Channel {
    fn lba(&self) -> u32 {
        (self.regs[6] as u32 & 0x0F) << 24
            | (self.regs[5] as u32) << 16
            | (self.regs[4] as u32) << 8
            | self.regs[3] as u32
    }

    fn selected_disk(&mut self) -> Option<&mut SimDisk> {
        self.drives[self.selected].as_mut()
    }

    fn status(&self) -> u8 {
        if self.drives[self.selected].is_some() {
            self.status
        } else if self.drives.iter().any(|d| d.is_some()) {
            0x00
        } else {
            0xFF
        }
    }

    fn command(&mut self, command: u8) {
        let lba = self.lba();
        let Some(disk) = self.drives[self.selected].as_mut() else {
            return;
        };

        match command {
            0xEC => {
                if disk.hang_identify {
                    self.status = STATUS_BSY;
                } else if disk.abort_identify {
                    self.status = STATUS_DRDY | STATUS_ERR;
                } else {
                    self.data_out = disk.identify_words().iter().copied().collect();
                    self.status = STATUS_DRDY | STATUS_DRQ;
                }
            }
            0x20 => {
                if lba >= disk.sectors {
                    self.status = STATUS_DRDY | STATUS_ERR;
                    return;
                }
                let sector = disk.data.get(&lba).copied().unwrap_or([0u8; 512]);
                self.data_out = sector
                    .chunks_exact(2)
                    .map(|p| u16::from_le_bytes([p[0], p[1]]))
                    .collect();
                self.status = STATUS_DRDY | STATUS_DRQ;
            }
            0x30 => {
                if lba >= disk.sectors {
                    self.status = STATUS_DRDY | STATUS_ERR;
                    return;
                }
                self.pending_write = Some((lba, Vec::with_capacity(256)));
                self.status = STATUS_DRDY | STATUS_DRQ;
            }
            0xE7 => {
                self.status = STATUS_DRDY;
            }
            _ => {
                self.status = STATUS_DRDY | STATUS_ERR;
            }
        }
    }

    fn read_data(&mut self) -> u16 {
        let word = self.data_out.pop_front().unwrap_or(0);
        if self.data_out.is_empty() {
            self.status = STATUS_DRDY;
        }
        word
    }

    fn write_data(&mut self, word: u16) {
        let Some((lba, words)) = self.pending_write.as_mut() else {
            return;
        };
        words.push(word);
        if words.len() < 256 {
            return;
        }

        let lba = *lba;
        let mut sector = [0u8; 512];
        for (dst, w) in sector.chunks_exact_mut(2).zip(words.iter()) {
            dst.copy_from_slice(&w.to_le_bytes());
        }
        self.pending_write = None;
        self.status = STATUS_DRDY;
        if let Some(disk) = self.selected_disk() {
            disk.data.insert(lba, sector);
        }
    }
}

struct State {
    channels: [Channel; 2],
    commands: Vec<u8>,
}

/// Controlador IDE simulado.
pub struct SimIde {
    state: Mutex<State>,
}

impl SimIde {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                channels: Default::default(),
                commands: Vec::new(),
            }),
        }
    }

    /// Coloca um disco no slot 0..3.
    pub fn with_disk(self, slot: usize, disk: SimDisk) -> Self {
        {
            let mut state = self.state.lock();
            state.channels[slot / 2].drives[slot % 2] = Some(disk);
        }
        self
    }

    /// Conteúdo atual de um setor do disco no slot.
    pub fn sector(&self, slot: usize, lba: u32) -> [u8; 512] {
        let state = self.state.lock();
        state.channels[slot / 2].drives[slot % 2]
            .as_ref()
            .and_then(|d| d.data.get(&lba).copied())
            .unwrap_or([0u8; 512])
    }

    /// Grava um setor diretamente no disco simulado.
    pub fn put_sector(&self, slot: usize, lba: u32, sector: [u8; 512]) {
        let mut state = self.state.lock();
        if let Some(disk) = state.channels[slot / 2].drives[slot % 2].as_mut() {
            disk.data.insert(lba, sector);
        }
    }

    /// Comandos recebidos, em ordem.
    pub fn commands(&self) -> Vec<u8> {
        self.state.lock().commands.clone()
    }

    fn route(port: u16) -> Option<(usize, u16)> {
        match port {
            0x1F0..=0x1F7 => Some((0, port - 0x1F0)),
            0x170..=0x177 => Some((1, port - 0x170)),
            _ => None,
        }
    }
}

impl PortIo for SimIde {
    fn inb(&self, port: u16) -> u8 {
        let Some((ch, reg)) = Self::route(port) else {
            return 0xFF;
        };
        let state = self.state.lock();
        let channel = &state.channels[ch];
        match reg {
            7 => channel.status(),
            r => channel.regs[r as usize],
        }
    }

    fn outb(&self, port: u16, value: u8) {
        let Some((ch, reg)) = Self::route(port) else {
            return;
        };
        let mut state = self.state.lock();
        match reg {
            7 => {
                state.commands.push(value);
                state.channels[ch].command(value);
            }
            6 => {
                let channel = &mut state.channels[ch];
                channel.regs[6] = value;
                channel.selected = ((value >> 4) & 1) as usize;
                if channel.drives[channel.selected].is_some() && channel.status & STATUS_BSY == 0 {
                    channel.status = STATUS_DRDY;
                }
            }
            r => state.channels[ch].regs[r as usize] = value,
        }
    }

    fn inw(&self, port: u16) -> u16 {
        match Self::route(port) {
            Some((ch, 0)) => self.state.lock().channels[ch].read_data(),
            _ => 0xFFFF,
        }
    }

    fn outw(&self, port: u16, value: u16) {
        if let Some((ch, 0)) = Self::route(port) {
            self.state.lock().channels[ch].write_data(value);
        }
    }
}

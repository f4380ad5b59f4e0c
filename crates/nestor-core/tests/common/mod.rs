#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use nestor_core::{Nes, NesConfig, bus::Bus};

pub const PRG_BANK: usize = 0x4000;
pub const CHR_BANK: usize = 0x2000;
pub const CODE_ORIGIN: u16 = 0x8000;
pub const NMI_HANDLER: u16 = 0x9000;

/// Builds an iNES image in memory.
#[derive(Debug, Clone)]
pub struct RomImage {
    mapper: u8,
    prg: Vec<u8>,
    chr_banks: u8,
    vertical: bool,
}

impl RomImage {
    /// A 16 KiB NROM image with CHR RAM, `program` at `$8000` and the
    /// reset vector pointing at it.
    pub fn nrom(program: &[u8]) -> Self {
        Self::with_prg(0, 1, program)
    }

    pub fn with_prg(mapper: u8, prg_banks: usize, program: &[u8]) -> Self {
        let mut prg = vec![0xEA; PRG_BANK * prg_banks];
        prg[..program.len()].copy_from_slice(program);
        let mut image = Self {
            mapper,
            prg,
            chr_banks: 0,
            vertical: false,
        };
        image.set_vector(0xFFFC, CODE_ORIGIN);
        // NMI defaults to a bare RTI.
        image.place(NMI_HANDLER, &[0x40]);
        image.set_vector(0xFFFA, NMI_HANDLER);
        image
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    pub fn chr_banks(mut self, banks: u8) -> Self {
        self.chr_banks = banks;
        self
    }

    /// Offset of a CPU address inside PRG, assuming the last bank is fixed at
    /// `$C000` and the first at `$8000`.
    fn offset(&self, addr: u16) -> usize {
        if addr >= 0xC000 {
            self.prg.len() - PRG_BANK + (addr as usize - 0xC000)
        } else {
            addr as usize - 0x8000
        }
    }

    pub fn place(&mut self, addr: u16, bytes: &[u8]) {
        let start = self.offset(addr);
        self.prg[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn set_vector(&mut self, vector: u16, target: u16) {
        self.place(vector, &target.to_le_bytes());
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = vec![
            b'N',
            b'E',
            b'S',
            0x1A,
            (self.prg.len() / PRG_BANK) as u8,
            self.chr_banks,
            ((self.mapper & 0x0F) << 4) | self.vertical as u8,
            self.mapper & 0xF0,
        ];
        bytes.resize(16, 0);
        bytes.extend_from_slice(&self.prg);
        bytes.resize(bytes.len() + self.chr_banks as usize * CHR_BANK, 0);
        bytes
    }

    pub fn boot(&self) -> Result<Nes> {
        Nes::from_rom_bytes(&self.build(), NesConfig::default()).context("building session")
    }
}

pub fn peek(nes: &mut Nes, addr: u16) -> u8 {
    nes.bus().read(addr)
}

/// Clocks until `done` holds, failing after `limit` CPU cycles.
pub fn clock_until<F>(nes: &mut Nes, limit: u64, mut done: F) -> Result<u64>
where
    F: FnMut(&mut Nes) -> bool,
{
    for clocks in 1..=limit {
        nes.clock()?;
        if done(nes) {
            return Ok(clocks);
        }
    }
    bail!("condition not reached within {limit} cycles")
}

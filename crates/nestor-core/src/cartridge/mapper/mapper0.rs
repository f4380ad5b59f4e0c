//! Mapper 0 (NROM) implementation.
//!
//! NROM has no banking at all: the CPU sees the whole PRG ROM and the PPU
//! sees the whole CHR ROM/RAM.
//!
//! # Memory Layout
//!
//! - **PRG ROM**: 16 KiB or 32 KiB mapped at `$8000-$FFFF`.
//!   - **NROM-128 (16 KiB)**: mirrored at `$8000-$BFFF` and `$C000-$FFFF`.
//!   - **NROM-256 (32 KiB)**: occupies the full window.
//! - **CHR**: 8 KiB of ROM, or 8 KiB of RAM when the image has none.
//!
//! # Reference
//! - [NROM on NESdev Wiki](https://www.nesdev.org/wiki/NROM)

use crate::cartridge::{Cartridge, header::Mirroring, mapper::ChrStorage};

#[derive(Debug, Clone)]
pub struct Mapper0 {
    prg_rom: Box<[u8]>,
    chr: ChrStorage,
    mirroring: Mirroring,
    has_extended_ram: bool,
}

impl Mapper0 {
    pub fn new(cartridge: Cartridge) -> Self {
        let mirroring = cartridge.mirroring();
        let has_extended_ram = cartridge.has_extended_ram();
        let (prg_rom, chr_rom) = cartridge.into_roms();
        Self {
            prg_rom,
            chr: ChrStorage::from_rom(chr_rom),
            mirroring,
            has_extended_ram,
        }
    }

    pub(crate) fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    /// Offset into PRG ROM; a single 16 KiB bank repeats across the window.
    pub(crate) fn prg_offset(&self, addr: u16) -> usize {
        let offset = (addr & 0x7FFF) as usize;
        if self.prg_rom.is_empty() {
            0
        } else {
            offset % self.prg_rom.len()
        }
    }

    pub fn read_prg(&self, addr: u16) -> u8 {
        self.prg_rom
            .get(self.prg_offset(addr))
            .copied()
            .unwrap_or(0)
    }

    pub fn write_prg(&mut self, addr: u16, value: u8) {
        tracing::debug!("ROM memory write attempt at {addr:#06X} to set {value:#04X}");
    }

    pub fn read_chr(&self, addr: u16) -> u8 {
        self.chr.read((addr & 0x1FFF) as usize)
    }

    pub fn write_chr(&mut self, addr: u16, value: u8) {
        self.chr.write((addr & 0x1FFF) as usize, value);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn has_extended_ram(&self) -> bool {
        self.has_extended_ram
    }
}

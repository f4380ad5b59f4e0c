//! Mapper 3 (CNROM): fixed PRG, switchable 8 KiB CHR bank.
//!
//! Any write to `$8000-$FFFF` selects the CHR bank (bits 0-1). PRG is 16 KiB
//! (mirrored) or 32 KiB and never switches.
//!
//! # Reference
//! - [CNROM on NESdev Wiki](https://www.nesdev.org/wiki/CNROM)

use crate::{
    cartridge::{Cartridge, header::Mirroring, mapper::ChrStorage},
    memory::ppu as ppu_mem,
};

#[derive(Debug, Clone)]
pub struct Mapper3 {
    prg_rom: Box<[u8]>,
    chr: ChrStorage,
    mirroring: Mirroring,
    has_extended_ram: bool,
    select_chr: usize,
}

impl Mapper3 {
    pub fn new(cartridge: Cartridge) -> Self {
        let mirroring = cartridge.mirroring();
        let has_extended_ram = cartridge.has_extended_ram();
        let (prg_rom, chr_rom) = cartridge.into_roms();
        Self {
            prg_rom,
            chr: ChrStorage::from_rom(chr_rom),
            mirroring,
            has_extended_ram,
            select_chr: 0,
        }
    }

    pub(crate) fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

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

    pub fn write_prg(&mut self, _addr: u16, value: u8) {
        self.select_chr = (value & 0x03) as usize;
    }

    fn chr_offset(&self, addr: u16) -> usize {
        (addr & 0x1FFF) as usize | (self.select_chr * ppu_mem::CHR_SIZE)
    }

    pub fn read_chr(&self, addr: u16) -> u8 {
        self.chr.read(self.chr_offset(addr))
    }

    pub fn write_chr(&mut self, addr: u16, value: u8) {
        if !self.chr.is_ram() {
            tracing::debug!("read-only CHR memory write attempt at {addr:#06X}");
            return;
        }
        let offset = self.chr_offset(addr);
        self.chr.write(offset, value);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn has_extended_ram(&self) -> bool {
        self.has_extended_ram
    }
}

//! Mapper 1 (SxROM / MMC1) implementation.
//!
//! MMC1 is programmed through a 5-bit serial port: each write to
//! `$8000-$FFFF` shifts bit 0 of the data into a shift register, and the
//! fifth write commits the accumulated value into the register selected by
//! the address of that write. A write with bit 7 set resets the port.
//!
//! # Memory Layout
//!
//! | Window          | Register           | Meaning                                   |
//! |-----------------|--------------------|-------------------------------------------|
//! | `$8000-$9FFF`   | Control            | mirroring (bits 0-1), PRG mode (2-3), CHR mode (4) |
//! | `$A000-$BFFF`   | CHR bank 0         | 4 KiB bank at PPU `$0000` (or 8 KiB bank) |
//! | `$C000-$DFFF`   | CHR bank 1         | 4 KiB bank at PPU `$1000`                 |
//! | `$E000-$FFFF`   | PRG bank           | 16 KiB / 32 KiB PRG bank select           |
//!
//! PRG modes: 0/1 switch 32 KiB at `$8000` (low bit ignored), 2 fixes the
//! first bank at `$8000` and switches `$C000`, 3 switches `$8000` and fixes
//! the last bank at `$C000`.
//!
//! # Reference
//! - [MMC1 on NESdev Wiki](https://www.nesdev.org/wiki/MMC1)

use crate::cartridge::{
    Cartridge,
    header::{Mirroring, PRG_BANK_SIZE},
    mapper::{ChrStorage, MirroringCallback, MirroringObserver},
};

const CHR_BANK_SIZE_4K: usize = 0x1000;

const CONTROL_WINDOW_END: u16 = 0x9FFF;
const CHR_BANK0_WINDOW_END: u16 = 0xBFFF;
const CHR_BANK1_WINDOW_END: u16 = 0xDFFF;

/// Data bit 7 resets the serial port.
const RESET_BIT: u8 = 0x80;
const SHIFT_WRITES: u8 = 5;

#[derive(Debug)]
pub struct Mapper1 {
    prg_rom: Box<[u8]>,
    chr: ChrStorage,
    has_extended_ram: bool,
    mirroring: Mirroring,
    on_mirroring_change: MirroringObserver,

    shift_reg: u8,
    write_count: u8,

    prg_mode: u8,
    chr_mode: u8,
    reg_prg: u8,
    reg_chr0: u8,
    reg_chr1: u8,

    /// Byte offsets of the banks currently visible in each window.
    prg_bank0: usize,
    prg_bank1: usize,
    chr_bank0: usize,
    chr_bank1: usize,
}

impl Mapper1 {
    pub fn new(cartridge: Cartridge) -> Self {
        let has_extended_ram = cartridge.has_extended_ram();
        let (prg_rom, chr_rom) = cartridge.into_roms();
        let mut mapper = Self {
            prg_rom,
            chr: ChrStorage::from_rom(chr_rom),
            has_extended_ram,
            mirroring: Mirroring::Horizontal,
            on_mirroring_change: MirroringObserver::default(),
            shift_reg: 0,
            write_count: 0,
            prg_mode: 3,
            chr_mode: 0,
            reg_prg: 0,
            reg_chr0: 0,
            reg_chr1: 0,
            prg_bank0: 0,
            prg_bank1: 0,
            chr_bank0: 0,
            chr_bank1: 0,
        };
        mapper.update_prg_banks();
        mapper.update_chr_banks();
        mapper
    }

    pub(crate) fn set_mirroring_callback(&mut self, callback: MirroringCallback) {
        self.on_mirroring_change.set(callback);
    }

    pub(crate) fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    fn last_bank_offset(&self) -> usize {
        self.prg_rom.len().saturating_sub(PRG_BANK_SIZE)
    }

    pub(crate) fn prg_offset(&self, addr: u16) -> usize {
        let bank = if addr < 0xC000 {
            self.prg_bank0
        } else {
            self.prg_bank1
        };
        let offset = bank + (addr & 0x3FFF) as usize;
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
        if value & RESET_BIT != 0 {
            self.shift_reg = 0;
            self.write_count = 0;
            self.prg_mode = 3;
            self.update_prg_banks();
            return;
        }

        self.shift_reg = (self.shift_reg >> 1) | ((value & 0x01) << 4);
        self.write_count += 1;

        if self.write_count == SHIFT_WRITES {
            let value = self.shift_reg;
            self.commit(addr, value);
            self.shift_reg = 0;
            self.write_count = 0;
        }
    }

    fn commit(&mut self, addr: u16, value: u8) {
        match addr {
            ..=CONTROL_WINDOW_END => {
                self.mirroring = match value & 0x03 {
                    0 => Mirroring::SingleScreenLower,
                    1 => Mirroring::SingleScreenUpper,
                    2 => Mirroring::Vertical,
                    _ => Mirroring::Horizontal,
                };
                self.on_mirroring_change.notify(self.mirroring);

                self.chr_mode = (value & 0x10) >> 4;
                self.prg_mode = (value & 0x0C) >> 2;
                self.update_prg_banks();
                self.update_chr_banks();
            }
            ..=CHR_BANK0_WINDOW_END => {
                self.reg_chr0 = value;
                self.update_chr_banks();
            }
            ..=CHR_BANK1_WINDOW_END => {
                self.reg_chr1 = value;
                self.update_chr_banks();
            }
            _ => {
                self.reg_prg = value & 0x0F;
                self.update_prg_banks();
            }
        }
        tracing::trace!(
            addr = format_args!("{addr:#06X}"),
            value,
            prg_mode = self.prg_mode,
            chr_mode = self.chr_mode,
            "MMC1 register commit"
        );
    }

    fn update_prg_banks(&mut self) {
        let reg = self.reg_prg as usize;
        match self.prg_mode {
            0 | 1 => {
                self.prg_bank0 = PRG_BANK_SIZE * (reg & !1);
                self.prg_bank1 = self.prg_bank0 + PRG_BANK_SIZE;
            }
            2 => {
                self.prg_bank0 = 0;
                self.prg_bank1 = PRG_BANK_SIZE * reg;
            }
            _ => {
                self.prg_bank0 = PRG_BANK_SIZE * reg;
                self.prg_bank1 = self.last_bank_offset();
            }
        }
    }

    fn update_chr_banks(&mut self) {
        if self.chr_mode == 0 {
            // 8 KiB mode ignores the low bit of the bank number.
            self.chr_bank0 = CHR_BANK_SIZE_4K * (self.reg_chr0 as usize & !1);
            self.chr_bank1 = self.chr_bank0 + CHR_BANK_SIZE_4K;
        } else {
            self.chr_bank0 = CHR_BANK_SIZE_4K * self.reg_chr0 as usize;
            self.chr_bank1 = CHR_BANK_SIZE_4K * self.reg_chr1 as usize;
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let addr = (addr & 0x1FFF) as usize;
        if addr < CHR_BANK_SIZE_4K {
            self.chr_bank0 + addr
        } else {
            self.chr_bank1 + (addr & 0x0FFF)
        }
    }

    pub fn read_chr(&self, addr: u16) -> u8 {
        self.chr.read(self.chr_offset(addr))
    }

    pub fn write_chr(&mut self, addr: u16, value: u8) {
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

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    /// PRG image whose every 16 KiB bank is filled with its bank number.
    fn cart_with_prg_banks(banks: usize) -> Mapper1 {
        let mut prg = vec![0u8; banks * PRG_BANK_SIZE];
        for (bank, chunk) in prg.chunks_mut(PRG_BANK_SIZE).enumerate() {
            chunk.fill(bank as u8);
        }
        let mut chr = vec![0u8; 4 * CHR_BANK_SIZE_4K];
        for (bank, chunk) in chr.chunks_mut(CHR_BANK_SIZE_4K).enumerate() {
            chunk.fill(0x10 + bank as u8);
        }
        Mapper1::new(Cartridge::new(prg, chr, Mirroring::Vertical, 1, true))
    }

    fn write_serial_reg(mapper: &mut Mapper1, addr: u16, value: u8) {
        for i in 0..5 {
            let bit = (value >> i) & 1;
            mapper.write_prg(addr, bit);
        }
    }

    #[test]
    fn default_prg_banking_mode_is_fixed_last_bank() {
        let mapper = cart_with_prg_banks(4);
        assert_eq!(mapper.read_prg(0x8000), 0);
        assert_eq!(mapper.read_prg(0xC000), 3);
        assert_eq!(mapper.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn switches_prg_bank_in_mode3() {
        let mut mapper = cart_with_prg_banks(4);
        write_serial_reg(&mut mapper, 0xE000, 0x02);
        assert_eq!(mapper.read_prg(0x8000), 2);
        assert_eq!(mapper.read_prg(0xC000), 3);
    }

    #[test]
    fn prg_mode2_fixes_first_bank() {
        let mut mapper = cart_with_prg_banks(4);
        write_serial_reg(&mut mapper, 0x8000, 0b0_1000);
        write_serial_reg(&mut mapper, 0xE000, 0x02);
        assert_eq!(mapper.read_prg(0x8000), 0);
        assert_eq!(mapper.read_prg(0xC000), 2);
    }

    #[test]
    fn prg_mode0_switches_32k_ignoring_low_bit() {
        let mut mapper = cart_with_prg_banks(4);
        write_serial_reg(&mut mapper, 0x8000, 0b0_0000);
        write_serial_reg(&mut mapper, 0xE000, 0x03);
        assert_eq!(mapper.read_prg(0x8000), 2);
        assert_eq!(mapper.read_prg(0xC000), 3);
    }

    #[test]
    fn reset_bit_aborts_partial_write_and_restores_mode3() {
        let mut mapper = cart_with_prg_banks(4);
        write_serial_reg(&mut mapper, 0x8000, 0b0_0000);
        mapper.write_prg(0xE000, 1);
        mapper.write_prg(0xE000, 1);
        mapper.write_prg(0x8000, 0x80);
        // The partial write is discarded; a fresh five-write sequence commits cleanly.
        write_serial_reg(&mut mapper, 0xE000, 0x01);
        assert_eq!(mapper.read_prg(0x8000), 1);
        assert_eq!(mapper.read_prg(0xC000), 3);
    }

    #[test]
    fn control_commit_changes_mirroring_and_notifies() {
        let mut mapper = cart_with_prg_banks(2);
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        mapper.set_mirroring_callback(Box::new(move |m| sink.set(Some(m))));

        // Data bits 1,0,1,1,0 written LSB-first.
        for bit in [1, 0, 1, 1, 0] {
            mapper.write_prg(0x8000, bit);
        }
        assert_eq!(mapper.mirroring(), Mirroring::SingleScreenUpper);
        assert_eq!(seen.get(), Some(Mirroring::SingleScreenUpper));

        write_serial_reg(&mut mapper, 0x8000, 0b0_0010);
        assert_eq!(seen.get(), Some(Mirroring::Vertical));
        write_serial_reg(&mut mapper, 0x8000, 0b0_0011);
        assert_eq!(seen.get(), Some(Mirroring::Horizontal));
        write_serial_reg(&mut mapper, 0x8000, 0b0_0000);
        assert_eq!(seen.get(), Some(Mirroring::SingleScreenLower));
    }

    #[test]
    fn non_control_commits_do_not_notify() {
        let mut mapper = cart_with_prg_banks(2);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        mapper.set_mirroring_callback(Box::new(move |_| counter.set(counter.get() + 1)));

        write_serial_reg(&mut mapper, 0xA000, 0x01);
        write_serial_reg(&mut mapper, 0xC000, 0x01);
        write_serial_reg(&mut mapper, 0xE000, 0x01);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn chr_banking_4k_and_8k_modes() {
        let mut mapper = cart_with_prg_banks(2);
        // 8 KiB mode: bank 3 behaves as bank 2 (low bit ignored).
        write_serial_reg(&mut mapper, 0xA000, 0x03);
        assert_eq!(mapper.read_chr(0x0000), 0x12);
        assert_eq!(mapper.read_chr(0x1000), 0x13);

        // 4 KiB mode with independent banks.
        write_serial_reg(&mut mapper, 0x8000, 0b1_1100);
        write_serial_reg(&mut mapper, 0xA000, 0x03);
        write_serial_reg(&mut mapper, 0xC000, 0x01);
        assert_eq!(mapper.read_chr(0x0000), 0x13);
        assert_eq!(mapper.read_chr(0x1FFF), 0x11);
    }

    #[test]
    fn chr_ram_is_writable_through_banks() {
        let mut mapper = Mapper1::new(Cartridge::new(
            vec![0u8; 2 * PRG_BANK_SIZE],
            Vec::new(),
            Mirroring::Horizontal,
            1,
            false,
        ));
        mapper.write_chr(0x1555, 0xA5);
        assert_eq!(mapper.read_chr(0x1555), 0xA5);
    }
}

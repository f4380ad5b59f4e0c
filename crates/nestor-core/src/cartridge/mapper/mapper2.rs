use crate::cartridge::{
    Cartridge,
    header::{Mirroring, PRG_BANK_SIZE},
    mapper::ChrStorage,
};

// Mapper 2 – UxROM simple 16 KiB PRG banking.
//
// | Area | Address range     | Behaviour                                  |
// |------|-------------------|--------------------------------------------|
// | CPU  | `$8000-$BFFF`     | 16 KiB switchable PRG-ROM bank             |
// | CPU  | `$C000-$FFFF`     | 16 KiB fixed PRG-ROM bank (last)           |
// | PPU  | `$0000-$1FFF`     | CHR ROM/RAM (no mapper-side CHR banking)   |
// | PPU  | `$2000-$3EFF`     | Mirroring from the header (no registers)   |

/// CPU `$C000`: boundary between the switchable window and the fixed last bank.
const UXROM_FIXED_WINDOW_START: u16 = 0xC000;

#[derive(Debug, Clone)]
pub struct Mapper2 {
    prg_rom: Box<[u8]>,
    chr: ChrStorage,
    mirroring: Mirroring,
    has_extended_ram: bool,
    select_prg: usize,
}

impl Mapper2 {
    pub fn new(cartridge: Cartridge) -> Self {
        let mirroring = cartridge.mirroring();
        let has_extended_ram = cartridge.has_extended_ram();
        let (prg_rom, chr_rom) = cartridge.into_roms();
        Self {
            prg_rom,
            chr: ChrStorage::from_rom(chr_rom),
            mirroring,
            has_extended_ram,
            select_prg: 0,
        }
    }

    pub(crate) fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    pub(crate) fn prg_offset(&self, addr: u16) -> usize {
        if self.prg_rom.is_empty() {
            return 0;
        }
        let window = (addr & 0x3FFF) as usize;
        let offset = if addr < UXROM_FIXED_WINDOW_START {
            window | (self.select_prg << 14)
        } else {
            self.prg_rom.len().saturating_sub(PRG_BANK_SIZE) + window
        };
        offset % self.prg_rom.len()
    }

    pub fn read_prg(&self, addr: u16) -> u8 {
        self.prg_rom
            .get(self.prg_offset(addr))
            .copied()
            .unwrap_or(0)
    }

    pub fn write_prg(&mut self, _addr: u16, value: u8) {
        self.select_prg = value as usize;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn uxrom(banks: usize) -> Mapper2 {
        let mut prg = vec![0u8; banks * PRG_BANK_SIZE];
        for (bank, chunk) in prg.chunks_mut(PRG_BANK_SIZE).enumerate() {
            chunk.fill(bank as u8);
        }
        Mapper2::new(Cartridge::new(prg, Vec::new(), Mirroring::Vertical, 2, false))
    }

    #[test]
    fn last_bank_is_fixed_at_c000() {
        let mut mapper = uxrom(8);
        assert_eq!(mapper.read_prg(0x8000), 0);
        assert_eq!(mapper.read_prg(0xC000), 7);

        mapper.write_prg(0xFFFF, 5);
        assert_eq!(mapper.read_prg(0x8000), 5);
        assert_eq!(mapper.read_prg(0xBFFF), 5);
        assert_eq!(mapper.read_prg(0xC000), 7);
        assert_eq!(mapper.read_prg(0xFFFF), 7);
    }

    #[test]
    fn out_of_range_select_wraps() {
        let mut mapper = uxrom(4);
        mapper.write_prg(0x8000, 6);
        assert_eq!(mapper.read_prg(0x8000), 2);
    }

    #[test]
    fn chr_ram_when_image_has_none() {
        let mut mapper = uxrom(2);
        mapper.write_chr(0x1FFF, 0x99);
        assert_eq!(mapper.read_chr(0x1FFF), 0x99);
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
    }
}

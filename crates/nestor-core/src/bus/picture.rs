//! PPU address space routing.
//!
//! Pattern tables (`$0000-$1FFF`) come from the cartridge, the four logical
//! nametables (`$2000-$2FFF`, mirrored at `$3000-$3EFF`) alias into 2 KiB of
//! console RAM according to the current mirroring, and `$3F00-$3FFF` is the
//! 32-byte palette RAM.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    cartridge::{Mapper, header::Mirroring},
    memory::ppu as ppu_mem,
};

pub struct PictureBus {
    ram: [u8; ppu_mem::CIRAM_SIZE],
    /// CIRAM offset backing each of the four logical nametables.
    name_tables: [usize; 4],
    palette: [u8; ppu_mem::PALETTE_RAM_SIZE],
    mirroring: Mirroring,
    mapper: Option<Rc<RefCell<Mapper>>>,
}

impl fmt::Debug for PictureBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PictureBus")
            .field("name_tables", &self.name_tables)
            .field("mirroring", &self.mirroring)
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl Default for PictureBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PictureBus {
    pub fn new() -> Self {
        Self {
            ram: [0; ppu_mem::CIRAM_SIZE],
            name_tables: [0; 4],
            palette: [0; ppu_mem::PALETTE_RAM_SIZE],
            mirroring: Mirroring::Horizontal,
            mapper: None,
        }
    }

    /// Attaches the cartridge board. Returns `false` when no mapper is given.
    pub fn set_mapper(&mut self, mapper: Option<Rc<RefCell<Mapper>>>) -> bool {
        let Some(mapper) = mapper else {
            tracing::error!("mapper pointer is null");
            return false;
        };
        self.mapper = Some(mapper);
        self.update_mirroring();
        true
    }

    /// Re-reads the mapper's mirroring and re-aliases the nametables.
    pub fn update_mirroring(&mut self) {
        let mirroring = match self.mapper.as_ref() {
            Some(mapper) => mapper.borrow().name_table_mirroring(),
            None => return,
        };
        self.set_mirroring(mirroring);
    }

    /// Re-aliases the four logical nametables for `mirroring`.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        const NT: usize = ppu_mem::NAMETABLE_SIZE as usize;
        self.name_tables = match mirroring {
            Mirroring::Horizontal => [0, 0, NT, NT],
            Mirroring::Vertical => [0, NT, 0, NT],
            Mirroring::SingleScreenLower => [0; 4],
            Mirroring::SingleScreenUpper => [NT; 4],
            Mirroring::FourScreen => {
                tracing::error!("unsupported name table mirroring: {mirroring:?}");
                [0; 4]
            }
        };
        self.mirroring = mirroring;
        tracing::trace!(?mirroring, "nametables re-aliased");
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// CIRAM offsets of the four logical nametables.
    pub fn name_table_offsets(&self) -> [usize; 4] {
        self.name_tables
    }

    fn name_table_index(&self, addr: u16) -> usize {
        // Folds the $3000-$3EFF mirror onto $2000-$2EFF.
        let offset = (addr - ppu_mem::NAMETABLE_BASE) & 0x0FFF;
        let table = (offset / ppu_mem::NAMETABLE_SIZE) as usize;
        self.name_tables[table] + (offset % ppu_mem::NAMETABLE_SIZE) as usize
    }

    /// Palette RAM slot for a palette address; `$3F10/$14/$18/$1C` alias the
    /// background entries below them.
    fn palette_index(addr: u16) -> usize {
        let index = (addr & 0x1F) as usize;
        if index >= 0x10 && index & 0x03 == 0 {
            index - 0x10
        } else {
            index
        }
    }

    /// Reads a palette entry by its 5-bit index.
    pub fn read_palette(&self, index: u8) -> u8 {
        self.palette[Self::palette_index(index as u16)]
    }

    pub fn read(&self, addr: u16) -> u8 {
        let addr = addr & ppu_mem::VRAM_ADDR_MASK;
        match addr {
            ..=ppu_mem::PATTERN_TABLE_END => self
                .mapper
                .as_ref()
                .map_or(0, |mapper| mapper.borrow().read_chr(addr)),
            ppu_mem::NAMETABLE_BASE..=ppu_mem::NAMETABLE_MIRROR_END => {
                self.ram[self.name_table_index(addr)]
            }
            _ => self.palette[Self::palette_index(addr)],
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = addr & ppu_mem::VRAM_ADDR_MASK;
        match addr {
            ..=ppu_mem::PATTERN_TABLE_END => {
                if let Some(mapper) = self.mapper.as_ref() {
                    mapper.borrow_mut().write_chr(addr, value);
                }
            }
            ppu_mem::NAMETABLE_BASE..=ppu_mem::NAMETABLE_MIRROR_END => {
                let index = self.name_table_index(addr);
                self.ram[index] = value;
            }
            _ => self.palette[Self::palette_index(addr)] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn bus(mirroring: Mirroring) -> PictureBus {
        let cartridge = Cartridge::new(vec![0u8; 0x4000], Vec::new(), mirroring, 0, false);
        let mapper = Mapper::new(cartridge).expect("nrom");
        let mut bus = PictureBus::new();
        assert!(bus.set_mapper(Some(Rc::new(RefCell::new(mapper)))));
        bus
    }

    #[test]
    fn horizontal_mirroring_aliases_pairs() {
        let mut bus = bus(Mirroring::Horizontal);
        bus.write(0x2000, 0x11);
        bus.write(0x2800, 0x22);
        assert_eq!(bus.read(0x2400), 0x11);
        assert_eq!(bus.read(0x2C00), 0x22);
        assert_eq!(bus.name_table_offsets(), [0, 0, 0x400, 0x400]);
    }

    #[test]
    fn vertical_mirroring_aliases_columns() {
        let mut bus = bus(Mirroring::Vertical);
        bus.write(0x2005, 0x11);
        bus.write(0x2405, 0x22);
        assert_eq!(bus.read(0x2805), 0x11);
        assert_eq!(bus.read(0x2C05), 0x22);
    }

    #[test]
    fn single_screen_modes() {
        let mut bus = bus(Mirroring::Vertical);
        bus.set_mirroring(Mirroring::SingleScreenUpper);
        assert_eq!(bus.name_table_offsets(), [0x400; 4]);
        bus.write(0x2000, 0x33);
        assert_eq!(bus.read(0x2C00), 0x33);

        bus.set_mirroring(Mirroring::SingleScreenLower);
        assert_eq!(bus.name_table_offsets(), [0; 4]);
        assert_eq!(bus.read(0x2400), 0);
    }

    #[test]
    fn region_3000_mirrors_2000() {
        let mut bus = bus(Mirroring::Vertical);
        bus.write(0x2123, 0x44);
        assert_eq!(bus.read(0x3123), 0x44);
        bus.write(0x3EFF, 0x55);
        assert_eq!(bus.read(0x2EFF), 0x55);
    }

    #[test]
    fn palette_background_aliases() {
        let mut bus = bus(Mirroring::Vertical);
        bus.write(0x3F10, 0x0F);
        assert_eq!(bus.read(0x3F00), 0x0F);
        assert_eq!(bus.read_palette(0x00), 0x0F);

        bus.write(0x3F01, 0x21);
        bus.write(0x3F11, 0x16);
        assert_eq!(bus.read_palette(0x01), 0x21);
        assert_eq!(bus.read_palette(0x11), 0x16);

        // $3F20-$3FFF repeats the 32-byte palette.
        assert_eq!(bus.read(0x3F21), 0x21);
    }

    #[test]
    fn pattern_tables_use_mapper_chr() {
        let mut bus = bus(Mirroring::Vertical);
        bus.write(0x0123, 0x66);
        assert_eq!(bus.read(0x0123), 0x66);
        // 14-bit address space wraps.
        assert_eq!(bus.read(0x4123), 0x66);
    }

    #[test]
    fn update_mirroring_follows_mapper() {
        let bus = bus(Mirroring::Vertical);
        assert_eq!(bus.mirroring(), Mirroring::Vertical);
        assert!(!PictureBus::new().set_mapper(None));
    }
}

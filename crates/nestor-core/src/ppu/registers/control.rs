use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// PPU control register (`$2000`).
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N M S B s I n n
    /// ```
    /// - `n n`: base nametable select
    /// - `I`: VRAM increment (0=+1, 1=+32)
    /// - `s`: sprite pattern table (8x8)
    /// - `B`: background pattern table
    /// - `S`: sprite size (0=8x8, 1=8x16)
    /// - `M`: master/slave select
    /// - `N`: generate NMI at VBlank start
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Control: u8 {
        /// Base nametable (bits 0 and 1), copied into `t` on write.
        const NAMETABLE = 0b0000_0011;

        /// `$2007` accesses step by 32 (one row) instead of 1.
        const INCREMENT_32 = 0b0000_0100;

        /// 8x8 sprites fetch from `$1000` instead of `$0000`.
        const SPRITE_TABLE = 0b0000_1000;

        /// Background tiles fetch from `$1000` instead of `$0000`.
        const BACKGROUND_TABLE = 0b0001_0000;

        /// 8x16 sprites. The pattern table then comes from the tile index.
        const SPRITE_SIZE_16 = 0b0010_0000;

        /// Unused on a stock console.
        const MASTER_SLAVE = 0b0100_0000;

        /// Raise NMI when vertical blank starts.
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    /// Nametable select bits (0..3).
    pub fn nametable_index(self) -> u8 {
        self.bits() & 0b11
    }

    pub fn vram_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) {
            32
        } else {
            1
        }
    }

    pub fn sprite_pattern_table(self) -> u16 {
        if self.contains(Control::SPRITE_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub fn background_pattern_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    /// Sprite height in pixels.
    pub fn sprite_height(self) -> u8 {
        if self.contains(Control::SPRITE_SIZE_16) {
            16
        } else {
            8
        }
    }

    pub fn nmi_enabled(self) -> bool {
        self.contains(Control::GENERATE_NMI)
    }
}

use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

// Layout (bits 0-14):
//  14 13 12 11 10 9 8 7 6 5 4 3 2 1 0
//  [fine_y][nt][coarse_y   ][coarse_x   ]
//  yyy     NN   YYYYY         XXXXX
bitflags! {
    /// Bit masks for the 15-bit VRAM address (`v`/`t` registers).
    pub(crate) struct VramAddrMask: u16 {
        const COARSE_X = 0x001F;
        const COARSE_Y = 0x03E0;
        const NAMETABLE_X = 0x0400;
        const NAMETABLE_Y = 0x0800;
        const NAMETABLE = Self::NAMETABLE_X.bits() | Self::NAMETABLE_Y.bits();
        const FINE_Y = 0x7000;
        /// Bits copied from `t` at dot 257.
        const HORIZONTAL = Self::COARSE_X.bits() | Self::NAMETABLE_X.bits();
        /// Bits copied from `t` during the pre-render line.
        const VERTICAL = Self::COARSE_Y.bits() | Self::NAMETABLE_Y.bits() | Self::FINE_Y.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

const COARSE_Y_SHIFT: u16 = 5;
const NAMETABLE_SHIFT: u16 = 10;
const FINE_Y_SHIFT: u16 = 12;

/// 15-bit "loopy" address used by the PPU internal `v`/`t` registers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct VramAddr(u16);

impl VramAddr {
    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & VramAddrMask::COARSE_X.bits()) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, cx: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_X.bits()) | u16::from(cx & 0b1_1111);
    }

    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & VramAddrMask::COARSE_Y.bits()) >> COARSE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_coarse_y(&mut self, cy: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_Y.bits())
            | (u16::from(cy & 0b1_1111) << COARSE_Y_SHIFT);
    }

    #[inline]
    pub fn nametable(self) -> u8 {
        ((self.0 & VramAddrMask::NAMETABLE.bits()) >> NAMETABLE_SHIFT) as u8
    }

    #[inline]
    pub fn set_nametable(&mut self, nt: u8) {
        self.0 =
            (self.0 & !VramAddrMask::NAMETABLE.bits()) | (u16::from(nt & 0b11) << NAMETABLE_SHIFT);
    }

    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & VramAddrMask::FINE_Y.bits()) >> FINE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_fine_y(&mut self, fy: u8) {
        self.0 = (self.0 & !VramAddrMask::FINE_Y.bits()) | (u16::from(fy & 0b111) << FINE_Y_SHIFT);
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Replaces the raw address, masking to 15 bits.
    #[inline]
    pub fn set_raw(&mut self, v: u16) {
        self.0 = v & VramAddrMask::ALL.bits();
    }

    /// Address as seen on the 14-bit picture bus.
    #[inline]
    pub fn bus_addr(self) -> u16 {
        self.0 & ppu_mem::VRAM_ADDR_MASK
    }

    /// Register increment after a `$2007` access.
    #[inline]
    pub fn increment(&mut self, step: u16) {
        self.0 = self.0.wrapping_add(step) & VramAddrMask::ALL.bits();
    }

    /// Nametable byte for the tile under the scroll position.
    #[inline]
    pub fn tile_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE | (self.0 & 0x0FFF)
    }

    /// Attribute byte covering the tile under the scroll position.
    #[inline]
    pub fn attribute_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE
            | ppu_mem::ATTRIBUTE_OFFSET
            | (self.0 & VramAddrMask::NAMETABLE.bits())
            | ((self.0 >> 4) & 0x38)
            | ((self.0 >> 2) & 0x07)
    }

    /// Shift selecting the tile's 2-bit palette within its attribute byte.
    #[inline]
    pub fn attribute_shift(self) -> u8 {
        (((self.0 >> 4) & 0x04) | (self.0 & 0x02)) as u8
    }

    /// Steps one tile right, wrapping into the horizontally adjacent nametable.
    pub fn increment_coarse_x(&mut self) {
        if self.coarse_x() == 31 {
            self.set_coarse_x(0);
            self.0 ^= VramAddrMask::NAMETABLE_X.bits();
        } else {
            self.0 += 1;
        }
    }

    /// Steps one pixel row down. Row 29 wraps into the vertically adjacent
    /// nametable; rows 30 and 31 (attribute area) wrap without switching.
    pub fn increment_y(&mut self) {
        let fine_y = self.fine_y();
        if fine_y < 7 {
            self.set_fine_y(fine_y + 1);
            return;
        }
        self.set_fine_y(0);
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.0 ^= VramAddrMask::NAMETABLE_Y.bits();
            }
            31 => self.set_coarse_y(0),
            y => self.set_coarse_y(y + 1),
        }
    }

    /// Copies the horizontal scroll bits from `t`.
    #[inline]
    pub fn copy_horizontal(&mut self, t: VramAddr) {
        let mask = VramAddrMask::HORIZONTAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }

    /// Copies the vertical scroll bits from `t`.
    #[inline]
    pub fn copy_vertical(&mut self, t: VramAddr) {
        let mask = VramAddrMask::VERTICAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }
}

impl core::fmt::Debug for VramAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VramAddr")
            .field("raw", &format_args!("{:#06X}", self.0))
            .field("fine_y", &self.fine_y())
            .field("nametable", &self.nametable())
            .field("coarse_y", &self.coarse_y())
            .field("coarse_x", &self.coarse_x())
            .finish()
    }
}

impl From<u16> for VramAddr {
    #[inline]
    fn from(v: u16) -> Self {
        VramAddr(v & VramAddrMask::ALL.bits())
    }
}

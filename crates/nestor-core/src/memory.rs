//! Shared definitions for the NES memory map.
//!
//! Both address spaces are described here so that the bus and mapper modules
//! dispatch on named ranges instead of bare numbers.

/// CPU (system bus) memory map.
pub mod cpu {
    /// First address of the hardware stack page.
    pub const STACK_PAGE_START: u16 = 0x0100;

    /// NMI vector low byte address (`$FFFA`).
    pub const NMI_VECTOR: u16 = 0xFFFA;
    /// Reset vector low byte address (`$FFFC`).
    pub const RESET_VECTOR: u16 = 0xFFFC;
    /// IRQ/BRK vector low byte address (`$FFFE`).
    pub const IRQ_VECTOR: u16 = 0xFFFE;

    /// Size of the CPU internal RAM block (2 KiB mirrored through `$1FFF`).
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    /// Mask applied to mirror CPU RAM accesses within `$0000-$1FFF`.
    pub const INTERNAL_RAM_MASK: u16 = (INTERNAL_RAM_SIZE as u16) - 1;
    /// Last mirrored internal RAM address visible to the CPU.
    pub const INTERNAL_RAM_MIRROR_END: u16 = 0x1FFF;

    /// First CPU address mapped to the PPU register mirror.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    /// Last CPU address mirrored to the PPU register set.
    pub const PPU_REGISTER_END: u16 = 0x3FFF;
    /// Folds a mirrored PPU register address onto `$2000-$2007`.
    pub const PPU_REGISTER_MIRROR_MASK: u16 = 0x2007;

    /// First APU / I/O register.
    pub const IO_REGISTER_BASE: u16 = 0x4000;
    /// Last APU / I/O register (`$4017`).
    pub const IO_REGISTER_END: u16 = 0x4017;

    /// Unused window following the I/O registers.
    pub const UNUSED_START: u16 = 0x4018;
    pub const UNUSED_END: u16 = 0x4FFF;

    /// Cartridge expansion ROM window.
    pub const EXPANSION_ROM_START: u16 = 0x5000;
    pub const EXPANSION_ROM_END: u16 = 0x5FFF;

    /// Cartridge SRAM window start address (`$6000`).
    pub const PRG_RAM_START: u16 = 0x6000;
    /// Cartridge SRAM window end address (inclusive).
    pub const PRG_RAM_END: u16 = 0x7FFF;
    /// Size of the cartridge SRAM window.
    pub const PRG_RAM_SIZE: usize = 0x2000;

    /// PRG ROM window start address (`$8000`).
    pub const PRG_ROM_START: u16 = 0x8000;
    /// Final CPU-visible address (`$FFFF`).
    pub const CPU_ADDR_END: u16 = 0xFFFF;

    /// Size of one DMA page.
    pub const PAGE_SIZE: usize = 0x100;
}

/// PPU (picture bus) memory map.
pub mod ppu {
    /// Last pattern table address.
    pub const PATTERN_TABLE_END: u16 = 0x1FFF;
    /// Pattern table base address for table 0.
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    /// Pattern table base address for table 1.
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    /// Size of the pattern table space (`$0000-$1FFF`).
    pub const CHR_SIZE: usize = 0x2000;

    /// Base address of nametable 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Last address of the nametable region proper.
    pub const NAMETABLE_END: u16 = 0x2FFF;
    /// Size of a single nametable in bytes.
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    /// Offset of the attribute table inside a nametable.
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
    /// Mirror of `$2000-$2EFF`.
    pub const NAMETABLE_MIRROR_START: u16 = 0x3000;
    pub const NAMETABLE_MIRROR_END: u16 = 0x3EFF;

    /// Size of the console's nametable RAM (CIRAM).
    pub const CIRAM_SIZE: usize = 0x0800;

    /// Palette RAM base address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM byte count.
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    /// Mask applied to every PPU-internal address.
    pub const VRAM_ADDR_MASK: u16 = 0x3FFF;

    /// Primary Object Attribute Memory byte count.
    pub const OAM_RAM_SIZE: usize = 0x100;
}

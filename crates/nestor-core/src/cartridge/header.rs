//! iNES header parsing.
//!
//! The first 16 bytes of every `.nes` image describe how much PRG/CHR data
//! follows, which mapper the board uses, and how the nametables are wired.
//!
//! # Quick overview
//! - Pass the first 16 bytes to [`Header::parse`].
//! - `header.mapper` selects the [`crate::cartridge::Mapper`] variant.
//! - `header.prg_rom_size` / `header.chr_rom_size` give the section lengths.
//!
//! Only plain NTSC iNES images without a trainer are accepted.

use bitflags::bitflags;

use crate::error::Error;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed iNES header in bytes.
pub const NES_HEADER_LEN: usize = 16;

/// PRG ROM is declared in 16 KiB units.
pub const PRG_BANK_SIZE: usize = 0x4000;
/// CHR ROM is declared in 8 KiB units.
pub const CHR_BANK_SIZE: usize = 0x2000;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        const MIRRORING        = 0b0000_0001;
        const BATTERY          = 0b0000_0010;
        const TRAINER          = 0b0000_0100;
        const FOUR_SCREEN      = 0b0000_1000;
        const MAPPER_LOW_MASK  = 0b1111_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags7: u8 {
        const VS_UNISYSTEM     = 0b0000_0001;
        const PLAYCHOICE_10    = 0b0000_0010;
        const MAPPER_HIGH_MASK = 0b1111_0000;
    }
}

/// Nametable layout presented to the PPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirroring {
    /// `$2000`/`$2400` share one table, `$2800`/`$2C00` the other.
    Horizontal,
    /// `$2000`/`$2800` share one table, `$2400`/`$2C00` the other.
    Vertical,
    /// Cartridge supplies its own four nametables.
    FourScreen,
    /// Every nametable maps to the first 1 KiB of CIRAM.
    SingleScreenLower,
    /// Every nametable maps to the second 1 KiB of CIRAM.
    SingleScreenUpper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    /// PRG ROM length in bytes.
    pub prg_rom_size: usize,
    /// CHR ROM length in bytes; zero means the board carries CHR RAM.
    pub chr_rom_size: usize,
    pub mirroring: Mirroring,
    pub mapper: u8,
    /// Battery-backed (or plain) SRAM at `$6000-$7FFF`.
    pub has_extended_ram: bool,
}

impl Header {
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < NES_HEADER_LEN {
            return Err(Error::TooShort {
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != NES_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let prg_banks = bytes[4];
        if prg_banks == 0 {
            return Err(Error::NoPrgRom);
        }
        let chr_banks = bytes[5];

        let flags6 = Flags6::from_bits_truncate(bytes[6]);
        let flags7 = Flags7::from_bits_truncate(bytes[7]);

        if flags6.contains(Flags6::TRAINER) {
            return Err(Error::TrainerUnsupported);
        }
        // Byte 10 bit 0: TV system (1 = PAL).
        if bytes[10] & 0x01 != 0 {
            return Err(Error::PalUnsupported);
        }

        let mirroring = if flags6.contains(Flags6::FOUR_SCREEN) {
            Mirroring::FourScreen
        } else if flags6.contains(Flags6::MIRRORING) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mapper = ((flags6 & Flags6::MAPPER_LOW_MASK).bits() >> 4)
            | (flags7 & Flags7::MAPPER_HIGH_MASK).bits();

        Ok(Self {
            prg_rom_size: prg_banks as usize * PRG_BANK_SIZE,
            chr_rom_size: chr_banks as usize * CHR_BANK_SIZE,
            mirroring,
            mapper,
            has_extended_ram: flags6.contains(Flags6::BATTERY),
        })
    }
}

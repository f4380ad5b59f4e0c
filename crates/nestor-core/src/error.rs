use thiserror::Error;

use crate::cartridge::header::NES_HEADER_LEN;

#[derive(Error, Debug)]
pub enum Error {
    /// Provided buffer is shorter than the 16-byte header.
    #[error("header expected {NES_HEADER_LEN} bytes, got {actual}")]
    TooShort { actual: usize },

    /// Magic number ("NES<EOF>") is missing.
    #[error("missing NES magic bytes")]
    InvalidMagic,

    #[error("image declares zero PRG-ROM banks")]
    NoPrgRom,

    #[error("trainer section is not supported")]
    TrainerUnsupported,

    #[error("PAL images are not supported")]
    PalUnsupported,

    /// A ROM section (PRG/CHR) is shorter than advertised.
    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("mapper {0} is not supported")]
    UnsupportedMapper(u8),

    /// The CPU fetched an opcode the decoder has no entry for.
    #[error("illegal opcode {opcode:#04X} at {pc:#06X}")]
    IllegalOpcode { opcode: u8, pc: u16 },

    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),
}

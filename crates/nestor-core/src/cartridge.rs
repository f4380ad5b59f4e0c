use std::{fs, path::Path};

pub mod header;
pub mod mapper;

use crate::error::Error;
use header::{Header, Mirroring, NES_HEADER_LEN};

pub use mapper::Mapper;

/// Immutable ROM image plus the board flags a mapper needs.
///
/// An empty `chr_rom` means the board carries CHR RAM instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    prg_rom: Box<[u8]>,
    chr_rom: Box<[u8]>,
    mirroring: Mirroring,
    mapper_id: u8,
    has_extended_ram: bool,
}

impl Cartridge {
    /// Builds a cartridge from already-parsed parts.
    pub fn new(
        prg_rom: impl Into<Box<[u8]>>,
        chr_rom: impl Into<Box<[u8]>>,
        mirroring: Mirroring,
        mapper_id: u8,
        has_extended_ram: bool,
    ) -> Self {
        Self {
            prg_rom: prg_rom.into(),
            chr_rom: chr_rom.into(),
            mirroring,
            mapper_id,
            has_extended_ram,
        }
    }

    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    pub fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn mapper_id(&self) -> u8 {
        self.mapper_id
    }

    pub fn has_extended_ram(&self) -> bool {
        self.has_extended_ram
    }

    /// Splits the cartridge into its owned ROM buffers.
    pub(crate) fn into_roms(self) -> (Box<[u8]>, Box<[u8]>) {
        (self.prg_rom, self.chr_rom)
    }
}

/// Parse an iNES image held in memory.
pub fn load_cartridge(bytes: &[u8]) -> Result<Cartridge, Error> {
    let header_bytes = bytes.get(..NES_HEADER_LEN).ok_or(Error::TooShort {
        actual: bytes.len(),
    })?;
    let header = Header::parse(header_bytes)?;

    let mut cursor = NES_HEADER_LEN;
    let prg_rom = section(bytes, &mut cursor, header.prg_rom_size, "PRG ROM")?;
    let chr_rom = section(bytes, &mut cursor, header.chr_rom_size, "CHR ROM")?;

    tracing::info!(
        mapper = header.mapper,
        prg_kib = header.prg_rom_size / 1024,
        chr_kib = header.chr_rom_size / 1024,
        mirroring = ?header.mirroring,
        extended_ram = header.has_extended_ram,
        "loaded iNES image"
    );

    Ok(Cartridge::new(
        prg_rom,
        chr_rom,
        header.mirroring,
        header.mapper,
        header.has_extended_ram,
    ))
}

/// Load a cartridge directly from disk.
pub fn load_cartridge_from_file<P>(path: P) -> Result<Cartridge, Error>
where
    P: AsRef<Path>,
{
    let bytes = fs::read(path)?;
    load_cartridge(&bytes)
}

fn section(
    bytes: &[u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<Vec<u8>, Error> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let too_short = || Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    };
    let end = cursor.checked_add(len).ok_or_else(too_short)?;
    let slice = bytes.get(*cursor..end).ok_or_else(too_short)?;

    *cursor = end;
    Ok(slice.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_header(prg_banks: u8, chr_banks: u8, flags6: u8) -> [u8; NES_HEADER_LEN] {
        [
            b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, flags6, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ]
    }

    #[test]
    fn loads_basic_nrom_cartridge() {
        let mut rom = base_header(1, 1, 0).to_vec();
        rom.extend(vec![0xAA; 16 * 1024]);
        rom.extend(vec![0x55; 8 * 1024]);

        let cartridge = load_cartridge(&rom).expect("parse cartridge");

        assert_eq!(cartridge.prg_rom().len(), 16 * 1024);
        assert_eq!(cartridge.chr_rom().len(), 8 * 1024);
        assert_eq!(cartridge.prg_rom()[0], 0xAA);
        assert_eq!(cartridge.chr_rom()[0], 0x55);
        assert_eq!(cartridge.mapper_id(), 0);
        assert_eq!(cartridge.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn chr_ram_cartridge_has_empty_chr_rom() {
        let mut rom = base_header(2, 0, 0x21).to_vec();
        rom.extend(vec![0x00; 32 * 1024]);

        let cartridge = load_cartridge(&rom).expect("parse cartridge");
        assert!(cartridge.chr_rom().is_empty());
        assert_eq!(cartridge.mapper_id(), 2);
        assert_eq!(cartridge.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn errors_when_prg_section_missing() {
        let mut rom = base_header(1, 0, 0).to_vec();
        rom.extend(vec![0xAA; 1024]);

        let err = load_cartridge(&rom).expect_err("should fail");
        assert!(matches!(
            err,
            Error::SectionTooShort {
                section: "PRG ROM",
                expected: 0x4000,
                actual: 1024,
            }
        ));
    }

    #[test]
    fn errors_when_chr_section_missing() {
        let mut rom = base_header(1, 1, 0).to_vec();
        rom.extend(vec![0xAA; 16 * 1024]);

        let err = load_cartridge(&rom).expect_err("should fail");
        assert!(matches!(
            err,
            Error::SectionTooShort {
                section: "CHR ROM",
                ..
            }
        ));
    }
}

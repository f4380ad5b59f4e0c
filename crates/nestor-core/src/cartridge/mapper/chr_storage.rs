//! CHR storage shared by every supported board.
//!
//! A board exposes either CHR ROM from the image or, when the image carries
//! none, 8 KiB of writable CHR RAM. Mappers compute an absolute offset into
//! this storage (bank base plus window offset) and the storage wraps it to
//! its real length.

use crate::memory::ppu as ppu_mem;

#[derive(Debug, Clone)]
pub enum ChrStorage {
    /// Read-only pattern data from the cartridge image.
    Rom(Box<[u8]>),
    /// Writable pattern RAM on the cartridge.
    Ram(Box<[u8]>),
}

impl ChrStorage {
    /// Uses `chr_rom` as-is, or allocates CHR RAM when the image has none.
    pub fn from_rom(chr_rom: Box<[u8]>) -> Self {
        if chr_rom.is_empty() {
            tracing::debug!("no CHR ROM present, using {} bytes of CHR RAM", ppu_mem::CHR_SIZE);
            ChrStorage::Ram(vec![0; ppu_mem::CHR_SIZE].into_boxed_slice())
        } else {
            ChrStorage::Rom(chr_rom)
        }
    }

    pub fn is_ram(&self) -> bool {
        matches!(self, ChrStorage::Ram(_))
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Read the byte at an absolute offset, wrapped to the storage length.
    pub fn read(&self, offset: usize) -> u8 {
        let bytes = self.bytes();
        if bytes.is_empty() {
            0
        } else {
            bytes[offset % bytes.len()]
        }
    }

    /// Write the byte at an absolute offset. ROM silently keeps its contents.
    pub fn write(&mut self, offset: usize, data: u8) {
        match self {
            ChrStorage::Ram(ram) if !ram.is_empty() => {
                let len = ram.len();
                ram[offset % len] = data;
            }
            ChrStorage::Ram(_) => {}
            ChrStorage::Rom(_) => {
                tracing::trace!("ignoring write {data:#04X} to CHR ROM offset {offset:#06X}");
            }
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            ChrStorage::Rom(rom) => rom,
            ChrStorage::Ram(ram) => ram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rom_becomes_writable_ram() {
        let mut chr = ChrStorage::from_rom(Box::new([]));
        assert!(chr.is_ram());
        assert_eq!(chr.len(), ppu_mem::CHR_SIZE);

        chr.write(0x1234, 0x5A);
        assert_eq!(chr.read(0x1234), 0x5A);
        // Offsets wrap to the 8 KiB RAM.
        assert_eq!(chr.read(0x1234 + ppu_mem::CHR_SIZE), 0x5A);
    }

    #[test]
    fn rom_ignores_writes() {
        let mut chr = ChrStorage::from_rom(vec![0x11; 0x2000].into_boxed_slice());
        chr.write(0x0010, 0xFF);
        assert_eq!(chr.read(0x0010), 0x11);
        assert!(!chr.is_ram());
    }
}

//! Address routing for the two NES address spaces.
//!
//! [`SystemBus`] serves the CPU and [`PictureBus`] serves the PPU. Neither has
//! timing of its own; they only decide which device answers an address.

#[cfg(test)]
pub(crate) mod mock;
pub mod picture;
pub mod system;

pub use picture::PictureBus;
pub use system::{IoRegister, ReadCallback, SystemBus, WriteCallback};

use crate::memory;

/// Expose the CPU stack page start address for stack helpers.
pub(crate) const STACK_ADDR: u16 = memory::cpu::STACK_PAGE_START;

/// CPU-side view of memory.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, data: u8);

    /// Little-endian 16-bit read of `addr` and `addr + 1`.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

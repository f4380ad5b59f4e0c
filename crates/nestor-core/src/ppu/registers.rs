//! CPU-visible PPU register state and internal VRAM address latches.
//!
//! This module mirrors the `$2000-$2007` register set and the internal
//! `v/t/x/w` latches. The bit layouts live in submodules.

mod control;
mod mask;
mod status;
mod vram_addr;

pub use control::Control;
pub use mask::Mask;
pub use status::Status;
pub use vram_addr::VramAddr;

/// Internal VRAM register block (`v/t/x/w`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct VramRegisters {
    /// Current VRAM address (`v`).
    pub(crate) v: VramAddr,
    /// Temporary VRAM address (`t`).
    pub(crate) t: VramAddr,
    /// Fine X scroll (`x`, 0..7).
    pub(crate) x: u8,
    /// Write toggle (`w`): false => first write, true => second write.
    pub(crate) w: bool,
}

impl VramRegisters {
    /// `$2005`: coarse/fine X on the first write, coarse/fine Y on the second.
    pub(crate) fn write_scroll(&mut self, value: u8) {
        if !self.w {
            self.t.set_coarse_x(value >> 3);
            self.x = value & 0b111;
        } else {
            self.t.set_coarse_y(value >> 3);
            self.t.set_fine_y(value & 0b111);
        }
        self.w = !self.w;
    }

    /// `$2006`: high byte first (bit 14 cleared), then low byte, which also
    /// commits `t` into `v`.
    pub(crate) fn write_addr(&mut self, value: u8) {
        if !self.w {
            let hi = u16::from(value & 0b0011_1111) << 8;
            let lo = self.t.raw() & 0x00FF;
            self.t.set_raw(hi | lo);
        } else {
            let hi = self.t.raw() & 0x7F00;
            self.t.set_raw(hi | u16::from(value));
            self.v = self.t;
        }
        self.w = !self.w;
    }
}

/// Aggregates the state of all CPU visible PPU registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    /// OAM pointer driven by `$2003`/`$2004`.
    pub(crate) oam_addr: u8,
    pub(crate) vram: VramRegisters,
    /// Delayed `$2007` read buffer.
    pub(crate) read_buffer: u8,
}

impl Registers {
    /// `$2000`, also syncing the nametable bits into `t`.
    pub(crate) fn write_control(&mut self, value: u8) {
        self.control = Control::from_bits_retain(value);
        self.vram.t.set_nametable(self.control.nametable_index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_writes_fill_t_and_fine_x() {
        let mut vram = VramRegisters::default();
        vram.write_scroll(0b0111_1101); // coarse x 15, fine x 5
        vram.write_scroll(0b0101_1110); // coarse y 11, fine y 6
        assert_eq!(vram.t.coarse_x(), 15);
        assert_eq!(vram.x, 5);
        assert_eq!(vram.t.coarse_y(), 11);
        assert_eq!(vram.t.fine_y(), 6);
        assert!(!vram.w);
        assert_eq!(vram.v.raw(), 0, "scroll never touches v");
    }

    #[test]
    fn address_writes_commit_on_second_byte() {
        let mut vram = VramRegisters::default();
        vram.t.set_raw(0x7FFF);
        vram.write_addr(0xFF);
        assert_eq!(vram.t.raw(), 0x3FFF, "bit 14 cleared, upper bits masked");
        assert_eq!(vram.v.raw(), 0);
        vram.write_addr(0x20);
        assert_eq!(vram.v.raw(), 0x3F20);
    }

    #[test]
    fn control_write_sets_nametable_in_t() {
        let mut registers = Registers::default();
        registers.write_control(0b1000_0011);
        assert_eq!(registers.vram.t.nametable(), 3);
        assert!(registers.control.nmi_enabled());
    }
}

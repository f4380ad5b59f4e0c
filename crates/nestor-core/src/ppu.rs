//! Picture Processing Unit (PPU).
//!
//! The PPU is stepped one dot at a time. Each visible dot resolves one pixel
//! from the background (fetched through the current loopy address `v`) and
//! the sprites selected for the scanline. Timing follows the NTSC 2C02:
//! 341 dots per scanline and 262 scanlines per frame, with the pre-render
//! line one dot shorter on odd frames while background and sprites are both
//! enabled.
//!
//! CPU-facing register access (`$2000-$2007`) goes through the methods named
//! after each register; the session wires them onto the system bus.

pub mod frame;
pub mod palette;

mod registers;

use core::fmt;

use crate::{
    bus::PictureBus,
    memory::ppu as ppu_mem,
    ppu::{
        frame::{FrameBuffer, NullSink, VideoSink},
        registers::Registers,
    },
};

pub use registers::{Control, Mask, Status, VramAddr};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;

const LAST_DOT: u16 = 340;
const VISIBLE_DOTS: u16 = SCREEN_WIDTH as u16;
const POST_RENDER_SCANLINE: u16 = 240;
const VBLANK_SCANLINE: u16 = 241;
const PRE_RENDER_SCANLINE: u16 = 261;
/// Pre-render dots during which `v` receives the vertical bits of `t`.
const VERTICAL_COPY_DOTS: std::ops::RangeInclusive<u16> = 280..=304;
const MAX_SPRITES_PER_SCANLINE: usize = 8;

/// Invoked at the start of vertical blank when NMI generation is enabled.
pub type InterruptCallback = Box<dyn FnMut()>;

/// Pipeline phase derived from the current scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreRender,
    Render,
    PostRender,
    VerticalBlank,
}

pub struct Ppu {
    bus: PictureBus,
    /// Collection of CPU visible registers and their helper latches.
    registers: Registers,
    /// Primary sprite memory: 64 entries of Y, tile, attribute, X.
    oam: [u8; ppu_mem::OAM_RAM_SIZE],
    /// OAM indices of the sprites on the line being drawn, in priority order.
    scanline_sprites: Vec<u8>,
    /// Current dot (0..=340).
    dot: u16,
    /// Current scanline (0..=261).
    scanline: u16,
    odd_frame: bool,
    /// Picture being drawn.
    picture: FrameBuffer,
    frame_count: u64,
    frame_complete: bool,
    on_vblank: Option<InterruptCallback>,
    sink: Box<dyn VideoSink>,
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ppu")
            .field("registers", &self.registers)
            .field("dot", &self.dot)
            .field("scanline", &self.scanline)
            .field("odd_frame", &self.odd_frame)
            .field("frame_count", &self.frame_count)
            .field("scanline_sprites", &self.scanline_sprites)
            .finish_non_exhaustive()
    }
}

impl Ppu {
    pub fn new(bus: PictureBus) -> Self {
        let mut ppu = Self {
            bus,
            registers: Registers::default(),
            oam: [0; ppu_mem::OAM_RAM_SIZE],
            scanline_sprites: Vec::with_capacity(MAX_SPRITES_PER_SCANLINE),
            dot: 0,
            scanline: PRE_RENDER_SCANLINE,
            odd_frame: false,
            picture: FrameBuffer::new(),
            frame_count: 0,
            frame_complete: false,
            on_vblank: None,
            sink: Box::new(NullSink),
        };
        ppu.reset();
        ppu
    }

    /// Restores register and timing state. Picture bus memory and OAM keep
    /// their contents, as on a console reset.
    pub fn reset(&mut self) {
        self.registers = Registers::default();
        self.scanline_sprites.clear();
        self.dot = 0;
        self.scanline = PRE_RENDER_SCANLINE;
        self.odd_frame = false;
        self.frame_complete = false;
        tracing::debug!("PPU reset");
    }

    pub fn set_interrupt_callback(&mut self, callback: InterruptCallback) {
        self.on_vblank = Some(callback);
    }

    pub fn set_video_sink(&mut self, sink: Box<dyn VideoSink>) {
        self.sink = sink;
    }

    pub fn picture_bus(&self) -> &PictureBus {
        &self.bus
    }

    pub fn picture_bus_mut(&mut self) -> &mut PictureBus {
        &mut self.bus
    }

    /// The picture buffer. Holds the last completed frame between the end of
    /// the post-render scanline and the first visible dot of the next frame.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.picture
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn phase(&self) -> Phase {
        match self.scanline {
            0..POST_RENDER_SCANLINE => Phase::Render,
            POST_RENDER_SCANLINE => Phase::PostRender,
            PRE_RENDER_SCANLINE => Phase::PreRender,
            _ => Phase::VerticalBlank,
        }
    }

    /// Returns and clears the end-of-frame signal.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    pub fn oam(&self) -> &[u8; ppu_mem::OAM_RAM_SIZE] {
        &self.oam
    }

    /// Advances the PPU by a single dot.
    pub fn step(&mut self) {
        match self.phase() {
            Phase::PreRender => self.pre_render_dot(),
            Phase::Render => self.render_dot(),
            Phase::PostRender => {}
            Phase::VerticalBlank => {
                if self.scanline == VBLANK_SCANLINE && self.dot == 1 {
                    self.start_vblank();
                }
            }
        }
        self.advance();
    }

    fn pre_render_dot(&mut self) {
        let copy_scroll = self.registers.mask.background_and_sprites();
        match self.dot {
            1 => self.registers.status.remove(
                Status::VERTICAL_BLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
            ),
            257 if copy_scroll => {
                let t = self.registers.vram.t;
                self.registers.vram.v.copy_horizontal(t);
            }
            dot if copy_scroll && VERTICAL_COPY_DOTS.contains(&dot) => {
                let t = self.registers.vram.t;
                self.registers.vram.v.copy_vertical(t);
            }
            _ => {}
        }
    }

    fn render_dot(&mut self) {
        let mask = self.registers.mask;
        match self.dot {
            1..=VISIBLE_DOTS => {
                self.render_pixel((self.dot - 1) as usize, self.scanline as usize);
                if self.dot == VISIBLE_DOTS && mask.background_enabled() {
                    self.registers.vram.v.increment_y();
                }
            }
            257 if mask.background_and_sprites() => {
                let t = self.registers.vram.t;
                self.registers.vram.v.copy_horizontal(t);
            }
            LAST_DOT => self.evaluate_sprites(),
            _ => {}
        }
    }

    fn start_vblank(&mut self) {
        self.registers.status.insert(Status::VERTICAL_BLANK);
        if self.registers.control.nmi_enabled()
            && let Some(callback) = self.on_vblank.as_mut()
        {
            callback();
        }
    }

    /// Moves to the next dot, wrapping scanlines and frames.
    fn advance(&mut self) {
        let short_line = self.scanline == PRE_RENDER_SCANLINE
            && self.odd_frame
            && self.registers.mask.background_and_sprites();
        let last_dot = if short_line { LAST_DOT - 1 } else { LAST_DOT };

        if self.dot < last_dot {
            self.dot += 1;
            return;
        }

        self.dot = 0;
        match self.scanline {
            POST_RENDER_SCANLINE => self.finish_frame(),
            PRE_RENDER_SCANLINE => {
                self.scanline = 0;
                self.odd_frame = !self.odd_frame;
                self.scanline_sprites.clear();
                return;
            }
            _ => {}
        }
        self.scanline += 1;
    }

    fn finish_frame(&mut self) {
        self.picture.present(self.sink.as_mut());
        self.frame_count += 1;
        self.frame_complete = true;
        tracing::trace!(frame = self.frame_count, "frame complete");
    }

    /// Selects up to eight sprites for the next scanline, scanning OAM from
    /// the sprite addressed by `OAMADDR`.
    fn evaluate_sprites(&mut self) {
        self.scanline_sprites.clear();
        let height = self.registers.control.sprite_height() as i32;
        let line = self.scanline as i32;
        let first = self.registers.oam_addr as usize / 4;

        for index in first..64 {
            let top = self.oam[index * 4] as i32;
            if !(0..height).contains(&(line - top)) {
                continue;
            }
            if self.scanline_sprites.len() == MAX_SPRITES_PER_SCANLINE {
                self.registers.status.insert(Status::SPRITE_OVERFLOW);
                break;
            }
            self.scanline_sprites.push(index as u8);
        }
    }

    fn render_pixel(&mut self, x: usize, y: usize) {
        let mask = self.registers.mask;
        let (bg_color, bg_opaque) = self.background_pixel(x);
        if mask.background_enabled() {
            let fine_x = (self.registers.vram.x as usize + x) % 8;
            if fine_x == 7 {
                self.registers.vram.v.increment_coarse_x();
            }
        }

        let sprite = if mask.sprites_visible_at(x) {
            self.sprite_pixel(x, y, bg_opaque)
        } else {
            None
        };

        let palette_index = match sprite {
            Some((color, front)) if front || !bg_opaque => color,
            _ if bg_opaque => bg_color,
            _ => 0,
        };
        let entry = self.bus.read_palette(palette_index);
        self.picture.set(x, y, palette::color(entry));
    }

    /// Background palette index at column `x` and whether it is opaque.
    fn background_pixel(&self, x: usize) -> (u8, bool) {
        if !self.registers.mask.background_visible_at(x) {
            return (0, false);
        }
        let v = self.registers.vram.v;
        let fine_x = (self.registers.vram.x as usize + x) % 8;

        let tile = self.bus.read(v.tile_addr()) as u16;
        let addr = self.registers.control.background_pattern_table()
            | (tile * 16 + v.fine_y() as u16);
        let shift = 7 ^ fine_x;
        let lo = (self.bus.read(addr) >> shift) & 1;
        let hi = (self.bus.read(addr + 8) >> shift) & 1;
        let pattern = lo | (hi << 1);
        if pattern == 0 {
            return (0, false);
        }

        let attribute = self.bus.read(v.attribute_addr());
        let palette = (attribute >> v.attribute_shift()) & 0b11;
        (pattern | (palette << 2), true)
    }

    /// First opaque sprite pixel at `(x, y)` as (palette index, in front of
    /// background). Flags sprite-0 hit on overlap with opaque background.
    fn sprite_pixel(&mut self, x: usize, y: usize, bg_opaque: bool) -> Option<(u8, bool)> {
        let control = self.registers.control;
        let height = control.sprite_height() as i32;

        for &index in &self.scanline_sprites {
            let entry = &self.oam[index as usize * 4..index as usize * 4 + 4];
            let (top, tile, attribute, left) = (entry[0], entry[1], entry[2], entry[3]);

            let dx = x as i32 - left as i32;
            if !(0..8).contains(&dx) {
                continue;
            }
            // Sprites are drawn one line below their OAM Y.
            let mut row = (y as i32 - (top as i32 + 1)).rem_euclid(height);
            let mut column = dx;
            if attribute & 0x40 == 0 {
                column ^= 7;
            }
            if attribute & 0x80 != 0 {
                row ^= height - 1;
            }

            let addr = if height == 8 {
                control.sprite_pattern_table() | (tile as u16 * 16 + row as u16)
            } else {
                let row = (row & 7) | ((row & 8) << 1);
                ((tile as u16 & 1) << 12) | ((tile as u16 >> 1) * 32 + row as u16)
            };
            let lo = (self.bus.read(addr) >> column) & 1;
            let hi = (self.bus.read(addr + 8) >> column) & 1;
            let pattern = lo | (hi << 1);
            if pattern == 0 {
                continue;
            }

            if index == 0
                && bg_opaque
                && x != SCREEN_WIDTH - 1
                && !self.registers.status.contains(Status::SPRITE_ZERO_HIT)
            {
                self.registers.status.insert(Status::SPRITE_ZERO_HIT);
            }
            let color = 0x10 | ((attribute & 0b11) << 2) | pattern;
            return Some((color, attribute & 0x20 == 0));
        }
        None
    }

    // CPU-facing registers.

    /// `$2000` write.
    pub fn control(&mut self, value: u8) {
        self.registers.write_control(value);
    }

    /// `$2001` write.
    pub fn set_mask(&mut self, value: u8) {
        self.registers.mask = Mask::from_bits_retain(value);
    }

    /// `$2002` read: clears vertical blank and the write toggle.
    pub fn status(&mut self) -> u8 {
        let status = self.registers.status.bits();
        self.registers.status.remove(Status::VERTICAL_BLANK);
        self.registers.vram.w = false;
        status
    }

    /// `$2003` write.
    pub fn set_oam_address(&mut self, value: u8) {
        self.registers.oam_addr = value;
    }

    /// `$2004` read.
    pub fn oam_data(&self) -> u8 {
        self.oam[self.registers.oam_addr as usize]
    }

    /// `$2004` write, advancing `OAMADDR`.
    pub fn set_oam_data(&mut self, value: u8) {
        self.oam[self.registers.oam_addr as usize] = value;
        self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
    }

    /// `$2005` write.
    pub fn set_scroll(&mut self, value: u8) {
        self.registers.vram.write_scroll(value);
    }

    /// `$2006` write.
    pub fn set_data_address(&mut self, value: u8) {
        self.registers.vram.write_addr(value);
    }

    /// `$2007` read. Reads below the palette return the previous buffered
    /// value; palette reads are immediate and refill the buffer from the
    /// nametable underneath.
    pub fn data(&mut self) -> u8 {
        let addr = self.registers.vram.v.bus_addr();
        let value = self.bus.read(addr);
        let result = if addr >= ppu_mem::PALETTE_BASE {
            self.registers.read_buffer = self.bus.read(addr - 0x1000);
            value
        } else {
            std::mem::replace(&mut self.registers.read_buffer, value)
        };
        let step = self.registers.control.vram_increment();
        self.registers.vram.v.increment(step);
        result
    }

    /// `$2007` write.
    pub fn set_data(&mut self, value: u8) {
        let addr = self.registers.vram.v.bus_addr();
        self.bus.write(addr, value);
        let step = self.registers.control.vram_increment();
        self.registers.vram.v.increment(step);
    }

    /// OAM DMA: copies a 256-byte page into OAM starting at `OAMADDR`,
    /// wrapping around the end of OAM.
    pub fn do_dma(&mut self, page: &[u8]) {
        let start = self.registers.oam_addr as usize;
        for (offset, &byte) in page.iter().take(ppu_mem::OAM_RAM_SIZE).enumerate() {
            self.oam[(start + offset) % ppu_mem::OAM_RAM_SIZE] = byte;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        cartridge::{Cartridge, Mapper, header::Mirroring},
        ppu::palette::Color,
    };

    const DOTS_PER_FRAME: u64 = 341 * 262;

    fn ppu_with_chr(chr: Vec<u8>) -> Ppu {
        let cartridge = Cartridge::new(vec![0u8; 0x4000], chr, Mirroring::Vertical, 0, false);
        let mapper = Mapper::new(cartridge).expect("nrom");
        let mut bus = PictureBus::new();
        assert!(bus.set_mapper(Some(Rc::new(RefCell::new(mapper)))));
        Ppu::new(bus)
    }

    fn ppu() -> Ppu {
        ppu_with_chr(Vec::new())
    }

    /// Steps until the PPU sits on `(scanline, dot)`, returning the number of
    /// steps taken.
    fn run_to(ppu: &mut Ppu, scanline: u16, dot: u16) -> u64 {
        let mut steps = 0;
        loop {
            ppu.step();
            steps += 1;
            if ppu.scanline == scanline && ppu.dot == dot {
                return steps;
            }
        }
    }

    #[test]
    fn frame_is_341_by_262_dots_without_rendering() {
        let mut ppu = ppu();
        run_to(&mut ppu, 0, 0);
        assert_eq!(run_to(&mut ppu, 0, 0), DOTS_PER_FRAME);
        assert_eq!(run_to(&mut ppu, 0, 0), DOTS_PER_FRAME);
    }

    #[test]
    fn odd_frames_skip_one_dot_while_rendering() {
        let mut ppu = ppu();
        ppu.set_mask(0x18);
        run_to(&mut ppu, 0, 0);
        let first = run_to(&mut ppu, 0, 0);
        let second = run_to(&mut ppu, 0, 0);
        assert_eq!(first + second, 2 * DOTS_PER_FRAME - 1);
        assert!(first == DOTS_PER_FRAME - 1 || second == DOTS_PER_FRAME - 1);
    }

    #[test]
    fn single_layer_keeps_full_length_frames() {
        for mask in [0x08, 0x10] {
            let mut ppu = ppu();
            ppu.set_mask(mask);
            run_to(&mut ppu, 0, 0);
            let first = run_to(&mut ppu, 0, 0);
            let second = run_to(&mut ppu, 0, 0);
            assert_eq!((first, second), (DOTS_PER_FRAME, DOTS_PER_FRAME), "mask {mask:#04X}");
        }
    }

    #[test]
    fn vram_address_only_advances_with_background() {
        let mut ppu = ppu();
        ppu.set_mask(0x10);
        run_to(&mut ppu, 0, 0);
        let before = ppu.registers.vram.v;
        run_to(&mut ppu, 1, 0);
        assert_eq!(ppu.registers.vram.v, before, "sprites only");

        ppu.set_mask(0x08);
        run_to(&mut ppu, 2, 0);
        assert_ne!(ppu.registers.vram.v, before, "background only");
    }

    #[test]
    fn vblank_starts_at_241_1_and_clears_on_status_read() {
        let mut ppu = ppu();
        run_to(&mut ppu, 241, 1);
        assert_eq!(ppu.registers.status.bits() & 0x80, 0, "set while processing dot 1");
        ppu.step();
        assert_eq!(ppu.phase(), Phase::VerticalBlank);
        let status = ppu.status();
        assert_eq!(status & 0x80, 0x80);
        assert_eq!(ppu.status() & 0x80, 0);
    }

    #[test]
    fn vblank_clears_on_pre_render_line() {
        let mut ppu = ppu();
        run_to(&mut ppu, 250, 0);
        assert!(ppu.registers.status.contains(Status::VERTICAL_BLANK));
        run_to(&mut ppu, PRE_RENDER_SCANLINE, 2);
        assert!(!ppu.registers.status.contains(Status::VERTICAL_BLANK));
    }

    #[test]
    fn nmi_callback_fires_once_per_frame_when_enabled() {
        let mut ppu = ppu();
        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        ppu.set_interrupt_callback(Box::new(move || *counter.borrow_mut() += 1));

        run_to(&mut ppu, 0, 0);
        run_to(&mut ppu, 0, 0);
        assert_eq!(*fired.borrow(), 0, "NMI disabled");

        ppu.control(0x80);
        run_to(&mut ppu, 0, 0);
        run_to(&mut ppu, 0, 0);
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn frame_complete_is_signaled_after_post_render() {
        let mut ppu = ppu();
        run_to(&mut ppu, VBLANK_SCANLINE, 0);
        assert!(ppu.take_frame_complete());
        assert!(!ppu.take_frame_complete());
        assert_eq!(ppu.frame_count(), 1);
    }

    #[test]
    fn data_reads_are_buffered_below_palette() {
        let mut ppu = ppu();
        ppu.set_data_address(0x21);
        ppu.set_data_address(0x00);
        ppu.set_data(0xAA);
        ppu.set_data(0xBB);

        ppu.set_data_address(0x21);
        ppu.set_data_address(0x00);
        assert_eq!(ppu.data(), 0x00, "stale buffer");
        assert_eq!(ppu.data(), 0xAA);
        assert_eq!(ppu.data(), 0xBB);
    }

    #[test]
    fn palette_reads_are_immediate() {
        let mut ppu = ppu();
        ppu.set_data_address(0x3F);
        ppu.set_data_address(0x01);
        ppu.set_data(0x2C);
        ppu.set_data_address(0x3F);
        ppu.set_data_address(0x01);
        assert_eq!(ppu.data(), 0x2C);
    }

    #[test]
    fn data_increment_follows_control() {
        let mut ppu = ppu();
        ppu.control(0x04);
        ppu.set_data_address(0x20);
        ppu.set_data_address(0x00);
        ppu.set_data(0x01);
        ppu.set_data(0x02);
        assert_eq!(ppu.picture_bus().read(0x2000), 0x01);
        assert_eq!(ppu.picture_bus().read(0x2020), 0x02);
    }

    #[test]
    fn dma_wraps_from_oam_address() {
        let mut ppu = ppu();
        ppu.set_oam_address(0xFE);
        let page: Vec<u8> = (0..=255).collect();
        ppu.do_dma(&page);
        assert_eq!(ppu.oam()[0xFE], 0);
        assert_eq!(ppu.oam()[0xFF], 1);
        assert_eq!(ppu.oam()[0x00], 2);
        assert_eq!(ppu.oam()[0xFD], 255);
    }

    #[test]
    fn oam_data_write_advances_address() {
        let mut ppu = ppu();
        ppu.set_oam_address(0x10);
        ppu.set_oam_data(0x55);
        ppu.set_oam_data(0x66);
        ppu.set_oam_address(0x11);
        assert_eq!(ppu.oam_data(), 0x66);
    }

    #[test]
    fn status_read_resets_write_toggle() {
        let mut ppu = ppu();
        ppu.set_data_address(0x23);
        ppu.status();
        ppu.set_data_address(0x24);
        ppu.set_data_address(0x00);
        assert_eq!(ppu.registers.vram.v.raw(), 0x2400);
    }

    #[test]
    fn sprite_overflow_on_ninth_sprite() {
        let mut ppu = ppu();
        for index in 0..9 {
            ppu.oam[index * 4] = 10;
        }
        for index in 9..64 {
            ppu.oam[index * 4] = 0xF0;
        }
        ppu.scanline = 12;
        ppu.evaluate_sprites();
        assert_eq!(ppu.scanline_sprites.len(), 8);
        assert!(ppu.registers.status.contains(Status::SPRITE_OVERFLOW));
    }

    #[test]
    fn renders_background_tile_and_sprite_zero_hit() {
        // Tile 1: solid color 1 (low plane all ones).
        let mut chr = vec![0u8; 0x2000];
        chr[16..24].fill(0xFF);
        let mut ppu = ppu_with_chr(chr);

        // Nametable 0 all tile 1, backdrop color 0x0F, bg color 1 = 0x21,
        // sprite palette 4 color 1 = 0x16.
        for offset in 0..0x3C0 {
            ppu.picture_bus_mut().write(0x2000 + offset, 1);
        }
        ppu.picture_bus_mut().write(0x3F00, 0x0F);
        ppu.picture_bus_mut().write(0x3F01, 0x21);
        ppu.picture_bus_mut().write(0x3F11, 0x16);

        // Sprite 0 at (20, 30) using tile 1, in front.
        ppu.oam[0..4].copy_from_slice(&[30, 1, 0x00, 20]);
        for index in 1..64 {
            ppu.oam[index * 4] = 0xF0;
        }
        ppu.set_mask(0x1E);

        run_to(&mut ppu, VBLANK_SCANLINE, 0);
        let frame = ppu.frame_buffer();
        assert_eq!(frame.get(0, 0), palette::color(0x21));
        assert_eq!(frame.get(20, 31), palette::color(0x16));
        assert_eq!(frame.get(27, 38), palette::color(0x16));
        assert_eq!(frame.get(28, 31), palette::color(0x21));
        assert_eq!(frame.get(20, 30), palette::color(0x21), "sprite drawn one line lower");
        assert!(ppu.registers.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn disabled_rendering_shows_backdrop() {
        let mut ppu = ppu();
        ppu.picture_bus_mut().write(0x3F00, 0x30);
        run_to(&mut ppu, VBLANK_SCANLINE, 0);
        assert_eq!(ppu.frame_buffer().get(100, 100), Color::from_rgb(0xFFFEFF));
    }

    #[test]
    fn sink_receives_every_pixel_and_frame_end() {
        #[derive(Default)]
        struct Counting {
            pixels: Rc<RefCell<(usize, usize)>>,
        }
        impl VideoSink for Counting {
            fn set_pixel(&mut self, _x: usize, _y: usize, _color: Color) {
                self.pixels.borrow_mut().0 += 1;
            }
            fn end_frame(&mut self) {
                self.pixels.borrow_mut().1 += 1;
            }
        }

        let mut ppu = ppu();
        let sink = Counting::default();
        let counts = sink.pixels.clone();
        ppu.set_video_sink(Box::new(sink));
        run_to(&mut ppu, VBLANK_SCANLINE, 0);
        assert_eq!(*counts.borrow(), (SCREEN_WIDTH * SCREEN_HEIGHT, 1));
    }
}

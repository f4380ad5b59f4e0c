use std::fmt;

use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, palette::Color};

/// Receives the finished picture once per frame, at the end of the
/// post-render scanline.
pub trait VideoSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);

    fn end_frame(&mut self) {}
}

/// Sink that drops every pixel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VideoSink for NullSink {
    fn set_pixel(&mut self, _x: usize, _y: usize, _color: Color) {}
}

/// A 256x240 grid of RGB pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[Color]>,
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Color::BLACK; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * SCREEN_WIDTH + x] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Packed RGB888 bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| [color.r, color.g, color.b])
            .collect()
    }

    /// Streams every pixel into `sink`, then signals the end of the frame.
    pub fn present(&self, sink: &mut dyn VideoSink) {
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                sink.set_pixel(x, y, self.get(x, y));
            }
        }
        sink.end_frame();
    }
}

impl VideoSink for FrameBuffer {
    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.set(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_copies_into_another_buffer() {
        let mut source = FrameBuffer::new();
        source.set(3, 7, Color::from_rgb(0x123456));
        source.set(255, 239, Color::from_rgb(0xABCDEF));
        let mut copy = FrameBuffer::new();
        source.present(&mut copy);
        assert_eq!(copy, source);
    }

    #[test]
    fn rgb8_is_row_major() {
        let mut frame = FrameBuffer::new();
        frame.set(1, 0, Color::from_rgb(0x010203));
        let bytes = frame.to_rgb8();
        assert_eq!(bytes.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);
        assert_eq!(&bytes[3..6], &[1, 2, 3]);
    }
}

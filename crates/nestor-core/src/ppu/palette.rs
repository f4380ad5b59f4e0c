/// 24-bit RGB output color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0x000000);

    /// Unpacks a `0xRRGGBB` value.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

/// Resolves a palette RAM entry (6-bit system color) to RGB.
#[inline]
pub fn color(entry: u8) -> Color {
    NTSC_PALETTE[(entry & 0x3F) as usize]
}

const fn build(raw: [u32; 64]) -> [Color; 64] {
    let mut colors = [Color::BLACK; 64];
    let mut i = 0;
    while i < 64 {
        colors[i] = Color::from_rgb(raw[i]);
        i += 1;
    }
    colors
}

/// The 64 system colors of the NTSC 2C02.
pub const NTSC_PALETTE: [Color; 64] = build([
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00, //
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000, //
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00, //
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000, //
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22, //
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000, //
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5, //
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000, //
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_channels_and_masks_entry() {
        assert_eq!(color(0x01), Color { r: 0x00, g: 0x2A, b: 0x88 });
        assert_eq!(color(0x41), color(0x01));
        assert_eq!(color(0x30), Color { r: 0xFF, g: 0xFE, b: 0xFF });
    }
}

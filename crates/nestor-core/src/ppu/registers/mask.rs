use bitflags::bitflags;

bitflags! {
    /// PPU mask register (`$2001`).
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// B G R S B s b g
    /// ```
    /// Grayscale and color emphasis are stored but not applied to the output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0b0000_0001;

        /// Show background in the leftmost eight pixels.
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;

        /// Show sprites in the leftmost eight pixels.
        const SHOW_SPRITES_LEFT = 0b0000_0100;

        const SHOW_BACKGROUND = 0b0000_1000;

        const SHOW_SPRITES = 0b0001_0000;

        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// Background rendering drives the `v` increments.
    pub fn background_enabled(self) -> bool {
        self.contains(Mask::SHOW_BACKGROUND)
    }

    /// Both layers on: gates the `t` to `v` copies and the short odd-frame
    /// pre-render line.
    pub fn background_and_sprites(self) -> bool {
        self.contains(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    /// Whether the background is drawn at column `x`.
    pub fn background_visible_at(self, x: usize) -> bool {
        self.contains(Mask::SHOW_BACKGROUND) && (x >= 8 || self.contains(Mask::SHOW_BACKGROUND_LEFT))
    }

    /// Whether sprites are drawn at column `x`.
    pub fn sprites_visible_at(self, x: usize) -> bool {
        self.contains(Mask::SHOW_SPRITES) && (x >= 8 || self.contains(Mask::SHOW_SPRITES_LEFT))
    }
}

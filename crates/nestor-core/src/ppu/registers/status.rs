use bitflags::bitflags;

bitflags! {
    /// PPU status register (`$2002`).
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V S O . . . . .
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// More than eight sprites were found on one scanline.
        const SPRITE_OVERFLOW = 0b0010_0000;

        /// An opaque pixel of sprite 0 overlapped an opaque background pixel.
        const SPRITE_ZERO_HIT = 0b0100_0000;

        /// Vertical blank has started. Reading `$2002` clears this bit.
        const VERTICAL_BLANK = 0b1000_0000;
    }
}

use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    /// Bit layout:
    /// 7 6 5 4 3 2 1 0
    /// N V _ B D I Z C
    ///
    /// The flags are independent bits; they are only combined into one byte
    /// when pushed to the stack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// Carry out of bit 7, or "no borrow" after a subtraction.
        const CARRY     = 0b0000_0001;

        /// Result was zero.
        const ZERO      = 0b0000_0010;

        /// Masks IRQ (not NMI or BRK).
        const INTERRUPT = 0b0000_0100;

        /// Decimal mode. Stored but ignored by the NES ALU.
        const DECIMAL   = 0b0000_1000;

        /// Only exists in the byte pushed by PHP/BRK.
        const BREAK     = 0b0001_0000;

        /// Always 1 when materialized.
        const UNUSED    = 0b0010_0000;

        /// Signed overflow.
        const OVERFLOW  = 0b0100_0000;

        /// Bit 7 of the result.
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Power-on / reset state: interrupts masked, unused bit set.
    pub fn new() -> Self {
        Status::INTERRUPT | Status::UNUSED
    }

    /// Set Zero and Negative from a result byte.
    pub fn update_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Byte pushed to the stack; `brk` selects the Break bit.
    pub fn to_stack_byte(self, brk: bool) -> u8 {
        let mut pushed = self | Status::UNUSED;
        pushed.set(Status::BREAK, brk);
        pushed.bits()
    }

    /// Flags restored by PLP/RTI. Break is not a real register bit.
    pub fn from_stack_byte(byte: u8) -> Self {
        (Status::from_bits_truncate(byte) - Status::BREAK) | Status::UNUSED
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the addressing modes the decoder produces.
///
/// Addressing modes define how the CPU interprets the operand bytes of an
/// instruction to find the effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// No addressing resolved by the decoder. The instruction either has no
    /// operand or fetches its own (JSR, JMP, JMP indirect).
    ///
    /// # Examples
    /// - `CLC`, `PHA`, `RTS`
    Implied,

    /// Signed 8-bit displacement used by conditional branches.
    Relative,

    /// The operation is performed on the accumulator register.
    ///
    /// # Examples
    /// - `ASL A`
    /// - `ROR A`
    Accumulator,

    /// The byte following the opcode is the operand value itself.
    ///
    /// # Examples
    /// - `LDA #$42`
    Immediate,

    /// An 8-bit address in page zero.
    ZeroPage,

    /// Zero-page address plus X, wrapping inside page zero.
    ZeroPageX,

    /// Zero-page address plus Y, wrapping inside page zero (`LDX`/`STX` only).
    ZeroPageY,

    /// Uses the full 16-bit address specified by the two bytes following the opcode.
    Absolute,

    /// Absolute address indexed by the X register.
    ///
    /// Reads pay an extra cycle when a page boundary is crossed.
    AbsoluteX,

    /// Absolute address indexed by the Y register.
    ///
    /// Reads pay an extra cycle when a page boundary is crossed.
    AbsoluteY,

    /// `($nn,X)`: the pointer is fetched from page zero at `nn + X`.
    IndexedIndirect,

    /// `($nn),Y`: the pointer is fetched from page zero at `nn`, then Y is added.
    IndirectIndexed,
}

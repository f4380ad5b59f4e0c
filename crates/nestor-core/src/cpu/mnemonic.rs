use std::fmt::Display;

/// Documented 6502 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    //Load/Store
    LDA,
    LDX,
    LDY,
    STA,
    STX,
    STY,
    //Transfer
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
    //Stack
    PHA,
    PHP,
    PLA,
    PLP,
    //Shift
    ASL,
    LSR,
    ROL,
    ROR,
    //Logic
    AND,
    BIT,
    EOR,
    ORA,
    //Arithmetic
    ADC,
    CMP,
    CPX,
    CPY,
    SBC,
    //Arithmetic: Inc/Dec
    DEC,
    DEX,
    DEY,
    INC,
    INX,
    INY,
    //Control Flow
    BRK,
    JMP,
    /// `JMP ($nnnn)`, with the page-wrap bug.
    JMPI,
    JSR,
    RTI,
    RTS,
    //Branch
    BCC,
    BCS,
    BEQ,
    BMI,
    BNE,
    BPL,
    BVC,
    BVS,
    //Flags
    CLC,
    CLD,
    CLI,
    CLV,
    SEC,
    SED,
    SEI,
    //Nop
    NOP,
}

impl Mnemonic {
    /// Operations that only read their memory operand. Only these pay the
    /// page-cross penalty on indexed addressing.
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Mnemonic::LDA
                | Mnemonic::LDX
                | Mnemonic::LDY
                | Mnemonic::AND
                | Mnemonic::BIT
                | Mnemonic::EOR
                | Mnemonic::ORA
                | Mnemonic::ADC
                | Mnemonic::CMP
                | Mnemonic::CPX
                | Mnemonic::CPY
                | Mnemonic::SBC
        )
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mnemonic::JMPI => f.write_str("JMP"),
            other => write!(f, "{other:?}"),
        }
    }
}

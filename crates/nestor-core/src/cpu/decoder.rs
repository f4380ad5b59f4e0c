//! Opcode decoding.
//!
//! The 6502 packs most of its instruction set into bit fields:
//!
//! ```text
//! 7 6 5 4 3 2 1 0
//! o o o m m m i i
//! ```
//! - `ii`: instruction group (`01` ALU ops, `10` shifts and X-register ops,
//!   `00` compares and Y-register ops)
//! - `mmm`: addressing mode within the group
//! - `ooo`: operation within the group
//!
//! Single-byte implied instructions and branches do not follow this scheme
//! and are matched first.

use crate::cpu::{addressing::Addressing, mnemonic::Mnemonic};

pub const INSTRUCTION_MODE_MASK: u8 = 0x03;

pub const OPERATION_MASK: u8 = 0xE0;
pub const OPERATION_SHIFT: u8 = 5;

pub const ADDR_MODE_MASK: u8 = 0x1C;
pub const ADDR_MODE_SHIFT: u8 = 2;

pub const BRANCH_INSTRUCTION_MASK: u8 = 0x1F;
pub const BRANCH_INSTRUCTION_MASK_RESULT: u8 = 0x10;
/// Set: branch if the flag is set. Clear: branch if clear.
pub const BRANCH_CONDITION_MASK: u8 = 0x20;
/// Bits 6-7 select the tested flag: Negative, Overflow, Carry, Zero.
pub const BRANCH_ON_FLAG_SHIFT: u8 = 6;

/// Base cycle cost of every opcode; 0 marks an illegal opcode.
#[rustfmt::skip]
pub const OPERATION_CYCLES: [u8; 256] = [
    7, 6, 0, 0, 0, 3, 5, 0, 3, 2, 2, 0, 0, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
    6, 6, 0, 0, 3, 3, 5, 0, 4, 2, 2, 0, 4, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
    6, 6, 0, 0, 0, 3, 5, 0, 3, 2, 2, 0, 3, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
    6, 6, 0, 0, 0, 3, 5, 0, 4, 2, 2, 0, 5, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
    0, 6, 0, 0, 3, 3, 3, 0, 2, 0, 2, 0, 4, 4, 4, 0,
    2, 6, 0, 0, 4, 4, 4, 0, 2, 5, 2, 0, 0, 5, 0, 0,
    2, 6, 2, 0, 3, 3, 3, 0, 2, 2, 2, 0, 4, 4, 4, 0,
    2, 5, 0, 0, 4, 4, 4, 0, 2, 4, 2, 0, 4, 4, 4, 0,
    2, 6, 0, 0, 3, 3, 5, 0, 2, 2, 2, 0, 4, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
    2, 6, 0, 0, 3, 3, 5, 0, 2, 2, 2, 0, 4, 4, 6, 0,
    2, 5, 0, 0, 0, 4, 6, 0, 2, 4, 0, 0, 0, 4, 7, 0,
];

/// Group `01`: ALU operations with a memory operand.
const GROUP1_OPERATIONS: [Mnemonic; 8] = [
    Mnemonic::ORA,
    Mnemonic::AND,
    Mnemonic::EOR,
    Mnemonic::ADC,
    Mnemonic::STA,
    Mnemonic::LDA,
    Mnemonic::CMP,
    Mnemonic::SBC,
];

const GROUP1_ADDRESSING: [Addressing; 8] = [
    Addressing::IndexedIndirect,
    Addressing::ZeroPage,
    Addressing::Immediate,
    Addressing::Absolute,
    Addressing::IndirectIndexed,
    Addressing::ZeroPageX,
    Addressing::AbsoluteY,
    Addressing::AbsoluteX,
];

/// Group `10`: shifts, INC/DEC and X-register loads/stores.
const GROUP2_OPERATIONS: [Mnemonic; 8] = [
    Mnemonic::ASL,
    Mnemonic::ROL,
    Mnemonic::LSR,
    Mnemonic::ROR,
    Mnemonic::STX,
    Mnemonic::LDX,
    Mnemonic::DEC,
    Mnemonic::INC,
];

/// Group `00`: BIT, compares and Y-register loads/stores.
const GROUP0_OPERATIONS: [Option<Mnemonic>; 8] = [
    None,
    Some(Mnemonic::BIT),
    None,
    None,
    Some(Mnemonic::STY),
    Some(Mnemonic::LDY),
    Some(Mnemonic::CPY),
    Some(Mnemonic::CPX),
];

/// Branches indexed by `(flag << 1) | condition`.
const BRANCHES: [Mnemonic; 8] = [
    Mnemonic::BPL,
    Mnemonic::BMI,
    Mnemonic::BVC,
    Mnemonic::BVS,
    Mnemonic::BCC,
    Mnemonic::BCS,
    Mnemonic::BNE,
    Mnemonic::BEQ,
];

/// One decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub addressing: Addressing,
    /// Base cost before page-cross or branch penalties.
    pub cycles: u8,
}

/// Maps an opcode to its instruction, or `None` for an illegal opcode.
pub fn decode(opcode: u8) -> Option<Instruction> {
    let cycles = OPERATION_CYCLES[opcode as usize];
    if cycles == 0 {
        return None;
    }

    let (mnemonic, addressing) = if let Some(mnemonic) = decode_implied(opcode) {
        (mnemonic, Addressing::Implied)
    } else if opcode & BRANCH_INSTRUCTION_MASK == BRANCH_INSTRUCTION_MASK_RESULT {
        (decode_branch(opcode), Addressing::Relative)
    } else {
        let operation = ((opcode & OPERATION_MASK) >> OPERATION_SHIFT) as usize;
        let mode = (opcode & ADDR_MODE_MASK) >> ADDR_MODE_SHIFT;
        match opcode & INSTRUCTION_MODE_MASK {
            1 => (
                GROUP1_OPERATIONS[operation],
                GROUP1_ADDRESSING[mode as usize],
            ),
            2 => {
                let mnemonic = GROUP2_OPERATIONS[operation];
                (mnemonic, group02_addressing(mnemonic, mode)?)
            }
            0 => {
                let mnemonic = GROUP0_OPERATIONS[operation]?;
                (mnemonic, group02_addressing(mnemonic, mode)?)
            }
            _ => return None,
        }
    };

    Some(Instruction {
        opcode,
        mnemonic,
        addressing,
        cycles,
    })
}

fn decode_implied(opcode: u8) -> Option<Mnemonic> {
    let mnemonic = match opcode {
        0xEA => Mnemonic::NOP,
        0x00 => Mnemonic::BRK,
        0x20 => Mnemonic::JSR,
        0x40 => Mnemonic::RTI,
        0x60 => Mnemonic::RTS,
        0x4C => Mnemonic::JMP,
        0x6C => Mnemonic::JMPI,
        0x08 => Mnemonic::PHP,
        0x28 => Mnemonic::PLP,
        0x48 => Mnemonic::PHA,
        0x68 => Mnemonic::PLA,
        0x88 => Mnemonic::DEY,
        0xCA => Mnemonic::DEX,
        0xA8 => Mnemonic::TAY,
        0xC8 => Mnemonic::INY,
        0xE8 => Mnemonic::INX,
        0x18 => Mnemonic::CLC,
        0x38 => Mnemonic::SEC,
        0x58 => Mnemonic::CLI,
        0x78 => Mnemonic::SEI,
        0x98 => Mnemonic::TYA,
        0xB8 => Mnemonic::CLV,
        0xD8 => Mnemonic::CLD,
        0xF8 => Mnemonic::SED,
        0x8A => Mnemonic::TXA,
        0x9A => Mnemonic::TXS,
        0xAA => Mnemonic::TAX,
        0xBA => Mnemonic::TSX,
        _ => return None,
    };
    Some(mnemonic)
}

fn decode_branch(opcode: u8) -> Mnemonic {
    let flag = (opcode >> BRANCH_ON_FLAG_SHIFT) as usize;
    let condition = usize::from(opcode & BRANCH_CONDITION_MASK != 0);
    BRANCHES[(flag << 1) | condition]
}

/// Addressing table shared by groups `10` and `00`. The indexed forms use Y
/// for LDX/STX and X for everything else.
fn group02_addressing(mnemonic: Mnemonic, mode: u8) -> Option<Addressing> {
    let uses_y = matches!(mnemonic, Mnemonic::LDX | Mnemonic::STX);
    let addressing = match mode {
        0 => Addressing::Immediate,
        1 => Addressing::ZeroPage,
        2 => Addressing::Accumulator,
        3 => Addressing::Absolute,
        5 if uses_y => Addressing::ZeroPageY,
        5 => Addressing::ZeroPageX,
        7 if uses_y => Addressing::AbsoluteY,
        7 => Addressing::AbsoluteX,
        _ => return None,
    };
    Some(addressing)
}

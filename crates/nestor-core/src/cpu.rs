use std::fmt::Display;

use crate::{
    bus::{Bus, STACK_ADDR},
    cpu::{decoder::Instruction, status::Status},
    error::Error,
    memory::cpu as cpu_mem,
};

pub mod addressing;
pub mod decoder;
pub mod mnemonic;
pub mod status;

mod execute;

/// Cycles charged for entering an interrupt handler.
const INTERRUPT_CYCLES: u32 = 7;
/// Cycles the CPU is stalled by an OAM DMA transfer (one more on odd cycles).
const DMA_CYCLES: u32 = 513;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptKind {
    /// Maskable interrupt request.
    Irq,
    /// Non-maskable interrupt, raised by the PPU at vertical blank.
    Nmi,
    /// Software interrupt from the BRK instruction.
    Brk,
}

/// Register file captured for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
    pub cycles: u64,
}

/// 6502 core stepped one CPU cycle at a time.
///
/// A whole instruction executes on the first cycle it is fetched; its cost is
/// then burnt down by subsequent [`Cpu::step`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpu {
    // Registers
    a: u8,     //Accumulator
    x: u8,     //X Index Register
    y: u8,     //Y Index Register
    s: u8,     //Stack Pointer
    p: Status, //Processor Status
    pc: u16,   //Program Counter

    /// Cycles left before the next fetch.
    skip_cycles: u32,
    /// Total cycles stepped since reset.
    cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Create a new CPU instance with power-on register values.
    /// Does not fetch the reset vector; call [`Cpu::reset`] for that.
    pub fn new() -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            s: 0xFD,
            p: Status::new(),
            pc: 0x0000,
            skip_cycles: 0,
            cycles: 0,
        }
    }

    /// Reset and load PC from the reset vector (`$FFFC`).
    pub fn reset(&mut self, bus: &mut impl Bus) {
        let start = bus.read_word(cpu_mem::RESET_VECTOR);
        self.reset_to(start);
    }

    /// Reset and start executing at `start`.
    pub fn reset_to(&mut self, start: u16) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.p = Status::new();
        self.s = 0xFD;
        self.pc = start;
        self.skip_cycles = 0;
        self.cycles = 0;
        tracing::debug!("CPU reset, PC = {start:#06X}");
    }

    /// Services an interrupt. IRQ is ignored while interrupts are disabled.
    pub fn interrupt(&mut self, bus: &mut impl Bus, kind: InterruptKind) {
        if kind == InterruptKind::Irq && self.p.contains(Status::INTERRUPT) {
            return;
        }
        if kind == InterruptKind::Brk {
            self.incr_pc();
        }
        self.enter_interrupt(bus, kind);
        self.skip_cycles += INTERRUPT_CYCLES;
    }

    /// Pushes PC and flags, then jumps through the vector for `kind`.
    fn enter_interrupt(&mut self, bus: &mut impl Bus, kind: InterruptKind) {
        self.push_word(bus, self.pc);
        let flags = self.p.to_stack_byte(kind == InterruptKind::Brk);
        self.push(bus, flags);
        self.p.insert(Status::INTERRUPT);

        let vector = match kind {
            InterruptKind::Irq | InterruptKind::Brk => cpu_mem::IRQ_VECTOR,
            InterruptKind::Nmi => cpu_mem::NMI_VECTOR,
        };
        self.pc = bus.read_word(vector);
        tracing::trace!(?kind, pc = format_args!("{:#06X}", self.pc), "interrupt");
    }

    /// Advances one CPU cycle, fetching and executing a new instruction when
    /// the previous one has used up its cycles.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<(), Error> {
        self.cycles += 1;

        if self.skip_cycles > 1 {
            self.skip_cycles -= 1;
            return Ok(());
        }
        self.skip_cycles = 0;

        let pc = self.pc;
        let opcode = bus.read(pc);
        self.incr_pc();

        let instruction = decoder::decode(opcode).ok_or(Error::IllegalOpcode { opcode, pc })?;
        tracing::trace!(
            "{pc:04X}  {opcode:02X}  {:<4} {:?}  {self}",
            instruction.mnemonic,
            instruction.addressing
        );
        self.execute(bus, instruction);
        self.skip_cycles += instruction.cycles as u32;
        Ok(())
    }

    /// Stalls the CPU for an OAM DMA transfer.
    pub fn skip_dma_cycles(&mut self) {
        self.skip_cycles += DMA_CYCLES + (self.cycles & 1) as u32;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Cycles stepped since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycles the current instruction (or stall) still occupies.
    pub fn pending_cycles(&self) -> u32 {
        self.skip_cycles
    }

    pub fn status(&self) -> Status {
        self.p
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p.to_stack_byte(false),
            cycles: self.cycles,
        }
    }

    #[inline]
    pub(crate) fn incr_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    /// Reads the byte at PC and advances past it.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.incr_pc();
        value
    }

    /// Reads the little-endian word at PC and advances past it.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let value = bus.read_word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        value
    }

    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_ADDR | self.s as u16, value);
        self.s = self.s.wrapping_sub(1);
    }

    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(STACK_ADDR | self.s as u16)
    }

    /// Pushes high byte first so the word reads little-endian from the stack.
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    pub(crate) fn pull_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pull(bus) as u16;
        let hi = self.pull(bus) as u16;
        (hi << 8) | lo
    }

    fn execute(&mut self, bus: &mut impl Bus, instruction: Instruction) {
        use addressing::Addressing;

        match instruction.addressing {
            Addressing::Implied => self.execute_implied(bus, instruction.mnemonic),
            Addressing::Relative => self.execute_branch(bus, instruction.mnemonic),
            Addressing::Accumulator => self.execute_accumulator(instruction.mnemonic),
            addressing => {
                let (addr, crossed) = self.effective_address(bus, addressing);
                if crossed && instruction.mnemonic.is_read() {
                    self.skip_cycles += 1;
                }
                self.execute_memory(bus, instruction.mnemonic, addr);
            }
        }
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[a:0x{:02x},x:0x{:02x},y:0x{:02x},s:0x{:02x},p:0x{:02x},pc:0x{:04x}]",
            self.a,
            self.x,
            self.y,
            self.s,
            self.p.bits(),
            self.pc
        )
    }
}

use crate::{
    bus::Bus,
    cpu::{Cpu, InterruptKind, addressing::Addressing, mnemonic::Mnemonic, status::Status},
};

#[inline]
fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

impl Cpu {
    /// Resolves the operand address for a memory-addressed instruction and
    /// reports whether indexing crossed a page.
    pub(super) fn effective_address(
        &mut self,
        bus: &mut impl Bus,
        addressing: Addressing,
    ) -> (u16, bool) {
        match addressing {
            Addressing::Immediate => {
                let addr = self.pc;
                self.incr_pc();
                (addr, false)
            }
            Addressing::ZeroPage => (self.fetch(bus) as u16, false),
            Addressing::ZeroPageX => (self.fetch(bus).wrapping_add(self.x) as u16, false),
            Addressing::ZeroPageY => (self.fetch(bus).wrapping_add(self.y) as u16, false),
            Addressing::Absolute => (self.fetch_word(bus), false),
            Addressing::AbsoluteX => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(self.x as u16);
                (addr, page_crossed(base, addr))
            }
            Addressing::AbsoluteY => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(self.y as u16);
                (addr, page_crossed(base, addr))
            }
            Addressing::IndexedIndirect => {
                let zp = self.fetch(bus).wrapping_add(self.x);
                (self.read_zero_page_word(bus, zp), false)
            }
            Addressing::IndirectIndexed => {
                let zp = self.fetch(bus);
                let base = self.read_zero_page_word(bus, zp);
                let addr = base.wrapping_add(self.y as u16);
                (addr, page_crossed(base, addr))
            }
            Addressing::Implied | Addressing::Relative | Addressing::Accumulator => {
                unreachable!("{addressing:?} has no memory operand")
            }
        }
    }

    /// Pointer fetch that wraps inside page zero.
    fn read_zero_page_word(&mut self, bus: &mut impl Bus, zp: u8) -> u16 {
        let lo = bus.read(zp as u16) as u16;
        let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    pub(super) fn execute_implied(&mut self, bus: &mut impl Bus, mnemonic: Mnemonic) {
        match mnemonic {
            Mnemonic::NOP => {}
            Mnemonic::BRK => {
                self.incr_pc();
                self.enter_interrupt(bus, InterruptKind::Brk);
            }
            Mnemonic::JSR => {
                // Return address is the last byte of the JSR operand.
                self.push_word(bus, self.pc.wrapping_add(1));
                self.pc = bus.read_word(self.pc);
            }
            Mnemonic::RTS => {
                self.pc = self.pull_word(bus).wrapping_add(1);
            }
            Mnemonic::RTI => {
                let flags = self.pull(bus);
                self.p = Status::from_stack_byte(flags);
                self.pc = self.pull_word(bus);
            }
            Mnemonic::JMP => {
                self.pc = bus.read_word(self.pc);
            }
            Mnemonic::JMPI => {
                let loc = bus.read_word(self.pc);
                // The high byte never leaves the pointer's page.
                let lo = bus.read(loc) as u16;
                let hi = bus.read((loc & 0xFF00) | (loc.wrapping_add(1) & 0x00FF)) as u16;
                self.pc = (hi << 8) | lo;
            }
            Mnemonic::PHP => {
                let flags = self.p.to_stack_byte(true);
                self.push(bus, flags);
            }
            Mnemonic::PLP => {
                let flags = self.pull(bus);
                self.p = Status::from_stack_byte(flags);
            }
            Mnemonic::PHA => self.push(bus, self.a),
            Mnemonic::PLA => {
                self.a = self.pull(bus);
                self.p.update_zn(self.a);
            }
            Mnemonic::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.p.update_zn(self.y);
            }
            Mnemonic::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.p.update_zn(self.x);
            }
            Mnemonic::INY => {
                self.y = self.y.wrapping_add(1);
                self.p.update_zn(self.y);
            }
            Mnemonic::INX => {
                self.x = self.x.wrapping_add(1);
                self.p.update_zn(self.x);
            }
            Mnemonic::TAY => {
                self.y = self.a;
                self.p.update_zn(self.y);
            }
            Mnemonic::TAX => {
                self.x = self.a;
                self.p.update_zn(self.x);
            }
            Mnemonic::TYA => {
                self.a = self.y;
                self.p.update_zn(self.a);
            }
            Mnemonic::TXA => {
                self.a = self.x;
                self.p.update_zn(self.a);
            }
            Mnemonic::TSX => {
                self.x = self.s;
                self.p.update_zn(self.x);
            }
            Mnemonic::TXS => self.s = self.x,
            Mnemonic::CLC => self.p.remove(Status::CARRY),
            Mnemonic::SEC => self.p.insert(Status::CARRY),
            Mnemonic::CLI => self.p.remove(Status::INTERRUPT),
            Mnemonic::SEI => self.p.insert(Status::INTERRUPT),
            Mnemonic::CLV => self.p.remove(Status::OVERFLOW),
            Mnemonic::CLD => self.p.remove(Status::DECIMAL),
            Mnemonic::SED => self.p.insert(Status::DECIMAL),
            other => unreachable!("{other} is not an implied operation"),
        }
    }

    /// Conditional branch. Taken branches cost one extra cycle, plus one more
    /// when the target lies in another page.
    pub(super) fn execute_branch(&mut self, bus: &mut impl Bus, mnemonic: Mnemonic) {
        let taken = match mnemonic {
            Mnemonic::BPL => !self.p.contains(Status::NEGATIVE),
            Mnemonic::BMI => self.p.contains(Status::NEGATIVE),
            Mnemonic::BVC => !self.p.contains(Status::OVERFLOW),
            Mnemonic::BVS => self.p.contains(Status::OVERFLOW),
            Mnemonic::BCC => !self.p.contains(Status::CARRY),
            Mnemonic::BCS => self.p.contains(Status::CARRY),
            Mnemonic::BNE => !self.p.contains(Status::ZERO),
            Mnemonic::BEQ => self.p.contains(Status::ZERO),
            other => unreachable!("{other} is not a branch"),
        };

        if !taken {
            self.incr_pc();
            return;
        }

        let offset = self.fetch(bus) as i8;
        let target = self.pc.wrapping_add_signed(offset as i16);
        self.skip_cycles += 1;
        if page_crossed(self.pc, target) {
            self.skip_cycles += 1;
        }
        self.pc = target;
    }

    pub(super) fn execute_accumulator(&mut self, mnemonic: Mnemonic) {
        self.a = self.shift(mnemonic, self.a);
    }

    pub(super) fn execute_memory(&mut self, bus: &mut impl Bus, mnemonic: Mnemonic, addr: u16) {
        match mnemonic {
            Mnemonic::LDA => {
                self.a = bus.read(addr);
                self.p.update_zn(self.a);
            }
            Mnemonic::LDX => {
                self.x = bus.read(addr);
                self.p.update_zn(self.x);
            }
            Mnemonic::LDY => {
                self.y = bus.read(addr);
                self.p.update_zn(self.y);
            }
            Mnemonic::STA => bus.write(addr, self.a),
            Mnemonic::STX => bus.write(addr, self.x),
            Mnemonic::STY => bus.write(addr, self.y),
            Mnemonic::ORA => {
                self.a |= bus.read(addr);
                self.p.update_zn(self.a);
            }
            Mnemonic::AND => {
                self.a &= bus.read(addr);
                self.p.update_zn(self.a);
            }
            Mnemonic::EOR => {
                self.a ^= bus.read(addr);
                self.p.update_zn(self.a);
            }
            Mnemonic::BIT => {
                let m = bus.read(addr);
                self.p.set(Status::ZERO, self.a & m == 0);
                self.p.set(Status::OVERFLOW, m & 0x40 != 0);
                self.p.set(Status::NEGATIVE, m & 0x80 != 0);
            }
            Mnemonic::ADC => {
                let m = bus.read(addr);
                self.adc(m);
            }
            Mnemonic::SBC => {
                let m = bus.read(addr);
                self.sbc(m);
            }
            Mnemonic::CMP => {
                let m = bus.read(addr);
                self.compare(self.a, m);
            }
            Mnemonic::CPX => {
                let m = bus.read(addr);
                self.compare(self.x, m);
            }
            Mnemonic::CPY => {
                let m = bus.read(addr);
                self.compare(self.y, m);
            }
            Mnemonic::INC => {
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.p.update_zn(value);
            }
            Mnemonic::DEC => {
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.p.update_zn(value);
            }
            Mnemonic::ASL | Mnemonic::LSR | Mnemonic::ROL | Mnemonic::ROR => {
                let value = bus.read(addr);
                let value = self.shift(mnemonic, value);
                bus.write(addr, value);
            }
            other => unreachable!("{other} has no memory operand"),
        }
    }

    /// NV-BDIZC
    /// ✓✓----✓✓
    ///
    /// A + M + C → A, C. Decimal mode is ignored.
    pub(crate) fn adc(&mut self, m: u8) {
        let carry = self.p.contains(Status::CARRY) as u16;
        let sum = self.a as u16 + m as u16 + carry;
        let result = sum as u8;
        self.p.set(Status::CARRY, sum & 0x100 != 0);
        self.p
            .set(Status::OVERFLOW, (self.a ^ result) & (m ^ result) & 0x80 != 0);
        self.a = result;
        self.p.update_zn(result);
    }

    /// NV-BDIZC
    /// ✓✓----✓✓
    ///
    /// A - M - !C → A. Same adder as ADC with the operand inverted.
    pub(crate) fn sbc(&mut self, m: u8) {
        self.adc(!m);
    }

    /// C is set when `register >= m`.
    fn compare(&mut self, register: u8, m: u8) {
        self.p.set(Status::CARRY, register >= m);
        self.p.update_zn(register.wrapping_sub(m));
    }

    /// ASL, LSR, ROL and ROR, shared by the accumulator and memory forms.
    fn shift(&mut self, mnemonic: Mnemonic, value: u8) -> u8 {
        let carry_in = self.p.contains(Status::CARRY) as u8;
        let (result, carry_out) = match mnemonic {
            Mnemonic::ASL => (value << 1, value & 0x80 != 0),
            Mnemonic::LSR => (value >> 1, value & 0x01 != 0),
            Mnemonic::ROL => ((value << 1) | carry_in, value & 0x80 != 0),
            Mnemonic::ROR => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            other => unreachable!("{other} is not a shift"),
        };
        self.p.set(Status::CARRY, carry_out);
        self.p.update_zn(result);
        result
    }
}

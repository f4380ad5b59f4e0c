//! CPU address space routing.
//!
//! | Range           | Target                                               |
//! |-----------------|------------------------------------------------------|
//! | `$0000-$1FFF`   | 2 KiB internal RAM, mirrored every `$0800`           |
//! | `$2000-$3FFF`   | PPU registers, mirrored every 8 bytes (callbacks)    |
//! | `$4000-$4017`   | APU / I/O registers (callbacks for DMA and joypads)  |
//! | `$4018-$4FFF`   | unused                                               |
//! | `$5000-$5FFF`   | expansion ROM (not supported)                        |
//! | `$6000-$7FFF`   | cartridge SRAM, when the board declares it           |
//! | `$8000-$FFFF`   | PRG ROM through the mapper                           |

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    bus::Bus,
    cartridge::Mapper,
    diagnostics::{Diagnostic, Diagnostics},
    memory::cpu as cpu_mem,
};

/// Handler for a register read.
pub type ReadCallback = Box<dyn FnMut() -> u8>;
/// Handler for a register write.
pub type WriteCallback = Box<dyn FnMut(u8)>;

/// Memory-mapped registers that accept callbacks.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoRegister {
    PpuCtrl = 0x2000,
    PpuMask = 0x2001,
    PpuStatus = 0x2002,
    OamAddr = 0x2003,
    OamData = 0x2004,
    PpuScroll = 0x2005,
    PpuAddr = 0x2006,
    PpuData = 0x2007,
    OamDma = 0x4014,
    Joy1 = 0x4016,
    Joy2 = 0x4017,
}

impl IoRegister {
    pub const fn addr(self) -> u16 {
        self as u16
    }

    /// Resolves a canonical register address (`$2000-$2007` or `$4000-$4017`).
    pub const fn from_addr(addr: u16) -> Option<Self> {
        Some(match addr {
            0x2000 => Self::PpuCtrl,
            0x2001 => Self::PpuMask,
            0x2002 => Self::PpuStatus,
            0x2003 => Self::OamAddr,
            0x2004 => Self::OamData,
            0x2005 => Self::PpuScroll,
            0x2006 => Self::PpuAddr,
            0x2007 => Self::PpuData,
            0x4014 => Self::OamDma,
            0x4016 => Self::Joy1,
            0x4017 => Self::Joy2,
            _ => return None,
        })
    }
}

pub struct SystemBus {
    ram: [u8; cpu_mem::INTERNAL_RAM_SIZE],
    ext_ram: Vec<u8>,
    mapper: Option<Rc<RefCell<Mapper>>>,
    read_callbacks: HashMap<IoRegister, ReadCallback>,
    write_callbacks: HashMap<IoRegister, WriteCallback>,
    diagnostics: Rc<Diagnostics>,
}

impl fmt::Debug for SystemBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemBus")
            .field("ext_ram_len", &self.ext_ram.len())
            .field("mapper", &self.mapper.as_ref().map(|m| m.borrow().id()))
            .field("read_callbacks", &self.read_callbacks.keys())
            .field("write_callbacks", &self.write_callbacks.keys())
            .finish_non_exhaustive()
    }
}

impl SystemBus {
    pub fn new(diagnostics: Rc<Diagnostics>) -> Self {
        Self {
            ram: [0; cpu_mem::INTERNAL_RAM_SIZE],
            ext_ram: Vec::new(),
            mapper: None,
            read_callbacks: HashMap::new(),
            write_callbacks: HashMap::new(),
            diagnostics,
        }
    }

    /// Attaches the cartridge board. Returns `false` when no mapper is given.
    pub fn set_mapper(&mut self, mapper: Option<Rc<RefCell<Mapper>>>) -> bool {
        let Some(mapper) = mapper else {
            tracing::error!("mapper pointer is null");
            return false;
        };
        if mapper.borrow().has_extended_ram() {
            self.ext_ram = vec![0; cpu_mem::PRG_RAM_SIZE];
        } else {
            self.ext_ram.clear();
        }
        self.mapper = Some(mapper);
        true
    }

    pub fn set_read_callback(&mut self, register: IoRegister, callback: ReadCallback) {
        self.read_callbacks.insert(register, callback);
    }

    pub fn set_write_callback(&mut self, register: IoRegister, callback: WriteCallback) {
        self.write_callbacks.insert(register, callback);
    }

    /// Clears internal RAM and SRAM; callbacks and mapper stay attached.
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.ext_ram.fill(0);
    }

    /// The 256 bytes backing CPU page `page`, for OAM DMA.
    ///
    /// Only internal RAM and SRAM pages are contiguous; any other page is
    /// reported and yields `None`.
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        let addr = (page as u16) << 8;
        match addr {
            ..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                let start = (addr & cpu_mem::INTERNAL_RAM_MASK) as usize;
                self.ram.get(start..start + cpu_mem::PAGE_SIZE)
            }
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END if !self.ext_ram.is_empty() => {
                let start = (addr - cpu_mem::PRG_RAM_START) as usize;
                self.ext_ram.get(start..start + cpu_mem::PAGE_SIZE)
            }
            _ => {
                self.diagnostics.report(Diagnostic::UnbackedDmaPage(page));
                None
            }
        }
    }

    fn read_register(&mut self, addr: u16) -> Option<u8> {
        let register = IoRegister::from_addr(addr)?;
        self.read_callbacks.get_mut(&register).map(|callback| callback())
    }

    fn write_register(&mut self, addr: u16, value: u8) -> bool {
        let callback = IoRegister::from_addr(addr)
            .and_then(|register| self.write_callbacks.get_mut(&register));
        match callback {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }
}

impl Bus for SystemBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            ..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let register = addr & cpu_mem::PPU_REGISTER_MIRROR_MASK;
                self.read_register(register).unwrap_or_else(|| {
                    self.diagnostics
                        .report(Diagnostic::UnmappedPpuRegister(register));
                    0
                })
            }
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {
                self.read_register(addr).unwrap_or_else(|| {
                    self.diagnostics
                        .report(Diagnostic::UnmappedRegisterRead(addr));
                    0
                })
            }
            cpu_mem::UNUSED_START..=cpu_mem::UNUSED_END => 0,
            cpu_mem::EXPANSION_ROM_START..=cpu_mem::EXPANSION_ROM_END => {
                self.diagnostics.report(Diagnostic::ExpansionRomRead);
                0
            }
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                match self.ext_ram.get((addr - cpu_mem::PRG_RAM_START) as usize) {
                    Some(value) => *value,
                    None => {
                        self.diagnostics.report(Diagnostic::MissingExtendedRam);
                        0
                    }
                }
            }
            cpu_mem::PRG_ROM_START..=cpu_mem::CPU_ADDR_END => self
                .mapper
                .as_ref()
                .map_or(0, |mapper| mapper.borrow().read_prg(addr)),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            ..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize] = value;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let register = addr & cpu_mem::PPU_REGISTER_MIRROR_MASK;
                if !self.write_register(register, value) {
                    self.diagnostics
                        .report(Diagnostic::UnmappedPpuRegister(register));
                }
            }
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {
                if !self.write_register(addr, value) {
                    self.diagnostics
                        .report(Diagnostic::UnmappedRegisterWrite(addr));
                }
            }
            cpu_mem::UNUSED_START..=cpu_mem::UNUSED_END => {}
            cpu_mem::EXPANSION_ROM_START..=cpu_mem::EXPANSION_ROM_END => {
                self.diagnostics.report(Diagnostic::ExpansionRomWrite);
            }
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                match self.ext_ram.get_mut((addr - cpu_mem::PRG_RAM_START) as usize) {
                    Some(slot) => *slot = value,
                    None => {
                        self.diagnostics.report(Diagnostic::MissingExtendedRam);
                    }
                }
            }
            cpu_mem::PRG_ROM_START..=cpu_mem::CPU_ADDR_END => {
                if let Some(mapper) = self.mapper.as_ref() {
                    mapper.borrow_mut().write_prg(addr, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::cartridge::{Cartridge, header::Mirroring};

    fn bus_with_mapper(has_extended_ram: bool) -> (SystemBus, Rc<Diagnostics>) {
        let diagnostics = Rc::new(Diagnostics::new());
        let mut bus = SystemBus::new(Rc::clone(&diagnostics));
        let mut prg = vec![0u8; 0x8000];
        prg[0x0000] = 0x12;
        prg[0x7FFF] = 0x34;
        let cartridge = Cartridge::new(prg, Vec::new(), Mirroring::Horizontal, 0, has_extended_ram);
        let mapper = Mapper::new(cartridge).expect("nrom");
        assert!(bus.set_mapper(Some(Rc::new(RefCell::new(mapper)))));
        (bus, diagnostics)
    }

    #[test]
    fn ram_is_mirrored_every_2k() {
        let (mut bus, _) = bus_with_mapper(false);
        bus.write(0x0001, 0xAB);
        assert_eq!(bus.read(0x0801), 0xAB);
        assert_eq!(bus.read(0x1001), 0xAB);
        bus.write(0x1FFF, 0xCD);
        assert_eq!(bus.read(0x07FF), 0xCD);
    }

    #[test]
    fn prg_reads_go_through_mapper() {
        let (mut bus, _) = bus_with_mapper(false);
        assert_eq!(bus.read(0x8000), 0x12);
        assert_eq!(bus.read(0xFFFF), 0x34);
    }

    #[test]
    fn set_mapper_rejects_none() {
        let mut bus = SystemBus::new(Rc::new(Diagnostics::new()));
        assert!(!bus.set_mapper(None));
        assert_eq!(bus.read(0x8000), 0);
    }

    #[test]
    fn ppu_registers_are_mirrored_to_callbacks() {
        let (mut bus, _) = bus_with_mapper(false);
        let written = Rc::new(Cell::new(0u8));
        let sink = Rc::clone(&written);
        bus.set_write_callback(IoRegister::PpuAddr, Box::new(move |v| sink.set(v)));
        bus.set_read_callback(IoRegister::PpuStatus, Box::new(|| 0x80));

        bus.write(0x3FFE, 0x21);
        assert_eq!(written.get(), 0x21);
        assert_eq!(bus.read(0x200A), 0x80);
        assert_eq!(bus.read(0x3FFA), 0x80);
    }

    #[test]
    fn unregistered_registers_degrade_and_log_once() {
        let (mut bus, diagnostics) = bus_with_mapper(false);
        assert_eq!(bus.read(0x4015), 0);
        assert_eq!(bus.read(0x4015), 0);
        bus.write(0x4000, 0x3F);
        assert_eq!(bus.read(0x5000), 0);
        assert_eq!(bus.read(0x2002), 0);

        assert_eq!(diagnostics.count(Diagnostic::UnmappedRegisterRead(0x4015)), 2);
        assert_eq!(diagnostics.count(Diagnostic::UnmappedRegisterWrite(0x4000)), 1);
        assert_eq!(diagnostics.count(Diagnostic::ExpansionRomRead), 1);
        assert_eq!(diagnostics.count(Diagnostic::UnmappedPpuRegister(0x2002)), 1);
    }

    #[test]
    fn joypad_callbacks_use_exact_address() {
        let (mut bus, _) = bus_with_mapper(false);
        bus.set_read_callback(IoRegister::Joy1, Box::new(|| 0x41));
        bus.set_read_callback(IoRegister::Joy2, Box::new(|| 0x40));
        assert_eq!(bus.read(0x4016), 0x41);
        assert_eq!(bus.read(0x4017), 0x40);
    }

    #[test]
    fn extended_ram_only_when_declared() {
        let (mut with_sram, _) = bus_with_mapper(true);
        with_sram.write(0x6123, 0x77);
        assert_eq!(with_sram.read(0x6123), 0x77);

        let (mut without_sram, diagnostics) = bus_with_mapper(false);
        without_sram.write(0x6123, 0x77);
        assert_eq!(without_sram.read(0x6123), 0);
        assert_eq!(diagnostics.count(Diagnostic::MissingExtendedRam), 2);
    }

    #[test]
    fn dma_pages_only_for_ram_and_sram() {
        let (mut bus, diagnostics) = bus_with_mapper(true);
        bus.write(0x0200, 0x01);
        bus.write(0x02FF, 0xFF);
        let page = bus.page(0x0A).expect("mirrored RAM page");
        assert_eq!(page.len(), 0x100);
        assert_eq!(page[0], 0x01);
        assert_eq!(page[0xFF], 0xFF);

        bus.write(0x7F00, 0x5A);
        assert_eq!(bus.page(0x7F).expect("SRAM page")[0], 0x5A);

        assert!(bus.page(0x80).is_none());
        assert!(bus.page(0x20).is_none());
        assert_eq!(diagnostics.count(Diagnostic::UnbackedDmaPage(0x80)), 1);
    }
}

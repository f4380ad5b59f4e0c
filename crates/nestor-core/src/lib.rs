use std::{
    cell::{Cell, Ref, RefCell},
    path::Path,
    rc::{Rc, Weak},
};

use crate::{
    bus::{IoRegister, PictureBus, SystemBus},
    cartridge::{Cartridge, Mapper},
    controller::{Button, Buttons, Controller},
    cpu::{Cpu, InterruptKind},
    diagnostics::Diagnostics,
    error::Error,
    ppu::{
        Ppu,
        frame::{FrameBuffer, VideoSink},
    },
};

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod diagnostics;
pub mod error;
pub mod memory;
pub mod ppu;

pub use cpu::CpuSnapshot;

/// PPU dots per CPU cycle (NTSC).
pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

/// Where the CPU starts executing after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartAddress {
    /// The address stored at `$FFFC`.
    #[default]
    ResetVector,
    /// A fixed address, e.g. for automated CPU test images.
    Fixed(u16),
}

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NesConfig {
    pub start: StartAddress,
}

/// A console session: CPU, PPU, both buses, the cartridge board and two
/// joypads, clocked together at the 3:1 PPU/CPU ratio.
#[derive(Debug)]
pub struct Nes {
    cpu: Cpu,
    bus: SystemBus,
    ppu: Rc<RefCell<Ppu>>,
    mapper: Rc<RefCell<Mapper>>,
    controllers: [Rc<RefCell<Controller>>; 2],
    diagnostics: Rc<Diagnostics>,
    config: NesConfig,
    /// Page written to `$4014`, copied once the current CPU step returns.
    pending_dma: Rc<Cell<Option<u8>>>,
    /// Raised by the PPU at vertical blank.
    pending_nmi: Rc<Cell<bool>>,
    frame_ready: bool,
}

impl Nes {
    /// Builds a powered-on session around `cartridge`.
    pub fn new(cartridge: Cartridge, config: NesConfig) -> Result<Self, Error> {
        let diagnostics = Rc::new(Diagnostics::new());
        let mapper = Rc::new(RefCell::new(Mapper::new(cartridge)?));

        let mut picture_bus = PictureBus::new();
        picture_bus.set_mapper(Some(Rc::clone(&mapper)));
        let ppu = Rc::new(RefCell::new(Ppu::new(picture_bus)));

        let mut bus = SystemBus::new(Rc::clone(&diagnostics));
        bus.set_mapper(Some(Rc::clone(&mapper)));

        let mut nes = Self {
            cpu: Cpu::new(),
            bus,
            ppu,
            mapper,
            controllers: [
                Rc::new(RefCell::new(Controller::new())),
                Rc::new(RefCell::new(Controller::new())),
            ],
            diagnostics,
            config,
            pending_dma: Rc::new(Cell::new(None)),
            pending_nmi: Rc::new(Cell::new(false)),
            frame_ready: false,
        };
        nes.wire();
        nes.reset();
        tracing::info!(
            mapper = nes.mapper.borrow().id(),
            start = ?config.start,
            "console assembled"
        );
        Ok(nes)
    }

    /// Parses an iNES image and builds a session around it.
    pub fn from_rom_bytes(bytes: &[u8], config: NesConfig) -> Result<Self, Error> {
        Self::new(cartridge::load_cartridge(bytes)?, config)
    }

    pub fn from_rom_file<P: AsRef<Path>>(path: P, config: NesConfig) -> Result<Self, Error> {
        Self::new(cartridge::load_cartridge_from_file(path)?, config)
    }

    /// Installs every callback that connects the components.
    fn wire(&mut self) {
        self.wire_ppu_registers();

        let dma = Rc::clone(&self.pending_dma);
        self.bus
            .set_write_callback(IoRegister::OamDma, Box::new(move |page| dma.set(Some(page))));

        let pads = self.controllers.clone();
        self.bus.set_write_callback(
            IoRegister::Joy1,
            Box::new(move |value| {
                for pad in &pads {
                    pad.borrow_mut().write_strobe(value);
                }
            }),
        );
        for (register, pad) in [IoRegister::Joy1, IoRegister::Joy2]
            .into_iter()
            .zip(self.controllers.iter())
        {
            let pad = Rc::clone(pad);
            self.bus
                .set_read_callback(register, Box::new(move || pad.borrow_mut().read()));
        }

        let nmi = Rc::clone(&self.pending_nmi);
        self.ppu
            .borrow_mut()
            .set_interrupt_callback(Box::new(move || nmi.set(true)));

        let ppu: Weak<RefCell<Ppu>> = Rc::downgrade(&self.ppu);
        self.mapper
            .borrow_mut()
            .set_mirroring_callback(Box::new(move |mirroring| {
                if let Some(ppu) = ppu.upgrade() {
                    ppu.borrow_mut().picture_bus_mut().set_mirroring(mirroring);
                }
            }));
    }

    fn wire_ppu_registers(&mut self) {
        let ppu = &self.ppu;

        let reg = Rc::clone(ppu);
        self.bus
            .set_read_callback(IoRegister::PpuStatus, Box::new(move || reg.borrow_mut().status()));
        let reg = Rc::clone(ppu);
        self.bus
            .set_read_callback(IoRegister::OamData, Box::new(move || reg.borrow().oam_data()));
        let reg = Rc::clone(ppu);
        self.bus
            .set_read_callback(IoRegister::PpuData, Box::new(move || reg.borrow_mut().data()));

        let reg = Rc::clone(ppu);
        self.bus
            .set_write_callback(IoRegister::PpuCtrl, Box::new(move |v| reg.borrow_mut().control(v)));
        let reg = Rc::clone(ppu);
        self.bus
            .set_write_callback(IoRegister::PpuMask, Box::new(move |v| reg.borrow_mut().set_mask(v)));
        let reg = Rc::clone(ppu);
        self.bus.set_write_callback(
            IoRegister::OamAddr,
            Box::new(move |v| reg.borrow_mut().set_oam_address(v)),
        );
        let reg = Rc::clone(ppu);
        self.bus.set_write_callback(
            IoRegister::OamData,
            Box::new(move |v| reg.borrow_mut().set_oam_data(v)),
        );
        let reg = Rc::clone(ppu);
        self.bus.set_write_callback(
            IoRegister::PpuScroll,
            Box::new(move |v| reg.borrow_mut().set_scroll(v)),
        );
        let reg = Rc::clone(ppu);
        self.bus.set_write_callback(
            IoRegister::PpuAddr,
            Box::new(move |v| reg.borrow_mut().set_data_address(v)),
        );
        let reg = Rc::clone(ppu);
        self.bus
            .set_write_callback(IoRegister::PpuData, Box::new(move |v| reg.borrow_mut().set_data(v)));
    }

    /// Console reset: CPU and PPU return to their reset state. RAM keeps its
    /// contents.
    pub fn reset(&mut self) {
        self.ppu.borrow_mut().reset();
        match self.config.start {
            StartAddress::ResetVector => self.cpu.reset(&mut self.bus),
            StartAddress::Fixed(addr) => self.cpu.reset_to(addr),
        }
        self.pending_dma.set(None);
        self.pending_nmi.set(false);
        self.frame_ready = false;
    }

    /// Advances one CPU cycle: three PPU dots, then one CPU step.
    pub fn clock(&mut self) -> Result<(), Error> {
        for _ in 0..PPU_DOTS_PER_CPU_CYCLE {
            let frame_done = {
                let mut ppu = self.ppu.borrow_mut();
                ppu.step();
                ppu.take_frame_complete()
            };
            self.frame_ready |= frame_done;
            if self.pending_nmi.take() {
                self.cpu.interrupt(&mut self.bus, InterruptKind::Nmi);
            }
        }

        self.cpu.step(&mut self.bus)?;

        if let Some(page) = self.pending_dma.take() {
            self.cpu.skip_dma_cycles();
            if let Some(data) = self.bus.page(page) {
                self.ppu.borrow_mut().do_dma(data);
            }
        }
        Ok(())
    }

    /// Clocks until the PPU finishes the current frame.
    pub fn run_frame(&mut self) -> Result<(), Error> {
        while !std::mem::take(&mut self.frame_ready) {
            self.clock()?;
        }
        Ok(())
    }

    pub fn set_button(&mut self, pad: usize, button: Button, pressed: bool) {
        if let Some(controller) = self.controllers.get(pad) {
            controller.borrow_mut().set_button(button, pressed);
        }
    }

    pub fn set_buttons(&mut self, pad: usize, buttons: Buttons) {
        if let Some(controller) = self.controllers.get(pad) {
            controller.borrow_mut().set_buttons(buttons);
        }
    }

    /// The most recently completed frame (valid after [`Nes::run_frame`]).
    pub fn frame_buffer(&self) -> Ref<'_, FrameBuffer> {
        Ref::map(self.ppu.borrow(), Ppu::frame_buffer)
    }

    pub fn set_video_sink(&mut self, sink: Box<dyn VideoSink>) {
        self.ppu.borrow_mut().set_video_sink(sink);
    }

    pub fn frame_count(&self) -> u64 {
        self.ppu.borrow().frame_count()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_snapshot(&self) -> CpuSnapshot {
        self.cpu.snapshot()
    }

    /// CPU cycles since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    pub fn bus(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    pub fn mapper(&self) -> Ref<'_, Mapper> {
        self.mapper.borrow()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

//! Per-session accounting of hardware situations the emulator does not model.
//!
//! Each distinct [`Diagnostic`] is logged the first time it occurs and only
//! counted afterwards. A [`Diagnostics`] value belongs to one session, so two
//! consoles in the same process never suppress each other's warnings.

use std::{cell::RefCell, collections::HashMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Diagnostic {
    /// `$4000-$4017` read with no registered handler (APU registers).
    UnmappedRegisterRead(u16),
    /// `$4000-$4017` write with no registered handler (APU registers).
    UnmappedRegisterWrite(u16),
    /// PPU register access with no registered handler.
    UnmappedPpuRegister(u16),
    ExpansionRomRead,
    ExpansionRomWrite,
    /// SRAM access on a board without extended RAM.
    MissingExtendedRam,
    /// OAM DMA from a page that is not backed by contiguous RAM.
    UnbackedDmaPage(u8),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedRegisterRead(addr) => {
                write!(f, "read from unsupported I/O register {addr:#06X} (APU not emulated)")
            }
            Self::UnmappedRegisterWrite(addr) => {
                write!(f, "write to unsupported I/O register {addr:#06X} (APU not emulated)")
            }
            Self::UnmappedPpuRegister(addr) => {
                write!(f, "no handler installed for PPU register {addr:#06X}")
            }
            Self::ExpansionRomRead => write!(f, "expansion ROM read attempted, not supported"),
            Self::ExpansionRomWrite => write!(f, "expansion ROM write attempted, not supported"),
            Self::MissingExtendedRam => {
                write!(f, "SRAM access on a cartridge without extended RAM")
            }
            Self::UnbackedDmaPage(page) => {
                write!(f, "DMA page {page:#04X} is not backed by contiguous memory")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    counts: RefCell<HashMap<Diagnostic, u64>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence; returns `true` when this is the first one.
    pub fn report(&self, diagnostic: Diagnostic) -> bool {
        let mut counts = self.counts.borrow_mut();
        let count = counts.entry(diagnostic).or_insert(0);
        *count += 1;
        let first = *count == 1;
        if first {
            match diagnostic {
                Diagnostic::UnbackedDmaPage(_) => tracing::error!("{diagnostic}"),
                _ => tracing::warn!("{diagnostic}"),
            }
        }
        first
    }

    pub fn count(&self, diagnostic: Diagnostic) -> u64 {
        self.counts.borrow().get(&diagnostic).copied().unwrap_or(0)
    }

    /// All conditions seen so far, sorted for stable output.
    pub fn snapshot(&self) -> Vec<(Diagnostic, u64)> {
        let mut entries: Vec<_> = self
            .counts
            .borrow()
            .iter()
            .map(|(diagnostic, count)| (*diagnostic, *count))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests;

use crate::cpu::{Bus, Cpu};
use crate::error::{BusError, StepError};

/// Start of the writable work-RAM window.
pub const WRAM_START: u16 = 0xC000;
/// Last writable work-RAM address.
pub const WRAM_END: u16 = 0xDFFF;

const WRAM_SIZE: usize = (WRAM_END - WRAM_START) as usize + 1;

/// Address-space router for the instruction core.
///
/// The cartridge image occupies `[0, rom.len())` and is read-only; work
/// RAM is writable; everything else is unmapped in this core's scope and
/// fails loudly. Banking, VRAM, IO registers and interrupt state belong
/// to collaborators outside this crate.
pub struct SystemBus {
    rom: Vec<u8>,
    wram: [u8; WRAM_SIZE],
}

impl SystemBus {
    /// Wrap a cartridge image supplied by the ROM-loading collaborator.
    /// The buffer is expected to be sized exactly to the declared image.
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            rom,
            wram: [0; WRAM_SIZE],
        }
    }

    #[inline]
    fn wram_index(addr: u16) -> Option<usize> {
        (WRAM_START..=WRAM_END)
            .contains(&addr)
            .then(|| (addr - WRAM_START) as usize)
    }
}

impl Bus for SystemBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        if let Some(&byte) = self.rom.get(addr as usize) {
            return Ok(byte);
        }
        if let Some(index) = Self::wram_index(addr) {
            return Ok(self.wram[index]);
        }
        Err(BusError::Unmapped { addr })
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        if (addr as usize) < self.rom.len() {
            return Err(BusError::WriteViolation { addr });
        }
        if let Some(index) = Self::wram_index(addr) {
            self.wram[index] = value;
            return Ok(());
        }
        Err(BusError::Unmapped { addr })
    }
}

/// High-level machine: one CPU core executing against one system bus.
///
/// This is the interpreter loop and the only external entry point; the
/// run/halt decision lives here, not in the core.
pub struct Machine {
    pub cpu: Cpu,
    bus: SystemBus,
}

impl Machine {
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: SystemBus::new(rom),
        }
    }

    /// Step a single instruction. Returns whether execution advanced
    /// (false exactly when halted).
    pub fn step(&mut self) -> Result<bool, StepError> {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the CPU halts or a fatal condition stops the stream.
    pub fn run(&mut self) -> Result<(), StepError> {
        while self.step()? {}
        Ok(())
    }

    /// Run at most `limit` instructions; returns how many actually
    /// executed. Stops early on halt.
    pub fn run_steps(&mut self, limit: u64) -> Result<u64, StepError> {
        let mut executed = 0;
        while executed < limit && self.step()? {
            executed += 1;
        }
        Ok(executed)
    }

    pub fn bus(&mut self) -> &mut SystemBus {
        &mut self.bus
    }
}

mod exec;
pub mod instruction;
pub mod regs;

use crate::error::{BusError, StepError};
use instruction::{Instruction, Mode};
use regs::Registers;

/// Address at which execution starts after the boot ROM hands control to
/// cartridge code.
pub const ENTRY_POINT: u16 = 0x0100;

/// Abstraction over the memory bus the CPU fetches and transfers through.
///
/// Implementations route each address to backing storage and fail loudly
/// on read-only or unmapped targets; the CPU never papers over a bus
/// fault. The 16-bit helpers are little-endian composites of the byte
/// primitives and can be overridden by buses with cheaper wide access.
pub trait Bus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Read a 16-bit value: low byte at `addr`, high byte at `addr + 1`.
    fn read16(&mut self, addr: u16) -> Result<u16, BusError> {
        let lo = self.read(addr)?;
        let hi = self.read(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a 16-bit value. The high byte goes to `addr + 1` first, then
    /// the low byte to `addr`, mirroring real bus ordering; the pair is
    /// not atomic.
    fn write16(&mut self, addr: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr.wrapping_add(1), hi)?;
        self.write(addr, lo)
    }
}

/// Game Boy CPU core: fetch, decode against the opcode table, resolve the
/// operand per addressing mode, execute.
///
/// The transient fields below describe only the instruction currently in
/// flight and are recomputed on every step; no history is retained.
#[derive(Clone, Copy, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub halted: bool,
    pub ime: bool,
    cycles: u64,
    /// Address the current opcode was fetched from.
    instr_addr: u16,
    cur_opcode: u8,
    cur_instr: Option<&'static Instruction>,
    /// Operand value produced by addressing-mode resolution.
    fetched: u16,
    /// Resolved bus address when the destination is memory.
    mem_dest: u16,
    dest_is_mem: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            halted: false,
            ime: false,
            cycles: 0,
            instr_addr: 0,
            cur_opcode: 0,
            cur_instr: None,
            fetched: 0,
            mem_dest: 0,
            dest_is_mem: false,
        };
        cpu.init();
        cpu
    }

    /// Reset to the post-boot state: all registers zeroed, PC at the
    /// cartridge entry vector.
    pub fn init(&mut self) {
        self.regs = Registers::default();
        self.regs.pc = ENTRY_POINT;
        self.halted = false;
        self.ime = false;
        self.cycles = 0;
        self.instr_addr = 0;
        self.cur_opcode = 0;
        self.cur_instr = None;
        self.fetched = 0;
        self.mem_dest = 0;
        self.dest_is_mem = false;
    }

    /// Total cycles charged so far. Future peripherals synchronize against
    /// this counter rather than sharing CPU state.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Descriptor of the instruction currently (or most recently) in
    /// flight, for debugger-style introspection.
    #[inline]
    pub fn current_instruction(&self) -> Option<&'static Instruction> {
        self.cur_instr
    }

    #[inline]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> Result<u8, BusError> {
        let value = bus.read(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.cycles += 1;
        Ok(value)
    }

    #[inline]
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> Result<u16, BusError> {
        let lo = self.fetch8(bus)?;
        let hi = self.fetch8(bus)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Fetch phase: read the byte at PC, advance PC, decode it against the
    /// opcode table. An unassigned byte value is a hard stop, not a no-op;
    /// skipping it would desynchronize emulated state from the real
    /// machine.
    fn fetch_instruction<B: Bus>(
        &mut self,
        bus: &mut B,
    ) -> Result<&'static Instruction, StepError> {
        self.instr_addr = self.regs.pc;
        let opcode = self.fetch8(bus)?;
        self.cur_opcode = opcode;

        let instr = instruction::decode(opcode).ok_or(StepError::UnknownOpcode {
            opcode,
            addr: self.instr_addr,
        })?;
        self.cur_instr = Some(instr);
        Ok(instr)
    }

    /// Operand-resolution phase.
    ///
    /// Consumes any operand bytes the mode calls for, computes the memory
    /// destination for indirect writes (without touching memory yet; the
    /// transfer itself happens in execute), and applies the HL±
    /// side effect before execute runs.
    fn fetch_data<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &'static Instruction,
    ) -> Result<(), StepError> {
        self.fetched = 0;
        self.mem_dest = 0;
        self.dest_is_mem = false;

        match instr.mode {
            Mode::Imp => {}
            Mode::R => {
                let reg = self.operand_reg(instr, instr.reg1)?;
                self.fetched = self.regs.read(reg);
            }
            Mode::Rr => {
                let src = self.operand_reg(instr, instr.reg2)?;
                self.fetched = self.regs.read(src);
            }
            Mode::RD8 => {
                self.fetched = self.fetch8(bus)? as u16;
            }
            Mode::RD16 | Mode::D16 => {
                self.fetched = self.fetch16(bus)?;
            }
            Mode::MemR => {
                let ptr = self.operand_reg(instr, instr.reg1)?;
                let src = self.operand_reg(instr, instr.reg2)?;
                self.mem_dest = self.regs.read(ptr);
                self.dest_is_mem = true;
                self.fetched = self.regs.read(src);
            }
            Mode::HliR => {
                let src = self.operand_reg(instr, instr.reg2)?;
                let hl = self.regs.hl();
                self.mem_dest = hl;
                self.dest_is_mem = true;
                self.fetched = self.regs.read(src);
                self.regs.set_hl(hl.wrapping_add(1));
            }
            Mode::HldR => {
                let src = self.operand_reg(instr, instr.reg2)?;
                let hl = self.regs.hl();
                self.mem_dest = hl;
                self.dest_is_mem = true;
                self.fetched = self.regs.read(src);
                self.regs.set_hl(hl.wrapping_sub(1));
            }
            Mode::D8Rel | Mode::HlSpr => {
                self.fetched = self.fetch8(bus)? as u16;
            }
        }
        Ok(())
    }

    /// A descriptor that names a mode but lacks the register operand the
    /// mode requires is malformed; surface it as the unimplemented-path
    /// error rather than guessing.
    fn operand_reg(
        &self,
        instr: &'static Instruction,
        reg: Option<regs::Reg>,
    ) -> Result<regs::Reg, StepError> {
        reg.ok_or_else(|| self.unimplemented(instr))
    }

    fn unimplemented(&self, instr: &'static Instruction) -> StepError {
        StepError::Unimplemented {
            mnemonic: instr.mnemonic,
            kind: instr.kind,
            mode: instr.mode,
            addr: self.instr_addr,
        }
    }

    /// Execute a single instruction cycle.
    ///
    /// Returns `Ok(true)` when an instruction ran and `Ok(false)` when the
    /// CPU is halted; once halted, every subsequent step is a no-op.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<bool, StepError> {
        if self.halted {
            return Ok(false);
        }

        let instr = self.fetch_instruction(bus)?;
        self.fetch_data(bus, instr)?;

        log::trace!(
            "{addr:#06X}: {opcode:02X} {mnemonic}",
            addr = self.instr_addr,
            opcode = self.cur_opcode,
            mnemonic = instr.mnemonic,
        );

        self.execute(bus, instr)?;
        Ok(true)
    }
}

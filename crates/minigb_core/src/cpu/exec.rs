use super::instruction::{Cond, Instruction, Kind, Mode};
use super::regs::{Flag, FlagUpdate};
use super::{Bus, Cpu};
use crate::error::StepError;

impl Cpu {
    /// Execute phase: dispatch on instruction kind.
    ///
    /// Every kind the table can produce has an arm here; a kind without a
    /// handler fails fatally so that emulation divergence stays observable
    /// instead of turning into a silent no-op.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &'static Instruction,
    ) -> Result<(), StepError> {
        match instr.kind {
            Kind::Nop => Ok(()),
            Kind::Ld => self.exec_ld(bus, instr),
            Kind::Dec => self.exec_dec(instr),
            Kind::Xor => self.exec_xor(),
            Kind::Jp => self.exec_jp(instr),
            Kind::Jr => self.exec_jr(instr),
            Kind::Di => {
                self.ime = false;
                Ok(())
            }
            Kind::Halt => {
                self.halted = true;
                Ok(())
            }
            Kind::Invalid => Err(self.unimplemented(instr)),
        }
    }

    fn exec_ld<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &'static Instruction,
    ) -> Result<(), StepError> {
        if instr.mode == Mode::HlSpr {
            // The signed-offset stack load has no handler yet; refuse it
            // instead of computing a wrong HL.
            return Err(self.unimplemented(instr));
        }

        if self.dest_is_mem {
            let src = self.operand_reg(instr, instr.reg2)?;
            if src.is_wide() {
                bus.write16(self.mem_dest, self.fetched)?;
            } else {
                bus.write(self.mem_dest, self.fetched as u8)?;
            }
            return Ok(());
        }

        let dst = self.operand_reg(instr, instr.reg1)?;
        self.regs.write(dst, self.fetched);
        Ok(())
    }

    /// 8-bit decrement. Z from the result, N set, H on low-nibble borrow,
    /// C untouched.
    fn exec_dec(&mut self, instr: &'static Instruction) -> Result<(), StepError> {
        let reg = self.operand_reg(instr, instr.reg1)?;
        let value = self.fetched as u8;
        let result = value.wrapping_sub(1);
        self.regs.write(reg, result as u16);
        self.regs.set_flags(
            (result == 0).into(),
            FlagUpdate::Set,
            ((value & 0x0F) == 0).into(),
            FlagUpdate::Unchanged,
        );
        Ok(())
    }

    /// XOR into the accumulator. Z from the result; N, H, C cleared.
    fn exec_xor(&mut self) -> Result<(), StepError> {
        let result = self.regs.a ^ self.fetched as u8;
        self.regs.a = result;
        self.regs.set_flags(
            (result == 0).into(),
            FlagUpdate::Clear,
            FlagUpdate::Clear,
            FlagUpdate::Clear,
        );
        Ok(())
    }

    /// Absolute jump. On a false condition PC is already past the operand
    /// bytes and simply falls through.
    fn exec_jp(&mut self, instr: &'static Instruction) -> Result<(), StepError> {
        if self.cond_met(instr.cond) {
            self.regs.pc = self.fetched;
            self.cycles += 1;
        }
        Ok(())
    }

    /// Relative jump: signed displacement from the address following the
    /// operand byte.
    fn exec_jr(&mut self, instr: &'static Instruction) -> Result<(), StepError> {
        if self.cond_met(instr.cond) {
            let offset = self.fetched as u8 as i8 as i16 as u16;
            self.regs.pc = self.regs.pc.wrapping_add(offset);
            self.cycles += 1;
        }
        Ok(())
    }

    #[inline]
    fn cond_met(&self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::NotZero => !self.regs.flag(Flag::Z),
            Cond::Zero => self.regs.flag(Flag::Z),
            Cond::NotCarry => !self.regs.flag(Flag::C),
            Cond::Carry => self.regs.flag(Flag::C),
        }
    }
}

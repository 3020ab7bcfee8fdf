use lazy_static::lazy_static;

use super::regs::Reg;

/// Instruction family an opcode belongs to.
///
/// The table below assigns one of these to every populated opcode; execute
/// dispatches on it. `Invalid` marks the unpopulated slots and is never
/// handed out by `decode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Invalid,
    Nop,
    Ld,
    Dec,
    Xor,
    Jp,
    Jr,
    Di,
    Halt,
}

/// Addressing mode: how an instruction's operand bytes and destination are
/// determined from the byte stream and registers.
///
/// Each mode fixes exactly how many bytes follow the opcode and whether the
/// destination is a register or a bus address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No operand.
    Imp,
    /// Operand is the register named by `reg1`.
    R,
    /// Register-to-register transfer: `reg1` <- `reg2`.
    Rr,
    /// Register <- 8-bit immediate.
    RD8,
    /// Register <- 16-bit little-endian immediate.
    RD16,
    /// 16-bit little-endian immediate only (absolute jump target).
    D16,
    /// Memory write through the pointer in `reg1`, value from `reg2`.
    MemR,
    /// Like `MemR` with HL as pointer; HL is incremented by 1 during
    /// operand resolution.
    HliR,
    /// Like `MemR` with HL as pointer; HL is decremented by 1 during
    /// operand resolution.
    HldR,
    /// Signed 8-bit displacement relative to the byte after the operand.
    D8Rel,
    /// HL <- SP plus signed 8-bit offset.
    HlSpr,
}

/// Branch condition, evaluated against the Z/C flag bits at execute time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

/// Immutable descriptor for a single opcode value.
///
/// Built once into a 256-entry table; decoding an opcode is a pure array
/// lookup, never a chain of conditionals.
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
    pub kind: Kind,
    pub mnemonic: &'static str,
    pub mode: Mode,
    pub reg1: Option<Reg>,
    pub reg2: Option<Reg>,
    pub cond: Cond,
    /// Fixed immediate carried by the descriptor itself (RST-class
    /// opcodes); none of the currently populated opcodes use one.
    pub param: Option<u8>,
}

impl Instruction {
    const INVALID: Instruction = Instruction {
        kind: Kind::Invalid,
        mnemonic: "INVALID",
        mode: Mode::Imp,
        reg1: None,
        reg2: None,
        cond: Cond::Always,
        param: None,
    };

    const fn imp(kind: Kind, mnemonic: &'static str) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::Imp,
            reg1: None,
            reg2: None,
            cond: Cond::Always,
            param: None,
        }
    }

    const fn r(kind: Kind, mnemonic: &'static str, reg1: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::R,
            reg1: Some(reg1),
            reg2: None,
            cond: Cond::Always,
            param: None,
        }
    }

    const fn rr(kind: Kind, mnemonic: &'static str, reg1: Reg, reg2: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::Rr,
            reg1: Some(reg1),
            reg2: Some(reg2),
            cond: Cond::Always,
            param: None,
        }
    }

    const fn rd8(kind: Kind, mnemonic: &'static str, reg1: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::RD8,
            reg1: Some(reg1),
            reg2: None,
            cond: Cond::Always,
            param: None,
        }
    }

    const fn rd16(kind: Kind, mnemonic: &'static str, reg1: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::RD16,
            reg1: Some(reg1),
            reg2: None,
            cond: Cond::Always,
            param: None,
        }
    }

    const fn d16(kind: Kind, mnemonic: &'static str, cond: Cond) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::D16,
            reg1: None,
            reg2: None,
            cond,
            param: None,
        }
    }

    const fn d8rel(kind: Kind, mnemonic: &'static str, cond: Cond) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::D8Rel,
            reg1: None,
            reg2: None,
            cond,
            param: None,
        }
    }

    const fn mem_r(kind: Kind, mnemonic: &'static str, reg1: Reg, reg2: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::MemR,
            reg1: Some(reg1),
            reg2: Some(reg2),
            cond: Cond::Always,
            param: None,
        }
    }

    const fn hli_r(kind: Kind, mnemonic: &'static str, reg2: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::HliR,
            reg1: Some(Reg::Hl),
            reg2: Some(reg2),
            cond: Cond::Always,
            param: None,
        }
    }

    const fn hld_r(kind: Kind, mnemonic: &'static str, reg2: Reg) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::HldR,
            reg1: Some(Reg::Hl),
            reg2: Some(reg2),
            cond: Cond::Always,
            param: None,
        }
    }

    const fn hl_spr(kind: Kind, mnemonic: &'static str) -> Self {
        Instruction {
            kind,
            mnemonic,
            mode: Mode::HlSpr,
            reg1: Some(Reg::Hl),
            reg2: Some(Reg::Sp),
            cond: Cond::Always,
            param: None,
        }
    }
}

/// Build the opcode table.
///
/// Every slot defaults to INVALID and known opcodes are then filled in by
/// index, so construction is deterministic and order-independent. The
/// populated set is the subset this core implements; the mechanism extends
/// to the full map one entry at a time.
fn build_table() -> [Instruction; 256] {
    use Kind::*;

    let mut t = [Instruction::INVALID; 256];

    t[0x00] = Instruction::imp(Nop, "NOP");

    // 16-bit immediate loads.
    t[0x01] = Instruction::rd16(Ld, "LD BC, d16", Reg::Bc);
    t[0x11] = Instruction::rd16(Ld, "LD DE, d16", Reg::De);
    t[0x21] = Instruction::rd16(Ld, "LD HL, d16", Reg::Hl);
    t[0x31] = Instruction::rd16(Ld, "LD SP, d16", Reg::Sp);

    // Stores of A through a register pointer, including the
    // post-increment/decrement HL forms.
    t[0x02] = Instruction::mem_r(Ld, "LD (BC), A", Reg::Bc, Reg::A);
    t[0x12] = Instruction::mem_r(Ld, "LD (DE), A", Reg::De, Reg::A);
    t[0x22] = Instruction::hli_r(Ld, "LD (HL+), A", Reg::A);
    t[0x32] = Instruction::hld_r(Ld, "LD (HL-), A", Reg::A);

    // DEC r
    t[0x05] = Instruction::r(Dec, "DEC B", Reg::B);
    t[0x0D] = Instruction::r(Dec, "DEC C", Reg::C);
    t[0x15] = Instruction::r(Dec, "DEC D", Reg::D);
    t[0x1D] = Instruction::r(Dec, "DEC E", Reg::E);
    t[0x25] = Instruction::r(Dec, "DEC H", Reg::H);
    t[0x2D] = Instruction::r(Dec, "DEC L", Reg::L);
    t[0x3D] = Instruction::r(Dec, "DEC A", Reg::A);

    // LD r, d8
    t[0x06] = Instruction::rd8(Ld, "LD B, d8", Reg::B);
    t[0x0E] = Instruction::rd8(Ld, "LD C, d8", Reg::C);
    t[0x16] = Instruction::rd8(Ld, "LD D, d8", Reg::D);
    t[0x1E] = Instruction::rd8(Ld, "LD E, d8", Reg::E);
    t[0x26] = Instruction::rd8(Ld, "LD H, d8", Reg::H);
    t[0x2E] = Instruction::rd8(Ld, "LD L, d8", Reg::L);
    t[0x3E] = Instruction::rd8(Ld, "LD A, d8", Reg::A);

    // Relative jumps.
    t[0x18] = Instruction::d8rel(Jr, "JR r8", Cond::Always);
    t[0x20] = Instruction::d8rel(Jr, "JR NZ, r8", Cond::NotZero);
    t[0x28] = Instruction::d8rel(Jr, "JR Z, r8", Cond::Zero);
    t[0x30] = Instruction::d8rel(Jr, "JR NC, r8", Cond::NotCarry);
    t[0x38] = Instruction::d8rel(Jr, "JR C, r8", Cond::Carry);

    // LD B, r: one row of the 0x40..0x7F transfer block. The (HL) source
    // column (0x46) needs a memory-read mode this core does not define yet,
    // so it stays unassigned.
    t[0x40] = Instruction::rr(Ld, "LD B, B", Reg::B, Reg::B);
    t[0x41] = Instruction::rr(Ld, "LD B, C", Reg::B, Reg::C);
    t[0x42] = Instruction::rr(Ld, "LD B, D", Reg::B, Reg::D);
    t[0x43] = Instruction::rr(Ld, "LD B, E", Reg::B, Reg::E);
    t[0x44] = Instruction::rr(Ld, "LD B, H", Reg::B, Reg::H);
    t[0x45] = Instruction::rr(Ld, "LD B, L", Reg::B, Reg::L);
    t[0x47] = Instruction::rr(Ld, "LD B, A", Reg::B, Reg::A);

    t[0x76] = Instruction::imp(Halt, "HALT");

    // LD A, r
    t[0x78] = Instruction::rr(Ld, "LD A, B", Reg::A, Reg::B);
    t[0x79] = Instruction::rr(Ld, "LD A, C", Reg::A, Reg::C);
    t[0x7A] = Instruction::rr(Ld, "LD A, D", Reg::A, Reg::D);
    t[0x7B] = Instruction::rr(Ld, "LD A, E", Reg::A, Reg::E);
    t[0x7C] = Instruction::rr(Ld, "LD A, H", Reg::A, Reg::H);
    t[0x7D] = Instruction::rr(Ld, "LD A, L", Reg::A, Reg::L);
    t[0x7F] = Instruction::rr(Ld, "LD A, A", Reg::A, Reg::A);

    // XOR r, accumulator-implicit. 0xAE (XOR (HL)) is unassigned for the
    // same reason as 0x46 above.
    t[0xA8] = Instruction::r(Xor, "XOR B", Reg::B);
    t[0xA9] = Instruction::r(Xor, "XOR C", Reg::C);
    t[0xAA] = Instruction::r(Xor, "XOR D", Reg::D);
    t[0xAB] = Instruction::r(Xor, "XOR E", Reg::E);
    t[0xAC] = Instruction::r(Xor, "XOR H", Reg::H);
    t[0xAD] = Instruction::r(Xor, "XOR L", Reg::L);
    t[0xAF] = Instruction::r(Xor, "XOR A", Reg::A);

    // Absolute jumps.
    t[0xC2] = Instruction::d16(Jp, "JP NZ, a16", Cond::NotZero);
    t[0xC3] = Instruction::d16(Jp, "JP a16", Cond::Always);
    t[0xCA] = Instruction::d16(Jp, "JP Z, a16", Cond::Zero);
    t[0xD2] = Instruction::d16(Jp, "JP NC, a16", Cond::NotCarry);
    t[0xDA] = Instruction::d16(Jp, "JP C, a16", Cond::Carry);

    t[0xF3] = Instruction::imp(Di, "DI");

    // Descriptor is present so the operand bytes are consumed correctly,
    // but execute refuses it rather than computing a wrong value.
    t[0xF8] = Instruction::hl_spr(Ld, "LD HL, SP+r8");

    t
}

lazy_static! {
    static ref INSTRUCTIONS: [Instruction; 256] = build_table();
}

/// Look up the descriptor for an opcode byte.
///
/// Returns `None` exactly for byte values with no assigned descriptor; the
/// CPU core treats that as a fatal unknown-opcode condition.
pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    let instr = &INSTRUCTIONS[opcode as usize];
    if instr.kind == Kind::Invalid {
        None
    } else {
        Some(instr)
    }
}

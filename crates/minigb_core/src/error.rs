use thiserror::Error;

use crate::cpu::instruction::{Kind, Mode};

/// Faults raised by a memory bus access.
///
/// Both variants are fatal to the interpreter loop: silently absorbing a
/// bad access would let emulated state drift from the real machine, so the
/// bus reports the exact address instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("write to read-only address {addr:#06X}")]
    WriteViolation { addr: u16 },
    #[error("access to unmapped address {addr:#06X}")]
    Unmapped { addr: u16 },
}

/// Faults raised while stepping the CPU.
///
/// There is no retry semantics for an invalid instruction stream; each
/// variant carries enough context (address, opcode, offending kind/mode)
/// to diagnose the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("unknown opcode {opcode:#04X} at {addr:#06X}")]
    UnknownOpcode { opcode: u8, addr: u16 },
    #[error("unimplemented instruction {mnemonic} ({kind:?}, {mode:?}) at {addr:#06X}")]
    Unimplemented {
        mnemonic: &'static str,
        kind: Kind,
        mode: Mode,
        addr: u16,
    },
    #[error("bus fault: {0}")]
    Bus(#[from] BusError),
}

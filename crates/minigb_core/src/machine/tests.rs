use super::{Machine, SystemBus, WRAM_END, WRAM_START};
use crate::cpu::{Bus, ENTRY_POINT};
use crate::error::{BusError, StepError};

/// Minimal image that is all zeroes (NOP) with `program` placed at the
/// entry point.
fn rom_with_program(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[ENTRY_POINT as usize..ENTRY_POINT as usize + program.len()].copy_from_slice(program);
    rom
}

#[test]
fn write16_read16_round_trip() {
    let mut bus = SystemBus::new(vec![0u8; 0x100]);

    for value in [0x0000u16, 0x0001, 0x1234, 0x8000, 0xABCD, 0xFFFF] {
        for addr in [WRAM_START, 0xC800, WRAM_END - 1] {
            bus.write16(addr, value).unwrap();
            assert_eq!(bus.read16(addr).unwrap(), value, "addr {addr:#06X}");
        }
    }
}

#[test]
fn write16_is_little_endian() {
    let mut bus = SystemBus::new(vec![0u8; 0x100]);

    bus.write16(0xC000, 0xBEEF).unwrap();
    assert_eq!(bus.read(0xC000).unwrap(), 0xEF, "low byte at addr");
    assert_eq!(bus.read(0xC001).unwrap(), 0xBE, "high byte at addr + 1");
}

#[test]
fn rom_reads_back_and_rejects_writes() {
    let mut bus = SystemBus::new(vec![0x11, 0x22, 0x33]);

    assert_eq!(bus.read(0x0001).unwrap(), 0x22);
    assert_eq!(
        bus.write(0x0001, 0xAA),
        Err(BusError::WriteViolation { addr: 0x0001 })
    );
    // The image is untouched after the refused write.
    assert_eq!(bus.read(0x0001).unwrap(), 0x22);
}

#[test]
fn unmapped_addresses_fail_loudly() {
    let mut bus = SystemBus::new(vec![0u8; 0x100]);

    // Between the end of the image and work RAM.
    assert_eq!(bus.read(0x4000), Err(BusError::Unmapped { addr: 0x4000 }));
    assert_eq!(
        bus.write(0x4000, 0x00),
        Err(BusError::Unmapped { addr: 0x4000 })
    );
    // Above work RAM.
    assert_eq!(bus.read(0xE000), Err(BusError::Unmapped { addr: 0xE000 }));
    assert_eq!(
        bus.write(0xFFFF, 0x00),
        Err(BusError::Unmapped { addr: 0xFFFF })
    );
}

#[test]
fn machine_runs_until_halt() {
    // XOR A; LD B, 7; HALT
    let mut machine = Machine::new(rom_with_program(&[0xAF, 0x06, 0x07, 0x76]));

    machine.run().unwrap();
    assert!(machine.cpu.halted);
    assert_eq!(machine.cpu.regs.a, 0);
    assert_eq!(machine.cpu.regs.b, 7);
}

#[test]
fn run_steps_bounds_the_loop() {
    // An infinite stream of NOPs from the entry point.
    let mut machine = Machine::new(vec![0u8; 0x8000]);
    machine.cpu.regs.pc = 0;

    let executed = machine.run_steps(5).unwrap();
    assert_eq!(executed, 5);
    assert_eq!(machine.cpu.regs.pc, 5);
}

#[test]
fn run_surfaces_unknown_opcode() {
    let mut machine = Machine::new(rom_with_program(&[0xD3]));

    let err = machine.run().unwrap_err();
    assert_eq!(
        err,
        StepError::UnknownOpcode {
            opcode: 0xD3,
            addr: ENTRY_POINT,
        }
    );
}

#[test]
fn run_surfaces_rom_write_violation() {
    // LD HL, 0x0000; LD (HL-), A: a store into cartridge space.
    let mut machine = Machine::new(rom_with_program(&[0x21, 0x00, 0x00, 0x32]));

    let err = machine.run().unwrap_err();
    assert_eq!(
        err,
        StepError::Bus(BusError::WriteViolation { addr: 0x0000 })
    );
    // The HL post-decrement happened during operand resolution, before
    // the execute phase faulted.
    assert_eq!(machine.cpu.regs.hl(), 0xFFFF);
}

#[test]
fn machine_stores_reach_work_ram() {
    // LD HL, 0xC000; LD A, 0x5A; LD (HL+), A; HALT
    let mut machine = Machine::new(rom_with_program(&[
        0x21, 0x00, 0xC0, 0x3E, 0x5A, 0x22, 0x76,
    ]));

    machine.run().unwrap();
    assert_eq!(machine.bus().read(0xC000).unwrap(), 0x5A);
    assert_eq!(machine.cpu.regs.hl(), 0xC001);
}

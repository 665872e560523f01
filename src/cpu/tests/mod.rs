//! 65C816 CPU tests
//!
//! Test suite for the interpreter, organized into:
//! - instructions.rs: individual instructions and instruction families
//! - modes.rs: emulation/native mode and register-width behavior
//! - interrupts.rs: reset, BRK/COP, IRQ/NMI service, and run-state bits
//!
//! # References
//! - WDC W65C816S data sheet
//! - <http://6502.org/tutorials/65c816opcodes.html>

use super::*;
use crate::memory::Memory;

mod modes;

/// Program origin used by the helpers
const ORG: u16 = 0x0200;

/// An emulation-mode CPU that has consumed its reset step, with `code`
/// at 0x000200 and the stack at 0x01ff
fn emu_setup(code: &[u8]) -> (Cpu, Memory) {
    let mut mem = Memory::new();
    let mut cpu = Cpu::new();
    cpu.setacc = true;
    cpu.reset();

    mem.set_word(vectors::RESET, ORG, false);
    assert_eq!(cpu.step(&mut mem), StepResult::Ok);
    assert_eq!(cpu.pc, ORG);

    cpu.sp = 0x01ff;
    for (i, &byte) in code.iter().enumerate() {
        mem.set_byte(ORG as u32 + i as u32, byte, false);
    }
    (cpu, mem)
}

/// A native-mode CPU with 16-bit accumulator and index registers
fn native_setup(code: &[u8]) -> (Cpu, Memory) {
    let (mut cpu, mem) = emu_setup(code);
    cpu.status.e = false;
    cpu.status.m = false;
    cpu.status.xb = false;
    (cpu, mem)
}

/// A native-mode CPU still running 8-bit accumulator and indexes
fn native_setup8(code: &[u8]) -> (Cpu, Memory) {
    let (mut cpu, mem) = emu_setup(code);
    cpu.status.e = false;
    (cpu, mem)
}

/// Step once and require success
fn step_ok(cpu: &mut Cpu, mem: &mut Memory) {
    assert_eq!(cpu.step(mem), StepResult::Ok);
}

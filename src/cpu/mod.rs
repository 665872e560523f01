//! WDC 65C816 CPU interpreter
//!
//! The 65C816 is a 6502 descendant with a 24-bit address space split into
//! 64 KiB banks, 16-bit registers, and two personalities: emulation mode
//! (6502-compatible, 8-bit registers, page-1 stack) and native mode, where
//! the M and X status bits select accumulator/memory and index width
//! independently. `XCE` swaps carry and the hidden E bit to switch modes.
//!
//! # Module Organization
//!
//! - `flags`: status-register value type and bit constants
//! - `opcodes`: the 256-entry opcode table shared with the disassembler
//! - `helpers`: register/stack helpers and addressing-mode resolvers
//! - `execute`: instruction handlers and dispatch
//! - `snapshot`: single-line textual state codec
//!
//! # References
//! - WDC W65C816S data sheet
//! - <http://6502.org/tutorials/65c816opcodes.html>

use crate::memory::Memory;

mod execute;
pub mod flags;
mod helpers;
pub mod opcodes;
mod snapshot;

#[cfg(test)]
mod tests;

pub use flags::Status;
pub use helpers::EmulationStack;
pub use snapshot::SnapshotError;

/// Interrupt vector addresses (16-bit word locations in bank 0)
pub mod vectors {
    /// Native-mode COP vector
    pub const NATIVE_COP: u32 = 0xffe4;
    /// Native-mode BRK vector
    pub const NATIVE_BRK: u32 = 0xffe6;
    /// Native-mode ABORT vector
    pub const NATIVE_ABORT: u32 = 0xffe8;
    /// Native-mode NMI vector
    pub const NATIVE_NMI: u32 = 0xffea;
    /// Native-mode IRQ vector
    pub const NATIVE_IRQ: u32 = 0xffee;
    /// Emulation-mode COP vector
    pub const EMU_COP: u32 = 0xfff4;
    /// Emulation-mode ABORT vector
    pub const EMU_ABORT: u32 = 0xfff8;
    /// Emulation-mode NMI vector
    pub const EMU_NMI: u32 = 0xfffa;
    /// Reset vector
    pub const RESET: u32 = 0xfffc;
    /// Emulation-mode IRQ/BRK vector
    pub const EMU_IRQ: u32 = 0xfffe;
}

/// Outcome of a single CPU step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// One instruction (or one vector-service sequence) executed
    Ok,
    /// The fetched opcode is not implemented
    UnknownOpcode,
    /// The CPU is halted by a previous STP and needs a reset
    Stp,
    /// The simulator reached an invalid internal state
    Crash,
}

/// 65C816 CPU state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    /// 16-bit accumulator; the low byte is A, the high byte is B
    pub c: u16,
    /// X index register
    pub x: u16,
    /// Y index register
    pub y: u16,
    /// Stack pointer
    pub sp: u16,
    /// Direct-page register
    pub d: u16,
    /// Data bank register
    pub dbr: u8,
    /// Program bank register
    pub pbr: u8,
    /// Program counter (within the program bank)
    pub pc: u16,
    /// Status flags plus simulator run-state bits
    pub status: Status,
    /// Cumulative cycle count
    pub cycles: u64,
    /// When set, CPU memory accesses mark the R/W access flags
    pub setacc: bool,
}

impl Cpu {
    /// Create a CPU with everything zeroed
    ///
    /// Call [`Cpu::reset`] before stepping; a freshly created CPU has no
    /// defined architecture state.
    pub fn new() -> Self {
        Self {
            c: 0,
            x: 0,
            y: 0,
            sp: 0,
            d: 0,
            dbr: 0,
            pbr: 0,
            pc: 0,
            status: Status::default(),
            cycles: 0,
            setacc: false,
        }
    }

    /// Put the CPU into its post-/RST state
    ///
    /// The program counter is NOT loaded here: the next [`Cpu::step`]
    /// fetches the reset vector and clears the pending-reset bit.
    pub fn reset(&mut self) {
        self.d = 0x0000;
        self.dbr = 0x00;
        self.pbr = 0x00;
        self.sp = (self.sp & 0x00ff) | 0x0100;
        self.x &= 0x00ff;
        self.y &= 0x00ff;
        self.status.m = true;
        self.status.xb = true;
        self.status.d = false;
        self.status.i = true;
        self.status.e = true;

        self.cycles = 0;
        self.status.crash = false;
        self.status.stp = false;
        self.status.irq = false;
        self.status.nmi = false;

        // Tell the stepper that the CPU just reset
        self.status.rst = true;
    }

    /// Execute one instruction or vector-service sequence
    ///
    /// Pre-step checks run in a fixed order: a crashed CPU stays crashed,
    /// a pending reset loads PC from the reset vector (consuming the step
    /// without executing an opcode), and a stopped CPU reports `Stp`.
    /// After the instruction, a pending NMI is serviced first, then a
    /// pending IRQ if interrupts are enabled.
    pub fn step(&mut self, mem: &mut Memory) -> StepResult {
        if self.status.crash {
            return StepResult::Crash;
        }

        // Handle CPU reset (does not perform a full CPU reset)
        if self.status.rst {
            self.status.rst = false;
            self.pc = mem.get_word(vectors::RESET, self.setacc);
            return StepResult::Ok;
        }

        if self.status.stp {
            return StepResult::Stp;
        }

        let opcode = mem.get_byte(self.effective_pc(), self.setacc);
        self.execute(mem, opcode);

        // Make sure opcode handling did not reach an invalid state
        if self.status.crash {
            return StepResult::Crash;
        }

        // Service pending interrupts
        if self.status.nmi {
            self.status.nmi = false;
            // NMI does not set I
            self.take_interrupt(mem, vectors::EMU_NMI, vectors::NATIVE_NMI, Some(false), false);
            return StepResult::Ok;
        }
        if self.status.irq && !self.status.i {
            // The '816 IRQ line is level triggered; clearing on service
            // makes it edge triggered, which is what the tests expect
            self.status.irq = false;
            self.take_interrupt(mem, vectors::EMU_IRQ, vectors::NATIVE_IRQ, Some(false), true);
            return StepResult::Ok;
        }

        StepResult::Ok
    }

    /// Run the shared vector-service sequence for BRK/COP/NMI/IRQ
    ///
    /// In emulation mode the 16-bit PC and a status byte with bit 4
    /// forced per `stacked_b` are pushed and 7 cycles charged; in native
    /// mode the full PBR:PC and the raw status byte are pushed and 8
    /// cycles charged. Both paths clear D, zero PBR, and load PC from the
    /// vector; `set_i` additionally masks IRQs.
    pub(crate) fn take_interrupt(
        &mut self,
        mem: &mut Memory,
        emu_vector: u32,
        native_vector: u32,
        stacked_b: Option<bool>,
        set_i: bool,
    ) {
        let set_acc = self.setacc;
        if self.status.e {
            let pc = self.pc;
            self.push_word(mem, pc, EmulationStack::Enable, set_acc);
            let mut sr = self.status.to_byte();
            match stacked_b {
                Some(true) => sr |= flags::XB,
                Some(false) => sr &= !flags::XB,
                None => {}
            }
            self.push_byte(mem, sr, set_acc);
            self.pc = mem.get_word(emu_vector, set_acc);
            self.cycles += 7;
        } else {
            let pc = self.effective_pc();
            self.push_long(mem, pc, set_acc);
            let sr = self.status.to_byte();
            self.push_byte(mem, sr, set_acc);
            self.pc = mem.get_word(native_vector, set_acc);
            self.cycles += 8;
        }

        self.pbr = 0;
        self.status.d = false; // Binary mode (65C02 behavior)
        if set_i {
            self.status.i = true;
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

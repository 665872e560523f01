//! Simulation session orchestrator
//!
//! Ties the CPU, the flagged memory, and the UART into one machine with a
//! strict within-step ordering: the CPU executes first and mutates
//! memory, then the UART observes that memory (including the R/W
//! access-flag trails on its registers) and the host latches the UART's
//! interrupt line onto the CPU's IRQ input. A byte written to THR reaches
//! the socket in the same step; a byte arriving on the socket becomes
//! readable from RBR at the next step; a UART interrupt takes effect on
//! the next CPU step.
//!
//! Run mode advances until a breakpoint B-flag at the effective PC, a
//! sticky CPU condition (STP, crash), the step budget, or a host stop
//! request sampled at a step boundary.

use crate::cpu::{Cpu, StepResult};
use crate::disasm;
use crate::memory::{MemFlags, Memory};
use crate::peripherals::Uart;

/// Number of entries kept in the instruction history
const HISTORY_SIZE: usize = 64;

/// One executed instruction: where it was and what it looked like
#[derive(Debug, Clone, Default)]
pub struct HistoryEntry {
    /// 24-bit effective PC before execution
    pub pc: u32,
    /// Disassembled text
    pub text: String,
}

/// Ring buffer of the most recently executed instructions
struct InstructionHistory {
    entries: Vec<HistoryEntry>,
    write_idx: usize,
    count: usize,
}

impl InstructionHistory {
    fn new() -> Self {
        Self {
            entries: vec![HistoryEntry::default(); HISTORY_SIZE],
            write_idx: 0,
            count: 0,
        }
    }

    fn record(&mut self, pc: u32, text: String) {
        self.entries[self.write_idx] = HistoryEntry { pc, text };
        self.write_idx = (self.write_idx + 1) % HISTORY_SIZE;
        if self.count < HISTORY_SIZE {
            self.count += 1;
        }
    }

    /// Entries in execution order (oldest to newest)
    fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        let start = if self.count < HISTORY_SIZE {
            0
        } else {
            self.write_idx
        };
        (0..self.count).map(move |i| &self.entries[(start + i) % HISTORY_SIZE])
    }

    fn clear(&mut self) {
        self.write_idx = 0;
        self.count = 0;
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of steps completed
    StepsComplete,
    /// The B-flag at the effective PC is set
    Breakpoint,
    /// The CPU executed STP
    Stopped,
    /// The CPU reached an invalid simulator state
    Crashed,
    /// The CPU fetched an unimplemented opcode
    UnknownOpcode,
    /// The host requested a stop (sampled at a step boundary)
    Interrupted,
}

/// A complete simulated machine
pub struct System {
    /// The 65C816
    pub cpu: Cpu,
    /// 16 MiB flagged memory
    pub mem: Memory,
    /// Serial port
    pub uart: Uart,
    /// Host-toggled stop request, sampled between steps
    pub stop_requested: bool,
    /// Execution history for the debugger
    history: InstructionHistory,
}

impl System {
    /// Create a machine with a freshly reset CPU
    ///
    /// The CPU marks memory access flags so that device shadowing and
    /// breakpoint bookkeeping work.
    pub fn new() -> Self {
        let mut cpu = Cpu::new();
        cpu.setacc = true;
        cpu.reset();
        Self {
            cpu,
            mem: Memory::new(),
            uart: Uart::new(),
            stop_requested: false,
            history: InstructionHistory::new(),
        }
    }

    /// Reset the CPU and the UART register file (memory is preserved)
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.uart.reset();
        self.history.clear();
    }

    /// Advance the machine by one step: CPU first, then the UART, whose
    /// interrupt line is latched onto the CPU's IRQ input
    pub fn step(&mut self) -> StepResult {
        let pc = self.cpu.effective_pc();
        let (_, text) = disasm::disassemble(&self.mem, &self.cpu);

        let result = self.cpu.step(&mut self.mem);
        self.history.record(pc, text);

        if self.uart.enabled {
            let irq = self.uart.step(&mut self.mem);
            self.cpu.status.irq = irq;
        }

        result
    }

    /// True when a breakpoint is armed on the current effective PC
    pub fn breakpoint_hit(&self) -> bool {
        self.mem
            .test_flags(self.cpu.effective_pc())
            .contains(MemFlags::B)
    }

    /// Arm or disarm the breakpoint flag on an address
    pub fn set_breakpoint(&mut self, addr: u32, armed: bool) {
        if armed {
            self.mem.set_flags(addr, MemFlags::B);
        } else {
            self.mem.reset_flags(addr, MemFlags::B);
        }
    }

    /// Run up to `max_steps` steps
    ///
    /// Returns the stop reason and the number of steps executed.
    pub fn run(&mut self, max_steps: u64) -> (StopReason, u64) {
        for steps in 0..max_steps {
            if self.stop_requested {
                self.stop_requested = false;
                return (StopReason::Interrupted, steps);
            }

            let result = self.step();
            let executed = steps + 1;
            match result {
                StepResult::Ok => {}
                StepResult::Stp => return (StopReason::Stopped, executed),
                StepResult::Crash => return (StopReason::Crashed, executed),
                StepResult::UnknownOpcode => return (StopReason::UnknownOpcode, executed),
            }

            if self.breakpoint_hit() {
                return (StopReason::Breakpoint, executed);
            }
        }
        (StopReason::StepsComplete, max_steps)
    }

    /// The execution history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Format the execution history for display
    pub fn dump_history(&self) -> String {
        let mut output = String::new();
        for entry in self.history.iter() {
            output.push_str(&format!("  {:06x}  {}\n", entry.pc, entry.text));
        }
        output
    }

    /// Format the register file for display
    pub fn dump_registers(&self) -> String {
        let cpu = &self.cpu;
        format!(
            "C={:04x} X={:04x} Y={:04x} SP={:04x} D={:04x} DBR={:02x} PBR={:02x} PC={:04x}\n\
             N={} V={} M={} X={} D={} I={} Z={} C={} E={}\n\
             RST={} IRQ={} NMI={} STP={} CRASH={} cycles={}",
            cpu.c,
            cpu.x,
            cpu.y,
            cpu.sp,
            cpu.d,
            cpu.dbr,
            cpu.pbr,
            cpu.pc,
            cpu.status.n as u8,
            cpu.status.v as u8,
            cpu.status.m as u8,
            cpu.status.xb as u8,
            cpu.status.d as u8,
            cpu.status.i as u8,
            cpu.status.z as u8,
            cpu.status.c as u8,
            cpu.status.e as u8,
            cpu.status.rst as u8,
            cpu.status.irq as u8,
            cpu.status.nmi as u8,
            cpu.status.stp as u8,
            cpu.status.crash as u8,
            cpu.cycles,
        )
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::vectors;

    /// Point the reset vector at `start` and consume the reset step
    fn boot(sys: &mut System, start: u16) {
        sys.mem.set_word(vectors::RESET, start, false);
        assert_eq!(sys.step(), StepResult::Ok);
        assert_eq!(sys.cpu.pc, start);
    }

    #[test]
    fn test_reset_vector_fetch() {
        let mut sys = System::new();
        sys.mem.set_byte(0xfffc, 0x34, false);
        sys.mem.set_byte(0xfffd, 0x12, false);

        sys.step();
        assert_eq!(sys.cpu.pc, 0x1234);
        assert_eq!(sys.cpu.pbr, 0x00);
        assert_eq!(sys.cpu.cycles, 0);
        assert!(!sys.cpu.status.rst);
    }

    #[test]
    fn test_run_until_breakpoint() {
        let mut sys = System::new();
        boot(&mut sys, 0x0200);
        // NOP sled
        for addr in 0x0200..0x0210 {
            sys.mem.set_byte(addr, 0xea, false);
        }
        sys.set_breakpoint(0x0204, true);

        let (reason, steps) = sys.run(100);
        assert_eq!(reason, StopReason::Breakpoint);
        assert_eq!(steps, 4);
        assert_eq!(sys.cpu.pc, 0x0204);

        // Disarm and continue
        sys.set_breakpoint(0x0204, false);
        let (reason, _) = sys.run(4);
        assert_eq!(reason, StopReason::StepsComplete);
    }

    #[test]
    fn test_run_stops_on_stp() {
        let mut sys = System::new();
        boot(&mut sys, 0x0200);
        sys.mem.set_byte(0x0200, 0xea, false); // NOP
        sys.mem.set_byte(0x0201, 0xdb, false); // STP

        let (reason, _) = sys.run(100);
        assert_eq!(reason, StopReason::Stopped);
        assert!(sys.cpu.status.stp);
    }

    #[test]
    fn test_stop_request_sampled_between_steps() {
        let mut sys = System::new();
        boot(&mut sys, 0x0200);
        sys.mem.set_byte(0x0200, 0xea, false);

        sys.stop_requested = true;
        let (reason, steps) = sys.run(100);
        assert_eq!(reason, StopReason::Interrupted);
        assert_eq!(steps, 0);
        // The request is consumed
        assert!(!sys.stop_requested);
    }

    #[test]
    fn test_history_records_disassembly() {
        let mut sys = System::new();
        boot(&mut sys, 0x0200);
        sys.mem.set_byte(0x0200, 0xa9, false); // LDA #$42
        sys.mem.set_byte(0x0201, 0x42, false);
        sys.step();

        let dump = sys.dump_history();
        assert!(dump.contains("LDA #$42"));
    }

    #[test]
    fn test_uart_irq_reaches_cpu() {
        let mut sys = System::new();
        const BASE: u32 = 0x00_7f00;
        sys.uart.addr = BASE;
        sys.uart.enabled = true;

        // IRQ handler at 0x9000: just STP; main program: CLI, then NOPs
        sys.mem.set_word(vectors::EMU_IRQ, 0x9000, false);
        sys.mem.set_byte(0x9000, 0xdb, false);
        boot(&mut sys, 0x0200);
        sys.mem.set_byte(0x0200, 0x58, false); // CLI
        for addr in 0x0201..0x0240 {
            sys.mem.set_byte(addr, 0xea, false);
        }

        // Loopback a byte into RX with the RX interrupt enabled
        sys.mem.set_byte(BASE + 4, 0x10, false); // MCR: LOOP
        sys.mem.set_byte(BASE + 1, 0x01, false); // IER: ERBI
        sys.mem.set_byte(BASE, b'Q', true); // THR write (with W flag)

        let (reason, _) = sys.run(100);
        assert_eq!(reason, StopReason::Stopped);
        // The CPU took the IRQ vector and ran the STP handler
        assert_eq!(sys.cpu.pc, 0x9001);
    }

    #[test]
    fn test_lda_cycle_accounting() {
        let mut sys = System::new();
        boot(&mut sys, 0x0200);
        sys.mem.set_byte(0x0200, 0xa9, false);
        sys.mem.set_byte(0x0201, 0x42, false);

        let before = sys.cpu.cycles;
        sys.step();
        assert_eq!(sys.cpu.a(), 0x42);
        assert!(!sys.cpu.status.z);
        assert!(!sys.cpu.status.n);
        assert_eq!(sys.cpu.pc, 0x0202);
        assert_eq!(sys.cpu.cycles - before, 2);
    }
}

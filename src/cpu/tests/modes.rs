//! Emulation/native mode and register-width tests
//!
//! Covers the reset state, XCE mode switching, the M/X width rules, the
//! emulation-mode direct-page and stack wrap special cases, and the
//! invariants the rest of the simulator relies on.

use super::*;

#[test]
fn test_reset_state() {
    let mut cpu = Cpu::new();
    cpu.c = 0xffff;
    cpu.x = 0x1234;
    cpu.y = 0x5678;
    cpu.sp = 0xabcd;
    cpu.d = 0x4444;
    cpu.dbr = 0x12;
    cpu.pbr = 0x34;
    cpu.reset();

    assert_eq!(cpu.d, 0x0000);
    assert_eq!(cpu.dbr, 0x00);
    assert_eq!(cpu.pbr, 0x00);
    // SP keeps its low byte but is forced into page 1
    assert_eq!(cpu.sp, 0x01cd);
    // Index registers are truncated to 8 bits
    assert_eq!(cpu.x, 0x0034);
    assert_eq!(cpu.y, 0x0078);
    // The accumulator survives reset
    assert_eq!(cpu.c, 0xffff);

    assert!(cpu.status.e);
    assert!(cpu.status.m);
    assert!(cpu.status.xb);
    assert!(cpu.status.i);
    assert!(!cpu.status.d);
    assert!(cpu.status.rst);
    assert_eq!(cpu.cycles, 0);
}

#[test]
fn test_xce_enters_native_mode() {
    // CLC; XCE
    let (mut cpu, mut mem) = emu_setup(&[0x18, 0xfb]);
    step_ok(&mut cpu, &mut mem);
    step_ok(&mut cpu, &mut mem);

    assert!(!cpu.status.e);
    // Old E lands in carry
    assert!(cpu.status.c);
    // Widths stay 8-bit until REP
    assert!(cpu.status.m);
    assert!(cpu.status.xb);
}

#[test]
fn test_xce_back_to_emulation_truncates() {
    // SEC; XCE
    let (mut cpu, mut mem) = native_setup(&[0x38, 0xfb]);
    cpu.x = 0x1234;
    cpu.y = 0x5678;
    cpu.sp = 0x2fff;

    step_ok(&mut cpu, &mut mem);
    step_ok(&mut cpu, &mut mem);

    assert!(cpu.status.e);
    assert!(!cpu.status.c);
    assert!(cpu.status.m);
    assert!(cpu.status.xb);
    assert_eq!(cpu.x, 0x0034);
    assert_eq!(cpu.y, 0x0078);
    assert_eq!(cpu.sp, 0x01ff);
}

#[test]
fn test_rep_widens_registers_in_native_mode() {
    // REP #$30
    let (mut cpu, mut mem) = native_setup8(&[0xc2, 0x30]);
    step_ok(&mut cpu, &mut mem);

    assert!(!cpu.status.m);
    assert!(!cpu.status.xb);
    assert_eq!(cpu.pc, ORG + 2);
    assert_eq!(cpu.cycles, 3);
}

#[test]
fn test_rep_cannot_widen_in_emulation_mode() {
    let (mut cpu, mut mem) = emu_setup(&[0xc2, 0x30]);
    step_ok(&mut cpu, &mut mem);

    assert!(cpu.status.m);
    assert!(cpu.status.xb);
}

#[test]
fn test_sep_narrows_and_truncates_indexes() {
    // SEP #$30
    let (mut cpu, mut mem) = native_setup(&[0xe2, 0x30]);
    cpu.x = 0xabcd;
    cpu.y = 0x1234;
    step_ok(&mut cpu, &mut mem);

    assert!(cpu.status.m);
    assert!(cpu.status.xb);
    assert_eq!(cpu.x, 0x00cd);
    assert_eq!(cpu.y, 0x0034);
}

#[test]
fn test_immediate_length_follows_width() {
    // LDA #imm in 16-bit mode is a 3-byte instruction
    let (mut cpu, mut mem) = native_setup(&[0xa9, 0x34, 0x12]);
    step_ok(&mut cpu, &mut mem);
    assert_eq!(cpu.c, 0x1234);
    assert_eq!(cpu.pc, ORG + 3);

    // LDX #imm with 8-bit indexes is 2 bytes
    let (mut cpu, mut mem) = native_setup8(&[0xa2, 0x42]);
    step_ok(&mut cpu, &mut mem);
    assert_eq!(cpu.x, 0x0042);
    assert_eq!(cpu.pc, ORG + 2);
}

#[test]
fn test_mixed_widths() {
    // M=0, X=1: 16-bit accumulator with 8-bit indexes
    let (mut cpu, mut mem) = native_setup(&[0xa9, 0x34, 0x12, 0xa2, 0x42]);
    cpu.status.xb = true;
    step_ok(&mut cpu, &mut mem);
    step_ok(&mut cpu, &mut mem);

    assert_eq!(cpu.c, 0x1234);
    assert_eq!(cpu.x, 0x0042);
    assert_eq!(cpu.pc, ORG + 5);
}

#[test]
fn test_dp_x_page_wrap_in_emulation_mode() {
    // LDA $f0,X with D=0 page wraps in emulation mode
    let (mut cpu, mut mem) = emu_setup(&[0xb5, 0xf0]);
    cpu.x = 0x20;
    mem.set_byte(0x0010, 0x99, false);
    step_ok(&mut cpu, &mut mem);
    assert_eq!(cpu.a(), 0x99);
}

#[test]
fn test_dp_x_no_page_wrap_with_offset_d() {
    // Same instruction, but D with a nonzero low byte bank wraps instead
    let (mut cpu, mut mem) = emu_setup(&[0xb5, 0xf0]);
    cpu.d = 0x0010;
    cpu.x = 0x20;
    mem.set_byte(0x0120, 0x77, false);
    step_ok(&mut cpu, &mut mem);
    assert_eq!(cpu.a(), 0x77);
}

#[test]
fn test_emulation_stack_stays_in_page_1() {
    // PHA with SP at the bottom of page 1
    let (mut cpu, mut mem) = emu_setup(&[0x48]);
    cpu.sp = 0x0100;
    cpu.set_a(0x5a);
    step_ok(&mut cpu, &mut mem);

    assert_eq!(mem.peek_byte(0x0100), 0x5a);
    assert_eq!(cpu.sp, 0x01ff);
}

#[test]
fn test_native_stack_crosses_page_boundary() {
    let (mut cpu, mut mem) = native_setup(&[0x48]);
    cpu.sp = 0x0100;
    cpu.c = 0xbeef;
    step_ok(&mut cpu, &mut mem);

    assert_eq!(mem.peek_byte(0x0100), 0xbe);
    assert_eq!(mem.peek_byte(0x00ff), 0xef);
    assert_eq!(cpu.sp, 0x00fe);
}

#[test]
fn test_pc_bank_wraps_during_execution() {
    let mut mem = Memory::new();
    let mut cpu = Cpu::new();
    cpu.reset();
    cpu.status.rst = false;
    cpu.pbr = 0x03;
    cpu.pc = 0xffff;
    mem.set_byte(0x03_ffff, 0xea, false); // NOP at the top of the bank

    step_ok(&mut cpu, &mut mem);
    // PC wraps within the bank; PBR is untouched
    assert_eq!(cpu.pc, 0x0000);
    assert_eq!(cpu.pbr, 0x03);
}

#[test]
fn test_register_invariants_hold() {
    // A little program exercising widths and the stack
    let code = [
        0x18, 0xfb, // CLC; XCE          -> native
        0xc2, 0x30, // REP #$30          -> 16-bit
        0xa9, 0xff, 0xff, // LDA #$ffff
        0x48, // PHA
        0xe2, 0x30, // SEP #$30          -> 8-bit
        0x38, 0xfb, // SEC; XCE          -> emulation
    ];
    let (mut cpu, mut mem) = emu_setup(&code);
    for _ in 0..8 {
        step_ok(&mut cpu, &mut mem);
    }

    assert!(cpu.status.e);
    assert_eq!(cpu.sp & 0xff00, 0x0100);
    assert_eq!(cpu.x & 0xff00, 0x0000);
    assert_eq!(cpu.y & 0xff00, 0x0000);
    assert!(cpu.status.m && cpu.status.xb);
}

//! 65C816 instruction execution
//!
//! [`Cpu::execute`] dispatches one already-fetched opcode byte. The opcode
//! table supplies shape (addressing mode, length, base cycles); the
//! resolvers in `helpers` turn the mode into an effective operand address;
//! the handlers here read or write through that address and update flags
//! for the width currently in effect (M for accumulator/memory ops, X for
//! index ops, both forced 8-bit in emulation mode).
//!
//! Every handler is responsible for advancing PC and charging its own
//! cycles. Vector-style instructions (BRK, COP) share the interrupt
//! sequence in `cpu/mod.rs`.

use super::helpers::EmulationStack;
use super::opcodes::{AddrMode, Mnemonic, OpInfo, RegRole, OPCODES};
use super::vectors;
use super::Cpu;
use crate::memory::{add_addr_bank_wrap, Memory};

/// Whether a 16-bit data access through this mode's effective address
/// bank-wraps (bank-0 pointer regions) or runs free across banks
fn data_access_bank_wraps(mode: AddrMode) -> bool {
    matches!(
        mode,
        AddrMode::Immediate
            | AddrMode::Dp
            | AddrMode::DpX
            | AddrMode::DpY
            | AddrMode::StackRel
    )
}

/// Add two BCD numbers digit-by-digit; returns (result, carry out)
fn bcd_add(a: u32, b: u32, carry_in: u32, nibbles: u32) -> (u32, bool) {
    let mut result = 0u32;
    let mut carry = carry_in;
    for i in 0..nibbles {
        let mut digit = ((a >> (4 * i)) & 0xf) + ((b >> (4 * i)) & 0xf) + carry;
        if digit > 9 {
            digit += 6;
            carry = 1;
        } else {
            carry = 0;
        }
        result |= (digit & 0xf) << (4 * i);
    }
    (result, carry != 0)
}

/// Subtract two BCD numbers digit-by-digit; returns (result, carry out)
/// where carry follows the 65xx convention: set means no borrow
fn bcd_sub(a: u32, b: u32, borrow_in: u32, nibbles: u32) -> (u32, bool) {
    let mut result = 0u32;
    let mut borrow = borrow_in as i32;
    for i in 0..nibbles {
        let mut digit = ((a >> (4 * i)) & 0xf) as i32 - ((b >> (4 * i)) & 0xf) as i32 - borrow;
        if digit < 0 {
            digit += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        result |= (digit as u32 & 0xf) << (4 * i);
    }
    (result, borrow == 0)
}

impl Cpu {
    /// Instruction length in bytes, accounting for 16-bit immediates
    fn instr_length(&self, info: &OpInfo) -> u16 {
        let mut len = info.length as u16;
        if info.mode == AddrMode::Immediate {
            let wide = match info.reg {
                RegRole::A => !self.m_width8(),
                RegRole::X => !self.x_width8(),
                RegRole::None => false,
            };
            if wide {
                len += 1;
            }
        }
        len
    }

    /// Advance PC past the instruction and charge its base cycles
    fn finish(&mut self, info: &OpInfo) {
        self.update_pc(self.instr_length(info));
        self.cycles += info.cycles as u64;
    }

    /// Resolve a data-mode effective address (not used for jumps,
    /// branches, or block moves, which have their own sequencing)
    fn resolve_addr(&mut self, mem: &mut Memory, mode: AddrMode) -> u32 {
        let set_acc = self.setacc;
        match mode {
            AddrMode::Implied => 0,
            AddrMode::Immediate => self.addr_immediate(),
            AddrMode::Dp => self.addr_dp(mem, set_acc),
            AddrMode::DpX => self.addr_dp_x(mem, set_acc),
            AddrMode::DpY => self.addr_dp_y(mem, set_acc),
            AddrMode::DpInd => self.addr_dp_ind(mem, set_acc),
            AddrMode::DpIndLong => self.addr_dp_ind_long(mem, set_acc),
            AddrMode::DpIndX => self.addr_dp_ind_x(mem, set_acc),
            AddrMode::DpIndY => self.addr_dp_ind_y(mem, set_acc),
            AddrMode::DpIndLongY => self.addr_dp_ind_long_y(mem, set_acc),
            AddrMode::Abs => self.addr_abs(mem, set_acc),
            AddrMode::AbsX => self.addr_abs_x(mem, set_acc),
            AddrMode::AbsY => self.addr_abs_y(mem, set_acc),
            AddrMode::Long => self.addr_long(mem, set_acc),
            AddrMode::LongX => self.addr_long_x(mem, set_acc),
            AddrMode::StackRel => self.addr_stack_rel(mem, set_acc),
            AddrMode::StackRelY => self.addr_stack_rel_y(mem, set_acc),
            // Jump/branch/block modes never reach the data path
            AddrMode::AbsInd
            | AddrMode::AbsIndX
            | AddrMode::AbsIndLong
            | AddrMode::Rel8
            | AddrMode::Rel16
            | AddrMode::BlockMove => 0,
        }
    }

    /// Read an operand of the given width through an effective address
    fn read_data(&mut self, mem: &mut Memory, mode: AddrMode, addr: u32, wide: bool) -> u16 {
        let set_acc = self.setacc;
        if !wide {
            mem.get_byte(addr, set_acc) as u16
        } else if data_access_bank_wraps(mode) {
            mem.get_word_bank_wrap(addr, set_acc)
        } else {
            mem.get_word(addr, set_acc)
        }
    }

    /// Write an operand of the given width through an effective address
    fn write_data(&mut self, mem: &mut Memory, mode: AddrMode, addr: u32, val: u16, wide: bool) {
        let set_acc = self.setacc;
        if !wide {
            mem.set_byte(addr, val as u8, set_acc);
        } else if data_access_bank_wraps(mode) {
            mem.set_word_bank_wrap(addr, val, set_acc);
        } else {
            mem.set_word(addr, val, set_acc);
        }
    }

    /// Execute one decoded opcode
    pub(super) fn execute(&mut self, mem: &mut Memory, opcode: u8) {
        let info = &OPCODES[opcode as usize];
        match info.mnemonic {
            // ========== Loads / Stores ==========
            Mnemonic::Lda => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                if wide {
                    self.c = val;
                    self.set_nz16(val);
                } else {
                    self.set_a(val as u8);
                    self.set_nz8(val as u8);
                }
                self.finish(info);
            }
            Mnemonic::Ldx => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.x = val;
                if wide {
                    self.set_nz16(val);
                } else {
                    self.set_nz8(val as u8);
                }
                self.finish(info);
            }
            Mnemonic::Ldy => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.y = val;
                if wide {
                    self.set_nz16(val);
                } else {
                    self.set_nz8(val as u8);
                }
                self.finish(info);
            }
            Mnemonic::Sta => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                self.write_data(mem, info.mode, addr, self.c, wide);
                self.finish(info);
            }
            Mnemonic::Stx => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                self.write_data(mem, info.mode, addr, self.x, wide);
                self.finish(info);
            }
            Mnemonic::Sty => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                self.write_data(mem, info.mode, addr, self.y, wide);
                self.finish(info);
            }
            Mnemonic::Stz => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                self.write_data(mem, info.mode, addr, 0, wide);
                self.finish(info);
            }

            // ========== Arithmetic / Logic ==========
            Mnemonic::Adc => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_adc(val, wide);
                self.finish(info);
            }
            Mnemonic::Sbc => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_sbc(val, wide);
                self.finish(info);
            }
            Mnemonic::And => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_logic(val, wide, |a, v| a & v);
                self.finish(info);
            }
            Mnemonic::Ora => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_logic(val, wide, |a, v| a | v);
                self.finish(info);
            }
            Mnemonic::Eor => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_logic(val, wide, |a, v| a ^ v);
                self.finish(info);
            }
            Mnemonic::Cmp => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                let reg = if wide { self.c } else { self.a() as u16 };
                self.op_compare(reg, val, wide);
                self.finish(info);
            }
            Mnemonic::Cpx => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_compare(self.x, val, wide);
                self.finish(info);
            }
            Mnemonic::Cpy => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.x_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                self.op_compare(self.y, val, wide);
                self.finish(info);
            }
            Mnemonic::Bit => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                let a = if wide { self.c } else { self.a() as u16 };
                self.status.z = (a & val) == 0;
                // Immediate BIT affects Z only
                if info.mode != AddrMode::Immediate {
                    if wide {
                        self.status.n = val & 0x8000 != 0;
                        self.status.v = val & 0x4000 != 0;
                    } else {
                        self.status.n = val & 0x80 != 0;
                        self.status.v = val & 0x40 != 0;
                    }
                }
                self.finish(info);
            }

            // ========== Shifts / Rotates / RMW ==========
            Mnemonic::Asl => self.rmw_op(mem, info, Self::alu_asl),
            Mnemonic::Lsr => self.rmw_op(mem, info, Self::alu_lsr),
            Mnemonic::Rol => self.rmw_op(mem, info, Self::alu_rol),
            Mnemonic::Ror => self.rmw_op(mem, info, Self::alu_ror),
            Mnemonic::Inc => self.rmw_op(mem, info, Self::alu_inc),
            Mnemonic::Dec => self.rmw_op(mem, info, Self::alu_dec),
            Mnemonic::Tsb => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                let a = if wide { self.c } else { self.a() as u16 };
                self.status.z = (a & val) == 0;
                self.write_data(mem, info.mode, addr, val | a, wide);
                self.finish(info);
            }
            Mnemonic::Trb => {
                let addr = self.resolve_addr(mem, info.mode);
                let wide = !self.m_width8();
                let val = self.read_data(mem, info.mode, addr, wide);
                let a = if wide { self.c } else { self.a() as u16 };
                self.status.z = (a & val) == 0;
                self.write_data(mem, info.mode, addr, val & !a, wide);
                self.finish(info);
            }

            // ========== Branches ==========
            Mnemonic::Bpl => self.op_branch(mem, info, !self.status.n),
            Mnemonic::Bmi => self.op_branch(mem, info, self.status.n),
            Mnemonic::Bvc => self.op_branch(mem, info, !self.status.v),
            Mnemonic::Bvs => self.op_branch(mem, info, self.status.v),
            Mnemonic::Bcc => self.op_branch(mem, info, !self.status.c),
            Mnemonic::Bcs => self.op_branch(mem, info, self.status.c),
            Mnemonic::Bne => self.op_branch(mem, info, !self.status.z),
            Mnemonic::Beq => self.op_branch(mem, info, self.status.z),
            Mnemonic::Bra => self.op_branch(mem, info, true),
            Mnemonic::Brl => {
                let target = self.addr_rel16(mem, self.setacc);
                self.pc = target as u16;
                self.cycles += info.cycles as u64;
            }

            // ========== Jumps / Calls / Returns ==========
            Mnemonic::Jmp => {
                let set_acc = self.setacc;
                match info.mode {
                    AddrMode::Abs => {
                        self.pc = self.addr_abs(mem, set_acc) as u16;
                    }
                    AddrMode::Long => {
                        let addr = self.addr_long(mem, set_acc);
                        self.pbr = (addr >> 16) as u8;
                        self.pc = addr as u16;
                    }
                    AddrMode::AbsInd => {
                        self.pc = self.addr_abs_ind(mem, set_acc);
                    }
                    AddrMode::AbsIndX => {
                        self.pc = self.addr_abs_ind_x(mem, set_acc);
                    }
                    AddrMode::AbsIndLong => {
                        let addr = self.addr_abs_ind_long(mem, set_acc);
                        self.pbr = (addr >> 16) as u8;
                        self.pc = addr as u16;
                    }
                    _ => self.status.crash = true,
                }
                self.cycles += info.cycles as u64;
            }
            Mnemonic::Jsr => {
                let set_acc = self.setacc;
                let target = match info.mode {
                    AddrMode::Abs => self.addr_abs(mem, set_acc) as u16,
                    AddrMode::AbsIndX => self.addr_abs_ind_x(mem, set_acc),
                    _ => {
                        self.status.crash = true;
                        return;
                    }
                };
                // Return address is the last byte of the instruction
                let ret = self.pc.wrapping_add(2);
                self.push_word(mem, ret, EmulationStack::Enable, set_acc);
                self.pc = target;
                self.cycles += info.cycles as u64;
            }
            Mnemonic::Jsl => {
                let set_acc = self.setacc;
                let target = self.addr_long(mem, set_acc);
                let ret = add_addr_bank_wrap(self.effective_pc(), 3);
                self.push_long(mem, ret, set_acc);
                self.pbr = (target >> 16) as u8;
                self.pc = target as u16;
                self.cycles += info.cycles as u64;
            }
            Mnemonic::Rts => {
                let ret = self.pop_word(mem, EmulationStack::Enable, self.setacc);
                self.pc = ret.wrapping_add(1);
                self.cycles += info.cycles as u64;
            }
            Mnemonic::Rtl => {
                let ret = self.pop_long(mem, self.setacc);
                self.pc = (ret as u16).wrapping_add(1);
                self.pbr = (ret >> 16) as u8;
                self.cycles += info.cycles as u64;
            }
            Mnemonic::Rti => {
                let set_acc = self.setacc;
                let sr = self.pop_byte(mem, set_acc);
                self.status.set_byte(sr);
                if self.status.e {
                    self.status.m = true;
                    self.status.xb = true;
                }
                if self.x_width8() {
                    self.x &= 0x00ff;
                    self.y &= 0x00ff;
                }
                self.pc = self.pop_word(mem, EmulationStack::Enable, set_acc);
                if self.status.e {
                    self.cycles += 6;
                } else {
                    self.pbr = self.pop_byte(mem, set_acc);
                    self.cycles += 7;
                }
            }

            // ========== Software Interrupts ==========
            Mnemonic::Brk => {
                // PC skips the signature byte
                self.update_pc(2);
                self.take_interrupt(
                    mem,
                    vectors::EMU_IRQ,
                    vectors::NATIVE_BRK,
                    Some(true),
                    true,
                );
            }
            Mnemonic::Cop => {
                self.update_pc(2);
                self.take_interrupt(
                    mem,
                    vectors::EMU_COP,
                    vectors::NATIVE_COP,
                    Some(false),
                    true,
                );
            }

            // ========== Stack Pushes / Pulls ==========
            Mnemonic::Pha => {
                let set_acc = self.setacc;
                if self.m_width8() {
                    let a = self.a();
                    self.push_byte(mem, a, set_acc);
                } else {
                    let c = self.c;
                    self.push_word(mem, c, EmulationStack::Enable, set_acc);
                }
                self.finish(info);
            }
            Mnemonic::Phx => {
                let set_acc = self.setacc;
                if self.x_width8() {
                    let x = self.x as u8;
                    self.push_byte(mem, x, set_acc);
                } else {
                    let x = self.x;
                    self.push_word(mem, x, EmulationStack::Enable, set_acc);
                }
                self.finish(info);
            }
            Mnemonic::Phy => {
                let set_acc = self.setacc;
                if self.x_width8() {
                    let y = self.y as u8;
                    self.push_byte(mem, y, set_acc);
                } else {
                    let y = self.y;
                    self.push_word(mem, y, EmulationStack::Enable, set_acc);
                }
                self.finish(info);
            }
            Mnemonic::Php => {
                let sr = self.status.to_byte();
                self.push_byte(mem, sr, self.setacc);
                self.finish(info);
            }
            Mnemonic::Phb => {
                let dbr = self.dbr;
                self.push_byte(mem, dbr, self.setacc);
                self.finish(info);
            }
            Mnemonic::Phk => {
                let pbr = self.pbr;
                self.push_byte(mem, pbr, self.setacc);
                self.finish(info);
            }
            Mnemonic::Phd => {
                let d = self.d;
                self.push_word(mem, d, EmulationStack::Disable, self.setacc);
                self.finish(info);
            }
            Mnemonic::Pla => {
                if self.m_width8() {
                    let val = self.pop_byte(mem, self.setacc);
                    self.set_a(val);
                    self.set_nz8(val);
                } else {
                    let val = self.pop_word(mem, EmulationStack::Enable, self.setacc);
                    self.c = val;
                    self.set_nz16(val);
                }
                self.finish(info);
            }
            Mnemonic::Plx => {
                if self.x_width8() {
                    let val = self.pop_byte(mem, self.setacc);
                    self.x = val as u16;
                    self.set_nz8(val);
                } else {
                    let val = self.pop_word(mem, EmulationStack::Enable, self.setacc);
                    self.x = val;
                    self.set_nz16(val);
                }
                self.finish(info);
            }
            Mnemonic::Ply => {
                if self.x_width8() {
                    let val = self.pop_byte(mem, self.setacc);
                    self.y = val as u16;
                    self.set_nz8(val);
                } else {
                    let val = self.pop_word(mem, EmulationStack::Enable, self.setacc);
                    self.y = val;
                    self.set_nz16(val);
                }
                self.finish(info);
            }
            Mnemonic::Plp => {
                let sr = self.pop_byte(mem, self.setacc);
                self.status.set_byte(sr);
                if self.status.e {
                    self.status.m = true;
                    self.status.xb = true;
                }
                if self.x_width8() {
                    self.x &= 0x00ff;
                    self.y &= 0x00ff;
                }
                self.finish(info);
            }
            Mnemonic::Plb => {
                let val = self.pop_byte(mem, self.setacc);
                self.dbr = val;
                self.set_nz8(val);
                self.finish(info);
            }
            Mnemonic::Pld => {
                let val = self.pop_word(mem, EmulationStack::Disable, self.setacc);
                self.d = val;
                self.set_nz16(val);
                self.finish(info);
            }
            Mnemonic::Pea => {
                let set_acc = self.setacc;
                let val = self.immd_word(mem, set_acc);
                self.push_word(mem, val, EmulationStack::Disable, set_acc);
                self.finish(info);
            }
            Mnemonic::Pei => {
                let set_acc = self.setacc;
                let ptr = self.addr_dp(mem, set_acc);
                let val = mem.get_word_bank_wrap(ptr, set_acc);
                self.push_word(mem, val, EmulationStack::Disable, set_acc);
                self.finish(info);
            }
            Mnemonic::Per => {
                let set_acc = self.setacc;
                let target = self.addr_rel16(mem, set_acc);
                self.push_word(mem, target as u16, EmulationStack::Disable, set_acc);
                self.finish(info);
            }

            // ========== Block Moves ==========
            Mnemonic::Mvn => self.op_block_move(mem, info, true),
            Mnemonic::Mvp => self.op_block_move(mem, info, false),

            // ========== Status Bit Instructions ==========
            Mnemonic::Clc => {
                self.status.c = false;
                self.finish(info);
            }
            Mnemonic::Sec => {
                self.status.c = true;
                self.finish(info);
            }
            Mnemonic::Cli => {
                self.status.i = false;
                self.finish(info);
            }
            Mnemonic::Sei => {
                self.status.i = true;
                self.finish(info);
            }
            Mnemonic::Cld => {
                self.status.d = false;
                self.finish(info);
            }
            Mnemonic::Sed => {
                self.status.d = true;
                self.finish(info);
            }
            Mnemonic::Clv => {
                self.status.v = false;
                self.finish(info);
            }
            Mnemonic::Rep => {
                let mask = self.immd_byte(mem, self.setacc);
                let sr = self.status.to_byte() & !mask;
                self.status.set_byte(sr);
                if self.status.e {
                    // M and X cannot leave 8-bit in emulation mode
                    self.status.m = true;
                    self.status.xb = true;
                }
                self.finish(info);
            }
            Mnemonic::Sep => {
                let mask = self.immd_byte(mem, self.setacc);
                let sr = self.status.to_byte() | mask;
                self.status.set_byte(sr);
                if self.x_width8() {
                    self.x &= 0x00ff;
                    self.y &= 0x00ff;
                }
                self.finish(info);
            }

            // ========== Index Increment / Decrement ==========
            Mnemonic::Inx => {
                if self.x_width8() {
                    self.x = (self.x as u8).wrapping_add(1) as u16;
                    self.set_nz8(self.x as u8);
                } else {
                    self.x = self.x.wrapping_add(1);
                    self.set_nz16(self.x);
                }
                self.finish(info);
            }
            Mnemonic::Iny => {
                if self.x_width8() {
                    self.y = (self.y as u8).wrapping_add(1) as u16;
                    self.set_nz8(self.y as u8);
                } else {
                    self.y = self.y.wrapping_add(1);
                    self.set_nz16(self.y);
                }
                self.finish(info);
            }
            Mnemonic::Dex => {
                if self.x_width8() {
                    self.x = (self.x as u8).wrapping_sub(1) as u16;
                    self.set_nz8(self.x as u8);
                } else {
                    self.x = self.x.wrapping_sub(1);
                    self.set_nz16(self.x);
                }
                self.finish(info);
            }
            Mnemonic::Dey => {
                if self.x_width8() {
                    self.y = (self.y as u8).wrapping_sub(1) as u16;
                    self.set_nz8(self.y as u8);
                } else {
                    self.y = self.y.wrapping_sub(1);
                    self.set_nz16(self.y);
                }
                self.finish(info);
            }

            // ========== Transfers ==========
            Mnemonic::Tax => {
                if self.x_width8() {
                    self.x = self.c & 0x00ff;
                    self.set_nz8(self.x as u8);
                } else {
                    self.x = self.c;
                    self.set_nz16(self.x);
                }
                self.finish(info);
            }
            Mnemonic::Tay => {
                if self.x_width8() {
                    self.y = self.c & 0x00ff;
                    self.set_nz8(self.y as u8);
                } else {
                    self.y = self.c;
                    self.set_nz16(self.y);
                }
                self.finish(info);
            }
            Mnemonic::Txa => {
                if self.m_width8() {
                    let val = self.x as u8;
                    self.set_a(val);
                    self.set_nz8(val);
                } else {
                    self.c = self.x;
                    self.set_nz16(self.c);
                }
                self.finish(info);
            }
            Mnemonic::Tya => {
                if self.m_width8() {
                    let val = self.y as u8;
                    self.set_a(val);
                    self.set_nz8(val);
                } else {
                    self.c = self.y;
                    self.set_nz16(self.c);
                }
                self.finish(info);
            }
            Mnemonic::Txs => {
                let x = self.x;
                self.set_sp(x);
                self.finish(info);
            }
            Mnemonic::Tsx => {
                if self.x_width8() {
                    self.x = self.sp & 0x00ff;
                    self.set_nz8(self.x as u8);
                } else {
                    self.x = self.sp;
                    self.set_nz16(self.x);
                }
                self.finish(info);
            }
            Mnemonic::Txy => {
                if self.x_width8() {
                    self.y = self.x & 0x00ff;
                    self.set_nz8(self.y as u8);
                } else {
                    self.y = self.x;
                    self.set_nz16(self.y);
                }
                self.finish(info);
            }
            Mnemonic::Tyx => {
                if self.x_width8() {
                    self.x = self.y & 0x00ff;
                    self.set_nz8(self.x as u8);
                } else {
                    self.x = self.y;
                    self.set_nz16(self.x);
                }
                self.finish(info);
            }
            Mnemonic::Tcs => {
                let c = self.c;
                self.set_sp(c);
                self.finish(info);
            }
            Mnemonic::Tsc => {
                self.c = self.sp;
                self.set_nz16(self.c);
                self.finish(info);
            }
            Mnemonic::Tcd => {
                self.d = self.c;
                self.set_nz16(self.d);
                self.finish(info);
            }
            Mnemonic::Tdc => {
                self.c = self.d;
                self.set_nz16(self.c);
                self.finish(info);
            }

            // ========== Mode Switches ==========
            Mnemonic::Xba => {
                self.c = (self.c << 8) | (self.c >> 8);
                self.set_nz8(self.c as u8);
                self.finish(info);
            }
            Mnemonic::Xce => {
                let carry = self.status.c;
                self.status.c = self.status.e;
                self.status.e = carry;
                if self.status.e {
                    self.status.m = true;
                    self.status.xb = true;
                    self.x &= 0x00ff;
                    self.y &= 0x00ff;
                    self.sp = (self.sp & 0x00ff) | 0x0100;
                }
                self.finish(info);
            }

            // ========== Misc ==========
            Mnemonic::Nop => self.finish(info),
            Mnemonic::Wdm => self.finish(info),
            Mnemonic::Wai => {
                // Interrupts are serviced at step boundaries, so waiting
                // collapses into completing the instruction
                self.finish(info);
            }
            Mnemonic::Stp => {
                self.status.stp = true;
                self.finish(info);
            }
        }
    }

    // ========== ALU Primitives ==========

    fn op_adc(&mut self, val: u16, wide: bool) {
        let (mask, sign, nibbles) = if wide {
            (0xffffu32, 0x8000u32, 4)
        } else {
            (0xff, 0x80, 2)
        };
        let a = if wide { self.c as u32 } else { self.a() as u32 };
        let v = val as u32 & mask;
        let cin = self.status.c as u32;

        let bin = a + v + cin;
        self.status.v = (!(a ^ v) & (a ^ bin) & sign) != 0;

        let result = if self.status.d {
            let (r, carry) = bcd_add(a, v, cin, nibbles);
            self.status.c = carry;
            r
        } else {
            self.status.c = bin > mask;
            bin & mask
        };

        if wide {
            self.c = result as u16;
            self.set_nz16(result as u16);
        } else {
            self.set_a(result as u8);
            self.set_nz8(result as u8);
        }
    }

    fn op_sbc(&mut self, val: u16, wide: bool) {
        let (mask, sign, nibbles) = if wide {
            (0xffffu32, 0x8000u32, 4)
        } else {
            (0xff, 0x80, 2)
        };
        let a = if wide { self.c as u32 } else { self.a() as u32 };
        let v = val as u32 & mask;
        let cin = self.status.c as u32;

        // Binary subtraction is addition of the complement
        let bin = a + (!v & mask) + cin;
        self.status.v = ((a ^ v) & (a ^ bin) & sign) != 0;

        let result = if self.status.d {
            let (r, carry) = bcd_sub(a, v, 1 - cin, nibbles);
            self.status.c = carry;
            r
        } else {
            self.status.c = bin > mask;
            bin & mask
        };

        if wide {
            self.c = result as u16;
            self.set_nz16(result as u16);
        } else {
            self.set_a(result as u8);
            self.set_nz8(result as u8);
        }
    }

    fn op_logic(&mut self, val: u16, wide: bool, f: fn(u16, u16) -> u16) {
        if wide {
            self.c = f(self.c, val);
            self.set_nz16(self.c);
        } else {
            let result = f(self.a() as u16, val) as u8;
            self.set_a(result);
            self.set_nz8(result);
        }
    }

    fn op_compare(&mut self, reg: u16, val: u16, wide: bool) {
        if wide {
            let result = reg.wrapping_sub(val);
            self.status.c = reg >= val;
            self.set_nz16(result);
        } else {
            let result = (reg as u8).wrapping_sub(val as u8);
            self.status.c = (reg as u8) >= (val as u8);
            self.set_nz8(result);
        }
    }

    fn alu_asl(&mut self, val: u16, wide: bool) -> u16 {
        let (result, carry) = if wide {
            (val << 1, val & 0x8000 != 0)
        } else {
            ((val << 1) & 0xff, val & 0x80 != 0)
        };
        self.status.c = carry;
        result
    }

    fn alu_lsr(&mut self, val: u16, _wide: bool) -> u16 {
        self.status.c = val & 0x0001 != 0;
        val >> 1
    }

    fn alu_rol(&mut self, val: u16, wide: bool) -> u16 {
        let cin = self.status.c as u16;
        let (result, carry) = if wide {
            ((val << 1) | cin, val & 0x8000 != 0)
        } else {
            (((val << 1) | cin) & 0xff, val & 0x80 != 0)
        };
        self.status.c = carry;
        result
    }

    fn alu_ror(&mut self, val: u16, wide: bool) -> u16 {
        let cin = self.status.c as u16;
        let result = if wide {
            (val >> 1) | (cin << 15)
        } else {
            ((val >> 1) | (cin << 7)) & 0xff
        };
        self.status.c = val & 0x0001 != 0;
        result
    }

    fn alu_inc(&mut self, val: u16, wide: bool) -> u16 {
        if wide {
            val.wrapping_add(1)
        } else {
            (val as u8).wrapping_add(1) as u16
        }
    }

    fn alu_dec(&mut self, val: u16, wide: bool) -> u16 {
        if wide {
            val.wrapping_sub(1)
        } else {
            (val as u8).wrapping_sub(1) as u16
        }
    }

    /// Shared read-modify-write sequencing for shifts, rotates, and
    /// increments, on the accumulator (implied) or through memory
    fn rmw_op(&mut self, mem: &mut Memory, info: &OpInfo, f: fn(&mut Self, u16, bool) -> u16) {
        let wide = !self.m_width8();
        if info.mode == AddrMode::Implied {
            let val = if wide { self.c } else { self.a() as u16 };
            let result = f(self, val, wide);
            if wide {
                self.c = result;
                self.set_nz16(result);
            } else {
                self.set_a(result as u8);
                self.set_nz8(result as u8);
            }
        } else {
            let addr = self.resolve_addr(mem, info.mode);
            let val = self.read_data(mem, info.mode, addr, wide);
            let result = f(self, val, wide);
            self.write_data(mem, info.mode, addr, result, wide);
            if wide {
                self.set_nz16(result);
            } else {
                self.set_nz8(result as u8);
            }
        }
        self.finish(info);
    }

    /// Conditional 8-bit relative branch
    fn op_branch(&mut self, mem: &mut Memory, info: &OpInfo, taken: bool) {
        let target = self.addr_rel8(mem, self.setacc);
        if taken {
            self.pc = target as u16;
        } else {
            self.update_pc(2);
        }
        self.cycles += info.cycles as u64;
    }

    /// One step of MVN (forward) or MVP (backward)
    ///
    /// Moves a single byte per execution and repeats at the same PC until
    /// the 16-bit count in C wraps past zero. DBR is left pointing at the
    /// destination bank.
    fn op_block_move(&mut self, mem: &mut Memory, info: &OpInfo, forward: bool) {
        let set_acc = self.setacc;
        let dst_bank = self.immd_byte(mem, set_acc);
        let src_bank = mem.get_byte(add_addr_bank_wrap(self.effective_pc(), 2), set_acc);

        let index_mask: u16 = if self.x_width8() { 0x00ff } else { 0xffff };
        let src = ((src_bank as u32) << 16) | (self.x & index_mask) as u32;
        let dst = ((dst_bank as u32) << 16) | (self.y & index_mask) as u32;
        let byte = mem.get_byte(src, set_acc);
        mem.set_byte(dst, byte, set_acc);

        let delta: u16 = if forward { 1 } else { 0xffff };
        self.x = self.x.wrapping_add(delta) & index_mask;
        self.y = self.y.wrapping_add(delta) & index_mask;
        self.dbr = dst_bank;

        self.c = self.c.wrapping_sub(1);
        if self.c == 0xffff {
            self.update_pc(3);
        }
        self.cycles += info.cycles as u64;
    }
}

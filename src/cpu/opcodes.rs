//! 65C816 opcode table
//!
//! One 256-entry table describes every opcode: mnemonic, addressing mode,
//! the register whose width governs immediate operands, instruction length
//! in bytes, and the base cycle count. Both the interpreter dispatch and
//! the disassembler read this table, so the two can never disagree about
//! instruction shape.
//!
//! Lengths are the static encoding lengths; immediate operands grow by one
//! byte when the governing register is 16 bits wide, which the consumers
//! account for themselves. Base cycles do not model branch-taken,
//! page-cross, or width adjustments.

/// Addressing modes of the 65C816
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// Operates on registers only
    Implied,
    /// Operand follows the opcode (1 or 2 bytes wide)
    Immediate,
    /// dp
    Dp,
    /// dp,X
    DpX,
    /// dp,Y
    DpY,
    /// (dp)
    DpInd,
    /// [dp]
    DpIndLong,
    /// (dp,X)
    DpIndX,
    /// (dp),Y
    DpIndY,
    /// [dp],Y
    DpIndLongY,
    /// abs
    Abs,
    /// abs,X
    AbsX,
    /// abs,Y
    AbsY,
    /// (abs)
    AbsInd,
    /// (abs,X)
    AbsIndX,
    /// [abs]
    AbsIndLong,
    /// long
    Long,
    /// long,X
    LongX,
    /// sr,S
    StackRel,
    /// (sr,S),Y
    StackRelY,
    /// 8-bit PC-relative
    Rel8,
    /// 16-bit PC-relative
    Rel16,
    /// Block move (src bank, dest bank)
    BlockMove,
}

/// Which register's width governs an immediate operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegRole {
    /// Width-independent instruction
    None,
    /// Accumulator/memory width (M flag)
    A,
    /// Index width (X flag)
    X,
}

/// Instruction mnemonics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Bra, Brk, Brl, Bvc,
    Bvs, Clc, Cld, Cli, Clv, Cmp, Cop, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc,
    Inx, Iny, Jmp, Jsl, Jsr, Lda, Ldx, Ldy, Lsr, Mvn, Mvp, Nop, Ora, Pea,
    Pei, Per, Pha, Phb, Phd, Phk, Php, Phx, Phy, Pla, Plb, Pld, Plp, Plx,
    Ply, Rep, Rol, Ror, Rti, Rtl, Rts, Sbc, Sec, Sed, Sei, Sep, Sta, Stp,
    Stx, Sty, Stz, Tax, Tay, Tcd, Tcs, Tdc, Trb, Tsb, Tsc, Tsx, Txa, Txs,
    Txy, Tya, Tyx, Wai, Wdm, Xba, Xce,
}

impl Mnemonic {
    /// Three-letter assembly name
    #[rustfmt::skip]
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC", Mnemonic::And => "AND", Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC", Mnemonic::Bcs => "BCS", Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT", Mnemonic::Bmi => "BMI", Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL", Mnemonic::Bra => "BRA", Mnemonic::Brk => "BRK",
            Mnemonic::Brl => "BRL", Mnemonic::Bvc => "BVC", Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC", Mnemonic::Cld => "CLD", Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV", Mnemonic::Cmp => "CMP", Mnemonic::Cop => "COP",
            Mnemonic::Cpx => "CPX", Mnemonic::Cpy => "CPY", Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX", Mnemonic::Dey => "DEY", Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC", Mnemonic::Inx => "INX", Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP", Mnemonic::Jsl => "JSL", Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA", Mnemonic::Ldx => "LDX", Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR", Mnemonic::Mvn => "MVN", Mnemonic::Mvp => "MVP",
            Mnemonic::Nop => "NOP", Mnemonic::Ora => "ORA", Mnemonic::Pea => "PEA",
            Mnemonic::Pei => "PEI", Mnemonic::Per => "PER", Mnemonic::Pha => "PHA",
            Mnemonic::Phb => "PHB", Mnemonic::Phd => "PHD", Mnemonic::Phk => "PHK",
            Mnemonic::Php => "PHP", Mnemonic::Phx => "PHX", Mnemonic::Phy => "PHY",
            Mnemonic::Pla => "PLA", Mnemonic::Plb => "PLB", Mnemonic::Pld => "PLD",
            Mnemonic::Plp => "PLP", Mnemonic::Plx => "PLX", Mnemonic::Ply => "PLY",
            Mnemonic::Rep => "REP", Mnemonic::Rol => "ROL", Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI", Mnemonic::Rtl => "RTL", Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC", Mnemonic::Sec => "SEC", Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI", Mnemonic::Sep => "SEP", Mnemonic::Sta => "STA",
            Mnemonic::Stp => "STP", Mnemonic::Stx => "STX", Mnemonic::Sty => "STY",
            Mnemonic::Stz => "STZ", Mnemonic::Tax => "TAX", Mnemonic::Tay => "TAY",
            Mnemonic::Tcd => "TCD", Mnemonic::Tcs => "TCS", Mnemonic::Tdc => "TDC",
            Mnemonic::Trb => "TRB", Mnemonic::Tsb => "TSB", Mnemonic::Tsc => "TSC",
            Mnemonic::Tsx => "TSX", Mnemonic::Txa => "TXA", Mnemonic::Txs => "TXS",
            Mnemonic::Txy => "TXY", Mnemonic::Tya => "TYA", Mnemonic::Tyx => "TYX",
            Mnemonic::Wai => "WAI", Mnemonic::Wdm => "WDM", Mnemonic::Xba => "XBA",
            Mnemonic::Xce => "XCE",
        }
    }
}

/// One opcode table entry
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    /// Assembly mnemonic
    pub mnemonic: Mnemonic,
    /// Addressing mode
    pub mode: AddrMode,
    /// Register whose width governs an immediate operand
    pub reg: RegRole,
    /// Encoded length in bytes (before immediate-width growth)
    pub length: u8,
    /// Base cycle count
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, reg: RegRole, length: u8, cycles: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        mode,
        reg,
        length,
        cycles,
    }
}

use AddrMode as Am;
use Mnemonic as Mn;
use RegRole as Rr;

/// The full opcode map, indexed by opcode byte
#[rustfmt::skip]
pub static OPCODES: [OpInfo; 256] = [
    // 0x00
    op(Mn::Brk, Am::Dp,         Rr::None, 2, 7),
    op(Mn::Ora, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Cop, Am::Dp,         Rr::None, 2, 7),
    op(Mn::Ora, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Tsb, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Ora, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Asl, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Ora, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Php, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Ora, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Asl, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Phd, Am::Implied,    Rr::None, 1, 4),
    op(Mn::Tsb, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Ora, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Asl, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Ora, Am::Long,       Rr::A,    4, 5),
    // 0x10
    op(Mn::Bpl, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Ora, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Ora, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Ora, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Trb, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Ora, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Asl, Am::DpX,        Rr::A,    2, 6),
    op(Mn::Ora, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Clc, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Ora, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Inc, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Tcs, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Trb, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Ora, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Asl, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::Ora, Am::LongX,      Rr::A,    4, 5),
    // 0x20
    op(Mn::Jsr, Am::Abs,        Rr::None, 3, 6),
    op(Mn::And, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Jsl, Am::Long,       Rr::None, 4, 8),
    op(Mn::And, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Bit, Am::Dp,         Rr::A,    2, 3),
    op(Mn::And, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Rol, Am::Dp,         Rr::A,    2, 5),
    op(Mn::And, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Plp, Am::Implied,    Rr::None, 1, 4),
    op(Mn::And, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Rol, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Pld, Am::Implied,    Rr::None, 1, 5),
    op(Mn::Bit, Am::Abs,        Rr::A,    3, 4),
    op(Mn::And, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Rol, Am::Abs,        Rr::A,    3, 6),
    op(Mn::And, Am::Long,       Rr::A,    4, 5),
    // 0x30
    op(Mn::Bmi, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::And, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::And, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::And, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Bit, Am::DpX,        Rr::A,    2, 4),
    op(Mn::And, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Rol, Am::DpX,        Rr::A,    2, 6),
    op(Mn::And, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Sec, Am::Implied,    Rr::None, 1, 2),
    op(Mn::And, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Dec, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Tsc, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Bit, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::And, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Rol, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::And, Am::LongX,      Rr::A,    4, 5),
    // 0x40
    op(Mn::Rti, Am::Implied,    Rr::None, 1, 6),
    op(Mn::Eor, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Wdm, Am::Immediate,  Rr::None, 2, 2),
    op(Mn::Eor, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Mvp, Am::BlockMove,  Rr::None, 3, 7),
    op(Mn::Eor, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Lsr, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Eor, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Pha, Am::Implied,    Rr::A,    1, 3),
    op(Mn::Eor, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Lsr, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Phk, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Jmp, Am::Abs,        Rr::None, 3, 3),
    op(Mn::Eor, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Lsr, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Eor, Am::Long,       Rr::A,    4, 5),
    // 0x50
    op(Mn::Bvc, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Eor, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Eor, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Eor, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Mvn, Am::BlockMove,  Rr::None, 3, 7),
    op(Mn::Eor, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Lsr, Am::DpX,        Rr::A,    2, 6),
    op(Mn::Eor, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Cli, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Eor, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Phy, Am::Implied,    Rr::X,    1, 3),
    op(Mn::Tcd, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Jmp, Am::Long,       Rr::None, 4, 4),
    op(Mn::Eor, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Lsr, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::Eor, Am::LongX,      Rr::A,    4, 5),
    // 0x60
    op(Mn::Rts, Am::Implied,    Rr::None, 1, 6),
    op(Mn::Adc, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Per, Am::Rel16,      Rr::None, 3, 6),
    op(Mn::Adc, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Stz, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Adc, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Ror, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Adc, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Pla, Am::Implied,    Rr::A,    1, 4),
    op(Mn::Adc, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Ror, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Rtl, Am::Implied,    Rr::None, 1, 6),
    op(Mn::Jmp, Am::AbsInd,     Rr::None, 3, 5),
    op(Mn::Adc, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Ror, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Adc, Am::Long,       Rr::A,    4, 5),
    // 0x70
    op(Mn::Bvs, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Adc, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Adc, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Adc, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Stz, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Adc, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Ror, Am::DpX,        Rr::A,    2, 6),
    op(Mn::Adc, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Sei, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Adc, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Ply, Am::Implied,    Rr::X,    1, 4),
    op(Mn::Tdc, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Jmp, Am::AbsIndX,    Rr::None, 3, 6),
    op(Mn::Adc, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Ror, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::Adc, Am::LongX,      Rr::A,    4, 5),
    // 0x80
    op(Mn::Bra, Am::Rel8,       Rr::None, 2, 3),
    op(Mn::Sta, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Brl, Am::Rel16,      Rr::None, 3, 4),
    op(Mn::Sta, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Sty, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Sta, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Stx, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Sta, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Dey, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Bit, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Txa, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Phb, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Sty, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Sta, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Stx, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Sta, Am::Long,       Rr::A,    4, 5),
    // 0x90
    op(Mn::Bcc, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Sta, Am::DpIndY,     Rr::A,    2, 6),
    op(Mn::Sta, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Sta, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Sty, Am::DpX,        Rr::X,    2, 4),
    op(Mn::Sta, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Stx, Am::DpY,        Rr::X,    2, 4),
    op(Mn::Sta, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Tya, Am::Implied,    Rr::A,    1, 2),
    op(Mn::Sta, Am::AbsY,       Rr::A,    3, 5),
    op(Mn::Txs, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Txy, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Stz, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Sta, Am::AbsX,       Rr::A,    3, 5),
    op(Mn::Stz, Am::AbsX,       Rr::A,    3, 5),
    op(Mn::Sta, Am::LongX,      Rr::A,    4, 5),
    // 0xa0
    op(Mn::Ldy, Am::Immediate,  Rr::X,    2, 2),
    op(Mn::Lda, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Ldx, Am::Immediate,  Rr::X,    2, 2),
    op(Mn::Lda, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Ldy, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Lda, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Ldx, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Lda, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Tay, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Lda, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Tax, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Plb, Am::Implied,    Rr::None, 1, 4),
    op(Mn::Ldy, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Lda, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Ldx, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Lda, Am::Long,       Rr::A,    4, 5),
    // 0xb0
    op(Mn::Bcs, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Lda, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Lda, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Lda, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Ldy, Am::DpX,        Rr::X,    2, 4),
    op(Mn::Lda, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Ldx, Am::DpY,        Rr::X,    2, 4),
    op(Mn::Lda, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Clv, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Lda, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Tsx, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Tyx, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Ldy, Am::AbsX,       Rr::X,    3, 4),
    op(Mn::Lda, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Ldx, Am::AbsY,       Rr::X,    3, 4),
    op(Mn::Lda, Am::LongX,      Rr::A,    4, 5),
    // 0xc0
    op(Mn::Cpy, Am::Immediate,  Rr::X,    2, 2),
    op(Mn::Cmp, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Rep, Am::Immediate,  Rr::None, 2, 3),
    op(Mn::Cmp, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Cpy, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Cmp, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Dec, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Cmp, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Iny, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Cmp, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Dex, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Wai, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Cpy, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Cmp, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Dec, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Cmp, Am::Long,       Rr::A,    4, 5),
    // 0xd0
    op(Mn::Bne, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Cmp, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Cmp, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Cmp, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Pei, Am::DpInd,      Rr::None, 2, 6),
    op(Mn::Cmp, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Dec, Am::DpX,        Rr::A,    2, 6),
    op(Mn::Cmp, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Cld, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Cmp, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Phx, Am::Implied,    Rr::X,    1, 3),
    op(Mn::Stp, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Jmp, Am::AbsIndLong, Rr::None, 3, 6),
    op(Mn::Cmp, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Dec, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::Cmp, Am::LongX,      Rr::A,    4, 5),
    // 0xe0
    op(Mn::Cpx, Am::Immediate,  Rr::X,    2, 2),
    op(Mn::Sbc, Am::DpIndX,     Rr::A,    2, 6),
    op(Mn::Sep, Am::Immediate,  Rr::None, 2, 3),
    op(Mn::Sbc, Am::StackRel,   Rr::A,    2, 4),
    op(Mn::Cpx, Am::Dp,         Rr::X,    2, 3),
    op(Mn::Sbc, Am::Dp,         Rr::A,    2, 3),
    op(Mn::Inc, Am::Dp,         Rr::A,    2, 5),
    op(Mn::Sbc, Am::DpIndLong,  Rr::A,    2, 6),
    op(Mn::Inx, Am::Implied,    Rr::X,    1, 2),
    op(Mn::Sbc, Am::Immediate,  Rr::A,    2, 2),
    op(Mn::Nop, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Xba, Am::Implied,    Rr::None, 1, 3),
    op(Mn::Cpx, Am::Abs,        Rr::X,    3, 4),
    op(Mn::Sbc, Am::Abs,        Rr::A,    3, 4),
    op(Mn::Inc, Am::Abs,        Rr::A,    3, 6),
    op(Mn::Sbc, Am::Long,       Rr::A,    4, 5),
    // 0xf0
    op(Mn::Beq, Am::Rel8,       Rr::None, 2, 2),
    op(Mn::Sbc, Am::DpIndY,     Rr::A,    2, 5),
    op(Mn::Sbc, Am::DpInd,      Rr::A,    2, 5),
    op(Mn::Sbc, Am::StackRelY,  Rr::A,    2, 7),
    op(Mn::Pea, Am::Abs,        Rr::None, 3, 5),
    op(Mn::Sbc, Am::DpX,        Rr::A,    2, 4),
    op(Mn::Inc, Am::DpX,        Rr::A,    2, 6),
    op(Mn::Sbc, Am::DpIndLongY, Rr::A,    2, 6),
    op(Mn::Sed, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Sbc, Am::AbsY,       Rr::A,    3, 4),
    op(Mn::Plx, Am::Implied,    Rr::X,    1, 4),
    op(Mn::Xce, Am::Implied,    Rr::None, 1, 2),
    op(Mn::Jsr, Am::AbsIndX,    Rr::None, 3, 8),
    op(Mn::Sbc, Am::AbsX,       Rr::A,    3, 4),
    op(Mn::Inc, Am::AbsX,       Rr::A,    3, 7),
    op(Mn::Sbc, Am::LongX,      Rr::A,    4, 5),
];

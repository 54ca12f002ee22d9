use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    ZeroPage_X,
    ZeroPage_Y,
    Absolute,
    Absolute_X,
    Absolute_Y,
    Indirect_X,
    Indirect_Y,
    /// Implied, accumulator, relative and the JMP/JSR forms that fetch their own operand.
    NoneAddressing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc,
    Ahx,
    Alr,
    Anc,
    And,
    Arr,
    Asl,
    Axs,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dcp,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Isb,
    Jmp,
    Jsr,
    Las,
    Lax,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Lxa,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rla,
    Rol,
    Ror,
    Rra,
    Rti,
    Rts,
    Sax,
    Sbc,
    Sec,
    Sed,
    Sei,
    Shx,
    Shy,
    Slo,
    Sre,
    Sta,
    Stx,
    Sty,
    Tas,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    Xaa,
}

impl Mnemonic {
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::Ahx => "AHX",
            Mnemonic::Alr => "ALR",
            Mnemonic::Anc => "ANC",
            Mnemonic::And => "AND",
            Mnemonic::Arr => "ARR",
            Mnemonic::Asl => "ASL",
            Mnemonic::Axs => "AXS",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dcp => "DCP",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Isb => "ISB",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Las => "LAS",
            Mnemonic::Lax => "LAX",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Lxa => "LXA",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rla => "RLA",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rra => "RRA",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sax => "SAX",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Shx => "SHX",
            Mnemonic::Shy => "SHY",
            Mnemonic::Slo => "SLO",
            Mnemonic::Sre => "SRE",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tas => "TAS",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
            Mnemonic::Xaa => "XAA",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    /// Instruction length in bytes, opcode included.
    pub len: u8,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
    pub mode: AddressingMode,
    pub official: bool,
}

impl OpCode {
    const fn new(code: u8, mnemonic: Mnemonic, len: u8, cycles: u8, mode: AddressingMode) -> Self {
        OpCode {
            code,
            mnemonic,
            len,
            cycles,
            mode,
            official: true,
        }
    }

    const fn unofficial(
        code: u8,
        mnemonic: Mnemonic,
        len: u8,
        cycles: u8,
        mode: AddressingMode,
    ) -> Self {
        OpCode {
            official: false,
            ..OpCode::new(code, mnemonic, len, cycles, mode)
        }
    }
}

/// Decodes an opcode byte.
///
/// The twelve JAM bytes (0x02, 0x12, ... 0xF2) freeze a real 6502 and are left
/// undecoded.
pub fn lookup(code: u8) -> Option<OpCode> {
    use AddressingMode::*;
    use Mnemonic::*;

    let op = match code {
        0x00 => OpCode::new(code, Brk, 1, 7, NoneAddressing),
        0x01 => OpCode::new(code, Ora, 2, 6, Indirect_X),
        0x03 => OpCode::unofficial(code, Slo, 2, 8, Indirect_X),
        0x04 => OpCode::unofficial(code, Nop, 2, 3, ZeroPage),
        0x05 => OpCode::new(code, Ora, 2, 3, ZeroPage),
        0x06 => OpCode::new(code, Asl, 2, 5, ZeroPage),
        0x07 => OpCode::unofficial(code, Slo, 2, 5, ZeroPage),
        0x08 => OpCode::new(code, Php, 1, 3, NoneAddressing),
        0x09 => OpCode::new(code, Ora, 2, 2, Immediate),
        0x0A => OpCode::new(code, Asl, 1, 2, NoneAddressing),
        0x0B => OpCode::unofficial(code, Anc, 2, 2, Immediate),
        0x0C => OpCode::unofficial(code, Nop, 3, 4, Absolute),
        0x0D => OpCode::new(code, Ora, 3, 4, Absolute),
        0x0E => OpCode::new(code, Asl, 3, 6, Absolute),
        0x0F => OpCode::unofficial(code, Slo, 3, 6, Absolute),
        0x10 => OpCode::new(code, Bpl, 2, 2, NoneAddressing),
        0x11 => OpCode::new(code, Ora, 2, 5, Indirect_Y),
        0x13 => OpCode::unofficial(code, Slo, 2, 8, Indirect_Y),
        0x14 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0x15 => OpCode::new(code, Ora, 2, 4, ZeroPage_X),
        0x16 => OpCode::new(code, Asl, 2, 6, ZeroPage_X),
        0x17 => OpCode::unofficial(code, Slo, 2, 6, ZeroPage_X),
        0x18 => OpCode::new(code, Clc, 1, 2, NoneAddressing),
        0x19 => OpCode::new(code, Ora, 3, 4, Absolute_Y),
        0x1A => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0x1B => OpCode::unofficial(code, Slo, 3, 7, Absolute_Y),
        0x1C => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0x1D => OpCode::new(code, Ora, 3, 4, Absolute_X),
        0x1E => OpCode::new(code, Asl, 3, 7, Absolute_X),
        0x1F => OpCode::unofficial(code, Slo, 3, 7, Absolute_X),
        0x20 => OpCode::new(code, Jsr, 3, 6, NoneAddressing),
        0x21 => OpCode::new(code, And, 2, 6, Indirect_X),
        0x23 => OpCode::unofficial(code, Rla, 2, 8, Indirect_X),
        0x24 => OpCode::new(code, Bit, 2, 3, ZeroPage),
        0x25 => OpCode::new(code, And, 2, 3, ZeroPage),
        0x26 => OpCode::new(code, Rol, 2, 5, ZeroPage),
        0x27 => OpCode::unofficial(code, Rla, 2, 5, ZeroPage),
        0x28 => OpCode::new(code, Plp, 1, 4, NoneAddressing),
        0x29 => OpCode::new(code, And, 2, 2, Immediate),
        0x2A => OpCode::new(code, Rol, 1, 2, NoneAddressing),
        0x2B => OpCode::unofficial(code, Anc, 2, 2, Immediate),
        0x2C => OpCode::new(code, Bit, 3, 4, Absolute),
        0x2D => OpCode::new(code, And, 3, 4, Absolute),
        0x2E => OpCode::new(code, Rol, 3, 6, Absolute),
        0x2F => OpCode::unofficial(code, Rla, 3, 6, Absolute),
        0x30 => OpCode::new(code, Bmi, 2, 2, NoneAddressing),
        0x31 => OpCode::new(code, And, 2, 5, Indirect_Y),
        0x33 => OpCode::unofficial(code, Rla, 2, 8, Indirect_Y),
        0x34 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0x35 => OpCode::new(code, And, 2, 4, ZeroPage_X),
        0x36 => OpCode::new(code, Rol, 2, 6, ZeroPage_X),
        0x37 => OpCode::unofficial(code, Rla, 2, 6, ZeroPage_X),
        0x38 => OpCode::new(code, Sec, 1, 2, NoneAddressing),
        0x39 => OpCode::new(code, And, 3, 4, Absolute_Y),
        0x3A => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0x3B => OpCode::unofficial(code, Rla, 3, 7, Absolute_Y),
        0x3C => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0x3D => OpCode::new(code, And, 3, 4, Absolute_X),
        0x3E => OpCode::new(code, Rol, 3, 7, Absolute_X),
        0x3F => OpCode::unofficial(code, Rla, 3, 7, Absolute_X),
        0x40 => OpCode::new(code, Rti, 1, 6, NoneAddressing),
        0x41 => OpCode::new(code, Eor, 2, 6, Indirect_X),
        0x43 => OpCode::unofficial(code, Sre, 2, 8, Indirect_X),
        0x44 => OpCode::unofficial(code, Nop, 2, 3, ZeroPage),
        0x45 => OpCode::new(code, Eor, 2, 3, ZeroPage),
        0x46 => OpCode::new(code, Lsr, 2, 5, ZeroPage),
        0x47 => OpCode::unofficial(code, Sre, 2, 5, ZeroPage),
        0x48 => OpCode::new(code, Pha, 1, 3, NoneAddressing),
        0x49 => OpCode::new(code, Eor, 2, 2, Immediate),
        0x4A => OpCode::new(code, Lsr, 1, 2, NoneAddressing),
        0x4B => OpCode::unofficial(code, Alr, 2, 2, Immediate),
        0x4C => OpCode::new(code, Jmp, 3, 3, NoneAddressing),
        0x4D => OpCode::new(code, Eor, 3, 4, Absolute),
        0x4E => OpCode::new(code, Lsr, 3, 6, Absolute),
        0x4F => OpCode::unofficial(code, Sre, 3, 6, Absolute),
        0x50 => OpCode::new(code, Bvc, 2, 2, NoneAddressing),
        0x51 => OpCode::new(code, Eor, 2, 5, Indirect_Y),
        0x53 => OpCode::unofficial(code, Sre, 2, 8, Indirect_Y),
        0x54 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0x55 => OpCode::new(code, Eor, 2, 4, ZeroPage_X),
        0x56 => OpCode::new(code, Lsr, 2, 6, ZeroPage_X),
        0x57 => OpCode::unofficial(code, Sre, 2, 6, ZeroPage_X),
        0x58 => OpCode::new(code, Cli, 1, 2, NoneAddressing),
        0x59 => OpCode::new(code, Eor, 3, 4, Absolute_Y),
        0x5A => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0x5B => OpCode::unofficial(code, Sre, 3, 7, Absolute_Y),
        0x5C => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0x5D => OpCode::new(code, Eor, 3, 4, Absolute_X),
        0x5E => OpCode::new(code, Lsr, 3, 7, Absolute_X),
        0x5F => OpCode::unofficial(code, Sre, 3, 7, Absolute_X),
        0x60 => OpCode::new(code, Rts, 1, 6, NoneAddressing),
        0x61 => OpCode::new(code, Adc, 2, 6, Indirect_X),
        0x63 => OpCode::unofficial(code, Rra, 2, 8, Indirect_X),
        0x64 => OpCode::unofficial(code, Nop, 2, 3, ZeroPage),
        0x65 => OpCode::new(code, Adc, 2, 3, ZeroPage),
        0x66 => OpCode::new(code, Ror, 2, 5, ZeroPage),
        0x67 => OpCode::unofficial(code, Rra, 2, 5, ZeroPage),
        0x68 => OpCode::new(code, Pla, 1, 4, NoneAddressing),
        0x69 => OpCode::new(code, Adc, 2, 2, Immediate),
        0x6A => OpCode::new(code, Ror, 1, 2, NoneAddressing),
        0x6B => OpCode::unofficial(code, Arr, 2, 2, Immediate),
        0x6C => OpCode::new(code, Jmp, 3, 5, NoneAddressing),
        0x6D => OpCode::new(code, Adc, 3, 4, Absolute),
        0x6E => OpCode::new(code, Ror, 3, 6, Absolute),
        0x6F => OpCode::unofficial(code, Rra, 3, 6, Absolute),
        0x70 => OpCode::new(code, Bvs, 2, 2, NoneAddressing),
        0x71 => OpCode::new(code, Adc, 2, 5, Indirect_Y),
        0x73 => OpCode::unofficial(code, Rra, 2, 8, Indirect_Y),
        0x74 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0x75 => OpCode::new(code, Adc, 2, 4, ZeroPage_X),
        0x76 => OpCode::new(code, Ror, 2, 6, ZeroPage_X),
        0x77 => OpCode::unofficial(code, Rra, 2, 6, ZeroPage_X),
        0x78 => OpCode::new(code, Sei, 1, 2, NoneAddressing),
        0x79 => OpCode::new(code, Adc, 3, 4, Absolute_Y),
        0x7A => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0x7B => OpCode::unofficial(code, Rra, 3, 7, Absolute_Y),
        0x7C => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0x7D => OpCode::new(code, Adc, 3, 4, Absolute_X),
        0x7E => OpCode::new(code, Ror, 3, 7, Absolute_X),
        0x7F => OpCode::unofficial(code, Rra, 3, 7, Absolute_X),
        0x80 => OpCode::unofficial(code, Nop, 2, 2, Immediate),
        0x81 => OpCode::new(code, Sta, 2, 6, Indirect_X),
        0x82 => OpCode::unofficial(code, Nop, 2, 2, Immediate),
        0x83 => OpCode::unofficial(code, Sax, 2, 6, Indirect_X),
        0x84 => OpCode::new(code, Sty, 2, 3, ZeroPage),
        0x85 => OpCode::new(code, Sta, 2, 3, ZeroPage),
        0x86 => OpCode::new(code, Stx, 2, 3, ZeroPage),
        0x87 => OpCode::unofficial(code, Sax, 2, 3, ZeroPage),
        0x88 => OpCode::new(code, Dey, 1, 2, NoneAddressing),
        0x89 => OpCode::unofficial(code, Nop, 2, 2, Immediate),
        0x8A => OpCode::new(code, Txa, 1, 2, NoneAddressing),
        0x8B => OpCode::unofficial(code, Xaa, 2, 2, Immediate),
        0x8C => OpCode::new(code, Sty, 3, 4, Absolute),
        0x8D => OpCode::new(code, Sta, 3, 4, Absolute),
        0x8E => OpCode::new(code, Stx, 3, 4, Absolute),
        0x8F => OpCode::unofficial(code, Sax, 3, 4, Absolute),
        0x90 => OpCode::new(code, Bcc, 2, 2, NoneAddressing),
        0x91 => OpCode::new(code, Sta, 2, 6, Indirect_Y),
        0x93 => OpCode::unofficial(code, Ahx, 2, 6, Indirect_Y),
        0x94 => OpCode::new(code, Sty, 2, 4, ZeroPage_X),
        0x95 => OpCode::new(code, Sta, 2, 4, ZeroPage_X),
        0x96 => OpCode::new(code, Stx, 2, 4, ZeroPage_Y),
        0x97 => OpCode::unofficial(code, Sax, 2, 4, ZeroPage_Y),
        0x98 => OpCode::new(code, Tya, 1, 2, NoneAddressing),
        0x99 => OpCode::new(code, Sta, 3, 5, Absolute_Y),
        0x9A => OpCode::new(code, Txs, 1, 2, NoneAddressing),
        0x9B => OpCode::unofficial(code, Tas, 3, 5, Absolute_Y),
        0x9C => OpCode::unofficial(code, Shy, 3, 5, Absolute_X),
        0x9D => OpCode::new(code, Sta, 3, 5, Absolute_X),
        0x9E => OpCode::unofficial(code, Shx, 3, 5, Absolute_Y),
        0x9F => OpCode::unofficial(code, Ahx, 3, 5, Absolute_Y),
        0xA0 => OpCode::new(code, Ldy, 2, 2, Immediate),
        0xA1 => OpCode::new(code, Lda, 2, 6, Indirect_X),
        0xA2 => OpCode::new(code, Ldx, 2, 2, Immediate),
        0xA3 => OpCode::unofficial(code, Lax, 2, 6, Indirect_X),
        0xA4 => OpCode::new(code, Ldy, 2, 3, ZeroPage),
        0xA5 => OpCode::new(code, Lda, 2, 3, ZeroPage),
        0xA6 => OpCode::new(code, Ldx, 2, 3, ZeroPage),
        0xA7 => OpCode::unofficial(code, Lax, 2, 3, ZeroPage),
        0xA8 => OpCode::new(code, Tay, 1, 2, NoneAddressing),
        0xA9 => OpCode::new(code, Lda, 2, 2, Immediate),
        0xAA => OpCode::new(code, Tax, 1, 2, NoneAddressing),
        0xAB => OpCode::unofficial(code, Lxa, 2, 2, Immediate),
        0xAC => OpCode::new(code, Ldy, 3, 4, Absolute),
        0xAD => OpCode::new(code, Lda, 3, 4, Absolute),
        0xAE => OpCode::new(code, Ldx, 3, 4, Absolute),
        0xAF => OpCode::unofficial(code, Lax, 3, 4, Absolute),
        0xB0 => OpCode::new(code, Bcs, 2, 2, NoneAddressing),
        0xB1 => OpCode::new(code, Lda, 2, 5, Indirect_Y),
        0xB3 => OpCode::unofficial(code, Lax, 2, 5, Indirect_Y),
        0xB4 => OpCode::new(code, Ldy, 2, 4, ZeroPage_X),
        0xB5 => OpCode::new(code, Lda, 2, 4, ZeroPage_X),
        0xB6 => OpCode::new(code, Ldx, 2, 4, ZeroPage_Y),
        0xB7 => OpCode::unofficial(code, Lax, 2, 4, ZeroPage_Y),
        0xB8 => OpCode::new(code, Clv, 1, 2, NoneAddressing),
        0xB9 => OpCode::new(code, Lda, 3, 4, Absolute_Y),
        0xBA => OpCode::new(code, Tsx, 1, 2, NoneAddressing),
        0xBB => OpCode::unofficial(code, Las, 3, 4, Absolute_Y),
        0xBC => OpCode::new(code, Ldy, 3, 4, Absolute_X),
        0xBD => OpCode::new(code, Lda, 3, 4, Absolute_X),
        0xBE => OpCode::new(code, Ldx, 3, 4, Absolute_Y),
        0xBF => OpCode::unofficial(code, Lax, 3, 4, Absolute_Y),
        0xC0 => OpCode::new(code, Cpy, 2, 2, Immediate),
        0xC1 => OpCode::new(code, Cmp, 2, 6, Indirect_X),
        0xC2 => OpCode::unofficial(code, Nop, 2, 2, Immediate),
        0xC3 => OpCode::unofficial(code, Dcp, 2, 8, Indirect_X),
        0xC4 => OpCode::new(code, Cpy, 2, 3, ZeroPage),
        0xC5 => OpCode::new(code, Cmp, 2, 3, ZeroPage),
        0xC6 => OpCode::new(code, Dec, 2, 5, ZeroPage),
        0xC7 => OpCode::unofficial(code, Dcp, 2, 5, ZeroPage),
        0xC8 => OpCode::new(code, Iny, 1, 2, NoneAddressing),
        0xC9 => OpCode::new(code, Cmp, 2, 2, Immediate),
        0xCA => OpCode::new(code, Dex, 1, 2, NoneAddressing),
        0xCB => OpCode::unofficial(code, Axs, 2, 2, Immediate),
        0xCC => OpCode::new(code, Cpy, 3, 4, Absolute),
        0xCD => OpCode::new(code, Cmp, 3, 4, Absolute),
        0xCE => OpCode::new(code, Dec, 3, 6, Absolute),
        0xCF => OpCode::unofficial(code, Dcp, 3, 6, Absolute),
        0xD0 => OpCode::new(code, Bne, 2, 2, NoneAddressing),
        0xD1 => OpCode::new(code, Cmp, 2, 5, Indirect_Y),
        0xD3 => OpCode::unofficial(code, Dcp, 2, 8, Indirect_Y),
        0xD4 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0xD5 => OpCode::new(code, Cmp, 2, 4, ZeroPage_X),
        0xD6 => OpCode::new(code, Dec, 2, 6, ZeroPage_X),
        0xD7 => OpCode::unofficial(code, Dcp, 2, 6, ZeroPage_X),
        0xD8 => OpCode::new(code, Cld, 1, 2, NoneAddressing),
        0xD9 => OpCode::new(code, Cmp, 3, 4, Absolute_Y),
        0xDA => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0xDB => OpCode::unofficial(code, Dcp, 3, 7, Absolute_Y),
        0xDC => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0xDD => OpCode::new(code, Cmp, 3, 4, Absolute_X),
        0xDE => OpCode::new(code, Dec, 3, 7, Absolute_X),
        0xDF => OpCode::unofficial(code, Dcp, 3, 7, Absolute_X),
        0xE0 => OpCode::new(code, Cpx, 2, 2, Immediate),
        0xE1 => OpCode::new(code, Sbc, 2, 6, Indirect_X),
        0xE2 => OpCode::unofficial(code, Nop, 2, 2, Immediate),
        0xE3 => OpCode::unofficial(code, Isb, 2, 8, Indirect_X),
        0xE4 => OpCode::new(code, Cpx, 2, 3, ZeroPage),
        0xE5 => OpCode::new(code, Sbc, 2, 3, ZeroPage),
        0xE6 => OpCode::new(code, Inc, 2, 5, ZeroPage),
        0xE7 => OpCode::unofficial(code, Isb, 2, 5, ZeroPage),
        0xE8 => OpCode::new(code, Inx, 1, 2, NoneAddressing),
        0xE9 => OpCode::new(code, Sbc, 2, 2, Immediate),
        0xEA => OpCode::new(code, Nop, 1, 2, NoneAddressing),
        0xEB => OpCode::unofficial(code, Sbc, 2, 2, Immediate),
        0xEC => OpCode::new(code, Cpx, 3, 4, Absolute),
        0xED => OpCode::new(code, Sbc, 3, 4, Absolute),
        0xEE => OpCode::new(code, Inc, 3, 6, Absolute),
        0xEF => OpCode::unofficial(code, Isb, 3, 6, Absolute),
        0xF0 => OpCode::new(code, Beq, 2, 2, NoneAddressing),
        0xF1 => OpCode::new(code, Sbc, 2, 5, Indirect_Y),
        0xF3 => OpCode::unofficial(code, Isb, 2, 8, Indirect_Y),
        0xF4 => OpCode::unofficial(code, Nop, 2, 4, ZeroPage_X),
        0xF5 => OpCode::new(code, Sbc, 2, 4, ZeroPage_X),
        0xF6 => OpCode::new(code, Inc, 2, 6, ZeroPage_X),
        0xF7 => OpCode::unofficial(code, Isb, 2, 6, ZeroPage_X),
        0xF8 => OpCode::new(code, Sed, 1, 2, NoneAddressing),
        0xF9 => OpCode::new(code, Sbc, 3, 4, Absolute_Y),
        0xFA => OpCode::unofficial(code, Nop, 1, 2, NoneAddressing),
        0xFB => OpCode::unofficial(code, Isb, 3, 7, Absolute_Y),
        0xFC => OpCode::unofficial(code, Nop, 3, 4, Absolute_X),
        0xFD => OpCode::new(code, Sbc, 3, 4, Absolute_X),
        0xFE => OpCode::new(code, Inc, 3, 7, Absolute_X),
        0xFF => OpCode::unofficial(code, Isb, 3, 7, Absolute_X),
        _ => return None,
    };
    Some(op)
}

/// Every decodable opcode in byte order.
pub fn all() -> impl Iterator<Item = OpCode> {
    (0..=u8::MAX).filter_map(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAM: [u8; 12] = [
        0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
    ];

    #[test]
    fn only_jam_bytes_are_undecoded() {
        for code in 0..=u8::MAX {
            assert_eq!(lookup(code).is_none(), JAM.contains(&code), "0x{:02X}", code);
        }
        assert_eq!(all().count(), 244);
        assert_eq!(all().filter(|op| op.official).count(), 151);
    }

    #[test]
    fn entries_are_keyed_by_their_own_byte() {
        for op in all() {
            assert_eq!(lookup(op.code), Some(op));
            assert!((1..=3).contains(&op.len), "{:?}", op);
        }
    }

    #[test]
    fn lengths_follow_addressing_mode() {
        for op in all() {
            let expected = match op.mode {
                AddressingMode::Immediate
                | AddressingMode::ZeroPage
                | AddressingMode::ZeroPage_X
                | AddressingMode::ZeroPage_Y
                | AddressingMode::Indirect_X
                | AddressingMode::Indirect_Y => 2,
                AddressingMode::Absolute
                | AddressingMode::Absolute_X
                | AddressingMode::Absolute_Y => 3,
                AddressingMode::NoneAddressing => continue,
            };
            assert_eq!(op.len, expected, "{:?}", op);
        }
    }

    #[test]
    fn spot_check_entries() {
        let lda = lookup(0xA9).unwrap();
        assert_eq!(lda.mnemonic, Mnemonic::Lda);
        assert_eq!((lda.len, lda.cycles, lda.mode), (2, 2, AddressingMode::Immediate));

        let jmp = lookup(0x6C).unwrap();
        assert_eq!((jmp.mnemonic, jmp.len, jmp.cycles), (Mnemonic::Jmp, 3, 5));

        let sbc = lookup(0xEB).unwrap();
        assert_eq!(sbc.mnemonic, Mnemonic::Sbc);
        assert!(!sbc.official);

        assert_eq!(lookup(0xD0).unwrap().mnemonic, Mnemonic::Bne);
        assert_eq!(Mnemonic::Isb.to_string(), "ISB");
    }
}

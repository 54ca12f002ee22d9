//! NMOS 6502 core as found in the NES 2A03 (decimal mode has no effect on ADC/SBC).

mod flags;
pub mod opcodes;
pub mod trace;

pub use flags::StatusFlags;
pub use opcodes::{AddressingMode, Mnemonic, OpCode};

use thiserror::Error;

use crate::memory::{Bus, Memory, MemoryError};
use crate::numeric::{FixedWidth, Negate, NumericError};

pub const STACK: u16 = 0x0100;
pub const STACK_RESET: u8 = 0xFD;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const PROGRAM_START: u16 = 0x8000;

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("Unhandled opcode 0x{opcode:02X} at 0x{pc:04X}")]
    UnhandledOpcode { opcode: u8, pc: u16 },
    #[error("Addressing mode {mode:?} not supported at 0x{pc:04X}")]
    UnsupportedAddressingMode { mode: AddressingMode, pc: u16 },
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Arithmetic(#[from] NumericError),
}

pub struct Cpu {
    pub register_a: u8,
    pub register_x: u8,
    pub register_y: u8,
    pub stack_pointer: u8,
    pub status: StatusFlags,
    pub program_counter: u16,
    /// Sum of base cycle counts of executed instructions.
    pub cycles: u64,
    pub bus: Bus,
}

impl Memory for Cpu {
    fn read(&mut self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        self.bus.write(addr, value)
    }
}

fn shift_left(status: &mut StatusFlags, data: u8) -> u8 {
    status.set(StatusFlags::CARRY, data & 0x80 != 0);
    data << 1
}

fn shift_right(status: &mut StatusFlags, data: u8) -> u8 {
    status.set(StatusFlags::CARRY, data & 0x01 != 0);
    data >> 1
}

fn rotate_left(status: &mut StatusFlags, data: u8) -> u8 {
    let carry_in = status.contains(StatusFlags::CARRY) as u8;
    shift_left(status, data) | carry_in
}

fn rotate_right(status: &mut StatusFlags, data: u8) -> u8 {
    let carry_in = (status.contains(StatusFlags::CARRY) as u8) << 7;
    shift_right(status, data) | carry_in
}

fn increment(_status: &mut StatusFlags, data: u8) -> u8 {
    data.wrapping_add(1)
}

fn decrement(_status: &mut StatusFlags, data: u8) -> u8 {
    data.wrapping_sub(1)
}

impl Cpu {
    pub fn new(bus: Bus) -> Self {
        Cpu {
            register_a: 0,
            register_x: 0,
            register_y: 0,
            stack_pointer: STACK_RESET,
            status: StatusFlags::RESET,
            program_counter: 0,
            cycles: 0,
            bus,
        }
    }

    pub fn reset(&mut self) {
        self.register_a = 0;
        self.register_x = 0;
        self.register_y = 0;
        self.stack_pointer = STACK_RESET;
        self.status = StatusFlags::RESET;

        self.program_counter = self.read_u16(RESET_VECTOR);
        log::info!("Reset CPU, PC set to: 0x{:04X}", self.program_counter);
    }

    /// Copies `program` to $8000 and points the reset vector at it.
    pub fn load(&mut self, program: &[u8]) -> Result<(), CpuError> {
        for (offset, byte) in program.iter().enumerate() {
            self.write(PROGRAM_START.wrapping_add(offset as u16), *byte)?;
        }
        self.write_u16(RESET_VECTOR, PROGRAM_START)?;
        Ok(())
    }

    pub fn load_and_run(&mut self, program: &[u8]) -> Result<(), CpuError> {
        self.load(program)?;
        self.reset();
        self.run()
    }

    pub fn run(&mut self) -> Result<(), CpuError> {
        self.run_with_callback(|_| Ok(()))
    }

    /// Runs until BRK, calling `callback` before every instruction.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<(), CpuError>
    where
        F: FnMut(&mut Cpu) -> Result<(), CpuError>,
    {
        loop {
            callback(self)?;
            if !self.step()? {
                return Ok(());
            }
        }
    }

    /// Executes one instruction. Returns `Ok(false)` once BRK has executed.
    pub fn step(&mut self) -> Result<bool, CpuError> {
        let pc = self.program_counter;
        let code = self.read(pc);
        let op = opcodes::lookup(code).ok_or(CpuError::UnhandledOpcode { opcode: code, pc })?;
        log::trace!("PC: 0x{:04X}, Op: 0x{:02X} {}", pc, code, op.mnemonic);

        self.program_counter = self.program_counter.wrapping_add(1);
        let mut jumped = false;
        self.cycles += op.cycles as u64;

        let mode = op.mode;
        match op.mnemonic {
            Mnemonic::Brk => {
                self.brk()?;
                return Ok(false);
            }
            Mnemonic::Nop => {}

            Mnemonic::Lda => {
                let value = self.fetch(mode)?;
                self.set_register_a(value);
            }
            Mnemonic::Ldx => {
                self.register_x = self.fetch(mode)?;
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Ldy => {
                self.register_y = self.fetch(mode)?;
                self.status.update_zero_and_negative(self.register_y);
            }
            Mnemonic::Sta => self.store(mode, self.register_a)?,
            Mnemonic::Stx => self.store(mode, self.register_x)?,
            Mnemonic::Sty => self.store(mode, self.register_y)?,

            Mnemonic::Tax => {
                self.register_x = self.register_a;
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Tay => {
                self.register_y = self.register_a;
                self.status.update_zero_and_negative(self.register_y);
            }
            Mnemonic::Tsx => {
                self.register_x = self.stack_pointer;
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Txa => self.set_register_a(self.register_x),
            Mnemonic::Txs => self.stack_pointer = self.register_x,
            Mnemonic::Tya => self.set_register_a(self.register_y),

            Mnemonic::And => {
                let data = self.fetch(mode)?;
                self.set_register_a(self.register_a & data);
            }
            Mnemonic::Eor => {
                let data = self.fetch(mode)?;
                self.set_register_a(self.register_a ^ data);
            }
            Mnemonic::Ora => {
                let data = self.fetch(mode)?;
                self.set_register_a(self.register_a | data);
            }
            Mnemonic::Bit => self.bit(mode)?,

            Mnemonic::Adc => {
                let data = self.fetch(mode)?;
                self.add_to_register_a(data)?;
            }
            Mnemonic::Sbc => {
                let data = self.fetch(mode)?;
                self.subtract_from_register_a(data)?;
            }
            Mnemonic::Cmp => self.compare(mode, self.register_a)?,
            Mnemonic::Cpx => self.compare(mode, self.register_x)?,
            Mnemonic::Cpy => self.compare(mode, self.register_y)?,

            Mnemonic::Asl => {
                self.read_modify_write(mode, shift_left)?;
            }
            Mnemonic::Lsr => {
                self.read_modify_write(mode, shift_right)?;
            }
            Mnemonic::Rol => {
                self.read_modify_write(mode, rotate_left)?;
            }
            Mnemonic::Ror => {
                self.read_modify_write(mode, rotate_right)?;
            }
            Mnemonic::Inc => {
                self.read_modify_write(mode, increment)?;
            }
            Mnemonic::Dec => {
                self.read_modify_write(mode, decrement)?;
            }
            Mnemonic::Inx => {
                self.register_x = self.register_x.wrapping_add(1);
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Iny => {
                self.register_y = self.register_y.wrapping_add(1);
                self.status.update_zero_and_negative(self.register_y);
            }
            Mnemonic::Dex => {
                self.register_x = self.register_x.wrapping_sub(1);
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Dey => {
                self.register_y = self.register_y.wrapping_sub(1);
                self.status.update_zero_and_negative(self.register_y);
            }

            Mnemonic::Clc => self.status.remove(StatusFlags::CARRY),
            Mnemonic::Cld => self.status.remove(StatusFlags::DECIMAL),
            Mnemonic::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.status.remove(StatusFlags::OVERFLOW),
            Mnemonic::Sec => self.status.insert(StatusFlags::CARRY),
            Mnemonic::Sed => self.status.insert(StatusFlags::DECIMAL),
            Mnemonic::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),

            Mnemonic::Pha => self.stack_push(self.register_a)?,
            Mnemonic::Pla => {
                let data = self.stack_pop();
                self.set_register_a(data);
            }
            Mnemonic::Php => self.stack_push(self.status.pushed())?,
            Mnemonic::Plp => {
                let bits = self.stack_pop();
                self.status = StatusFlags::pulled(bits);
            }

            Mnemonic::Bcc => jumped = self.branch(!self.status.contains(StatusFlags::CARRY)),
            Mnemonic::Bcs => jumped = self.branch(self.status.contains(StatusFlags::CARRY)),
            Mnemonic::Beq => jumped = self.branch(self.status.contains(StatusFlags::ZERO)),
            Mnemonic::Bne => jumped = self.branch(!self.status.contains(StatusFlags::ZERO)),
            Mnemonic::Bmi => jumped = self.branch(self.status.contains(StatusFlags::NEGATIVE)),
            Mnemonic::Bpl => jumped = self.branch(!self.status.contains(StatusFlags::NEGATIVE)),
            Mnemonic::Bvs => jumped = self.branch(self.status.contains(StatusFlags::OVERFLOW)),
            Mnemonic::Bvc => jumped = self.branch(!self.status.contains(StatusFlags::OVERFLOW)),

            Mnemonic::Jmp if code == 0x6C => {
                let pointer = self.read_u16(self.program_counter);
                self.program_counter = self.read_indirect_jump_target(pointer);
                jumped = true;
            }
            Mnemonic::Jmp => {
                self.program_counter = self.read_u16(self.program_counter);
                jumped = true;
            }
            Mnemonic::Jsr => {
                self.stack_push_u16(self.program_counter.wrapping_add(2).wrapping_sub(1))?;
                self.program_counter = self.read_u16(self.program_counter);
                jumped = true;
            }
            Mnemonic::Rts => {
                self.program_counter = self.stack_pop_u16().wrapping_add(1);
                jumped = true;
            }
            Mnemonic::Rti => {
                let bits = self.stack_pop();
                self.status = StatusFlags::pulled(bits);
                self.program_counter = self.stack_pop_u16();
                jumped = true;
            }

            // Unofficial opcodes
            Mnemonic::Slo => {
                let data = self.read_modify_write(mode, shift_left)?;
                self.set_register_a(self.register_a | data);
            }
            Mnemonic::Rla => {
                let data = self.read_modify_write(mode, rotate_left)?;
                self.set_register_a(self.register_a & data);
            }
            Mnemonic::Sre => {
                let data = self.read_modify_write(mode, shift_right)?;
                self.set_register_a(self.register_a ^ data);
            }
            Mnemonic::Rra => {
                let data = self.read_modify_write(mode, rotate_right)?;
                self.add_to_register_a(data)?;
            }
            Mnemonic::Dcp => {
                let data = self.read_modify_write(mode, decrement)?;
                self.compare_value(self.register_a, data);
            }
            Mnemonic::Isb => {
                let data = self.read_modify_write(mode, increment)?;
                self.subtract_from_register_a(data)?;
            }
            Mnemonic::Lax => {
                let data = self.fetch(mode)?;
                self.set_register_a(data);
                self.register_x = data;
            }
            Mnemonic::Sax => self.store(mode, self.register_a & self.register_x)?,
            Mnemonic::Anc => {
                let data = self.fetch(mode)?;
                self.set_register_a(self.register_a & data);
                let negative = self.status.contains(StatusFlags::NEGATIVE);
                self.status.set(StatusFlags::CARRY, negative);
            }
            Mnemonic::Alr => {
                let data = self.fetch(mode)?;
                let result = shift_right(&mut self.status, self.register_a & data);
                self.set_register_a(result);
            }
            Mnemonic::Arr => {
                let data = self.fetch(mode)?;
                let result = rotate_right(&mut self.status, self.register_a & data);
                self.set_register_a(result);
                let bit_5 = (result >> 5) & 1;
                let bit_6 = (result >> 6) & 1;
                self.status.set(StatusFlags::CARRY, bit_6 == 1);
                self.status.set(StatusFlags::OVERFLOW, bit_5 ^ bit_6 == 1);
            }
            Mnemonic::Axs => {
                let data = self.fetch(mode)?;
                let x_and_a = self.register_x & self.register_a;
                self.status.set(StatusFlags::CARRY, data <= x_and_a);
                self.register_x = x_and_a.wrapping_sub(data);
                self.status.update_zero_and_negative(self.register_x);
            }
            Mnemonic::Lxa => {
                let data = self.fetch(mode)?;
                self.set_register_a(data);
                self.register_x = data;
            }
            Mnemonic::Xaa => {
                let data = self.fetch(mode)?;
                self.set_register_a(self.register_x & data);
            }
            Mnemonic::Las => {
                let data = self.fetch(mode)? & self.stack_pointer;
                self.set_register_a(data);
                self.register_x = data;
                self.stack_pointer = data;
            }
            Mnemonic::Tas => {
                self.stack_pointer = self.register_a & self.register_x;
                self.store_and_high_byte(mode, self.stack_pointer)?;
            }
            Mnemonic::Ahx => self.store_and_high_byte(mode, self.register_a & self.register_x)?,
            Mnemonic::Shx => self.store_and_high_byte(mode, self.register_x)?,
            Mnemonic::Shy => self.store_and_high_byte(mode, self.register_y)?,
        }

        if !jumped {
            self.program_counter = self.program_counter.wrapping_add(op.len as u16 - 1);
        }
        Ok(true)
    }

    pub fn get_operand_address(&mut self, mode: AddressingMode) -> Result<u16, CpuError> {
        match mode {
            AddressingMode::Immediate => Ok(self.program_counter),
            _ => self.get_absolute_address(mode, self.program_counter),
        }
    }

    /// Resolves the effective address for an operand stored at `addr`.
    pub fn get_absolute_address(&mut self, mode: AddressingMode, addr: u16) -> Result<u16, CpuError> {
        let address = match mode {
            AddressingMode::ZeroPage => self.read(addr) as u16,
            AddressingMode::ZeroPage_X => self.read(addr).wrapping_add(self.register_x) as u16,
            AddressingMode::ZeroPage_Y => self.read(addr).wrapping_add(self.register_y) as u16,
            AddressingMode::Absolute => self.read_u16(addr),
            AddressingMode::Absolute_X => self.read_u16(addr).wrapping_add(self.register_x as u16),
            AddressingMode::Absolute_Y => self.read_u16(addr).wrapping_add(self.register_y as u16),
            AddressingMode::Indirect_X => {
                let pointer = self.read(addr).wrapping_add(self.register_x);
                self.read_zero_page_u16(pointer)
            }
            AddressingMode::Indirect_Y => {
                let pointer = self.read(addr);
                self.read_zero_page_u16(pointer)
                    .wrapping_add(self.register_y as u16)
            }
            AddressingMode::Immediate | AddressingMode::NoneAddressing => {
                return Err(CpuError::UnsupportedAddressingMode {
                    mode,
                    pc: self.program_counter,
                })
            }
        };
        Ok(address)
    }

    /// Pointer fetch that stays inside the zero page.
    fn read_zero_page_u16(&mut self, pointer: u8) -> u16 {
        let lo = self.read(pointer as u16);
        let hi = self.read(pointer.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    /// JMP ($xxFF) takes its high byte from $xx00, not the next page.
    fn read_indirect_jump_target(&mut self, pointer: u16) -> u16 {
        if pointer & 0x00FF == 0x00FF {
            let lo = self.read(pointer);
            let hi = self.read(pointer & 0xFF00);
            u16::from_le_bytes([lo, hi])
        } else {
            self.read_u16(pointer)
        }
    }

    fn fetch(&mut self, mode: AddressingMode) -> Result<u8, CpuError> {
        let addr = self.get_operand_address(mode)?;
        Ok(self.read(addr))
    }

    fn store(&mut self, mode: AddressingMode, value: u8) -> Result<(), CpuError> {
        let addr = self.get_operand_address(mode)?;
        self.write(addr, value)?;
        Ok(())
    }

    /// Applies `op` to the accumulator (no-operand form) or to memory.
    fn read_modify_write<F>(&mut self, mode: AddressingMode, op: F) -> Result<u8, CpuError>
    where
        F: FnOnce(&mut StatusFlags, u8) -> u8,
    {
        if mode == AddressingMode::NoneAddressing {
            let result = op(&mut self.status, self.register_a);
            self.set_register_a(result);
            return Ok(result);
        }

        let addr = self.get_operand_address(mode)?;
        let data = self.read(addr);
        let result = op(&mut self.status, data);
        self.write(addr, result)?;
        self.status.update_zero_and_negative(result);
        Ok(result)
    }

    /// SHX/SHY/AHX/TAS: store `value & (base high byte + 1)`.
    fn store_and_high_byte(&mut self, mode: AddressingMode, value: u8) -> Result<(), CpuError> {
        let addr = self.get_operand_address(mode)?;
        let index = match mode {
            AddressingMode::Absolute_X => self.register_x,
            _ => self.register_y,
        };
        let base = addr.wrapping_sub(index as u16);
        let high = ((base >> 8) as u8).wrapping_add(1);
        self.write(addr, value & high)?;
        Ok(())
    }

    fn set_register_a(&mut self, value: u8) {
        self.register_a = value;
        self.status.update_zero_and_negative(self.register_a);
    }

    fn add_to_register_a(&mut self, data: u8) -> Result<(), CpuError> {
        let carry_in = u16::from(self.status.contains(StatusFlags::CARRY));
        let sum = (self.register_a as u16).try_add(data as u16)?.try_add(carry_in)?;
        self.status.set(StatusFlags::CARRY, sum > 0xFF);

        let result = u8::wrap(sum.into());
        self.status.set(
            StatusFlags::OVERFLOW,
            (data ^ result) & (result ^ self.register_a) & 0x80 != 0,
        );
        self.set_register_a(result);
        Ok(())
    }

    /// A - M - (1 - C) == A + (-M - 1) + C
    fn subtract_from_register_a(&mut self, data: u8) -> Result<(), CpuError> {
        let negated = i8::wrap(data.into()).negate().wrap_sub(1);
        self.add_to_register_a(u8::wrap(negated.into()))
    }

    fn compare(&mut self, mode: AddressingMode, compare_with: u8) -> Result<(), CpuError> {
        let data = self.fetch(mode)?;
        self.compare_value(compare_with, data);
        Ok(())
    }

    fn compare_value(&mut self, compare_with: u8, data: u8) {
        self.status.set(StatusFlags::CARRY, data <= compare_with);
        self.status
            .update_zero_and_negative(compare_with.wrapping_sub(data));
    }

    /// BIT only ever sets NEGATIVE and OVERFLOW, never clears them.
    fn bit(&mut self, mode: AddressingMode) -> Result<(), CpuError> {
        let data = self.fetch(mode)?;
        self.status
            .set(StatusFlags::ZERO, self.register_a & data == 0);
        if data & 0b1000_0000 != 0 {
            self.status.insert(StatusFlags::NEGATIVE);
        }
        if data & 0b0100_0000 != 0 {
            self.status.insert(StatusFlags::OVERFLOW);
        }
        Ok(())
    }

    /// Returns whether the branch was taken.
    fn branch(&mut self, condition: bool) -> bool {
        if condition {
            let jump = self.read(self.program_counter) as i8;
            self.program_counter = self
                .program_counter
                .wrapping_add(1)
                .wrapping_add(jump as u16);
        }
        condition
    }

    /// Pushes the interrupt frame BRK leaves behind, without vectoring.
    fn brk(&mut self) -> Result<(), CpuError> {
        self.stack_push_u16(self.program_counter.wrapping_add(1))?;
        self.stack_push(self.status.pushed())?;
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        Ok(())
    }

    pub fn stack_push(&mut self, data: u8) -> Result<(), CpuError> {
        self.write(STACK + self.stack_pointer as u16, data)?;
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
        Ok(())
    }

    pub fn stack_pop(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        self.read(STACK + self.stack_pointer as u16)
    }

    pub fn stack_push_u16(&mut self, data: u16) -> Result<(), CpuError> {
        let [lo, hi] = data.to_le_bytes();
        self.stack_push(hi)?;
        self.stack_push(lo)
    }

    pub fn stack_pop_u16(&mut self) -> u16 {
        let lo = self.stack_pop();
        let hi = self.stack_pop();
        u16::from_le_bytes([lo, hi])
    }
}

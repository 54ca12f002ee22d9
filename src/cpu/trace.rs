//! nestest-style disassembly of the instruction about to execute.

use super::opcodes::{self, AddressingMode, Mnemonic};
use super::{Cpu, CpuError};
use crate::memory::Memory;

/// Renders the instruction at PC and the register file, e.g.
///
/// ```text
/// C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD
/// ```
///
/// Operand values are read through the bus, so devices with read side effects
/// will see them.
pub fn trace(cpu: &mut Cpu) -> Result<String, CpuError> {
    let pc = cpu.program_counter;
    let code = cpu.read(pc);
    let op = opcodes::lookup(code).ok_or(CpuError::UnhandledOpcode { opcode: code, pc })?;

    let bytes: Vec<u8> = (0..op.len as u16)
        .map(|i| cpu.read(pc.wrapping_add(i)))
        .collect();
    let operand_addr = pc.wrapping_add(1);

    let operand = match op.mode {
        AddressingMode::Immediate => format!("#${:02X}", bytes[1]),
        AddressingMode::ZeroPage => {
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!("${:02X} = {:02X}", addr, cpu.read(addr))
        }
        AddressingMode::ZeroPage_X | AddressingMode::ZeroPage_Y => {
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!(
                "${:02X},{} @ {:02X} = {:02X}",
                bytes[1],
                index_name(op.mode),
                addr,
                cpu.read(addr)
            )
        }
        AddressingMode::Absolute => {
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!("${:04X} = {:02X}", addr, cpu.read(addr))
        }
        AddressingMode::Absolute_X | AddressingMode::Absolute_Y => {
            let base = u16::from_le_bytes([bytes[1], bytes[2]]);
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!(
                "${:04X},{} @ {:04X} = {:02X}",
                base,
                index_name(op.mode),
                addr,
                cpu.read(addr)
            )
        }
        AddressingMode::Indirect_X => {
            let pointer = bytes[1].wrapping_add(cpu.register_x);
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!(
                "(${:02X},X) @ {:02X} = {:04X} = {:02X}",
                bytes[1],
                pointer,
                addr,
                cpu.read(addr)
            )
        }
        AddressingMode::Indirect_Y => {
            let base = cpu.read_zero_page_u16(bytes[1]);
            let addr = cpu.get_absolute_address(op.mode, operand_addr)?;
            format!(
                "(${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                bytes[1],
                base,
                addr,
                cpu.read(addr)
            )
        }
        AddressingMode::NoneAddressing => match bytes.len() {
            2 => {
                // relative branch
                let target = pc
                    .wrapping_add(2)
                    .wrapping_add(bytes[1] as i8 as u16);
                format!("${:04X}", target)
            }
            3 if code == 0x6C => {
                let pointer = u16::from_le_bytes([bytes[1], bytes[2]]);
                let target = cpu.read_indirect_jump_target(pointer);
                format!("(${:04X}) = {:04X}", pointer, target)
            }
            3 => format!("${:04X}", u16::from_le_bytes([bytes[1], bytes[2]])),
            _ if is_accumulator_shift(op.mnemonic) => String::from("A"),
            _ => String::new(),
        },
    };

    let hex_dump = bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    let marker = if op.official { ' ' } else { '*' };
    let asm = format!(
        "{:04X}  {:8} {}{} {}",
        pc, hex_dump, marker, op.mnemonic, operand
    );

    Ok(format!(
        "{:47} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        asm.trim_end(),
        cpu.register_a,
        cpu.register_x,
        cpu.register_y,
        cpu.status.bits(),
        cpu.stack_pointer
    ))
}

fn index_name(mode: AddressingMode) -> char {
    match mode {
        AddressingMode::ZeroPage_X | AddressingMode::Absolute_X => 'X',
        _ => 'Y',
    }
}

fn is_accumulator_shift(mnemonic: Mnemonic) -> bool {
    matches!(
        mnemonic,
        Mnemonic::Asl | Mnemonic::Lsr | Mnemonic::Rol | Mnemonic::Ror
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::StatusFlags;
    use crate::memory::{Bus, Ram};

    fn cpu_at(pc: u16, program: &[u8]) -> Cpu {
        let mut bus = Bus::new();
        bus.attach(0x0000, 0xFFFF, Box::new(Ram::new(0x10000))).unwrap();
        let mut cpu = Cpu::new(bus);
        for (i, byte) in program.iter().enumerate() {
            cpu.write(pc + i as u16, *byte).unwrap();
        }
        cpu.program_counter = pc;
        cpu.register_a = 1;
        cpu.register_x = 2;
        cpu.register_y = 3;
        cpu.status = StatusFlags::from_bits_retain(0x24);
        cpu
    }

    #[test]
    fn format_trace() {
        let mut cpu = cpu_at(0x64, &[0xA2, 0x01, 0xCA, 0x88, 0x00]);
        let mut result: Vec<String> = vec![];
        cpu.run_with_callback(|cpu| {
            result.push(trace(cpu)?);
            Ok(())
        })
        .unwrap();
        assert_eq!(
            "0064  A2 01     LDX #$01                        A:01 X:02 Y:03 P:24 SP:FD",
            result[0]
        );
        assert_eq!(
            "0066  CA        DEX                             A:01 X:01 Y:03 P:24 SP:FD",
            result[1]
        );
        assert_eq!(
            "0067  88        DEY                             A:01 X:00 Y:03 P:26 SP:FD",
            result[2]
        );
    }

    #[test]
    fn format_mem_access() {
        let mut cpu = cpu_at(0x64, &[0x11, 0x33, 0x00]);
        cpu.register_a = 0;
        cpu.register_x = 0;
        cpu.register_y = 0;
        cpu.write(0x33, 0x00).unwrap();
        cpu.write(0x34, 0x04).unwrap();
        cpu.write(0x400, 0xAA).unwrap();

        assert_eq!(
            "0064  11 33     ORA ($33),Y = 0400 @ 0400 = AA  A:00 X:00 Y:00 P:24 SP:FD",
            trace(&mut cpu).unwrap()
        );
    }

    #[test]
    fn jump_operands() {
        let mut cpu = cpu_at(0xC000, &[0x4C, 0xF5, 0xC5]);
        cpu.register_a = 0;
        cpu.register_x = 0;
        cpu.register_y = 0;
        assert_eq!(
            "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD",
            trace(&mut cpu).unwrap()
        );

        let mut cpu = cpu_at(0xC000, &[0x6C, 0xFF, 0x02]);
        cpu.write(0x02FF, 0x34).unwrap();
        cpu.write(0x0200, 0x12).unwrap();
        assert!(trace(&mut cpu)
            .unwrap()
            .starts_with("C000  6C FF 02  JMP ($02FF) = 1234"));
    }

    #[test]
    fn unofficial_opcodes_are_starred() {
        let mut cpu = cpu_at(0xC6BD, &[0x04, 0xA9]);
        assert!(trace(&mut cpu)
            .unwrap()
            .starts_with("C6BD  04 A9    *NOP $A9 = 00"));
    }

    #[test]
    fn branches_show_target_and_shifts_show_accumulator() {
        let mut cpu = cpu_at(0x8000, &[0xD0, 0xFE]);
        assert!(trace(&mut cpu).unwrap().starts_with("8000  D0 FE     BNE $8000"));

        let mut cpu = cpu_at(0x8000, &[0x4A]);
        assert!(trace(&mut cpu).unwrap().starts_with("8000  4A        LSR A"));
    }

    #[test]
    fn indexed_operands_show_effective_address() {
        let mut cpu = cpu_at(0x8000, &[0xB5, 0xFF]);
        cpu.write(0x0001, 0x77).unwrap();
        assert!(trace(&mut cpu)
            .unwrap()
            .starts_with("8000  B5 FF     LDA $FF,X @ 01 = 77"));

        let mut cpu = cpu_at(0x8000, &[0xBD, 0x00, 0x02]);
        assert!(trace(&mut cpu)
            .unwrap()
            .starts_with("8000  BD 00 02  LDA $0200,X @ 0202 = 00"));

        let mut cpu = cpu_at(0x8000, &[0xA1, 0x10]);
        cpu.write_u16(0x12, 0x0300).unwrap();
        cpu.write(0x0300, 0x5A).unwrap();
        assert!(trace(&mut cpu)
            .unwrap()
            .starts_with("8000  A1 10     LDA ($10,X) @ 12 = 0300 = 5A"));
    }

    #[test]
    fn jam_bytes_cannot_be_traced() {
        let mut cpu = cpu_at(0x8000, &[0x02]);
        assert!(matches!(
            trace(&mut cpu),
            Err(CpuError::UnhandledOpcode { opcode: 0x02, pc: 0x8000 })
        ));
    }
}

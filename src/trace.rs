use crate::cpu6502::{AddressingMode, CPU, OpCode, decode};

// Nintendulator spends 7 cycles on its reset sequence before the first
// instruction, and its log starts counting from there.
const NESTEST_CYCLE_OFFSET: u64 = 7;

/// Builds one Nintendulator-style log line from the pre-instruction CPU
/// state. All address resolution here is done by peeking: no cycles are
/// consumed and the PC does not move.
pub(crate) fn trace(cpu: &CPU) -> String {
    let pc = cpu.program_counter;
    let opcode = cpu.read_u8(pc);

    let (raw_bytes, marker, name, operand_str) = match decode(opcode) {
        Some(op) => {
            let byte_one = if op.bytes >= 2 { cpu.read_u8(pc.wrapping_add(1)) } else { 0 };
            let byte_two = if op.bytes >= 3 { cpu.read_u8(pc.wrapping_add(2)) } else { 0 };
            let raw = match op.bytes {
                1 => format!("{:02X}", opcode),
                2 => format!("{:02X} {:02X}", opcode, byte_one),
                _ => format!("{:02X} {:02X} {:02X}", opcode, byte_one, byte_two),
            };
            let marker = if op.official { ' ' } else { '*' };
            let operand_str = disassemble_operand(cpu, op, byte_one, byte_two);
            (raw, marker, op.name, operand_str)
        }
        None => (format!("{:02X}", opcode), ' ', "???", String::new()),
    };

    format!(
        "{:04X}  {:<8} {}{} {:<28}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        pc,
        raw_bytes,
        marker,
        name,
        operand_str,
        cpu.accumulator,
        cpu.x_register,
        cpu.y_register,
        cpu.status.bits(),
        cpu.stack_pointer,
        cpu.cycles + NESTEST_CYCLE_OFFSET,
    )
}

// Operand text in 6502 convention, annotated with the resolved address and
// the byte currently at it, the way the reference log prints each mode.
fn disassemble_operand(cpu: &CPU, op: &OpCode, byte_one: u8, byte_two: u8) -> String {
    match op.addressing_mode {
        AddressingMode::Implicit => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", byte_one),
        AddressingMode::ZeroPage => {
            format!("${:02X} = {:02X}", byte_one, cpu.read_u8(byte_one as u16))
        }
        AddressingMode::ZeroPageX => {
            let addr = byte_one.wrapping_add(cpu.x_register);
            format!("${:02X},X @ {:02X} = {:02X}", byte_one, addr, cpu.read_u8(addr as u16))
        }
        AddressingMode::ZeroPageY => {
            let addr = byte_one.wrapping_add(cpu.y_register);
            format!("${:02X},Y @ {:02X} = {:02X}", byte_one, addr, cpu.read_u8(addr as u16))
        }
        AddressingMode::Relative => {
            // Displacement is relative to the instruction after the branch
            let target = cpu
                .program_counter
                .wrapping_add(2)
                .wrapping_add(byte_one as i8 as u16);
            format!("${:04X}", target)
        }
        AddressingMode::Absolute => {
            let addr = u16::from_le_bytes([byte_one, byte_two]);
            if op.name == "JMP" || op.name == "JSR" {
                format!("${:04X}", addr)
            } else {
                format!("${:04X} = {:02X}", addr, cpu.read_u8(addr))
            }
        }
        AddressingMode::AbsoluteX => {
            let base = u16::from_le_bytes([byte_one, byte_two]);
            let addr = base.wrapping_add(cpu.x_register as u16);
            format!("${:04X},X @ {:04X} = {:02X}", base, addr, cpu.read_u8(addr))
        }
        AddressingMode::AbsoluteY => {
            let base = u16::from_le_bytes([byte_one, byte_two]);
            let addr = base.wrapping_add(cpu.y_register as u16);
            format!("${:04X},Y @ {:04X} = {:02X}", base, addr, cpu.read_u8(addr))
        }
        AddressingMode::Indirect => {
            let pointer = u16::from_le_bytes([byte_one, byte_two]);
            let low = cpu.read_u8(pointer);
            // Same page-wrap bug as the real JMP (indirect)
            let high = cpu.read_u8((pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF));
            format!("(${:04X}) = {:04X}", pointer, u16::from_le_bytes([low, high]))
        }
        AddressingMode::IndirectX => {
            let pointer = byte_one.wrapping_add(cpu.x_register);
            let low = cpu.read_u8(pointer as u16);
            let high = cpu.read_u8(pointer.wrapping_add(1) as u16);
            let addr = u16::from_le_bytes([low, high]);
            format!(
                "(${:02X},X) @ {:02X} = {:04X} = {:02X}",
                byte_one,
                pointer,
                addr,
                cpu.read_u8(addr)
            )
        }
        AddressingMode::IndirectY => {
            let low = cpu.read_u8(byte_one as u16);
            let high = cpu.read_u8(byte_one.wrapping_add(1) as u16);
            let base = u16::from_le_bytes([low, high]);
            let addr = base.wrapping_add(cpu.y_register as u16);
            format!(
                "(${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                byte_one,
                base,
                addr,
                cpu.read_u8(addr)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::cpu6502::new_cpu;
    use crate::rom::Rom;

    fn cpu_with_program(program: &[u8]) -> CPU {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom_with_program(program)));
        cpu.reset();
        cpu
    }

    #[test]
    fn test_trace_jmp_absolute_line() {
        let cpu = cpu_with_program(&[0x4C, 0xF5, 0xC5]);
        let expected = format!(
            "{:<48}A:00 X:00 Y:00 P:24 SP:FD CYC:7",
            "C000  4C F5 C5  JMP $C5F5"
        );
        assert_eq!(trace(&cpu), expected);
    }

    #[test]
    fn test_trace_registers_column_is_fixed() {
        let cpu = cpu_with_program(&[0xEA]);
        let line = trace(&cpu);
        assert_eq!(line.find("A:"), Some(48));
        assert!(line.starts_with("C000  EA        NOP"));
    }

    #[test]
    fn test_trace_immediate_operand() {
        let mut cpu = cpu_with_program(&[0xA9, 0x2A]);
        cpu.accumulator = 0x11;
        let line = trace(&cpu);
        assert!(line.starts_with("C000  A9 2A     LDA #$2A"));
        assert!(line.ends_with("A:11 X:00 Y:00 P:24 SP:FD CYC:7"));
    }

    #[test]
    fn test_trace_zero_page_shows_memory_value() {
        let mut cpu = cpu_with_program(&[0xA5, 0x10]);
        cpu.write_u8(0x0010, 0x5A);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  A5 10     LDA $10 = 5A"));
    }

    #[test]
    fn test_trace_marks_unofficial_opcodes() {
        let mut cpu = cpu_with_program(&[0xA7, 0x10]);
        cpu.write_u8(0x0010, 0x5A);
        let expected = format!(
            "{:<48}A:00 X:00 Y:00 P:24 SP:FD CYC:7",
            "C000  A7 10    *LAX $10 = 5A"
        );
        assert_eq!(trace(&cpu), expected);
    }

    #[test]
    fn test_trace_indexed_modes_show_resolved_address() {
        let mut cpu = cpu_with_program(&[0xB5, 0x10]);
        cpu.x_register = 0x05;
        cpu.write_u8(0x0015, 0x77);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  B5 10     LDA $10,X @ 15 = 77"));

        let mut cpu = cpu_with_program(&[0xBD, 0x00, 0x02]);
        cpu.x_register = 0x10;
        cpu.write_u8(0x0210, 0x33);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  BD 00 02  LDA $0200,X @ 0210 = 33"));
    }

    #[test]
    fn test_trace_indirect_x_chain() {
        let mut cpu = cpu_with_program(&[0xA1, 0x80]);
        cpu.write_u8(0x0080, 0x00);
        cpu.write_u8(0x0081, 0x02);
        cpu.write_u8(0x0200, 0x5A);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  A1 80     LDA ($80,X) @ 80 = 0200 = 5A"));
    }

    #[test]
    fn test_trace_indirect_y_chain() {
        let mut cpu = cpu_with_program(&[0xB1, 0x89]);
        cpu.write_u8(0x0089, 0x00);
        cpu.write_u8(0x008A, 0x03);
        cpu.y_register = 0x10;
        cpu.write_u8(0x0310, 0x42);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  B1 89     LDA ($89),Y = 0300 @ 0310 = 42"));
    }

    #[test]
    fn test_trace_indirect_jmp_reproduces_page_wrap() {
        let mut cpu = cpu_with_program(&[0x6C, 0xFF, 0x02]);
        cpu.write_u8(0x02FF, 0x34);
        cpu.write_u8(0x0200, 0x56);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  6C FF 02  JMP ($02FF) = 5634"));
    }

    #[test]
    fn test_trace_branch_target() {
        let cpu = cpu_with_program(&[0xF0, 0x05]);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  F0 05     BEQ $C007"));
    }

    #[test]
    fn test_trace_accumulator_operand() {
        let cpu = cpu_with_program(&[0x0A]);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  0A        ASL A"));
    }

    #[test]
    fn test_trace_cycle_column_matches_reference_offsets() {
        // LDA #$05 / ADC #$03 / BRK: the CYC column starts at 7 and grows
        // by each instruction's cycle count
        let mut cpu = cpu_with_program(&[0xA9, 0x05, 0x69, 0x03, 0x00]);
        let mut lines = Vec::new();
        cpu.run_with_callback(|cpu| lines.push(trace(cpu)));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("CYC:7"));
        assert!(lines[1].ends_with("CYC:9"));
        assert!(lines[2].ends_with("CYC:11"));
        assert!(lines[2].starts_with("C004  00        BRK"));
    }

    #[test]
    fn test_trace_survives_unmapped_opcode() {
        let cpu = cpu_with_program(&[0x02]);
        let line = trace(&cpu);
        assert!(line.starts_with("C000  02        ???"));
        assert_eq!(line.find("A:"), Some(48));
    }
}

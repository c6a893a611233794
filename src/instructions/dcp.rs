use crate::cpu6502::{CPU, Operand};

impl CPU {
    // DCP: decrement the memory operand, then compare A against it
    pub(crate) fn handle_dcp(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |_, value| value.wrapping_sub(1));
        let register = self.accumulator;
        self.compare(register, result);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_dcp_decrements_then_compares() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.write_u8(0x0010, 0x43);
        cpu.accumulator = 0x42;
        cpu.handle_dcp(Operand::Address(0x0010));
        assert_eq!(cpu.read_u8(0x0010), 0x42);
        assert!(cpu.status.contains(Status::ZERO));
        assert!(cpu.status.contains(Status::CARRY));
        assert_eq!(cpu.accumulator, 0x42);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // RLA: rotate the memory operand left through carry, then AND into A
    pub(crate) fn handle_rla(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            let carry_in = if cpu.status.contains(Status::CARRY) { 1 } else { 0 };
            cpu.status.set(Status::CARRY, value & 0x80 != 0);
            (value << 1) | carry_in
        });
        self.accumulator &= result;
        let a = self.accumulator;
        self.set_zero_negative(a);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_rla_rotates_memory_and_ands() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.write_u8(0x0010, 0b0100_0001);
        cpu.accumulator = 0xFF;
        cpu.status.insert(Status::CARRY);
        cpu.handle_rla(Operand::Address(0x0010));
        assert_eq!(cpu.read_u8(0x0010), 0b1000_0011);
        assert_eq!(cpu.accumulator, 0b1000_0011);
        assert!(!cpu.status.contains(Status::CARRY));
        assert!(cpu.status.contains(Status::NEGATIVE));
    }
}

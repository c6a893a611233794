use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_lda(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.accumulator = value;
        self.set_zero_negative(value);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_lda_loads_immediate() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.handle_lda(Operand::Immediate(0x42));
        assert_eq!(cpu.accumulator, 0x42);
        assert!(!cpu.status.contains(Status::ZERO));
        assert!(!cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_lda_loads_from_memory() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.write_u8(0x0010, 0x80);
        cpu.handle_lda(Operand::Address(0x0010));
        assert_eq!(cpu.accumulator, 0x80);
        assert!(cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_lda_zero_sets_zero_flag() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.accumulator = 0x55;
        cpu.handle_lda(Operand::Immediate(0x00));
        assert!(cpu.status.contains(Status::ZERO));
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_inc(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |_, value| value.wrapping_add(1));
        self.set_zero_negative(result);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_inc_increments_memory() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.write_u8(0x0010, 0x7F);
        cpu.handle_inc(Operand::Address(0x0010));
        assert_eq!(cpu.read_u8(0x0010), 0x80);
        assert!(cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_inc_wraps_to_zero() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.write_u8(0x0010, 0xFF);
        cpu.handle_inc(Operand::Address(0x0010));
        assert_eq!(cpu.read_u8(0x0010), 0x00);
        assert!(cpu.status.contains(Status::ZERO));
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_cpy(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        let register = self.y_register;
        self.compare(register, value);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_cpy_compares_y_register() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.y_register = 0x01;
        cpu.handle_cpy(Operand::Immediate(0x02));
        assert!(!cpu.status.contains(Status::CARRY));
        assert!(cpu.status.contains(Status::NEGATIVE));
    }
}

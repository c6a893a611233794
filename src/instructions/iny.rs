use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_iny(&mut self, _operand: Operand) {
        let value = self.y_register.wrapping_add(1);
        self.y_register = value;
        self.set_zero_negative(value);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_iny_increments_y() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.y_register = 0x7F;
        cpu.handle_iny(Operand::None);
        assert_eq!(cpu.y_register, 0x80);
        assert!(cpu.status.contains(Status::NEGATIVE));
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_ldx(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.x_register = value;
        self.set_zero_negative(value);
    }
}

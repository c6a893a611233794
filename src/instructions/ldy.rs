use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_ldy(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.y_register = value;
        self.set_zero_negative(value);
    }
}

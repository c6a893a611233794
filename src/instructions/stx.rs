use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_stx(&mut self, operand: Operand) {
        let value = self.x_register;
        self.write_operand(operand, value);
    }
}

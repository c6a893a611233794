use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_sty(&mut self, operand: Operand) {
        let value = self.y_register;
        self.write_operand(operand, value);
    }
}

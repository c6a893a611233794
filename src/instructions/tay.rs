use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_tay(&mut self, _operand: Operand) {
        let value = self.accumulator;
        self.y_register = value;
        self.set_zero_negative(value);
    }
}

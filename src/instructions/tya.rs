use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_tya(&mut self, _operand: Operand) {
        let value = self.y_register;
        self.accumulator = value;
        self.set_zero_negative(value);
    }
}

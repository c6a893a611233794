use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_txa(&mut self, _operand: Operand) {
        let value = self.x_register;
        self.accumulator = value;
        self.set_zero_negative(value);
    }
}

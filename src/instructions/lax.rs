use crate::cpu6502::{CPU, Operand};

impl CPU {
    // LAX loads the accumulator and X with the memory operand and sets N/Z
    pub(crate) fn handle_lax(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.accumulator = value;
        self.x_register = value;
        self.set_zero_negative(value);
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_ora(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.accumulator |= value;
        let result = self.accumulator;
        self.set_zero_negative(result);
    }
}

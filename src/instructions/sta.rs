use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_sta(&mut self, operand: Operand) {
        let value = self.accumulator;
        self.write_operand(operand, value);
    }
}

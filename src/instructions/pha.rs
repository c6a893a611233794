use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_pha(&mut self, _operand: Operand) {
        let value = self.accumulator;
        self.push_u8(value);
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_dec(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |_, value| value.wrapping_sub(1));
        self.set_zero_negative(result);
    }
}

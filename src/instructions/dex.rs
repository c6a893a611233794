use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_dex(&mut self, _operand: Operand) {
        let value = self.x_register.wrapping_sub(1);
        self.x_register = value;
        self.set_zero_negative(value);
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_inx(&mut self, _operand: Operand) {
        let value = self.x_register.wrapping_add(1);
        self.x_register = value;
        self.set_zero_negative(value);
    }
}

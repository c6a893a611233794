use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_tsx(&mut self, _operand: Operand) {
        let value = self.stack_pointer;
        self.x_register = value;
        self.set_zero_negative(value);
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_cpx(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        let register = self.x_register;
        self.compare(register, value);
    }
}

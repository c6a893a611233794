use crate::cpu6502::{CPU, Operand};

impl CPU {
    // SAX stores A AND X without touching any flags
    pub(crate) fn handle_sax(&mut self, operand: Operand) {
        let value = self.accumulator & self.x_register;
        self.write_operand(operand, value);
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    // IGN performs the full operand read, page-cross penalty included, and
    // throws the byte away.
    pub(crate) fn handle_ign(&mut self, operand: Operand) {
        self.read_operand(operand);
    }
}

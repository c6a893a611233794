use crate::cpu6502::{CPU, Operand};

impl CPU {
    // TXS is the one transfer that sets no flags
    pub(crate) fn handle_txs(&mut self, _operand: Operand) {
        self.stack_pointer = self.x_register;
    }
}

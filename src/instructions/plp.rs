use crate::cpu6502::{CPU, Operand};

impl CPU {
    // B and U in the popped byte are discarded; U always reads back as 1
    pub(crate) fn handle_plp(&mut self, _operand: Operand) {
        self.stall_cycle();
        let bits = self.pop_u8();
        self.restore_status(bits);
    }
}

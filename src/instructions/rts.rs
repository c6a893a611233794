use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_rts(&mut self, _operand: Operand) {
        // Stack pointer increment, two pops, then the PC increment
        self.stall_cycle();
        let addr = self.pop_u16();
        self.stall_cycle();
        self.program_counter = addr.wrapping_add(1);
    }
}

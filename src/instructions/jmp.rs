use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_jmp(&mut self, operand: Operand) {
        let Operand::Address(addr) = operand else {
            unreachable!("BUG: JMP operand should be an address");
        };
        self.program_counter = addr;
    }
}

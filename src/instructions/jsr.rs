use crate::cpu6502::{CPU, Operand};

impl CPU {
    pub(crate) fn handle_jsr(&mut self, operand: Operand) {
        let Operand::Address(addr) = operand else {
            unreachable!("BUG: JSR operand should be an address");
        };
        // One internal cycle, then push the address of the last byte of the
        // JSR instruction (PC already points past the operand)
        self.stall_cycle();
        let return_addr = self.program_counter.wrapping_sub(1);
        self.push_u16(return_addr);
        self.program_counter = addr;
    }
}

use crate::cpu6502::{CPU, Operand};

impl CPU {
    // ISB (also known as ISC): increment the memory operand, then SBC it
    pub(crate) fn handle_isb(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |_, value| value.wrapping_add(1));
        self.add_to_accumulator(result ^ 0xFF);
    }
}

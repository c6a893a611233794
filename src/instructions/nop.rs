use crate::cpu6502::{CPU, Operand};

impl CPU {
    // Covers the official $EA, the unofficial implied NOPs and the
    // immediate-consuming SKB variants; the addressing mode has already
    // burned the right cycles by the time we get here.
    pub(crate) fn handle_nop(&mut self, _operand: Operand) {}
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // SRE: shift the memory operand right, then EOR into A
    pub(crate) fn handle_sre(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            cpu.status.set(Status::CARRY, value & 0x01 != 0);
            value >> 1
        });
        self.accumulator ^= result;
        let a = self.accumulator;
        self.set_zero_negative(a);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // SLO: shift the memory operand left, then OR the result into A
    pub(crate) fn handle_slo(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            cpu.status.set(Status::CARRY, value & 0x80 != 0);
            value << 1
        });
        self.accumulator |= result;
        let a = self.accumulator;
        self.set_zero_negative(a);
    }
}

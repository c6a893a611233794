use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // RRA: rotate the memory operand right through carry, then ADC the
    // rotated value (the rotate's carry-out feeds the addition)
    pub(crate) fn handle_rra(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            let carry_in = if cpu.status.contains(Status::CARRY) { 0x80 } else { 0 };
            cpu.status.set(Status::CARRY, value & 0x01 != 0);
            (value >> 1) | carry_in
        });
        self.add_to_accumulator(result);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_rol(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            let carry_in = if cpu.status.contains(Status::CARRY) { 1 } else { 0 };
            cpu.status.set(Status::CARRY, value & 0x80 != 0);
            (value << 1) | carry_in
        });
        self.set_zero_negative(result);
    }
}

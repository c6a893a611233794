use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_asl(&mut self, operand: Operand) {
        let result = self.modify_operand(operand, |cpu, value| {
            cpu.status.set(Status::CARRY, value & 0x80 != 0);
            value << 1
        });
        self.set_zero_negative(result);
    }
}

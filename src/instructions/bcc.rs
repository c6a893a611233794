use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_bcc(&mut self, operand: Operand) {
        let condition = !self.status.contains(Status::CARRY);
        self.branch(condition, operand);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_bne(&mut self, operand: Operand) {
        let condition = !self.status.contains(Status::ZERO);
        self.branch(condition, operand);
    }
}

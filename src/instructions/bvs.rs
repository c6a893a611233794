use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_bvs(&mut self, operand: Operand) {
        let condition = self.status.contains(Status::OVERFLOW);
        self.branch(condition, operand);
    }
}

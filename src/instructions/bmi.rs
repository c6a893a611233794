use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_bmi(&mut self, operand: Operand) {
        let condition = self.status.contains(Status::NEGATIVE);
        self.branch(condition, operand);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_sei(&mut self, _operand: Operand) {
        self.status.insert(Status::INTERRUPT_DISABLE);
    }
}

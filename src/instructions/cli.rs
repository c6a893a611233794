use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_cli(&mut self, _operand: Operand) {
        self.status.remove(Status::INTERRUPT_DISABLE);
    }
}

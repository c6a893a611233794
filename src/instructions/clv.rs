use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // CLV has no SEV counterpart; V is otherwise only set by ADC/SBC/BIT
    pub(crate) fn handle_clv(&mut self, _operand: Operand) {
        self.status.remove(Status::OVERFLOW);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    pub(crate) fn handle_sed(&mut self, _operand: Operand) {
        self.status.insert(Status::DECIMAL);
    }
}

use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // D is just a stored bit on this CPU, arithmetic never looks at it
    pub(crate) fn handle_cld(&mut self, _operand: Operand) {
        self.status.remove(Status::DECIMAL);
    }
}

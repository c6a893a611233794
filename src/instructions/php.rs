use crate::cpu6502::{CPU, Operand};

impl CPU {
    // The pushed copy always has B and U set
    pub(crate) fn handle_php(&mut self, _operand: Operand) {
        let value = self.status_for_push();
        self.push_u8(value);
    }
}

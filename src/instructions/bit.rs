use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // A & M sets Z but the result is discarded; N and V mirror bits 7 and 6
    // of the memory operand.
    pub(crate) fn handle_bit(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.status.set(Status::ZERO, self.accumulator & value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
        self.status.set(Status::OVERFLOW, value & 0x40 != 0);
    }
}

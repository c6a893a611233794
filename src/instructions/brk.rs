use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    // Pushes PC past the padding byte and the status with B|U set, raises
    // I, and vectors through $FFFE. The run loop treats a retired BRK as
    // the end of the program.
    pub(crate) fn handle_brk(&mut self, _operand: Operand) {
        let return_addr = self.program_counter.wrapping_add(1);
        self.push_u16(return_addr);
        let status = self.status_for_push();
        self.push_u8(status);
        self.status.insert(Status::INTERRUPT_DISABLE);
        let low = self.read_cycle(Self::IRQ_VECTOR_ADDRESS);
        let high = self.read_cycle(Self::IRQ_VECTOR_ADDRESS + 1);
        self.program_counter = u16::from_le_bytes([low, high]);
    }
}

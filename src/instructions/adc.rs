use crate::cpu6502::{CPU, Operand, Status};

impl CPU {
    /// Adds `value` plus the carry bit into the accumulator and updates
    /// C, V, Z and N. Shared by ADC, SBC (operand inverted) and the
    /// unofficial RRA/ISB combos.
    pub(crate) fn add_to_accumulator(&mut self, value: u8) {
        let carry_in = if self.status.contains(Status::CARRY) { 1 } else { 0 };
        let sum = self.accumulator as u16 + value as u16 + carry_in;
        let result = sum as u8;

        self.status.set(Status::CARRY, sum > 0xFF);
        // Signed overflow: both inputs agree on sign, the result disagrees
        let overflow = (self.accumulator ^ result) & (value ^ result) & 0x80 != 0;
        self.status.set(Status::OVERFLOW, overflow);

        self.accumulator = result;
        self.set_zero_negative(result);
    }

    pub(crate) fn handle_adc(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.add_to_accumulator(value);
    }
}

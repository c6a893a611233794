use crate::cpu6502::{CPU, Operand};

impl CPU {
    // Pops the status (B discarded, U forced) and then the return address;
    // unlike RTS there is no +1 adjustment.
    pub(crate) fn handle_rti(&mut self, _operand: Operand) {
        self.stall_cycle();
        let bits = self.pop_u8();
        self.restore_status(bits);
        self.program_counter = self.pop_u16();
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu6502::{Operand, Status, new_cpu};
    use crate::rom::Rom;

    #[test]
    fn test_rti_restores_status_and_pc() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.push_u16(0xC123);
        cpu.push_u8(0x31); // carry plus B and U from a pushed copy
        cpu.handle_rti(Operand::None);
        assert_eq!(cpu.program_counter, 0xC123);
        assert!(cpu.status.contains(Status::CARRY));
        assert!(!cpu.status.contains(Status::BREAK));
        assert!(cpu.status.contains(Status::UNUSED));
    }
}

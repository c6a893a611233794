use std::fmt;
use std::io::{self, Write};

use bitflags::bitflags;
use once_cell::sync::Lazy;
use phf::phf_map;

use crate::bus::Bus;

bitflags! {
    // Processor status register, one bit per flag:
    // Bit 7: Negative (N)
    // Bit 6: Overflow (V)
    // Bit 5: Unused (U), reads back as 1
    // Bit 4: Break command (B), only meaningful in pushed copies
    // Bit 3: Decimal mode (D), no arithmetic effect on this CPU
    // Bit 2: Interrupt disable (I)
    // Bit 1: Zero (Z)
    // Bit 0: Carry (C)
    pub(crate) struct Status: u8 {
        const CARRY             = 0b0000_0001;
        const ZERO              = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL           = 0b0000_1000;
        const BREAK             = 0b0001_0000;
        const UNUSED            = 0b0010_0000;
        const OVERFLOW          = 0b0100_0000;
        const NEGATIVE          = 0b1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressingMode {
    Absolute,    // e.g. LDA $1234
    AbsoluteX,   // e.g. LDA $1234,X
    AbsoluteY,   // e.g. LDA $1234,Y
    Accumulator, // e.g. ASL A
    Immediate,   // e.g. LDA #$10
    Implicit,    // e.g. CLC, INX (no operand)
    Indirect,    // e.g. JMP ($1234)
    IndirectX,   // e.g. LDA ($10,X)
    IndirectY,   // e.g. LDA ($10),Y
    Relative,    // e.g. BEQ +5
    ZeroPage,    // e.g. LDA $10
    ZeroPageX,   // e.g. LDA $10,X
    ZeroPageY,   // e.g. LDX $10,Y
}

// How an instruction touches its resolved address. Indexed modes take the
// extra "oops" cycle only when a read crosses a page; stores and
// read-modify-write instructions always take it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemoryAccess {
    Read,
    Write,
    ReadModifyWrite,
}

/// A resolved operand, ready for the instruction handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    Address(u16),
    Immediate(u8),
    Accumulator,
    None,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpCode {
    pub opcode: u8,
    pub name: &'static str,
    // Unofficial opcodes get a '*' marker in the trace
    pub official: bool,
    // Function pointer to the instruction handler
    pub handler: fn(&mut CPU, Operand),
    pub addressing_mode: AddressingMode,
    pub access: MemoryAccess,
    pub bytes: u8,
    // Published cycle count before branch and page-cross adjustments
    pub cycles: u8,
}

pub(crate) struct CPU {
    // More info about the 6502 registers can be found here:
    // https://www.nesdev.org/obelisk-6502-guide/registers.html

    // The program counter is a 16 bit register that holds the memory address
    // of the next instruction to be executed.
    pub program_counter: u16,

    // The stack pointer is an 8 bit register holding the low 8 bits of the
    // next free location on the stack. The stack itself is fixed in page
    // $01 (0x0100 - 0x01FF) and wraps within it.
    pub stack_pointer: u8,

    // The accumulator is an 8 bit register used for arithmetic and logical
    // operations.
    pub accumulator: u8,

    // The 8 bit index registers, most commonly holding counters or offsets
    // for accessing memory.
    pub x_register: u8,
    pub y_register: u8,

    // Processor status flags, updated as instructions execute.
    pub status: Status,

    // Global cycle counter. Every bus transaction and every documented
    // internal tick bumps this by exactly one, which is what makes the
    // per-instruction cycle counts come out right.
    pub cycles: u64,

    bus: Bus,

    // Where recoverable decode diagnostics go. The host may swap this out.
    diagnostics: Box<dyn io::Write>,
}

pub(crate) fn new_cpu(bus: Bus) -> CPU {
    CPU {
        program_counter: 0x0000,
        stack_pointer: CPU::STACK_RESET,
        accumulator: 0x00,
        x_register: 0x00,
        y_register: 0x00,
        status: Status::INTERRUPT_DISABLE | Status::UNUSED,
        cycles: 0,
        bus,
        diagnostics: Box::new(io::stderr()),
    }
}

/// What a single fetch/execute iteration produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepResult {
    Executed,
    // The opcode byte has no table entry; it was skipped
    DecodeMiss(u8),
    // BRK retired, the run is over
    Halt,
}

// List of all opcodes and their corresponding descriptors. This is the
// single source of truth; the dense dispatch table below is derived from it.
static OPCODE_MAP: phf::Map<u8, OpCode> = phf_map! {
    // ADC Instructions
    0x69u8 => OpCode { opcode: 0x69, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x65u8 => OpCode { opcode: 0x65, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x75u8 => OpCode { opcode: 0x75, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x6Du8 => OpCode { opcode: 0x6D, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0x7Du8 => OpCode { opcode: 0x7D, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x79u8 => OpCode { opcode: 0x79, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x61u8 => OpCode { opcode: 0x61, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0x71u8 => OpCode { opcode: 0x71, name: "ADC", official: true, handler: CPU::handle_adc, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // AND Instructions
    0x29u8 => OpCode { opcode: 0x29, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x25u8 => OpCode { opcode: 0x25, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x35u8 => OpCode { opcode: 0x35, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x2Du8 => OpCode { opcode: 0x2D, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0x3Du8 => OpCode { opcode: 0x3D, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x39u8 => OpCode { opcode: 0x39, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x21u8 => OpCode { opcode: 0x21, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0x31u8 => OpCode { opcode: 0x31, name: "AND", official: true, handler: CPU::handle_and, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // ASL Instructions
    0x0Au8 => OpCode { opcode: 0x0A, name: "ASL", official: true, handler: CPU::handle_asl, addressing_mode: AddressingMode::Accumulator, access: MemoryAccess::ReadModifyWrite, bytes: 1, cycles: 2 },
    0x06u8 => OpCode { opcode: 0x06, name: "ASL", official: true, handler: CPU::handle_asl, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x16u8 => OpCode { opcode: 0x16, name: "ASL", official: true, handler: CPU::handle_asl, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x0Eu8 => OpCode { opcode: 0x0E, name: "ASL", official: true, handler: CPU::handle_asl, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x1Eu8 => OpCode { opcode: 0x1E, name: "ASL", official: true, handler: CPU::handle_asl, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // Branch Instructions
    0x90u8 => OpCode { opcode: 0x90, name: "BCC", official: true, handler: CPU::handle_bcc, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0xB0u8 => OpCode { opcode: 0xB0, name: "BCS", official: true, handler: CPU::handle_bcs, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0xF0u8 => OpCode { opcode: 0xF0, name: "BEQ", official: true, handler: CPU::handle_beq, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0x30u8 => OpCode { opcode: 0x30, name: "BMI", official: true, handler: CPU::handle_bmi, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0xD0u8 => OpCode { opcode: 0xD0, name: "BNE", official: true, handler: CPU::handle_bne, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0x10u8 => OpCode { opcode: 0x10, name: "BPL", official: true, handler: CPU::handle_bpl, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0x50u8 => OpCode { opcode: 0x50, name: "BVC", official: true, handler: CPU::handle_bvc, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },
    0x70u8 => OpCode { opcode: 0x70, name: "BVS", official: true, handler: CPU::handle_bvs, addressing_mode: AddressingMode::Relative, access: MemoryAccess::Read, bytes: 2, cycles: 2 /* +1 if taken, +2 if to a new page */ },

    // BIT Instructions
    0x24u8 => OpCode { opcode: 0x24, name: "BIT", official: true, handler: CPU::handle_bit, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x2Cu8 => OpCode { opcode: 0x2C, name: "BIT", official: true, handler: CPU::handle_bit, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },

    // BRK Instructions
    0x00u8 => OpCode { opcode: 0x00, name: "BRK", official: true, handler: CPU::handle_brk, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 7 },

    // Flag Instructions
    0x18u8 => OpCode { opcode: 0x18, name: "CLC", official: true, handler: CPU::handle_clc, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xD8u8 => OpCode { opcode: 0xD8, name: "CLD", official: true, handler: CPU::handle_cld, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x58u8 => OpCode { opcode: 0x58, name: "CLI", official: true, handler: CPU::handle_cli, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xB8u8 => OpCode { opcode: 0xB8, name: "CLV", official: true, handler: CPU::handle_clv, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x38u8 => OpCode { opcode: 0x38, name: "SEC", official: true, handler: CPU::handle_sec, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xF8u8 => OpCode { opcode: 0xF8, name: "SED", official: true, handler: CPU::handle_sed, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x78u8 => OpCode { opcode: 0x78, name: "SEI", official: true, handler: CPU::handle_sei, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // CMP Instructions
    0xC9u8 => OpCode { opcode: 0xC9, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xC5u8 => OpCode { opcode: 0xC5, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xD5u8 => OpCode { opcode: 0xD5, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xCDu8 => OpCode { opcode: 0xCD, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xDDu8 => OpCode { opcode: 0xDD, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xD9u8 => OpCode { opcode: 0xD9, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xC1u8 => OpCode { opcode: 0xC1, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0xD1u8 => OpCode { opcode: 0xD1, name: "CMP", official: true, handler: CPU::handle_cmp, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // CPX Instructions
    0xE0u8 => OpCode { opcode: 0xE0, name: "CPX", official: true, handler: CPU::handle_cpx, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xE4u8 => OpCode { opcode: 0xE4, name: "CPX", official: true, handler: CPU::handle_cpx, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xECu8 => OpCode { opcode: 0xEC, name: "CPX", official: true, handler: CPU::handle_cpx, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },

    // CPY Instructions
    0xC0u8 => OpCode { opcode: 0xC0, name: "CPY", official: true, handler: CPU::handle_cpy, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xC4u8 => OpCode { opcode: 0xC4, name: "CPY", official: true, handler: CPU::handle_cpy, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xCCu8 => OpCode { opcode: 0xCC, name: "CPY", official: true, handler: CPU::handle_cpy, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },

    // DEC Instructions
    0xC6u8 => OpCode { opcode: 0xC6, name: "DEC", official: true, handler: CPU::handle_dec, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0xD6u8 => OpCode { opcode: 0xD6, name: "DEC", official: true, handler: CPU::handle_dec, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0xCEu8 => OpCode { opcode: 0xCE, name: "DEC", official: true, handler: CPU::handle_dec, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0xDEu8 => OpCode { opcode: 0xDE, name: "DEC", official: true, handler: CPU::handle_dec, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // DEX / DEY Instructions
    0xCAu8 => OpCode { opcode: 0xCA, name: "DEX", official: true, handler: CPU::handle_dex, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x88u8 => OpCode { opcode: 0x88, name: "DEY", official: true, handler: CPU::handle_dey, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // EOR Instructions
    0x49u8 => OpCode { opcode: 0x49, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x45u8 => OpCode { opcode: 0x45, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x55u8 => OpCode { opcode: 0x55, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x4Du8 => OpCode { opcode: 0x4D, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0x5Du8 => OpCode { opcode: 0x5D, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x59u8 => OpCode { opcode: 0x59, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x41u8 => OpCode { opcode: 0x41, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0x51u8 => OpCode { opcode: 0x51, name: "EOR", official: true, handler: CPU::handle_eor, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // INC Instructions
    0xE6u8 => OpCode { opcode: 0xE6, name: "INC", official: true, handler: CPU::handle_inc, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0xF6u8 => OpCode { opcode: 0xF6, name: "INC", official: true, handler: CPU::handle_inc, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0xEEu8 => OpCode { opcode: 0xEE, name: "INC", official: true, handler: CPU::handle_inc, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0xFEu8 => OpCode { opcode: 0xFE, name: "INC", official: true, handler: CPU::handle_inc, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // INX / INY Instructions
    0xE8u8 => OpCode { opcode: 0xE8, name: "INX", official: true, handler: CPU::handle_inx, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xC8u8 => OpCode { opcode: 0xC8, name: "INY", official: true, handler: CPU::handle_iny, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // JMP Instructions
    0x4Cu8 => OpCode { opcode: 0x4C, name: "JMP", official: true, handler: CPU::handle_jmp, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 3 },
    0x6Cu8 => OpCode { opcode: 0x6C, name: "JMP", official: true, handler: CPU::handle_jmp, addressing_mode: AddressingMode::Indirect, access: MemoryAccess::Read, bytes: 3, cycles: 5 },

    // JSR Instructions
    0x20u8 => OpCode { opcode: 0x20, name: "JSR", official: true, handler: CPU::handle_jsr, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 6 },

    // LDA Instructions
    0xA9u8 => OpCode { opcode: 0xA9, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xA5u8 => OpCode { opcode: 0xA5, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xB5u8 => OpCode { opcode: 0xB5, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xADu8 => OpCode { opcode: 0xAD, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xBDu8 => OpCode { opcode: 0xBD, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xB9u8 => OpCode { opcode: 0xB9, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xA1u8 => OpCode { opcode: 0xA1, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0xB1u8 => OpCode { opcode: 0xB1, name: "LDA", official: true, handler: CPU::handle_lda, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // LDX Instructions
    0xA2u8 => OpCode { opcode: 0xA2, name: "LDX", official: true, handler: CPU::handle_ldx, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xA6u8 => OpCode { opcode: 0xA6, name: "LDX", official: true, handler: CPU::handle_ldx, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xB6u8 => OpCode { opcode: 0xB6, name: "LDX", official: true, handler: CPU::handle_ldx, addressing_mode: AddressingMode::ZeroPageY, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xAEu8 => OpCode { opcode: 0xAE, name: "LDX", official: true, handler: CPU::handle_ldx, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xBEu8 => OpCode { opcode: 0xBE, name: "LDX", official: true, handler: CPU::handle_ldx, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },

    // LDY Instructions
    0xA0u8 => OpCode { opcode: 0xA0, name: "LDY", official: true, handler: CPU::handle_ldy, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xA4u8 => OpCode { opcode: 0xA4, name: "LDY", official: true, handler: CPU::handle_ldy, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xB4u8 => OpCode { opcode: 0xB4, name: "LDY", official: true, handler: CPU::handle_ldy, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xACu8 => OpCode { opcode: 0xAC, name: "LDY", official: true, handler: CPU::handle_ldy, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xBCu8 => OpCode { opcode: 0xBC, name: "LDY", official: true, handler: CPU::handle_ldy, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },

    // LSR Instructions
    0x4Au8 => OpCode { opcode: 0x4A, name: "LSR", official: true, handler: CPU::handle_lsr, addressing_mode: AddressingMode::Accumulator, access: MemoryAccess::ReadModifyWrite, bytes: 1, cycles: 2 },
    0x46u8 => OpCode { opcode: 0x46, name: "LSR", official: true, handler: CPU::handle_lsr, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x56u8 => OpCode { opcode: 0x56, name: "LSR", official: true, handler: CPU::handle_lsr, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x4Eu8 => OpCode { opcode: 0x4E, name: "LSR", official: true, handler: CPU::handle_lsr, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x5Eu8 => OpCode { opcode: 0x5E, name: "LSR", official: true, handler: CPU::handle_lsr, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // NOP Instructions
    0xEAu8 => OpCode { opcode: 0xEA, name: "NOP", official: true, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // ORA Instructions
    0x09u8 => OpCode { opcode: 0x09, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x05u8 => OpCode { opcode: 0x05, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x15u8 => OpCode { opcode: 0x15, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x0Du8 => OpCode { opcode: 0x0D, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0x1Du8 => OpCode { opcode: 0x1D, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x19u8 => OpCode { opcode: 0x19, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x01u8 => OpCode { opcode: 0x01, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0x11u8 => OpCode { opcode: 0x11, name: "ORA", official: true, handler: CPU::handle_ora, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // Stack Instructions
    0x48u8 => OpCode { opcode: 0x48, name: "PHA", official: true, handler: CPU::handle_pha, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 3 },
    0x08u8 => OpCode { opcode: 0x08, name: "PHP", official: true, handler: CPU::handle_php, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 3 },
    0x68u8 => OpCode { opcode: 0x68, name: "PLA", official: true, handler: CPU::handle_pla, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 4 },
    0x28u8 => OpCode { opcode: 0x28, name: "PLP", official: true, handler: CPU::handle_plp, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 4 },

    // ROL Instructions
    0x2Au8 => OpCode { opcode: 0x2A, name: "ROL", official: true, handler: CPU::handle_rol, addressing_mode: AddressingMode::Accumulator, access: MemoryAccess::ReadModifyWrite, bytes: 1, cycles: 2 },
    0x26u8 => OpCode { opcode: 0x26, name: "ROL", official: true, handler: CPU::handle_rol, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x36u8 => OpCode { opcode: 0x36, name: "ROL", official: true, handler: CPU::handle_rol, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x2Eu8 => OpCode { opcode: 0x2E, name: "ROL", official: true, handler: CPU::handle_rol, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x3Eu8 => OpCode { opcode: 0x3E, name: "ROL", official: true, handler: CPU::handle_rol, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // ROR Instructions
    0x6Au8 => OpCode { opcode: 0x6A, name: "ROR", official: true, handler: CPU::handle_ror, addressing_mode: AddressingMode::Accumulator, access: MemoryAccess::ReadModifyWrite, bytes: 1, cycles: 2 },
    0x66u8 => OpCode { opcode: 0x66, name: "ROR", official: true, handler: CPU::handle_ror, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x76u8 => OpCode { opcode: 0x76, name: "ROR", official: true, handler: CPU::handle_ror, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x6Eu8 => OpCode { opcode: 0x6E, name: "ROR", official: true, handler: CPU::handle_ror, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x7Eu8 => OpCode { opcode: 0x7E, name: "ROR", official: true, handler: CPU::handle_ror, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // RTI / RTS Instructions
    0x40u8 => OpCode { opcode: 0x40, name: "RTI", official: true, handler: CPU::handle_rti, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 6 },
    0x60u8 => OpCode { opcode: 0x60, name: "RTS", official: true, handler: CPU::handle_rts, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 6 },

    // SBC Instructions
    0xE9u8 => OpCode { opcode: 0xE9, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xE5u8 => OpCode { opcode: 0xE5, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xF5u8 => OpCode { opcode: 0xF5, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xEDu8 => OpCode { opcode: 0xED, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xFDu8 => OpCode { opcode: 0xFD, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xF9u8 => OpCode { opcode: 0xF9, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xE1u8 => OpCode { opcode: 0xE1, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0xF1u8 => OpCode { opcode: 0xF1, name: "SBC", official: true, handler: CPU::handle_sbc, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },

    // STA Instructions
    0x85u8 => OpCode { opcode: 0x85, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Write, bytes: 2, cycles: 3 },
    0x95u8 => OpCode { opcode: 0x95, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Write, bytes: 2, cycles: 4 },
    0x8Du8 => OpCode { opcode: 0x8D, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Write, bytes: 3, cycles: 4 },
    0x9Du8 => OpCode { opcode: 0x9D, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Write, bytes: 3, cycles: 5 },
    0x99u8 => OpCode { opcode: 0x99, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Write, bytes: 3, cycles: 5 },
    0x81u8 => OpCode { opcode: 0x81, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Write, bytes: 2, cycles: 6 },
    0x91u8 => OpCode { opcode: 0x91, name: "STA", official: true, handler: CPU::handle_sta, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Write, bytes: 2, cycles: 6 },

    // STX Instructions
    0x86u8 => OpCode { opcode: 0x86, name: "STX", official: true, handler: CPU::handle_stx, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Write, bytes: 2, cycles: 3 },
    0x96u8 => OpCode { opcode: 0x96, name: "STX", official: true, handler: CPU::handle_stx, addressing_mode: AddressingMode::ZeroPageY, access: MemoryAccess::Write, bytes: 2, cycles: 4 },
    0x8Eu8 => OpCode { opcode: 0x8E, name: "STX", official: true, handler: CPU::handle_stx, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Write, bytes: 3, cycles: 4 },

    // STY Instructions
    0x84u8 => OpCode { opcode: 0x84, name: "STY", official: true, handler: CPU::handle_sty, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Write, bytes: 2, cycles: 3 },
    0x94u8 => OpCode { opcode: 0x94, name: "STY", official: true, handler: CPU::handle_sty, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Write, bytes: 2, cycles: 4 },
    0x8Cu8 => OpCode { opcode: 0x8C, name: "STY", official: true, handler: CPU::handle_sty, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Write, bytes: 3, cycles: 4 },

    // Transfer Instructions
    0xAAu8 => OpCode { opcode: 0xAA, name: "TAX", official: true, handler: CPU::handle_tax, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xA8u8 => OpCode { opcode: 0xA8, name: "TAY", official: true, handler: CPU::handle_tay, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xBAu8 => OpCode { opcode: 0xBA, name: "TSX", official: true, handler: CPU::handle_tsx, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x8Au8 => OpCode { opcode: 0x8A, name: "TXA", official: true, handler: CPU::handle_txa, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x9Au8 => OpCode { opcode: 0x9A, name: "TXS", official: true, handler: CPU::handle_txs, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x98u8 => OpCode { opcode: 0x98, name: "TYA", official: true, handler: CPU::handle_tya, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // Unofficial NOP variants (implied)
    0x1Au8 => OpCode { opcode: 0x1A, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x3Au8 => OpCode { opcode: 0x3A, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x5Au8 => OpCode { opcode: 0x5A, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0x7Au8 => OpCode { opcode: 0x7A, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xDAu8 => OpCode { opcode: 0xDA, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },
    0xFAu8 => OpCode { opcode: 0xFA, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, access: MemoryAccess::Read, bytes: 1, cycles: 2 },

    // SKB: NOP variants that consume an immediate byte
    0x80u8 => OpCode { opcode: 0x80, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x82u8 => OpCode { opcode: 0x82, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0x89u8 => OpCode { opcode: 0x89, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xC2u8 => OpCode { opcode: 0xC2, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },
    0xE2u8 => OpCode { opcode: 0xE2, name: "NOP", official: false, handler: CPU::handle_nop, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },

    // IGN: NOP variants that read memory and discard it
    0x0Cu8 => OpCode { opcode: 0x0C, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0x04u8 => OpCode { opcode: 0x04, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x44u8 => OpCode { opcode: 0x44, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x64u8 => OpCode { opcode: 0x64, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0x14u8 => OpCode { opcode: 0x14, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x34u8 => OpCode { opcode: 0x34, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x54u8 => OpCode { opcode: 0x54, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x74u8 => OpCode { opcode: 0x74, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xD4u8 => OpCode { opcode: 0xD4, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xF4u8 => OpCode { opcode: 0xF4, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0x1Cu8 => OpCode { opcode: 0x1C, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x3Cu8 => OpCode { opcode: 0x3C, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x5Cu8 => OpCode { opcode: 0x5C, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0x7Cu8 => OpCode { opcode: 0x7C, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xDCu8 => OpCode { opcode: 0xDC, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },
    0xFCu8 => OpCode { opcode: 0xFC, name: "NOP", official: false, handler: CPU::handle_ign, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },

    // LAX Instructions
    0xA3u8 => OpCode { opcode: 0xA3, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Read, bytes: 2, cycles: 6 },
    0xA7u8 => OpCode { opcode: 0xA7, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Read, bytes: 2, cycles: 3 },
    0xAFu8 => OpCode { opcode: 0xAF, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Read, bytes: 3, cycles: 4 },
    0xB3u8 => OpCode { opcode: 0xB3, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::Read, bytes: 2, cycles: 5 /* +1 if page crossed */ },
    0xB7u8 => OpCode { opcode: 0xB7, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::ZeroPageY, access: MemoryAccess::Read, bytes: 2, cycles: 4 },
    0xBFu8 => OpCode { opcode: 0xBF, name: "LAX", official: false, handler: CPU::handle_lax, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::Read, bytes: 3, cycles: 4 /* +1 if page crossed */ },

    // SAX Instructions
    0x83u8 => OpCode { opcode: 0x83, name: "SAX", official: false, handler: CPU::handle_sax, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::Write, bytes: 2, cycles: 6 },
    0x87u8 => OpCode { opcode: 0x87, name: "SAX", official: false, handler: CPU::handle_sax, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::Write, bytes: 2, cycles: 3 },
    0x8Fu8 => OpCode { opcode: 0x8F, name: "SAX", official: false, handler: CPU::handle_sax, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::Write, bytes: 3, cycles: 4 },
    0x97u8 => OpCode { opcode: 0x97, name: "SAX", official: false, handler: CPU::handle_sax, addressing_mode: AddressingMode::ZeroPageY, access: MemoryAccess::Write, bytes: 2, cycles: 4 },

    // Unofficial SBC alias
    0xEBu8 => OpCode { opcode: 0xEB, name: "SBC", official: false, handler: CPU::handle_sbc, addressing_mode: AddressingMode::Immediate, access: MemoryAccess::Read, bytes: 2, cycles: 2 },

    // SLO Instructions (ASL memory, then ORA)
    0x03u8 => OpCode { opcode: 0x03, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x07u8 => OpCode { opcode: 0x07, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x0Fu8 => OpCode { opcode: 0x0F, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x13u8 => OpCode { opcode: 0x13, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x17u8 => OpCode { opcode: 0x17, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x1Bu8 => OpCode { opcode: 0x1B, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0x1Fu8 => OpCode { opcode: 0x1F, name: "SLO", official: false, handler: CPU::handle_slo, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // RLA Instructions (ROL memory, then AND)
    0x23u8 => OpCode { opcode: 0x23, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x27u8 => OpCode { opcode: 0x27, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x2Fu8 => OpCode { opcode: 0x2F, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x33u8 => OpCode { opcode: 0x33, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x37u8 => OpCode { opcode: 0x37, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x3Bu8 => OpCode { opcode: 0x3B, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0x3Fu8 => OpCode { opcode: 0x3F, name: "RLA", official: false, handler: CPU::handle_rla, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // SRE Instructions (LSR memory, then EOR)
    0x43u8 => OpCode { opcode: 0x43, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x47u8 => OpCode { opcode: 0x47, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x4Fu8 => OpCode { opcode: 0x4F, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x53u8 => OpCode { opcode: 0x53, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x57u8 => OpCode { opcode: 0x57, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x5Bu8 => OpCode { opcode: 0x5B, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0x5Fu8 => OpCode { opcode: 0x5F, name: "SRE", official: false, handler: CPU::handle_sre, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // RRA Instructions (ROR memory, then ADC)
    0x63u8 => OpCode { opcode: 0x63, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x67u8 => OpCode { opcode: 0x67, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0x6Fu8 => OpCode { opcode: 0x6F, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0x73u8 => OpCode { opcode: 0x73, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0x77u8 => OpCode { opcode: 0x77, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0x7Bu8 => OpCode { opcode: 0x7B, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0x7Fu8 => OpCode { opcode: 0x7F, name: "RRA", official: false, handler: CPU::handle_rra, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // DCP Instructions (DEC memory, then CMP)
    0xC3u8 => OpCode { opcode: 0xC3, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0xC7u8 => OpCode { opcode: 0xC7, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0xCFu8 => OpCode { opcode: 0xCF, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0xD3u8 => OpCode { opcode: 0xD3, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0xD7u8 => OpCode { opcode: 0xD7, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0xDBu8 => OpCode { opcode: 0xDB, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0xDFu8 => OpCode { opcode: 0xDF, name: "DCP", official: false, handler: CPU::handle_dcp, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },

    // ISB Instructions (INC memory, then SBC)
    0xE3u8 => OpCode { opcode: 0xE3, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::IndirectX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0xE7u8 => OpCode { opcode: 0xE7, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::ZeroPage, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 5 },
    0xEFu8 => OpCode { opcode: 0xEF, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::Absolute, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 6 },
    0xF3u8 => OpCode { opcode: 0xF3, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::IndirectY, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 8 },
    0xF7u8 => OpCode { opcode: 0xF7, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::ZeroPageX, access: MemoryAccess::ReadModifyWrite, bytes: 2, cycles: 6 },
    0xFBu8 => OpCode { opcode: 0xFB, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::AbsoluteY, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
    0xFFu8 => OpCode { opcode: 0xFF, name: "ISB", official: false, handler: CPU::handle_isb, addressing_mode: AddressingMode::AbsoluteX, access: MemoryAccess::ReadModifyWrite, bytes: 3, cycles: 7 },
};

// Dense lookup table for the fetch/execute loop, built once from the map
static OPCODE_TABLE: Lazy<[Option<&'static OpCode>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for (opcode, entry) in OPCODE_MAP.entries() {
        table[*opcode as usize] = Some(entry);
    }
    table
});

pub(crate) fn decode(opcode: u8) -> Option<&'static OpCode> {
    OPCODE_TABLE[opcode as usize]
}

impl CPU {
    pub(crate) const STACK_BASE_ADDRESS: u16 = 0x0100;
    // Stack pointer value after the (not emulated) 7-cycle reset sequence
    pub(crate) const STACK_RESET: u8 = 0xFD;
    pub(crate) const RESET_VECTOR_ADDRESS: u16 = 0xFFFC;
    pub(crate) const IRQ_VECTOR_ADDRESS: u16 = 0xFFFE;

    // ---- memory helpers -------------------------------------------------
    // The plain read/write helpers below do not touch the cycle counter;
    // everything the running program does goes through the *_cycle variants.

    pub(crate) fn read_u8(&self, addr: u16) -> u8 {
        self.bus.read_u8(addr)
    }

    #[allow(dead_code)]
    pub(crate) fn write_u8(&mut self, addr: u16, value: u8) {
        self.bus.write_u8(addr, value);
    }

    pub(crate) fn read_u16(&self, addr: u16) -> u16 {
        // Little-endian: low byte at addr, high byte at addr + 1
        u16::from_le_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    // ---- cycle accounting -----------------------------------------------

    /// Runs `f` and charges exactly one cycle for it. Every bus transaction
    /// and every documented internal tick of an instruction goes through
    /// here, so `cycles` always equals the number of invocations.
    pub(crate) fn exec_in_cycle<T>(&mut self, f: impl FnOnce(&mut CPU) -> T) -> T {
        let result = f(self);
        self.cycles += 1;
        result
    }

    pub(crate) fn read_cycle(&mut self, addr: u16) -> u8 {
        self.exec_in_cycle(|cpu| cpu.bus.read_u8(addr))
    }

    pub(crate) fn write_cycle(&mut self, addr: u16, value: u8) {
        self.exec_in_cycle(|cpu| cpu.bus.write_u8(addr, value));
    }

    /// An internal cycle with no visible bus traffic (stack pointer
    /// adjustments, PC fix-ups and the like).
    pub(crate) fn stall_cycle(&mut self) {
        self.exec_in_cycle(|_| ());
    }

    fn read_pc_cycle(&mut self) -> u8 {
        let value = self.read_cycle(self.program_counter);
        self.program_counter = self.program_counter.wrapping_add(1);
        value
    }

    // ---- status helpers -------------------------------------------------

    pub(crate) fn set_zero_negative(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, (value & 0x80) != 0);
    }

    /// Status byte as pushed by PHP/BRK: B and U both read as 1.
    pub(crate) fn status_for_push(&self) -> u8 {
        (self.status | Status::BREAK | Status::UNUSED).bits()
    }

    /// Restores the status register from a popped byte. The B bit only
    /// exists in pushed copies and U always reads back as 1.
    pub(crate) fn restore_status(&mut self, bits: u8) {
        self.status = (Status::from_bits_truncate(bits) - Status::BREAK) | Status::UNUSED;
    }

    // ---- stack ------------------------------------------------------------
    // The stack lives in page $01 and the pointer wraps modulo 256, so it
    // can never leave that page.

    pub(crate) fn push_u8(&mut self, value: u8) {
        let stack_addr = Self::STACK_BASE_ADDRESS | self.stack_pointer as u16;
        self.write_cycle(stack_addr, value);
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    /// Pushes a 16-bit word, high byte first, so it is stored little-endian.
    pub(crate) fn push_u16(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push_u8(high);
        self.push_u8(low);
    }

    pub(crate) fn pop_u8(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        let stack_addr = Self::STACK_BASE_ADDRESS | self.stack_pointer as u16;
        self.read_cycle(stack_addr)
    }

    pub(crate) fn pop_u16(&mut self) -> u16 {
        let low = self.pop_u8();
        let high = self.pop_u8();
        u16::from_le_bytes([low, high])
    }

    // ---- addressing engine ------------------------------------------------

    /// Resolves the operand for `mode`, consuming exactly the cycles the
    /// mode owns (the opcode fetch is charged by the caller). Indexed modes
    /// take the "oops" re-read cycle according to `access`: only on a page
    /// cross for reads, always for stores and read-modify-write.
    pub(crate) fn fetch_operand(&mut self, mode: AddressingMode, access: MemoryAccess) -> Operand {
        match mode {
            AddressingMode::Implicit => {
                // Dummy read of the byte after the opcode, PC untouched
                self.read_cycle(self.program_counter);
                Operand::None
            }
            AddressingMode::Accumulator => {
                self.read_cycle(self.program_counter);
                Operand::Accumulator
            }
            AddressingMode::Immediate | AddressingMode::Relative => {
                Operand::Immediate(self.read_pc_cycle())
            }
            AddressingMode::ZeroPage => {
                let addr = self.read_pc_cycle() as u16;
                Operand::Address(addr)
            }
            AddressingMode::ZeroPageX => {
                let base = self.read_pc_cycle();
                // The index add happens inside the CPU and costs a cycle;
                // the result never leaves page zero
                let addr = self.exec_in_cycle(|cpu| base.wrapping_add(cpu.x_register));
                Operand::Address(addr as u16)
            }
            AddressingMode::ZeroPageY => {
                let base = self.read_pc_cycle();
                let addr = self.exec_in_cycle(|cpu| base.wrapping_add(cpu.y_register));
                Operand::Address(addr as u16)
            }
            AddressingMode::Absolute => {
                let low = self.read_pc_cycle();
                let high = self.read_pc_cycle();
                Operand::Address(u16::from_le_bytes([low, high]))
            }
            AddressingMode::AbsoluteX => {
                let low = self.read_pc_cycle();
                let high = self.read_pc_cycle();
                let base = u16::from_le_bytes([low, high]);
                Operand::Address(self.index_address(base, self.x_register, access))
            }
            AddressingMode::AbsoluteY => {
                let low = self.read_pc_cycle();
                let high = self.read_pc_cycle();
                let base = u16::from_le_bytes([low, high]);
                Operand::Address(self.index_address(base, self.y_register, access))
            }
            AddressingMode::IndirectX => {
                let base = self.read_pc_cycle();
                let pointer = self.exec_in_cycle(|cpu| base.wrapping_add(cpu.x_register));
                let low = self.read_cycle(pointer as u16);
                // The pointer-high read wraps within the zero page
                let high = self.read_cycle(pointer.wrapping_add(1) as u16);
                Operand::Address(u16::from_le_bytes([low, high]))
            }
            AddressingMode::IndirectY => {
                let pointer = self.read_pc_cycle();
                let low = self.read_cycle(pointer as u16);
                let high = self.read_cycle(pointer.wrapping_add(1) as u16);
                let base = u16::from_le_bytes([low, high]);
                Operand::Address(self.index_address(base, self.y_register, access))
            }
            AddressingMode::Indirect => {
                let low = self.read_pc_cycle();
                let high = self.read_pc_cycle();
                let pointer = u16::from_le_bytes([low, high]);
                let addr_low = self.read_cycle(pointer);
                // Hardware bug: the high byte is always fetched from the
                // same page as the low byte
                let high_ptr = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
                let addr_high = self.read_cycle(high_ptr);
                Operand::Address(u16::from_le_bytes([addr_low, addr_high]))
            }
        }
    }

    /// Adds an index register to a 16-bit base. When the low-byte add
    /// carries, the CPU first reads from the un-fixed address and repeats
    /// the access after correcting the high byte; stores and RMW
    /// instructions pay that extra read unconditionally.
    fn index_address(&mut self, base: u16, index: u8, access: MemoryAccess) -> u16 {
        let addr = base.wrapping_add(index as u16);
        let page_crossed = (base & 0xFF00) != (addr & 0xFF00);
        if page_crossed || access != MemoryAccess::Read {
            let unfixed = (base & 0xFF00) | (addr & 0x00FF);
            self.read_cycle(unfixed);
        }
        addr
    }

    // ---- operand access ---------------------------------------------------

    pub(crate) fn read_operand(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => self.read_cycle(addr),
            Operand::Immediate(value) => value,
            Operand::Accumulator => self.accumulator,
            Operand::None => unreachable!("BUG: instruction expects a readable operand"),
        }
    }

    pub(crate) fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => self.write_cycle(addr, value),
            Operand::Accumulator => self.accumulator = value,
            _ => unreachable!("BUG: instruction expects a writable operand"),
        }
    }

    /// Read-modify-write access: the 6502 reads the byte, writes the
    /// unmodified value back while the ALU works, then writes the result.
    /// On the accumulator the rewrite is free.
    pub(crate) fn modify_operand(
        &mut self,
        operand: Operand,
        f: impl FnOnce(&mut CPU, u8) -> u8,
    ) -> u8 {
        match operand {
            Operand::Address(addr) => {
                let old = self.read_cycle(addr);
                self.write_cycle(addr, old);
                let new = f(self, old);
                self.write_cycle(addr, new);
                new
            }
            Operand::Accumulator => {
                let old = self.accumulator;
                let new = f(self, old);
                self.accumulator = new;
                new
            }
            _ => unreachable!("BUG: instruction expects a modifiable operand"),
        }
    }

    /// Branch helper shared by the eight conditional branches. A taken
    /// branch costs one extra cycle, one more if it lands on another page.
    pub(crate) fn branch(&mut self, condition: bool, operand: Operand) {
        let offset = match operand {
            Operand::Immediate(value) => value as i8,
            _ => unreachable!("BUG: branch operand should be the displacement byte"),
        };
        if condition {
            let target = self.program_counter.wrapping_add(offset as u16);
            self.stall_cycle();
            if (target & 0xFF00) != (self.program_counter & 0xFF00) {
                self.stall_cycle();
            }
            self.program_counter = target;
        }
    }

    // ---- control ------------------------------------------------------------

    pub(crate) fn reset(&mut self) {
        self.accumulator = 0;
        self.x_register = 0;
        self.y_register = 0;
        self.stack_pointer = Self::STACK_RESET;
        self.status = Status::INTERRUPT_DISABLE | Status::UNUSED;

        // 0xFFFC holds the reset vector
        self.program_counter = self.read_u16(Self::RESET_VECTOR_ADDRESS);
    }

    /// Fetches, decodes and executes a single instruction.
    pub(crate) fn step(&mut self) -> StepResult {
        // Fetching and decoding the opcode always takes 1 cycle
        let opcode = self.read_pc_cycle();

        let Some(op) = decode(opcode) else {
            return StepResult::DecodeMiss(opcode);
        };

        let operand = self.fetch_operand(op.addressing_mode, op.access);
        (op.handler)(self, operand);

        if opcode == 0x00 {
            StepResult::Halt
        } else {
            StepResult::Executed
        }
    }

    /// Runs until BRK retires. `callback` sees the CPU before every
    /// instruction, which is where the tracer hooks in.
    pub(crate) fn run_with_callback<F>(&mut self, mut callback: F)
    where
        F: FnMut(&mut CPU),
    {
        loop {
            callback(self);
            match self.step() {
                StepResult::Executed => {}
                StepResult::Halt => break,
                StepResult::DecodeMiss(opcode) => {
                    let at = self.program_counter.wrapping_sub(1);
                    let _ = writeln!(
                        self.diagnostics,
                        "Can't find instruction 0x{:02X} at {:04X}, skipping",
                        opcode, at
                    );
                }
            }
        }
    }

    #[allow(dead_code)]
    pub(crate) fn set_diagnostics(&mut self, sink: Box<dyn io::Write>) {
        self.diagnostics = sink;
    }
}

impl fmt::Display for CPU {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.program_counter,
            self.accumulator,
            self.x_register,
            self.y_register,
            self.status.bits(),
            self.stack_pointer,
            self.cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::Rom;

    fn cpu_with_program(program: &[u8]) -> CPU {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom_with_program(program)));
        cpu.reset();
        cpu
    }

    #[test]
    fn test_cpu_init() {
        let cpu = new_cpu(Bus::new(Rom::test_rom()));
        assert_eq!(cpu.stack_pointer, 0xFD);
        assert_eq!(cpu.accumulator, 0x00);
        assert_eq!(cpu.x_register, 0x00);
        assert_eq!(cpu.y_register, 0x00);
        assert_eq!(cpu.status, Status::INTERRUPT_DISABLE | Status::UNUSED);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn test_reset_loads_reset_vector() {
        let mut cpu = new_cpu(Bus::new(Rom::test_rom()));
        cpu.reset();
        assert_eq!(cpu.program_counter, 0xC000);
        assert_eq!(cpu.stack_pointer, 0xFD);
        assert_eq!(cpu.status.bits(), 0x24);
    }

    #[test]
    fn test_stack_push_pop_u8() {
        let mut cpu = cpu_with_program(&[]);
        cpu.push_u8(0xAB);
        assert_eq!(cpu.stack_pointer, 0xFC);
        assert_eq!(cpu.read_u8(0x01FD), 0xAB);
        assert_eq!(cpu.pop_u8(), 0xAB);
        assert_eq!(cpu.stack_pointer, 0xFD);
    }

    #[test]
    fn test_stack_push_pop_u16() {
        let mut cpu = cpu_with_program(&[]);
        cpu.push_u16(0x1234);
        assert_eq!(cpu.stack_pointer, 0xFB);
        assert_eq!(cpu.pop_u16(), 0x1234);
        assert_eq!(cpu.stack_pointer, 0xFD);
    }

    #[test]
    fn test_stack_pointer_wraps_within_page_one() {
        let mut cpu = cpu_with_program(&[]);
        cpu.stack_pointer = 0x00;
        cpu.push_u8(0x42);
        assert_eq!(cpu.stack_pointer, 0xFF);
        assert_eq!(cpu.read_u8(0x0100), 0x42);
        assert_eq!(cpu.pop_u8(), 0x42);
        assert_eq!(cpu.stack_pointer, 0x00);
    }

    #[test]
    fn test_status_for_push_sets_break_and_unused() {
        let mut cpu = cpu_with_program(&[]);
        cpu.status = Status::CARRY | Status::UNUSED;
        assert_eq!(cpu.status_for_push(), 0x31);
    }

    #[test]
    fn test_restore_status_ignores_break_and_forces_unused() {
        let mut cpu = cpu_with_program(&[]);
        cpu.restore_status(0xFF);
        assert_eq!(cpu.status.bits(), 0xEF);
        cpu.restore_status(0x00);
        assert_eq!(cpu.status.bits(), 0x20);
    }

    #[test]
    fn test_exec_in_cycle_counts_every_invocation() {
        let mut cpu = cpu_with_program(&[]);
        cpu.exec_in_cycle(|_| ());
        cpu.read_cycle(0x0000);
        cpu.write_cycle(0x0000, 1);
        cpu.stall_cycle();
        assert_eq!(cpu.cycles, 4);
    }

    #[test]
    fn test_fetch_operand_cycle_costs() {
        // (mode, access, operand bytes, expected cycles)
        let cases: [(AddressingMode, MemoryAccess, [u8; 2], u64); 11] = [
            (AddressingMode::Implicit, MemoryAccess::Read, [0, 0], 1),
            (AddressingMode::Accumulator, MemoryAccess::Read, [0, 0], 1),
            (AddressingMode::Immediate, MemoryAccess::Read, [0x42, 0], 1),
            (AddressingMode::ZeroPage, MemoryAccess::Read, [0x42, 0], 1),
            (AddressingMode::ZeroPageX, MemoryAccess::Read, [0x42, 0], 2),
            (AddressingMode::ZeroPageY, MemoryAccess::Read, [0x42, 0], 2),
            (AddressingMode::Absolute, MemoryAccess::Read, [0x34, 0x12], 2),
            (AddressingMode::AbsoluteX, MemoryAccess::Read, [0x34, 0x12], 2),
            (AddressingMode::IndirectX, MemoryAccess::Read, [0x42, 0], 4),
            (AddressingMode::IndirectY, MemoryAccess::Read, [0x42, 0], 3),
            (AddressingMode::Indirect, MemoryAccess::Read, [0x34, 0x02], 4),
        ];
        for (mode, access, bytes, expected) in cases {
            let mut cpu = cpu_with_program(&bytes);
            let before = cpu.cycles;
            cpu.fetch_operand(mode, access);
            assert_eq!(cpu.cycles - before, expected, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_zero_page_indexing_wraps() {
        let mut cpu = cpu_with_program(&[0xFF]);
        cpu.x_register = 0x05;
        let operand = cpu.fetch_operand(AddressingMode::ZeroPageX, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x0004));

        let mut cpu = cpu_with_program(&[0x80]);
        cpu.y_register = 0xFF;
        let operand = cpu.fetch_operand(AddressingMode::ZeroPageY, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x007F));
    }

    #[test]
    fn test_absolute_x_page_cross_costs_extra_cycle() {
        let mut cpu = cpu_with_program(&[0xF0, 0x00]);
        cpu.x_register = 0x20;
        let before = cpu.cycles;
        let operand = cpu.fetch_operand(AddressingMode::AbsoluteX, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x0110));
        assert_eq!(cpu.cycles - before, 3);
    }

    #[test]
    fn test_absolute_x_store_always_pays_the_oops_cycle() {
        let mut cpu = cpu_with_program(&[0x10, 0x00]);
        cpu.x_register = 0x01;
        let before = cpu.cycles;
        cpu.fetch_operand(AddressingMode::AbsoluteX, MemoryAccess::Write);
        assert_eq!(cpu.cycles - before, 3);
    }

    #[test]
    fn test_indirect_y_page_cross_costs_extra_cycle() {
        let mut cpu = cpu_with_program(&[0x42]);
        cpu.write_u8(0x0042, 0xF0);
        cpu.write_u8(0x0043, 0x00);
        cpu.y_register = 0x20;
        let before = cpu.cycles;
        let operand = cpu.fetch_operand(AddressingMode::IndirectY, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x0110));
        assert_eq!(cpu.cycles - before, 4);
    }

    #[test]
    fn test_indirect_x_pointer_wraps_in_zero_page() {
        let mut cpu = cpu_with_program(&[0xFF]);
        cpu.write_u8(0x00FF, 0x34);
        cpu.write_u8(0x0000, 0x12);
        let operand = cpu.fetch_operand(AddressingMode::IndirectX, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x1234));
    }

    #[test]
    fn test_indirect_jmp_page_wrap_bug() {
        // Pointer at $02FF: high byte comes from $0200, not $0300
        let mut cpu = cpu_with_program(&[0xFF, 0x02]);
        cpu.write_u8(0x02FF, 0x34);
        cpu.write_u8(0x0200, 0x56);
        cpu.write_u8(0x0300, 0x99);
        let operand = cpu.fetch_operand(AddressingMode::Indirect, MemoryAccess::Read);
        assert_eq!(operand, Operand::Address(0x5634));
    }

    #[test]
    fn test_modify_operand_performs_dummy_write_back() {
        let mut cpu = cpu_with_program(&[]);
        cpu.write_u8(0x0042, 0x01);
        let before = cpu.cycles;
        let new = cpu.modify_operand(Operand::Address(0x0042), |_, v| v << 1);
        assert_eq!(new, 0x02);
        assert_eq!(cpu.read_u8(0x0042), 0x02);
        assert_eq!(cpu.cycles - before, 3);
    }

    #[test]
    fn test_decode_table_is_consistent() {
        for (opcode, entry) in OPCODE_MAP.entries() {
            assert_eq!(*opcode, entry.opcode);
            let expected_bytes = match entry.addressing_mode {
                AddressingMode::Implicit | AddressingMode::Accumulator => 1,
                AddressingMode::Absolute
                | AddressingMode::AbsoluteX
                | AddressingMode::AbsoluteY
                | AddressingMode::Indirect => 3,
                _ => 2,
            };
            assert_eq!(entry.bytes, expected_bytes, "opcode {:02X}", opcode);
            assert_eq!(decode(*opcode).unwrap().opcode, entry.opcode);
        }
        assert!(decode(0x02).is_none());
    }

    #[test]
    fn test_documented_cycle_counts() {
        // Every non-branch opcode, executed with zeroed registers so no
        // page is crossed, must cost exactly its published cycle count.
        for (opcode, entry) in OPCODE_MAP.entries() {
            if entry.addressing_mode == AddressingMode::Relative {
                continue;
            }
            let mut cpu = cpu_with_program(&[*opcode, 0x10, 0x00]);
            let before = cpu.cycles;
            cpu.step();
            assert_eq!(
                cpu.cycles - before,
                entry.cycles as u64,
                "opcode {:02X} ({})",
                opcode,
                entry.name
            );
        }
    }

    #[test]
    fn test_decode_miss_is_recoverable() {
        // 0x02 has no table entry: one cycle, one byte skipped
        let mut cpu = cpu_with_program(&[0x02]);
        let result = cpu.step();
        assert_eq!(result, StepResult::DecodeMiss(0x02));
        assert_eq!(cpu.program_counter, 0xC001);
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn test_run_with_callback_reports_decode_misses_and_continues() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct SharedSink(Rc<RefCell<Vec<u8>>>);
        impl io::Write for SharedSink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = Rc::new(RefCell::new(Vec::new()));
        let mut cpu = cpu_with_program(&[0x02, 0xA9, 0x05, 0x00]);
        cpu.set_diagnostics(Box::new(SharedSink(sink.clone())));
        cpu.run_with_callback(|_| {});

        assert_eq!(cpu.accumulator, 0x05);
        let diagnostics = String::from_utf8(sink.borrow().clone()).unwrap();
        assert!(diagnostics.contains("0x02"));
    }

    #[test]
    fn test_run_with_callback_sees_state_before_each_instruction() {
        let mut cpu = cpu_with_program(&[0xA9, 0x05, 0x00]);
        let mut accumulators = Vec::new();
        let mut count = 0;
        cpu.run_with_callback(|cpu| {
            accumulators.push(cpu.accumulator);
            count += 1;
        });
        // LDA and BRK both get a callback, each seeing pre-instruction state
        assert_eq!(count, 2);
        assert_eq!(accumulators, vec![0x00, 0x05]);
    }

    // ---- end-to-end scenarios, run from reset through BRK ----------------

    fn run_program(program: &[u8]) -> CPU {
        let mut cpu = cpu_with_program(program);
        cpu.run_with_callback(|_| {});
        cpu
    }

    #[test]
    fn test_scenario_adc_simple() {
        let cpu = run_program(&[0xA9, 0x05, 0x69, 0x03, 0x00]);
        assert_eq!(cpu.accumulator, 0x08);
        assert!(!cpu.status.contains(Status::ZERO));
        assert!(!cpu.status.contains(Status::NEGATIVE));
        assert!(!cpu.status.contains(Status::CARRY));
        assert!(!cpu.status.contains(Status::OVERFLOW));
        // LDA 2 + ADC 2 + BRK 7
        assert_eq!(cpu.cycles, 11);
    }

    #[test]
    fn test_scenario_adc_overflow_and_carry() {
        let cpu = run_program(&[0xA9, 0x80, 0x69, 0x80, 0x00]);
        assert_eq!(cpu.accumulator, 0x00);
        assert!(cpu.status.contains(Status::CARRY));
        assert!(cpu.status.contains(Status::OVERFLOW));
        assert!(cpu.status.contains(Status::ZERO));
        assert!(!cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_scenario_dex_to_zero() {
        let cpu = run_program(&[0xA2, 0x03, 0xCA, 0xCA, 0xCA, 0x00]);
        assert_eq!(cpu.x_register, 0x00);
        assert!(cpu.status.contains(Status::ZERO));
        assert!(!cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_scenario_asl_shifts_bit_out() {
        let cpu = run_program(&[0xA9, 0x01, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x00]);
        assert_eq!(cpu.accumulator, 0x00);
        assert!(cpu.status.contains(Status::CARRY));
        assert!(cpu.status.contains(Status::ZERO));
    }

    #[test]
    fn test_scenario_store_then_reload() {
        let cpu = run_program(&[0xA9, 0xFF, 0x85, 0x10, 0xA5, 0x10, 0x00]);
        assert_eq!(cpu.accumulator, 0xFF);
        assert_eq!(cpu.read_u8(0x0010), 0xFF);
        assert!(!cpu.status.contains(Status::ZERO));
        assert!(cpu.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_scenario_jsr_rts_round_trip() {
        // C000: JSR $C006 / C003: BRK / C006: RTS
        let mut cpu = cpu_with_program(&[0x20, 0x06, 0xC0, 0x00, 0xEA, 0xEA, 0x60]);
        let sp_before = cpu.stack_pointer;

        assert_eq!(cpu.step(), StepResult::Executed); // JSR
        assert_eq!(cpu.program_counter, 0xC006);
        assert_eq!(cpu.stack_pointer, sp_before.wrapping_sub(2));
        assert_eq!(cpu.cycles, 6);

        assert_eq!(cpu.step(), StepResult::Executed); // RTS
        assert_eq!(cpu.program_counter, 0xC003);
        assert_eq!(cpu.stack_pointer, sp_before);
        assert_eq!(cpu.cycles, 12);

        assert_eq!(cpu.step(), StepResult::Halt); // BRK
    }

    // ---- round-trip properties --------------------------------------------

    #[test]
    fn test_clc_sec_leaves_carry_set() {
        let cpu = run_program(&[0x18, 0x38, 0x18, 0x38, 0x00]);
        assert!(cpu.status.contains(Status::CARRY));
    }

    #[test]
    fn test_pha_pla_round_trip() {
        let cpu = run_program(&[0xA9, 0x77, 0x48, 0xA9, 0x00, 0x68, 0x00]);
        assert_eq!(cpu.accumulator, 0x77);
        assert!(!cpu.status.contains(Status::ZERO));
    }

    #[test]
    fn test_ror_rol_round_trip() {
        for value in [0x00u8, 0x01, 0x55, 0x80, 0xFF] {
            // CLC; LDA #v; ROR A; ROL A
            let cpu = run_program(&[0x18, 0xA9, value, 0x6A, 0x2A, 0x00]);
            assert_eq!(cpu.accumulator, value, "value {:02X}", value);
            assert!(!cpu.status.contains(Status::CARRY));
        }
    }

    #[test]
    fn test_brk_pushes_state_and_loads_irq_vector() {
        let mut cpu = cpu_with_program(&[0x00]);
        cpu.status.insert(Status::CARRY);
        assert_eq!(cpu.step(), StepResult::Halt);
        assert_eq!(cpu.cycles, 7);
        assert!(cpu.status.contains(Status::INTERRUPT_DISABLE));
        // Return address is the byte after the BRK padding byte
        assert_eq!(cpu.read_u8(0x01FD), 0xC0);
        assert_eq!(cpu.read_u8(0x01FC), 0x02);
        // Pushed status has B and U set
        assert_eq!(cpu.read_u8(0x01FB) & 0x31, 0x31);
        // PC came from the IRQ vector (NOP filler in the test image)
        assert_eq!(cpu.program_counter, 0xEAEA);
    }
}

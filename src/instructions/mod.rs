mod adc;
mod and;
mod asl;
mod bcc;
mod bcs;
mod beq;
mod bit;
mod bmi;
mod bne;
mod bpl;
mod brk;
mod bvc;
mod bvs;
mod clc;
mod cld;
mod cli;
mod clv;
mod cmp;
mod cpx;
mod cpy;
mod dcp;
mod dec;
mod dex;
mod dey;
mod eor;
mod ign;
mod inc;
mod inx;
mod iny;
mod isb;
mod jmp;
mod jsr;
mod lax;
mod lda;
mod ldx;
mod ldy;
mod lsr;
mod nop;
mod ora;
mod pha;
mod php;
mod pla;
mod plp;
mod rla;
mod rol;
mod ror;
mod rra;
mod rti;
mod rts;
mod sax;
mod sbc;
mod sec;
mod sed;
mod sei;
mod slo;
mod sre;
mod sta;
mod stx;
mod sty;
mod tax;
mod tay;
mod tsx;
mod txa;
mod txs;
mod tya;

//! The CB-prefixed bit-operation page.
//!
//! The 256 sub-opcodes decode by bit pattern (operand in the low three
//! bits, operation in the rest), so the page is dispatched algorithmically
//! instead of through a second table. Timing falls out naturally: register
//! forms cost the two fetches, (HL) forms add their read (and write).

use super::Cpu;
use crate::bus::Bus;

const OPERAND_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const ROT_NAMES: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

impl Cpu {
    pub(super) fn op_prefix_cb(&mut self, bus: &mut Bus) {
        let sub = self.fetch8(bus);
        let operand = sub & 0x07;
        let bit = (sub >> 3) & 0x07;
        match sub >> 6 {
            0 => {
                let value = self.read_cb_operand(bus, operand);
                let result = match bit {
                    0 => self.rlc(value),
                    1 => self.rrc(value),
                    2 => self.rl(value),
                    3 => self.rr(value),
                    4 => self.sla(value),
                    5 => self.sra(value),
                    6 => self.swap(value),
                    _ => self.srl(value),
                };
                self.write_cb_operand(bus, operand, result);
            }
            1 => {
                let value = self.read_cb_operand(bus, operand);
                self.test_bit(bit, value);
            }
            2 => {
                let value = self.read_cb_operand(bus, operand);
                self.write_cb_operand(bus, operand, value & !(1 << bit));
            }
            _ => {
                let value = self.read_cb_operand(bus, operand);
                self.write_cb_operand(bus, operand, value | (1 << bit));
            }
        }
    }

    /// Operand index 0-7 maps B,C,D,E,H,L,(HL),A; the memory form ticks.
    fn read_cb_operand(&mut self, bus: &mut Bus, operand: u8) -> u8 {
        match operand {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            6 => self.read8(bus, self.hl()),
            _ => self.a,
        }
    }

    fn write_cb_operand(&mut self, bus: &mut Bus, operand: u8, value: u8) {
        match operand {
            0 => self.b = value,
            1 => self.c = value,
            2 => self.d = value,
            3 => self.e = value,
            4 => self.h = value,
            5 => self.l = value,
            6 => self.write8(bus, self.hl(), value),
            _ => self.a = value,
        }
    }
}

/// Mnemonic for a CB sub-opcode, for the disassembler.
pub(super) fn cb_mnemonic(sub: u8) -> String {
    let operand = OPERAND_NAMES[(sub & 0x07) as usize];
    let bit = (sub >> 3) & 0x07;
    match sub >> 6 {
        0 => format!("{} {}", ROT_NAMES[bit as usize], operand),
        1 => format!("BIT {}, {}", bit, operand),
        2 => format!("RES {}, {}", bit, operand),
        _ => format!("SET {}, {}", bit, operand),
    }
}

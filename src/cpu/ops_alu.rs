//! Arithmetic and logic: the 8-bit ALU grid, INC/DEC, the 16-bit adds, and
//! the accumulator specials (DAA, CPL, SCF, CCF).

use super::{Cpu, FLAG_C, FLAG_H, FLAG_N};
use crate::bus::Bus;

impl Cpu {
    // --- ADD / ADC ---
    alu_a_r!(op_add_a_b, add_a, b);
    alu_a_r!(op_add_a_c, add_a, c);
    alu_a_r!(op_add_a_d, add_a, d);
    alu_a_r!(op_add_a_e, add_a, e);
    alu_a_r!(op_add_a_h, add_a, h);
    alu_a_r!(op_add_a_l, add_a, l);
    alu_a_r!(op_add_a_a, add_a, a);
    alu_a_hlp!(op_add_a_hlp, add_a);
    alu_a_d8!(op_add_a_d8, add_a);
    alu_a_r!(op_adc_a_b, add_a, b, carry);
    alu_a_r!(op_adc_a_c, add_a, c, carry);
    alu_a_r!(op_adc_a_d, add_a, d, carry);
    alu_a_r!(op_adc_a_e, add_a, e, carry);
    alu_a_r!(op_adc_a_h, add_a, h, carry);
    alu_a_r!(op_adc_a_l, add_a, l, carry);
    alu_a_r!(op_adc_a_a, add_a, a, carry);
    alu_a_hlp!(op_adc_a_hlp, add_a, carry);
    alu_a_d8!(op_adc_a_d8, add_a, carry);

    // --- SUB / SBC ---
    alu_a_r!(op_sub_a_b, sub_a, b);
    alu_a_r!(op_sub_a_c, sub_a, c);
    alu_a_r!(op_sub_a_d, sub_a, d);
    alu_a_r!(op_sub_a_e, sub_a, e);
    alu_a_r!(op_sub_a_h, sub_a, h);
    alu_a_r!(op_sub_a_l, sub_a, l);
    alu_a_r!(op_sub_a_a, sub_a, a);
    alu_a_hlp!(op_sub_a_hlp, sub_a);
    alu_a_d8!(op_sub_a_d8, sub_a);
    alu_a_r!(op_sbc_a_b, sub_a, b, carry);
    alu_a_r!(op_sbc_a_c, sub_a, c, carry);
    alu_a_r!(op_sbc_a_d, sub_a, d, carry);
    alu_a_r!(op_sbc_a_e, sub_a, e, carry);
    alu_a_r!(op_sbc_a_h, sub_a, h, carry);
    alu_a_r!(op_sbc_a_l, sub_a, l, carry);
    alu_a_r!(op_sbc_a_a, sub_a, a, carry);
    alu_a_hlp!(op_sbc_a_hlp, sub_a, carry);
    alu_a_d8!(op_sbc_a_d8, sub_a, carry);

    // --- AND / XOR / OR / CP ---
    alu_a_r!(op_and_a_b, and_a, b);
    alu_a_r!(op_and_a_c, and_a, c);
    alu_a_r!(op_and_a_d, and_a, d);
    alu_a_r!(op_and_a_e, and_a, e);
    alu_a_r!(op_and_a_h, and_a, h);
    alu_a_r!(op_and_a_l, and_a, l);
    alu_a_r!(op_and_a_a, and_a, a);
    alu_a_hlp!(op_and_a_hlp, and_a);
    alu_a_d8!(op_and_a_d8, and_a);
    alu_a_r!(op_xor_a_b, xor_a, b);
    alu_a_r!(op_xor_a_c, xor_a, c);
    alu_a_r!(op_xor_a_d, xor_a, d);
    alu_a_r!(op_xor_a_e, xor_a, e);
    alu_a_r!(op_xor_a_h, xor_a, h);
    alu_a_r!(op_xor_a_l, xor_a, l);
    alu_a_r!(op_xor_a_a, xor_a, a);
    alu_a_hlp!(op_xor_a_hlp, xor_a);
    alu_a_d8!(op_xor_a_d8, xor_a);
    alu_a_r!(op_or_a_b, or_a, b);
    alu_a_r!(op_or_a_c, or_a, c);
    alu_a_r!(op_or_a_d, or_a, d);
    alu_a_r!(op_or_a_e, or_a, e);
    alu_a_r!(op_or_a_h, or_a, h);
    alu_a_r!(op_or_a_l, or_a, l);
    alu_a_r!(op_or_a_a, or_a, a);
    alu_a_hlp!(op_or_a_hlp, or_a);
    alu_a_d8!(op_or_a_d8, or_a);
    alu_a_r!(op_cp_a_b, cp_a, b);
    alu_a_r!(op_cp_a_c, cp_a, c);
    alu_a_r!(op_cp_a_d, cp_a, d);
    alu_a_r!(op_cp_a_e, cp_a, e);
    alu_a_r!(op_cp_a_h, cp_a, h);
    alu_a_r!(op_cp_a_l, cp_a, l);
    alu_a_r!(op_cp_a_a, cp_a, a);
    alu_a_hlp!(op_cp_a_hlp, cp_a);
    alu_a_d8!(op_cp_a_d8, cp_a);

    // --- INC / DEC r ---
    inc_r!(op_inc_b, b);
    inc_r!(op_inc_c, c);
    inc_r!(op_inc_d, d);
    inc_r!(op_inc_e, e);
    inc_r!(op_inc_h, h);
    inc_r!(op_inc_l, l);
    inc_r!(op_inc_a, a);
    dec_r!(op_dec_b, b);
    dec_r!(op_dec_c, c);
    dec_r!(op_dec_d, d);
    dec_r!(op_dec_e, e);
    dec_r!(op_dec_h, h);
    dec_r!(op_dec_l, l);
    dec_r!(op_dec_a, a);

    pub(super) fn op_inc_hlp(&mut self, bus: &mut Bus) {
        let addr = self.hl();
        let value = self.read8(bus, addr);
        let result = self.inc_u8(value);
        self.write8(bus, addr, result);
    }

    pub(super) fn op_dec_hlp(&mut self, bus: &mut Bus) {
        let addr = self.hl();
        let value = self.read8(bus, addr);
        let result = self.dec_u8(value);
        self.write8(bus, addr, result);
    }

    // --- 16-bit arithmetic ---
    inc_rp!(op_inc_bc, bc, set_bc);
    inc_rp!(op_inc_de, de, set_de);
    inc_rp!(op_inc_hl, hl, set_hl);
    dec_rp!(op_dec_bc, bc, set_bc);
    dec_rp!(op_dec_de, de, set_de);
    dec_rp!(op_dec_hl, hl, set_hl);
    add_hl_rp!(op_add_hl_bc, bc);
    add_hl_rp!(op_add_hl_de, de);
    add_hl_rp!(op_add_hl_hl, hl);

    pub(super) fn op_inc_sp(&mut self, bus: &mut Bus) {
        bus.tick();
        self.sp = self.sp.wrapping_add(1);
    }
    pub(super) fn op_dec_sp(&mut self, bus: &mut Bus) {
        bus.tick();
        self.sp = self.sp.wrapping_sub(1);
    }
    pub(super) fn op_add_hl_sp(&mut self, bus: &mut Bus) {
        let value = self.sp;
        self.add_hl(bus, value);
    }

    pub(super) fn op_add_sp_r8(&mut self, bus: &mut Bus) {
        let offset = self.fetch8(bus) as i8;
        bus.tick();
        bus.tick();
        self.sp = self.sp_plus_offset(offset);
    }

    // --- Accumulator specials ---
    pub(super) fn op_daa(&mut self, _bus: &mut Bus) {
        self.daa();
    }
    pub(super) fn op_cpl(&mut self, _bus: &mut Bus) {
        self.a = !self.a;
        self.set_flag(FLAG_N, true);
        self.set_flag(FLAG_H, true);
    }
    pub(super) fn op_scf(&mut self, _bus: &mut Bus) {
        self.set_flag(FLAG_N, false);
        self.set_flag(FLAG_H, false);
        self.set_flag(FLAG_C, true);
    }
    pub(super) fn op_ccf(&mut self, _bus: &mut Bus) {
        let carry = self.flag(FLAG_C);
        self.set_flag(FLAG_N, false);
        self.set_flag(FLAG_H, false);
        self.set_flag(FLAG_C, !carry);
    }
}

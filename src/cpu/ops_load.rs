//! 8-bit and 16-bit loads, accumulator/memory transfers, and stack ops.

use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    // --- LD r, r' ---
    ld_r_r!(op_ld_b_b, b, b);
    ld_r_r!(op_ld_b_c, b, c);
    ld_r_r!(op_ld_b_d, b, d);
    ld_r_r!(op_ld_b_e, b, e);
    ld_r_r!(op_ld_b_h, b, h);
    ld_r_r!(op_ld_b_l, b, l);
    ld_r_r!(op_ld_b_a, b, a);
    ld_r_r!(op_ld_c_b, c, b);
    ld_r_r!(op_ld_c_c, c, c);
    ld_r_r!(op_ld_c_d, c, d);
    ld_r_r!(op_ld_c_e, c, e);
    ld_r_r!(op_ld_c_h, c, h);
    ld_r_r!(op_ld_c_l, c, l);
    ld_r_r!(op_ld_c_a, c, a);
    ld_r_r!(op_ld_d_b, d, b);
    ld_r_r!(op_ld_d_c, d, c);
    ld_r_r!(op_ld_d_d, d, d);
    ld_r_r!(op_ld_d_e, d, e);
    ld_r_r!(op_ld_d_h, d, h);
    ld_r_r!(op_ld_d_l, d, l);
    ld_r_r!(op_ld_d_a, d, a);
    ld_r_r!(op_ld_e_b, e, b);
    ld_r_r!(op_ld_e_c, e, c);
    ld_r_r!(op_ld_e_d, e, d);
    ld_r_r!(op_ld_e_e, e, e);
    ld_r_r!(op_ld_e_h, e, h);
    ld_r_r!(op_ld_e_l, e, l);
    ld_r_r!(op_ld_e_a, e, a);
    ld_r_r!(op_ld_h_b, h, b);
    ld_r_r!(op_ld_h_c, h, c);
    ld_r_r!(op_ld_h_d, h, d);
    ld_r_r!(op_ld_h_e, h, e);
    ld_r_r!(op_ld_h_h, h, h);
    ld_r_r!(op_ld_h_l, h, l);
    ld_r_r!(op_ld_h_a, h, a);
    ld_r_r!(op_ld_l_b, l, b);
    ld_r_r!(op_ld_l_c, l, c);
    ld_r_r!(op_ld_l_d, l, d);
    ld_r_r!(op_ld_l_e, l, e);
    ld_r_r!(op_ld_l_h, l, h);
    ld_r_r!(op_ld_l_l, l, l);
    ld_r_r!(op_ld_l_a, l, a);
    ld_r_r!(op_ld_a_b, a, b);
    ld_r_r!(op_ld_a_c, a, c);
    ld_r_r!(op_ld_a_d, a, d);
    ld_r_r!(op_ld_a_e, a, e);
    ld_r_r!(op_ld_a_h, a, h);
    ld_r_r!(op_ld_a_l, a, l);
    ld_r_r!(op_ld_a_a, a, a);

    // --- LD r, d8 ---
    ld_r_d8!(op_ld_b_d8, b);
    ld_r_d8!(op_ld_c_d8, c);
    ld_r_d8!(op_ld_d_d8, d);
    ld_r_d8!(op_ld_e_d8, e);
    ld_r_d8!(op_ld_h_d8, h);
    ld_r_d8!(op_ld_l_d8, l);
    ld_r_d8!(op_ld_a_d8, a);

    // --- LD r, (HL) / LD (HL), r ---
    ld_r_hlp!(op_ld_b_hlp, b);
    ld_r_hlp!(op_ld_c_hlp, c);
    ld_r_hlp!(op_ld_d_hlp, d);
    ld_r_hlp!(op_ld_e_hlp, e);
    ld_r_hlp!(op_ld_h_hlp, h);
    ld_r_hlp!(op_ld_l_hlp, l);
    ld_r_hlp!(op_ld_a_hlp, a);
    ld_hlp_r!(op_ld_hlp_b, b);
    ld_hlp_r!(op_ld_hlp_c, c);
    ld_hlp_r!(op_ld_hlp_d, d);
    ld_hlp_r!(op_ld_hlp_e, e);
    ld_hlp_r!(op_ld_hlp_h, h);
    ld_hlp_r!(op_ld_hlp_l, l);
    ld_hlp_r!(op_ld_hlp_a, a);

    pub(super) fn op_ld_hlp_d8(&mut self, bus: &mut Bus) {
        let value = self.fetch8(bus);
        self.write8(bus, self.hl(), value);
    }

    // --- LD rr, d16 ---
    ld_rp_d16!(op_ld_bc_d16, set_bc);
    ld_rp_d16!(op_ld_de_d16, set_de);
    ld_rp_d16!(op_ld_hl_d16, set_hl);
    pub(super) fn op_ld_sp_d16(&mut self, bus: &mut Bus) {
        self.sp = self.fetch16(bus);
    }

    // --- Accumulator <-> (rr) ---
    pub(super) fn op_ld_bcp_a(&mut self, bus: &mut Bus) {
        self.write8(bus, self.bc(), self.a);
    }
    pub(super) fn op_ld_dep_a(&mut self, bus: &mut Bus) {
        self.write8(bus, self.de(), self.a);
    }
    pub(super) fn op_ld_a_bcp(&mut self, bus: &mut Bus) {
        self.a = self.read8(bus, self.bc());
    }
    pub(super) fn op_ld_a_dep(&mut self, bus: &mut Bus) {
        self.a = self.read8(bus, self.de());
    }

    // --- Accumulator <-> (HL) with post-increment/decrement ---
    pub(super) fn op_ld_hlip_a(&mut self, bus: &mut Bus) {
        let hl = self.hl();
        self.write8(bus, hl, self.a);
        self.set_hl(hl.wrapping_add(1));
    }
    pub(super) fn op_ld_a_hlip(&mut self, bus: &mut Bus) {
        let hl = self.hl();
        self.a = self.read8(bus, hl);
        self.set_hl(hl.wrapping_add(1));
    }
    pub(super) fn op_ld_hldp_a(&mut self, bus: &mut Bus) {
        let hl = self.hl();
        self.write8(bus, hl, self.a);
        self.set_hl(hl.wrapping_sub(1));
    }
    pub(super) fn op_ld_a_hldp(&mut self, bus: &mut Bus) {
        let hl = self.hl();
        self.a = self.read8(bus, hl);
        self.set_hl(hl.wrapping_sub(1));
    }

    // --- High-page and absolute transfers ---
    pub(super) fn op_ldh_a8_a(&mut self, bus: &mut Bus) {
        let offset = self.fetch8(bus);
        self.write8(bus, 0xFF00 | offset as u16, self.a);
    }
    pub(super) fn op_ldh_a_a8(&mut self, bus: &mut Bus) {
        let offset = self.fetch8(bus);
        self.a = self.read8(bus, 0xFF00 | offset as u16);
    }
    pub(super) fn op_ld_cp_a(&mut self, bus: &mut Bus) {
        self.write8(bus, 0xFF00 | self.c as u16, self.a);
    }
    pub(super) fn op_ld_a_cp(&mut self, bus: &mut Bus) {
        self.a = self.read8(bus, 0xFF00 | self.c as u16);
    }
    pub(super) fn op_ld_a16p_a(&mut self, bus: &mut Bus) {
        let addr = self.fetch16(bus);
        self.write8(bus, addr, self.a);
    }
    pub(super) fn op_ld_a_a16p(&mut self, bus: &mut Bus) {
        let addr = self.fetch16(bus);
        self.a = self.read8(bus, addr);
    }

    // --- Stack pointer transfers ---
    pub(super) fn op_ld_a16p_sp(&mut self, bus: &mut Bus) {
        let addr = self.fetch16(bus);
        self.write8(bus, addr, (self.sp & 0xFF) as u8);
        self.write8(bus, addr.wrapping_add(1), (self.sp >> 8) as u8);
    }
    pub(super) fn op_ld_sp_hl(&mut self, bus: &mut Bus) {
        bus.tick();
        self.sp = self.hl();
    }
    pub(super) fn op_ld_hl_sp_r8(&mut self, bus: &mut Bus) {
        let offset = self.fetch8(bus) as i8;
        bus.tick();
        let result = self.sp_plus_offset(offset);
        self.set_hl(result);
    }

    // --- PUSH / POP ---
    push_rp!(op_push_bc, bc);
    push_rp!(op_push_de, de);
    push_rp!(op_push_hl, hl);
    push_rp!(op_push_af, af);
    pop_rp!(op_pop_bc, set_bc);
    pop_rp!(op_pop_de, set_de);
    pop_rp!(op_pop_hl, set_hl);
    pop_rp!(op_pop_af, set_af); // set_af zeroes the flag low nibble
}

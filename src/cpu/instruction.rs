//! The 256-entry instruction dispatch table.
//!
//! `length` drives the disassembler and `cycles` documents the base
//! T-cycle cost (minimum for conditional forms); execution timing itself
//! comes from the handlers' bus traffic. The CB prefix dispatches its page
//! algorithmically in `ops_cb`.

use super::Cpu;
use crate::bus::Bus;
use lazy_static::lazy_static;

pub struct Instruction {
    pub mnemonic: &'static str,
    pub length: u8,
    pub cycles: u8, // base T-cycles, documentation and test oracle
    pub execute: fn(&mut Cpu, &mut Bus),
}

impl Instruction {
    pub const fn new(
        mnemonic: &'static str,
        length: u8,
        cycles: u8,
        execute: fn(&mut Cpu, &mut Bus),
    ) -> Self {
        Instruction { mnemonic, length, cycles, execute }
    }
}

macro_rules! instr {
    ($mnemonic:expr, $length:expr, $cycles:expr, $execute:expr) => {
        Instruction::new($mnemonic, $length, $cycles, $execute)
    };
}

macro_rules! invalid {
    () => {
        Instruction::new("INVALID", 1, 4, Cpu::op_illegal)
    };
}

lazy_static! {
    pub static ref INSTRUCTIONS: [Instruction; 256] = [
        // --- 0x00 ---
        instr!("NOP", 1, 4, Cpu::op_nop),
        instr!("LD BC, d16", 3, 12, Cpu::op_ld_bc_d16),
        instr!("LD (BC), A", 1, 8, Cpu::op_ld_bcp_a),
        instr!("INC BC", 1, 8, Cpu::op_inc_bc),
        instr!("INC B", 1, 4, Cpu::op_inc_b),
        instr!("DEC B", 1, 4, Cpu::op_dec_b),
        instr!("LD B, d8", 2, 8, Cpu::op_ld_b_d8),
        instr!("RLCA", 1, 4, Cpu::op_rlca),
        instr!("LD (a16), SP", 3, 20, Cpu::op_ld_a16p_sp),
        instr!("ADD HL, BC", 1, 8, Cpu::op_add_hl_bc),
        instr!("LD A, (BC)", 1, 8, Cpu::op_ld_a_bcp),
        instr!("DEC BC", 1, 8, Cpu::op_dec_bc),
        instr!("INC C", 1, 4, Cpu::op_inc_c),
        instr!("DEC C", 1, 4, Cpu::op_dec_c),
        instr!("LD C, d8", 2, 8, Cpu::op_ld_c_d8),
        instr!("RRCA", 1, 4, Cpu::op_rrca),
        // --- 0x10 ---
        instr!("STOP", 2, 4, Cpu::op_stop),
        instr!("LD DE, d16", 3, 12, Cpu::op_ld_de_d16),
        instr!("LD (DE), A", 1, 8, Cpu::op_ld_dep_a),
        instr!("INC DE", 1, 8, Cpu::op_inc_de),
        instr!("INC D", 1, 4, Cpu::op_inc_d),
        instr!("DEC D", 1, 4, Cpu::op_dec_d),
        instr!("LD D, d8", 2, 8, Cpu::op_ld_d_d8),
        instr!("RLA", 1, 4, Cpu::op_rla),
        instr!("JR r8", 2, 12, Cpu::op_jr_r8),
        instr!("ADD HL, DE", 1, 8, Cpu::op_add_hl_de),
        instr!("LD A, (DE)", 1, 8, Cpu::op_ld_a_dep),
        instr!("DEC DE", 1, 8, Cpu::op_dec_de),
        instr!("INC E", 1, 4, Cpu::op_inc_e),
        instr!("DEC E", 1, 4, Cpu::op_dec_e),
        instr!("LD E, d8", 2, 8, Cpu::op_ld_e_d8),
        instr!("RRA", 1, 4, Cpu::op_rra),
        // --- 0x20 ---
        instr!("JR NZ, r8", 2, 8, Cpu::op_jr_nz_r8),
        instr!("LD HL, d16", 3, 12, Cpu::op_ld_hl_d16),
        instr!("LD (HL+), A", 1, 8, Cpu::op_ld_hlip_a),
        instr!("INC HL", 1, 8, Cpu::op_inc_hl),
        instr!("INC H", 1, 4, Cpu::op_inc_h),
        instr!("DEC H", 1, 4, Cpu::op_dec_h),
        instr!("LD H, d8", 2, 8, Cpu::op_ld_h_d8),
        instr!("DAA", 1, 4, Cpu::op_daa),
        instr!("JR Z, r8", 2, 8, Cpu::op_jr_z_r8),
        instr!("ADD HL, HL", 1, 8, Cpu::op_add_hl_hl),
        instr!("LD A, (HL+)", 1, 8, Cpu::op_ld_a_hlip),
        instr!("DEC HL", 1, 8, Cpu::op_dec_hl),
        instr!("INC L", 1, 4, Cpu::op_inc_l),
        instr!("DEC L", 1, 4, Cpu::op_dec_l),
        instr!("LD L, d8", 2, 8, Cpu::op_ld_l_d8),
        instr!("CPL", 1, 4, Cpu::op_cpl),
        // --- 0x30 ---
        instr!("JR NC, r8", 2, 8, Cpu::op_jr_nc_r8),
        instr!("LD SP, d16", 3, 12, Cpu::op_ld_sp_d16),
        instr!("LD (HL-), A", 1, 8, Cpu::op_ld_hldp_a),
        instr!("INC SP", 1, 8, Cpu::op_inc_sp),
        instr!("INC (HL)", 1, 12, Cpu::op_inc_hlp),
        instr!("DEC (HL)", 1, 12, Cpu::op_dec_hlp),
        instr!("LD (HL), d8", 2, 12, Cpu::op_ld_hlp_d8),
        instr!("SCF", 1, 4, Cpu::op_scf),
        instr!("JR C, r8", 2, 8, Cpu::op_jr_c_r8),
        instr!("ADD HL, SP", 1, 8, Cpu::op_add_hl_sp),
        instr!("LD A, (HL-)", 1, 8, Cpu::op_ld_a_hldp),
        instr!("DEC SP", 1, 8, Cpu::op_dec_sp),
        instr!("INC A", 1, 4, Cpu::op_inc_a),
        instr!("DEC A", 1, 4, Cpu::op_dec_a),
        instr!("LD A, d8", 2, 8, Cpu::op_ld_a_d8),
        instr!("CCF", 1, 4, Cpu::op_ccf),
        // --- 0x40: LD r, r' block ---
        instr!("LD B, B", 1, 4, Cpu::op_ld_b_b),
        instr!("LD B, C", 1, 4, Cpu::op_ld_b_c),
        instr!("LD B, D", 1, 4, Cpu::op_ld_b_d),
        instr!("LD B, E", 1, 4, Cpu::op_ld_b_e),
        instr!("LD B, H", 1, 4, Cpu::op_ld_b_h),
        instr!("LD B, L", 1, 4, Cpu::op_ld_b_l),
        instr!("LD B, (HL)", 1, 8, Cpu::op_ld_b_hlp),
        instr!("LD B, A", 1, 4, Cpu::op_ld_b_a),
        instr!("LD C, B", 1, 4, Cpu::op_ld_c_b),
        instr!("LD C, C", 1, 4, Cpu::op_ld_c_c),
        instr!("LD C, D", 1, 4, Cpu::op_ld_c_d),
        instr!("LD C, E", 1, 4, Cpu::op_ld_c_e),
        instr!("LD C, H", 1, 4, Cpu::op_ld_c_h),
        instr!("LD C, L", 1, 4, Cpu::op_ld_c_l),
        instr!("LD C, (HL)", 1, 8, Cpu::op_ld_c_hlp),
        instr!("LD C, A", 1, 4, Cpu::op_ld_c_a),
        // --- 0x50 ---
        instr!("LD D, B", 1, 4, Cpu::op_ld_d_b),
        instr!("LD D, C", 1, 4, Cpu::op_ld_d_c),
        instr!("LD D, D", 1, 4, Cpu::op_ld_d_d),
        instr!("LD D, E", 1, 4, Cpu::op_ld_d_e),
        instr!("LD D, H", 1, 4, Cpu::op_ld_d_h),
        instr!("LD D, L", 1, 4, Cpu::op_ld_d_l),
        instr!("LD D, (HL)", 1, 8, Cpu::op_ld_d_hlp),
        instr!("LD D, A", 1, 4, Cpu::op_ld_d_a),
        instr!("LD E, B", 1, 4, Cpu::op_ld_e_b),
        instr!("LD E, C", 1, 4, Cpu::op_ld_e_c),
        instr!("LD E, D", 1, 4, Cpu::op_ld_e_d),
        instr!("LD E, E", 1, 4, Cpu::op_ld_e_e),
        instr!("LD E, H", 1, 4, Cpu::op_ld_e_h),
        instr!("LD E, L", 1, 4, Cpu::op_ld_e_l),
        instr!("LD E, (HL)", 1, 8, Cpu::op_ld_e_hlp),
        instr!("LD E, A", 1, 4, Cpu::op_ld_e_a),
        // --- 0x60 ---
        instr!("LD H, B", 1, 4, Cpu::op_ld_h_b),
        instr!("LD H, C", 1, 4, Cpu::op_ld_h_c),
        instr!("LD H, D", 1, 4, Cpu::op_ld_h_d),
        instr!("LD H, E", 1, 4, Cpu::op_ld_h_e),
        instr!("LD H, H", 1, 4, Cpu::op_ld_h_h),
        instr!("LD H, L", 1, 4, Cpu::op_ld_h_l),
        instr!("LD H, (HL)", 1, 8, Cpu::op_ld_h_hlp),
        instr!("LD H, A", 1, 4, Cpu::op_ld_h_a),
        instr!("LD L, B", 1, 4, Cpu::op_ld_l_b),
        instr!("LD L, C", 1, 4, Cpu::op_ld_l_c),
        instr!("LD L, D", 1, 4, Cpu::op_ld_l_d),
        instr!("LD L, E", 1, 4, Cpu::op_ld_l_e),
        instr!("LD L, H", 1, 4, Cpu::op_ld_l_h),
        instr!("LD L, L", 1, 4, Cpu::op_ld_l_l),
        instr!("LD L, (HL)", 1, 8, Cpu::op_ld_l_hlp),
        instr!("LD L, A", 1, 4, Cpu::op_ld_l_a),
        // --- 0x70 ---
        instr!("LD (HL), B", 1, 8, Cpu::op_ld_hlp_b),
        instr!("LD (HL), C", 1, 8, Cpu::op_ld_hlp_c),
        instr!("LD (HL), D", 1, 8, Cpu::op_ld_hlp_d),
        instr!("LD (HL), E", 1, 8, Cpu::op_ld_hlp_e),
        instr!("LD (HL), H", 1, 8, Cpu::op_ld_hlp_h),
        instr!("LD (HL), L", 1, 8, Cpu::op_ld_hlp_l),
        instr!("HALT", 1, 4, Cpu::op_halt),
        instr!("LD (HL), A", 1, 8, Cpu::op_ld_hlp_a),
        instr!("LD A, B", 1, 4, Cpu::op_ld_a_b),
        instr!("LD A, C", 1, 4, Cpu::op_ld_a_c),
        instr!("LD A, D", 1, 4, Cpu::op_ld_a_d),
        instr!("LD A, E", 1, 4, Cpu::op_ld_a_e),
        instr!("LD A, H", 1, 4, Cpu::op_ld_a_h),
        instr!("LD A, L", 1, 4, Cpu::op_ld_a_l),
        instr!("LD A, (HL)", 1, 8, Cpu::op_ld_a_hlp),
        instr!("LD A, A", 1, 4, Cpu::op_ld_a_a),
        // --- 0x80: ADD/ADC ---
        instr!("ADD A, B", 1, 4, Cpu::op_add_a_b),
        instr!("ADD A, C", 1, 4, Cpu::op_add_a_c),
        instr!("ADD A, D", 1, 4, Cpu::op_add_a_d),
        instr!("ADD A, E", 1, 4, Cpu::op_add_a_e),
        instr!("ADD A, H", 1, 4, Cpu::op_add_a_h),
        instr!("ADD A, L", 1, 4, Cpu::op_add_a_l),
        instr!("ADD A, (HL)", 1, 8, Cpu::op_add_a_hlp),
        instr!("ADD A, A", 1, 4, Cpu::op_add_a_a),
        instr!("ADC A, B", 1, 4, Cpu::op_adc_a_b),
        instr!("ADC A, C", 1, 4, Cpu::op_adc_a_c),
        instr!("ADC A, D", 1, 4, Cpu::op_adc_a_d),
        instr!("ADC A, E", 1, 4, Cpu::op_adc_a_e),
        instr!("ADC A, H", 1, 4, Cpu::op_adc_a_h),
        instr!("ADC A, L", 1, 4, Cpu::op_adc_a_l),
        instr!("ADC A, (HL)", 1, 8, Cpu::op_adc_a_hlp),
        instr!("ADC A, A", 1, 4, Cpu::op_adc_a_a),
        // --- 0x90: SUB/SBC ---
        instr!("SUB B", 1, 4, Cpu::op_sub_a_b),
        instr!("SUB C", 1, 4, Cpu::op_sub_a_c),
        instr!("SUB D", 1, 4, Cpu::op_sub_a_d),
        instr!("SUB E", 1, 4, Cpu::op_sub_a_e),
        instr!("SUB H", 1, 4, Cpu::op_sub_a_h),
        instr!("SUB L", 1, 4, Cpu::op_sub_a_l),
        instr!("SUB (HL)", 1, 8, Cpu::op_sub_a_hlp),
        instr!("SUB A", 1, 4, Cpu::op_sub_a_a),
        instr!("SBC A, B", 1, 4, Cpu::op_sbc_a_b),
        instr!("SBC A, C", 1, 4, Cpu::op_sbc_a_c),
        instr!("SBC A, D", 1, 4, Cpu::op_sbc_a_d),
        instr!("SBC A, E", 1, 4, Cpu::op_sbc_a_e),
        instr!("SBC A, H", 1, 4, Cpu::op_sbc_a_h),
        instr!("SBC A, L", 1, 4, Cpu::op_sbc_a_l),
        instr!("SBC A, (HL)", 1, 8, Cpu::op_sbc_a_hlp),
        instr!("SBC A, A", 1, 4, Cpu::op_sbc_a_a),
        // --- 0xA0: AND/XOR ---
        instr!("AND B", 1, 4, Cpu::op_and_a_b),
        instr!("AND C", 1, 4, Cpu::op_and_a_c),
        instr!("AND D", 1, 4, Cpu::op_and_a_d),
        instr!("AND E", 1, 4, Cpu::op_and_a_e),
        instr!("AND H", 1, 4, Cpu::op_and_a_h),
        instr!("AND L", 1, 4, Cpu::op_and_a_l),
        instr!("AND (HL)", 1, 8, Cpu::op_and_a_hlp),
        instr!("AND A", 1, 4, Cpu::op_and_a_a),
        instr!("XOR B", 1, 4, Cpu::op_xor_a_b),
        instr!("XOR C", 1, 4, Cpu::op_xor_a_c),
        instr!("XOR D", 1, 4, Cpu::op_xor_a_d),
        instr!("XOR E", 1, 4, Cpu::op_xor_a_e),
        instr!("XOR H", 1, 4, Cpu::op_xor_a_h),
        instr!("XOR L", 1, 4, Cpu::op_xor_a_l),
        instr!("XOR (HL)", 1, 8, Cpu::op_xor_a_hlp),
        instr!("XOR A", 1, 4, Cpu::op_xor_a_a),
        // --- 0xB0: OR/CP ---
        instr!("OR B", 1, 4, Cpu::op_or_a_b),
        instr!("OR C", 1, 4, Cpu::op_or_a_c),
        instr!("OR D", 1, 4, Cpu::op_or_a_d),
        instr!("OR E", 1, 4, Cpu::op_or_a_e),
        instr!("OR H", 1, 4, Cpu::op_or_a_h),
        instr!("OR L", 1, 4, Cpu::op_or_a_l),
        instr!("OR (HL)", 1, 8, Cpu::op_or_a_hlp),
        instr!("OR A", 1, 4, Cpu::op_or_a_a),
        instr!("CP B", 1, 4, Cpu::op_cp_a_b),
        instr!("CP C", 1, 4, Cpu::op_cp_a_c),
        instr!("CP D", 1, 4, Cpu::op_cp_a_d),
        instr!("CP E", 1, 4, Cpu::op_cp_a_e),
        instr!("CP H", 1, 4, Cpu::op_cp_a_h),
        instr!("CP L", 1, 4, Cpu::op_cp_a_l),
        instr!("CP (HL)", 1, 8, Cpu::op_cp_a_hlp),
        instr!("CP A", 1, 4, Cpu::op_cp_a_a),
        // --- 0xC0 ---
        instr!("RET NZ", 1, 8, Cpu::op_ret_nz),
        instr!("POP BC", 1, 12, Cpu::op_pop_bc),
        instr!("JP NZ, a16", 3, 12, Cpu::op_jp_nz_a16),
        instr!("JP a16", 3, 16, Cpu::op_jp_a16),
        instr!("CALL NZ, a16", 3, 12, Cpu::op_call_nz_a16),
        instr!("PUSH BC", 1, 16, Cpu::op_push_bc),
        instr!("ADD A, d8", 2, 8, Cpu::op_add_a_d8),
        instr!("RST 00H", 1, 16, Cpu::op_rst_00),
        instr!("RET Z", 1, 8, Cpu::op_ret_z),
        instr!("RET", 1, 16, Cpu::op_ret),
        instr!("JP Z, a16", 3, 12, Cpu::op_jp_z_a16),
        instr!("PREFIX CB", 1, 4, Cpu::op_prefix_cb),
        instr!("CALL Z, a16", 3, 12, Cpu::op_call_z_a16),
        instr!("CALL a16", 3, 24, Cpu::op_call_a16),
        instr!("ADC A, d8", 2, 8, Cpu::op_adc_a_d8),
        instr!("RST 08H", 1, 16, Cpu::op_rst_08),
        // --- 0xD0 ---
        instr!("RET NC", 1, 8, Cpu::op_ret_nc),
        instr!("POP DE", 1, 12, Cpu::op_pop_de),
        instr!("JP NC, a16", 3, 12, Cpu::op_jp_nc_a16),
        invalid!(),
        instr!("CALL NC, a16", 3, 12, Cpu::op_call_nc_a16),
        instr!("PUSH DE", 1, 16, Cpu::op_push_de),
        instr!("SUB d8", 2, 8, Cpu::op_sub_a_d8),
        instr!("RST 10H", 1, 16, Cpu::op_rst_10),
        instr!("RET C", 1, 8, Cpu::op_ret_c),
        instr!("RETI", 1, 16, Cpu::op_reti),
        instr!("JP C, a16", 3, 12, Cpu::op_jp_c_a16),
        invalid!(),
        instr!("CALL C, a16", 3, 12, Cpu::op_call_c_a16),
        invalid!(),
        instr!("SBC A, d8", 2, 8, Cpu::op_sbc_a_d8),
        instr!("RST 18H", 1, 16, Cpu::op_rst_18),
        // --- 0xE0 ---
        instr!("LDH (a8), A", 2, 12, Cpu::op_ldh_a8_a),
        instr!("POP HL", 1, 12, Cpu::op_pop_hl),
        instr!("LD (C), A", 1, 8, Cpu::op_ld_cp_a),
        invalid!(),
        invalid!(),
        instr!("PUSH HL", 1, 16, Cpu::op_push_hl),
        instr!("AND d8", 2, 8, Cpu::op_and_a_d8),
        instr!("RST 20H", 1, 16, Cpu::op_rst_20),
        instr!("ADD SP, r8", 2, 16, Cpu::op_add_sp_r8),
        instr!("JP HL", 1, 4, Cpu::op_jp_hl),
        instr!("LD (a16), A", 3, 16, Cpu::op_ld_a16p_a),
        invalid!(),
        invalid!(),
        invalid!(),
        instr!("XOR d8", 2, 8, Cpu::op_xor_a_d8),
        instr!("RST 28H", 1, 16, Cpu::op_rst_28),
        // --- 0xF0 ---
        instr!("LDH A, (a8)", 2, 12, Cpu::op_ldh_a_a8),
        instr!("POP AF", 1, 12, Cpu::op_pop_af),
        instr!("LD A, (C)", 1, 8, Cpu::op_ld_a_cp),
        instr!("DI", 1, 4, Cpu::op_di),
        invalid!(),
        instr!("PUSH AF", 1, 16, Cpu::op_push_af),
        instr!("OR d8", 2, 8, Cpu::op_or_a_d8),
        instr!("RST 30H", 1, 16, Cpu::op_rst_30),
        instr!("LD HL, SP+r8", 2, 12, Cpu::op_ld_hl_sp_r8),
        instr!("LD SP, HL", 1, 8, Cpu::op_ld_sp_hl),
        instr!("LD A, (a16)", 3, 16, Cpu::op_ld_a_a16p),
        instr!("EI", 1, 4, Cpu::op_ei),
        invalid!(),
        invalid!(),
        instr!("CP d8", 2, 8, Cpu::op_cp_a_d8),
        instr!("RST 38H", 1, 16, Cpu::op_rst_38),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_all_opcodes() {
        assert_eq!(INSTRUCTIONS.len(), 256);
        // The unassigned opcodes are exactly the eleven documented holes.
        let invalid: Vec<usize> = INSTRUCTIONS
            .iter()
            .enumerate()
            .filter(|(_, i)| i.mnemonic == "INVALID")
            .map(|(op, _)| op)
            .collect();
        assert_eq!(
            invalid,
            vec![0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
        );
    }

    #[test]
    fn lengths_match_operand_placeholders() {
        for instruction in INSTRUCTIONS.iter() {
            let has_d16 = instruction.mnemonic.contains("d16") || instruction.mnemonic.contains("a16");
            let has_d8 = instruction.mnemonic.contains("d8")
                || instruction.mnemonic.contains("r8")
                || instruction.mnemonic.contains("a8");
            if has_d16 {
                assert_eq!(instruction.length, 3, "{}", instruction.mnemonic);
            } else if has_d8 {
                assert_eq!(instruction.length, 2, "{}", instruction.mnemonic);
            }
        }
    }
}

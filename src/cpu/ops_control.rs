//! Control flow, interrupt-enable management, HALT/STOP, and the
//! illegal-opcode trap.

use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    pub(super) fn op_nop(&mut self, _bus: &mut Bus) {}

    /// STOP parks the CPU until a button press; the padding byte after the
    /// opcode is consumed like an operand.
    pub(super) fn op_stop(&mut self, bus: &mut Bus) {
        self.fetch8(bus);
        self.stopped = true;
    }

    /// HALT suspends fetching until any requested-and-enabled interrupt.
    /// Entering with IME off and a source already pending arms the HALT
    /// bug: the next fetch executes its byte twice.
    pub(super) fn op_halt(&mut self, bus: &mut Bus) {
        if !self.ime && bus.intr.pending() != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    pub(super) fn op_di(&mut self, _bus: &mut Bus) {
        self.ime = false;
        self.ime_pending = false;
    }

    /// EI enables interrupts after the *following* instruction.
    pub(super) fn op_ei(&mut self, _bus: &mut Bus) {
        self.ime_pending = true;
    }

    // --- Relative jumps ---
    pub(super) fn op_jr_r8(&mut self, bus: &mut Bus) {
        let offset = self.fetch8(bus) as i8;
        bus.tick();
        self.pc = self.pc.wrapping_add(offset as i16 as u16);
    }
    jr_cc!(op_jr_nz_r8, FLAG_Z, false);
    jr_cc!(op_jr_z_r8, FLAG_Z, true);
    jr_cc!(op_jr_nc_r8, FLAG_C, false);
    jr_cc!(op_jr_c_r8, FLAG_C, true);

    // --- Absolute jumps ---
    pub(super) fn op_jp_a16(&mut self, bus: &mut Bus) {
        let target = self.fetch16(bus);
        bus.tick();
        self.pc = target;
    }
    jp_cc!(op_jp_nz_a16, FLAG_Z, false);
    jp_cc!(op_jp_z_a16, FLAG_Z, true);
    jp_cc!(op_jp_nc_a16, FLAG_C, false);
    jp_cc!(op_jp_c_a16, FLAG_C, true);
    pub(super) fn op_jp_hl(&mut self, _bus: &mut Bus) {
        self.pc = self.hl();
    }

    // --- Calls and returns ---
    pub(super) fn op_call_a16(&mut self, bus: &mut Bus) {
        let target = self.fetch16(bus);
        self.push16(bus, self.pc);
        self.pc = target;
    }
    call_cc!(op_call_nz_a16, FLAG_Z, false);
    call_cc!(op_call_z_a16, FLAG_Z, true);
    call_cc!(op_call_nc_a16, FLAG_C, false);
    call_cc!(op_call_c_a16, FLAG_C, true);

    pub(super) fn op_ret(&mut self, bus: &mut Bus) {
        self.pc = self.pop16(bus);
        bus.tick();
    }
    ret_cc!(op_ret_nz, FLAG_Z, false);
    ret_cc!(op_ret_z, FLAG_Z, true);
    ret_cc!(op_ret_nc, FLAG_C, false);
    ret_cc!(op_ret_c, FLAG_C, true);

    /// RETI is RET plus an immediate (no EI delay) interrupt enable.
    pub(super) fn op_reti(&mut self, bus: &mut Bus) {
        self.pc = self.pop16(bus);
        bus.tick();
        self.ime = true;
    }

    // --- Restarts ---
    rst!(op_rst_00, 0x0000);
    rst!(op_rst_08, 0x0008);
    rst!(op_rst_10, 0x0010);
    rst!(op_rst_18, 0x0018);
    rst!(op_rst_20, 0x0020);
    rst!(op_rst_28, 0x0028);
    rst!(op_rst_30, 0x0030);
    rst!(op_rst_38, 0x0038);

    /// Documented behavior for the unassigned opcodes is a hard hang.
    pub(super) fn op_illegal(&mut self, bus: &mut Bus) {
        let site = self.pc.wrapping_sub(1);
        log::error!(
            "illegal opcode {:02X} at {:04X}; CPU locked",
            bus.read_raw(site),
            site
        );
        self.locked = true;
    }
}

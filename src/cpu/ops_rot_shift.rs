//! The accumulator rotate quartet. Unlike their CB-page twins these always
//! clear Z.

use super::{Cpu, FLAG_Z};
use crate::bus::Bus;

impl Cpu {
    pub(super) fn op_rlca(&mut self, _bus: &mut Bus) {
        self.a = self.rlc(self.a);
        self.set_flag(FLAG_Z, false);
    }

    pub(super) fn op_rla(&mut self, _bus: &mut Bus) {
        self.a = self.rl(self.a);
        self.set_flag(FLAG_Z, false);
    }

    pub(super) fn op_rrca(&mut self, _bus: &mut Bus) {
        self.a = self.rrc(self.a);
        self.set_flag(FLAG_Z, false);
    }

    pub(super) fn op_rra(&mut self, _bus: &mut Bus) {
        self.a = self.rr(self.a);
        self.set_flag(FLAG_Z, false);
    }
}

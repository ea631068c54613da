//! Macros generating the repetitive op-handler families. Each handler owns
//! its full timing: ticking bus accesses plus explicit internal cycles.

// --- Load macros ---

macro_rules! ld_r_r {
    ($name:ident, $dst:ident, $src:ident) => {
        #[inline(always)]
        pub(super) fn $name(&mut self, _bus: &mut crate::bus::Bus) {
            self.$dst = self.$src;
        }
    };
}

macro_rules! ld_r_d8 {
    ($name:ident, $dst:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            self.$dst = self.fetch8(bus);
        }
    };
}

macro_rules! ld_r_hlp {
    ($name:ident, $dst:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            self.$dst = self.read8(bus, self.hl());
        }
    };
}

macro_rules! ld_hlp_r {
    ($name:ident, $src:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            self.write8(bus, self.hl(), self.$src);
        }
    };
}

macro_rules! ld_rp_d16 {
    ($name:ident, $set:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.fetch16(bus);
            self.$set(value);
        }
    };
}

macro_rules! push_rp {
    ($name:ident, $get:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            self.push16(bus, self.$get());
        }
    };
}

macro_rules! pop_rp {
    ($name:ident, $set:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.pop16(bus);
            self.$set(value);
        }
    };
}

// --- ALU macros ---

macro_rules! alu_a_r {
    ($name:ident, $op:ident, $src:ident) => {
        #[inline(always)]
        pub(super) fn $name(&mut self, _bus: &mut crate::bus::Bus) {
            self.$op(self.$src, false);
        }
    };
    ($name:ident, $op:ident, $src:ident, carry) => {
        #[inline(always)]
        pub(super) fn $name(&mut self, _bus: &mut crate::bus::Bus) {
            self.$op(self.$src, true);
        }
    };
}

macro_rules! alu_a_hlp {
    ($name:ident, $op:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.read8(bus, self.hl());
            self.$op(value, false);
        }
    };
    ($name:ident, $op:ident, carry) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.read8(bus, self.hl());
            self.$op(value, true);
        }
    };
}

macro_rules! alu_a_d8 {
    ($name:ident, $op:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.fetch8(bus);
            self.$op(value, false);
        }
    };
    ($name:ident, $op:ident, carry) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.fetch8(bus);
            self.$op(value, true);
        }
    };
}

macro_rules! inc_r {
    ($name:ident, $reg:ident) => {
        pub(super) fn $name(&mut self, _bus: &mut crate::bus::Bus) {
            self.$reg = self.inc_u8(self.$reg);
        }
    };
}

macro_rules! dec_r {
    ($name:ident, $reg:ident) => {
        pub(super) fn $name(&mut self, _bus: &mut crate::bus::Bus) {
            self.$reg = self.dec_u8(self.$reg);
        }
    };
}

// 16-bit inc/dec spend one internal cycle and touch no flags.
macro_rules! inc_rp {
    ($name:ident, $get:ident, $set:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            bus.tick();
            let value = self.$get().wrapping_add(1);
            self.$set(value);
        }
    };
}

macro_rules! dec_rp {
    ($name:ident, $get:ident, $set:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            bus.tick();
            let value = self.$get().wrapping_sub(1);
            self.$set(value);
        }
    };
}

macro_rules! add_hl_rp {
    ($name:ident, $get:ident) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let value = self.$get();
            self.add_hl(bus, value);
        }
    };
}

// --- Control-flow macros (taken paths pay their extra internal cycles) ---

macro_rules! jr_cc {
    ($name:ident, $flag:ident, $expected:expr) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let offset = self.fetch8(bus) as i8;
            if self.flag(crate::cpu::$flag) == $expected {
                bus.tick();
                self.pc = self.pc.wrapping_add(offset as i16 as u16);
            }
        }
    };
}

macro_rules! jp_cc {
    ($name:ident, $flag:ident, $expected:expr) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let target = self.fetch16(bus);
            if self.flag(crate::cpu::$flag) == $expected {
                bus.tick();
                self.pc = target;
            }
        }
    };
}

macro_rules! call_cc {
    ($name:ident, $flag:ident, $expected:expr) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            let target = self.fetch16(bus);
            if self.flag(crate::cpu::$flag) == $expected {
                self.push16(bus, self.pc);
                self.pc = target;
            }
        }
    };
}

macro_rules! ret_cc {
    ($name:ident, $flag:ident, $expected:expr) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            bus.tick(); // condition check cycle
            if self.flag(crate::cpu::$flag) == $expected {
                self.pc = self.pop16(bus);
                bus.tick();
            }
        }
    };
}

macro_rules! rst {
    ($name:ident, $vector:expr) => {
        pub(super) fn $name(&mut self, bus: &mut crate::bus::Bus) {
            self.push16(bus, self.pc);
            self.pc = $vector;
        }
    };
}

//! Versioned binary save states.
//!
//! The container is magic + version followed by every piece of machine
//! state in a fixed order with fixed sizes (external RAM length is fixed by
//! the cartridge header). Loading validates the version and the exact
//! length up front and only then applies, so a rejected load leaves the
//! machine untouched.

use crate::gameboy::GameBoy;

pub const STATE_VERSION: u16 = 1;
const MAGIC: [u8; 4] = *b"DMXS";

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Writer { buf: Vec::with_capacity(32 * 1024) }
    }
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }
    fn flag(&mut self, v: bool) {
        self.buf.push(v as u8);
    }
    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    fn bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }
}

/// Cursor over a length-validated buffer; every read is in-bounds by
/// construction.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }
    fn u8(&mut self) -> u8 {
        let v = self.buf[self.pos];
        self.pos += 1;
        v
    }
    fn flag(&mut self) -> bool {
        self.u8() != 0
    }
    fn u16(&mut self) -> u16 {
        u16::from_le_bytes([self.u8(), self.u8()])
    }
    fn u32(&mut self) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        u32::from_le_bytes(raw)
    }
    fn u64(&mut self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        u64::from_le_bytes(raw)
    }
    fn take(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&self.buf[self.pos..self.pos + out.len()]);
        self.pos += out.len();
    }
}

impl GameBoy {
    /// Serializes the complete machine state.
    pub fn save_state(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.bytes(&MAGIC);
        w.u16(STATE_VERSION);

        // CPU
        let cpu = &self.cpu;
        w.u8(cpu.a);
        w.u8(cpu.f);
        w.u8(cpu.b);
        w.u8(cpu.c);
        w.u8(cpu.d);
        w.u8(cpu.e);
        w.u8(cpu.h);
        w.u8(cpu.l);
        w.u16(cpu.sp);
        w.u16(cpu.pc);
        w.flag(cpu.ime);
        w.flag(cpu.ime_pending);
        w.flag(cpu.halted);
        w.flag(cpu.stopped);
        w.flag(cpu.halt_bug);
        w.flag(cpu.locked);

        // Interrupt latches
        w.u8(self.bus.intr.flags);
        w.u8(self.bus.intr.enable);

        // Timer
        let timer = &self.bus.timer;
        w.u16(timer.counter);
        w.u8(timer.tima);
        w.u8(timer.tma);
        w.u8(timer.tac);
        w.u8(timer.overflow_delay);

        // Plain RAM
        w.bytes(&self.bus.wram[..]);
        w.bytes(&self.bus.hram[..]);

        // Serial, joypad select, DMA, boot ROM mapping
        w.u8(self.bus.serial.data);
        w.u8(self.bus.serial.control);
        w.u8(self.bus.joypad.select);
        w.u8(self.bus.dma.page);
        w.flag(self.bus.dma.active);
        w.u8(self.bus.dma.index);
        w.flag(self.bus.boot_rom_enabled);

        // PPU
        let ppu = &self.bus.ppu;
        w.bytes(&ppu.vram[..]);
        w.bytes(&ppu.oam[..]);
        w.u8(ppu.lcdc);
        w.u8(ppu.stat_enable);
        w.u8(ppu.scy);
        w.u8(ppu.scx);
        w.u8(ppu.ly);
        w.u8(ppu.lyc);
        w.u8(ppu.wy);
        w.u8(ppu.wx);
        w.u8(ppu.bgp);
        w.u8(ppu.obp0);
        w.u8(ppu.obp1);
        w.u8(ppu.bg_pal_index);
        w.u8(ppu.ob_pal_index);
        w.bytes(&ppu.bg_pal);
        w.bytes(&ppu.ob_pal);
        w.u8(ppu.mode);
        w.u16(ppu.dots);
        w.flag(ppu.lyc_match);
        w.flag(ppu.stat_line);
        w.u64(ppu.frames);

        // APU
        let apu = &self.bus.apu;
        w.flag(apu.enabled);
        w.u8(apu.nr50);
        w.u8(apu.nr51);
        w.u8(apu.frame_step);
        w.flag(apu.prev_seq_bit);
        w.u32(apu.sample_timer);
        // Channel 1
        w.flag(apu.ch1.enabled);
        w.u8(apu.ch1.duty);
        w.u8(apu.ch1.duty_step);
        w.u16(apu.ch1.frequency);
        w.u16(apu.ch1.freq_timer);
        w.flag(apu.ch1.length.enabled);
        w.u16(apu.ch1.length.counter);
        w.u8(apu.ch1.envelope.initial);
        w.flag(apu.ch1.envelope.increase);
        w.u8(apu.ch1.envelope.period);
        w.u8(apu.ch1.envelope.volume);
        w.u8(apu.ch1.envelope.timer);
        w.u8(apu.ch1.sweep_period);
        w.flag(apu.ch1.sweep_decrease);
        w.u8(apu.ch1.sweep_shift);
        w.u8(apu.ch1.sweep_timer);
        w.u16(apu.ch1.sweep_shadow);
        w.flag(apu.ch1.sweep_enabled);
        // Channel 2
        w.flag(apu.ch2.enabled);
        w.u8(apu.ch2.duty);
        w.u8(apu.ch2.duty_step);
        w.u16(apu.ch2.frequency);
        w.u16(apu.ch2.freq_timer);
        w.flag(apu.ch2.length.enabled);
        w.u16(apu.ch2.length.counter);
        w.u8(apu.ch2.envelope.initial);
        w.flag(apu.ch2.envelope.increase);
        w.u8(apu.ch2.envelope.period);
        w.u8(apu.ch2.envelope.volume);
        w.u8(apu.ch2.envelope.timer);
        // Channel 3
        w.flag(apu.ch3.enabled);
        w.flag(apu.ch3.dac_enabled);
        w.u8(apu.ch3.level);
        w.u16(apu.ch3.frequency);
        w.u16(apu.ch3.freq_timer);
        w.u8(apu.ch3.position);
        w.flag(apu.ch3.length.enabled);
        w.u16(apu.ch3.length.counter);
        w.bytes(&apu.ch3.wave_ram);
        // Channel 4
        w.flag(apu.ch4.enabled);
        w.u8(apu.ch4.shift);
        w.flag(apu.ch4.width7);
        w.u8(apu.ch4.divisor_code);
        w.u32(apu.ch4.freq_timer);
        w.u16(apu.ch4.lfsr);
        w.flag(apu.ch4.length.enabled);
        w.u16(apu.ch4.length.counter);
        w.u8(apu.ch4.envelope.initial);
        w.flag(apu.ch4.envelope.increase);
        w.u8(apu.ch4.envelope.period);
        w.u8(apu.ch4.envelope.volume);
        w.u8(apu.ch4.envelope.timer);

        // Cartridge / MBC
        let cart = &self.bus.cart;
        w.flag(cart.ram_enabled);
        w.u8(cart.bank1);
        w.u8(cart.rom_hi);
        w.u8(cart.bank2);
        w.u8(cart.mode);
        w.u8(cart.rtc_latch_state);
        w.u8(cart.rtc.seconds);
        w.u8(cart.rtc.minutes);
        w.u8(cart.rtc.hours);
        w.u8(cart.rtc.day_low);
        w.u8(cart.rtc.day_high);
        w.u8(cart.rtc_latched.seconds);
        w.u8(cart.rtc_latched.minutes);
        w.u8(cart.rtc_latched.hours);
        w.u8(cart.rtc_latched.day_low);
        w.u8(cart.rtc_latched.day_high);
        w.bytes(&cart.ram);

        w.buf
    }

    /// Restores a state produced by [`GameBoy::save_state`] for the same
    /// cartridge. Version or size mismatches reject the load and leave the
    /// current state untouched.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), String> {
        if data.len() < 6 || data[..4] != MAGIC {
            return Err("not a save state".into());
        }
        let version = u16::from_le_bytes([data[4], data[5]]);
        if version != STATE_VERSION {
            return Err(format!(
                "save state version {} unsupported (expected {})",
                version, STATE_VERSION
            ));
        }
        let expected = self.save_state().len();
        if data.len() != expected {
            return Err(format!(
                "save state size {} does not match this cartridge ({} expected)",
                data.len(),
                expected
            ));
        }

        let mut r = Reader::new(data);
        let mut skip = [0u8; 6];
        r.take(&mut skip); // magic + version

        let cpu = &mut self.cpu;
        cpu.a = r.u8();
        cpu.f = r.u8();
        cpu.b = r.u8();
        cpu.c = r.u8();
        cpu.d = r.u8();
        cpu.e = r.u8();
        cpu.h = r.u8();
        cpu.l = r.u8();
        cpu.sp = r.u16();
        cpu.pc = r.u16();
        cpu.ime = r.flag();
        cpu.ime_pending = r.flag();
        cpu.halted = r.flag();
        cpu.stopped = r.flag();
        cpu.halt_bug = r.flag();
        cpu.locked = r.flag();

        self.bus.intr.flags = r.u8();
        self.bus.intr.enable = r.u8();

        let timer = &mut self.bus.timer;
        timer.counter = r.u16();
        timer.tima = r.u8();
        timer.tma = r.u8();
        timer.tac = r.u8();
        timer.overflow_delay = r.u8();

        r.take(&mut self.bus.wram[..]);
        r.take(&mut self.bus.hram[..]);

        self.bus.serial.data = r.u8();
        self.bus.serial.control = r.u8();
        self.bus.joypad.select = r.u8();
        self.bus.dma.page = r.u8();
        self.bus.dma.active = r.flag();
        self.bus.dma.index = r.u8();
        self.bus.boot_rom_enabled = r.flag();

        let ppu = &mut self.bus.ppu;
        r.take(&mut ppu.vram[..]);
        r.take(&mut ppu.oam[..]);
        ppu.lcdc = r.u8();
        ppu.stat_enable = r.u8();
        ppu.scy = r.u8();
        ppu.scx = r.u8();
        ppu.ly = r.u8();
        ppu.lyc = r.u8();
        ppu.wy = r.u8();
        ppu.wx = r.u8();
        ppu.bgp = r.u8();
        ppu.obp0 = r.u8();
        ppu.obp1 = r.u8();
        ppu.bg_pal_index = r.u8();
        ppu.ob_pal_index = r.u8();
        r.take(&mut ppu.bg_pal);
        r.take(&mut ppu.ob_pal);
        ppu.mode = r.u8();
        ppu.dots = r.u16();
        ppu.lyc_match = r.flag();
        ppu.stat_line = r.flag();
        ppu.frames = r.u64();
        ppu.refresh_line_state();

        let apu = &mut self.bus.apu;
        apu.enabled = r.flag();
        apu.nr50 = r.u8();
        apu.nr51 = r.u8();
        apu.frame_step = r.u8();
        apu.prev_seq_bit = r.flag();
        apu.sample_timer = r.u32();
        apu.ch1.enabled = r.flag();
        apu.ch1.duty = r.u8();
        apu.ch1.duty_step = r.u8();
        apu.ch1.frequency = r.u16();
        apu.ch1.freq_timer = r.u16();
        apu.ch1.length.enabled = r.flag();
        apu.ch1.length.counter = r.u16();
        apu.ch1.envelope.initial = r.u8();
        apu.ch1.envelope.increase = r.flag();
        apu.ch1.envelope.period = r.u8();
        apu.ch1.envelope.volume = r.u8();
        apu.ch1.envelope.timer = r.u8();
        apu.ch1.sweep_period = r.u8();
        apu.ch1.sweep_decrease = r.flag();
        apu.ch1.sweep_shift = r.u8();
        apu.ch1.sweep_timer = r.u8();
        apu.ch1.sweep_shadow = r.u16();
        apu.ch1.sweep_enabled = r.flag();
        apu.ch2.enabled = r.flag();
        apu.ch2.duty = r.u8();
        apu.ch2.duty_step = r.u8();
        apu.ch2.frequency = r.u16();
        apu.ch2.freq_timer = r.u16();
        apu.ch2.length.enabled = r.flag();
        apu.ch2.length.counter = r.u16();
        apu.ch2.envelope.initial = r.u8();
        apu.ch2.envelope.increase = r.flag();
        apu.ch2.envelope.period = r.u8();
        apu.ch2.envelope.volume = r.u8();
        apu.ch2.envelope.timer = r.u8();
        apu.ch3.enabled = r.flag();
        apu.ch3.dac_enabled = r.flag();
        apu.ch3.level = r.u8();
        apu.ch3.frequency = r.u16();
        apu.ch3.freq_timer = r.u16();
        apu.ch3.position = r.u8();
        apu.ch3.length.enabled = r.flag();
        apu.ch3.length.counter = r.u16();
        r.take(&mut apu.ch3.wave_ram);
        apu.ch4.enabled = r.flag();
        apu.ch4.shift = r.u8();
        apu.ch4.width7 = r.flag();
        apu.ch4.divisor_code = r.u8();
        apu.ch4.freq_timer = r.u32();
        apu.ch4.lfsr = r.u16();
        apu.ch4.length.enabled = r.flag();
        apu.ch4.length.counter = r.u16();
        apu.ch4.envelope.initial = r.u8();
        apu.ch4.envelope.increase = r.flag();
        apu.ch4.envelope.period = r.u8();
        apu.ch4.envelope.volume = r.u8();
        apu.ch4.envelope.timer = r.u8();

        let cart = &mut self.bus.cart;
        cart.ram_enabled = r.flag();
        cart.bank1 = r.u8();
        cart.rom_hi = r.u8();
        cart.bank2 = r.u8();
        cart.mode = r.u8();
        cart.rtc_latch_state = r.u8();
        cart.rtc.seconds = r.u8();
        cart.rtc.minutes = r.u8();
        cart.rtc.hours = r.u8();
        cart.rtc.day_low = r.u8();
        cart.rtc.day_high = r.u8();
        cart.rtc_latched.seconds = r.u8();
        cart.rtc_latched.minutes = r.u8();
        cart.rtc_latched.hours = r.u8();
        cart.rtc_latched.day_low = r.u8();
        cart.rtc_latched.day_high = r.u8();
        let ram_len = cart.ram.len();
        r.take(&mut cart.ram[..ram_len]);

        Ok(())
    }
}

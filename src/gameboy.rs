//! Top-level owner: the CPU plus the bus it drives, the host-facing step
//! API, and the callback hooks.
//!
//! Components never hold back-references to each other; the CPU advances
//! the bus through its own memory traffic, and host-visible events (frame
//! completed, battery RAM committed) surface either as polled flags here or
//! synchronously from the write that caused them.

use crate::apu::DEFAULT_SAMPLE_RATE;
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::joypad::Button;
use crate::memory_map::JOYPAD_INTERRUPT_BIT;
use crate::ppu::FRAME_PIXELS;

/// Machine cycles in one 70224-clock frame.
const CYCLES_PER_FRAME: u64 = 17556;

pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: Bus,
    on_frame: Option<Box<dyn FnMut(&[u16; FRAME_PIXELS]) + Send>>,
}

impl GameBoy {
    /// Builds a machine from a raw ROM image, skipping the boot ROM: the
    /// CPU and the MMIO registers start in their documented post-boot state.
    pub fn new(rom: Vec<u8>) -> Result<Self, String> {
        Self::with_sample_rate(rom, DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(rom: Vec<u8>, sample_rate: u32) -> Result<Self, String> {
        let cart = Cartridge::new(rom)?;
        let mut gb = GameBoy {
            cpu: Cpu::new(true),
            bus: Bus::new(cart, sample_rate),
            on_frame: None,
        };
        gb.apply_post_boot_io();
        Ok(gb)
    }

    /// Builds a machine that executes a boot ROM image first; everything
    /// starts cold and the image unmaps itself through FF50.
    pub fn with_boot_rom(rom: Vec<u8>, boot_rom: Vec<u8>) -> Result<Self, String> {
        let cart = Cartridge::new(rom)?;
        let mut bus = Bus::new(cart, DEFAULT_SAMPLE_RATE);
        bus.set_boot_rom(boot_rom);
        Ok(GameBoy { cpu: Cpu::new(false), bus, on_frame: None })
    }

    /// MMIO state the boot ROM leaves behind, applied through the normal
    /// write paths. NRx4 trigger bits are masked off: the boot chime is
    /// long over and the channels sit idle.
    fn apply_post_boot_io(&mut self) {
        let bus = &mut self.bus;
        bus.timer.counter = 0xAB00;
        bus.intr.write_flags(0x01); // VBlank already latched after boot

        bus.write(0xFF26, 0x80); // NR52: APU powered
        bus.write(0xFF10, 0x80);
        bus.write(0xFF11, 0xBF);
        bus.write(0xFF12, 0xF3);
        bus.write(0xFF14, 0x3F);
        bus.write(0xFF16, 0x3F);
        bus.write(0xFF19, 0x3F);
        bus.write(0xFF1A, 0x7F);
        bus.write(0xFF1C, 0x9F);
        bus.write(0xFF1E, 0x3F);
        bus.write(0xFF23, 0x3F);
        bus.write(0xFF24, 0x77);
        bus.write(0xFF25, 0xF3);

        bus.write(0xFF40, 0x91); // LCDC: display + BG on
        bus.write(0xFF47, 0xFC); // BGP
        bus.write(0xFF48, 0xFF);
        bus.write(0xFF49, 0xFF);
    }

    // --- Step API ---

    /// Runs one CPU instruction (or idle/service cycle) and everything the
    /// bus clocks in lockstep. Returns the machine cycles consumed.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        if self.bus.ppu.take_frame() {
            if let Some(hook) = self.on_frame.as_mut() {
                hook(self.bus.ppu.front());
            }
        }
        cycles
    }

    /// Steps until the PPU completes the next frame. With the LCD disabled
    /// (no frames are produced) this falls back to one frame's worth of
    /// cycles so hosts keep real-time pacing.
    pub fn step_frame(&mut self) {
        let frames = self.bus.ppu.frames;
        let deadline = self.bus.cycles() + CYCLES_PER_FRAME;
        while self.bus.ppu.frames == frames && self.bus.cycles() < deadline {
            self.step();
        }
    }

    /// Steps whole instructions until at least `cycles` machine cycles have
    /// elapsed.
    pub fn step_cycles(&mut self, cycles: u64) {
        let deadline = self.bus.cycles() + cycles;
        while self.bus.cycles() < deadline {
            self.step();
        }
    }

    // --- Host hooks ---

    /// Called with the front buffer each time the buffers swap at VBlank
    /// end.
    pub fn set_frame_hook(&mut self, hook: Box<dyn FnMut(&[u16; FRAME_PIXELS]) + Send>) {
        self.on_frame = Some(hook);
    }

    /// Called with a RAM snapshot when the program disables cartridge RAM;
    /// runs synchronously from the bus write, so keep it fast.
    pub fn set_battery_hook(&mut self, hook: Box<dyn FnMut(&[u8]) + Send>) {
        self.bus.cart.set_battery_hook(hook);
    }

    // --- Input (edge-triggered; any press requests the Joypad interrupt
    // and wakes STOP) ---

    pub fn press(&mut self, button: Button) {
        if self.bus.joypad.press(button) {
            self.bus.intr.request(JOYPAD_INTERRUPT_BIT);
            self.cpu.wake();
        }
    }

    pub fn release(&mut self, button: Button) {
        self.bus.joypad.release(button);
    }

    // --- Cartridge persistence ---

    pub fn load_battery_ram(&mut self, data: &[u8]) {
        self.bus.cart.load_ram(data);
    }

    pub fn battery_ram(&self) -> &[u8] {
        self.bus.cart.ram()
    }

    pub fn title(&self) -> &str {
        self.bus.cart.title()
    }

    // --- Audio ---

    /// Drains buffered stereo samples; the host feeds these to its device.
    pub fn take_audio(&mut self) -> Vec<u8> {
        self.bus.apu.take_audio()
    }

    /// Pull-style variant: fills `out` (interleaved u8 stereo), zero-padding
    /// on underrun.
    pub fn fill_audio(&mut self, out: &mut [u8]) {
        self.bus.apu.fill_audio(out);
    }

    /// Bytes written out the (stubbed) serial port.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial.output()
    }

    /// The completed frame, for hosts that poll instead of hooking.
    pub fn frame(&self) -> &[u16; FRAME_PIXELS] {
        self.bus.ppu.front()
    }
}

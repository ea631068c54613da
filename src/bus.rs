//! The shared memory bus: address decoding, MMIO register semantics, and
//! the fixed per-machine-cycle hardware interleaving.
//!
//! One machine cycle is: the CPU's access (if any) is serviced first, then
//! [`Bus::tick`] advances the PPU by 4 dots, moves one in-flight DMA byte,
//! steps the timer by 4 clocks, and lets the APU accumulate. The order never
//! changes; frames are deterministic across runs.

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::dma::OamDma;
use crate::interrupts::Interrupts;
use crate::joypad::Joypad;
use crate::memory_map::*;
use crate::ppu::Ppu;
use crate::serial::Serial;
use crate::timer::Timer;

pub struct Bus {
    pub cart: Cartridge,
    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub intr: Interrupts,
    pub joypad: Joypad,
    pub serial: Serial,
    pub dma: OamDma,

    pub(crate) wram: Box<[u8; WRAM_SIZE]>,
    pub(crate) hram: Box<[u8; HRAM_SIZE]>,

    boot_rom: Option<Vec<u8>>,
    pub(crate) boot_rom_enabled: bool,

    cycles: u64, // machine cycles since power-on
    warned_io: u128, // once-per-address unimplemented-MMIO warnings
}

impl Bus {
    pub fn new(cart: Cartridge, sample_rate: u32) -> Self {
        let color_mode = cart.cgb();
        Bus {
            cart,
            ppu: Ppu::new(color_mode),
            apu: Apu::new(sample_rate),
            timer: Timer::new(),
            intr: Interrupts::new(),
            joypad: Joypad::new(),
            serial: Serial::new(),
            dma: OamDma::new(),
            wram: Box::new([0; WRAM_SIZE]),
            hram: Box::new([0; HRAM_SIZE]),
            boot_rom: None,
            boot_rom_enabled: false,
            cycles: 0,
            warned_io: 0,
        }
    }

    /// Maps a boot ROM image over 0000-00FF until the program writes FF50.
    pub fn set_boot_rom(&mut self, image: Vec<u8>) {
        self.boot_rom = Some(image);
        self.boot_rom_enabled = true;
    }

    /// Machine cycles elapsed since power-on.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advances every hardware block by one machine cycle, in the fixed
    /// order PPU -> DMA -> timer -> APU.
    pub fn tick(&mut self) {
        self.cycles += 1;

        self.ppu.tick(&mut self.intr);

        if let Some(index) = self.dma.advance() {
            let byte = self.read_raw(self.dma.source(index));
            self.ppu.dma_write_oam(index, byte);
        }

        self.timer.tick(&mut self.intr);
        self.apu.tick(self.timer.counter);
    }

    /// Runs the bus for `clocks` master clocks (a multiple of 4) with no CPU
    /// traffic; test suites and the DMA/PPU scenarios drive this directly.
    pub fn run(&mut self, clocks: u32) {
        for _ in 0..clocks / 4 {
            self.tick();
        }
    }

    /// CPU read occupying one machine cycle: the value is sampled first,
    /// then the hardware advances.
    pub fn read_cycle(&mut self, addr: u16) -> u8 {
        let value = self.read(addr);
        self.tick();
        value
    }

    /// CPU write occupying one machine cycle.
    pub fn write_cycle(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
        self.tick();
    }

    /// True when the DMA bus lock hides `addr` from the CPU. Only HRAM (and
    /// the DMA register itself, so the transfer can be restarted) stays
    /// reachable while a transfer runs.
    fn dma_locked(&self, addr: u16) -> bool {
        self.dma.active() && !matches!(addr, HRAM_START..=HRAM_END | DMA_ADDR)
    }

    /// CPU-visible read with every access window applied.
    pub fn read(&mut self, addr: u16) -> u8 {
        if self.dma_locked(addr) {
            return 0xFF;
        }
        match addr {
            ROM_BANK_0_START..=ROM_BANK_N_END => {
                if self.boot_rom_enabled && (addr as usize) < self.boot_rom.as_ref().map_or(0, Vec::len) {
                    self.boot_rom.as_ref().unwrap()[addr as usize]
                } else {
                    self.cart.read(addr)
                }
            }
            VRAM_START..=VRAM_END => self.ppu.read_vram(addr),
            EXT_RAM_START..=EXT_RAM_END => self.cart.read(addr),
            WRAM_START..=WRAM_END => self.wram[(addr - WRAM_START) as usize],
            ECHO_RAM_START..=ECHO_RAM_END => self.wram[(addr - ECHO_RAM_START) as usize],
            OAM_START..=OAM_END => self.ppu.read_oam(addr),
            NOT_USABLE_START..=NOT_USABLE_END => 0xFF,
            IO_START..=IO_END => self.io_read(addr),
            HRAM_START..=HRAM_END => self.hram[(addr - HRAM_START) as usize],
            IE_ADDR => self.intr.read_enable(),
        }
    }

    /// CPU-visible write with every access window applied.
    pub fn write(&mut self, addr: u16, value: u8) {
        if self.dma_locked(addr) {
            return;
        }
        match addr {
            ROM_BANK_0_START..=ROM_BANK_N_END | EXT_RAM_START..=EXT_RAM_END => {
                self.cart.write(addr, value)
            }
            VRAM_START..=VRAM_END => self.ppu.write_vram(addr, value),
            WRAM_START..=WRAM_END => self.wram[(addr - WRAM_START) as usize] = value,
            ECHO_RAM_START..=ECHO_RAM_END => {
                self.wram[(addr - ECHO_RAM_START) as usize] = value
            }
            OAM_START..=OAM_END => self.ppu.write_oam(addr, value),
            NOT_USABLE_START..=NOT_USABLE_END => {}
            IO_START..=IO_END => self.io_write(addr, value),
            HRAM_START..=HRAM_END => self.hram[(addr - HRAM_START) as usize] = value,
            IE_ADDR => self.intr.write_enable(value),
        }
    }

    /// Un-gated read used by the DMA engine's source fetch (and nothing
    /// else): no bus lock, no PPU access windows, no warnings.
    pub(crate) fn read_raw(&self, addr: u16) -> u8 {
        match addr {
            ROM_BANK_0_START..=ROM_BANK_N_END | EXT_RAM_START..=EXT_RAM_END => {
                self.cart.read(addr)
            }
            VRAM_START..=VRAM_END => self.ppu.read_vram_raw(addr),
            WRAM_START..=WRAM_END => self.wram[(addr - WRAM_START) as usize],
            ECHO_RAM_START..=ECHO_RAM_END => self.wram[(addr - ECHO_RAM_START) as usize],
            HRAM_START..=HRAM_END => self.hram[(addr - HRAM_START) as usize],
            _ => 0xFF,
        }
    }

    // --- MMIO dispatch ---

    fn io_read(&mut self, addr: u16) -> u8 {
        match addr {
            JOYP_ADDR => self.joypad.read(),
            SB_ADDR => self.serial.read_data(),
            SC_ADDR => self.serial.read_control(),
            DIV_ADDR..=TAC_ADDR => self.timer.read(addr),
            IF_ADDR => self.intr.read_flags(),
            0xFF10..=0xFF26 | WAVE_RAM_START..=WAVE_RAM_END => self.apu.read(addr),
            LCDC_ADDR => self.ppu.read_lcdc(),
            STAT_ADDR => self.ppu.read_stat(),
            SCY_ADDR => self.ppu.scy,
            SCX_ADDR => self.ppu.scx,
            LY_ADDR => self.ppu.read_ly(),
            LYC_ADDR => self.ppu.lyc,
            DMA_ADDR => self.dma.read(),
            BGP_ADDR => self.ppu.bgp,
            OBP0_ADDR => self.ppu.obp0,
            OBP1_ADDR => self.ppu.obp1,
            WY_ADDR => self.ppu.wy,
            WX_ADDR => self.ppu.wx,
            BCPS_ADDR => self.ppu.bg_pal_index,
            BCPD_ADDR => self.ppu.read_bcpd(),
            OCPS_ADDR => self.ppu.ob_pal_index,
            OCPD_ADDR => self.ppu.read_ocpd(),
            _ => {
                self.warn_unimplemented(addr, "read");
                0xFF
            }
        }
    }

    fn io_write(&mut self, addr: u16, value: u8) {
        match addr {
            JOYP_ADDR => self.joypad.write(value),
            SB_ADDR => self.serial.write_data(value),
            SC_ADDR => self.serial.write_control(value, &mut self.intr),
            DIV_ADDR..=TAC_ADDR => self.timer.write(addr, value),
            IF_ADDR => self.intr.write_flags(value),
            0xFF10..=0xFF26 | WAVE_RAM_START..=WAVE_RAM_END => self.apu.write(addr, value),
            LCDC_ADDR => self.ppu.write_lcdc(value, &mut self.intr),
            STAT_ADDR => self.ppu.write_stat(value, &mut self.intr),
            SCY_ADDR => self.ppu.scy = value,
            SCX_ADDR => self.ppu.scx = value,
            LY_ADDR => self.ppu.write_ly(&mut self.intr),
            LYC_ADDR => self.ppu.write_lyc(value, &mut self.intr),
            DMA_ADDR => self.dma.start(value),
            BGP_ADDR => self.ppu.bgp = value,
            OBP0_ADDR => self.ppu.obp0 = value,
            OBP1_ADDR => self.ppu.obp1 = value,
            WY_ADDR => self.ppu.wy = value,
            WX_ADDR => self.ppu.wx = value,
            BOOT_ROM_DISABLE_ADDR => {
                // Sticky: once unmapped the boot ROM never comes back.
                if value & 0x01 != 0 && self.boot_rom_enabled {
                    log::debug!("boot ROM unmapped");
                    self.boot_rom_enabled = false;
                }
            }
            BCPS_ADDR => self.ppu.bg_pal_index = value,
            BCPD_ADDR => self.ppu.write_bcpd(value),
            OCPS_ADDR => self.ppu.ob_pal_index = value,
            OCPD_ADDR => self.ppu.write_ocpd(value),
            _ => self.warn_unimplemented(addr, "write"),
        }
    }

    fn warn_unimplemented(&mut self, addr: u16, op: &str) {
        let bit = 1u128 << (addr - IO_START);
        if self.warned_io & bit == 0 {
            self.warned_io |= bit;
            log::warn!("unimplemented MMIO {} at {:04X}", op, addr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bus() -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[HEADER_ROM_SIZE] = 0x00;
        Bus::new(Cartridge::new(rom).unwrap(), 48_000)
    }

    #[test]
    fn echo_ram_mirrors_wram() {
        let mut bus = make_bus();
        bus.write(0xC123, 0x42);
        assert_eq!(bus.read(0xE123), 0x42);
        bus.write(0xF000, 0x55);
        assert_eq!(bus.read(0xD000), 0x55);
    }

    #[test]
    fn unusable_region_reads_ff() {
        let mut bus = make_bus();
        bus.write(0xFEA0, 0x12);
        assert_eq!(bus.read(0xFEA0), 0xFF);
    }

    #[test]
    fn if_upper_bits_read_high() {
        let mut bus = make_bus();
        bus.write(IF_ADDR, 0x00);
        assert_eq!(bus.read(IF_ADDR), 0xE0);
        bus.write(IF_ADDR, 0xFF);
        assert_eq!(bus.read(IF_ADDR), 0xFF);
        assert_eq!(bus.intr.pending(), 0); // IE still clear
    }

    #[test]
    fn unimplemented_io_reads_ff() {
        let mut bus = make_bus();
        assert_eq!(bus.read(0xFF7C), 0xFF);
        bus.write(0xFF7C, 0x33);
        assert_eq!(bus.read(0xFF7C), 0xFF);
    }

    #[test]
    fn boot_rom_overlays_rom_until_ff50_write() {
        let mut bus = make_bus();
        bus.set_boot_rom(vec![0xAA; 0x100]);
        assert_eq!(bus.read(0x0000), 0xAA);
        assert_eq!(bus.read(0x0100), 0x00); // past the overlay
        bus.write(0xFF50, 0x01);
        assert_eq!(bus.read(0x0000), 0x00);
        // Sticky: re-enabling is not possible from the program side.
        bus.write(0xFF50, 0x00);
        assert_eq!(bus.read(0x0000), 0x00);
    }

    #[test]
    fn dma_locks_everything_but_hram() {
        let mut bus = make_bus();
        bus.write(0xC000, 0x99);
        bus.write(0xFF80, 0x77);
        bus.write(DMA_ADDR, 0xC0);
        assert!(bus.dma.active());
        assert_eq!(bus.read(0xC000), 0xFF);
        assert_eq!(bus.read(0xFF80), 0x77);
        bus.write(0xC000, 0x11); // dropped by the lock
        bus.run(160 * 4);
        assert!(!bus.dma.active());
        assert_eq!(bus.read(0xC000), 0x99);
    }
}

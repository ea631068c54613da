//! Cartridge ROM/RAM storage and the memory-bank controllers.
//!
//! The ROM image is parsed once at construction (title, MBC kind, ROM/RAM
//! geometry); bank switching is a per-operation `match` over the MBC kind.
//! Writes into `0000-7FFF` are never stored: they latch bank registers.

use crate::memory_map::*;
use crate::rtc::RtcRegisters;
use std::fmt;

/// Which bank controller the cartridge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcKind {
    /// Fixed 32 KiB ROM, optionally a single RAM bank.
    None,
    /// Up to 2 MiB ROM + 32 KiB RAM; a mode bit redirects the 2-bit upper
    /// register between ROM and RAM banking.
    Mbc1,
    /// Up to 2 MiB ROM + 32 KiB RAM + real-time-clock registers.
    Mbc3,
    /// Up to 8 MiB ROM (9-bit bank select) + 128 KiB RAM.
    Mbc5,
}

impl MbcKind {
    /// Decodes the header cartridge-type byte into (kind, has RAM, has
    /// battery). Unknown codes are a fatal construction error.
    fn from_header(code: u8) -> Result<(Self, bool, bool), String> {
        Ok(match code {
            0x00 => (MbcKind::None, false, false),
            0x01 => (MbcKind::Mbc1, false, false),
            0x02 => (MbcKind::Mbc1, true, false),
            0x03 => (MbcKind::Mbc1, true, true),
            0x08 => (MbcKind::None, true, false),
            0x09 => (MbcKind::None, true, true),
            0x0F => (MbcKind::Mbc3, false, true),
            0x10 => (MbcKind::Mbc3, true, true),
            0x11 => (MbcKind::Mbc3, false, false),
            0x12 => (MbcKind::Mbc3, true, false),
            0x13 => (MbcKind::Mbc3, true, true),
            0x19 | 0x1C => (MbcKind::Mbc5, false, false),
            0x1A | 0x1D => (MbcKind::Mbc5, true, false),
            0x1B | 0x1E => (MbcKind::Mbc5, true, true),
            _ => return Err(format!("unsupported cartridge type {:02X}", code)),
        })
    }
}

/// A loaded cartridge: the ROM image, external RAM, and live MBC state.
pub struct Cartridge {
    rom: Vec<u8>,
    pub(crate) ram: Vec<u8>,
    kind: MbcKind,
    has_ram: bool,
    has_battery: bool,
    rom_banks: usize,
    ram_banks: usize,
    title: String,
    cgb: bool,

    // MBC registers, raw as written; effective banks are derived on access.
    pub(crate) ram_enabled: bool,
    pub(crate) bank1: u8,   // 2000-3FFF: ROM bank low bits (MBC5: low 8)
    pub(crate) rom_hi: u8,  // 3000-3FFF on MBC5: ROM bank bit 8
    pub(crate) bank2: u8,   // 4000-5FFF: MBC1 upper 2 bits / RAM bank / RTC select
    pub(crate) mode: u8,    // 6000-7FFF on MBC1: 0 = ROM banking, 1 = RAM banking

    // MBC3 clock
    pub(crate) rtc: RtcRegisters,
    pub(crate) rtc_latched: RtcRegisters,
    pub(crate) rtc_latch_state: u8, // 1 after a 0x00 write, waiting for 0x01

    battery_hook: Option<Box<dyn FnMut(&[u8]) + Send>>,
}

impl Cartridge {
    /// Parses the header and takes ownership of the ROM image. All header
    /// inconsistencies the bus cannot recover from surface here.
    pub fn new(rom: Vec<u8>) -> Result<Self, String> {
        if rom.len() < 0x150 {
            return Err(format!("ROM too small for a header ({} bytes)", rom.len()));
        }

        let (kind, has_ram, has_battery) = MbcKind::from_header(rom[HEADER_MBC_TYPE])?;

        let rom_size_code = rom[HEADER_ROM_SIZE];
        if rom_size_code > 0x08 {
            return Err(format!("unsupported ROM size code {:02X}", rom_size_code));
        }
        let rom_size = 32768usize << rom_size_code;
        if rom.len() != rom_size {
            return Err(format!(
                "ROM length {} does not match header size {}",
                rom.len(),
                rom_size
            ));
        }

        let ram_size = match rom[HEADER_RAM_SIZE] {
            0x00 => 0,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            code => return Err(format!("unsupported RAM size code {:02X}", code)),
        };

        let title = rom[HEADER_TITLE_START..=HEADER_TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect();
        let cgb = rom[HEADER_CGB_FLAG] & 0x80 != 0;

        let ram = if has_ram { vec![0u8; ram_size] } else { Vec::new() };
        let ram_banks = ram.len() / EXT_RAM_BANK_SIZE;

        log::info!(
            "cartridge: {:?} kind={:?} rom_banks={} ram={}K battery={}",
            title,
            kind,
            rom_size / ROM_BANK_SIZE,
            ram.len() / 1024,
            has_battery
        );

        Ok(Cartridge {
            rom_banks: rom_size / ROM_BANK_SIZE,
            rom,
            ram,
            kind,
            has_ram,
            has_battery,
            ram_banks,
            title,
            cgb,
            ram_enabled: false,
            bank1: 1,
            rom_hi: 0,
            bank2: 0,
            mode: 0,
            rtc: RtcRegisters::new(),
            rtc_latched: RtcRegisters::default(),
            rtc_latch_state: 0,
            battery_hook: None,
        })
    }

    /// NUL-trimmed ASCII title from the header.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> MbcKind {
        self.kind
    }

    /// Color-mode flag from the header (register-surface support only).
    pub fn cgb(&self) -> bool {
        self.cgb
    }

    pub fn has_battery(&self) -> bool {
        self.has_battery
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Restores battery-backed RAM from a save file. A size mismatch keeps
    /// the zeroed image and is only worth a warning.
    pub fn load_ram(&mut self, data: &[u8]) {
        if data.len() != self.ram.len() {
            log::warn!(
                "save RAM size {} does not match cartridge RAM size {}, starting blank",
                data.len(),
                self.ram.len()
            );
            return;
        }
        self.ram.copy_from_slice(data);
    }

    /// Registers the battery hook invoked with a RAM snapshot whenever the
    /// program disables external RAM. Runs synchronously from the bus write.
    pub fn set_battery_hook(&mut self, hook: Box<dyn FnMut(&[u8]) + Send>) {
        self.battery_hook = Some(hook);
    }

    // --- Effective bank numbers ---

    fn rom_bank(&self) -> usize {
        let bank = match self.kind {
            MbcKind::None => 1,
            MbcKind::Mbc1 => {
                let low = self.bank1 as usize & 0x1F;
                let low = if low == 0 { 1 } else { low };
                if self.mode == 0 {
                    low | ((self.bank2 as usize & 0x03) << 5)
                } else {
                    low
                }
            }
            MbcKind::Mbc3 => {
                let bank = self.bank1 as usize & 0x7F;
                if bank == 0 { 1 } else { bank }
            }
            MbcKind::Mbc5 => ((self.rom_hi as usize & 0x01) << 8) | self.bank1 as usize,
        };
        // ROM sizes are powers of two, so masking wraps out-of-range banks.
        bank & (self.rom_banks - 1)
    }

    fn ram_bank(&self) -> usize {
        let bank = match self.kind {
            MbcKind::None => 0,
            MbcKind::Mbc1 => {
                if self.mode == 1 { self.bank2 as usize & 0x03 } else { 0 }
            }
            MbcKind::Mbc3 => self.bank2 as usize & 0x03,
            MbcKind::Mbc5 => self.bank2 as usize & 0x0F,
        };
        if self.ram_banks == 0 { 0 } else { bank % self.ram_banks }
    }

    /// True when MBC3 has an RTC register mapped over the RAM window.
    fn rtc_mapped(&self) -> bool {
        self.kind == MbcKind::Mbc3 && (0x08..=0x0C).contains(&self.bank2)
    }

    // --- Bus operations ---

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            ROM_BANK_0_START..=ROM_BANK_0_END => self.rom[addr as usize],
            ROM_BANK_N_START..=ROM_BANK_N_END => {
                let offset = self.rom_bank() * ROM_BANK_SIZE + (addr - ROM_BANK_N_START) as usize;
                self.rom[offset]
            }
            EXT_RAM_START..=EXT_RAM_END => {
                if !self.ram_enabled {
                    return 0xFF;
                }
                if self.rtc_mapped() {
                    return self.rtc_latched.read(self.bank2);
                }
                let offset =
                    self.ram_bank() * EXT_RAM_BANK_SIZE + (addr - EXT_RAM_START) as usize;
                self.ram.get(offset).copied().unwrap_or(0xFF)
            }
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // RAM (and RTC) enable. Disabling with a battery present emits
            // a save snapshot, the classic moment carts commit their RAM.
            0x0000..=0x1FFF => {
                let enable = value & 0x0F == 0x0A;
                if self.ram_enabled && !enable && self.has_battery {
                    if let Some(hook) = self.battery_hook.as_mut() {
                        hook(&self.ram);
                    }
                }
                self.ram_enabled = enable;
            }
            0x2000..=0x3FFF => match self.kind {
                MbcKind::Mbc1 => self.bank1 = value & 0x1F,
                MbcKind::Mbc3 => self.bank1 = value & 0x7F,
                MbcKind::Mbc5 => {
                    if addr < 0x3000 {
                        self.bank1 = value;
                    } else {
                        self.rom_hi = value & 0x01;
                    }
                }
                MbcKind::None => {}
            },
            0x4000..=0x5FFF => match self.kind {
                MbcKind::Mbc1 => self.bank2 = value & 0x03,
                MbcKind::Mbc3 => {
                    if value <= 0x0C {
                        self.bank2 = value;
                    }
                }
                MbcKind::Mbc5 => self.bank2 = value & 0x0F,
                MbcKind::None => {}
            },
            0x6000..=0x7FFF => match self.kind {
                MbcKind::Mbc1 => self.mode = value & 0x01,
                MbcKind::Mbc3 => {
                    // Latch on a 0x00, 0x01 write pair.
                    if self.rtc_latch_state == 1 && value == 0x01 {
                        self.rtc.update();
                        self.rtc_latched = self.rtc.clone();
                    }
                    self.rtc_latch_state = if value == 0x00 { 1 } else { 0 };
                }
                _ => {}
            },
            EXT_RAM_START..=EXT_RAM_END => {
                if !self.ram_enabled {
                    return;
                }
                if self.rtc_mapped() {
                    self.rtc.write(self.bank2, value);
                    return;
                }
                let offset =
                    self.ram_bank() * EXT_RAM_BANK_SIZE + (addr - EXT_RAM_START) as usize;
                if let Some(slot) = self.ram.get_mut(offset) {
                    *slot = value;
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cartridge")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("rom_banks", &self.rom_banks)
            .field("ram_banks", &self.ram_banks)
            .field("battery", &self.has_battery)
            .field("ram_enabled", &self.ram_enabled)
            .field("rom_bank", &self.rom_bank())
            .field("ram_bank", &self.ram_bank())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(mbc: u8, rom_code: u8, ram_code: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 32768 << rom_code as usize];
        rom[HEADER_TITLE_START..HEADER_TITLE_START + 4].copy_from_slice(b"TEST");
        rom[HEADER_MBC_TYPE] = mbc;
        rom[HEADER_ROM_SIZE] = rom_code;
        rom[HEADER_RAM_SIZE] = ram_code;
        rom
    }

    #[test]
    fn header_parse() {
        let cart = Cartridge::new(rom_with_header(0x03, 1, 0x03)).unwrap();
        assert_eq!(cart.title(), "TEST");
        assert_eq!(cart.kind(), MbcKind::Mbc1);
        assert!(cart.has_battery());
        assert_eq!(cart.ram().len(), 32 * 1024);
    }

    #[test]
    fn bad_headers_are_fatal() {
        assert!(Cartridge::new(vec![0u8; 0x100]).is_err());
        assert!(Cartridge::new(rom_with_header(0x42, 0, 0)).is_err());
        // RAM size code 1 is invalid.
        assert!(Cartridge::new(rom_with_header(0x02, 0, 0x01)).is_err());
        // Header says 64 KiB but the image is 32 KiB.
        let mut rom = rom_with_header(0x00, 0, 0);
        rom[HEADER_ROM_SIZE] = 1;
        assert!(Cartridge::new(rom).is_err());
    }

    #[test]
    fn ram_round_trip_requires_enable() {
        let mut cart = Cartridge::new(rom_with_header(0x02, 0, 0x02)).unwrap();
        cart.write(0xA000, 0x55);
        assert_eq!(cart.read(0xA000), 0xFF); // disabled: dropped write, FF read

        cart.write(0x0000, 0x0A);
        cart.write(0xA000, 0x55);
        assert_eq!(cart.read(0xA000), 0x55);

        cart.write(0x0000, 0x00);
        assert_eq!(cart.read(0xA000), 0xFF);
    }

    #[test]
    fn mbc1_bank_zero_remaps_to_one() {
        let cart_rom = rom_with_header(0x01, 0x04, 0); // 512 KiB, 32 banks
        let mut cart = Cartridge::new(cart_rom).unwrap();
        cart.write(0x2000, 0x00);
        // Bank register 0 selects bank 1.
        assert_eq!(cart.rom_bank(), 1);
        cart.write(0x2000, 0x12);
        assert_eq!(cart.rom_bank(), 0x12);
    }

    #[test]
    fn mbc1_mode_redirects_upper_bits() {
        let mut cart = Cartridge::new(rom_with_header(0x03, 0x06, 0x03)).unwrap(); // 2 MiB
        cart.write(0x2000, 0x01);
        cart.write(0x4000, 0x02);
        assert_eq!(cart.rom_bank(), 0x41); // mode 0: upper bits go to ROM
        assert_eq!(cart.ram_bank(), 0);
        cart.write(0x6000, 0x01);
        assert_eq!(cart.rom_bank(), 0x01); // mode 1: upper bits go to RAM
        assert_eq!(cart.ram_bank(), 2);
    }

    #[test]
    fn mbc5_nine_bit_bank_and_bank_zero() {
        let mut cart = Cartridge::new(rom_with_header(0x19, 0x08, 0)).unwrap(); // 8 MiB
        cart.write(0x2000, 0x34);
        cart.write(0x3000, 0x01);
        assert_eq!(cart.rom_bank(), 0x134);
        // Unlike MBC1, bank 0 is directly selectable.
        cart.write(0x2000, 0x00);
        cart.write(0x3000, 0x00);
        assert_eq!(cart.rom_bank(), 0);
    }

    #[test]
    fn battery_hook_fires_on_ram_disable() {
        use std::sync::{Arc, Mutex};
        let mut cart = Cartridge::new(rom_with_header(0x03, 0, 0x02)).unwrap();
        let saved: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = saved.clone();
        cart.set_battery_hook(Box::new(move |ram| {
            *sink.lock().unwrap() = ram.to_vec();
        }));

        cart.write(0x0000, 0x0A);
        cart.write(0xA000, 0xAB);
        cart.write(0x0000, 0x00);
        assert_eq!(saved.lock().unwrap()[0], 0xAB);
    }

    #[test]
    fn save_ram_size_mismatch_is_tolerated() {
        let mut cart = Cartridge::new(rom_with_header(0x03, 0, 0x02)).unwrap();
        cart.load_ram(&[0xFF; 16]);
        assert!(cart.ram().iter().all(|&b| b == 0));
        cart.load_ram(&vec![0x77; 8 * 1024]);
        assert_eq!(cart.ram()[0], 0x77);
    }
}

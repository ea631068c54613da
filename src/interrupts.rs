//! Interrupt request/enable latches (the IF and IE registers).

use crate::memory_map::*;

/// The five interrupt sources, latched in IF and masked by IE.
/// Bit position doubles as service priority (bit 0 = highest).
pub struct Interrupts {
    pub(crate) flags: u8,  // IF, 0xFF0F (low 5 bits)
    pub(crate) enable: u8, // IE, 0xFFFF
}

impl Interrupts {
    pub fn new() -> Self {
        Interrupts { flags: 0, enable: 0 }
    }

    /// Latches a request for the given source bit (0-4). Requests stay set
    /// until serviced or overwritten through the IF register.
    #[inline]
    pub fn request(&mut self, bit: u8) {
        if bit < 5 {
            self.flags |= 1 << bit;
        }
    }

    /// Requested-and-enabled sources, low 5 bits.
    #[inline]
    pub fn pending(&self) -> u8 {
        self.flags & self.enable & 0x1F
    }

    /// Clears the latched request for a serviced source.
    #[inline]
    pub fn acknowledge(&mut self, bit: u8) {
        self.flags &= !(1 << bit);
    }

    /// IF read view: the unused top three bits always read as 1.
    #[inline]
    pub fn read_flags(&self) -> u8 {
        self.flags | 0xE0
    }

    #[inline]
    pub fn write_flags(&mut self, value: u8) {
        self.flags = value & 0x1F;
    }

    #[inline]
    pub fn read_enable(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub fn write_enable(&mut self, value: u8) {
        self.enable = value & 0x1F;
    }

    /// Vector address for an interrupt source bit.
    pub fn vector(bit: u8) -> u16 {
        match bit {
            VBLANK_INTERRUPT_BIT => 0x0040,
            LCD_STAT_INTERRUPT_BIT => 0x0048,
            TIMER_INTERRUPT_BIT => 0x0050,
            SERIAL_INTERRUPT_BIT => 0x0058,
            _ => 0x0060,
        }
    }
}

impl Default for Interrupts {
    fn default() -> Self {
        Self::new()
    }
}

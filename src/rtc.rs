//! MBC3 real-time-clock register file.
//!
//! The five registers (seconds/minutes/hours and a 9-bit day counter with
//! halt and overflow flags) are advanced from the host wall clock whenever
//! the cartridge latches them; sub-second accuracy is not a goal.

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug, Default)]
pub struct RtcRegisters {
    pub(crate) seconds: u8, // reg 0x08, 0-59
    pub(crate) minutes: u8, // reg 0x09, 0-59
    pub(crate) hours: u8,   // reg 0x0A, 0-23
    pub(crate) day_low: u8, // reg 0x0B, day counter bits 0-7
    pub(crate) day_high: u8, // reg 0x0C, day bit 8 + halt + overflow flags

    last_update_secs: u64,
}

const DAY_CARRY_BIT: u8 = 0x01;
const HALT_BIT: u8 = 0x40;
const OVERFLOW_BIT: u8 = 0x80;

fn wall_clock_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl RtcRegisters {
    pub fn new() -> Self {
        RtcRegisters {
            last_update_secs: wall_clock_secs(),
            ..RtcRegisters::default()
        }
    }

    /// Folds wall-clock time elapsed since the previous update into the
    /// register file. A set halt bit freezes the counters.
    pub fn update(&mut self) {
        let now = wall_clock_secs();
        let elapsed = now.saturating_sub(self.last_update_secs);
        self.last_update_secs = now;
        if self.day_high & HALT_BIT != 0 || elapsed == 0 {
            return;
        }

        let seconds = u64::from(self.seconds) + elapsed;
        self.seconds = (seconds % 60) as u8;
        let minutes = u64::from(self.minutes) + seconds / 60;
        self.minutes = (minutes % 60) as u8;
        let hours = u64::from(self.hours) + minutes / 60;
        self.hours = (hours % 24) as u8;

        let mut days =
            u64::from(self.day_low) | (u64::from(self.day_high & DAY_CARRY_BIT) << 8);
        days += hours / 24;
        if days >= 512 {
            days %= 512;
            self.day_high |= OVERFLOW_BIT;
        }
        self.day_low = (days & 0xFF) as u8;
        self.day_high = (self.day_high & (HALT_BIT | OVERFLOW_BIT))
            | ((days >> 8) as u8 & DAY_CARRY_BIT);
    }

    pub fn read(&self, reg_select: u8) -> u8 {
        match reg_select {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.day_low,
            0x0C => self.day_high,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, reg_select: u8, value: u8) {
        match reg_select {
            0x08 => self.seconds = value.min(59),
            0x09 => self.minutes = value.min(59),
            0x0A => self.hours = value.min(23),
            0x0B => self.day_low = value,
            0x0C => {
                // Day-carry and halt are writable; overflow only clears here.
                self.day_high = value & (DAY_CARRY_BIT | HALT_BIT | OVERFLOW_BIT);
            }
            _ => {}
        }
    }
}

//! Serial port stub.
//!
//! There is no link cable peer: a transfer started through SC completes
//! immediately, the outgoing byte lands in a terminal-style sink the host
//! can drain, and the incoming byte is the disconnected-line 0xFF.

use crate::interrupts::Interrupts;
use crate::memory_map::SERIAL_INTERRUPT_BIT;

pub struct Serial {
    pub(crate) data: u8,    // SB
    pub(crate) control: u8, // SC bits 0 and 7
    output: Vec<u8>,
}

impl Serial {
    pub fn new() -> Self {
        Serial { data: 0, control: 0, output: Vec::new() }
    }

    pub fn read_data(&self) -> u8 {
        self.data
    }

    pub fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    /// Unused SC bits read as 1.
    pub fn read_control(&self) -> u8 {
        self.control | 0x7E
    }

    /// Starting a transfer (bit 7 with internal clock bit 0) ships the byte
    /// to the sink and completes at once.
    pub fn write_control(&mut self, value: u8, intr: &mut Interrupts) {
        self.control = value & 0x81;
        if value & 0x80 != 0 && value & 0x01 != 0 {
            log::debug!("serial out: {:02X} ({:?})", self.data, self.data as char);
            self.output.push(self.data);
            self.data = 0xFF; // nothing on the other end of the line
            self.control &= !0x80;
            intr.request(SERIAL_INTERRUPT_BIT);
        }
    }

    /// Everything written out the port so far; test ROMs report through it.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new()
    }
}

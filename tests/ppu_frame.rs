//! PPU frame cadence and rasterization scenarios, driven at the bus level.

use dotmatrix::ppu::SHADES;
use dotmatrix::{Bus, Cartridge};

const DOTS_PER_LINE: u32 = 456;
const DOTS_PER_FRAME: u32 = 70224;

fn make_bus() -> Bus {
    Bus::new(Cartridge::new(vec![0u8; 0x8000]).unwrap(), 48_000)
}

fn lit_bus() -> Bus {
    let mut bus = make_bus();
    bus.write(0xFF40, 0x91); // LCD + BG enable, 8000 tile data
    bus
}

#[test]
fn stat_mode_walks_search_transfer_hblank() {
    let mut bus = lit_bus();
    assert_eq!(bus.read(0xFF41) & 0x03, 2); // OAMSearch
    bus.run(80);
    assert_eq!(bus.read(0xFF41) & 0x03, 3); // PixelTransfer
    bus.run(172);
    assert_eq!(bus.read(0xFF41) & 0x03, 0); // HBlank
    bus.run(204);
    assert_eq!(bus.read(0xFF41) & 0x03, 2);
    assert_eq!(bus.read(0xFF44), 1);
}

#[test]
fn stat_bit7_always_reads_high() {
    let mut bus = lit_bus();
    bus.write(0xFF41, 0x00);
    assert_ne!(bus.read(0xFF41) & 0x80, 0);
}

#[test]
fn ly_counts_to_143_then_vblank_then_wraps() {
    let mut bus = lit_bus();
    bus.run(143 * DOTS_PER_LINE);
    assert_eq!(bus.read(0xFF44), 143);
    assert_eq!(bus.read(0xFF0F) & 0x01, 0);

    bus.run(DOTS_PER_LINE);
    assert_eq!(bus.read(0xFF44), 144);
    assert_eq!(bus.read(0xFF41) & 0x03, 1); // VBlank
    assert_ne!(bus.read(0xFF0F) & 0x01, 0); // VBlank interrupt latched

    bus.run(10 * DOTS_PER_LINE);
    assert_eq!(bus.read(0xFF44), 0);
    assert_eq!(bus.ppu.frames(), 1);
}

#[test]
fn frame_flag_raises_once_per_frame() {
    let mut bus = lit_bus();
    bus.run(DOTS_PER_FRAME);
    assert!(bus.ppu.take_frame());
    assert!(!bus.ppu.take_frame());
    bus.run(DOTS_PER_FRAME);
    assert!(bus.ppu.take_frame());
    assert_eq!(bus.ppu.frames(), 2);
}

#[test]
fn ly_write_only_resets_to_zero() {
    let mut bus = lit_bus();
    bus.run(10 * DOTS_PER_LINE);
    assert_eq!(bus.read(0xFF44), 10);
    bus.write(0xFF44, 0x7F); // value ignored, LY resets
    assert_eq!(bus.read(0xFF44), 0);
}

#[test]
fn lyc_coincidence_sets_stat_flag_and_interrupt() {
    let mut bus = lit_bus();
    bus.write(0xFF45, 3);
    bus.write(0xFF41, 0x40); // LYC interrupt enable
    bus.write(0xFF0F, 0x00);

    bus.run(3 * DOTS_PER_LINE);
    assert_ne!(bus.read(0xFF41) & 0x04, 0);
    assert_ne!(bus.read(0xFF0F) & 0x02, 0);

    // The line stays high across the scanline; no second request.
    bus.write(0xFF0F, 0x00);
    bus.run(100);
    assert_eq!(bus.read(0xFF0F) & 0x02, 0);
}

#[test]
fn identity_palette_renders_the_four_shades() {
    // Tile row encoding: first byte is the high bit plane. 0x33/0x55
    // produces the color-index ramp 0,1,2,3,0,1,2,3.
    let mut bus = make_bus();
    bus.write(0x8000, 0x33);
    bus.write(0x8001, 0x55);
    bus.write(0xFF47, 0xE4); // identity palette
    bus.write(0xFF40, 0x91);

    bus.run(DOTS_PER_FRAME);
    let frame = bus.ppu.front();
    assert_eq!(
        &frame[0..8],
        &[SHADES[0], SHADES[1], SHADES[2], SHADES[3], SHADES[0], SHADES[1], SHADES[2], SHADES[3]]
    );
}

#[test]
fn vram_cpu_window_closes_during_pixel_transfer() {
    let mut bus = lit_bus();
    bus.run(80); // into PixelTransfer
    bus.write(0x8000, 0x99); // dropped
    assert_eq!(bus.read(0x8000), 0xFF);
    bus.run(172); // HBlank
    assert_eq!(bus.read(0x8000), 0x00);
}

#[test]
fn lcd_disable_blanks_screen_and_freezes_ly() {
    let mut bus = lit_bus();
    bus.run(50 * DOTS_PER_LINE);
    bus.write(0xFF40, 0x11); // LCD off
    assert_eq!(bus.read(0xFF44), 0);
    bus.run(20 * DOTS_PER_LINE);
    assert_eq!(bus.read(0xFF44), 0);
    assert!(bus.ppu.front().iter().all(|&px| px == SHADES[0]));

    bus.write(0xFF40, 0x91); // back on: OAMSearch of line 0
    assert_eq!(bus.read(0xFF41) & 0x03, 2);
    assert_eq!(bus.read(0xFF44), 0);
}

//! Bus-level timing scenarios: the DIV/TIMA protocol and the OAM DMA
//! window, driven in master clocks against the raw bus.

use dotmatrix::{Bus, Cartridge};

fn make_rom() -> Vec<u8> {
    // Minimal headered 32 KiB image: no MBC, no RAM.
    vec![0u8; 0x8000]
}

fn make_bus() -> Bus {
    Bus::new(Cartridge::new(make_rom()).unwrap(), 48_000)
}

#[test]
fn div_increments_and_resets_on_write() {
    let mut bus = make_bus();
    assert_eq!(bus.read(0xFF04), 0x00);

    bus.run(256);
    assert_eq!(bus.read(0xFF04), 0x01);

    bus.write(0xFF04, 0x5A);
    assert_eq!(bus.read(0xFF04), 0x00);
}

#[test]
fn timer_counter_advances_four_per_machine_cycle() {
    let mut bus = make_bus();
    let before = bus.timer.read(0xFF04);
    bus.run(64 * 4);
    // 64 machine cycles = 256 clocks = one DIV step.
    assert_eq!(bus.timer.read(0xFF04), before + 1);
}

#[test]
fn tima_ticks_at_selected_frequency() {
    let mut bus = make_bus();
    bus.write(0xFF05, 0x00);
    bus.write(0xFF06, 0x00);
    bus.write(0xFF07, 0x05); // enable, 262144 Hz

    bus.run(16);
    assert_eq!(bus.read(0xFF05), 0x01);
    bus.run(16);
    assert_eq!(bus.read(0xFF05), 0x02);
}

#[test]
fn tima_overflow_reloads_tma_and_raises_interrupt_within_window() {
    let mut bus = make_bus();
    bus.write(0xFF06, 0xAB);
    bus.write(0xFF05, 0xFF);
    bus.write(0xFF07, 0x05);

    bus.run(16); // overflow: TIMA wraps to 0, reload pending
    assert_eq!(bus.read(0xFF05), 0x00);
    assert_eq!(bus.read(0xFF0F) & 0x04, 0x00);

    bus.run(16); // the 4-machine-cycle window closes
    assert_eq!(bus.read(0xFF05), 0xAB);
    assert_ne!(bus.read(0xFF0F) & 0x04, 0x00);
}

#[test]
fn tima_write_during_window_cancels_reload() {
    let mut bus = make_bus();
    bus.write(0xFF06, 0xAB);
    bus.write(0xFF05, 0xFF);
    bus.write(0xFF07, 0x05);

    bus.run(16);
    bus.write(0xFF05, 0x33); // inside the reload window
    bus.run(32);
    assert_eq!(bus.read(0xFF0F) & 0x04, 0x00);
    assert_ne!(bus.read(0xFF05), 0xAB);
}

#[test]
fn div_write_falling_edge_clocks_tima() {
    let mut bus = make_bus();
    bus.write(0xFF07, 0x05); // selected counter bit 3
    bus.write(0xFF05, 0x00);

    bus.run(8); // counter = 8: selected bit high
    bus.write(0xFF04, 0x00);
    assert_eq!(bus.read(0xFF05), 0x01);
}

#[test]
fn oam_dma_blacks_out_oam_then_lands_the_copy() {
    let mut bus = make_bus();
    for i in 0..0xA0u16 {
        bus.write(0xC000 + i, (i as u8).wrapping_add(1));
    }

    bus.write(0xFF46, 0xC0);

    // One byte per machine cycle; OAM reads FF for all 160 cycles.
    for step in 0..160u32 {
        assert_eq!(bus.read(0xFE00 + (step as u16 % 0xA0)), 0xFF, "cycle {}", step);
        bus.run(4);
    }

    for i in 0..0xA0u16 {
        assert_eq!(bus.read(0xFE00 + i), (i as u8).wrapping_add(1));
    }
}

#[test]
fn dma_bus_lock_leaves_only_hram_usable() {
    let mut bus = make_bus();
    bus.write(0xC000, 0x42);
    bus.write(0xFF80, 0x24);

    bus.write(0xFF46, 0xC0);
    assert_eq!(bus.read(0xC000), 0xFF);
    assert_eq!(bus.read(0x0000), 0xFF); // ROM hidden too
    assert_eq!(bus.read(0xFF80), 0x24);
    bus.write(0xFF80, 0x25);
    assert_eq!(bus.read(0xFF80), 0x25);

    bus.run(160 * 4);
    assert_eq!(bus.read(0xC000), 0x42);
}

#[test]
fn dma_register_rewrite_restarts_the_transfer() {
    let mut bus = make_bus();
    for i in 0..0xA0u16 {
        bus.write(0xC000 + i, 0x11);
        bus.write(0xD000 + i, 0x22);
    }

    bus.write(0xFF46, 0xC0);
    bus.run(20 * 4);
    bus.write(0xFF46, 0xD0); // restart from the new page
    bus.run(160 * 4);

    for i in 0..0xA0u16 {
        assert_eq!(bus.read(0xFE00 + i), 0x22);
    }
}

#[test]
fn dma_register_reads_back_last_page() {
    let mut bus = make_bus();
    bus.write(0xFF46, 0xC0);
    assert_eq!(bus.read(0xFF46), 0xC0);
    bus.run(160 * 4);
    assert_eq!(bus.read(0xFF46), 0xC0);
}

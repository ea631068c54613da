//! CPU behavior driven through a full machine with small programs placed
//! at the cartridge entry point.

use dotmatrix::{Cpu, GameBoy};

/// A 32 KiB no-MBC image with `program` at the post-boot entry 0x0100.
fn machine_with(program: &[u8]) -> GameBoy {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    GameBoy::new(rom).unwrap()
}

#[test]
fn reset_state_matches_post_boot_values() {
    let gb = machine_with(&[]);
    assert_eq!(gb.cpu.af(), 0x01B0);
    assert_eq!(gb.cpu.bc(), 0x0013);
    assert_eq!(gb.cpu.de(), 0x00D8);
    assert_eq!(gb.cpu.hl(), 0x014D);
    assert_eq!(gb.cpu.sp(), 0xFFFE);
    assert_eq!(gb.cpu.pc(), 0x0100);
    assert!(!gb.cpu.ime());
}

#[test]
fn loads_and_alu_with_documented_cycle_counts() {
    let mut gb = machine_with(&[
        0x3E, 0x42, // LD A, 0x42      (2 machine cycles)
        0x06, 0x13, // LD B, 0x13      (2)
        0x80, // ADD A, B              (1)
        0xC6, 0xAB, // ADD A, 0xAB     (2)
    ]);
    assert_eq!(gb.step(), 2);
    assert_eq!(gb.cpu.af() >> 8, 0x42);
    assert_eq!(gb.step(), 2);
    assert_eq!(gb.step(), 1);
    assert_eq!(gb.cpu.af() >> 8, 0x55);
    // 0x55 + 0xAB = 0x100: zero, carry, and half-carry set.
    assert_eq!(gb.step(), 2);
    assert_eq!(gb.cpu.af(), 0x00B0);
}

#[test]
fn conditional_jump_taken_and_not_taken_timing() {
    let mut gb = machine_with(&[
        0xAF, // XOR A: sets Z
        0x20, 0x10, // JR NZ, +16: not taken (2 cycles)
        0x28, 0x02, // JR Z, +2: taken (3 cycles)
    ]);
    assert_eq!(gb.step(), 1);
    assert_eq!(gb.step(), 2);
    assert_eq!(gb.cpu.pc(), 0x0103);
    assert_eq!(gb.step(), 3);
    assert_eq!(gb.cpu.pc(), 0x0107);
}

#[test]
fn call_and_ret_round_trip_through_the_stack() {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0103].copy_from_slice(&[0xCD, 0x00, 0x02]); // CALL 0x0200
    rom[0x0200] = 0xC9; // RET
    let mut gb = GameBoy::new(rom).unwrap();

    assert_eq!(gb.step(), 6);
    assert_eq!(gb.cpu.pc(), 0x0200);
    assert_eq!(gb.cpu.sp(), 0xFFFC);
    // Return address 0x0103 sits on the stack, little endian.
    assert_eq!(gb.bus.read(0xFFFC), 0x03);
    assert_eq!(gb.bus.read(0xFFFD), 0x01);

    assert_eq!(gb.step(), 4); // RET
    assert_eq!(gb.cpu.pc(), 0x0103);
    assert_eq!(gb.cpu.sp(), 0xFFFE);
}

#[test]
fn interrupt_service_takes_five_cycles_and_clears_the_flag() {
    let mut gb = machine_with(&[
        0xFB, // EI
        0x00, // NOP
        0x00, // NOP
    ]);
    gb.bus.write(0xFFFF, 0x04); // enable Timer
    gb.bus.write(0xFF0F, 0x04); // request Timer

    assert_eq!(gb.step(), 1); // EI: IME still off
    assert_eq!(gb.step(), 1); // NOP: IME becomes effective after this
    let cycles = gb.step(); // service instead of the second NOP
    assert_eq!(cycles, 5);
    assert_eq!(gb.cpu.pc(), 0x0050);
    assert!(!gb.cpu.ime());
    assert_eq!(gb.bus.read(0xFF0F) & 0x04, 0);
    assert_eq!(gb.cpu.sp(), 0xFFFC);
    assert_eq!(gb.bus.read(0xFFFC), 0x02); // pushed return address 0x0102
    assert_eq!(gb.bus.read(0xFFFD), 0x01);
}

#[test]
fn lower_bit_wins_when_multiple_interrupts_pend() {
    let mut gb = machine_with(&[0xFB, 0x00, 0x00]);
    gb.bus.write(0xFFFF, 0x1F);
    gb.bus.write(0xFF0F, 0x14); // Timer (bit 2) + Joypad (bit 4)

    gb.step();
    gb.step();
    gb.step();
    assert_eq!(gb.cpu.pc(), 0x0050); // Timer vector
    assert_eq!(gb.bus.read(0xFF0F) & 0x1F, 0x10); // Joypad still latched
}

#[test]
fn halt_wakes_on_pending_interrupt_without_ime() {
    let mut gb = machine_with(&[
        0x76, // HALT (IME off, nothing pending yet)
        0x3C, // INC A
    ]);
    gb.bus.write(0xFF0F, 0x00); // clear the post-boot VBlank latch
    gb.bus.write(0xFFFF, 0x04);

    gb.step();
    assert!(gb.cpu.halted());
    for _ in 0..5 {
        gb.step();
        assert!(gb.cpu.halted());
    }

    gb.bus.write(0xFF0F, 0x04); // request while IME = 0
    gb.step(); // wake cycle
    assert!(!gb.cpu.halted());
    let a_before = gb.cpu.af() >> 8;
    gb.step(); // INC A executes, no service (IME off)
    assert_eq!(gb.cpu.af() >> 8, a_before + 1);
}

#[test]
fn halt_bug_executes_the_following_byte_twice() {
    let mut gb = machine_with(&[
        0x76, // HALT with IME=0 and an interrupt already pending
        0x3C, // INC A: runs twice thanks to the stuck PC
        0x00,
    ]);
    gb.bus.write(0xFFFF, 0x01); // post-boot IF already has VBlank latched

    let a_start = gb.cpu.af() >> 8;
    gb.step(); // HALT arms the bug, does not halt
    assert!(!gb.cpu.halted());
    gb.step();
    assert_eq!(gb.cpu.pc(), 0x0101); // PC did not advance
    gb.step();
    assert_eq!(gb.cpu.pc(), 0x0102);
    assert_eq!(gb.cpu.af() >> 8, a_start + 2);
}

#[test]
fn illegal_opcode_locks_the_cpu() {
    let mut gb = machine_with(&[0xD3]);
    gb.step();
    assert!(gb.cpu.locked());
    let pc = gb.cpu.pc();
    for _ in 0..10 {
        assert_eq!(gb.step(), 1);
    }
    assert_eq!(gb.cpu.pc(), pc);
}

#[test]
fn stop_parks_until_a_button_press() {
    let mut gb = machine_with(&[
        0x10, 0x00, // STOP
        0x3C, // INC A
    ]);
    gb.step();
    assert!(gb.cpu.stopped());
    for _ in 0..8 {
        gb.step();
        assert!(gb.cpu.stopped());
    }
    gb.press(dotmatrix::Button::Start);
    gb.step(); // wake cycle
    assert!(!gb.cpu.stopped());
}

#[test]
fn disassembler_formats_operands() {
    let gb = machine_with(&[0x3E, 0x42, 0xC3, 0x00, 0x80]);
    let (text, length) = Cpu::disassemble(0x0100, &gb.bus);
    assert_eq!(text, "LD A, d8 $42");
    assert_eq!(length, 2);
    let (text, length) = Cpu::disassemble(0x0102, &gb.bus);
    assert_eq!(text, "JP a16 $8000");
    assert_eq!(length, 3);
}

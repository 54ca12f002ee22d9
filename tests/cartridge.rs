//! Loading iNES images and running them from the CPU bus

use std::io::Write;

use nes_cpu::cartridge::{CHR_ROM_PAGE_SIZE, PRG_ROM_PAGE_SIZE};
use nes_cpu::{Bus, Cartridge, CartridgeError, Cpu, CpuError, MemoryError, Mirroring, NullDevice, Ram};

fn ines_image(prg_pages: u8, chr_pages: u8, program: &[u8]) -> Vec<u8> {
    let mut raw = vec![
        0x4E, 0x45, 0x53, 0x1A, prg_pages, chr_pages, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    let prg_len = prg_pages as usize * PRG_ROM_PAGE_SIZE;
    let mut prg = vec![0xEA; prg_len];
    prg[..program.len()].copy_from_slice(program);
    // reset vector -> $8000
    prg[prg_len - 4] = 0x00;
    prg[prg_len - 3] = 0x80;
    raw.extend(prg);
    raw.extend(vec![0; chr_pages as usize * CHR_ROM_PAGE_SIZE]);
    raw
}

fn nes_bus(cartridge: Cartridge) -> Bus {
    let mut bus = Bus::new();
    bus.attach(0x0000, 0x1FFF, Box::new(Ram::new(0x0800))).unwrap();
    bus.attach(0x2000, 0x2007, Box::new(NullDevice)).unwrap();
    bus.attach(0x4020, 0xFFFF, Box::new(cartridge)).unwrap();
    bus
}

#[test]
fn test_page_lengths() {
    let cart = Cartridge::load_from_bytes(&ines_image(2, 1, &[])).unwrap();
    assert_eq!(cart.prg_rom.len(), 2 * 16384);
    assert_eq!(cart.chr_rom.len(), 8192);
    assert_eq!(cart.mapper, 0);
    assert_eq!(cart.mirroring, Mirroring::Vertical);
}

#[test]
fn test_bad_magic() {
    let mut raw = ines_image(1, 1, &[]);
    raw[0] = b'M';
    let err = Cartridge::load_from_bytes(&raw).err().unwrap();
    assert!(matches!(err, CartridgeError::BadMagic));
    assert_eq!(err.to_string(), "file is not in iNES format");
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("nes-cpu-test-{}.nes", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&ines_image(1, 1, &[0xA9, 0x01])).unwrap();
    }
    let cart = Cartridge::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(cart.prg_rom[0], 0xA9);

    assert!(matches!(
        Cartridge::load_from_file(&path),
        Err(CartridgeError::Io(_))
    ));
}

#[test]
fn test_run_program_from_rom() {
    // LDX #$05; STX $00; DEC $00; BNE -4 (back to DEC); LDA $00; BRK
    let program = [0xA2, 0x05, 0x86, 0x00, 0xC6, 0x00, 0xD0, 0xFC, 0xA5, 0x00, 0x00];
    let cart = Cartridge::load_from_bytes(&ines_image(1, 1, &program)).unwrap();
    let mut cpu = Cpu::new(nes_bus(cart));
    cpu.reset();
    assert_eq!(cpu.program_counter, 0x8000);

    cpu.run().unwrap();
    assert_eq!(cpu.register_a, 0);
    assert!(cpu.status.contains(nes_cpu::StatusFlags::ZERO));
}

#[test]
fn test_single_bank_mirrors_upper_half() {
    let cart = Cartridge::load_from_bytes(&ines_image(1, 0, &[0xA9, 0x42, 0x00])).unwrap();
    let mut cpu = Cpu::new(nes_bus(cart));
    cpu.reset();
    // same code seen through the $C000 mirror
    cpu.program_counter = 0xC000;
    cpu.run().unwrap();
    assert_eq!(cpu.register_a, 0x42);
}

#[test]
fn test_rom_write_is_an_error() {
    // LDA #$01; STA $8000
    let cart = Cartridge::load_from_bytes(&ines_image(2, 0, &[0xA9, 0x01, 0x8D, 0x00, 0x80])).unwrap();
    let mut cpu = Cpu::new(nes_bus(cart));
    cpu.reset();
    assert!(cpu.step().unwrap());

    match cpu.step() {
        Err(CpuError::Memory(MemoryError::ReadOnly { addr })) => assert_eq!(addr, 0x8000),
        other => panic!("expected a read-only error, got {:?}", other),
    }
}

#[test]
fn test_cartridge_cannot_overlap_ram() {
    let cart = Cartridge::load_from_bytes(&ines_image(1, 0, &[])).unwrap();
    let mut bus = Bus::new();
    bus.attach(0x0000, 0xFFFF, Box::new(Ram::new(0x10000))).unwrap();
    assert!(matches!(
        bus.attach(0x4020, 0xFFFF, Box::new(cart)),
        Err(MemoryError::RegionConflict { .. })
    ));
}

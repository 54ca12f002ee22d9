use std::env;

use anyhow::{Context, Result};

use nes_cpu::cpu::trace::trace;
use nes_cpu::{Bus, Cartridge, Cpu, NullDevice, Ram};

const DEFAULT_MAX_STEPS: u64 = 1_000_000;

fn build_bus(cartridge: Cartridge) -> Result<Bus> {
    let mut bus = Bus::new();
    bus.attach(0x0000, 0x1FFF, Box::new(Ram::new(0x0800)))?;
    bus.attach(0x2000, 0x2007, Box::new(NullDevice))?;
    bus.attach(0x8000, 0xFFFF, Box::new(cartridge))?;
    Ok(bus)
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <rom_file> [start_pc_hex] [max_steps]", args[0]);
        std::process::exit(1);
    }

    let rom_path = &args[1];
    log::info!("Loading ROM: {}", rom_path);

    let cartridge = Cartridge::load_from_file(rom_path)
        .with_context(|| format!("failed to load {}", rom_path))?;

    let start_pc = args
        .get(2)
        .map(|pc| u16::from_str_radix(pc.trim_start_matches("0x"), 16))
        .transpose()
        .context("start PC must be a hex address")?;
    let max_steps = args
        .get(3)
        .map(|steps| steps.parse::<u64>())
        .transpose()
        .context("max steps must be a number")?
        .unwrap_or(DEFAULT_MAX_STEPS);

    let mut cpu = Cpu::new(build_bus(cartridge)?);
    cpu.reset();
    if let Some(pc) = start_pc {
        log::info!("Overriding reset vector, PC set to: 0x{:04X}", pc);
        cpu.program_counter = pc;
    }

    let mut steps = 0u64;
    while steps < max_steps {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", trace(&mut cpu)?);
        }
        steps += 1;
        if !cpu.step().with_context(|| format!("CPU halted after {} steps", steps))? {
            log::info!("BRK after {} steps", steps);
            break;
        }
    }

    println!(
        "Stopped at PC 0x{:04X} after {} steps ({} cycles)",
        cpu.program_counter, steps, cpu.cycles
    );
    println!(
        "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        cpu.register_a,
        cpu.register_x,
        cpu.register_y,
        cpu.status.bits(),
        cpu.stack_pointer
    );
    Ok(())
}

pub mod cartridge;
pub mod cpu;
pub mod memory;
pub mod numeric;

pub use cartridge::{Cartridge, CartridgeError, Mirroring};
pub use cpu::{AddressingMode, Cpu, CpuError, StatusFlags};
pub use memory::{Bus, Memory, MemoryError, NullDevice, Ram};

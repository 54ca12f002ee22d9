//! Byte-addressable devices and the CPU bus that stitches them together.
//!
//! Every device sees the absolute 16-bit CPU address; it is up to the device to
//! translate that into an offset into its own storage.

mod bus;
mod ram;

pub use bus::{Bus, PPU_REGISTERS, PPU_REGISTERS_MIRRORS_END, RAM, RAM_MIRRORS_END};
pub use ram::Ram;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory region 0x{start:04X}..=0x{end:04X} conflicts with 0x{existing_start:04X}..=0x{existing_end:04X}")]
    RegionConflict {
        start: u16,
        end: u16,
        existing_start: u16,
        existing_end: u16,
    },
    #[error("write to read-only memory at 0x{addr:04X}")]
    ReadOnly { addr: u16 },
}

pub trait Memory {
    fn read(&mut self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError>;

    /// Little-endian word; the high byte address wraps from 0xFFFF to 0x0000.
    fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn write_u16(&mut self, addr: u16, value: u16) -> Result<(), MemoryError> {
        let lo = (value & 0xFF) as u8;
        let hi = (value >> 8) as u8;
        self.write(addr, lo)?;
        self.write(addr.wrapping_add(1), hi)
    }
}

/// Open-bus placeholder: reads float to zero and writes are dropped.
///
/// Attached over the PPU register window until a real PPU exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDevice;

impl Memory for NullDevice {
    fn read(&mut self, addr: u16) -> u8 {
        log::trace!("Open bus read at 0x{:04X}", addr);
        0
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        log::trace!("Open bus write at 0x{:04X}: 0x{:02X}", addr, value);
        Ok(())
    }
}

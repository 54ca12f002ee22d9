use super::{Memory, MemoryError};

pub const RAM: u16 = 0x0000;
pub const RAM_MIRRORS_END: u16 = 0x1FFF;
pub const PPU_REGISTERS: u16 = 0x2000;
pub const PPU_REGISTERS_MIRRORS_END: u16 = 0x3FFF;

const RAM_MIRROR_MASK: u16 = 0x07FF;
const PPU_MIRROR_MASK: u16 = 0x2007;

/// A device mapped over an inclusive address range.
pub(crate) struct Region {
    pub start: u16,
    pub end: u16,
    device: Box<dyn Memory>,
}

impl Region {
    fn contains(&self, addr: u16) -> bool {
        (self.start..=self.end).contains(&addr)
    }

    fn overlaps(&self, start: u16, end: u16) -> bool {
        start <= self.end && self.start <= end
    }
}

/// The CPU address space.
///
/// $0000-$1FFF is 2KB of RAM mirrored every $0800 bytes and $2000-$3FFF is the
/// eight PPU registers mirrored every 8 bytes. Both windows fold the address
/// before looking up the region that serves it. Everything else is routed to
/// whichever region covers it, and addresses nobody covers float to zero.
#[derive(Default)]
pub struct Bus {
    regions: Vec<Region>,
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            regions: Vec::new(),
        }
    }

    /// Maps `device` over `start..=end`. Regions may not overlap.
    pub fn attach(
        &mut self,
        start: u16,
        end: u16,
        device: Box<dyn Memory>,
    ) -> Result<(), MemoryError> {
        if let Some(existing) = self.regions.iter().find(|r| r.overlaps(start, end)) {
            return Err(MemoryError::RegionConflict {
                start,
                end,
                existing_start: existing.start,
                existing_end: existing.end,
            });
        }

        log::debug!("Attached device at 0x{:04X}..=0x{:04X}", start, end);
        self.regions.push(Region { start, end, device });
        Ok(())
    }

    pub fn regions(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.regions.iter().map(|r| (r.start, r.end))
    }

    fn region_mut(&mut self, addr: u16) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.contains(addr))
    }

    fn read_mapped(&mut self, addr: u16) -> u8 {
        match self.region_mut(addr) {
            Some(region) => region.device.read(addr),
            None => {
                log::debug!("Ignoring memory read at 0x{:04X}", addr);
                0
            }
        }
    }

    fn write_mapped(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        match self.region_mut(addr) {
            Some(region) => region.device.write(addr, value),
            None => {
                log::debug!("Ignoring memory write at 0x{:04X}: 0x{:02X}", addr, value);
                Ok(())
            }
        }
    }
}

impl Memory for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            RAM..=RAM_MIRRORS_END => self.read_mapped(addr & RAM_MIRROR_MASK),
            PPU_REGISTERS..=PPU_REGISTERS_MIRRORS_END => {
                let mirrored = addr & PPU_MIRROR_MASK;
                match self.region_mut(mirrored) {
                    Some(region) => region.device.read(mirrored),
                    None => {
                        log::warn!("PPU register read at 0x{:04X} with no PPU attached", mirrored);
                        0
                    }
                }
            }
            _ => self.read_mapped(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        match addr {
            RAM..=RAM_MIRRORS_END => self.write_mapped(addr & RAM_MIRROR_MASK, value),
            PPU_REGISTERS..=PPU_REGISTERS_MIRRORS_END => {
                let mirrored = addr & PPU_MIRROR_MASK;
                match self.region_mut(mirrored) {
                    Some(region) => region.device.write(mirrored, value),
                    None => {
                        log::warn!("PPU register write at 0x{:04X} with no PPU attached", mirrored);
                        Ok(())
                    }
                }
            }
            _ => self.write_mapped(addr, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{NullDevice, Ram};

    struct ReadOnly(u8);

    impl Memory for ReadOnly {
        fn read(&mut self, _addr: u16) -> u8 {
            self.0
        }

        fn write(&mut self, addr: u16, _value: u8) -> Result<(), MemoryError> {
            Err(MemoryError::ReadOnly { addr })
        }
    }

    #[test]
    fn ram_is_mirrored_every_2k() {
        let mut bus = Bus::new();
        bus.attach(RAM, RAM_MIRRORS_END, Box::new(Ram::new(0x800))).unwrap();

        bus.write(0x0025, 0x99).unwrap();
        assert_eq!(bus.read(0x0825), 0x99);
        assert_eq!(bus.read(0x1025), 0x99);
        assert_eq!(bus.read(0x1825), 0x99);

        bus.write(0x1FFF, 0x11).unwrap();
        assert_eq!(bus.read(0x07FF), 0x11);
    }

    #[test]
    fn ppu_window_is_mirrored_every_8_bytes() {
        let mut bus = Bus::new();
        bus.attach(0x2000, 0x2007, Box::new(Ram::new(0x2008))).unwrap();

        bus.write(0x3FFE, 0x5A).unwrap();
        assert_eq!(bus.read(0x2006), 0x5A);
        assert_eq!(bus.read(0x200E), 0x5A);
    }

    #[test]
    fn ppu_window_without_device_is_a_no_op() {
        let mut bus = Bus::new();
        bus.write(0x2000, 0x80).unwrap();
        assert_eq!(bus.read(0x2002), 0);
    }

    #[test]
    fn unmapped_addresses_read_zero() {
        let mut bus = Bus::new();
        bus.attach(RAM, RAM_MIRRORS_END, Box::new(Ram::new(0x800))).unwrap();

        bus.write(0x4020, 0xFF).unwrap();
        assert_eq!(bus.read(0x4020), 0);
        assert_eq!(bus.read(0xFFFC), 0);
    }

    #[test]
    fn general_regions_receive_absolute_addresses() {
        let mut bus = Bus::new();
        bus.attach(0x8000, 0xFFFF, Box::new(Ram::new(0x10000))).unwrap();

        bus.write_u16(0xFFFC, 0x8000).unwrap();
        assert_eq!(bus.read_u16(0xFFFC), 0x8000);
        assert_eq!(bus.read(0xFFFD), 0x80);
    }

    #[test]
    fn overlapping_regions_are_rejected() {
        let mut bus = Bus::new();
        bus.attach(0x0000, 0xFFFF, Box::new(Ram::new(0x10000))).unwrap();

        let err = bus
            .attach(0x4020, 0xFFFF, Box::new(NullDevice))
            .unwrap_err();
        assert_eq!(
            err,
            MemoryError::RegionConflict {
                start: 0x4020,
                end: 0xFFFF,
                existing_start: 0x0000,
                existing_end: 0xFFFF,
            }
        );
        assert_eq!(bus.regions().count(), 1);
    }

    #[test]
    fn enclosing_region_is_rejected() {
        let mut bus = Bus::new();
        bus.attach(0x6000, 0x7FFF, Box::new(NullDevice)).unwrap();
        assert!(bus.attach(0x4020, 0xFFFF, Box::new(NullDevice)).is_err());
        assert!(bus.attach(0x8000, 0xFFFF, Box::new(NullDevice)).is_ok());
    }

    #[test]
    fn device_write_errors_propagate() {
        let mut bus = Bus::new();
        bus.attach(0x8000, 0xFFFF, Box::new(ReadOnly(0xEA))).unwrap();

        assert_eq!(bus.read(0x9000), 0xEA);
        assert_eq!(
            bus.write(0x9000, 0),
            Err(MemoryError::ReadOnly { addr: 0x9000 })
        );
    }
}

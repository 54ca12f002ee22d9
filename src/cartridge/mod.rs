use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::memory::{Memory, MemoryError};

pub const NES_TAG: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_ROM_PAGE_SIZE: usize = 16384;
pub const CHR_ROM_PAGE_SIZE: usize = 8192;

/// First CPU address served by PRG ROM.
pub const PRG_ROM_START: u16 = 0x8000;

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read ROM file: {0}")]
    Io(#[from] std::io::Error),
    #[error("ROM image is smaller than the 16-byte iNES header")]
    TooSmall,
    #[error("file is not in iNES format")]
    BadMagic,
    #[error("iNES format version {0} is not supported")]
    UnsupportedVersion(u8),
    #[error("ROM image truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// A parsed iNES image, mapped linearly (NROM) over $8000-$FFFF.
pub struct Cartridge {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_trainer: bool,
}

impl Cartridge {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let rom_data = fs::read(path)?;
        Self::load_from_bytes(&rom_data)
    }

    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < NES_TAG.len() || data[0..4] != NES_TAG {
            return Err(CartridgeError::BadMagic);
        }
        if data.len() < HEADER_SIZE {
            return Err(CartridgeError::TooSmall);
        }

        let flags_6 = data[6];
        let flags_7 = data[7];

        let ines_version = (flags_7 >> 2) & 0b11;
        if ines_version != 0 {
            return Err(CartridgeError::UnsupportedVersion(ines_version));
        }

        let mapper = (flags_7 & 0xF0) | (flags_6 >> 4);

        let mirroring = if (flags_6 & 0x08) != 0 {
            Mirroring::FourScreen
        } else if (flags_6 & 0x01) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let has_trainer = (flags_6 & 0x04) != 0;

        let prg_rom_size = data[4] as usize * PRG_ROM_PAGE_SIZE;
        let chr_rom_size = data[5] as usize * CHR_ROM_PAGE_SIZE;

        let prg_rom_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let chr_rom_start = prg_rom_start + prg_rom_size;
        let image_end = chr_rom_start + chr_rom_size;

        if data.len() < image_end {
            return Err(CartridgeError::Truncated {
                expected: image_end,
                actual: data.len(),
            });
        }

        if mapper != 0 {
            log::warn!("Unsupported mapper {}, mapping PRG ROM linearly", mapper);
        }

        log::info!(
            "Loaded cartridge: mapper {}, {} PRG page(s), {} CHR page(s), {:?} mirroring",
            mapper,
            data[4],
            data[5],
            mirroring
        );

        Ok(Cartridge {
            prg_rom: data[prg_rom_start..chr_rom_start].to_vec(),
            chr_rom: data[chr_rom_start..image_end].to_vec(),
            mapper,
            mirroring,
            has_trainer,
        })
    }

    /// Reads PRG ROM at `offset` from $8000.
    pub fn read_prg(&self, offset: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }

        let mut offset = offset as usize;
        if self.prg_rom.len() == PRG_ROM_PAGE_SIZE {
            // 16KB: mirror at 0x8000-0xBFFF and 0xC000-0xFFFF
            offset %= PRG_ROM_PAGE_SIZE;
        }
        self.prg_rom.get(offset).copied().unwrap_or(0)
    }
}

impl Memory for Cartridge {
    fn read(&mut self, addr: u16) -> u8 {
        if addr < PRG_ROM_START {
            log::debug!("Cartridge read below PRG ROM at 0x{:04X}", addr);
            return 0;
        }
        self.read_prg(addr - PRG_ROM_START)
    }

    fn write(&mut self, addr: u16, _value: u8) -> Result<(), MemoryError> {
        log::warn!("Attempting to write to ROM at 0x{:04X}", addr);
        Err(MemoryError::ReadOnly { addr })
    }
}

use super::{Memory, MemoryError};

/// Plain read/write storage indexed by the CPU address it is handed.
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    pub fn new(size: usize) -> Self {
        Ram { data: vec![0; size] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Memory for Ram {
    fn read(&mut self, addr: u16) -> u8 {
        match self.data.get(addr as usize) {
            Some(value) => *value,
            None => {
                log::debug!("RAM read past end at 0x{:04X} (size {})", addr, self.data.len());
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        match self.data.get_mut(addr as usize) {
            Some(cell) => *cell = value,
            None => {
                log::debug!("RAM write past end at 0x{:04X} (size {})", addr, self.data.len());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_written_bytes() {
        let mut ram = Ram::new(0x800);
        ram.write(0x07FF, 0x42).unwrap();
        assert_eq!(ram.read(0x07FF), 0x42);
        assert_eq!(ram.read(0x0000), 0);
        assert_eq!(ram.len(), 0x800);
    }

    #[test]
    fn out_of_range_access_is_absorbed() {
        let mut ram = Ram::new(0x800);
        ram.write(0x0800, 0x42).unwrap();
        assert_eq!(ram.read(0x0800), 0);
    }
}

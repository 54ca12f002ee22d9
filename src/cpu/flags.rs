use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    ///  7 6 5 4 3 2 1 0
    ///  N V B B D I Z C
    ///      2
    ///
    /// Bits 4 and 5 are not real storage: they only exist in copies of P
    /// pushed to the stack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const BREAK2 = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

impl StatusFlags {
    /// Power-on and reset value.
    pub const RESET: StatusFlags = StatusFlags::INTERRUPT_DISABLE.union(StatusFlags::BREAK);

    /// The byte PHP and BRK push: both break bits forced on.
    pub fn pushed(self) -> u8 {
        (self | StatusFlags::BREAK | StatusFlags::BREAK2).bits()
    }

    /// Restores P from a byte pulled by PLP or RTI.
    pub fn pulled(bits: u8) -> StatusFlags {
        let mut flags = StatusFlags::from_bits_retain(bits);
        flags.remove(StatusFlags::BREAK);
        flags.insert(StatusFlags::BREAK2);
        flags
    }

    /// ZERO and NEGATIVE as a load or transfer of `value` leaves them.
    pub fn update_zero_and_negative(&mut self, value: u8) {
        self.set(StatusFlags::ZERO, value == 0);
        self.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits_are_fixed() {
        assert_eq!(StatusFlags::CARRY.bits(), 1 << 0);
        assert_eq!(StatusFlags::ZERO.bits(), 1 << 1);
        assert_eq!(StatusFlags::INTERRUPT_DISABLE.bits(), 1 << 2);
        assert_eq!(StatusFlags::DECIMAL.bits(), 1 << 3);
        assert_eq!(StatusFlags::BREAK.bits(), 1 << 4);
        assert_eq!(StatusFlags::BREAK2.bits(), 1 << 5);
        assert_eq!(StatusFlags::OVERFLOW.bits(), 1 << 6);
        assert_eq!(StatusFlags::NEGATIVE.bits(), 1 << 7);
        assert_eq!(StatusFlags::RESET.bits(), 0x14);
    }

    #[test]
    fn set_unset_toggle_has() {
        let mut flags = StatusFlags::empty();
        flags.insert(StatusFlags::CARRY);
        assert!(flags.contains(StatusFlags::CARRY));

        flags.toggle(StatusFlags::CARRY | StatusFlags::ZERO);
        assert!(!flags.contains(StatusFlags::CARRY));
        assert!(flags.contains(StatusFlags::ZERO));

        flags.remove(StatusFlags::ZERO);
        assert!(flags.is_empty());
    }

    #[test]
    fn copies_do_not_alias() {
        let live = StatusFlags::CARRY;
        let mut snapshot = live;
        snapshot.insert(StatusFlags::NEGATIVE);
        assert_eq!(live, StatusFlags::CARRY);
        assert_eq!(snapshot.bits(), 0x81);
    }

    #[test]
    fn pushed_byte_forces_break_bits() {
        let live = StatusFlags::CARRY;
        assert_eq!(live.pushed(), 0x31);
        assert_eq!(live, StatusFlags::CARRY);
    }

    #[test]
    fn pulled_byte_clears_break_and_sets_break2() {
        assert_eq!(StatusFlags::pulled(0xFF).bits(), 0xEF);
        assert_eq!(StatusFlags::pulled(0x00).bits(), 0x20);
    }

    #[test]
    fn zero_and_negative() {
        let mut flags = StatusFlags::empty();
        flags.update_zero_and_negative(0);
        assert_eq!(flags, StatusFlags::ZERO);
        flags.update_zero_and_negative(0x80);
        assert_eq!(flags, StatusFlags::NEGATIVE);
        flags.update_zero_and_negative(0x01);
        assert!(flags.is_empty());
    }
}

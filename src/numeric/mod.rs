//! Fixed-width integer arithmetic over the 8- and 16-bit ranges the CPU works in.
//!
//! Two disciplines are offered for every width:
//! - `try_*` computes the exact result and fails with [`NumericError::Overflow`]
//!   when it leaves `[LOWER, UPPER]`.
//! - `wrap_*` reduces the exact result back into range (two's-complement wraparound).
//!
//! [`FixedWidth::wrap`] is the "cast" used throughout the emulator: any integer is
//! folded into range, never rejected.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("{ty} overflow: {lhs} {op} {rhs} is out of range")]
    Overflow {
        ty: &'static str,
        op: char,
        lhs: i64,
        rhs: i64,
    },
    #[error("{ty} division by zero")]
    DivisionByZero { ty: &'static str },
}

pub trait FixedWidth: Copy + Into<i64> {
    const LOWER: i64;
    const UPPER: i64;
    const WIDTH: u32;
    const NAME: &'static str;

    /// Folds `value` into `[LOWER, UPPER]` modulo `UPPER - LOWER + 1`.
    fn wrap(value: i64) -> Self;

    fn value(self) -> i64 {
        self.into()
    }

    fn in_range(value: i64) -> bool {
        (Self::LOWER..=Self::UPPER).contains(&value)
    }

    fn try_add(self, rhs: Self) -> Result<Self, NumericError> {
        exact::<Self>('+', self, rhs, self.value() + rhs.value())
    }

    fn try_sub(self, rhs: Self) -> Result<Self, NumericError> {
        exact::<Self>('-', self, rhs, self.value() - rhs.value())
    }

    fn try_mul(self, rhs: Self) -> Result<Self, NumericError> {
        exact::<Self>('*', self, rhs, self.value() * rhs.value())
    }

    /// Division rounding toward negative infinity.
    fn try_div(self, rhs: Self) -> Result<Self, NumericError> {
        let divisor = rhs.value();
        if divisor == 0 {
            return Err(NumericError::DivisionByZero { ty: Self::NAME });
        }
        exact::<Self>('/', self, rhs, floor_div(self.value(), divisor))
    }

    fn wrap_add(self, rhs: Self) -> Self {
        Self::wrap(self.value() + rhs.value())
    }

    fn wrap_sub(self, rhs: Self) -> Self {
        Self::wrap(self.value() - rhs.value())
    }
}

/// Negation for the signed widths.
pub trait Negate: FixedWidth {
    /// Negating `LOWER` yields `LOWER`, as two's-complement hardware does.
    fn negate(self) -> Self {
        let value = self.value();
        if value == Self::LOWER {
            self
        } else {
            Self::wrap(-value)
        }
    }
}

fn exact<T: FixedWidth>(op: char, lhs: T, rhs: T, result: i64) -> Result<T, NumericError> {
    if T::in_range(result) {
        Ok(T::wrap(result))
    } else {
        Err(NumericError::Overflow {
            ty: T::NAME,
            op,
            lhs: lhs.value(),
            rhs: rhs.value(),
        })
    }
}

fn floor_div(lhs: i64, rhs: i64) -> i64 {
    let quotient = lhs / rhs;
    if lhs % rhs != 0 && ((lhs < 0) != (rhs < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

macro_rules! fixed_width {
    ($ty:ty, $lower:expr, $upper:expr, $width:expr) => {
        impl FixedWidth for $ty {
            const LOWER: i64 = $lower;
            const UPPER: i64 = $upper;
            const WIDTH: u32 = $width;
            const NAME: &'static str = stringify!($ty);

            fn wrap(value: i64) -> Self {
                let modulus = Self::UPPER - Self::LOWER + 1;
                ((value - Self::LOWER).rem_euclid(modulus) + Self::LOWER) as $ty
            }
        }
    };
}

fixed_width!(u8, 0, 255, 8);
fixed_width!(u16, 0, 65535, 16);
fixed_width!(i8, -128, 127, 8);
fixed_width!(i16, -32768, 32767, 16);

impl Negate for i8 {}
impl Negate for i16 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_folds_one_past_each_end() {
        assert_eq!(u8::wrap(232), 232);
        assert_eq!(u8::wrap(u8::UPPER + 1), 0);
        assert_eq!(u8::wrap(u8::LOWER - 1), 255);

        assert_eq!(u16::wrap(2320), 2320);
        assert_eq!(u16::wrap(u16::UPPER + 1), 0);
        assert_eq!(u16::wrap(u16::LOWER - 1), 0xFFFF);

        assert_eq!(i8::wrap(-5), -5);
        assert_eq!(i8::wrap(i8::UPPER + 1), -128);
        assert_eq!(i8::wrap(i8::LOWER - 1), 127);

        assert_eq!(i16::wrap(-500), -500);
        assert_eq!(i16::wrap(i16::UPPER + 1), -32768);
        assert_eq!(i16::wrap(i16::LOWER - 1), 32767);
    }

    #[test]
    fn wrap_handles_values_several_ranges_away() {
        assert_eq!(u8::wrap(1000), 232);
        assert_eq!(i8::wrap(-1000), 24);
        assert_eq!(u16::wrap(-1), 0xFFFF);
    }

    #[test]
    fn u8_wrap_add_matches_modular_sum() {
        for v in 0..=255u8 {
            for n in 0..=255u8 {
                let sum = v.wrap_add(n);
                assert_eq!(i64::from(sum), (i64::from(v) + i64::from(n)) % 256);
                assert_eq!(sum.wrap_sub(n), v);
            }
        }
    }

    #[test]
    fn checked_add_reports_overflow() {
        assert_eq!(254u8.try_add(1), Ok(255));
        assert!(matches!(
            255u8.try_add(1),
            Err(NumericError::Overflow { ty: "u8", op: '+', .. })
        ));
        assert!(0u16.try_sub(1).is_err());
        assert_eq!((-32768i16).try_sub(0), Ok(-32768));
        assert!(100i8.try_mul(2).is_err());
        assert_eq!(16u8.try_mul(15), Ok(240));
    }

    #[test]
    fn division_floors_toward_negative_infinity() {
        assert_eq!((-7i8).try_div(2), Ok(-4));
        assert_eq!(7i8.try_div(-2), Ok(-4));
        assert_eq!((-8i8).try_div(2), Ok(-4));
        assert_eq!(7u8.try_div(2), Ok(3));
        assert!((-128i8).try_div(-1).is_err());
        assert_eq!(
            5u16.try_div(0),
            Err(NumericError::DivisionByZero { ty: "u16" })
        );
    }

    #[test]
    fn negating_min_is_identity() {
        assert_eq!((-128i8).negate(), -128);
        assert_eq!((-32768i16).negate(), -32768);
        assert_eq!(5i8.negate(), -5);
        assert_eq!((-127i8).negate(), 127);
    }
}

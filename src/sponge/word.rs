//! Machine words the sponge is generic over.
//!
//! The sealed [`Word`] trait covers exactly the four supported widths. All
//! variable-distance shifting is routed through `u64` so the same code
//! serves every width without shift-overflow corner cases.

use core::fmt::{Debug, LowerHex};
use core::ops::{BitAnd, BitOr, BitXor, Not};

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned machine word usable as a sponge width.
pub trait Word:
    Copy
    + Eq
    + Ord
    + Debug
    + Default
    + LowerHex
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Send
    + Sync
    + private::Sealed
    + 'static
{
    /// Width in bits; one of 8, 16, 32, 64.
    const BITS: usize;
    /// Width in bytes.
    const BYTES: usize;
    /// The zero word.
    const ZERO: Self;
    /// The all-ones word.
    const MAX: Self;
    /// A word with only the least significant bit set.
    const LOW_BIT: Self;
    /// A word with only the most significant bit set.
    const HIGH_BIT: Self;

    /// Truncates a 64-bit value to this width.
    fn from_u64(value: u64) -> Self;

    /// Widens this word to 64 bits.
    fn to_u64(self) -> u64;
}

macro_rules! impl_word {
    ($ty:ty) => {
        impl Word for $ty {
            const BITS: usize = <$ty>::BITS as usize;
            const BYTES: usize = (<$ty>::BITS as usize) / 8;
            const ZERO: Self = 0;
            const MAX: Self = <$ty>::MAX;
            const LOW_BIT: Self = 1;
            const HIGH_BIT: Self = 1 << (<$ty>::BITS - 1);

            fn from_u64(value: u64) -> Self {
                value as $ty
            }

            fn to_u64(self) -> u64 {
                self as u64
            }
        }
    };
}

impl_word!(u8);
impl_word!(u16);
impl_word!(u32);
impl_word!(u64);

//! Integer-width parameterisation of the coder.
//!
//! The range coder is generic over the width of its probability counters.
//! Picking a counter type `P` fixes the working-range type `P::Range`, which
//! must be at least twice as wide so that `range * cumulative` never
//! overflows during the per-symbol narrowing step.

use core::fmt::Debug;

use num_traits::{One, PrimInt, Unsigned};

/// Counter-width configuration for the range coder.
///
/// Implemented for `u8`, `u16` and `u32`. The associated [`Range`] type holds
/// the working range `[low, high]` and the decoder's `code` register; it is
/// exactly twice the counter width, which keeps the product
/// `tmp_range * cumulative` representable (`tmp_range ≤ 2^BITS`,
/// `cumulative ≤ 2^(BITS-2)`).
///
/// The provided methods derive the bit-level constants used by the
/// renormalisation loop from `BITS` alone.
///
/// [`Range`]: Precision::Range
pub trait Precision: PrimInt + Unsigned + Debug + 'static {
    /// Working-range integer, at least twice the counter width.
    type Range: PrimInt + Unsigned + Debug + 'static;

    /// Counter width in bits.
    const BITS: usize;

    /// Widen a counter to the working-range type.
    fn widen(self) -> Self::Range;

    /// Truncate a working-range value back to counter width.
    fn narrow(wide: Self::Range) -> Self;

    /// Convert an alphabet index to a counter.
    ///
    /// Callers validate against [`max_total`](Precision::max_total) first, so
    /// the value always fits.
    fn from_index(index: usize) -> Self;

    /// Lower a working-range value into the bit-stream word type.
    fn to_stream(wide: Self::Range) -> u64;

    /// Lift bits read from the stream into the working-range type.
    fn from_stream(bits: u64) -> Self::Range;

    /// Position of the top bit at counter width.
    #[inline]
    fn hi_bit() -> usize {
        Self::BITS - 1
    }

    /// Position of the second-highest bit at counter width.
    #[inline]
    fn low_bit() -> usize {
        Self::BITS - 2
    }

    /// Top-bit value: `1 << (BITS - 1)`.
    #[inline]
    fn hi_val() -> Self::Range {
        Self::Range::one() << (Self::BITS - 1)
    }

    /// Second-highest-bit value: `1 << (BITS - 2)`.
    #[inline]
    fn low_val() -> Self::Range {
        Self::Range::one() << (Self::BITS - 2)
    }

    /// Mask of the bits below the second-highest bit.
    #[inline]
    fn low_mask() -> Self::Range {
        Self::low_val() - Self::Range::one()
    }

    /// All-ones mask at counter width.
    #[inline]
    fn range_mask() -> Self::Range {
        (Self::Range::one() << Self::BITS) - Self::Range::one()
    }

    /// Model ceiling: the cumulative total that triggers a rescale.
    #[inline]
    fn max_total() -> Self {
        Self::narrow(Self::low_mask())
    }
}

macro_rules! impl_precision {
    ($(($counter:ty, $range:ty)),+ $(,)?) => {
        $(
            impl Precision for $counter {
                type Range = $range;

                const BITS: usize = <$counter>::BITS as usize;

                #[inline]
                fn widen(self) -> $range {
                    self as $range
                }

                #[inline]
                fn narrow(wide: $range) -> $counter {
                    wide as $counter
                }

                #[inline]
                fn from_index(index: usize) -> $counter {
                    index as $counter
                }

                #[inline]
                fn to_stream(wide: $range) -> u64 {
                    wide as u64
                }

                #[inline]
                fn from_stream(bits: u64) -> $range {
                    bits as $range
                }
            }
        )+
    };
}

impl_precision!((u8, u16), (u16, u32), (u32, u64));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants_u16() {
        assert_eq!(<u16 as Precision>::BITS, 16);
        assert_eq!(u16::hi_val(), 0x8000);
        assert_eq!(u16::low_val(), 0x4000);
        assert_eq!(u16::low_mask(), 0x3FFF);
        assert_eq!(u16::range_mask(), 0xFFFF);
        assert_eq!(u16::max_total(), 0x3FFF);
    }

    #[test]
    fn derived_constants_u32() {
        assert_eq!(u32::hi_val(), 0x8000_0000);
        assert_eq!(u32::range_mask(), 0xFFFF_FFFF);
        assert_eq!(u32::max_total(), 0x3FFF_FFFF);
    }

    #[test]
    fn range_is_twice_as_wide() {
        assert_eq!(u16::from_stream(u64::from(u32::MAX)), u32::MAX);
        assert_eq!(u8::widen(0xFFu8), 0x00FFu16);
        assert_eq!(u32::narrow(0x1_2345_6789u64), 0x2345_6789u32);
    }
}

//! Cumulative frequency model.
//!
//! The model stores a cumulative table `C` of length `N + 1` where symbol
//! `s` owns the interval `[C[s], C[s+1])` and `C[N]` is the running total.
//! Adaptive coders start from the uniform distribution and bump counters as
//! symbols go by; static coders build the table from a pre-scanned histogram
//! once and freeze it. When the total reaches the precision's ceiling the
//! counters are halved while keeping every slice at least one unit wide, so
//! encoder and decoder rescale at the exact same symbol.

use crate::error::{Error, Result};
use crate::precision::Precision;

/// Cumulative frequency table over a fixed alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyModel<P: Precision> {
    cum: Vec<P>,
    frozen: bool,
}

impl<P: Precision> FrequencyModel<P> {
    /// Build the uniform adaptive model: `C[i] = i`, every slice width 1.
    ///
    /// # Errors
    /// [`Error::InvalidAlphabet`] if `symbols` is zero or does not fit below
    /// the counter ceiling.
    pub fn uniform(symbols: usize) -> Result<Self> {
        if symbols == 0 || symbols >= ceiling_index::<P>() {
            return Err(Error::InvalidAlphabet(symbols));
        }
        let cum = (0..=symbols).map(P::from_index).collect();
        Ok(Self { cum, frozen: false })
    }

    /// Build a frozen model from a pre-scanned histogram.
    ///
    /// The alphabet is `hist.len()` symbols; the table end doubles as the
    /// terminator index and carries no frequency. The histogram must sum to
    /// `total` (the caller's input length in the static container).
    ///
    /// # Errors
    /// [`Error::InvalidAlphabet`] for an empty histogram,
    /// [`Error::TotalOverflow`] when `total` reaches the counter ceiling, and
    /// [`Error::Corrupt`] when the counts do not sum to `total`.
    pub fn from_histogram(hist: &[P], total: P) -> Result<Self> {
        if hist.is_empty() || hist.len() >= ceiling_index::<P>() {
            return Err(Error::InvalidAlphabet(hist.len()));
        }
        if total >= P::max_total() {
            return Err(Error::TotalOverflow(total.to_u64().unwrap_or(u64::MAX)));
        }

        let mut cum = Vec::with_capacity(hist.len() + 1);
        let mut sum = P::zero();
        cum.push(sum);
        for &freq in hist {
            sum = sum
                .checked_add(&freq)
                .ok_or_else(|| Error::TotalOverflow(u64::MAX))?;
            cum.push(sum);
        }
        if sum != total {
            return Err(Error::Corrupt("histogram does not sum to the stated total"));
        }
        Ok(Self { cum, frozen: true })
    }

    /// Number of symbols in the alphabet.
    #[inline]
    pub fn symbols(&self) -> usize {
        self.cum.len() - 1
    }

    /// Current cumulative total `C[N]`.
    #[inline]
    pub fn total(&self) -> P {
        self.cum[self.cum.len() - 1]
    }

    /// Whether the model ignores [`update`](Self::update) calls.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Cumulative slice of `symbol`: `(C[s], C[s+1], C[N])`.
    ///
    /// # Panics
    /// If `symbol` is outside the alphabet.
    #[inline]
    pub fn slice(&self, symbol: usize) -> (P, P, P) {
        (self.cum[symbol], self.cum[symbol + 1], self.total())
    }

    /// Find the symbol whose slice contains the cumulative target `p`.
    ///
    /// Binary search; agrees with a linear scan on every input because the
    /// table is monotone and the containing slice has nonzero width.
    ///
    /// # Errors
    /// [`Error::Corrupt`] if `p >= C[N]`, which a well-formed stream can
    /// never produce.
    pub fn locate(&self, p: P) -> Result<usize> {
        if p >= self.total() {
            return Err(Error::Corrupt("cumulative target outside the model"));
        }
        let mut lo = 0;
        let mut hi = self.symbols() - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.cum[mid + 1] <= p {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    /// Adaptive increment: widen the slice of `symbol` by one.
    ///
    /// Rescales when the total reaches the ceiling. No-op on a frozen model.
    pub fn update(&mut self, symbol: usize) {
        debug_assert!(symbol < self.symbols());
        if self.frozen {
            return;
        }
        for c in &mut self.cum[symbol + 1..] {
            *c = *c + P::one();
        }
        if self.total() >= P::max_total() {
            self.rescale();
        }
    }

    /// Grow the alphabet to `symbols`, giving each new symbol a unit-width
    /// slice that continues the table (`C[i] = C[i-1] + 1`).
    ///
    /// # Errors
    /// [`Error::InvalidAlphabet`] unless `symbols` exceeds the current
    /// alphabet and fits below the ceiling; [`Error::TotalOverflow`] if the
    /// grown total would reach the ceiling.
    pub fn expand(&mut self, symbols: usize) -> Result<()> {
        let n = self.symbols();
        if symbols <= n || symbols >= ceiling_index::<P>() {
            return Err(Error::InvalidAlphabet(symbols));
        }
        let grown = self.total().to_u64().unwrap_or(u64::MAX) + (symbols - n) as u64;
        if grown >= P::max_total().to_u64().unwrap_or(u64::MAX) {
            return Err(Error::TotalOverflow(grown));
        }

        let mut last = self.total();
        self.cum.reserve(symbols - n);
        for _ in n..symbols {
            last = last + P::one();
            self.cum.push(last);
        }
        Ok(())
    }

    /// Halve all counters, keeping every slice at least one unit wide.
    fn rescale(&mut self) {
        let mut prev = self.cum[0];
        for i in 1..self.cum.len() {
            let mut curr = self.cum[i] >> 1;
            if curr <= prev {
                curr = prev + P::one();
            }
            self.cum[i] = curr;
            prev = curr;
        }
    }
}

#[inline]
fn ceiling_index<P: Precision>() -> usize {
    P::max_total().to_usize().unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotone<P: Precision>(m: &FrequencyModel<P>) {
        for s in 0..m.symbols() {
            let (lo, hi, _) = m.slice(s);
            assert!(lo < hi, "slice {s} collapsed");
        }
    }

    #[test]
    fn uniform_init() {
        let m = FrequencyModel::<u16>::uniform(257).unwrap();
        assert_eq!(m.symbols(), 257);
        assert_eq!(m.total(), 257);
        assert_eq!(m.slice(65), (65, 66, 257));
        assert!(!m.is_frozen());
    }

    #[test]
    fn rejects_degenerate_alphabets() {
        assert!(FrequencyModel::<u16>::uniform(0).is_err());
        assert!(FrequencyModel::<u8>::uniform(63).is_err());
        assert!(FrequencyModel::<u8>::uniform(62).is_ok());
    }

    #[test]
    fn update_widens_one_slice() {
        let mut m = FrequencyModel::<u16>::uniform(4).unwrap();
        m.update(2);
        m.update(2);
        assert_eq!(m.slice(2), (2, 5, 6));
        assert_eq!(m.slice(1), (1, 2, 6));
        assert_eq!(m.slice(3), (5, 6, 6));
    }

    #[test]
    fn locate_agrees_with_slices() {
        let mut m = FrequencyModel::<u16>::uniform(8).unwrap();
        for s in [3, 3, 3, 5, 0, 7, 3] {
            m.update(s);
        }
        for s in 0..m.symbols() {
            let (lo, hi, _) = m.slice(s);
            for p in lo..hi {
                assert_eq!(m.locate(p).unwrap(), s, "p = {p}");
            }
        }
        assert!(m.locate(m.total()).is_err());
    }

    #[test]
    fn locate_out_of_range_is_corrupt() {
        let m = FrequencyModel::<u16>::uniform(10).unwrap();
        assert!(matches!(m.locate(10), Err(Error::Corrupt(_))));
        assert!(m.locate(9).is_ok());
    }

    #[test]
    fn rescale_keeps_slices_positive() {
        // u8 has ceiling 63, so a handful of updates forces several rescales.
        let mut m = FrequencyModel::<u8>::uniform(8).unwrap();
        let ceiling = u8::max_total();
        let mut shrunk = 0;
        let mut prev_total = m.total();
        for i in 0..500 {
            m.update(i % 3);
            assert_monotone(&m);
            assert!(m.total() < ceiling, "total escaped the ceiling");
            if m.total() < prev_total {
                shrunk += 1;
            }
            prev_total = m.total();
        }
        assert!(shrunk >= 2, "expected at least two rescales, saw {shrunk}");
    }

    #[test]
    fn histogram_init() {
        let mut hist = [0u32; 256];
        hist[b'a' as usize] = 5;
        hist[b'b' as usize] = 2;
        hist[b'z' as usize] = 1;
        let m = FrequencyModel::<u32>::from_histogram(&hist, 8).unwrap();
        assert!(m.is_frozen());
        assert_eq!(m.symbols(), 256);
        assert_eq!(m.total(), 8);
        assert_eq!(m.slice(b'a' as usize), (0, 5, 8));
        assert_eq!(m.slice(b'b' as usize), (5, 7, 8));
        assert_eq!(m.locate(7).unwrap(), b'z' as usize);
        // Zero-frequency symbols are never located.
        assert_eq!(m.locate(4).unwrap(), b'a' as usize);
    }

    #[test]
    fn histogram_total_mismatch_is_corrupt() {
        let hist = [1u32, 2, 3];
        assert!(matches!(
            FrequencyModel::<u32>::from_histogram(&hist, 7),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn frozen_model_ignores_updates() {
        let hist = [4u32, 4];
        let mut m = FrequencyModel::<u32>::from_histogram(&hist, 8).unwrap();
        m.update(0);
        assert_eq!(m.slice(0), (0, 4, 8));
    }

    #[test]
    fn expand_continues_with_unit_slices() {
        let mut m = FrequencyModel::<u16>::uniform(4).unwrap();
        m.expand(7).unwrap();
        assert_eq!(m.total(), 7);
        assert_eq!(m.slice(6), (6, 7, 7));

        // After adaptation the continuation stays monotone.
        m.update(1);
        m.update(1);
        m.expand(9).unwrap();
        assert_monotone(&m);
        assert_eq!(m.slice(8), (10, 11, 11));

        assert!(m.expand(9).is_err());
        assert!(m.expand(3).is_err());
    }
}

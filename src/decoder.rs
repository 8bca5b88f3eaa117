//! Range decoder engine.
//!
//! Mirrors the encoder: the same `[low, high]` narrowing driven by a `code`
//! register holding the next counter-width window of the stream. Where the
//! encoder defers underflow bits into a pending run, the decoder patches
//! `code` with an XOR of the second-highest bit and keeps shifting fresh
//! stream bits in, so both sides renormalise in lockstep.

use num_traits::{One, Zero};

use crate::bitio::BitRead;
use crate::error::{Error, Result};
use crate::model::FrequencyModel;
use crate::precision::Precision;

/// Adaptive or static range decoder reading from a bit source.
#[derive(Clone)]
pub struct Decoder<P: Precision, R: BitRead> {
    source: R,
    low: P::Range,
    high: P::Range,
    code: P::Range,
    tmp_range: P::Range,
    model: FrequencyModel<P>,
}

/// Deep snapshot of a decoder, including its model.
///
/// Restoring rewinds the coder registers; bits already consumed from the
/// source are not put back. For speculative decoding clone the whole
/// [`Decoder`] (source included) instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderState<P: Precision> {
    low: P::Range,
    high: P::Range,
    code: P::Range,
    tmp_range: P::Range,
    model: FrequencyModel<P>,
}

impl<P: Precision, R: BitRead> Decoder<P, R> {
    /// Create an adaptive decoder over `symbols` symbols with the uniform
    /// initial model, loading the first counter-width window of the stream.
    ///
    /// # Errors
    /// [`Error::InvalidAlphabet`] for alphabet sizes the model rejects;
    /// [`Error::Io`] if the source cannot supply the initial window.
    pub fn new(symbols: usize, source: R) -> Result<Self> {
        Self::with_model(FrequencyModel::uniform(symbols)?, source)
    }

    /// Create a decoder over a prepared model (frozen for static mode).
    pub fn with_model(model: FrequencyModel<P>, mut source: R) -> Result<Self> {
        let code = P::from_stream(source.read(P::BITS as u32)?);
        Ok(Self {
            source,
            low: P::Range::zero(),
            high: P::range_mask(),
            code,
            tmp_range: P::Range::zero(),
            model,
        })
    }

    /// Decode one symbol and adapt the model.
    ///
    /// # Errors
    /// [`Error::Corrupt`] when the stream is structurally impossible;
    /// [`Error::Io`] when the source fails (including a truncated stream
    /// running out of its end-of-input grace).
    pub fn decode(&mut self) -> Result<usize> {
        let total = self.model.total();
        if total == P::zero() {
            return Err(Error::Corrupt("model has no frequency mass"));
        }
        let total = total.widen();
        let one = P::Range::one();

        self.tmp_range = (self.high - self.low) + one;
        let p = (((self.code - self.low) + one) * total - one) / self.tmp_range;
        if p >= total {
            return Err(Error::Corrupt("cumulative target outside the model"));
        }
        let symbol = self.model.locate(P::narrow(p))?;

        let (lo, hi, _) = self.model.slice(symbol);
        let lo = lo.widen();
        let hi = hi.widen();
        self.high = self.low + (self.tmp_range * hi) / total - one;
        self.low = self.low + (self.tmp_range * lo) / total;

        loop {
            if (self.high & P::hi_val()) == (self.low & P::hi_val()) {
                // shared top bit; just shift below
            } else if (self.low & P::low_val()) != P::Range::zero()
                && (self.high & P::low_val()) == P::Range::zero()
            {
                self.code = self.code ^ P::low_val();
                self.low = self.low & P::low_mask();
                self.high = self.high | P::low_val();
            } else {
                break;
            }
            self.low = (self.low << 1) & P::range_mask();
            self.high = ((self.high << 1) | one) & P::range_mask();
            self.code = ((self.code << 1) | P::from_stream(self.source.read(1)?)) & P::range_mask();
        }

        self.model.update(symbol);
        Ok(symbol)
    }

    /// Grow the alphabet; new symbols get unit-width slices, with the same
    /// continuation rule the encoder uses.
    pub fn expand(&mut self, symbols: usize) -> Result<()> {
        self.model.expand(symbols)
    }

    /// Read-only view of the frequency model.
    pub fn model(&self) -> &FrequencyModel<P> {
        &self.model
    }

    /// Deep-copy the coder state, model included.
    pub fn save_state(&self) -> DecoderState<P> {
        DecoderState {
            low: self.low,
            high: self.high,
            code: self.code,
            tmp_range: self.tmp_range,
            model: self.model.clone(),
        }
    }

    /// Rewind to a snapshot, consuming it. Clone the snapshot first to keep
    /// it for another restore.
    pub fn restore_state(&mut self, state: DecoderState<P>) {
        self.low = state.low;
        self.high = state.high;
        self.code = state.code;
        self.tmp_range = state.tmp_range;
        self.model = state.model;
    }
}

//! Range encoder engine.
//!
//! Keeps the working interval `[low, high]` at counter width inside wider
//! registers, narrows it by the coded symbol's cumulative slice and emits
//! bits carry-lessly: whenever the top bits of `low` and `high` agree the
//! shared bit goes out, followed by the run of deferred underflow bits with
//! the opposite value. Underflow runs are written in 64-bit bursts; the
//! observable stream is identical to bit-at-a-time emission.

use num_traits::{One, Zero};

use crate::bitio::BitWrite;
use crate::error::{Error, Result};
use crate::model::FrequencyModel;
use crate::precision::Precision;

/// Adaptive or static range encoder writing to a bit sink.
pub struct Encoder<P: Precision, W: BitWrite> {
    sink: W,
    low: P::Range,
    high: P::Range,
    tmp_range: P::Range,
    underflow: u64,
    flushed: bool,
    model: FrequencyModel<P>,
}

/// Deep snapshot of an encoder, including its model.
///
/// Restoring rewinds the coder to the saved moment; bits already written to
/// the sink are not unwritten, which is why cost estimation uses the
/// simulate path instead of real encodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderState<P: Precision> {
    low: P::Range,
    high: P::Range,
    tmp_range: P::Range,
    underflow: u64,
    flushed: bool,
    model: FrequencyModel<P>,
}

impl<P: Precision, W: BitWrite> Encoder<P, W> {
    /// Create an adaptive encoder over `symbols` symbols with the uniform
    /// initial model.
    ///
    /// # Errors
    /// [`Error::InvalidAlphabet`] for alphabet sizes the model rejects.
    pub fn new(symbols: usize, sink: W) -> Result<Self> {
        Ok(Self::with_model(FrequencyModel::uniform(symbols)?, sink))
    }

    /// Create an encoder over a prepared model (frozen for static mode).
    pub fn with_model(model: FrequencyModel<P>, sink: W) -> Self {
        Self {
            sink,
            low: P::Range::zero(),
            high: P::range_mask(),
            tmp_range: P::Range::zero(),
            underflow: 0,
            flushed: false,
            model,
        }
    }

    /// Encode one symbol and adapt the model.
    ///
    /// # Errors
    /// [`Error::InvalidSymbol`] if the symbol is outside the alphabet or has
    /// an empty slice; [`Error::Io`] on sink failure.
    pub fn encode(&mut self, symbol: usize) -> Result<()> {
        self.range_code(symbol, false)?;
        self.model.update(symbol);
        Ok(())
    }

    /// Simulate encoding one symbol: range and model mutate exactly as in
    /// [`encode`](Self::encode), nothing is written, and the number of bits
    /// a real encode would have emitted is returned.
    ///
    /// Bracket calls with [`save_state`](Self::save_state) /
    /// [`restore_state`](Self::restore_state) to undo the side effects.
    pub fn estimate_cost(&mut self, symbol: usize) -> Result<u64> {
        let cost = self.range_code(symbol, true)?;
        self.model.update(symbol);
        Ok(cost)
    }

    /// Simulate a whole buffer, stopping early once the running cost exceeds
    /// `limit` bits. Pass `u64::MAX` for no limit.
    pub fn estimate_cost_block<I>(&mut self, symbols: I, limit: u64) -> Result<u64>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut cost = 0;
        for symbol in symbols {
            cost += self.estimate_cost(symbol)?;
            if cost > limit {
                break;
            }
        }
        Ok(cost)
    }

    /// Terminate the stream: emit the disambiguating second-highest bit of
    /// `low` followed by the pending underflow run.
    ///
    /// Idempotent; later calls write nothing.
    pub fn flush(&mut self) -> Result<()> {
        if self.flushed {
            return Ok(());
        }
        self.underflow += 1;
        let bit = P::to_stream((self.low >> P::low_bit()) & P::Range::one());
        self.emit_bit_run(bit)?;
        self.flushed = true;
        Ok(())
    }

    /// Re-run the terminating emission even on an already-flushed stream.
    ///
    /// [`flush`](Self::flush) is idempotent; forcing emits another
    /// disambiguation bit plus underflow run, which only a custom container
    /// format should ever need.
    pub fn flush_force(&mut self) -> Result<()> {
        self.flushed = false;
        self.flush()
    }

    /// Grow the alphabet; new symbols get unit-width slices.
    pub fn expand(&mut self, symbols: usize) -> Result<()> {
        self.model.expand(symbols)
    }

    /// Read-only view of the frequency model.
    pub fn model(&self) -> &FrequencyModel<P> {
        &self.model
    }

    /// Read-only view of the bit sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Deep-copy the coder state, model included.
    pub fn save_state(&self) -> EncoderState<P> {
        EncoderState {
            low: self.low,
            high: self.high,
            tmp_range: self.tmp_range,
            underflow: self.underflow,
            flushed: self.flushed,
            model: self.model.clone(),
        }
    }

    /// Rewind to a snapshot, consuming it. Clone the snapshot first to keep
    /// it for another restore.
    pub fn restore_state(&mut self, state: EncoderState<P>) {
        self.low = state.low;
        self.high = state.high;
        self.tmp_range = state.tmp_range;
        self.underflow = state.underflow;
        self.flushed = state.flushed;
        self.model = state.model;
    }

    /// Narrow the range by `symbol`'s slice and renormalise. Returns the
    /// number of bits emitted (or that would be, under `simulate`).
    fn range_code(&mut self, symbol: usize, simulate: bool) -> Result<u64> {
        if symbol >= self.model.symbols() {
            return Err(Error::InvalidSymbol(symbol));
        }
        let (lo, hi, total) = self.model.slice(symbol);
        if lo == hi {
            return Err(Error::InvalidSymbol(symbol));
        }
        let lo = lo.widen();
        let hi = hi.widen();
        let total = total.widen();
        let one = P::Range::one();

        self.tmp_range = (self.high - self.low) + one;
        debug_assert!(self.tmp_range >= total);
        self.high = self.low + (self.tmp_range * hi) / total - one;
        self.low = self.low + (self.tmp_range * lo) / total;

        let mut cost = 0u64;
        loop {
            if (self.high & P::hi_val()) == (self.low & P::hi_val()) {
                cost += self.underflow + 1;
                if simulate {
                    self.underflow = 0;
                } else {
                    let bit = P::to_stream(self.high >> P::hi_bit());
                    self.emit_bit_run(bit)?;
                }
            } else if (self.low & P::low_val()) != P::Range::zero()
                && (self.high & P::low_val()) == P::Range::zero()
            {
                self.underflow += 1;
                self.low = self.low & P::low_mask();
                self.high = self.high | P::low_val();
            } else {
                break;
            }
            self.low = (self.low << 1) & P::range_mask();
            self.high = ((self.high << 1) | one) & P::range_mask();
        }
        Ok(cost)
    }

    /// Write `bit`, then the pending underflow run of its complement.
    fn emit_bit_run(&mut self, bit: u64) -> Result<()> {
        self.sink.write(bit, 1)?;
        let fill = if bit == 0 { u64::MAX } else { 0 };
        while self.underflow >= 64 {
            self.sink.write(fill, 64)?;
            self.underflow -= 64;
        }
        if self.underflow > 0 {
            self.sink.write(fill, self.underflow as u32)?;
        }
        self.underflow = 0;
        Ok(())
    }
}

impl<P: Precision, W: BitWrite> Drop for Encoder<P, W> {
    /// Flushes the stream if the caller did not; errors are discarded. Call
    /// [`flush`](Self::flush) explicitly to observe failures.
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitWriter;

    fn fresh() -> Encoder<u32, BitWriter<Vec<u8>>> {
        Encoder::new(257, BitWriter::new(Vec::new())).unwrap()
    }

    #[test]
    fn rejects_out_of_alphabet_symbols() {
        let mut enc = fresh();
        assert!(matches!(enc.encode(257), Err(Error::InvalidSymbol(257))));
        assert!(enc.encode(256).is_ok());
    }

    #[test]
    fn rejects_zero_frequency_symbols() {
        let hist = [3u32, 0, 5];
        let model = FrequencyModel::from_histogram(&hist, 8).unwrap();
        let mut enc = Encoder::with_model(model, BitWriter::new(Vec::new()));
        assert!(matches!(enc.encode(1), Err(Error::InvalidSymbol(1))));
        assert!(enc.encode(2).is_ok());
    }

    #[test]
    fn flush_is_idempotent() {
        let mut enc = fresh();
        for &b in b"flush me" {
            enc.encode(b as usize).unwrap();
        }
        enc.flush().unwrap();
        let bits = enc.sink().bits_written();
        enc.flush().unwrap();
        enc.flush().unwrap();
        assert_eq!(enc.sink().bits_written(), bits);
    }

    #[test]
    fn estimate_matches_real_encode() {
        let mut enc = fresh();
        for &b in b"warm the model with some text" {
            enc.encode(b as usize).unwrap();
        }

        let snap = enc.save_state();
        let estimated = enc
            .estimate_cost_block(b"hello world".iter().map(|&b| b as usize), u64::MAX)
            .unwrap();
        enc.restore_state(snap);

        let before = enc.sink().bits_written();
        for &b in b"hello world" {
            enc.encode(b as usize).unwrap();
        }
        assert_eq!(enc.sink().bits_written() - before, estimated);
    }

    #[test]
    fn snapshot_restore_is_neutral() {
        let mut enc = fresh();
        for &b in b"prefix" {
            enc.encode(b as usize).unwrap();
        }

        let snap = enc.save_state();
        let bits = enc.sink().bits_written();
        enc.estimate_cost_block(b"speculative".iter().map(|&b| b as usize), u64::MAX)
            .unwrap();
        enc.restore_state(snap.clone());

        assert_eq!(enc.save_state(), snap);
        assert_eq!(enc.sink().bits_written(), bits);
    }

    #[test]
    fn cost_limit_stops_early() {
        let mut enc = fresh();
        let cost = enc
            .estimate_cost_block((0..200).map(|i| i % 256), 20)
            .unwrap();
        assert!(cost > 20);
        assert!(cost < 60, "limit should cut the block short, got {cost}");
    }

    #[test]
    fn run_of_one_symbol_beats_uniform_coding() {
        // Four repeats of one byte cost less than 4 * log2(257) ~ 32 bits
        // because each repeat widens the symbol's slice.
        let mut enc = fresh();
        let cost = enc.estimate_cost_block([0x41usize; 4], u64::MAX).unwrap();
        assert!(cost < 32, "adaptive gain missing: {cost} bits");
    }
}

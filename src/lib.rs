//! # Range Coding
//!
//! *Carry-less arithmetic coding with adaptive and static models.*
//!
//! ## Intuition First
//!
//! Imagine narrowing in on a number between 0 and 1 by repeatedly slicing
//! the current interval. Each symbol owns a slice proportional to its
//! probability; coding a symbol means keeping only its slice. Frequent
//! symbols shave off little of the interval (few bits), rare symbols shave
//! off a lot (many bits).
//!
//! Range coding is that idea in fixed-width integer arithmetic: the interval
//! `[low, high]` lives in machine words, and whenever its leading bits are
//! settled they are shipped out and the interval is rescaled.
//!
//! ## The Problem
//!
//! Pure arithmetic coding needs arbitrary-precision fractions, and naive
//! fixed-width versions must revisit already-emitted bytes when a carry
//! propagates. Both are non-starters for streaming.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon        Entropy as the fundamental limit
//! 1976  Rissanen/Pasco Arithmetic coding: optimal rate
//! 1979  Martin         The range coder formulation
//! 1987  Witten et al.  The classic incremental implementation
//! 1999  Subbotin       Carry-less range coder
//! ```
//!
//! Dmitry Subbotin's observation was that a carry can be avoided entirely:
//! when `low` rises into the top half while `high` sinks into the bottom
//! half, the undecidable middle bit is *deferred* — a counter records how
//! many opposite bits to emit once the top bit finally settles.
//!
//! ## Mathematical Formulation
//!
//! With cumulative frequencies $C$ over $N$ symbols and $T = C[N]$, coding
//! symbol $s$ maps the working range $r = high - low + 1$ to
//!
//! ```text
//! high = low + (r * C[s+1]) / T - 1
//! low  = low + (r * C[s])   / T
//! ```
//!
//! which spends $\approx \log_2(T / (C[s{+}1] - C[s]))$ bits on $s$. The
//! decoder inverts the map by locating the slice containing
//! `p = ((code - low + 1) * T - 1) / r`.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(\log N)$ per symbol for the slice lookup plus two integer
//!   divisions; the adaptive counter update is $O(N)$ in this flat-table
//!   model.
//! - **Space**: $O(N)$ counters.
//!
//! ## Failure Modes
//!
//! 1. **Total overflow**: the cumulative total must stay below a quarter of
//!    the counter range or the narrowing division can no longer separate
//!    slices; the model rescales automatically at the ceiling.
//! 2. **Desynchronisation**: encoder and decoder must apply identical model
//!    updates in identical order; any divergence garbles the rest of the
//!    stream.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - an [`Encoder`]/[`Decoder`] pair generic over the counter width
//!   ([`Precision`]) and the bit sink/source ([`BitWrite`]/[`BitRead`]);
//! - an adaptive [`FrequencyModel`] with histogram (static) initialisation;
//! - deep state snapshots for speculative coding and bit-exact cost
//!   estimation;
//! - whole-buffer adaptive and static container codecs in [`codec`].
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic Coding
//!   for Data Compression." Communications of the ACM 30(6).
//! - Subbotin, D. (1999). "Carryless Rangecoder." comp.compression.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod model;
pub mod precision;

pub use bitio::{BitRead, BitReader, BitWrite, BitWriter};
pub use decoder::{Decoder, DecoderState};
pub use encoder::{Encoder, EncoderState};
pub use error::{Error, Result};
pub use model::FrequencyModel;
pub use precision::Precision;

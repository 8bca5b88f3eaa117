//! Whole-buffer container codecs.
//!
//! Two framings share the coder core:
//!
//! - **Adaptive**: no header. The alphabet is every byte value plus a
//!   reserved terminator; encoder and decoder start uniform and adapt in
//!   lockstep, so the stream carries no model.
//! - **Static**: the encoder pre-scans the input, writes a fixed container
//!   header (32-bit input length, then 256 32-bit byte counts, all
//!   MSB-first), and codes with the frozen histogram model. The decoder
//!   rebuilds the model from the header and decodes exactly the stated
//!   number of symbols.

use crate::bitio::{BitRead, BitReader, BitWrite, BitWriter};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::model::FrequencyModel;

/// Reserved terminator index for adaptive streams.
pub const EOF_SYMBOL: usize = 256;

/// Adaptive alphabet size: all byte values plus the terminator.
pub const ADAPTIVE_SYMBOLS: usize = 257;

/// Compress a buffer adaptively, terminator included.
pub fn adaptive_compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new(Vec::new());
    let mut coder = Encoder::<u32, _>::new(ADAPTIVE_SYMBOLS, &mut writer)?;
    for &byte in input {
        coder.encode(byte as usize)?;
    }
    coder.encode(EOF_SYMBOL)?;
    coder.flush()?;
    drop(coder);
    Ok(writer.close()?)
}

/// Decompress an adaptive stream up to its terminator.
pub fn adaptive_decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decoder::<u32, _>::new(ADAPTIVE_SYMBOLS, BitReader::new(data))?;
    let mut out = Vec::new();
    loop {
        match decoder.decode()? {
            EOF_SYMBOL => break,
            symbol => out.push(symbol as u8),
        }
    }
    Ok(out)
}

/// Compress a buffer with a pre-scanned histogram and the static container
/// header.
pub fn static_compress(input: &[u8]) -> Result<Vec<u8>> {
    let total =
        u32::try_from(input.len()).map_err(|_| Error::TotalOverflow(input.len() as u64))?;
    let mut hist = [0u32; 256];
    for &byte in input {
        hist[byte as usize] += 1;
    }
    let model = FrequencyModel::from_histogram(&hist, total)?;

    let mut writer = BitWriter::new(Vec::new());
    writer.write(u64::from(total), 32)?;
    for &count in &hist {
        writer.write(u64::from(count), 32)?;
    }

    let mut coder = Encoder::with_model(model, &mut writer);
    for &byte in input {
        coder.encode(byte as usize)?;
    }
    coder.flush()?;
    drop(coder);
    Ok(writer.close()?)
}

/// Decompress a static container produced by [`static_compress`].
pub fn static_decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let total = reader.read(32)? as u32;
    let mut hist = [0u32; 256];
    for count in hist.iter_mut() {
        *count = reader.read(32)? as u32;
    }
    let model = FrequencyModel::from_histogram(&hist, total)?;

    let mut decoder = Decoder::<u32, _>::with_model(model, &mut reader)?;
    let mut out = Vec::with_capacity(total as usize);
    for _ in 0..total {
        out.push(decoder.decode()? as u8);
    }
    Ok(out)
}

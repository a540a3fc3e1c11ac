//! Base64-style byte transcoder
//!
//! Carries arbitrary bytes as printable text inside session documents.
//!
//! ## Format
//!
//! - Alphabet: `A-Z`, `a-z`, `0-9`, `+`, `/` (64 symbols, index order)
//! - Every 3 input bytes become 4 symbols, most significant 6 bits first
//! - A final group with 2 real bytes ends in `=`, with 1 real byte in `==`
//!
//! [`decode`] is strict and rejects anything outside that grammar.
//! [`decode_lenient`] reproduces the device tooling's lookup, where unknown
//! symbols count as index 0, for strings that were stored corrupt.

use crate::{Result, ShotMarkerError};
use serde::{Deserialize, Serialize};

/// Symbol table, indexed by 6-bit value
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding symbol
pub const PAD: u8 = b'=';

const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// How [`decode_with`] treats symbols outside the alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Reject malformed input with [`ShotMarkerError::MalformedInput`]
    #[default]
    Strict,
    /// Treat unknown or missing symbols as index 0 and never fail
    Lenient,
}

/// Encode bytes to text. Output length is `4 * ceil(len / 3)`.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for chunk in bytes.chunks(3) {
        let a = chunk[0] as u32;
        let b = chunk.get(1).copied().unwrap_or(0) as u32;
        let c = chunk.get(2).copied().unwrap_or(0) as u32;
        let bitmap = (a << 16) | (b << 8) | c;

        out.push(symbol(bitmap >> 18));
        out.push(symbol(bitmap >> 12));
        out.push(if chunk.len() > 1 { symbol(bitmap >> 6) } else { PAD as char });
        out.push(if chunk.len() > 2 { symbol(bitmap) } else { PAD as char });
    }

    out
}

/// Decode text produced by [`encode`].
///
/// The input length must be a multiple of 4, and `=` may only appear as the
/// last one or two symbols of the final block.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let input = text.as_bytes();
    if input.len() % 4 != 0 {
        return Err(ShotMarkerError::malformed_input(
            input.len(),
            format!("length {} is not a multiple of 4", input.len()),
        ));
    }

    let mut out = Vec::with_capacity(input.len() / 4 * 3);
    let last_block = input.len() / 4;

    for (block_index, block) in input.chunks_exact(4).enumerate() {
        let base = block_index * 4;
        let is_last = block_index + 1 == last_block;

        let a = lookup(block[0], base)?;
        let b = lookup(block[1], base + 1)?;

        let (c, c_pad) = lookup_or_pad(block[2], base + 2, is_last)?;
        let (d, d_pad) = lookup_or_pad(block[3], base + 3, is_last)?;
        if c_pad && !d_pad {
            return Err(ShotMarkerError::malformed_input(
                base + 3,
                "padding must run to the end of the block",
            ));
        }

        let bitmap = (a << 18) | (b << 12) | (c << 6) | d;
        out.push((bitmap >> 16) as u8);
        if !c_pad {
            out.push((bitmap >> 8) as u8);
        }
        if !d_pad {
            out.push(bitmap as u8);
        }
    }

    Ok(out)
}

/// Decode with the legacy permissive lookup.
///
/// Unknown symbols and symbols missing from a short final block count as
/// index 0. A `=` in the third or fourth position of a block still suppresses
/// the matching output byte.
pub fn decode_lenient(text: &str) -> Vec<u8> {
    let input = text.as_bytes();
    let mut out = Vec::with_capacity(input.len().div_ceil(4) * 3);

    for block in input.chunks(4) {
        let index = |i: usize| -> u32 {
            match block.get(i) {
                Some(&symbol) if DECODE_TABLE[symbol as usize] != INVALID => {
                    DECODE_TABLE[symbol as usize] as u32
                }
                _ => 0,
            }
        };
        let bitmap = (index(0) << 18) | (index(1) << 12) | (index(2) << 6) | index(3);

        out.push((bitmap >> 16) as u8);
        if block.get(2) != Some(&PAD) {
            out.push((bitmap >> 8) as u8);
        }
        if block.get(3) != Some(&PAD) {
            out.push(bitmap as u8);
        }
    }

    out
}

/// Decode text with the given strictness.
pub fn decode_with(text: &str, mode: DecodeMode) -> Result<Vec<u8>> {
    match mode {
        DecodeMode::Strict => decode(text),
        DecodeMode::Lenient => Ok(decode_lenient(text)),
    }
}

fn symbol(bits: u32) -> char {
    ALPHABET[(bits & 63) as usize] as char
}

fn lookup(symbol: u8, position: usize) -> Result<u32> {
    match DECODE_TABLE[symbol as usize] {
        INVALID => Err(invalid_symbol(symbol, position)),
        value => Ok(value as u32),
    }
}

fn lookup_or_pad(symbol: u8, position: usize, is_last: bool) -> Result<(u32, bool)> {
    if symbol == PAD {
        if is_last {
            return Ok((0, true));
        }
        return Err(ShotMarkerError::malformed_input(position, "padding before the final block"));
    }
    Ok((lookup(symbol, position)?, false))
}

fn invalid_symbol(symbol: u8, position: usize) -> ShotMarkerError {
    let reason = if symbol.is_ascii_graphic() {
        format!("'{}' is not in the alphabet", symbol as char)
    } else {
        format!("byte {:#04x} is not in the alphabet", symbol)
    };
    ShotMarkerError::malformed_input(position, reason)
}

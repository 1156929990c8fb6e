//! Frame codec: the wire format shared by encoder and decoder.
//!
//! A frame is laid out as
//!
//! ```text
//! [32 bits] start pattern (alternating 10…, framing landmark only)
//! [7 bytes] header: version(1) ‖ ecc level(1) ‖ payload len(u16 BE)
//!           ‖ redundancy len(u16 BE) ‖ checksum(1)
//! [N bytes] codeword: payload zero-padded to the level's capacity
//!           ‖ RS parity bytes
//! [.. bits] zero padding to the fixed 1344-bit capacity
//! ```
//!
//! The header checksum is the sum of the preceding six bytes mod 256; it is
//! the gate that disqualifies wrong decode hypotheses, so a mismatch is a
//! value-level reject rather than an error. Bytes flatten MSB-first.

use crate::ecc::{self, EccLevel};
use crate::error::EncodeError;
use crate::layout;

/// Wire format version written into every header.
pub const VERSION: u8 = 1;

/// Header length in bytes.
pub const HEADER_BYTES: usize = 7;

/// Largest payload, in bytes, that fits at `level` after the start pattern,
/// header, and parity are accounted for.
pub const fn max_payload_bytes(level: EccLevel) -> usize {
    layout::data_capacity_bits() / 8 - level.parity_bytes()
}

/// Why a bitstream failed to parse as a frame.
///
/// Every variant is an expected, non-fatal outcome during hypothesis
/// search: it disqualifies one candidate bitstream and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameReject {
    /// Recomputed header checksum disagrees with the stored byte.
    HeaderChecksumMismatch,
    /// The bitstream is shorter than the region the header promises.
    InsufficientBits,
    /// Payload/redundancy lengths are out of range for the declared level.
    PayloadLengthInvalid,
    /// The codeword failed Reed-Solomon validation (or the blank filter).
    RedundancyValidationFailed,
}

impl FrameReject {
    /// Stable snake_case code for logs and JSON output.
    pub const fn code(self) -> &'static str {
        match self {
            Self::HeaderChecksumMismatch => "header_checksum_mismatch",
            Self::InsufficientBits => "insufficient_bits",
            Self::PayloadLengthInvalid => "payload_length_invalid",
            Self::RedundancyValidationFailed => "redundancy_validation_failed",
        }
    }
}

impl std::fmt::Display for FrameReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A successfully validated frame.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Decoded {
    /// Recovered text. Invalid byte sequences are replaced, never fatal.
    pub text: String,
    /// Redundancy level declared in the header.
    pub level: EccLevel,
    /// Number of symbol errors the redundancy layer corrected.
    pub corrected_symbols: usize,
}

/// Convert bytes to bits, MSB first within each byte.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for pos in (0..8).rev() {
            bits.push((byte >> pos) & 1);
        }
    }
    bits
}

/// Convert MSB-first bits back to bytes, zero-padding a trailing partial
/// byte.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

/// The fixed alternating start pattern (`10` repeated).
fn start_pattern() -> Vec<u8> {
    (0..layout::START_PATTERN_BITS)
        .map(|i| (1 - i % 2) as u8)
        .collect()
}

fn header_checksum(header: &[u8]) -> u8 {
    header[..6]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Frame `text` at `level` into the fixed-capacity bitstream.
///
/// Deterministic: identical inputs always produce an identical bitstream.
pub fn encode_frame(text: &[u8], level: EccLevel) -> Result<Vec<u8>, EncodeError> {
    let capacity = max_payload_bytes(level);
    if text.len() > capacity {
        return Err(EncodeError::PayloadTooLarge {
            len: text.len(),
            max: capacity,
            level,
        });
    }

    let mut data = vec![0u8; capacity];
    data[..text.len()].copy_from_slice(text);
    let parity = ecc::append_redundancy(&data, level);

    let payload_len = text.len() as u16;
    let parity_len = level.parity_bytes() as u16;
    let mut header = [0u8; HEADER_BYTES];
    header[0] = VERSION;
    header[1] = level.as_byte();
    header[2..4].copy_from_slice(&payload_len.to_be_bytes());
    header[4..6].copy_from_slice(&parity_len.to_be_bytes());
    header[6] = header_checksum(&header);

    let mut bits = start_pattern();
    bits.extend(bytes_to_bits(&header));
    bits.extend(bytes_to_bits(&data));
    bits.extend(bytes_to_bits(&parity));
    debug_assert!(bits.len() <= layout::total_capacity_bits());
    bits.resize(layout::total_capacity_bits(), 0);
    Ok(bits)
}

/// Parse a candidate bitstream back into text.
///
/// The start pattern is skipped without inspection; the header checksum and
/// the redundancy layer are the actual validity gates.
pub fn decode_frame(bits: &[u8]) -> Result<Decoded, FrameReject> {
    let header_start = layout::START_PATTERN_BITS;
    let header_end = header_start + layout::HEADER_BITS;
    if bits.len() < header_end {
        return Err(FrameReject::InsufficientBits);
    }

    let header = bits_to_bytes(&bits[header_start..header_end]);
    if header_checksum(&header) != header[6] {
        return Err(FrameReject::HeaderChecksumMismatch);
    }

    let level = EccLevel::from_byte(header[1]).ok_or(FrameReject::PayloadLengthInvalid)?;
    let payload_len = u16::from_be_bytes([header[2], header[3]]) as usize;
    let parity_len = u16::from_be_bytes([header[4], header[5]]) as usize;

    let capacity = max_payload_bytes(level);
    if payload_len == 0 || payload_len > capacity {
        return Err(FrameReject::PayloadLengthInvalid);
    }
    if parity_len != level.parity_bytes() {
        return Err(FrameReject::PayloadLengthInvalid);
    }

    let codeword_bytes = capacity + parity_len;
    let codeword_end = header_end + codeword_bytes * 8;
    if bits.len() < codeword_end {
        return Err(FrameReject::InsufficientBits);
    }
    let codeword = bits_to_bytes(&bits[header_end..codeword_end]);

    let (data, corrected_symbols) = ecc::validate_redundancy(&codeword, payload_len, level)
        .map_err(|_| FrameReject::RedundancyValidationFailed)?;

    let text = String::from_utf8_lossy(&data[..payload_len]).into_owned();
    Ok(Decoded {
        text,
        level,
        corrected_symbols,
    })
}

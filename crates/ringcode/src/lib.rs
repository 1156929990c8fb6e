//! ringcode — fixed-capacity circular bit patterns for short text.
//!
//! Text is framed, protected with Reed-Solomon redundancy, and laid out as
//! concentric annular sectors; decoding recovers the text from a raster
//! capture of such a pattern. The pipeline stages are:
//!
//! 1. **Frame** – header construction, Reed-Solomon parity, bit layout.
//! 2. **Render** – bits to annular wedges (raster canvas or SVG markup).
//! 3. **Preprocess** – grayscale variants of a captured image.
//! 4. **Sample** – per-sector intensity extraction along each ring.
//! 5. **Search** – multi-hypothesis threshold/polarity/rotation sweep with
//!    frame validation as the accept gate.
//!
//! # Public API
//! [`encode`], [`render_raster`], [`render_svg`] and [`decode`] cover the
//! common paths; the stage modules stay public for tooling and benches.
//!
//! The core performs no file or network I/O: callers hand in a decoded
//! RGBA8 buffer and take back a string or a rendered image.

pub mod ecc;
pub mod error;
pub mod frame;
pub mod layout;
pub mod preprocess;
pub mod render;
pub mod sampler;
pub mod search;
pub mod style;
pub mod threshold;

pub use ecc::EccLevel;
pub use error::{DecodeError, EncodeError};
pub use frame::{max_payload_bytes, FrameReject};
pub use layout::LayoutSummary;
pub use render::{render_raster, render_svg};
pub use search::{DecodeConfig, Hypothesis, Recovered, SearchOutcome};
pub use style::{Style, STYLES};

/// Smallest square capture dimension the sampler can resolve.
pub const MIN_DECODE_SIZE: u32 = 96;

/// Encode `text` into the fixed 1344-bit pattern at `level`.
///
/// Bits come back ring-by-ring in layout order, ready for rendering.
pub fn encode(text: &[u8], level: EccLevel) -> Result<Vec<u8>, EncodeError> {
    frame::encode_frame(text, level)
}

/// Decode a ring code from an RGBA8 pixel buffer.
///
/// The buffer is expected to contain the pattern roughly centered; the
/// hypothesis sweep handles polarity, exposure, and coarse rotation. The
/// optional `progress` callback fires once per preprocessing variant and
/// never affects control flow.
///
/// Errors mean the search never started; a started search always ends in
/// [`SearchOutcome::Decoded`] or [`SearchOutcome::Exhausted`].
pub fn decode(
    rgba: &[u8],
    width: u32,
    height: u32,
    config: &DecodeConfig,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<SearchOutcome, DecodeError> {
    if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
        return Err(DecodeError::EmptyImage);
    }
    let canvas_size = width.min(height);
    if canvas_size < MIN_DECODE_SIZE {
        return Err(DecodeError::ImageTooSmall { width, height });
    }

    let gray = preprocess::luminance(rgba, width, height);
    let surfaces = preprocess::variants(&gray);
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    Ok(search::run(&surfaces, center, canvas_size, config, progress))
}

//! Hypothesis search: the decode-side sweep over preprocessing, polarity,
//! bias, threshold mode, and anchor rotation.
//!
//! The cross-product is enumerated explicitly so the order is testable and
//! independent of the execution strategy. Execution fans out across
//! preprocessing variants on a rayon pool; a shared atomic index records
//! the best (lowest) validating hypothesis so workers cancel early, and
//! the reduction over indices makes the parallel result identical to a
//! sequential first-wins scan.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use image::GrayImage;
use rayon::prelude::*;

use crate::ecc::EccLevel;
use crate::frame;
use crate::layout;
use crate::preprocess::Variant;
use crate::sampler;
use crate::threshold::{threshold_bits, ThresholdMode};

/// Threshold bias factors, in search order.
pub const BIAS_SWEEP: [f32; 5] = [1.00, 0.95, 1.05, 0.90, 1.10];

/// Step of the anchor-shift sweep, in ring-0 sectors.
pub const SHIFT_STEP: usize = 4;

/// One candidate parameter combination tried during decode.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hypothesis {
    /// Preprocessing surface to sample.
    pub variant: Variant,
    /// Flip all thresholded bits (polarity ambiguity).
    pub invert: bool,
    /// Threshold bias factor.
    pub bias: f32,
    /// Threshold strategy.
    pub mode: ThresholdMode,
    /// Anchor rotation in ring-0 sectors.
    pub shift: usize,
}

impl Hypothesis {
    /// The anchor rotation as an angle. One physical rotation applies to
    /// all rings, so per-ring sector shifts scale with sector count.
    pub fn angular_shift(&self) -> f64 {
        self.shift as f64 * layout::sector_angle(0)
    }
}

/// Search configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Cap on evaluated hypotheses; `None` sweeps the full cross-product.
    pub max_hypotheses: Option<usize>,
    /// Fan the sweep out across a rayon pool. The winner is identical
    /// either way; sequential mode exists for profiling and tests.
    pub parallel: bool,
}

impl DecodeConfig {
    pub const DEFAULT_PARALLEL: bool = true;
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_hypotheses: None,
            parallel: Self::DEFAULT_PARALLEL,
        }
    }
}

/// A validated decode with the hypothesis that produced it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Recovered {
    /// Recovered text.
    pub text: String,
    /// Redundancy level declared by the frame header.
    pub level: EccLevel,
    /// Symbol errors corrected by the redundancy layer.
    pub corrected_symbols: usize,
    /// The winning hypothesis.
    pub hypothesis: Hypothesis,
}

/// Terminal outcome of a decode search that actually ran.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A hypothesis validated; first in enumeration order wins.
    Decoded(Recovered),
    /// The sweep (or its configured cap) finished with no valid frame.
    Exhausted { hypotheses_tried: usize },
}

impl SearchOutcome {
    /// The recovered text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Decoded(r) => Some(&r.text),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Hypotheses per preprocessing variant.
pub fn hypotheses_per_variant() -> usize {
    2 * BIAS_SWEEP.len() * ThresholdMode::ALL.len() * shift_sweep().len()
}

fn shift_sweep() -> Vec<usize> {
    (0..layout::RING_SECTORS[0]).step_by(SHIFT_STEP).collect()
}

/// Enumerate the sub-space of one preprocessing variant, in search order:
/// inversion, then bias, then threshold mode, then anchor shift.
pub fn enumerate_for_variant(variant: Variant) -> Vec<Hypothesis> {
    let shifts = shift_sweep();
    let mut out = Vec::with_capacity(hypotheses_per_variant());
    for invert in [false, true] {
        for bias in BIAS_SWEEP {
            for mode in ThresholdMode::ALL {
                for &shift in &shifts {
                    out.push(Hypothesis {
                        variant,
                        invert,
                        bias,
                        mode,
                        shift,
                    });
                }
            }
        }
    }
    out
}

/// Enumerate the full cross-product over `variants`, in search order.
pub fn enumerate_all(variants: &[Variant]) -> Vec<Hypothesis> {
    variants
        .iter()
        .flat_map(|&v| enumerate_for_variant(v))
        .collect()
}

/// Threshold cached ring intensities under `hyp` and try to parse a frame.
fn evaluate(rings: &[Vec<f32>], hyp: &Hypothesis) -> Result<frame::Decoded, frame::FrameReject> {
    let mut bits = Vec::with_capacity(layout::total_capacity_bits());
    for ring in rings {
        bits.extend(threshold_bits(ring, hyp.mode, hyp.bias, hyp.invert));
    }
    frame::decode_frame(&bits)
}

/// Run the search over preprocessed variant surfaces.
///
/// `surfaces[i]` must correspond to `Variant::ALL[i]`. The optional
/// `progress` callback fires once per variant index as its scan begins;
/// it is observational only and never affects control flow.
pub fn run(
    surfaces: &[GrayImage],
    center: (f64, f64),
    canvas_size: u32,
    config: &DecodeConfig,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> SearchOutcome {
    let n_variants = surfaces.len().min(Variant::ALL.len());
    let per_variant = hypotheses_per_variant();
    let total = per_variant * n_variants;
    let cap = config.max_hypotheses.unwrap_or(total);

    tracing::info!(
        "searching {} hypotheses across {} variants (cap {})",
        total,
        n_variants,
        cap
    );

    let best = AtomicUsize::new(usize::MAX);
    let tried = AtomicUsize::new(0);
    let found: Mutex<Vec<(usize, Recovered)>> = Mutex::new(Vec::new());

    let scan_variant = |vi: usize| {
        if let Some(cb) = progress {
            cb(vi, n_variants);
        }

        let surface = &surfaces[vi];
        let base = vi * per_variant;
        let mut sample_cache: HashMap<usize, Vec<Vec<f32>>> = HashMap::new();

        for (j, hyp) in enumerate_for_variant(Variant::ALL[vi]).into_iter().enumerate() {
            let index = base + j;
            // A validated hypothesis with a lower index dominates the rest
            // of this variant's sub-space.
            if best.load(Ordering::Relaxed) < index {
                break;
            }
            if tried.fetch_add(1, Ordering::Relaxed) >= cap {
                break;
            }

            let rings = sample_cache.entry(hyp.shift).or_insert_with(|| {
                sampler::sample_all_rings(surface, center, canvas_size, hyp.angular_shift())
            });

            if let Ok(decoded) = evaluate(rings, &hyp) {
                tracing::debug!(
                    "hypothesis {} validated ({} corrected symbols)",
                    index,
                    decoded.corrected_symbols
                );
                best.fetch_min(index, Ordering::Relaxed);
                found.lock().unwrap().push((
                    index,
                    Recovered {
                        text: decoded.text,
                        level: decoded.level,
                        corrected_symbols: decoded.corrected_symbols,
                        hypothesis: hyp,
                    },
                ));
                break;
            }
        }
    };

    if config.parallel {
        (0..n_variants).into_par_iter().for_each(scan_variant);
    } else {
        for vi in 0..n_variants {
            scan_variant(vi);
            if !found.lock().unwrap().is_empty() {
                break;
            }
        }
    }

    let mut hits = found.into_inner().unwrap();
    hits.sort_by_key(|(index, _)| *index);
    match hits.into_iter().next() {
        Some((index, recovered)) => {
            tracing::info!("decoded at hypothesis {} of {}", index, total);
            SearchOutcome::Decoded(recovered)
        }
        None => {
            let hypotheses_tried = tried.load(Ordering::Relaxed).min(cap).min(total);
            tracing::info!("search exhausted after {} hypotheses", hypotheses_tried);
            SearchOutcome::Exhausted { hypotheses_tried }
        }
    }
}

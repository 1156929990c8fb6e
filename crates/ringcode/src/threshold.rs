//! Binarization of sector intensities.
//!
//! Two strategies turn per-sector intensities into bits; both scale their
//! threshold by a bias factor supplied by the hypothesis search. Polarity:
//! intensity strictly below the threshold reads as a 1 bit (foreground is
//! darker than background), and an inversion flag flips the result for
//! captures with ambiguous polarity.

/// Threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Midpoint of the 30th and 70th percentile intensities.
    Percentile,
    /// Otsu's maximum between-class variance split over a 256-bin
    /// histogram.
    HistogramSplit,
}

impl ThresholdMode {
    /// Both modes in search order.
    pub const ALL: [ThresholdMode; 2] = [Self::Percentile, Self::HistogramSplit];
}

impl std::fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Percentile => "percentile",
            Self::HistogramSplit => "histogram_split",
        };
        f.write_str(name)
    }
}

/// Compute the threshold for `intensities` under `mode`, scaled by `bias`.
pub fn compute_threshold(intensities: &[f32], mode: ThresholdMode, bias: f32) -> f32 {
    let base = match mode {
        ThresholdMode::Percentile => percentile_midpoint(intensities),
        ThresholdMode::HistogramSplit => otsu_split(intensities),
    };
    base * bias
}

/// Threshold intensities into bits: below threshold ⇒ 1, then apply the
/// inversion flag.
pub fn threshold_bits(
    intensities: &[f32],
    mode: ThresholdMode,
    bias: f32,
    invert: bool,
) -> Vec<u8> {
    let threshold = compute_threshold(intensities, mode, bias);
    intensities
        .iter()
        .map(|&v| {
            let bit = u8::from(v < threshold);
            if invert {
                1 - bit
            } else {
                bit
            }
        })
        .collect()
}

/// Midpoint of the 30th and 70th percentiles.
fn percentile_midpoint(intensities: &[f32]) -> f32 {
    if intensities.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f32> = intensities.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pick = |p: f32| {
        let idx = ((sorted.len() - 1) as f32 * p).round() as usize;
        sorted[idx]
    };
    (pick(0.3) + pick(0.7)) / 2.0
}

/// Otsu's method over an 8-bit histogram of the intensities.
fn otsu_split(intensities: &[f32]) -> f32 {
    if intensities.is_empty() {
        return 0.0;
    }

    let mut hist = [0u32; 256];
    for &v in intensities {
        let bin = v.clamp(0.0, 255.0) as usize;
        hist[bin] += 1;
    }

    let total = intensities.len() as f64;
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_t = 0usize;
    let mut best_var = -1.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * count as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let var = weight_bg * weight_fg * diff * diff;
        if var > best_var {
            best_var = var;
            best_t = t;
        }
    }

    // The split index separates bg ≤ t < fg; threshold sits just above it.
    best_t as f32 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_midpoint_of_bimodal_values() {
        // 10 dark, 10 bright: p30 = 20, p70 = 200, midpoint 110.
        let mut vals = vec![20.0f32; 10];
        vals.extend(vec![200.0f32; 10]);
        let t = compute_threshold(&vals, ThresholdMode::Percentile, 1.0);
        approx::assert_abs_diff_eq!(t, 110.0, epsilon = 1e-4);
    }

    #[test]
    fn otsu_separates_bimodal_values() {
        let mut vals = vec![30.0f32; 12];
        vals.extend(vec![220.0f32; 12]);
        let t = compute_threshold(&vals, ThresholdMode::HistogramSplit, 1.0);
        assert!(t > 30.0 && t < 220.0, "got {t}");
    }

    #[test]
    fn bias_scales_the_threshold() {
        let vals = vec![20.0f32, 40.0, 60.0, 200.0, 220.0, 240.0];
        for mode in ThresholdMode::ALL {
            let base = compute_threshold(&vals, mode, 1.0);
            let biased = compute_threshold(&vals, mode, 1.1);
            approx::assert_abs_diff_eq!(biased, base * 1.1, epsilon = 1e-4);
        }
    }

    #[test]
    fn dark_reads_as_one() {
        let mut vals = vec![15.0f32; 4];
        vals.extend(vec![240.0f32; 4]);
        for mode in ThresholdMode::ALL {
            let bits = threshold_bits(&vals, mode, 1.0, false);
            assert_eq!(&bits[..4], &[1, 1, 1, 1], "{mode}");
            assert_eq!(&bits[4..], &[0, 0, 0, 0], "{mode}");
        }
    }

    #[test]
    fn inversion_flips_every_bit() {
        let mut vals = vec![15.0f32; 4];
        vals.extend(vec![240.0f32; 4]);
        for mode in ThresholdMode::ALL {
            let plain = threshold_bits(&vals, mode, 1.0, false);
            let flipped = threshold_bits(&vals, mode, 1.0, true);
            for (a, b) in plain.iter().zip(&flipped) {
                assert_eq!(a + b, 1);
            }
        }
    }

    #[test]
    fn empty_input_yields_no_bits() {
        for mode in ThresholdMode::ALL {
            assert!(threshold_bits(&[], mode, 1.0, false).is_empty());
        }
    }
}

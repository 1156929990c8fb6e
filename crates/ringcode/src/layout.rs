//! Ring/sector geometry shared by encoder and decoder.
//!
//! This is the single source of truth for bit capacity and radial geometry.
//! Both directions derive sector positions from the same constants, so a
//! pattern rendered at any canvas size samples back at the same mid-radii.

/// Sector count per ring, innermost first.
///
/// Counts grow with radius so outer sectors keep a similar arc length to
/// inner ones. Every count is a multiple of 8; ring 0 is a multiple of the
/// anchor-shift sweep step used by the decoder.
pub const RING_SECTORS: [usize; 6] = [168, 192, 216, 240, 256, 272];

/// Number of concentric data rings.
pub const RING_COUNT: usize = RING_SECTORS.len();

/// Length of the alternating start pattern in bits.
///
/// The pattern is a framing landmark only; its content is not checked on
/// decode (the header checksum is the actual gate).
pub const START_PATTERN_BITS: usize = 32;

/// Header length in bits (7 bytes: version, ecc level, payload length,
/// redundancy length, checksum).
pub const HEADER_BITS: usize = 56;

/// Quiet-zone margin on each side, as a fraction of canvas size.
pub const QUIET_ZONE_FRAC: f64 = 0.05;

/// Inner edge of the ring band as a fraction of the outer radius.
pub const INNER_RADIUS_FRAC: f64 = 0.30;

/// Fraction of a sector's angular span covered by a painted wedge.
/// The remaining `(1 - ARC_FILL_FRAC) / 2` on each side keeps neighboring
/// sectors separated after blur.
pub const ARC_FILL_FRAC: f64 = 0.78;

/// Radial thickness of a painted wedge as a fraction of the ring band.
pub const BAND_FILL_FRAC: f64 = 0.72;

/// Total bit capacity of the pattern (sum of sector counts).
pub const fn total_capacity_bits() -> usize {
    let mut sum = 0;
    let mut i = 0;
    while i < RING_SECTORS.len() {
        sum += RING_SECTORS[i];
        i += 1;
    }
    sum
}

/// Capacity available to header-framed data: total minus the start pattern
/// and header.
pub const fn data_capacity_bits() -> usize {
    total_capacity_bits() - START_PATTERN_BITS - HEADER_BITS
}

/// Outer radius of the ring band in pixels for a given square canvas size.
pub fn outer_radius(canvas_size: u32) -> f64 {
    let size = canvas_size as f64;
    size / 2.0 - size * QUIET_ZONE_FRAC
}

/// Radial width of one ring band in pixels.
pub fn band_width(canvas_size: u32) -> f64 {
    let r_out = outer_radius(canvas_size);
    r_out * (1.0 - INNER_RADIUS_FRAC) / RING_COUNT as f64
}

/// Mid-line radius of ring `ring` (0 = innermost) in pixels.
///
/// Identical formula on the encode and decode paths; the decoder samples
/// exactly where the encoder paints.
pub fn mid_radius(ring: usize, canvas_size: u32) -> f64 {
    debug_assert!(ring < RING_COUNT);
    let r_out = outer_radius(canvas_size);
    let r_in = r_out * INNER_RADIUS_FRAC;
    let band = (r_out - r_in) / RING_COUNT as f64;
    r_in + (ring as f64 + 0.5) * band
}

/// Angular span of one sector of ring `ring`, in radians.
pub fn sector_angle(ring: usize) -> f64 {
    std::f64::consts::TAU / RING_SECTORS[ring] as f64
}

/// Capacity and geometry summary, serializable for tooling output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LayoutSummary {
    pub ring_sectors: [usize; RING_COUNT],
    pub total_capacity_bits: usize,
    pub data_capacity_bits: usize,
    pub start_pattern_bits: usize,
    pub header_bits: usize,
}

impl LayoutSummary {
    pub fn new() -> Self {
        Self {
            ring_sectors: RING_SECTORS,
            total_capacity_bits: total_capacity_bits(),
            data_capacity_bits: data_capacity_bits(),
            start_pattern_bits: START_PATTERN_BITS,
            header_bits: HEADER_BITS,
        }
    }
}

impl Default for LayoutSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_fixed() {
        assert_eq!(total_capacity_bits(), 1344);
        assert_eq!(data_capacity_bits(), 1256);
    }

    #[test]
    fn rings_are_monotonic() {
        for w in RING_SECTORS.windows(2) {
            assert!(w[0] < w[1], "sector counts must grow outward");
        }
    }

    #[test]
    fn mid_radii_are_ordered_and_inside_canvas() {
        let size = 512;
        let mut prev = 0.0;
        for ring in 0..RING_COUNT {
            let r = mid_radius(ring, size);
            assert!(r > prev, "ring {ring} mid-radius must grow outward");
            assert!(r < size as f64 / 2.0);
            prev = r;
        }
    }

    #[test]
    fn mid_radius_scales_linearly_with_canvas() {
        for ring in 0..RING_COUNT {
            let r1 = mid_radius(ring, 256);
            let r2 = mid_radius(ring, 512);
            approx::assert_abs_diff_eq!(r2 / r1, 2.0, epsilon = 1e-9);
        }
    }
}

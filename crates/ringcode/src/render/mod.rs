//! Bit-pattern rendering: raster canvas and scalable vector output.
//!
//! Bits are consumed ring-by-ring in layout order; within a ring, bit `s`
//! maps to the `s`-th angular sector. A set bit paints a filled annular
//! wedge centered in its sector; a clear bit paints nothing. Both renderers
//! derive wedge geometry from [`crate::layout`], so their output is
//! geometrically equivalent.

mod raster;
mod svg;

pub use raster::render_raster;
pub use svg::render_svg;

use crate::layout;

/// First bit index of each ring in the flattened bitstream.
pub(crate) fn ring_bit_offsets() -> [usize; layout::RING_COUNT] {
    let mut offsets = [0usize; layout::RING_COUNT];
    let mut acc = 0;
    for (ring, slot) in offsets.iter_mut().enumerate() {
        *slot = acc;
        acc += layout::RING_SECTORS[ring];
    }
    offsets
}

/// Angular span `[start, end)` of the painted wedge for `sector` of `ring`,
/// in radians. The wedge is centered in the sector with an inset of
/// `(1 - ARC_FILL_FRAC) / 2` sector widths on each side.
pub(crate) fn wedge_angles(ring: usize, sector: usize) -> (f64, f64) {
    let step = layout::sector_angle(ring);
    let inset = (1.0 - layout::ARC_FILL_FRAC) / 2.0;
    let start = (sector as f64 + inset) * step;
    let end = (sector as f64 + 1.0 - inset) * step;
    (start, end)
}

/// Radial extent `[inner, outer]` of a painted wedge of `ring`, in pixels.
pub(crate) fn wedge_radii(ring: usize, canvas_size: u32) -> (f64, f64) {
    let mid = layout::mid_radius(ring, canvas_size);
    let half = layout::band_width(canvas_size) * layout::BAND_FILL_FRAC / 2.0;
    (mid - half, mid + half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_offsets_partition_the_capacity() {
        let offsets = ring_bit_offsets();
        assert_eq!(offsets[0], 0);
        for ring in 1..layout::RING_COUNT {
            assert_eq!(
                offsets[ring],
                offsets[ring - 1] + layout::RING_SECTORS[ring - 1]
            );
        }
        let last = layout::RING_COUNT - 1;
        assert_eq!(
            offsets[last] + layout::RING_SECTORS[last],
            layout::total_capacity_bits()
        );
    }

    #[test]
    fn wedges_stay_inside_their_sector() {
        for ring in 0..layout::RING_COUNT {
            let step = layout::sector_angle(ring);
            let (start, end) = wedge_angles(ring, 3);
            assert!(start > 3.0 * step);
            assert!(end < 4.0 * step);
            approx::assert_abs_diff_eq!(
                end - start,
                step * layout::ARC_FILL_FRAC,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn wedge_radii_stay_inside_the_band() {
        let size = 600;
        for ring in 0..layout::RING_COUNT {
            let (inner, outer) = wedge_radii(ring, size);
            let mid = layout::mid_radius(ring, size);
            let band = layout::band_width(size);
            assert!(inner > mid - band / 2.0);
            assert!(outer < mid + band / 2.0);
        }
    }
}

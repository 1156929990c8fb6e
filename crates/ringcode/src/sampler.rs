//! Per-sector intensity sampling along a ring's mid-radius.

use image::GrayImage;

use crate::layout;

/// Fraction of a sector's angular span that is sampled. Edge pixels are
/// discarded to avoid bleed from neighboring sectors.
pub const ANGLE_KEEP_FRAC: f64 = 0.6;

/// Angular sub-samples taken per sector.
pub const ANGULAR_SUBSAMPLES: usize = 8;

/// Radial half-window around the mid-radius, in pixels. Each angular
/// sub-sample averages `2 * RADIUS_TAP + 1` radial taps.
pub const RADIUS_TAP: i32 = 2;

/// Intensity assigned to a sector with no in-bounds taps
/// (background-like, so it reads as a 0 bit).
pub const EMPTY_SECTOR_INTENSITY: f32 = 255.0;

/// Sample mean intensities for every sector of one ring.
///
/// `angular_shift` rotates the sampling anchor (radians); the same physical
/// rotation applies to every ring, which scales the per-ring sector shift
/// proportionally to its sector count. Out-of-bounds taps are skipped.
/// Output has one scalar per sector; lower = more likely foreground.
pub fn sample_ring(
    gray: &GrayImage,
    center: (f64, f64),
    radius: f64,
    sector_count: usize,
    angular_shift: f64,
) -> Vec<f32> {
    let (w, h) = gray.dimensions();
    let step = std::f64::consts::TAU / sector_count as f64;
    let inset = (1.0 - ANGLE_KEEP_FRAC) / 2.0;

    let mut intensities = Vec::with_capacity(sector_count);
    for sector in 0..sector_count {
        let mut sum = 0.0f32;
        let mut count = 0u32;

        for j in 0..ANGULAR_SUBSAMPLES {
            let t = inset + ANGLE_KEEP_FRAC * (j as f64 + 0.5) / ANGULAR_SUBSAMPLES as f64;
            let theta = (sector as f64 + t) * step + angular_shift;
            let (cos_t, sin_t) = (theta.cos(), theta.sin());

            for dr in -RADIUS_TAP..=RADIUS_TAP {
                let r = radius + dr as f64;
                let x = center.0 + r * cos_t;
                let y = center.1 + r * sin_t;
                if x < 0.0 || y < 0.0 {
                    continue;
                }
                let (xi, yi) = (x as u32, y as u32);
                if xi >= w || yi >= h {
                    continue;
                }
                sum += gray.get_pixel(xi, yi).0[0] as f32;
                count += 1;
            }
        }

        intensities.push(if count > 0 {
            sum / count as f32
        } else {
            EMPTY_SECTOR_INTENSITY
        });
    }
    intensities
}

/// Sample every ring of the layout at a common anchor rotation.
///
/// Returns per-ring intensity vectors in layout order (innermost first).
pub fn sample_all_rings(
    gray: &GrayImage,
    center: (f64, f64),
    canvas_size: u32,
    angular_shift: f64,
) -> Vec<Vec<f32>> {
    (0..layout::RING_COUNT)
        .map(|ring| {
            sample_ring(
                gray,
                center,
                layout::mid_radius(ring, canvas_size),
                layout::RING_SECTORS[ring],
                angular_shift,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn uniform_image_samples_uniformly() {
        let gray = GrayImage::from_pixel(200, 200, Luma([77]));
        let vals = sample_ring(&gray, (100.0, 100.0), 60.0, 24, 0.0);
        assert_eq!(vals.len(), 24);
        for v in vals {
            approx::assert_abs_diff_eq!(v, 77.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn dark_wedge_lowers_its_sector_only() {
        let mut gray = GrayImage::from_pixel(200, 200, Luma([230]));
        // Darken a wedge covering sector 0 of a 16-sector ring at r=60.
        for y in 0..200u32 {
            for x in 0..200u32 {
                let dx = x as f64 + 0.5 - 100.0;
                let dy = y as f64 + 0.5 - 100.0;
                let r = (dx * dx + dy * dy).sqrt();
                let mut theta = dy.atan2(dx);
                if theta < 0.0 {
                    theta += std::f64::consts::TAU;
                }
                let step = std::f64::consts::TAU / 16.0;
                if (55.0..=65.0).contains(&r) && theta < step {
                    gray.put_pixel(x, y, Luma([20]));
                }
            }
        }

        let vals = sample_ring(&gray, (100.0, 100.0), 60.0, 16, 0.0);
        assert!(vals[0] < 40.0, "darkened sector should read dark");
        for (s, &v) in vals.iter().enumerate().skip(1) {
            assert!(v > 200.0, "sector {s} should stay bright, got {v}");
        }
    }

    #[test]
    fn out_of_bounds_ring_defaults_to_background() {
        let gray = GrayImage::from_pixel(40, 40, Luma([0]));
        // Radius far outside the image: every tap is out of bounds.
        let vals = sample_ring(&gray, (20.0, 20.0), 500.0, 8, 0.0);
        assert!(vals
            .iter()
            .all(|&v| (v - EMPTY_SECTOR_INTENSITY).abs() < f32::EPSILON));
    }

    #[test]
    fn angular_shift_moves_the_anchor() {
        let mut gray = GrayImage::from_pixel(200, 200, Luma([230]));
        for y in 0..200u32 {
            for x in 0..200u32 {
                let dx = x as f64 + 0.5 - 100.0;
                let dy = y as f64 + 0.5 - 100.0;
                let r = (dx * dx + dy * dy).sqrt();
                let mut theta = dy.atan2(dx);
                if theta < 0.0 {
                    theta += std::f64::consts::TAU;
                }
                let step = std::f64::consts::TAU / 16.0;
                if (55.0..=65.0).contains(&r) && theta < step {
                    gray.put_pixel(x, y, Luma([20]));
                }
            }
        }

        // Shifting the anchor by two sectors moves the dark reading to
        // sector 14 (the anchor rotates forward past the wedge).
        let step = std::f64::consts::TAU / 16.0;
        let vals = sample_ring(&gray, (100.0, 100.0), 60.0, 16, 2.0 * step);
        assert!(vals[14] < 40.0, "got {:?}", vals);
    }

    #[test]
    fn sample_all_rings_matches_layout_shape() {
        let gray = GrayImage::from_pixel(300, 300, Luma([128]));
        let rings = sample_all_rings(&gray, (150.0, 150.0), 300, 0.0);
        assert_eq!(rings.len(), layout::RING_COUNT);
        for (ring, vals) in rings.iter().enumerate() {
            assert_eq!(vals.len(), layout::RING_SECTORS[ring]);
        }
    }
}

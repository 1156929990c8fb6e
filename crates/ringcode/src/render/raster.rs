//! Raster renderer: per-pixel polar classification onto an RGBA canvas.

use image::{Rgba, RgbaImage};

use crate::layout;
use crate::style::Style;

use super::{ring_bit_offsets, wedge_radii};

/// Render `bits` onto a square `size`×`size` RGBA canvas.
///
/// Pure function of its inputs. Bits beyond the layout capacity are
/// ignored; a short slice renders the missing tail as zeros.
pub fn render_raster(bits: &[u8], size: u32, style: &Style) -> RgbaImage {
    let bg = Rgba(style.background_rgba());
    let fg = Rgba(style.foreground_rgba());
    let offsets = ring_bit_offsets();

    let center = size as f64 / 2.0;
    let inset = (1.0 - layout::ARC_FILL_FRAC) / 2.0;

    // Precompute radial extents once per ring.
    let mut radii = [(0.0f64, 0.0f64); layout::RING_COUNT];
    for (ring, slot) in radii.iter_mut().enumerate() {
        *slot = wedge_radii(ring, size);
    }

    let mut img = RgbaImage::from_pixel(size, size, bg);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;
            let r = (dx * dx + dy * dy).sqrt();

            let Some(ring) = radii
                .iter()
                .position(|&(inner, outer)| r >= inner && r <= outer)
            else {
                continue;
            };

            let mut theta = dy.atan2(dx);
            if theta < 0.0 {
                theta += std::f64::consts::TAU;
            }

            let sectors = layout::RING_SECTORS[ring];
            let pos = theta / layout::sector_angle(ring);
            let sector = (pos as usize).min(sectors - 1);
            let frac = pos - sector as f64;
            if frac < inset || frac > 1.0 - inset {
                continue;
            }

            let bit = bits.get(offsets[ring] + sector).copied().unwrap_or(0);
            if bit == 1 {
                img.put_pixel(x, y, fg);
            }
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::STYLES;

    fn pixel_at_wedge_center(img: &RgbaImage, ring: usize, sector: usize, size: u32) -> Rgba<u8> {
        let (start, end) = super::super::wedge_angles(ring, sector);
        let theta = (start + end) / 2.0;
        let r = layout::mid_radius(ring, size);
        let c = size as f64 / 2.0;
        let x = (c + r * theta.cos()) as u32;
        let y = (c + r * theta.sin()) as u32;
        *img.get_pixel(x, y)
    }

    #[test]
    fn set_bit_paints_foreground_at_mid_radius() {
        let size = 420;
        let mut bits = vec![0u8; layout::total_capacity_bits()];
        let offsets = ring_bit_offsets();
        bits[offsets[2] + 10] = 1;

        let style = Style::default_style();
        let img = render_raster(&bits, size, style);

        assert_eq!(
            pixel_at_wedge_center(&img, 2, 10, size),
            Rgba(style.foreground_rgba())
        );
        // A neighboring clear sector stays background.
        assert_eq!(
            pixel_at_wedge_center(&img, 2, 11, size),
            Rgba(style.background_rgba())
        );
    }

    #[test]
    fn only_declared_style_colors_appear() {
        let size = 240;
        let bits: Vec<u8> = (0..layout::total_capacity_bits())
            .map(|i| (i % 3 == 0) as u8)
            .collect();

        for style in &STYLES {
            let img = render_raster(&bits, size, style);
            let bg = Rgba(style.background_rgba());
            let fg = Rgba(style.foreground_rgba());
            for px in img.pixels() {
                assert!(
                    *px == bg || *px == fg,
                    "style {} produced a color outside its palette",
                    style.key
                );
            }
        }
    }

    #[test]
    fn all_zero_bits_render_background_only() {
        let size = 180;
        let bits = vec![0u8; layout::total_capacity_bits()];
        let style = Style::default_style();
        let img = render_raster(&bits, size, style);
        let bg = Rgba(style.background_rgba());
        assert!(img.pixels().all(|px| *px == bg));
    }

    #[test]
    fn quiet_zone_is_never_painted() {
        let size = 300;
        let bits = vec![1u8; layout::total_capacity_bits()];
        let style = Style::default_style();
        let img = render_raster(&bits, size, style);
        let bg = Rgba(style.background_rgba());

        let margin = (size as f64 * layout::QUIET_ZONE_FRAC) as u32;
        for x in 0..size {
            for y in [0, margin / 2, size - 1] {
                assert_eq!(*img.get_pixel(x, y), bg);
            }
        }
    }
}

//! Vector renderer: annular wedges as SVG path elements.
//!
//! Each set bit becomes a four-point path — outer arc, radial segment,
//! inner arc, closing radial segment — with the large-arc flag set when the
//! swept angle exceeds π. Geometry matches the raster renderer exactly.

use std::fmt::Write;

use crate::layout;
use crate::style::Style;

use super::{ring_bit_offsets, wedge_angles, wedge_radii};

/// Render `bits` as a standalone SVG document of `size`×`size` user units.
pub fn render_svg(bits: &[u8], size: u32, style: &Style) -> String {
    let center = size as f64 / 2.0;
    let offsets = ring_bit_offsets();

    let mut out = String::with_capacity(64 * 1024);
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {size} {size}\" \
         width=\"{size}\" height=\"{size}\">\n"
    );
    let _ = write!(
        out,
        "  <rect width=\"{size}\" height=\"{size}\" fill=\"{}\"/>\n",
        style.background
    );

    for ring in 0..layout::RING_COUNT {
        let (r_inner, r_outer) = wedge_radii(ring, size);
        for sector in 0..layout::RING_SECTORS[ring] {
            let bit = bits.get(offsets[ring] + sector).copied().unwrap_or(0);
            if bit != 1 {
                continue;
            }
            let (a0, a1) = wedge_angles(ring, sector);
            let _ = write!(
                out,
                "  <path d=\"{}\" fill=\"{}\"/>\n",
                wedge_path(center, r_inner, r_outer, a0, a1),
                style.foreground
            );
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Build the `d` attribute for one annular wedge.
fn wedge_path(center: f64, r_inner: f64, r_outer: f64, a0: f64, a1: f64) -> String {
    let large_arc = u8::from(a1 - a0 > std::f64::consts::PI);

    let (x0, y0) = polar(center, r_outer, a0);
    let (x1, y1) = polar(center, r_outer, a1);
    let (x2, y2) = polar(center, r_inner, a1);
    let (x3, y3) = polar(center, r_inner, a0);

    format!(
        "M {x0:.2} {y0:.2} \
         A {r_outer:.2} {r_outer:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} \
         L {x2:.2} {y2:.2} \
         A {r_inner:.2} {r_inner:.2} 0 {large_arc} 0 {x3:.2} {y3:.2} \
         Z"
    )
}

fn polar(center: f64, radius: f64, angle: f64) -> (f64, f64) {
    (center + radius * angle.cos(), center + radius * angle.sin())
}

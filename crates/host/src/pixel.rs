//! Pure-computation rasterization of the hue/lightness map and the sphere mesh.
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and in-memory hosts can share the same buffers.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use huepick_core::color::hsl_components_to_rgb;
use huepick_core::sphere::sphere_surface_color;

/// Renders the 2D map as an RGBA8 buffer of length `width * height * 4`.
///
/// Column `x` has hue `x / width * 360`, row `y` has lightness
/// `100 - y / height * 100` (white on top); saturation is always 100%.
pub fn hsl_map_rgba(width: u32, height: u32) -> Vec<u8> {
    let (w, h) = (f64::from(width), f64::from(height));
    (0..height)
        .flat_map(|y| {
            let lightness = 1.0 - f64::from(y) / h;
            (0..width).flat_map(move |x| {
                let hue = f64::from(x) / w * 360.0;
                let c = hsl_components_to_rgb(hue, 1.0, lightness);
                [c.r, c.g, c.b, 255u8]
            })
        })
        .collect()
}

/// Vertex positions of a unit UV sphere, row by row from the north pole.
///
/// Produces `(width_segments + 1) * (height_segments + 1)` vertices; the seam
/// column is duplicated so texture coordinates can wrap.
pub fn sphere_mesh(width_segments: u32, height_segments: u32) -> Vec<DVec3> {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    (0..=height_segments)
        .flat_map(|iy| {
            let v = f64::from(iy) / f64::from(height_segments);
            (0..=width_segments).map(move |ix| {
                let u = f64::from(ix) / f64::from(width_segments);
                DVec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                )
            })
        })
        .collect()
}

/// Per-vertex colors for the sphere, as linear `[r, g, b]` in [0, 1].
pub fn sphere_vertex_colors(vertices: &[DVec3]) -> Vec<[f32; 3]> {
    vertices
        .iter()
        .map(|&p| {
            let c = sphere_surface_color(p);
            [
                f32::from(c.r) / 255.0,
                f32::from(c.g) / 255.0,
                f32::from(c.b) / 255.0,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_map_rgba_correct_length() {
        let buf = hsl_map_rgba(8, 4);
        assert_eq!(buf.len(), 8 * 4 * 4);
    }

    #[test]
    fn hsl_map_rgba_alpha_always_255() {
        let buf = hsl_map_rgba(6, 6);
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn hsl_map_top_row_is_white_and_left_column_is_red() {
        let buf = hsl_map_rgba(12, 10);
        assert_eq!(&buf[0..3], &[255, 255, 255], "top-left should be white");
        // Row 5 of 10 has lightness 0.5: pure red at hue 0
        let mid = 5 * 12 * 4;
        assert_eq!(&buf[mid..mid + 3], &[255, 0, 0]);
        // Column 4 of 12 has hue 120: pure green
        let green = mid + 4 * 4;
        assert_eq!(&buf[green..green + 3], &[0, 255, 0]);
    }

    #[test]
    fn sphere_mesh_vertex_count_and_radius() {
        let mesh = sphere_mesh(16, 8);
        assert_eq!(mesh.len(), 17 * 9);
        for (i, p) in mesh.iter().enumerate() {
            assert!((p.length() - 1.0).abs() < 1e-9, "vertex {i} off the unit sphere: {p:?}");
        }
        assert!((mesh[0] - DVec3::Y).length() < 1e-9, "first row is the north pole");
    }

    #[test]
    fn sphere_mesh_clamps_degenerate_segment_counts() {
        assert_eq!(sphere_mesh(0, 0).len(), 4 * 3);
    }

    #[test]
    fn sphere_poles_are_white_and_black() {
        let mesh = sphere_mesh(8, 4);
        let colors = sphere_vertex_colors(&mesh);
        assert_eq!(colors[0], [1.0, 1.0, 1.0]);
        assert_eq!(*colors.last().unwrap(), [0.0, 0.0, 0.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mesh_vertices_stay_on_unit_sphere(w in 0u32..48, h in 0u32..24) {
                for p in sphere_mesh(w, h) {
                    prop_assert!((p.length() - 1.0).abs() < 1e-9, "{p:?}");
                }
            }

            #[test]
            fn map_raster_is_fully_saturated(w in 1u32..24, h in 1u32..24) {
                let buf = hsl_map_rgba(w, h);
                for px in buf.chunks_exact(4) {
                    let max = px[0].max(px[1]).max(px[2]);
                    let min = px[0].min(px[1]).min(px[2]);
                    // s = 1 means a channel is pinned to 0 or 255
                    prop_assert!(max == 255 || min == 0, "{px:?}");
                }
            }
        }
    }
}

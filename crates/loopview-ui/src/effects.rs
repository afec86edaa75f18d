//! Draw-time transform effects for page transitions.
//!
//! Effects never draw. Given the container extents, the axis, a slot index
//! and the current scroll offset they produce a transform description the
//! host applies while drawing that slot; `None` means the slot can be
//! skipped entirely (fully offscreen, or flipped edge-on). Effects are
//! supplied to the container as pre-built instances -- there is no runtime
//! name-to-type resolution.

use loopview_types::config::Axis;
use loopview_types::error::{LoopError, Result};

/// Axis of a 3D rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    Y,
}

/// A 3D rotation about a pivot point in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation3d {
    pub axis: RotationAxis,
    pub degrees: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

/// Draw-time transform for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Optional rotation; `None` draws the page flat.
    pub rotation: Option<Rotation3d>,
}

impl PageTransform {
    /// Fully opaque, unrotated.
    pub fn opaque() -> Self {
        Self {
            alpha: 1.0,
            rotation: None,
        }
    }
}

/// Capability interface consulted by the host render loop, per visible
/// slot, per frame, when 3D-effect mode is enabled.
///
/// Implementations must be stateless across calls apart from cached
/// extents.
pub trait PageEffect {
    /// Compute the transform for `slot` at the current `offset`, or `None`
    /// to skip the slot.
    fn transform(
        &mut self,
        width: u32,
        height: u32,
        axis: Axis,
        slot: usize,
        offset: i32,
    ) -> Option<PageTransform>;
}

fn extents(width: u32, height: u32, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::Vertical => (height as f32, width as f32),
        Axis::Horizontal => (width as f32, height as f32),
    }
}

/// Opacity fade: alpha follows the slot's distance from the viewport.
#[derive(Debug, Clone)]
pub struct FadeEffect {
    min_alpha: f32,
}

impl FadeEffect {
    /// `min_alpha` is the opacity of a page a full extent away; clamped to
    /// `[0, 1]`.
    pub fn new(min_alpha: f32) -> Self {
        Self {
            min_alpha: min_alpha.clamp(0.0, 1.0),
        }
    }
}

impl PageEffect for FadeEffect {
    fn transform(
        &mut self,
        width: u32,
        height: u32,
        axis: Axis,
        slot: usize,
        offset: i32,
    ) -> Option<PageTransform> {
        let (extent, _) = extents(width, height, axis);
        if extent <= 0.0 {
            return None;
        }
        let slot_pos = slot as f32 * extent;
        let offset = offset as f32;
        if offset + extent < slot_pos || slot_pos < offset - extent {
            return None;
        }
        let percent = (1.0 - (offset - slot_pos).abs() / extent).clamp(0.0, 1.0);
        let alpha = (1.0 - self.min_alpha) * percent + self.min_alpha;
        Some(PageTransform {
            alpha,
            rotation: None,
        })
    }
}

/// Box-flip transform: pages rotate about the edge they share with their
/// neighbour, as if glued to the faces of a rotating box.
#[derive(Debug, Clone)]
pub struct FlipBoxEffect {
    each_degree: f32,
}

impl FlipBoxEffect {
    /// `each_degree` is the rotation one full page of travel maps to; must
    /// be greater than 0 and less than 180.
    pub fn new(each_degree: f32) -> Result<Self> {
        if !each_degree.is_finite() || each_degree <= 0.0 || each_degree >= 180.0 {
            return Err(LoopError::Config(format!(
                "each_degree must be greater than 0 and less than 180, got {each_degree}"
            )));
        }
        Ok(Self { each_degree })
    }
}

impl PageEffect for FlipBoxEffect {
    fn transform(
        &mut self,
        width: u32,
        height: u32,
        axis: Axis,
        slot: usize,
        offset: i32,
    ) -> Option<PageTransform> {
        let (extent, ortho) = extents(width, height, axis);
        if extent <= 0.0 {
            return None;
        }
        let slot_pos = slot as f32 * extent;
        let offset = offset as f32;
        if offset + extent < slot_pos || slot_pos < offset - extent {
            return None;
        }
        let degrees = self.each_degree * (offset - slot_pos) / extent;
        // Edge-on or mirrored: not worth drawing.
        if degrees.abs() >= 90.0 {
            return None;
        }
        let near_edge = if offset > slot_pos {
            slot_pos + extent
        } else {
            slot_pos
        };
        let rotation = match axis {
            Axis::Vertical => Rotation3d {
                axis: RotationAxis::X,
                degrees,
                pivot_x: ortho / 2.0,
                pivot_y: near_edge,
            },
            Axis::Horizontal => Rotation3d {
                axis: RotationAxis::Y,
                degrees: -degrees,
                pivot_x: near_edge,
                pivot_y: ortho / 2.0,
            },
        };
        Some(PageTransform {
            alpha: 1.0,
            rotation: Some(rotation),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- FadeEffect --

    #[test]
    fn fade_centered_is_opaque() {
        let mut fx = FadeEffect::new(0.0);
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 200)
            .unwrap();
        assert_eq!(t.alpha, 1.0);
        assert!(t.rotation.is_none());
    }

    #[test]
    fn fade_half_page_away() {
        let mut fx = FadeEffect::new(0.0);
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 250)
            .unwrap();
        assert!((t.alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fade_respects_min_alpha() {
        let mut fx = FadeEffect::new(0.4);
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 300)
            .unwrap();
        // One full page away: percent 0, alpha floors at min.
        assert!((t.alpha - 0.4).abs() < 1e-6);
    }

    #[test]
    fn fade_skips_far_offscreen() {
        let mut fx = FadeEffect::new(0.0);
        assert!(fx.transform(100, 100, Axis::Vertical, 5, 100).is_none());
        assert!(fx.transform(100, 100, Axis::Vertical, 0, 350).is_none());
    }

    #[test]
    fn fade_min_alpha_clamped() {
        let mut fx = FadeEffect::new(3.0);
        let t = fx
            .transform(100, 100, Axis::Vertical, 1, 100)
            .unwrap();
        assert_eq!(t.alpha, 1.0);
    }

    #[test]
    fn fade_horizontal_uses_width() {
        let mut fx = FadeEffect::new(0.0);
        let t = fx
            .transform(200, 100, Axis::Horizontal, 1, 300)
            .unwrap();
        assert!((t.alpha - 0.5).abs() < 1e-6);
    }

    // -- FlipBoxEffect --

    #[test]
    fn flip_rejects_bad_degrees() {
        assert!(FlipBoxEffect::new(0.0).is_err());
        assert!(FlipBoxEffect::new(-10.0).is_err());
        assert!(FlipBoxEffect::new(180.0).is_err());
        assert!(FlipBoxEffect::new(90.0).is_ok());
        assert!(FlipBoxEffect::new(179.9).is_ok());
    }

    #[test]
    fn flip_centered_has_zero_rotation() {
        let mut fx = FlipBoxEffect::new(90.0).unwrap();
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 200)
            .unwrap();
        let r = t.rotation.unwrap();
        assert_eq!(r.degrees, 0.0);
        assert_eq!(r.axis, RotationAxis::X);
    }

    #[test]
    fn flip_angle_proportional_to_distance() {
        let mut fx = FlipBoxEffect::new(90.0).unwrap();
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 250)
            .unwrap();
        let r = t.rotation.unwrap();
        assert!((r.degrees - 45.0).abs() < 1e-4);
    }

    #[test]
    fn flip_skips_at_exactly_ninety_degrees() {
        let mut fx = FlipBoxEffect::new(90.0).unwrap();
        // One full page of travel maps to exactly 90 degrees.
        assert!(fx.transform(100, 100, Axis::Vertical, 2, 300).is_none());
        assert!(fx.transform(100, 100, Axis::Vertical, 2, 100).is_none());
    }

    #[test]
    fn flip_small_each_degree_survives_full_page() {
        let mut fx = FlipBoxEffect::new(45.0).unwrap();
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 300)
            .unwrap();
        let r = t.rotation.unwrap();
        assert!((r.degrees - 45.0).abs() < 1e-4);
    }

    #[test]
    fn flip_pivot_is_near_edge() {
        let mut fx = FlipBoxEffect::new(90.0).unwrap();
        // Scrolled past the slot: pivot on its trailing edge.
        let t = fx
            .transform(100, 100, Axis::Vertical, 1, 150)
            .unwrap();
        assert_eq!(t.rotation.unwrap().pivot_y, 200.0);
        // Slot ahead of the viewport: pivot on its leading edge.
        let t = fx
            .transform(100, 100, Axis::Vertical, 2, 150)
            .unwrap();
        assert_eq!(t.rotation.unwrap().pivot_y, 200.0);
    }

    #[test]
    fn flip_horizontal_rotates_about_y_negated() {
        let mut fx = FlipBoxEffect::new(90.0).unwrap();
        let t = fx
            .transform(100, 100, Axis::Horizontal, 2, 250)
            .unwrap();
        let r = t.rotation.unwrap();
        assert_eq!(r.axis, RotationAxis::Y);
        assert!((r.degrees + 45.0).abs() < 1e-4);
        assert_eq!(r.pivot_y, 50.0);
    }

    #[test]
    fn flip_skips_far_offscreen() {
        let mut fx = FlipBoxEffect::new(30.0).unwrap();
        assert!(fx.transform(100, 100, Axis::Vertical, 0, 301).is_none());
        assert!(fx.transform(100, 100, Axis::Vertical, 5, 100).is_none());
    }

    #[test]
    fn opaque_transform_defaults() {
        let t = PageTransform::opaque();
        assert_eq!(t.alpha, 1.0);
        assert!(t.rotation.is_none());
    }
}

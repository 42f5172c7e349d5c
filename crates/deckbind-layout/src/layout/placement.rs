//! Aspect-fit placement within slots
//!
//! Computes where a source image is drawn inside its slot and whether its
//! pixels should be resampled before embedding.

use crate::constants::{DOWNSCALE_TARGET_FACTOR, DOWNSCALE_TRIGGER_FACTOR};

use super::Rect;

/// What the renderer should draw in a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementDirective {
    /// Draw the image into `rect`
    Draw {
        /// Centered, aspect-preserving draw rectangle inside the slot
        rect: Rect,
        /// Pixel size to resample the source to before embedding, if any
        resample: Option<(u32, u32)>,
    },
    /// Source is unusable; fill the whole slot with a labelled placeholder
    Placeholder,
}

impl PlacementDirective {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, PlacementDirective::Placeholder)
    }
}

/// Fit a source image into a slot.
///
/// `source_px` is the decoded pixel size, or `None` when the image could
/// not be decoded. A missing source or a zero dimension yields
/// [`PlacementDirective::Placeholder`].
///
/// The image is scaled to the largest size that fits without distortion:
/// a source wider (relative to its height) than the slot fills the slot
/// width, otherwise it fills the slot height. The residual space is split
/// evenly on both sides.
pub fn fit(source_px: Option<(u32, u32)>, slot: &Rect) -> PlacementDirective {
    let Some((src_w, src_h)) = source_px else {
        return PlacementDirective::Placeholder;
    };
    if src_w == 0 || src_h == 0 {
        return PlacementDirective::Placeholder;
    }

    let source_aspect = src_w as f32 / src_h as f32;
    let slot_aspect = slot.aspect();

    let (width, height) = if source_aspect > slot_aspect {
        (slot.width, slot.width / source_aspect)
    } else {
        (slot.height * source_aspect, slot.height)
    };

    let rect = Rect::new(
        slot.x + (slot.width - width) / 2.0,
        slot.y + (slot.height - height) / 2.0,
        width,
        height,
    );

    PlacementDirective::Draw {
        rect,
        resample: downscale_target((src_w, src_h), (width, height)),
    }
}

/// Pixel size to resample an oversized source to, if it needs it.
///
/// Triggers when the larger pixel dimension exceeds
/// `DOWNSCALE_TRIGGER_FACTOR` times the larger display dimension; the
/// result keeps `DOWNSCALE_TARGET_FACTOR` times the display size.
pub fn downscale_target(source_px: (u32, u32), display: (f32, f32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source_px;
    let max_source = src_w.max(src_h) as f32;
    let max_display = display.0.max(display.1);

    if max_display <= 0.0 || max_source <= DOWNSCALE_TRIGGER_FACTOR * max_display {
        return None;
    }

    let ratio = DOWNSCALE_TARGET_FACTOR * max_display / max_source;
    let width = ((src_w as f32 * ratio).round() as u32).max(1);
    let height = ((src_h as f32 * ratio).round() as u32).max(1);
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> Rect {
        Rect::new(36.0, 100.0, 200.0, 150.0)
    }

    fn draw_rect(directive: PlacementDirective) -> Rect {
        match directive {
            PlacementDirective::Draw { rect, .. } => rect,
            PlacementDirective::Placeholder => panic!("Expected a draw directive"),
        }
    }

    #[test]
    fn test_wide_source_fills_width() {
        let rect = draw_rect(fit(Some((1600, 900)), &slot()));

        assert!((rect.width - 200.0).abs() < 0.01);
        assert!((rect.height - 112.5).abs() < 0.01);
        assert!((rect.x - 36.0).abs() < 0.01);
        // Residual split evenly top and bottom
        assert!((rect.y - (100.0 + 18.75)).abs() < 0.01);
    }

    #[test]
    fn test_tall_source_fills_height() {
        let rect = draw_rect(fit(Some((600, 900)), &slot()));

        assert!((rect.height - 150.0).abs() < 0.01);
        assert!((rect.width - 100.0).abs() < 0.01);
        assert!((rect.x - 86.0).abs() < 0.01);
        assert!((rect.y - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_contained_and_touching_for_many_aspects() {
        let slot = slot();
        let sizes = [
            (1, 1),
            (1, 1000),
            (1000, 1),
            (4, 3),
            (3, 4),
            (16, 9),
            (400, 300),
            (210, 297),
            (7, 13),
        ];

        for size in sizes {
            let rect = draw_rect(fit(Some(size), &slot));
            assert!(slot.contains(&rect, 0.01), "{size:?} -> {rect:?}");
            assert!(rect.area() <= slot.area() + 0.01);

            let touches_width = (rect.width - slot.width).abs() < 0.01;
            let touches_height = (rect.height - slot.height).abs() < 0.01;
            assert!(touches_width || touches_height, "{size:?} -> {rect:?}");

            // Centered on both axes
            assert!((rect.center_x() - slot.center_x()).abs() < 0.01);
            assert!((rect.center_y() - slot.center_y()).abs() < 0.01);

            let source_aspect = size.0 as f32 / size.1 as f32;
            assert!((rect.aspect() - source_aspect).abs() / source_aspect < 0.001);
        }
    }

    #[test]
    fn test_undecodable_source_is_placeholder() {
        assert!(fit(None, &slot()).is_placeholder());
        assert!(fit(Some((0, 100)), &slot()).is_placeholder());
        assert!(fit(Some((100, 0)), &slot()).is_placeholder());
    }

    #[test]
    fn test_small_source_not_resampled() {
        match fit(Some((800, 600)), &slot()) {
            PlacementDirective::Draw { resample, .. } => assert_eq!(resample, None),
            _ => panic!("Expected a draw directive"),
        }
    }

    #[test]
    fn test_oversized_source_resampled() {
        // Display 200x112.5, trigger above 800px, target 400px wide
        match fit(Some((3200, 1800)), &slot()) {
            PlacementDirective::Draw { resample, .. } => assert_eq!(resample, Some((400, 225))),
            _ => panic!("Expected a draw directive"),
        }
    }

    #[test]
    fn test_downscale_threshold_is_exclusive() {
        assert_eq!(downscale_target((800, 400), (200.0, 100.0)), None);
        assert_eq!(downscale_target((801, 400), (200.0, 100.0)), Some((400, 200)));
    }
}

//! Shared constants for grid layout
//!
//! This module centralizes magic numbers used by the geometry, placement
//! and rendering code.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Image Resampling
// =============================================================================

/// Sources whose larger pixel dimension exceeds this multiple of the larger
/// display dimension are resampled before embedding.
pub const DOWNSCALE_TRIGGER_FACTOR: f32 = 4.0;

/// Resampled sources keep this multiple of the larger display dimension.
pub const DOWNSCALE_TARGET_FACTOR: f32 = 2.0;

// =============================================================================
// Slot Decoration
// =============================================================================

/// Gray level of the hairline slot frame
pub const SLOT_FRAME_GRAY: f32 = 0.95;

/// Line width of the hairline slot frame (points)
pub const SLOT_FRAME_WIDTH: f32 = 0.25;

/// Gray level of the border drawn around each placed image
pub const IMAGE_BORDER_GRAY: f32 = 0.83;

/// Line width of the image border (points)
pub const IMAGE_BORDER_WIDTH: f32 = 0.5;

/// Fill gray of a placeholder slot
pub const PLACEHOLDER_FILL_GRAY: f32 = 0.83;

/// Line width of the placeholder frame (points)
pub const PLACEHOLDER_FRAME_WIDTH: f32 = 0.5;

/// Distance from the slot's bottom edge down to the label baseline (points)
pub const LABEL_BASELINE_DROP: f32 = 9.0;

/// Resource name of the label font on grid pages
pub const LABEL_FONT_RESOURCE: &str = "FLbl";

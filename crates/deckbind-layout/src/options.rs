use crate::layout::{SlotGeometry, resolve_slots};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contact-sheet grid configuration.
///
/// All lengths are in points except the paper size, which follows the
/// usual millimetre definitions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    // Grid
    pub rows: usize,
    pub columns: usize,

    // Output page
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Spacing
    pub margin_pt: f32,
    pub gap_pt: f32,
    pub footer_reserve_pt: f32,

    // Decoration
    pub slot_labels: bool,
    pub label_font_size: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 2,
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_pt: 36.0,
            gap_pt: 12.0,
            footer_reserve_pt: 40.0,
            slot_labels: true,
            label_font_size: 8.0,
        }
    }
}

impl GridOptions {
    /// Number of slots on one grid page
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// Output page size in points
    pub fn page_size_pt(&self) -> (f32, f32) {
        self.paper_size.dimensions_pt(self.orientation)
    }

    /// Number of grid pages needed for `image_count` source pages
    pub fn pages_for(&self, image_count: usize) -> usize {
        let capacity = self.capacity();
        if capacity == 0 {
            return 0;
        }
        image_count.div_ceil(capacity)
    }

    /// Resolve the slot geometry for these options
    pub fn geometry(&self) -> Result<SlotGeometry> {
        let (page_width, page_height) = self.page_size_pt();
        resolve_slots(
            page_width,
            page_height,
            self.margin_pt,
            self.gap_pt,
            self.rows,
            self.columns,
            self.footer_reserve_pt,
        )
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(LayoutError::Config(
                "Grid needs at least one row and one column".to_string(),
            ));
        }

        if self.margin_pt < 0.0 || self.gap_pt < 0.0 || self.footer_reserve_pt < 0.0 {
            return Err(LayoutError::Config(
                "Margin, gap and footer reserve must not be negative".to_string(),
            ));
        }

        if self.slot_labels && self.label_font_size <= 0.0 {
            return Err(LayoutError::Config(
                "Label font size must be positive".to_string(),
            ));
        }

        // Surfaces InvalidGeometry when margins and gaps eat the page
        self.geometry().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        let options = GridOptions::default();
        assert_eq!(options.capacity(), 8);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_pages_for() {
        let options = GridOptions::default();
        assert_eq!(options.pages_for(0), 0);
        assert_eq!(options.pages_for(1), 1);
        assert_eq!(options.pages_for(8), 1);
        assert_eq!(options.pages_for(9), 2);
        assert_eq!(options.pages_for(17), 3);
    }

    #[test]
    fn test_zero_rows_rejected() {
        let options = GridOptions {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(LayoutError::Config(_))));
    }

    #[test]
    fn test_oversized_margin_rejected() {
        let options = GridOptions {
            margin_pt: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidGeometry(_))
        ));
    }
}

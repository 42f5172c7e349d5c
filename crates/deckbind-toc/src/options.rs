use deckbind_layout::{Orientation, PaperSize};

use crate::types::{Result, TocError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Table-of-contents page configuration. Lengths are in points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TocOptions {
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Heading
    pub heading: String,
    pub heading_font_size: f32,
    /// Space between the top margin and the first entry baseline
    pub heading_block_pt: f32,

    // Entries
    pub entry_font_size: f32,
    pub margin_pt: f32,
    pub line_height_pt: f32,
    /// A new page starts once the next baseline would fall below
    /// `margin_pt + bottom_limit_pt`
    pub bottom_limit_pt: f32,
    /// Gap between the entry text, the dot leader and the page reference
    pub leader_gap_pt: f32,

    // Text
    /// Titles longer than this are truncated (counted in characters)
    pub title_max_chars: usize,
    pub ellipsis: String,
    /// Page reference template, `{}` is replaced by the page number
    pub page_reference: String,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            heading: "Contents".to_string(),
            heading_font_size: 24.0,
            heading_block_pt: 80.0,
            entry_font_size: 12.0,
            margin_pt: 50.0,
            line_height_pt: 25.0,
            bottom_limit_pt: 50.0,
            leader_gap_pt: 10.0,
            title_max_chars: 40,
            ellipsis: "...".to_string(),
            page_reference: "Page {}".to_string(),
        }
    }
}

impl TocOptions {
    /// Page size in points
    pub fn page_size_pt(&self) -> (f32, f32) {
        self.paper_size.dimensions_pt(self.orientation)
    }

    /// Format the page reference for `page`
    pub fn format_page_reference(&self, page: usize) -> String {
        self.page_reference.replace("{}", &page.to_string())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.line_height_pt <= 0.0 {
            return Err(TocError::Config(
                "Line height must be positive".to_string(),
            ));
        }

        if self.heading_font_size <= 0.0 || self.entry_font_size <= 0.0 {
            return Err(TocError::Config("Font sizes must be positive".to_string()));
        }

        if self.title_max_chars <= self.ellipsis.chars().count() {
            return Err(TocError::Config(format!(
                "Title length limit {} leaves no room for the ellipsis",
                self.title_max_chars
            )));
        }

        let (width, height) = self.page_size_pt();
        let lowest = self.margin_pt + self.bottom_limit_pt;
        if 2.0 * self.margin_pt >= width
            || height - self.margin_pt - self.heading_block_pt < lowest
            || height - self.margin_pt < lowest
        {
            return Err(TocError::Config(
                "Margins leave no room for entries".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(TocOptions::default().validate().is_ok());
    }

    #[test]
    fn test_page_reference() {
        let options = TocOptions::default();
        assert_eq!(options.format_page_reference(12), "Page 12");

        let options = TocOptions {
            page_reference: "p. {}".to_string(),
            ..Default::default()
        };
        assert_eq!(options.format_page_reference(3), "p. 3");
    }

    #[test]
    fn test_zero_line_height_rejected() {
        let options = TocOptions {
            line_height_pt: 0.0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(TocError::Config(_))));
    }

    #[test]
    fn test_heading_block_below_entry_limit_rejected() {
        let options = TocOptions {
            heading_block_pt: 700.0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(TocError::Config(_))));
    }

    #[test]
    fn test_limit_shorter_than_ellipsis_rejected() {
        let options = TocOptions {
            title_max_chars: 3,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}

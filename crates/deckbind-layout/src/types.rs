use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid slot geometry: {0}")]
    InvalidGeometry(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to lay out")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// A page image that could not be turned into pixels.
///
/// Never fatal: the grid renderer substitutes a placeholder slot.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("page {ordinal}: cannot read {path}: {source}")]
    Unreadable {
        ordinal: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("page {ordinal}: {source}")]
    Image {
        ordinal: usize,
        #[source]
        source: image::ImageError,
    },
    #[error("page {ordinal}: image has a zero dimension ({width}x{height})")]
    Empty {
        ordinal: usize,
        width: u32,
        height: u32,
    },
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Dimensions in points with orientation applied
    pub fn dimensions_pt(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_with_orientation(orientation);
        (crate::constants::mm_to_pt(w), crate::constants::mm_to_pt(h))
    }
}

/// What kind of source a run of page images came from.
///
/// Only affects labelling; geometry and placement are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceKind {
    /// Slides exported from a presentation deck
    #[default]
    Slides,
    /// Pages rasterized from an existing document
    Pages,
}

impl SourceKind {
    /// Ordinal label printed under a filled slot
    pub fn slot_label(self, ordinal: usize) -> String {
        match self {
            SourceKind::Slides => format!("Slide {ordinal}"),
            SourceKind::Pages => format!("p.{ordinal}"),
        }
    }

    /// Text centred inside a placeholder slot
    pub fn placeholder_label(self, ordinal: usize) -> String {
        match self {
            SourceKind::Slides => format!("Missing slide {ordinal}"),
            SourceKind::Pages => format!("Missing page {ordinal}"),
        }
    }
}

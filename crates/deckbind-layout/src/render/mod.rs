//! PDF rendering modules for grid pages
//!
//! This module handles all PDF-specific operations:
//! - Grouping page images into fixed-capacity pages
//! - Embedding images as XObjects
//! - Building grid pages and intermediate documents

mod accumulator;
mod document;
mod image;
mod page;

pub use accumulator::*;
pub use document::*;
pub use image::{embed_rgb_image, resample};
pub use page::{SlotCounts, add_label_font, escape_pdf_string, render_grid_page};

//! Contact-sheet layout: slot geometry, aspect-fit placement and grid page
//! rendering for rasterized source pages.

pub mod constants;
mod io;
pub mod layout;
pub mod metrics;
mod options;
pub mod render;
mod source;
mod types;

pub use io::{document_to_bytes, load_pdf, page_count, save_pdf};
pub use layout::{PlacementDirective, Rect, Slot, SlotGeometry, fit, resolve_slots};
pub use options::*;
pub use render::{GridDocument, lay_out, render_grid_document};
pub use source::{ImageSource, PageImage, flatten_onto_white};
pub use types::*;

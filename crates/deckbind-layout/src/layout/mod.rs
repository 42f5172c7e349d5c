//! Layout calculation modules for grid pages
//!
//! This module handles the geometric side of building a contact sheet:
//! - Slot geometry (where each slot sits on the page)
//! - Aspect-fit placement (where an image sits inside its slot)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;

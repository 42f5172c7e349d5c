//! Front matter for bound documents: font fallback, two-pass pagination
//! and the rendered table of contents.

mod fonts;
mod options;
mod plan;
mod render;
mod types;

pub use fonts::{EmbeddedFont, FontCandidate, FontSession, ResolvedFont};
pub use options::*;
pub use plan::*;
pub use render::{RenderedToc, entry_text, render_toc, render_toc_sync, truncate_title};
pub use types::*;

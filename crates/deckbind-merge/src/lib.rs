//! Binding laid-out decks and finished PDFs into one handbook: a contents
//! section, every input in order, an outline and running page numbers.

mod assemble;
mod cancel;
mod footer;
mod input;
mod metadata;
mod optimize;
mod options;
mod outline;
mod pipeline;
mod progress;
mod stats;
mod types;

pub use assemble::{AssembledDocument, Assembly};
pub use cancel::CancelFlag;
pub use footer::add_page_numbers;
pub use input::{BindInput, InputContent, sort_inputs};
pub use metadata::{pdf_date, set_metadata, text_string};
pub use optimize::{Compacted, compact};
pub use options::*;
pub use outline::{Bookmark, add_outline, read_outline};
pub use pipeline::{BindReport, Pipeline, SkippedInput, bind};
pub use progress::{ProgressCallback, ProgressEvent};
pub use stats::{PlanSummary, calculate_plan};
pub use types::*;

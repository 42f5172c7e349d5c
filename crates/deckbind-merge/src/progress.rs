use std::sync::Arc;

/// Milestones of a bind run, in the order they occur
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    LayoutStarted {
        total: usize,
    },
    InputLaidOut {
        index: usize,
        total: usize,
        title: String,
        pages: usize,
    },
    InputSkipped {
        title: String,
        reason: String,
    },
    Planned {
        toc_pages: usize,
        total_pages: usize,
    },
    TocRendered {
        pages: usize,
        font: String,
    },
    Merged {
        pages: usize,
    },
    Optimized {
        success: bool,
    },
    Finished {
        pages: usize,
    },
}

impl ProgressEvent {
    /// Rough completion fraction for progress bars, if the event moves it
    pub fn fraction(&self) -> Option<f32> {
        let fraction = match self {
            ProgressEvent::LayoutStarted { .. } => 0.0,
            ProgressEvent::InputLaidOut { index, total, .. } => {
                0.6 * (*index + 1) as f32 / (*total).max(1) as f32
            }
            ProgressEvent::InputSkipped { .. } => return None,
            ProgressEvent::Planned { .. } => 0.65,
            ProgressEvent::TocRendered { .. } => 0.7,
            ProgressEvent::Merged { .. } => 0.85,
            ProgressEvent::Optimized { .. } => 0.95,
            ProgressEvent::Finished { .. } => 1.0,
        };
        Some(fraction)
    }
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

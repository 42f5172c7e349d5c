use std::path::PathBuf;

mod worker;

// Re-export types from library crates
pub use deckbind_merge::{BindInput, BindOptions, BindReport, PlanSummary, ProgressEvent};
pub use worker::worker_task;

/// Commands sent from a front end to the worker
#[derive(Debug)]
pub enum BindCommand {
    Build {
        inputs: Vec<BindInput>,
        options: BindOptions,
        output_path: PathBuf,
    },
    Plan {
        inputs: Vec<BindInput>,
        options: BindOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
    /// Stop the build in flight, if any
    Cancel,
}

/// Updates sent from the worker to a front end
#[derive(Debug, Clone)]
pub enum BindUpdate {
    Progress {
        event: ProgressEvent,
        fraction: Option<f32>,
    },
    Planned {
        summary: PlanSummary,
    },
    ConfigLoaded {
        options: BindOptions,
    },
    Complete {
        report: BindReport,
    },
    Cancelled,
    Error {
        message: String,
    },
}

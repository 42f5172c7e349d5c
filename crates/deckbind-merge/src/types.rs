use deckbind_layout::LayoutError;
use deckbind_toc::TocError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Contents error: {0}")]
    Toc(#[from] TocError),
    #[error("Cannot read '{title}': {reason}")]
    Unreadable { title: String, reason: String },
    #[error("None of the inputs could be merged")]
    NoMergeableDocuments,
    #[error("Cancelled")]
    Cancelled,
    #[error("Could not move the finished document into place: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Merged document has {actual} pages but {planned} were planned")]
    PlanMismatch { planned: usize, actual: usize },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Failure of the compaction pass. Never fatal: the uncompacted document
/// is written instead.
#[derive(Error, Debug)]
pub enum OptimizationError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compaction changed the page count from {before} to {after}")]
    PageCountChanged { before: usize, after: usize },
}

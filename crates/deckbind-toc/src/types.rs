use thiserror::Error;

#[derive(Error, Debug)]
pub enum TocError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Contents rendered on {rendered} pages but {planned} were planned")]
    PageCountMismatch { planned: usize, rendered: usize },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TocError>;

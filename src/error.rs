use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for the receipt-archiving pipeline.
///
/// `InboxNotFound` and `MissingMetadata` are structural: the ticket was
/// never ingested (or only partially), so the run aborts for that ticket
/// while siblings in a batch continue. An already-existing output is not
/// an error at all; the orchestrator reports it as a normal outcome.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ticket inbox directory not found: {0}")]
    InboxNotFound(PathBuf),

    #[error("ticket metadata missing: {path}\ningest ticket {ticket_id} into its inbox folder first")]
    MissingMetadata { ticket_id: String, path: PathBuf },

    #[error("ticket metadata unreadable: {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("typst compilation failed:\n{stderr}")]
    Compile { stderr: String },

    #[error("failed to merge {path}: {reason}")]
    Merge { path: PathBuf, reason: String },

    #[error("date `{0}` does not match M/D/YY h:mm AM/PM")]
    Format(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

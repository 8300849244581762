//! The receipt-archiving pipeline.
//!
//! Ticket metadata and downloaded attachments go in; one merged PDF
//! (cover page first, then attachments in metadata order) and a textual
//! report come out.

pub mod classify;
pub mod compress;
pub mod cover;
pub mod dates;
pub mod merge;
pub mod receipt;
pub mod util;
pub mod warn;

use classify::AttachmentKind;

/// Per-attachment bookkeeping for one archiving run. Summarized into the
/// cover page and the report, then discarded.
#[derive(Debug, Clone)]
pub struct AttachmentInfo {
    pub name: String,
    pub original_size: u64,
    /// Absent for pass-through PDFs, which are never re-encoded.
    pub compressed_size: Option<u64>,
    pub kind: AttachmentKind,
}

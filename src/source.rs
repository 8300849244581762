//! Ticket data model and the ticket-source seam.
//!
//! The archiving pipeline only ever sees data that is already on disk:
//! a `ticket.json` metadata file plus attachment files in the ticket's
//! inbox folder. Whatever scrapes the helpdesk and produces that folder
//! sits behind [`TicketSource`], so nothing here depends on how a
//! particular web UI is structured.

use crate::error::ArchiveError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sender identity as persisted in ticket metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketUser {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Persisted ticket metadata, immutable once loaded.
///
/// `created` keeps the helpdesk's source format (`M/D/YY h:mm AM/PM`);
/// parsing happens where a calendar date is actually needed so a bad
/// value degrades to verbatim display instead of failing the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    #[serde(default)]
    pub number: String,
    pub user: TicketUser,
    pub created: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Attachment filenames in helpdesk order; files live alongside the
    /// metadata in the inbox folder under exactly these names.
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl TicketRecord {
    /// Load persisted metadata from a ticket's `ticket.json`.
    pub fn load(path: &Path) -> Result<Self, ArchiveError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| ArchiveError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One row of a ticket listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: String,
    pub number: String,
    pub url: String,
    pub subject: String,
    pub user_name: String,
    pub date: String,
}

/// Attachment as reported by the helpdesk (not yet downloaded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A fully read ticket, including body and attachment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub number: String,
    pub url: String,
    pub subject: String,
    pub user_name: String,
    pub user_email: String,
    pub created: String,
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Narrow contract for whatever talks to the actual helpdesk.
///
/// Implementations own login sessions, markup scraping, and download
/// mechanics; callers get tickets and files. `download_attachments` must
/// leave files in the ticket's inbox folder under the names listed in
/// the ticket metadata.
pub trait TicketSource {
    fn list_tickets(&mut self, status: &str) -> anyhow::Result<Vec<TicketSummary>>;
    fn read_ticket(&mut self, ticket_id: &str) -> anyhow::Result<Ticket>;
    fn download_attachments(&mut self, ticket: &Ticket) -> anyhow::Result<Vec<String>>;
    fn resolve_ticket(&mut self, ticket_id: &str, message: &str) -> anyhow::Result<bool>;
}

//! Localized string tables.
//!
//! Every label the tool prints is a typed field with a hard-coded English
//! default, independently overridable from the `[strings.*]` sections of
//! the config file. Typed fields (instead of a free-form map) make a
//! misspelled key a build error rather than a silent fallback.

use serde::{Deserialize, Serialize};

macro_rules! default_fns {
    ($($name:ident => $value:expr;)*) => {
        $(fn $name() -> String { $value.to_string() })*
    };
}

default_fns! {
    d_lang => "en";
    d_empty => "";
    d_ticket => "Ticket";
    d_subject => "Subject";
    d_sender => "Sender";
    d_email => "Email";
    d_created => "Created";
    d_status => "Status";
    d_processed => "Processed";
    d_message => "Message";
    d_attachments => "Attachments";
    d_no_attachments_pdf => "No attachments.";
    d_no_attachments => "No attachments";
    d_compressed => "compressed";
    d_original => "original";
    d_summary => "Summary (Typst)";
    d_source => "Source";
    d_target => "Target";
    d_pages => "Pages";
    d_already_exists => "receipt already exists";
    d_use_force => "Use --force to overwrite.";
    d_no_open_tickets => "No open tickets.";
    d_open_tickets_header => "Open tickets";
    d_total => "Total: {count} tickets";
    d_resolve_header => "Ticket resolution";
    d_all_resolved => "All {count} tickets resolved successfully.";
    d_resolve_summary => "Resolved: {succeeded}, failed: {failed}";
    d_error => "Error";
    d_generation_failed => "Receipt generation failed";
}

/// Labels rendered into the cover page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfStrings {
    #[serde(default = "d_lang")]
    pub lang: String,
    /// Optional heading shown above "Ticket #<id>"; empty means no heading.
    #[serde(default = "d_empty")]
    pub title: String,
    #[serde(default = "d_ticket")]
    pub ticket: String,
    #[serde(default = "d_subject")]
    pub subject: String,
    #[serde(default = "d_sender")]
    pub sender: String,
    #[serde(default = "d_created")]
    pub created: String,
    #[serde(default = "d_processed")]
    pub processed: String,
    #[serde(default = "d_message")]
    pub message: String,
    #[serde(default = "d_attachments")]
    pub attachments: String,
    #[serde(default = "d_no_attachments_pdf")]
    pub no_attachments: String,
}

/// Status phrases used in the archiver's textual report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiverStrings {
    #[serde(default = "d_compressed")]
    pub compressed: String,
    #[serde(default = "d_original")]
    pub original: String,
    #[serde(default = "d_summary")]
    pub summary: String,
    #[serde(default = "d_source")]
    pub source: String,
    #[serde(default = "d_target")]
    pub target: String,
    #[serde(default = "d_pages")]
    pub pages: String,
    #[serde(default = "d_already_exists")]
    pub already_exists: String,
    #[serde(default = "d_use_force")]
    pub use_force: String,
}

/// Labels for ticket list/detail/resolution output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterStrings {
    #[serde(default = "d_ticket")]
    pub ticket: String,
    #[serde(default = "d_subject")]
    pub subject: String,
    #[serde(default = "d_sender")]
    pub sender: String,
    #[serde(default = "d_email")]
    pub email: String,
    #[serde(default = "d_created")]
    pub created: String,
    #[serde(default = "d_status")]
    pub status: String,
    #[serde(default = "d_message")]
    pub message: String,
    #[serde(default = "d_attachments")]
    pub attachments: String,
    #[serde(default = "d_no_attachments")]
    pub no_attachments: String,
    #[serde(default = "d_no_open_tickets")]
    pub no_open_tickets: String,
    #[serde(default = "d_open_tickets_header")]
    pub open_tickets_header: String,
    /// `{count}` is substituted with the ticket total.
    #[serde(default = "d_total")]
    pub total: String,
    #[serde(default = "d_resolve_header")]
    pub resolve_header: String,
    /// `{count}` is substituted with the resolved total.
    #[serde(default = "d_all_resolved")]
    pub all_resolved: String,
    /// `{succeeded}` and `{failed}` are substituted with counts.
    #[serde(default = "d_resolve_summary")]
    pub resolve_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliStrings {
    #[serde(default = "d_error")]
    pub error: String,
    #[serde(default = "d_generation_failed")]
    pub generation_failed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Strings {
    pub pdf: PdfStrings,
    pub archiver: ArchiverStrings,
    pub formatter: FormatterStrings,
    pub cli: CliStrings,
}

impl Default for PdfStrings {
    fn default() -> Self {
        Self {
            lang: d_lang(),
            title: d_empty(),
            ticket: d_ticket(),
            subject: d_subject(),
            sender: d_sender(),
            created: d_created(),
            processed: d_processed(),
            message: d_message(),
            attachments: d_attachments(),
            no_attachments: d_no_attachments_pdf(),
        }
    }
}

impl Default for ArchiverStrings {
    fn default() -> Self {
        Self {
            compressed: d_compressed(),
            original: d_original(),
            summary: d_summary(),
            source: d_source(),
            target: d_target(),
            pages: d_pages(),
            already_exists: d_already_exists(),
            use_force: d_use_force(),
        }
    }
}

impl Default for FormatterStrings {
    fn default() -> Self {
        Self {
            ticket: d_ticket(),
            subject: d_subject(),
            sender: d_sender(),
            email: d_email(),
            created: d_created(),
            status: d_status(),
            message: d_message(),
            attachments: d_attachments(),
            no_attachments: d_no_attachments(),
            no_open_tickets: d_no_open_tickets(),
            open_tickets_header: d_open_tickets_header(),
            total: d_total(),
            resolve_header: d_resolve_header(),
            all_resolved: d_all_resolved(),
            resolve_summary: d_resolve_summary(),
        }
    }
}

impl Default for CliStrings {
    fn default() -> Self {
        Self {
            error: d_error(),
            generation_failed: d_generation_failed(),
        }
    }
}

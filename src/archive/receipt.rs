//! Archive orchestrator.
//!
//! One call archives one ticket: validate the inbox, route attachments,
//! render and compile the cover page, merge everything into the final
//! PDF, and describe the result in a textual report. All intermediate
//! artifacts live in a run-private scratch directory that is removed on
//! every exit path, so the destination never sees a half-written file.

use crate::archive::classify::{AttachmentKind, classify};
use crate::archive::compress::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH, compress_image_to_pdf,
};
use crate::archive::util::format_size;
use crate::archive::{AttachmentInfo, cover, merge, warn};
use crate::config::AppConfig;
use crate::error::ArchiveError;
use crate::source::TicketRecord;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReceiptOptions {
    /// Explicit output path; defaults to `<inbox_root>/<ticket_id>.pdf`.
    pub output_path: Option<PathBuf>,
    /// Overwrite an existing output instead of short-circuiting.
    pub force: bool,
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            force: false,
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

/// Generate the merged PDF receipt for one ticket and return the report.
///
/// An existing output without `force` is not an error: the report names
/// the existing file and how to overwrite it, and nothing is touched.
pub fn generate_receipt(
    ticket_id: &str,
    config: &AppConfig,
    options: &ReceiptOptions,
) -> Result<String, ArchiveError> {
    let settings = &config.archive;
    let strings = &config.strings;

    let inbox_dir = settings.inbox_dir.join(ticket_id);
    let metadata_path = inbox_dir.join("ticket.json");
    if !inbox_dir.exists() {
        return Err(ArchiveError::InboxNotFound(inbox_dir));
    }
    if !metadata_path.exists() {
        return Err(ArchiveError::MissingMetadata {
            ticket_id: ticket_id.to_string(),
            path: metadata_path,
        });
    }

    let ticket = TicketRecord::load(&metadata_path)?;

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| settings.inbox_dir.join(format!("{ticket_id}.pdf")));

    if output_path.exists() && !options.force {
        let rel = relative_display(&output_path, &settings.work_dir);
        return Ok(format!(
            "{} {}: {}: {}\n{}",
            strings.formatter.ticket,
            ticket_id,
            strings.archiver.already_exists,
            rel,
            strings.archiver.use_force,
        ));
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Run-private scratch; the random suffix keeps concurrent runs for
    // different tickets apart. Dropped (hence removed, best-effort) on
    // every exit path below.
    fs::create_dir_all(&settings.temp_dir)?;
    let scratch = tempfile::Builder::new()
        .prefix(&format!("receipt_{ticket_id}_"))
        .tempdir_in(&settings.temp_dir)?;
    let work_dir = scratch.path();

    let mut attachments_info: Vec<AttachmentInfo> = Vec::new();
    let mut attachment_pdfs: Vec<PathBuf> = Vec::new();
    let mut page_descriptions: Vec<String> = Vec::new();

    for name in &ticket.attachments {
        let att_path = inbox_dir.join(name);
        if !att_path.exists() {
            continue;
        }

        match classify(&att_path) {
            AttachmentKind::Pdf => {
                let original_size = fs::metadata(&att_path)?.len();
                let num_pages = merge::count_pages(&att_path)?;
                attachments_info.push(AttachmentInfo {
                    name: name.clone(),
                    original_size,
                    compressed_size: None,
                    kind: AttachmentKind::Pdf,
                });
                attachment_pdfs.push(att_path);
                page_descriptions.push(format!(
                    "{name} ({}, {}, {num_pages} p.)",
                    format_size(original_size),
                    strings.archiver.original,
                ));
            }
            AttachmentKind::Image => {
                let img_pdf_path = work_dir.join(format!("{name}.pdf"));
                let (original_size, compressed_size) = compress_image_to_pdf(
                    &att_path,
                    &img_pdf_path,
                    options.max_width,
                    options.jpeg_quality,
                )?;
                attachments_info.push(AttachmentInfo {
                    name: name.clone(),
                    original_size,
                    compressed_size: Some(compressed_size),
                    kind: AttachmentKind::Image,
                });
                attachment_pdfs.push(img_pdf_path);
                page_descriptions.push(format!(
                    "{name} ({} → {}, {})",
                    format_size(original_size),
                    format_size(compressed_size),
                    strings.archiver.compressed,
                ));
            }
            AttachmentKind::Unknown => {
                warn::emit(
                    "ATTACHMENT_SKIPPED",
                    ticket_id,
                    name,
                    "neither-image-nor-pdf",
                );
            }
        }
    }

    // The logo must sit next to the scratch source so the template can
    // reference it by bare filename.
    if let Some(logo) = settings.logo_path.as_deref() {
        if logo.exists() {
            if let Some(logo_name) = logo.file_name() {
                fs::copy(logo, work_dir.join(logo_name))?;
            }
        }
    }

    let cover_source = cover::generate_cover_source(&ticket, &attachments_info, settings, strings)?;
    let cover_pdf = work_dir.join("cover.pdf");
    cover::compile_cover(
        &cover_source,
        &cover_pdf,
        work_dir,
        settings.typst_bin.as_deref(),
    )?;

    let mut all_pdfs = vec![cover_pdf];
    all_pdfs.extend(attachment_pdfs);
    let total_pages = merge::merge_pdfs(&all_pdfs, &output_path)?;

    let output_size = fs::metadata(&output_path)?.len();
    let inbox_rel = relative_display(&settings.inbox_dir, &settings.work_dir);
    let target_rel = relative_display(&output_path, &settings.work_dir);

    let mut lines = vec![
        format!("{} {ticket_id}", strings.formatter.ticket),
        format!("  {}:   {inbox_rel}/{ticket_id}/", strings.archiver.source),
        format!("  {}:   {target_rel}", strings.archiver.target),
        format!(
            "  {}:   {total_pages} ({})",
            strings.archiver.pages,
            format_size(output_size)
        ),
        format!("    1    {}", strings.archiver.summary),
    ];
    for (i, desc) in page_descriptions.iter().enumerate() {
        lines.push(format!("    {}   {desc}", i + 2));
    }

    Ok(lines.join("\n"))
}

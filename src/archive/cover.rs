//! Cover-page rendering and compilation.
//!
//! The cover page summarizes ticket metadata and the attachment list.
//! Rendering is plain text substitution into a Typst template; the
//! external `typst` compiler turns the result into a single-page PDF.

use crate::archive::AttachmentInfo;
use crate::archive::classify::AttachmentKind;
use crate::archive::dates::parse_ticket_date;
use crate::archive::util::format_size;
use crate::assets::DEFAULT_TEMPLATE;
use crate::config::ArchiveSettings;
use crate::error::ArchiveError;
use crate::source::TicketRecord;
use crate::strings::Strings;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Typst metacharacters that must be escaped in free text.
const TYPST_SPECIALS: [char; 10] = ['\\', '#', '*', '_', '`', '<', '>', '@', '$', '~'];

/// Prefix every Typst metacharacter with a backslash. Characters outside
/// the set pass through untouched.
pub fn escape_typst(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if TYPST_SPECIALS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// `d.m.yyyy` without leading zeros.
fn display_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

fn attachment_line(info: &AttachmentInfo, strings: &Strings) -> String {
    let name = escape_typst(&info.name);
    let orig = format_size(info.original_size);
    match (info.kind, info.compressed_size) {
        (AttachmentKind::Image, Some(compressed)) => format!(
            "+ {name} ({orig} → {comp}, {label})",
            comp = format_size(compressed),
            label = strings.archiver.compressed,
        ),
        (AttachmentKind::Pdf, _) => {
            format!("+ {name} ({orig}, {label})", label = strings.archiver.original)
        }
        _ => format!("+ {name} ({orig})"),
    }
}

/// Fill the cover template with ticket metadata and attachment summaries.
///
/// Free-text fields are escaped against Typst metacharacters. A creation
/// date that does not parse is shown verbatim rather than failing the
/// render. Placeholders the substitution set does not know pass through
/// unchanged.
pub fn generate_cover_source(
    ticket: &TicketRecord,
    attachments: &[AttachmentInfo],
    settings: &ArchiveSettings,
    strings: &Strings,
) -> Result<String, ArchiveError> {
    let date_display = match parse_ticket_date(&ticket.created) {
        Ok(date) => display_date(date),
        Err(_) => ticket.created.clone(),
    };
    let today_display = display_date(chrono::Local::now().date_naive());

    let attachments_block = if attachments.is_empty() {
        strings.pdf.no_attachments.clone()
    } else {
        attachments
            .iter()
            .map(|info| attachment_line(info, strings))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let logo_block = match settings.logo_path.as_deref() {
        Some(logo) if logo.exists() => {
            let name = logo
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("#image(\"{name}\", width: 40%)")
        }
        _ => String::new(),
    };

    let pdf_title = strings.pdf.title.trim();
    let (title_block, document_title) = if pdf_title.is_empty() {
        (
            format!("#text(size: 16pt, weight: \"bold\")[Ticket \\#{}]", ticket.id),
            format!("Ticket #{}", ticket.id),
        )
    } else {
        (
            format!(
                "#text(size: 16pt, weight: \"bold\")[{pdf_title}]\n  #v(0.1cm)\n  #text(size: 12pt)[Ticket \\#{}]",
                ticket.id
            ),
            format!("{pdf_title} - Ticket #{}", ticket.id),
        )
    };

    let template = match settings.template_path.as_deref() {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let substitutions: &[(&str, String)] = &[
        ("document_title", document_title),
        ("title_block", title_block),
        ("ticket_id", ticket.id.clone()),
        ("ticket_number", ticket.number.clone()),
        ("logo_block", logo_block),
        ("subject", escape_typst(&ticket.subject)),
        ("user_name", escape_typst(&ticket.user.name)),
        ("date_display", date_display),
        ("today_display", today_display),
        ("message", escape_typst(&ticket.message)),
        ("attachments_block", attachments_block),
        ("lang", strings.pdf.lang.clone()),
        ("lbl_ticket", strings.pdf.ticket.clone()),
        ("lbl_subject", strings.pdf.subject.clone()),
        ("lbl_sender", strings.pdf.sender.clone()),
        ("lbl_created", strings.pdf.created.clone()),
        ("lbl_processed", strings.pdf.processed.clone()),
        ("lbl_message", strings.pdf.message.clone()),
        ("lbl_attachments", strings.pdf.attachments.clone()),
    ];

    let mut source = template;
    for (key, value) in substitutions {
        source = source.replace(&format!("${{{key}}}"), value);
    }
    Ok(source)
}

fn resolve_typst_bin(configured: Option<&Path>) -> Result<PathBuf, ArchiveError> {
    if let Some(bin) = configured {
        if bin.exists() {
            return Ok(bin.to_path_buf());
        }
    }
    which::which("typst").map_err(|_| ArchiveError::Compile {
        stderr: "typst binary not found in TYPST_BIN or PATH".to_string(),
    })
}

/// Compile Typst source to a single-page PDF.
///
/// The source goes into a uniquely-named scratch file inside `work_dir`,
/// next to any resources it references (logo). The scratch file is
/// removed on every exit path; a nonzero compiler exit surfaces as
/// [`ArchiveError::Compile`] with the captured diagnostics.
pub fn compile_cover(
    source: &str,
    output_path: &Path,
    work_dir: &Path,
    typst_bin: Option<&Path>,
) -> Result<(), ArchiveError> {
    fs::create_dir_all(work_dir)?;

    let mut scratch = tempfile::Builder::new()
        .prefix("cover_")
        .suffix(".typ")
        .tempfile_in(work_dir)?;
    scratch.write_all(source.as_bytes())?;
    scratch.flush()?;

    let bin = resolve_typst_bin(typst_bin)?;
    let output = Command::new(&bin)
        .arg("compile")
        .arg(scratch.path())
        .arg(output_path)
        .output()?;

    if !output.status.success() {
        return Err(ArchiveError::Compile {
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(work_dir: &Path) -> ArchiveSettings {
        ArchiveSettings {
            work_dir: work_dir.to_path_buf(),
            inbox_dir: work_dir.join("inbox"),
            receipts_dir: work_dir.join("receipts"),
            temp_dir: work_dir.join(".tmp"),
            logo_path: None,
            template_path: None,
            typst_bin: None,
            default_label: "expense".to_string(),
            max_width: 800,
            jpeg_quality: 75,
        }
    }

    fn ticket() -> TicketRecord {
        serde_json::from_str(
            r#"{
                "id": "339",
                "number": "656694",
                "user": {"name": "John Smith", "email": "john@example.com"},
                "created": "1/3/26 9:20 PM",
                "subject": "Catering Jan 4",
                "message": "Test message 29.59€"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn escapes_each_metacharacter_exactly_once() {
        assert_eq!(escape_typst("test #339"), "test \\#339");
        assert_eq!(escape_typst("*bold*"), "\\*bold\\*");
        assert_eq!(escape_typst("$100"), "\\$100");
        assert_eq!(escape_typst("hello world"), "hello world");
    }

    #[test]
    fn euro_sign_passes_through_unescaped() {
        assert_eq!(escape_typst("29.59€"), "29.59€");
    }

    #[test]
    fn backslash_is_escaped_before_anything_else() {
        assert_eq!(escape_typst("a\\b"), "a\\\\b");
    }

    #[test]
    fn cover_source_carries_ticket_fields_and_attachment_labels() {
        let tmp = tempdir().unwrap();
        let attachments = vec![
            AttachmentInfo {
                name: "receipt.pdf".to_string(),
                original_size: 114_000,
                compressed_size: None,
                kind: AttachmentKind::Pdf,
            },
            AttachmentInfo {
                name: "photo.jpg".to_string(),
                original_size: 5_000_000,
                compressed_size: Some(87_000),
                kind: AttachmentKind::Image,
            },
        ];

        let source =
            generate_cover_source(&ticket(), &attachments, &settings(tmp.path()), &Strings::default())
                .unwrap();

        assert!(source.contains("Ticket \\#339"));
        assert!(source.contains("656694"));
        assert!(source.contains("John Smith"));
        assert!(source.contains("3.1.2026"));
        assert!(source.contains("+ receipt.pdf (111 KB, original)"));
        assert!(source.contains("+ photo.jpg (4.8 MB → 85 KB, compressed)"));
    }

    #[test]
    fn free_text_is_escaped() {
        let tmp = tempdir().unwrap();
        let mut ticket = ticket();
        ticket.subject = "Test #special *chars*".to_string();
        ticket.message = "Price: $100".to_string();

        let source =
            generate_cover_source(&ticket, &[], &settings(tmp.path()), &Strings::default()).unwrap();

        assert!(source.contains("\\#special"));
        assert!(source.contains("\\*chars\\*"));
        assert!(source.contains("\\$100"));
    }

    #[test]
    fn unparseable_created_date_is_shown_verbatim() {
        let tmp = tempdir().unwrap();
        let mut ticket = ticket();
        ticket.created = "sometime last week".to_string();

        let source =
            generate_cover_source(&ticket, &[], &settings(tmp.path()), &Strings::default()).unwrap();

        assert!(source.contains("sometime last week"));
    }

    #[test]
    fn no_attachments_uses_the_localized_fallback() {
        let tmp = tempdir().unwrap();
        let source =
            generate_cover_source(&ticket(), &[], &settings(tmp.path()), &Strings::default()).unwrap();
        assert!(source.contains("No attachments."));
    }

    #[test]
    fn logo_reference_appears_only_when_the_file_exists() {
        let tmp = tempdir().unwrap();
        let mut with_logo = settings(tmp.path());
        let logo = tmp.path().join("logo.png");
        image::RgbImage::from_pixel(10, 10, image::Rgb([255, 0, 0]))
            .save(&logo)
            .unwrap();
        with_logo.logo_path = Some(logo);

        let source =
            generate_cover_source(&ticket(), &[], &with_logo, &Strings::default()).unwrap();
        assert!(source.contains("#image(\"logo.png\", width: 40%)"));

        let without =
            generate_cover_source(&ticket(), &[], &settings(tmp.path()), &Strings::default())
                .unwrap();
        assert!(!without.contains("#image"));
    }

    #[test]
    fn configured_title_is_rendered_above_the_ticket_line() {
        let tmp = tempdir().unwrap();
        let mut strings = Strings::default();
        strings.pdf.title = "Expense receipts".to_string();

        let source =
            generate_cover_source(&ticket(), &[], &settings(tmp.path()), &strings).unwrap();

        assert!(source.contains("Expense receipts"));
        assert!(source.contains("Expense receipts - Ticket #339"));
        assert!(source.contains("Ticket \\#339"));
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let tmp = tempdir().unwrap();
        let template = tmp.path().join("custom.typ");
        fs::write(&template, "${subject} and ${mystery_key}").unwrap();
        let mut settings = settings(tmp.path());
        settings.template_path = Some(template);

        let source =
            generate_cover_source(&ticket(), &[], &settings, &Strings::default()).unwrap();

        assert!(source.contains("Catering Jan 4"));
        assert!(source.contains("${mystery_key}"));
    }
}

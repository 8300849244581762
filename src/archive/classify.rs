//! Attachment classification.
//!
//! Extensions decide when present; extensionless files are sniffed by
//! content. Anything that is neither an image nor a PDF is `Unknown` and
//! gets skipped by the orchestrator rather than failing the run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

const PDF_MAGIC: &[u8; 5] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Unknown,
}

pub fn classify(path: &Path) -> AttachmentKind {
    if is_pdf_file(path) {
        AttachmentKind::Pdf
    } else if is_image_file(path) {
        AttachmentKind::Image
    } else {
        AttachmentKind::Unknown
    }
}

/// True for known raster-image extensions; extensionless files are sniffed
/// via the image format detector. Sniffing failures mean "not an image".
pub fn is_image_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str());
    }

    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map(|reader| reader.format().is_some())
        .unwrap_or(false)
}

/// True for the `.pdf` extension; extensionless files must start with the
/// `%PDF-` magic header.
pub fn is_pdf_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return ext.eq_ignore_ascii_case("pdf");
    }

    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut header = [0u8; 5];
    match file.read_exact(&mut header) {
        Ok(()) => &header == PDF_MAGIC,
        Err(_) => false,
    }
}

//! Image attachment compression.
//!
//! Every image attachment becomes a single-page PDF: decoded, flattened
//! to RGB (PDF has no alpha), optionally downscaled, then re-encoded as a
//! JPEG wrapped in a one-page document. Re-encoding from the pixel buffer
//! also drops any embedded metadata such as EXIF.

use crate::error::ArchiveError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

const COMPRESS_DPI: f32 = 150.0;
const FALLBACK_DPI: f32 = 72.0;

/// Compress an image attachment into a single-page PDF.
///
/// Returns `(original_size, compressed_size)` in bytes. When the quality
/// settings inflate an already-small source above its original size, the
/// conversion is redone at full resolution with the encoder's default
/// quality and 72 DPI, so the output stays bounded by the source size.
pub fn compress_image_to_pdf(
    image_path: &Path,
    output_path: &Path,
    max_width: u32,
    jpeg_quality: u8,
) -> Result<(u64, u64), ArchiveError> {
    let original_size = fs::metadata(image_path)?.len();

    let rgb = load_flattened_rgb(image_path)?;

    let scaled = if rgb.width() > max_width {
        let new_height = (f64::from(rgb.height()) * f64::from(max_width)
            / f64::from(rgb.width()))
        .round()
        .max(1.0) as u32;
        image::imageops::resize(&rgb, max_width, new_height, FilterType::Lanczos3)
    } else {
        rgb.clone()
    };

    let jpeg = encode_jpeg(&scaled, jpeg_quality)?;
    write_image_pdf(&jpeg, scaled.width(), scaled.height(), COMPRESS_DPI, output_path)?;
    let mut compressed_size = fs::metadata(output_path)?.len();

    if compressed_size > original_size {
        let jpeg = encode_jpeg(&rgb, DEFAULT_JPEG_QUALITY)?;
        write_image_pdf(&jpeg, rgb.width(), rgb.height(), FALLBACK_DPI, output_path)?;
        compressed_size = fs::metadata(output_path)?.len();
    }

    Ok((original_size, compressed_size))
}

fn load_flattened_rgb(path: &Path) -> Result<RgbImage, ArchiveError> {
    let img = image::open(path).map_err(|source| ArchiveError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(flatten_onto_white(&img))
}

/// Composite an image onto an opaque white background, yielding RGB.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = u32::from(px[3]);
        let blend =
            |c: u8| -> u8 { ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8 };
        out.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }
    out
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ArchiveError> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(img)
        .map_err(|err| ArchiveError::Io(std::io::Error::other(err)))?;
    Ok(buf)
}

/// Wrap an encoded JPEG in a one-page PDF sized so the image fills the
/// page at the given DPI. The JPEG bytes are embedded verbatim as a
/// DCTDecode stream.
fn write_image_pdf(
    jpeg: &[u8],
    width_px: u32,
    height_px: u32,
    dpi: f32,
    output_path: &Path,
) -> Result<(), ArchiveError> {
    let width_pt = width_px as f32 * 72.0 / dpi;
    let height_pt = height_px as f32 * 72.0 / dpi;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width_px as i64,
            "Height" => height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg.to_vec(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width_pt),
                    0.into(),
                    0.into(),
                    Object::Real(height_pt),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content
            .encode()
            .map_err(|err| ArchiveError::Io(std::io::Error::other(err)))?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(width_pt), Object::Real(height_pt)],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(output_path)
        .map_err(|err| ArchiveError::Io(std::io::Error::other(err)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn page_count(path: &Path) -> usize {
        Document::load(path).expect("load generated pdf").get_pages().len()
    }

    /// Deterministic per-pixel noise so PNG cannot compress the source
    /// down below the JPEG output.
    fn noisy_rgba(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
            Rgba([
                (v % 251) as u8,
                (v.wrapping_mul(7) % 241) as u8,
                (v.wrapping_mul(13) % 239) as u8,
                200,
            ])
        })
    }

    #[test]
    fn oversized_image_is_resized_and_converted() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("large.jpg");
        let img = RgbImage::from_pixel(1600, 1200, Rgb([220, 30, 30]));
        img.save(&src).unwrap();

        let out = tmp.path().join("large.pdf");
        let (orig, comp) = compress_image_to_pdf(&src, &out, 800, 75).unwrap();

        assert!(orig > 0);
        assert!(comp > 0);
        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn oversized_rgba_never_exceeds_source_size() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("noisy.png");
        noisy_rgba(1600, 1200).save(&src).unwrap();

        let out = tmp.path().join("noisy.pdf");
        let (orig, comp) = compress_image_to_pdf(&src, &out, 800, 75).unwrap();

        assert!(comp <= orig, "compressed {comp} exceeds original {orig}");
        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn small_image_still_produces_a_valid_page() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("small.jpg");
        let img = RgbImage::from_pixel(400, 300, Rgb([20, 20, 200]));
        img.save(&src).unwrap();

        let out = tmp.path().join("small.pdf");
        compress_image_to_pdf(&src, &out, 800, 75).unwrap();

        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn transparent_image_is_flattened_without_error() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("transparent.png");
        let img = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 128]));
        img.save(&src).unwrap();

        let out = tmp.path().join("transparent.pdf");
        compress_image_to_pdf(&src, &out, 800, 75).unwrap();

        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn corrupt_input_is_a_decode_error() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("broken.png");
        std::fs::write(&src, b"definitely not a png").unwrap();

        let out = tmp.path().join("broken.pdf");
        let err = compress_image_to_pdf(&src, &out, 800, 75).unwrap_err();
        assert!(matches!(err, ArchiveError::Decode { .. }));
    }

    #[test]
    fn flattening_blends_half_alpha_toward_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let flat = flatten_onto_white(&img);
        let px = flat.get_pixel(0, 0);
        // 50% black over white lands mid-gray.
        assert!(px[0] > 120 && px[0] < 135);
    }
}

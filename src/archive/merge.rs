//! PDF concatenation.
//!
//! Inputs are loaded fully, renumbered into one object space, and saved
//! once at the end. A corrupt input fails the whole merge before anything
//! is written, so the destination never holds a partial document.

use crate::error::ArchiveError;
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn merge_failed(path: &Path, reason: impl ToString) -> ArchiveError {
    ArchiveError::Merge {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Number of pages in a single PDF file.
pub fn count_pages(path: &Path) -> Result<usize, ArchiveError> {
    let doc = Document::load(path).map_err(|err| merge_failed(path, err))?;
    Ok(doc.get_pages().len())
}

/// Concatenate `paths` into `output_path`, preserving input order.
/// Returns the total page count across all inputs.
pub fn merge_pdfs(paths: &[PathBuf], output_path: &Path) -> Result<usize, ArchiveError> {
    let mut max_id = 1u32;
    // Pages kept as a Vec: object ids within one document are not
    // guaranteed to follow page order, so a map keyed by id would not do.
    let mut page_objects: Vec<(ObjectId, Object)> = Vec::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in paths {
        let mut doc = Document::load(path).map_err(|err| merge_failed(path, err))?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, object_id) in doc.get_pages() {
            let object = doc
                .get_object(object_id)
                .map_err(|err| merge_failed(path, err))?
                .clone();
            page_objects.push((object_id, object));
        }
        all_objects.extend(doc.objects);
    }

    if page_objects.is_empty() {
        return Err(merge_failed(output_path, "no pages to merge"));
    }

    let mut merged = Document::with_version("1.5");
    let mut pages_dict: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in all_objects {
        match object.type_name().unwrap_or("") {
            "Catalog" | "Outlines" | "Outline" => {}
            "Pages" => {
                if let Ok(dict) = object.as_dict() {
                    if let Some((_, merged_dict)) = pages_dict.as_mut() {
                        merged_dict.extend(dict);
                    } else {
                        pages_dict = Some((object_id, dict.clone()));
                    }
                }
            }
            "Page" => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let Some((pages_id, mut pages)) = pages_dict else {
        return Err(merge_failed(output_path, "inputs carry no page tree"));
    };

    for (object_id, object) in &page_objects {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    pages.set("Count", page_objects.len() as i64);
    pages.set(
        "Kids",
        page_objects
            .iter()
            .map(|(id, _)| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.keys().map(|id| id.0).max().unwrap_or(1);
    merged.renumber_objects();
    merged.compress();

    merged
        .save(output_path)
        .map_err(|err| merge_failed(output_path, err))?;
    Ok(page_objects.len())
}

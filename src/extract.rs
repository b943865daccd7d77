// src/extract.rs

use lopdf::Document;
use std::path::Path;
use tracing::{info, warn};

/// What we could get out of an uploaded file without calling OCR.
#[derive(Debug)]
pub enum DocText {
    /// Born-digital document with a usable text layer.
    Text(String),
    /// Image upload or image-only PDF: OCR is the only way to get text.
    NeedsOcr,
    /// The bytes could not be read as the format the extension claims.
    Unreadable(String),
}

/// Upload extensions accepted by the intake endpoints.
const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "doc", "docx", "xls", "xlsx", "tiff", "tif",
];

/// Below this many non-whitespace characters a PDF's text layer is assumed
/// to be empty or residue, and the file is routed to OCR instead.
const MIN_TEXT_CHARS: usize = 30;

/// If at least this fraction of pages carry images but no fonts, the whole
/// PDF is treated as a scan.
const SCANNED_PAGE_RATIO: f64 = 0.8;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

pub fn is_allowed_upload(path: &Path) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension(path).as_str())
}

/// MIME type sent to the OCR processor. Anything we cannot place is sent
/// as PDF and left for the processor to reject.
pub fn mime_type(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tiff" | "tif" => "image/tiff",
        _ => "application/pdf",
    }
}

/// Decide how to get text out of an upload.
///
/// PDFs are tried locally first: a structural pass flags image-only scans,
/// then `pdf-extract` pulls the text layer. Everything that is not a
/// born-digital PDF goes to OCR.
pub fn classify(path: &Path, bytes: &[u8]) -> DocText {
    if extension(path) != "pdf" {
        return DocText::NeedsOcr;
    }

    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => return DocText::Unreadable(format!("failed to parse PDF: {e}")),
    };

    let ratio = image_only_ratio(&doc);
    if ratio >= SCANNED_PAGE_RATIO {
        info!(ratio = format!("{ratio:.2}"), "Image-only PDF — needs OCR");
        return DocText::NeedsOcr;
    }

    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => {
            let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
            if meaningful < MIN_TEXT_CHARS {
                info!(chars = meaningful, "Text layer too thin — routing to OCR");
                DocText::NeedsOcr
            } else {
                info!(chars = meaningful, "Text layer extracted locally");
                DocText::Text(text)
            }
        }
        Err(e) => {
            warn!(error = %e, "pdf-extract failed — routing to OCR");
            DocText::NeedsOcr
        }
    }
}

/// Fraction of pages that have XObject images but no Font resources.
/// Such pages are almost certainly scans.
fn image_only_ratio(doc: &Document) -> f64 {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return 0.0;
    }

    let mut image_only = 0usize;
    for object_id in pages.values() {
        let Ok(page) = doc.get_object(*object_id).and_then(|obj| obj.as_dict()) else {
            continue;
        };
        let has_fonts = page_resource_nonempty(doc, page, b"Font");
        let has_images = page_resource_nonempty(doc, page, b"XObject");
        if has_images && !has_fonts {
            image_only += 1;
        }
    }

    image_only as f64 / pages.len() as f64
}

/// Whether the page's `Resources` dictionary holds a non-empty entry under
/// `key`, following indirect references along the way.
fn page_resource_nonempty(doc: &Document, page: &lopdf::Dictionary, key: &[u8]) -> bool {
    page.get(b"Resources")
        .ok()
        .and_then(|res| doc.dereference(res).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .and_then(|res| res.get(key).ok())
        .and_then(|entry| doc.dereference(entry).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .is_some_and(|dict| !dict.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_pdf_bytes_are_unreadable() {
        let result = classify(Path::new("upload.pdf"), b"this is not a pdf");
        assert!(matches!(result, DocText::Unreadable(_)));
    }

    #[test]
    fn image_uploads_always_need_ocr() {
        let result = classify(Path::new("scan.jpg"), b"\xff\xd8\xff\xe0");
        assert!(matches!(result, DocText::NeedsOcr));
    }

    #[test]
    fn upload_extension_allow_list() {
        assert!(is_allowed_upload(Path::new("packing_list.PDF")));
        assert!(is_allowed_upload(Path::new("invoice.xlsx")));
        assert!(!is_allowed_upload(Path::new("script.exe")));
        assert!(!is_allowed_upload(Path::new("no_extension")));
    }

    #[test]
    fn mime_types_for_ocr() {
        assert_eq!(mime_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("a.TIF")), "image/tiff");
        assert_eq!(mime_type(Path::new("a.png")), "image/png");
        assert_eq!(mime_type(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_type(Path::new("a.docx")), "application/pdf");
    }
}

// src/intake.rs

use crate::config::Config;
use crate::docai;
use crate::extract::{self, DocText};
use crate::resolver::{self, InvoiceReport, PackingListReport};
use reqwest::Client;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Run the packing-list workflow on an uploaded file: get text, detect the
/// trade term, resolve the job's document requirements.
pub async fn process_packing_list_file(
    path: &Path,
    cfg: &Config,
) -> Result<PackingListReport, Box<dyn std::error::Error>> {
    let text = acquire_text(path, cfg).await?;
    let report = resolver::process_packing_list(&text);
    info!(
        file = %path.display(),
        detected = report.resolution.detected,
        term = ?report.resolution.term,
        category = ?report.resolution.category,
        needs_freight = report.resolution.needs_freight,
        "Packing list processed"
    );
    Ok(report)
}

/// Run the invoice workflow on an uploaded file, pulling misc charges when
/// the resolved trade term asked for them.
pub async fn process_invoice_file(
    path: &Path,
    extract_misc: bool,
    cfg: &Config,
) -> Result<InvoiceReport, Box<dyn std::error::Error>> {
    let text = acquire_text(path, cfg).await?;
    let report = resolver::process_invoice(&text, extract_misc);
    info!(
        file = %path.display(),
        text_length = report.text_length,
        misc_charges = ?report.misc_charges,
        "Invoice processed"
    );
    Ok(report)
}

/// Get plain text for an upload, OCR-ing when there is no text layer.
///
/// Extraction and OCR failures degrade to empty text: a document we cannot
/// read is reported downstream as "nothing detected", not as an error.
/// Only a rejected file type or an unreadable path is a real error.
async fn acquire_text(path: &Path, cfg: &Config) -> Result<String, Box<dyn std::error::Error>> {
    if !extract::is_allowed_upload(path) {
        return Err(format!("file type not allowed: {}", path.display()).into());
    }

    let bytes = fs::read(path)?;
    info!(file = %path.display(), bytes = bytes.len(), "Processing upload");

    match extract::classify(path, &bytes) {
        DocText::Text(text) => Ok(text),
        DocText::NeedsOcr => {
            let client = Client::new();
            match docai::ocr_document(&client, &cfg.docai, &bytes, extract::mime_type(path)).await
            {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!(error = %e, "OCR failed — continuing with empty text");
                    Ok(String::new())
                }
            }
        }
        DocText::Unreadable(reason) => {
            warn!(reason = %reason, "Unreadable upload — continuing with empty text");
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_extension_is_rejected() {
        let cfg: Config = toml::from_str(
            r#"
            [document_ai]
            endpoint = "https://us-documentai.googleapis.com/v1"
            project_id = "broker-ocr"
            "#,
        )
        .unwrap();

        let err = tokio_test(acquire_text(Path::new("malware.exe"), &cfg)).unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    fn tokio_test<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(fut)
    }
}

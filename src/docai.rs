// src/docai.rs

use crate::config::DocumentAiConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest {
    raw_document: RawDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    /// Base64-encoded file bytes.
    content: String,
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Deserialize)]
struct ProcessedDocument {
    #[serde(default)]
    text: String,
}

/// OCR a document through the hosted Document AI processor and return the
/// plain text it read.
///
/// The bearer token comes from `DOCAI_ACCESS_TOKEN`; endpoint, processor
/// and timeout come from the `[document_ai]` config section.
pub async fn ocr_document(
    client: &Client,
    cfg: &DocumentAiConfig,
    bytes: &[u8],
    mime_type: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let token = std::env::var("DOCAI_ACCESS_TOKEN")
        .map_err(|_| "DOCAI_ACCESS_TOKEN env var required for OCR")?;

    let url = format!(
        "{}/{}:process",
        cfg.endpoint.trim_end_matches('/'),
        cfg.processor_name()
    );

    let request = ProcessRequest {
        raw_document: RawDocument {
            content: STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        },
    };

    info!(url = %url, bytes = bytes.len(), mime = mime_type, "Sending document for OCR");

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {token}"))
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Document AI error {status}: {body}").into());
    }

    let parsed: ProcessResponse = response.json().await?;
    let text = parsed.document.map(|doc| doc.text).unwrap_or_default();
    info!(chars = text.len(), "OCR text received");
    Ok(text)
}

use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "document_ai")]
    pub docai: DocumentAiConfig,
}

/// Connection settings for the external Document AI OCR processor.
/// Credentials are never stored here; the access token is read from the
/// `DOCAI_ACCESS_TOKEN` env var at request time.
#[derive(Debug, Deserialize)]
pub struct DocumentAiConfig {
    pub endpoint: String,
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_processor")]
    pub processor: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_location() -> String {
    "us".to_string()
}

fn default_processor() -> String {
    "pretrained-ocr-v2.0-2021-04-02".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl DocumentAiConfig {
    /// Fully qualified processor resource name.
    pub fn processor_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, self.processor
        )
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [document_ai]
            endpoint = "https://us-documentai.googleapis.com/v1"
            project_id = "broker-ocr"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.docai.location, "us");
        assert_eq!(cfg.docai.processor, "pretrained-ocr-v2.0-2021-04-02");
        assert_eq!(cfg.docai.timeout_secs, 30);
        assert_eq!(
            cfg.docai.processor_name(),
            "projects/broker-ocr/locations/us/processors/pretrained-ocr-v2.0-2021-04-02"
        );
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [document_ai]
            endpoint = "https://eu-documentai.googleapis.com/v1"
            project_id = "broker-ocr"
            location = "eu"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.docai.location, "eu");
        assert_eq!(cfg.docai.timeout_secs, 5);
    }
}

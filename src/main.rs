mod config;
mod docai;
mod extract;
mod intake;
mod resolver;

use std::path::Path;

const DEFAULT_CONFIG: &str = ".config/doc_intake.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter("info")
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("packing-list") => {
            let file = args
                .get(2)
                .ok_or("usage: doc_intake packing-list <file> [config]")?;
            let cfg_path = args.get(3).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
            let cfg = config::Config::load(cfg_path)?;

            let report = intake::process_packing_list_file(Path::new(file), &cfg).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some("invoice") => {
            let file = args
                .get(2)
                .ok_or("usage: doc_intake invoice <file> [--extract-misc] [config]")?;
            let extract_misc = args.iter().any(|arg| arg == "--extract-misc");
            let cfg_path = args
                .iter()
                .skip(3)
                .find(|arg| !arg.starts_with("--"))
                .map(String::as_str)
                .unwrap_or(DEFAULT_CONFIG);
            let cfg = config::Config::load(cfg_path)?;

            let report =
                intake::process_invoice_file(Path::new(file), extract_misc, &cfg).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some("detect") => {
            // Offline path: text is already extracted, no OCR config needed.
            let file = args
                .get(2)
                .ok_or("usage: doc_intake detect <text-file> [--have=bl,invoice,...]")?;
            let text = std::fs::read_to_string(file)?;

            let report = resolver::process_packing_list(&text);
            println!("{}", serde_json::to_string_pretty(&report)?);

            // With --have=, also report which required documents are still
            // outstanding for the job.
            let on_file: Vec<resolver::DocKind> = args
                .iter()
                .find_map(|arg| arg.strip_prefix("--have="))
                .map(|list| list.split(',').filter_map(resolver::DocKind::parse).collect())
                .unwrap_or_default();
            if !on_file.is_empty() {
                let missing =
                    resolver::missing_docs(&report.resolution.required_docs, &on_file);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "missing_docs": missing }))?
                );
            }
        }
        _ => {
            return Err("usage: doc_intake <packing-list|invoice|detect> <file> ...".into());
        }
    }

    Ok(())
}

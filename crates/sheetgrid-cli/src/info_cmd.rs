use std::path::Path;

use crate::cli::TextFormat;
use crate::shared::open_document;

pub fn run(file: &Path, format: &TextFormat) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_count = doc.page_count();

    let mut total_tokens: usize = 0;
    let mut page_infos: Vec<serde_json::Value> = Vec::new();

    for (idx, records) in doc.pages().iter().enumerate() {
        total_tokens += records.len();
        let defect = doc.tokens(idx).err();

        match format {
            TextFormat::Text => {
                print!("Page {}: {} tokens", idx + 1, records.len());
                match defect {
                    Some(e) => println!(" ({e})"),
                    None => println!(),
                }
            }
            TextFormat::Json => {
                page_infos.push(serde_json::json!({
                    "page": idx + 1,
                    "tokens": records.len(),
                    "error": defect.map(|e| e.to_string()),
                }));
            }
        }
    }

    match format {
        TextFormat::Text => {
            println!("Pages: {page_count}");
            println!("Tokens: {total_tokens}");
        }
        TextFormat::Json => {
            let output = serde_json::json!({
                "pages": page_count,
                "tokens": total_tokens,
                "page_info": page_infos,
            });
            let json_str = serde_json::to_string_pretty(&output).map_err(|e| {
                eprintln!("Error: failed to serialize info: {e}");
                1
            })?;
            println!("{json_str}");
        }
    }

    Ok(())
}

use std::path::Path;

use sheetgrid::{GridError, RowBucket, TableReconstructor, Token, TokenDocument};

use crate::cli::{GridArgs, OutputFormat};
use crate::shared::{
    ProgressReporter, build_settings, config_error, csv_escape, open_document, resolve_pages,
};

/// Tokens of one page together with the buckets they were grouped into.
struct PageBuckets {
    tokens: Vec<Token>,
    buckets: Vec<RowBucket>,
}

impl PageBuckets {
    fn texts(&self, bucket: &RowBucket) -> Vec<&str> {
        bucket.members.iter().map(|&i| self.tokens[i].text()).collect()
    }
}

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    grid: &GridArgs,
) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let settings = build_settings(grid)?;
    let reconstructor = TableReconstructor::new(settings).map_err(|e| config_error(&e))?;
    let progress = ProgressReporter::new(page_indices.len());

    let mut results = Vec::with_capacity(page_indices.len());
    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        results.push((idx, page_buckets(&doc, &reconstructor, idx)));
    }
    progress.finish();

    match format {
        OutputFormat::Text => write_text(&results),
        OutputFormat::Json => write_json(&results)?,
        OutputFormat::Csv => write_csv(&results),
    }

    let mut failed = false;
    for (idx, result) in &results {
        if let Err(e) = result {
            eprintln!("Error on page {}: {e}", idx + 1);
            failed = true;
        }
    }
    if failed {
        return Err(1);
    }
    Ok(())
}

fn page_buckets(
    doc: &TokenDocument,
    reconstructor: &TableReconstructor,
    idx: usize,
) -> Result<PageBuckets, GridError> {
    let tokens = doc.tokens(idx)?;
    let buckets = reconstructor.buckets(&tokens);
    Ok(PageBuckets { tokens, buckets })
}

type PageResult = (usize, Result<PageBuckets, GridError>);

fn write_text(results: &[PageResult]) {
    println!("page\tkey\ty\tcount\ttexts");

    for (idx, result) in results {
        let Ok(page) = result else { continue };
        for bucket in &page.buckets {
            println!(
                "{}\t{}\t{:.2}\t{}\t{}",
                idx + 1,
                bucket.key,
                bucket.y,
                bucket.len(),
                page.texts(bucket).join(" "),
            );
        }
    }
}

fn write_json(results: &[PageResult]) -> Result<(), i32> {
    let mut all_buckets = Vec::new();

    for (idx, result) in results {
        let Ok(page) = result else { continue };
        for bucket in &page.buckets {
            all_buckets.push(serde_json::json!({
                "page": idx + 1,
                "key": bucket.key,
                "y": bucket.y,
                "count": bucket.len(),
                "texts": page.texts(bucket),
            }));
        }
    }

    let json_str = serde_json::to_string(&all_buckets).map_err(|e| {
        eprintln!("Error: failed to serialize buckets: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}

fn write_csv(results: &[PageResult]) {
    println!("page,key,y,count,texts");

    for (idx, result) in results {
        let Ok(page) = result else { continue };
        for bucket in &page.buckets {
            println!(
                "{},{},{:.2},{},{}",
                idx + 1,
                bucket.key,
                bucket.y,
                bucket.len(),
                csv_escape(&page.texts(bucket).join(" ")),
            );
        }
    }
}

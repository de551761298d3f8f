use std::path::Path;

use sheetgrid::{ReconstructSettings, Sheet, TokenDocument, Workbook};

use crate::cli::{GridArgs, OutputFormat};
use crate::shared::{
    build_settings, config_error, csv_escape, open_document, report_failures, resolve_pages,
};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    grid: &GridArgs,
    sequential: bool,
) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let settings = build_settings(grid)?;

    let workbook = build_workbook(&doc, &page_indices, &settings, sequential)?;

    match format {
        OutputFormat::Text => write_grid(&workbook),
        OutputFormat::Json => write_json(&workbook)?,
        OutputFormat::Csv => write_csv(&workbook),
    }

    if report_failures(&workbook) > 0 {
        return Err(1);
    }
    Ok(())
}

fn build_workbook(
    doc: &TokenDocument,
    page_indices: &[usize],
    settings: &ReconstructSettings,
    sequential: bool,
) -> Result<Workbook, i32> {
    let result = if sequential {
        doc.workbook_pages(page_indices, settings)
    } else {
        doc.workbook_pages_parallel(page_indices, settings)
    };
    result.map_err(|e| config_error(&e))
}

/// Render a sheet as `| a | b |` lines with every column padded to its widest cell.
fn grid_lines(sheet: &Sheet) -> Vec<String> {
    let col_count = sheet.column_count();
    let mut col_widths = vec![1usize; col_count];
    for row in &sheet.rows {
        for (ci, cell) in row.iter().enumerate() {
            col_widths[ci] = col_widths[ci].max(cell.chars().count());
        }
    }

    sheet
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = (0..col_count)
                .map(|ci| {
                    let text = row.get(ci).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", text, width = col_widths[ci])
                })
                .collect();
            format!("| {} |", cells.join(" | "))
        })
        .collect()
}

fn write_grid(workbook: &Workbook) {
    let mut sheet_num = 0;

    for (page, sheet) in workbook.sheets() {
        sheet_num += 1;
        println!(
            "--- Sheet {} (page {}, {} rows) ---",
            sheet_num,
            page + 1,
            sheet.row_count()
        );

        if sheet.is_empty() {
            println!("(no rows)");
        }
        for line in grid_lines(sheet) {
            println!("{line}");
        }
        println!();
    }

    if workbook.is_empty() {
        println!("No pages found.");
    }
}

fn write_json(workbook: &Workbook) -> Result<(), i32> {
    let entries: Vec<serde_json::Value> = workbook
        .outcomes()
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(sheet) => serde_json::json!({
                "page": outcome.page + 1,
                "rows": sheet.rows,
            }),
            Err(err) => serde_json::json!({
                "page": outcome.page + 1,
                "error": err.to_string(),
            }),
        })
        .collect();

    let json_str = serde_json::to_string(&entries).map_err(|e| {
        eprintln!("Error: failed to serialize sheets: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}

/// One block per requested page, blocks separated by a blank line.
///
/// Empty and failed pages keep their (empty) block so blocks line up with pages.
fn write_csv(workbook: &Workbook) {
    for (n, outcome) in workbook.outcomes().iter().enumerate() {
        if n > 0 {
            println!();
        }
        let Ok(sheet) = &outcome.result else { continue };

        for row in &sheet.rows {
            let cells: Vec<String> = row.iter().map(|cell| csv_escape(cell)).collect();
            println!("{}", cells.join(","));
        }
    }
}

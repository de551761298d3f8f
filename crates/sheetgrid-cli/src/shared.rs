use std::io::{self, IsTerminal, Write};
use std::path::Path;

use sheetgrid::{
    CoordinateOrigin, GridError, ReconstructSettings, RowClustering, TokenDocument, Workbook,
};

use crate::cli::{ClusteringArg, GridArgs, OriginArg};
use crate::page_range::parse_page_range;

/// Load a token document with user-friendly error messages.
///
/// A path of `-` reads from stdin. Returns `Err(1)` with a message printed to
/// stderr if the file is missing or is not a token document.
pub fn open_document(file: &Path) -> Result<TokenDocument, i32> {
    let result = if file == Path::new("-") {
        TokenDocument::from_reader(io::stdin().lock())
    } else {
        if !file.exists() {
            eprintln!("Error: file not found: {}", file.display());
            return Err(1);
        }
        TokenDocument::open_file(file)
    };

    let doc = result.map_err(|e| {
        eprintln!("Error: failed to read tokens: {e}");
        1
    })?;
    tracing::info!(pages = doc.page_count(), "loaded token document");
    Ok(doc)
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Map command-line grid options onto reconstruction settings, validating them.
pub fn build_settings(grid: &GridArgs) -> Result<ReconstructSettings, i32> {
    let settings = ReconstructSettings {
        row_tolerance: grid.row_tolerance,
        origin: match grid.origin {
            OriginArg::BottomUp => CoordinateOrigin::BottomUp,
            OriginArg::TopDown => CoordinateOrigin::TopDown,
        },
        clustering: match grid.clustering {
            ClusteringArg::Quantize => RowClustering::Quantize,
            ClusteringArg::Gap => RowClustering::Gap,
        },
    };
    settings.validate().map_err(|e| config_error(&e))?;
    Ok(settings)
}

/// Print a configuration error and return the exit code.
pub fn config_error(err: &GridError) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Print one line per failed page to stderr. Returns the number of failures.
pub fn report_failures(workbook: &Workbook) -> usize {
    let mut count = 0;
    for (page, err) in workbook.failures() {
        eprintln!("Error on page {}: {err}", page + 1);
        count += 1;
    }
    count
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or line breaks, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// A progress reporter that prints "Processing page N/M..." to stderr,
/// but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter for `total` pages.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for page `current` (1-indexed).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}

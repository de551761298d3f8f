use std::fmt;

/// Why a `--pages` value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRangeError {
    /// A part was not a number.
    NotANumber(String),
    /// Page 0 was given; pages start at 1.
    Zero,
    /// A range ran backwards (e.g. '5-2').
    Reversed { start: usize, end: usize },
    /// A page beyond the end of the document.
    Beyond { page: usize, page_count: usize },
}

impl fmt::Display for PageRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRangeError::NotANumber(part) => write!(f, "invalid page number: '{part}'"),
            PageRangeError::Zero => write!(f, "page 0 is invalid (pages start at 1)"),
            PageRangeError::Reversed { start, end } => {
                write!(f, "invalid page range: {start}-{end} runs backwards")
            }
            PageRangeError::Beyond { page, page_count } => write!(
                f,
                "page {page} exceeds document page count ({page_count})"
            ),
        }
    }
}

/// Parse a page range string like "1,3-5" into sorted, deduplicated 0-indexed pages.
///
/// Input is 1-indexed (user-facing). Output is 0-indexed (internal).
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, PageRangeError> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (page_number(start, page_count)?, page_number(end, page_count)?),
            None => {
                let page = page_number(part, page_count)?;
                (page, page)
            }
        };
        if start > end {
            return Err(PageRangeError::Reversed { start, end });
        }
        pages.extend((start - 1)..end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, PageRangeError> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| PageRangeError::NotANumber(text.to_string()))?;
    if page == 0 {
        return Err(PageRangeError::Zero);
    }
    if page > page_count {
        return Err(PageRangeError::Beyond { page, page_count });
    }
    Ok(page)
}

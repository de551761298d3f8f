//! Multi-page token documents and their reconstructed workbooks.

#[cfg(feature = "serde")]
use std::path::Path;

use sheetgrid_core::{
    GridError, ReconstructSettings, Sheet, TableReconstructor, Token, TokenDefect, TokenRecord,
    validate_records,
};

#[cfg(feature = "serde")]
use crate::error::SourceError;

/// Positioned tokens for every page of a document, in page order.
///
/// Records are kept unvalidated so that a defect on one page is reported for
/// that page alone when its sheet is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument {
    pages: Vec<Vec<TokenRecord>>,
    /// First entry of each page that could not be decoded, if any.
    undecodable: Vec<Option<(usize, TokenDefect)>>,
}

impl TokenDocument {
    /// Create a document from per-page records.
    pub fn new(pages: Vec<Vec<TokenRecord>>) -> Self {
        Self {
            pages,
            undecodable: Vec::new(),
        }
    }

    /// Create a document from already validated tokens.
    pub fn from_tokens(pages: &[Vec<Token>]) -> Self {
        let pages = pages
            .iter()
            .map(|page| page.iter().map(TokenRecord::from).collect())
            .collect();
        Self::new(pages)
    }

    /// Parse a token document from JSON.
    ///
    /// Accepts either an array of pages (`[[{"text", "x", "y"}, ...], ...]`)
    /// or an object with a `pages` field holding that array. Missing, `null`
    /// or wrongly typed token fields are kept and reported per page at
    /// reconstruction; only a malformed document structure fails the load.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Read a JSON token document from any reader.
    #[cfg(feature = "serde")]
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, SourceError> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    /// Read a JSON token document from a file path.
    #[cfg(feature = "serde")]
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path.as_ref())?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Self::from_json_value(value)
    }

    #[cfg(feature = "serde")]
    fn from_json_value(value: serde_json::Value) -> Result<Self, SourceError> {
        let pages = match value {
            serde_json::Value::Array(_) => value,
            serde_json::Value::Object(mut map) => map.remove("pages").ok_or_else(|| {
                SourceError::Format("object input must have a 'pages' field".to_string())
            })?,
            other => {
                return Err(SourceError::Format(format!(
                    "expected an array of pages, found {}",
                    json_kind(&other)
                )));
            }
        };
        let raw_pages: Vec<Vec<serde_json::Value>> = serde_json::from_value(pages)?;

        let mut pages = Vec::with_capacity(raw_pages.len());
        let mut undecodable = Vec::with_capacity(raw_pages.len());
        for raw in &raw_pages {
            let mut first_bad: Option<(usize, TokenDefect)> = None;
            let records: Vec<TokenRecord> = raw
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    decode_entry(entry).unwrap_or_else(|defect| {
                        first_bad.get_or_insert((i, defect));
                        TokenRecord::default()
                    })
                })
                .collect();
            pages.push(records);
            undecodable.push(first_bad);
        }
        Ok(Self { pages, undecodable })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Records of one page (0-based), if it exists.
    ///
    /// Entries that could not be decoded appear as empty records; use
    /// [`TokenDocument::tokens`] to see why.
    pub fn page(&self, index: usize) -> Option<&[TokenRecord]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Vec<TokenRecord>] {
        &self.pages
    }

    /// Validated tokens of one page (0-based).
    ///
    /// The first undecodable or malformed entry rejects the page.
    pub fn tokens(&self, index: usize) -> Result<Vec<Token>, GridError> {
        let records = self.page(index).ok_or(GridError::PageOutOfRange {
            index,
            page_count: self.page_count(),
        })?;
        match self.undecodable.get(index).and_then(Option::as_ref) {
            Some((bad, defect)) => {
                validate_records(&records[..*bad])?;
                Err(GridError::MalformedToken {
                    index: *bad,
                    defect: defect.clone(),
                })
            }
            None => validate_records(records),
        }
    }

    /// Reconstruct a single page (0-based).
    pub fn sheet(&self, index: usize, settings: &ReconstructSettings) -> Result<Sheet, GridError> {
        let reconstructor = TableReconstructor::new(*settings)?;
        self.reconstruct_page(&reconstructor, index)
    }

    /// Reconstruct every page sequentially.
    ///
    /// Invalid settings fail the whole run before any page is touched.
    /// Otherwise each page succeeds or fails on its own.
    pub fn workbook(&self, settings: &ReconstructSettings) -> Result<Workbook, GridError> {
        let all: Vec<usize> = (0..self.page_count()).collect();
        self.workbook_pages(&all, settings)
    }

    /// Reconstruct the given pages (0-based) sequentially, in the given order.
    pub fn workbook_pages(
        &self,
        pages: &[usize],
        settings: &ReconstructSettings,
    ) -> Result<Workbook, GridError> {
        let reconstructor = TableReconstructor::new(*settings)?;
        let outcomes = pages
            .iter()
            .map(|&page| self.outcome(&reconstructor, page))
            .collect();
        Ok(Workbook { outcomes })
    }

    /// Reconstruct every page in parallel using rayon.
    ///
    /// Results land in page order regardless of which page finishes first.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let doc = TokenDocument::open_file("tokens.json")?;
    /// let workbook = doc.workbook_parallel(&ReconstructSettings::default())?;
    /// for (page, sheet) in workbook.sheets() {
    ///     println!("page {}: {} rows", page + 1, sheet.row_count());
    /// }
    /// ```
    #[cfg(feature = "parallel")]
    pub fn workbook_parallel(&self, settings: &ReconstructSettings) -> Result<Workbook, GridError> {
        let all: Vec<usize> = (0..self.page_count()).collect();
        self.workbook_pages_parallel(&all, settings)
    }

    /// Reconstruct the given pages (0-based) in parallel using rayon.
    #[cfg(feature = "parallel")]
    pub fn workbook_pages_parallel(
        &self,
        pages: &[usize],
        settings: &ReconstructSettings,
    ) -> Result<Workbook, GridError> {
        use rayon::prelude::*;

        let reconstructor = TableReconstructor::new(*settings)?;
        let outcomes = pages
            .par_iter()
            .map(|&page| self.outcome(&reconstructor, page))
            .collect();
        Ok(Workbook { outcomes })
    }

    fn reconstruct_page(
        &self,
        reconstructor: &TableReconstructor,
        index: usize,
    ) -> Result<Sheet, GridError> {
        Ok(reconstructor.reconstruct(&self.tokens(index)?))
    }

    fn outcome(&self, reconstructor: &TableReconstructor, page: usize) -> PageOutcome {
        let result = self.reconstruct_page(reconstructor, page);

        #[cfg(feature = "tracing")]
        if let Err(ref err) = result {
            tracing::warn!(page = page + 1, error = %err, "page reconstruction failed");
        }

        PageOutcome { page, result }
    }
}

/// Decode one token entry, keeping absent or `null` fields as `None`.
#[cfg(feature = "serde")]
fn decode_entry(entry: &serde_json::Value) -> Result<TokenRecord, TokenDefect> {
    use serde_json::Value;

    let Value::Object(map) = entry else {
        return Err(TokenDefect::WrongType("token"));
    };
    let text = match map.get("text") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(TokenDefect::WrongType("text")),
    };
    let number = |field: &'static str| match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(TokenDefect::WrongType(field)),
    };
    Ok(TokenRecord {
        text,
        x: number("x")?,
        y: number("y")?,
    })
}

#[cfg(feature = "serde")]
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Result of reconstructing one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Page index (0-based).
    pub page: usize,
    /// The sheet, or why this page could not be reconstructed.
    pub result: Result<Sheet, GridError>,
}

/// Reconstruction results for a set of pages, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    outcomes: Vec<PageOutcome>,
}

impl Workbook {
    /// Per-page outcomes in request order.
    pub fn outcomes(&self) -> &[PageOutcome] {
        &self.outcomes
    }

    /// Number of pages processed.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no pages were processed.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successfully reconstructed sheets with their page index.
    pub fn sheets(&self) -> impl Iterator<Item = (usize, &Sheet)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|sheet| (o.page, sheet)))
    }

    /// Failed pages with their error.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &GridError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|err| (o.page, err)))
    }

    /// Returns `true` if every page was reconstructed.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Collect all sheets, or the first failing page and its error.
    pub fn into_sheets(self) -> Result<Vec<Sheet>, (usize, GridError)> {
        self.outcomes
            .into_iter()
            .map(|o| o.result.map_err(|err| (o.page, err)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetgrid_core::TokenDefect;

    fn page(tokens: &[(&str, f64, f64)]) -> Vec<TokenRecord> {
        tokens
            .iter()
            .map(|&(text, x, y)| TokenRecord::new(text, x, y))
            .collect()
    }

    fn three_page_doc() -> TokenDocument {
        TokenDocument::new(vec![
            page(&[("A", 10.0, 100.0), ("B", 50.0, 103.0), ("C", 10.0, 80.0)]),
            vec![
                TokenRecord::new("ok", 1.0, 1.0),
                TokenRecord {
                    text: None,
                    ..TokenRecord::new("", 2.0, 2.0)
                },
            ],
            page(&[("Z", 5.0, 5.0)]),
        ])
    }

    #[test]
    fn page_count_and_access() {
        let doc = three_page_doc();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.page(2).unwrap().len(), 1);
        assert!(doc.page(3).is_none());
    }

    #[test]
    fn from_tokens_keeps_positions() {
        let tokens = vec![vec![Token::new("A", 1.0, 2.0).unwrap()], vec![]];
        let doc = TokenDocument::from_tokens(&tokens);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(0).unwrap()[0], TokenRecord::new("A", 1.0, 2.0));
        assert!(doc.page(1).unwrap().is_empty());
    }

    #[test]
    fn sheet_single_page() {
        let doc = three_page_doc();
        let sheet = doc.sheet(0, &ReconstructSettings::default()).unwrap();
        assert_eq!(
            sheet.rows,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["C".to_string()]
            ]
        );
    }

    #[test]
    fn sheet_out_of_range() {
        let doc = three_page_doc();
        let err = doc.sheet(9, &ReconstructSettings::default()).unwrap_err();
        assert_eq!(
            err,
            GridError::PageOutOfRange {
                index: 9,
                page_count: 3
            }
        );
    }

    #[test]
    fn workbook_isolates_failing_page() {
        let doc = three_page_doc();
        let workbook = doc.workbook(&ReconstructSettings::default()).unwrap();
        assert_eq!(workbook.len(), 3);
        assert!(!workbook.is_complete());

        let pages: Vec<usize> = workbook.sheets().map(|(p, _)| p).collect();
        assert_eq!(pages, vec![0, 2]);

        let failures: Vec<(usize, &GridError)> = workbook.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert_eq!(
            *failures[0].1,
            GridError::MalformedToken {
                index: 1,
                defect: TokenDefect::MissingField("text"),
            }
        );
    }

    #[test]
    fn workbook_invalid_settings_fail_fast() {
        let doc = three_page_doc();
        let settings = ReconstructSettings {
            row_tolerance: 0.0,
            ..ReconstructSettings::default()
        };
        assert!(doc.workbook(&settings).unwrap_err().is_configuration());
        assert!(
            TokenDocument::default()
                .workbook(&settings)
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn workbook_pages_follows_request_order() {
        let doc = three_page_doc();
        let workbook = doc
            .workbook_pages(&[2, 0, 7], &ReconstructSettings::default())
            .unwrap();
        let order: Vec<usize> = workbook.outcomes().iter().map(|o| o.page).collect();
        assert_eq!(order, vec![2, 0, 7]);
        assert!(matches!(
            workbook.outcomes()[2].result,
            Err(GridError::PageOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn empty_document_gives_empty_workbook() {
        let workbook = TokenDocument::default()
            .workbook(&ReconstructSettings::default())
            .unwrap();
        assert!(workbook.is_empty());
        assert!(workbook.is_complete());
        assert_eq!(workbook.into_sheets().unwrap(), Vec::<Sheet>::new());
    }

    #[test]
    fn into_sheets_reports_first_failure() {
        let doc = three_page_doc();
        let workbook = doc.workbook(&ReconstructSettings::default()).unwrap();
        let (page, err) = workbook.into_sheets().unwrap_err();
        assert_eq!(page, 1);
        assert!(matches!(err, GridError::MalformedToken { .. }));
    }

    #[test]
    fn tokens_validates_page() {
        let doc = three_page_doc();
        let tokens = doc.tokens(0).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text(), "C");
        assert!(matches!(
            doc.tokens(1),
            Err(GridError::MalformedToken { index: 1, .. })
        ));
        assert_eq!(
            doc.tokens(3).unwrap_err(),
            GridError::PageOutOfRange {
                index: 3,
                page_count: 3
            }
        );
    }

    #[test]
    fn empty_page_yields_empty_sheet() {
        let doc = TokenDocument::new(vec![vec![]]);
        let sheet = doc.sheet(0, &ReconstructSettings::default()).unwrap();
        assert!(sheet.is_empty());
    }

    #[cfg(feature = "serde")]
    mod json_tests {
        use super::*;

        #[test]
        fn from_json_array_of_pages() {
            let doc = TokenDocument::from_json_str(
                r#"[[{"text": "A", "x": 10, "y": 100}], [{"text": "B", "x": 1.5, "y": 2}]]"#,
            )
            .unwrap();
            assert_eq!(doc.page_count(), 2);
            assert_eq!(doc.page(1).unwrap()[0], TokenRecord::new("B", 1.5, 2.0));
        }

        #[test]
        fn from_json_object_with_pages() {
            let doc = TokenDocument::from_json_str(
                r#"{"source": "invoice.pdf", "pages": [[{"text": "A", "x": 0, "y": 0}]]}"#,
            )
            .unwrap();
            assert_eq!(doc.page_count(), 1);
        }

        #[test]
        fn from_json_null_field_reported_per_page() {
            let doc = TokenDocument::from_json_str(
                r#"[[{"text": "A", "x": null, "y": 1}], [{"text": "B", "x": 1, "y": 1}]]"#,
            )
            .unwrap();
            let workbook = doc.workbook(&ReconstructSettings::default()).unwrap();
            let failed: Vec<usize> = workbook.failures().map(|(p, _)| p).collect();
            assert_eq!(failed, vec![0]);
            assert_eq!(workbook.sheets().count(), 1);
        }

        #[test]
        fn from_json_wrong_type_isolated_to_its_page() {
            let doc = TokenDocument::from_json_str(
                r#"[[{"text": "A", "x": "10", "y": 1}], [{"text": "B", "x": 1, "y": 1}]]"#,
            )
            .unwrap();
            assert_eq!(doc.page_count(), 2);

            let workbook = doc.workbook(&ReconstructSettings::default()).unwrap();
            let failures: Vec<(usize, &GridError)> = workbook.failures().collect();
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, 0);
            assert_eq!(
                *failures[0].1,
                GridError::MalformedToken {
                    index: 0,
                    defect: TokenDefect::WrongType("x"),
                }
            );
            let sheets: Vec<(usize, &Sheet)> = workbook.sheets().collect();
            assert_eq!(sheets.len(), 1);
            assert_eq!(sheets[0].0, 1);
            assert_eq!(sheets[0].1.rows, vec![vec!["B".to_string()]]);
        }

        #[test]
        fn from_json_earlier_missing_field_wins_over_later_wrong_type() {
            let doc = TokenDocument::from_json_str(
                r#"[[{"text": "A", "x": 1}, {"text": 7, "x": 1, "y": 1}, "junk"]]"#,
            )
            .unwrap();
            assert_eq!(doc.page(0).unwrap().len(), 3);
            assert_eq!(
                doc.tokens(0).unwrap_err(),
                GridError::MalformedToken {
                    index: 0,
                    defect: TokenDefect::MissingField("y"),
                }
            );
        }

        #[test]
        fn from_json_non_object_entry() {
            let doc = TokenDocument::from_json_str(
                r#"[[{"text": "A", "x": 1, "y": 1}, [1, 2]]]"#,
            )
            .unwrap();
            assert_eq!(
                doc.tokens(0).unwrap_err(),
                GridError::MalformedToken {
                    index: 1,
                    defect: TokenDefect::WrongType("token"),
                }
            );
        }

        #[test]
        fn from_json_page_that_is_not_an_array() {
            let err = TokenDocument::from_json_str(r#"[{"text": "A"}]"#).unwrap_err();
            assert!(matches!(err, SourceError::Json(_)));
        }

        #[test]
        fn from_json_object_without_pages() {
            let err = TokenDocument::from_json_str(r#"{"tokens": []}"#).unwrap_err();
            assert!(matches!(err, SourceError::Format(_)));
        }

        #[test]
        fn from_json_scalar_rejected() {
            let err = TokenDocument::from_json_str("42").unwrap_err();
            assert_eq!(
                err.to_string(),
                "unsupported token document: expected an array of pages, found a number"
            );
        }

        #[test]
        fn from_json_syntax_error() {
            let err = TokenDocument::from_json_str("[[").unwrap_err();
            assert!(matches!(err, SourceError::Json(_)));
        }

        #[test]
        fn open_file_missing() {
            let err = TokenDocument::open_file("/nonexistent/tokens.json").unwrap_err();
            assert!(matches!(err, SourceError::Io(_)));
        }

        #[test]
        fn open_file_reads_document() {
            use std::io::Write;

            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(br#"[[{"text": "A", "x": 1, "y": 1}]]"#)
                .unwrap();
            let doc = TokenDocument::open_file(file.path()).unwrap();
            assert_eq!(doc.page_count(), 1);
        }

        #[test]
        fn from_reader_reads_document() {
            let json = br#"{"pages": [[], []]}"#;
            let doc = TokenDocument::from_reader(&json[..]).unwrap();
            assert_eq!(doc.page_count(), 2);
        }
    }

    #[cfg(feature = "parallel")]
    mod parallel_tests {
        use super::*;

        fn many_pages() -> TokenDocument {
            let pages = (0..12)
                .map(|p| {
                    (0..30)
                        .map(|i| {
                            TokenRecord::new(
                                format!("p{p}t{i}"),
                                f64::from(i % 5) * 40.0,
                                700.0 - f64::from(i / 5) * 15.0,
                            )
                        })
                        .collect()
                })
                .collect();
            TokenDocument::new(pages)
        }

        #[test]
        fn workbook_parallel_matches_sequential() {
            let doc = many_pages();
            let settings = ReconstructSettings::default();
            let sequential = doc.workbook(&settings).unwrap();
            let parallel = doc.workbook_parallel(&settings).unwrap();
            assert_eq!(sequential, parallel);
        }

        #[test]
        fn workbook_parallel_preserves_page_order() {
            let doc = many_pages();
            let workbook = doc.workbook_parallel(&ReconstructSettings::default()).unwrap();
            let order: Vec<usize> = workbook.outcomes().iter().map(|o| o.page).collect();
            assert_eq!(order, (0..12).collect::<Vec<_>>());
            for (page, sheet) in workbook.sheets() {
                assert_eq!(sheet.rows[0][0], format!("p{page}t0"));
            }
        }

        #[test]
        fn workbook_parallel_isolates_failures() {
            let mut pages = many_pages().pages().to_vec();
            pages[4][3].y = Some(f64::NAN);
            let doc = TokenDocument::new(pages);
            let workbook = doc.workbook_parallel(&ReconstructSettings::default()).unwrap();
            let failed: Vec<usize> = workbook.failures().map(|(p, _)| p).collect();
            assert_eq!(failed, vec![4]);
            assert_eq!(workbook.sheets().count(), 11);
        }

        #[test]
        fn workbook_parallel_invalid_settings() {
            let settings = ReconstructSettings {
                row_tolerance: -1.0,
                ..ReconstructSettings::default()
            };
            assert!(many_pages().workbook_parallel(&settings).is_err());
        }
    }
}

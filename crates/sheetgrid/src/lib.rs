//! sheetgrid: Rebuild spreadsheet rows and columns from positioned PDF text.
//!
//! This is the public API facade crate for sheetgrid. It re-exports the types
//! of sheetgrid-core and adds multi-page orchestration on top of them.
//!
//! # Architecture
//!
//! - **sheetgrid-core**: tokens, settings, and the row/column reconstruction
//! - **sheetgrid** (this crate): [`TokenDocument`] loading and [`Workbook`]
//!   assembly, sequential or parallel (`parallel` feature)
//!
//! # Example
//!
//! ```
//! use sheetgrid::{ReconstructSettings, Token, reconstruct};
//!
//! let tokens = vec![
//!     Token::new("A", 10.0, 100.0).unwrap(),
//!     Token::new("B", 50.0, 103.0).unwrap(),
//!     Token::new("C", 10.0, 80.0).unwrap(),
//! ];
//! let sheet = reconstruct(&tokens, &ReconstructSettings::default()).unwrap();
//! assert_eq!(sheet.rows, vec![vec!["A", "B"], vec!["C"]]);
//! ```

mod document;
mod error;

pub use document::{PageOutcome, TokenDocument, Workbook};
pub use error::SourceError;
pub use sheetgrid_core;
pub use sheetgrid_core::{
    Axis, Cell, CoordinateOrigin, DEFAULT_ROW_TOLERANCE, GridError, ReconstructSettings, Row,
    RowBucket, RowClustering, Sheet, TableReconstructor, Token, TokenDefect, TokenRecord,
    reconstruct, validate_records,
};

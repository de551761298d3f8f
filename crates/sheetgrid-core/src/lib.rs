//! sheetgrid-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types ([`Token`], [`TokenRecord`],
//! [`Sheet`], [`RowBucket`]) and the row/column reconstruction used by
//! sheetgrid. It performs no I/O.

pub mod error;
pub mod reconstruct;
pub mod settings;
pub mod sheet;
pub mod token;

pub use error::{Axis, GridError, TokenDefect};
pub use reconstruct::{RowBucket, TableReconstructor, reconstruct};
pub use settings::{CoordinateOrigin, DEFAULT_ROW_TOLERANCE, ReconstructSettings, RowClustering};
pub use sheet::{Cell, Row, Sheet};
pub use token::{Token, TokenRecord, validate_records};

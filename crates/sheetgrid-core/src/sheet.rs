/// A single cell: the text of exactly one token.
pub type Cell = String;

/// Cells of one visual row, left of page first.
pub type Row = Vec<Cell>;

/// Rows reconstructed from one page, top of page first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sheet {
    /// Ordered rows of ordered cells.
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create a sheet from already ordered rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Length of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns `true` if the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the sheet, returning its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

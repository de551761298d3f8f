use crate::error::GridError;

/// Default row tolerance in page units.
pub const DEFAULT_ROW_TOLERANCE: f64 = 10.0;

/// Where the upstream extractor puts the origin of the `y` axis.
///
/// Decides the row order: rows are always emitted top of page first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum CoordinateOrigin {
    /// `y` grows upward from the bottom edge (PDF user space).
    #[default]
    BottomUp,
    /// `y` grows downward from the top edge (screen space).
    TopDown,
}

/// How tokens are grouped into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RowClustering {
    /// Round `y` to the nearest multiple of the row tolerance.
    ///
    /// Tokens closer than the tolerance can still land in neighbouring
    /// buckets when they straddle a rounding boundary.
    #[default]
    Quantize,
    /// Walk tokens in reading order and start a new row whenever the gap
    /// to the previous token's `y` exceeds the row tolerance.
    Gap,
}

/// Configuration for table reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconstructSettings {
    /// Vertical distance within which tokens share a row. Must be > 0.
    pub row_tolerance: f64,
    /// Axis convention of the token source.
    pub origin: CoordinateOrigin,
    /// Row grouping method.
    pub clustering: RowClustering,
}

impl Default for ReconstructSettings {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
            origin: CoordinateOrigin::default(),
            clustering: RowClustering::default(),
        }
    }
}

impl ReconstructSettings {
    /// Settings for a token source with a top-left origin.
    pub fn top_down() -> Self {
        Self {
            origin: CoordinateOrigin::TopDown,
            ..Self::default()
        }
    }

    /// Check every value is within its valid domain.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.row_tolerance.is_finite() && self.row_tolerance > 0.0) {
            return Err(GridError::InvalidConfiguration {
                field: "row_tolerance",
                value: self.row_tolerance,
                reason: "must be a positive finite number",
            });
        }
        Ok(())
    }
}

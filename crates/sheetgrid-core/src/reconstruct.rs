//! Row/column reconstruction from positioned text tokens.
//!
//! Tokens are grouped into rows by their vertical position, rows are ordered
//! top of page first according to the [`CoordinateOrigin`], and the tokens of
//! each row are ordered left to right. Each token becomes exactly one cell.
//!
//! Runs in O(n log n) over the token count and allocates only the index
//! buckets and the output strings.

use std::cmp::Ordering;

use crate::error::GridError;
use crate::settings::{CoordinateOrigin, ReconstructSettings, RowClustering};
use crate::sheet::{Row, Sheet};
use crate::token::{Token, TokenRecord, validate_records};

/// Tokens judged to lie on the same visual row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBucket {
    /// Grouping key, always a whole number. For [`RowClustering::Quantize`]
    /// this is `y` divided by the row tolerance, rounded; for
    /// [`RowClustering::Gap`] it is the row's position in reading order.
    /// Quotients beyond the `i64` range stay distinct.
    pub key: f64,
    /// Representative `y` of the row: the quantized value, or the `y` of the
    /// first token of a gap-clustered row.
    pub y: f64,
    /// Indices into the token slice, left to right.
    pub members: Vec<usize>,
}

impl RowBucket {
    /// Number of tokens in the row.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for buckets produced by [`TableReconstructor`].
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Rebuilds a [`Sheet`] from one page of tokens.
#[derive(Debug, Clone)]
pub struct TableReconstructor {
    settings: ReconstructSettings,
}

impl TableReconstructor {
    /// Create a reconstructor, validating the settings up front.
    pub fn new(settings: ReconstructSettings) -> Result<Self, GridError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &ReconstructSettings {
        &self.settings
    }

    /// Group tokens into ordered row buckets.
    ///
    /// Buckets come back top of page first; members within a bucket are
    /// sorted by ascending `x`, equal `x` keeping input order.
    pub fn buckets(&self, tokens: &[Token]) -> Vec<RowBucket> {
        let tolerance = self.settings.row_tolerance;
        let mut buckets = match self.settings.clustering {
            RowClustering::Quantize => quantize_rows(tokens, tolerance, self.settings.origin),
            RowClustering::Gap => gap_rows(tokens, tolerance, self.settings.origin),
        };

        for bucket in &mut buckets {
            // Restore input order first so the stable x sort breaks ties by it.
            bucket.members.sort_unstable();
            bucket
                .members
                .sort_by(|&a, &b| coordinate_cmp(tokens[a].x(), tokens[b].x()));
        }

        buckets
    }

    /// Reconstruct the sheet for one page.
    ///
    /// An empty token slice yields a sheet with no rows.
    pub fn reconstruct(&self, tokens: &[Token]) -> Sheet {
        let buckets = self.buckets(tokens);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            tokens = tokens.len(),
            rows = buckets.len(),
            clustering = ?self.settings.clustering,
            "reconstructed sheet"
        );

        let rows: Vec<Row> = buckets
            .iter()
            .map(|bucket| {
                bucket
                    .members
                    .iter()
                    .map(|&i| tokens[i].text().to_string())
                    .collect()
            })
            .collect();

        Sheet::new(rows)
    }

    /// Validate upstream records, then reconstruct.
    ///
    /// The first malformed record rejects the whole page.
    pub fn reconstruct_records(&self, records: &[TokenRecord]) -> Result<Sheet, GridError> {
        let tokens = validate_records(records)?;
        Ok(self.reconstruct(&tokens))
    }
}

/// Reconstruct one page with the given settings.
///
/// Fails with [`GridError::InvalidConfiguration`] before looking at any token
/// if the settings are invalid.
pub fn reconstruct(tokens: &[Token], settings: &ReconstructSettings) -> Result<Sheet, GridError> {
    Ok(TableReconstructor::new(*settings)?.reconstruct(tokens))
}

/// Order two token coordinates.
///
/// Coordinates are finite, so IEEE comparison is total; unlike `total_cmp` it
/// treats `-0.0` and `0.0` as equal.
fn coordinate_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Round half up, so every bucket spans the same half-open interval.
///
/// Adding `0.0` folds a `-0.0` result into `0.0`.
fn bucket_key(y: f64, tolerance: f64) -> f64 {
    (y / tolerance + 0.5).floor() + 0.0
}

fn quantize_rows(tokens: &[Token], tolerance: f64, origin: CoordinateOrigin) -> Vec<RowBucket> {
    let mut keyed: Vec<(f64, usize)> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| (bucket_key(token.y(), tolerance), i))
        .collect();
    keyed.sort_by(|a, b| coordinate_cmp(a.0, b.0).then(a.1.cmp(&b.1)));

    let buckets = keyed.chunk_by(|a, b| a.0 == b.0).map(|group| {
        let key = group[0].0;
        RowBucket {
            key,
            y: key * tolerance,
            members: group.iter().map(|&(_, i)| i).collect(),
        }
    });

    match origin {
        CoordinateOrigin::BottomUp => buckets.rev().collect(),
        CoordinateOrigin::TopDown => buckets.collect(),
    }
}

fn gap_rows(tokens: &[Token], tolerance: f64, origin: CoordinateOrigin) -> Vec<RowBucket> {
    let mut order: Vec<usize> = (0..tokens.len()).collect();
    match origin {
        CoordinateOrigin::BottomUp => {
            order.sort_by(|&a, &b| coordinate_cmp(tokens[b].y(), tokens[a].y()));
        }
        CoordinateOrigin::TopDown => {
            order.sort_by(|&a, &b| coordinate_cmp(tokens[a].y(), tokens[b].y()));
        }
    }

    let mut buckets: Vec<RowBucket> = Vec::new();
    let mut prev_y: Option<f64> = None;

    for i in order {
        let y = tokens[i].y();
        let continues_row = prev_y.is_some_and(|prev| (y - prev).abs() <= tolerance);
        if !continues_row {
            buckets.push(RowBucket {
                key: buckets.len() as f64,
                y,
                members: Vec::new(),
            });
        }
        if let Some(bucket) = buckets.last_mut() {
            bucket.members.push(i);
        }
        prev_y = Some(y);
    }

    buckets
}

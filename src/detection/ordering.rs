//! Reading order: rows top-to-bottom, items left-to-right within a row.
//!
//! Boxes are swept in order of vertical center. A row is opened by the first
//! box that does not fit the current one, and that box's center stays the
//! row's reference for every later comparison. The reference never drifts
//! toward later members, so a row of items with very different heights can
//! shed its tail into a new row; that is accepted behaviour.

use tracing::trace;

use crate::models::BoundingBox;

/// Default fraction of the mean box height used as the row tolerance
pub const DEFAULT_ROW_THRESHOLD_FACTOR: f32 = 0.5;

/// Boxes sharing an approximately common vertical center
#[derive(Debug, Clone)]
pub struct RowCluster<'a> {
    /// Vertical center of the box that opened the row
    pub reference_y: f32,
    /// Members, sorted left to right once the row is closed
    pub members: Vec<&'a BoundingBox>,
}

impl<'a> RowCluster<'a> {
    fn open(first: &'a BoundingBox) -> Self {
        Self {
            reference_y: first.center_y(),
            members: vec![first],
        }
    }

    fn accepts(&self, candidate: &BoundingBox, threshold: f32) -> bool {
        (candidate.center_y() - self.reference_y).abs() < threshold
    }

    fn close(mut self) -> Self {
        self.members.sort_by(|a, b| a.left.total_cmp(&b.left));
        self
    }
}

/// Mean of `bottom - top`, or 0 for an empty slice
pub fn average_height(boxes: &[BoundingBox]) -> f32 {
    if boxes.is_empty() {
        return 0.0;
    }
    boxes.iter().map(BoundingBox::height).sum::<f32>() / boxes.len() as f32
}

/// Group boxes into rows, top row first, each row sorted by left edge.
///
/// Ties in vertical center or left edge keep the input order.
pub fn group_rows(boxes: &[BoundingBox], threshold_factor: f32) -> Vec<RowCluster<'_>> {
    let mut by_center: Vec<&BoundingBox> = boxes.iter().collect();
    by_center.sort_by(|a, b| a.center_y().total_cmp(&b.center_y()));

    let threshold = average_height(boxes) * threshold_factor;
    trace!(threshold, count = boxes.len(), "grouping boxes into rows");

    let mut rows = Vec::new();
    let mut iter = by_center.into_iter();
    let Some(first) = iter.next() else {
        return rows;
    };

    let mut current = RowCluster::open(first);
    for b in iter {
        if current.accepts(b, threshold) {
            current.members.push(b);
        } else {
            rows.push(current.close());
            current = RowCluster::open(b);
        }
    }
    rows.push(current.close());

    rows
}

/// Reorder boxes into reading order using the default row tolerance.
///
/// Returns a permutation of the input: nothing is added or dropped.
pub fn sort_reading_order(boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    sort_reading_order_with(boxes, DEFAULT_ROW_THRESHOLD_FACTOR)
}

pub fn sort_reading_order_with(boxes: &[BoundingBox], threshold_factor: f32) -> Vec<BoundingBox> {
    if boxes.len() < 2 {
        return boxes.to_vec();
    }

    group_rows(boxes, threshold_factor)
        .into_iter()
        .flat_map(|row| row.members.into_iter().copied())
        .collect()
}

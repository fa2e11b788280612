//! Top-patch selection: the brightest patches that do not overlap.
//!
//! Candidates are ranked by descending average and accepted greedily.
//! Two centers overlap when both `|dx|` and `|dy|` are below the
//! separation, so each accepted center excludes a square neighborhood
//! rather than a disc.
//!
//! This is step 3 in the pipeline, between scanning and area
//! computation.

use crate::types::{Center, ScoredCenter};

/// Whether two centers overlap under the square exclusion rule.
#[must_use]
pub const fn overlaps(a: Center, b: Center, separation: u32) -> bool {
    a.x.abs_diff(b.x) < separation && a.y.abs_diff(b.y) < separation
}

/// Select up to `count` mutually non-overlapping centers, brightest first.
///
/// The sort is stable, so equal averages keep their scan order. The
/// returned centers are in acceptance order. Fewer than `count` are
/// returned when the candidates run out.
#[must_use = "returns the selected centers"]
pub fn select_top_patches(scored: &[ScoredCenter], count: usize, separation: u32) -> Vec<Center> {
    let mut ranked: Vec<&ScoredCenter> = scored.iter().collect();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));

    let mut selected: Vec<Center> = Vec::with_capacity(count);
    for candidate in ranked {
        if selected.len() == count {
            break;
        }
        if selected
            .iter()
            .all(|&kept| !overlaps(candidate.center, kept, separation))
        {
            log::debug!(
                "accepted center ({}, {}) with average {:.3}",
                candidate.center.x,
                candidate.center.y,
                candidate.average,
            );
            selected.push(candidate.center);
        }
    }
    selected
}

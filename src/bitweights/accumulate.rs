// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Recording fiber assignments in the assignment matrix.

use std::ops::AddAssign;

use ndarray::prelude::*;

use crate::{
    assign::{AssignmentSession, TileId},
    targets::TargetIndexMap,
};

/// The outcome of accumulating a tile's assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateCounts {
    /// Fibers whose target is a known science target.
    pub assigned: usize,
    /// Fibers whose target isn't in the index map (e.g. sky fibers).
    pub skipped: usize,
}

impl AddAssign for AccumulateCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.assigned += rhs.assigned;
        self.skipped += rhs.skipped;
    }
}

/// Mark every target assigned on `tile_id` in `session` as assigned in the
/// `realization` column of `matrix` (shape `[num_targets,
/// num_realizations]`).
///
/// # Panics
///
/// Panics if `realization` is not a column of `matrix`, or if `index_map`
/// gives rows that `matrix` doesn't have.
pub fn accumulate<S: AssignmentSession + ?Sized>(
    session: &S,
    tile_id: TileId,
    realization: usize,
    index_map: &TargetIndexMap,
    mut matrix: ArrayViewMut2<bool>,
) -> AccumulateCounts {
    accumulate_column(
        session,
        tile_id,
        index_map,
        matrix.column_mut(realization),
    )
}

/// The same as [`accumulate`], but writes into a single realization's column,
/// so different realizations can be accumulated concurrently.
pub fn accumulate_column<S: AssignmentSession + ?Sized>(
    session: &S,
    tile_id: TileId,
    index_map: &TargetIndexMap,
    mut column: ArrayViewMut1<bool>,
) -> AccumulateCounts {
    let mut counts = AccumulateCounts::default();
    let locations = match session.tile_location_target(tile_id) {
        Some(l) => l,
        None => return counts,
    };
    for &target_id in locations.values() {
        match index_map.get(target_id) {
            Some(row) => {
                column[row] = true;
                counts.assigned += 1;
            }
            None => counts.skipped += 1,
        }
    }
    counts
}

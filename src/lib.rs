// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Fiber-assignment bitweights for large-scale-structure galaxy surveys.

Many fiber-assignment realizations are run over a target catalog. Whether each
target was assigned in each realization is recorded, and each target's
assignment history is packed into 64-bit integers (one bit per realization).
These "bitweights" are used by pair-counting estimators to correct for
fiber-assignment incompleteness.
 */

pub mod assign;
pub mod bitweights;
mod cli;
pub mod constants;
pub(crate) mod io;
mod params;
pub mod targets;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

/// Are progress bars being drawn? This should only ever be enabled by CLI
/// code.
static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);

// Re-exports.
pub use assign::{
    build_session, read_tiles, AssignError, Assignment, AssignmentSession, AssignmentSetup,
    FiberAssigner, Hardware, RandomAssigner,
};
pub use bitweights::{
    accumulate, accumulate_column, assignment_counts, pack_bitweights, unpack_bitweights,
    AccumulateCounts, PackError,
};
pub use cli::{Bitweights, BitweightsError};
pub use io::{
    read::{read_bitweight_catalog, BitweightCatalog, ReadError},
    write::{write_output, BitweightOutputType, CatalogKind, WriteError},
};
pub use targets::{
    load_targets, RawTargetTable, Target, TargetIndexMap, TargetKind, TargetSet, TargetTable,
    TargetsError,
};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fiber-assignment sessions.
//!
//! [`build_session`] does all of the work that is common to every
//! realization: indexing target positions and working out which targets each
//! fiber on each tile could reach. A [`FiberAssigner`] then turns the
//! resulting [`AssignmentSetup`] into one [`Assignment`] per realization.

mod available;
mod error;
mod hardware;
mod random;
#[cfg(test)]
mod tests;
mod tiles;
mod tree;

pub use available::{LocationsAvailable, TargetsAvailable};
pub use error::AssignError;
pub use hardware::{FiberLocation, Hardware};
pub use random::RandomAssigner;
pub use tiles::{read_tiles, Tile};
pub use tree::TargetTree;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use vec1::Vec1;

use crate::targets::{TargetId, TargetSet};

pub type TileId = i64;
pub type LocationId = i32;

/// Read access to the result of one fiber-assignment realization.
pub trait AssignmentSession {
    /// The location → TARGETID mapping of a tile, if the tile has any
    /// assignment data.
    fn tile_location_target(&self, tile_id: TileId) -> Option<&IndexMap<LocationId, TargetId>>;
}

/// The fiber assignments of one realization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    tiles: IndexMap<TileId, IndexMap<LocationId, TargetId>>,
}

impl Assignment {
    pub fn new(tiles: IndexMap<TileId, IndexMap<LocationId, TargetId>>) -> Assignment {
        Assignment { tiles }
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.keys().copied()
    }

    /// The total number of fibers given a target.
    pub fn num_assigned(&self) -> usize {
        self.tiles.values().map(|locs| locs.len()).sum()
    }
}

impl AssignmentSession for Assignment {
    fn tile_location_target(&self, tile_id: TileId) -> Option<&IndexMap<LocationId, TargetId>> {
        self.tiles.get(&tile_id)
    }
}

/// Produces fiber assignments. Realizations may be requested concurrently
/// and in any order, so an implementation must derive everything about a
/// realization from its inputs.
pub trait FiberAssigner: Sync {
    fn assign(
        &self,
        setup: &AssignmentSetup,
        realization: usize,
    ) -> Result<Assignment, AssignError>;
}

/// Everything a [`FiberAssigner`] needs, shared read-only between
/// realizations.
pub struct AssignmentSetup<'a> {
    pub targets: &'a TargetSet,
    pub tiles: Vec1<Tile>,
    pub hardware: Hardware,
    pub targets_available: TargetsAvailable,
    pub locations_available: LocationsAvailable,
}

/// Validate the inputs and compute target availability for every tile and
/// fiber location.
pub fn build_session<'a>(
    targets: &'a TargetSet,
    tiles: Vec<Tile>,
    hardware: Hardware,
) -> Result<AssignmentSetup<'a>, AssignError> {
    hardware.validate()?;
    let tiles = Vec1::try_from_vec(tiles).map_err(|_| AssignError::NoTiles)?;
    let mut seen = HashSet::with_capacity(tiles.len());
    for tile in &tiles {
        if !seen.insert(tile.id) {
            return Err(AssignError::DuplicateTileId { id: tile.id });
        }
    }
    if targets.is_empty() {
        return Err(AssignError::NoTargets);
    }

    let tree = TargetTree::new(targets);
    let targets_available = TargetsAvailable::new(&tree, &tiles, &hardware);
    let locations_available = LocationsAvailable::new(&targets_available);
    debug!(
        "{} tiles with {} fiber locations each; {} of {} targets are reachable",
        tiles.len(),
        hardware.locations.len(),
        locations_available.len(),
        targets.len()
    );

    Ok(AssignmentSetup {
        targets,
        tiles,
        hardware,
        targets_available,
        locations_available,
    })
}

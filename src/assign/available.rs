// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Which targets each fiber could reach, and the inverse.

use indexmap::IndexMap;
use rayon::prelude::*;

use super::{FiberLocation, Hardware, LocationId, TargetTree, Tile, TileId};
use crate::targets::TargetId;

/// For each tile and each of its fiber locations, the targets that location
/// could be assigned. Tiles and locations keep their input order; targets
/// are in ascending ID order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetsAvailable {
    tiles: IndexMap<TileId, IndexMap<LocationId, Vec<TargetId>>>,
}

impl TargetsAvailable {
    pub fn new(tree: &TargetTree, tiles: &[Tile], hardware: &Hardware) -> TargetsAvailable {
        let radius = hardware.patrol_radius();
        let tiles = tiles
            .par_iter()
            .map(|tile| {
                let locations = hardware
                    .locations
                    .iter()
                    .map(|loc| (loc.location, available_to(tree, tile, loc, radius)))
                    .collect();
                (tile.id, locations)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();
        TargetsAvailable { tiles }
    }

    /// The location → candidate targets map of a tile.
    pub fn tile(&self, tile_id: TileId) -> Option<&IndexMap<LocationId, Vec<TargetId>>> {
        self.tiles.get(&tile_id)
    }

    /// The candidate targets of a single fiber location on a tile.
    pub fn location(&self, tile_id: TileId, location: LocationId) -> &[TargetId] {
        self.tiles
            .get(&tile_id)
            .and_then(|locs| locs.get(&location))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileId, &IndexMap<LocationId, Vec<TargetId>>)> {
        self.tiles.iter()
    }
}

fn available_to(
    tree: &TargetTree,
    tile: &Tile,
    location: &FiberLocation,
    radius: f64,
) -> Vec<TargetId> {
    let position = location.sky_position(tile.centre);
    let mut ids: Vec<TargetId> = tree
        .within(position, radius)
        .filter(|t| tile.observes(t.obsconditions))
        .map(|t| t.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// For each target, every (tile, location) pair that could observe it.
/// Targets that no fiber can reach are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationsAvailable {
    targets: IndexMap<TargetId, Vec<(TileId, LocationId)>>,
}

impl LocationsAvailable {
    pub fn new(targets_available: &TargetsAvailable) -> LocationsAvailable {
        let mut targets: IndexMap<TargetId, Vec<(TileId, LocationId)>> = IndexMap::new();
        for (&tile_id, locations) in targets_available.iter() {
            for (&location, ids) in locations {
                for &id in ids {
                    targets.entry(id).or_default().push((tile_id, location));
                }
            }
        }
        LocationsAvailable { targets }
    }

    pub fn get(&self, id: TargetId) -> &[(TileId, LocationId)] {
        self.targets
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The number of targets reachable by at least one fiber.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

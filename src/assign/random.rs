// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A seedable random fiber assigner.
//!
//! This is not a fiber-assignment optimiser. It visits each tile's fiber
//! locations in a random order and gives each location one of the science
//! targets it can reach, favouring targets with a higher sub-priority. If no
//! science target is left, a sky target is used instead. No target is
//! assigned twice within a realization.

use std::collections::HashSet;

use indexmap::IndexMap;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{AssignError, Assignment, AssignmentSetup, FiberAssigner, LocationId};
use crate::targets::{TargetId, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomAssigner {
    pub seed: u64,
}

impl RandomAssigner {
    pub fn new(seed: u64) -> RandomAssigner {
        RandomAssigner { seed }
    }

    /// Every realization gets its own stream of the same seed, so results
    /// don't depend on the order realizations are run in.
    fn rng(&self, realization: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(realization as u64);
        rng
    }
}

impl FiberAssigner for RandomAssigner {
    fn assign(
        &self,
        setup: &AssignmentSetup,
        realization: usize,
    ) -> Result<Assignment, AssignError> {
        let mut rng = self.rng(realization);
        let mut used: HashSet<TargetId> = HashSet::new();
        let mut tiles = IndexMap::with_capacity(setup.tiles.len());

        for tile in &setup.tiles {
            let available = match setup.targets_available.tile(tile.id) {
                Some(a) => a,
                None => continue,
            };
            let mut locations: Vec<LocationId> = available.keys().copied().collect();
            locations.shuffle(&mut rng);

            let mut tile_assignments = IndexMap::new();
            for location in locations {
                let candidates = setup.targets_available.location(tile.id, location);

                // Weighted random selection: the largest u^(1/w) wins, which
                // picks each candidate with probability proportional to its
                // sub-priority.
                let mut best_science: Option<(f64, TargetId)> = None;
                let mut sky = vec![];
                for &id in candidates {
                    if used.contains(&id) {
                        continue;
                    }
                    let target = match setup.targets.get(id) {
                        Some(t) => t,
                        None => continue,
                    };
                    match target.kind {
                        TargetKind::Science => {
                            let weight = target.subpriority.max(f64::MIN_POSITIVE);
                            let key = rng.gen::<f64>().powf(weight.recip());
                            if best_science.map(|(best, _)| key > best).unwrap_or(true) {
                                best_science = Some((key, id));
                            }
                        }
                        TargetKind::Sky => sky.push(id),
                    }
                }

                let chosen = match best_science {
                    Some((_, id)) => Some(id),
                    None => sky.choose(&mut rng).copied(),
                };
                if let Some(id) = chosen {
                    used.insert(id);
                    tile_assignments.insert(location, id);
                }
            }
            tiles.insert(tile.id, tile_assignments);
        }

        Ok(Assignment::new(tiles))
    }
}

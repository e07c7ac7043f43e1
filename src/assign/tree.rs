// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A simple spatial index over target positions.

use marlu::RADec;

use crate::targets::{Target, TargetSet};

/// Targets sorted by declination. A cone search only needs to look at the
/// declination band covering the cone, then checks the true angular
/// separation.
pub struct TargetTree<'a> {
    /// Sorted by (dec, id).
    targets: Vec<&'a Target>,
}

impl<'a> TargetTree<'a> {
    pub fn new(target_set: &'a TargetSet) -> TargetTree<'a> {
        let mut targets: Vec<&Target> = target_set.iter().collect();
        targets.sort_unstable_by(|a, b| {
            a.radec
                .dec
                .total_cmp(&b.radec.dec)
                .then_with(|| a.id.cmp(&b.id))
        });
        TargetTree { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All targets within `radius` radians of `centre`, in (dec, id) order.
    pub fn within(&self, centre: RADec, radius: f64) -> impl Iterator<Item = &'a Target> + '_ {
        let start = self
            .targets
            .partition_point(|t| t.radec.dec < centre.dec - radius);
        let end = self
            .targets
            .partition_point(|t| t.radec.dec <= centre.dec + radius);
        self.targets[start..end.max(start)]
            .iter()
            .copied()
            .filter(move |t| t.radec.separation(centre) <= radius)
    }
}

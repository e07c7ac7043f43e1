// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Survey tiles (telescope pointings).

use std::path::Path;

use log::debug;
use marlu::RADec;

use super::{AssignError, TileId};
use crate::{
    constants::{COL_DEC, COL_OBSCONDITIONS, COL_RA, COL_TILEID, DEFAULT_TILE_OBSCONDITIONS},
    io::read::{open_table, TableRead},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub centre: RADec,
    /// Targets can only be observed on this tile if their observing
    /// conditions share a bit with this mask.
    pub obsconditions: i64,
}

impl Tile {
    /// Can a target with these observing conditions be observed on this tile?
    pub fn observes(&self, obsconditions: i64) -> bool {
        self.obsconditions & obsconditions != 0
    }
}

/// Read tiles from a FITS or HDF5 table with `TILEID`, `RA` and `DEC`
/// columns, and optionally `OBSCONDITIONS`.
pub fn read_tiles(file: &Path) -> Result<Vec<Tile>, AssignError> {
    debug!("Reading tiles from {}", file.display());
    let mut table = open_table(file)?;
    tiles_from_table(table.as_mut())
}

pub(crate) fn tiles_from_table(table: &mut dyn TableRead) -> Result<Vec<Tile>, AssignError> {
    let ids = table.read_i64_col(COL_TILEID)?;
    let ra = table.read_f64_col(COL_RA)?;
    let dec = table.read_f64_col(COL_DEC)?;
    let obsconditions = table
        .read_optional_i64_col(COL_OBSCONDITIONS)?
        .unwrap_or_else(|| vec![DEFAULT_TILE_OBSCONDITIONS; ids.len()]);
    for (column, actual) in [
        (COL_RA, ra.len()),
        (COL_DEC, dec.len()),
        (COL_OBSCONDITIONS, obsconditions.len()),
    ] {
        if actual != ids.len() {
            return Err(AssignError::TileColumnLength {
                column: column.to_string(),
                expected: ids.len(),
                actual,
            });
        }
    }

    Ok(ids
        .into_iter()
        .zip(ra)
        .zip(dec)
        .zip(obsconditions)
        .map(|(((id, ra), dec), obsconditions)| Tile {
            id,
            centre: RADec::from_degrees(ra, dec),
            obsconditions,
        })
        .collect())
}

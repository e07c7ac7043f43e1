// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with setting up and running fiber assignment.

use thiserror::Error;

use super::{LocationId, TileId};
use crate::io::read::ReadError;

#[derive(Error, Debug)]
pub enum AssignError {
    #[error("No tiles were supplied")]
    NoTiles,

    #[error("The hardware description has no fiber locations")]
    NoLocations,

    #[error("Tile {id} appears more than once")]
    DuplicateTileId { id: TileId },

    #[error("Fiber location {id} appears more than once in the hardware description")]
    DuplicateLocationId { id: LocationId },

    #[error("The patrol radius must be a positive number of degrees; got {radius}")]
    BadPatrolRadius { radius: f64 },

    #[error("There are no targets to assign")]
    NoTargets,

    #[error("Tile column '{column}' has {actual} rows, but {expected} were expected")]
    TileColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Hardware file '{file}' doesn't have a recognised extension; expected toml or json")]
    HardwareFileType { file: String },

    #[error("Couldn't decode the hardware description in {file}:\n{error}")]
    HardwareParse { file: String, error: String },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

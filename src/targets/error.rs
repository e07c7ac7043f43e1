// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with loading targets.

use thiserror::Error;

use super::TargetId;
use crate::io::read::ReadError;

#[derive(Error, Debug)]
pub enum TargetsError {
    #[error("Required column '{column}' is missing from {file}")]
    MissingColumn { column: String, file: String },

    #[error("Column '{column}' has {actual} rows, but {expected} were expected")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("TARGETID {id} appears more than once")]
    DuplicateTargetId { id: TargetId },

    #[error(transparent)]
    Read(ReadError),
}

impl From<ReadError> for TargetsError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::MissingColumn { column, file } => {
                TargetsError::MissingColumn { column, file }
            }
            e => TargetsError::Read(e),
        }
    }
}

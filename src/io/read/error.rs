// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from reading tables.

use thiserror::Error;

use super::fits::FitsError;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Couldn't determine the table format of {file}; supported extensions are fits, fit, fts, hdf5, h5 and hdf")]
    UnrecognisedExtension { file: String },

    #[error("Column '{column}' doesn't exist in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Attribute '{attribute}' doesn't exist in {file}")]
    MissingAttribute { attribute: String, file: String },

    #[error("Attribute '{attribute}' in {file} is {value}, which isn't a valid count")]
    BadAttribute {
        attribute: String,
        file: String,
        value: i64,
    },

    #[error("Column '{column}' in {file} has {actual} rows, but {expected} were expected")]
    LengthMismatch {
        column: String,
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error("HDF5 error from {file}: {error}")]
    Hdf5 {
        file: String,
        error: Box<hdf5::Error>,
    },
}

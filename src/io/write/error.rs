// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with writing out bitweight catalogs.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::read::fits::FitsError;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Output format '{format}' is not supported; supported formats: {}", *super::BITWEIGHT_OUTPUT_EXTENSIONS)]
    UnsupportedFormat { format: String },

    #[error("The row selection has {num_selected} entries, but the catalog has {num_rows} rows")]
    RowSelectionLength { num_selected: usize, num_rows: usize },

    #[error("Row selection index {index} is out of range; there are only {num_packed} rows of bitweights")]
    RowSelection { index: usize, num_packed: usize },

    #[error("Extra column '{column}' was requested for output, but it wasn't read from the target catalog")]
    MissingExtraColumn { column: String },

    #[error("Column '{column}' has {actual} rows, but {expected} were expected")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Couldn't create the output directory {}: {error}", dir.display())]
    CreateDir {
        dir: PathBuf,
        error: std::io::Error,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    Fitsio(#[from] fitsio::errors::Error),

    #[error("HDF5 error when writing {}: {error}", file.display())]
    Hdf5 {
        file: PathBuf,
        error: Box<hdf5::Error>,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read column-oriented tables (catalogs) from FITS and HDF5 files.

mod catalog;
mod error;
pub(crate) mod fits;
mod hdf5;

pub use catalog::{read_bitweight_catalog, BitweightCatalog};
pub use error::ReadError;
pub(crate) use fits::FitsTableReader;
pub(crate) use self::hdf5::Hdf5TableReader;

use std::path::Path;

use log::debug;
use strum_macros::{Display, EnumIter, EnumString};

/// All read-supported table formats.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum TableFileType {
    #[strum(serialize = "fits", serialize = "fit", serialize = "fts")]
    Fits,
    #[strum(serialize = "hdf5", serialize = "h5", serialize = "hdf")]
    Hdf5,
}

impl TableFileType {
    /// Guess the type of a table file from its extension.
    pub fn from_path(file: &Path) -> Result<TableFileType, ReadError> {
        file.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| e.parse().ok())
            .ok_or_else(|| ReadError::UnrecognisedExtension {
                file: file.display().to_string(),
            })
    }
}

/// A table whose named columns can be read in full.
pub(crate) trait TableRead {
    /// The file this table is being read from.
    fn get_file(&self) -> &Path;

    fn get_column_names(&self) -> &[String];

    /// The number of rows, if the format records it independently of the
    /// columns.
    fn get_num_rows(&self) -> Option<usize>;

    fn read_i64_col(&mut self, name: &str) -> Result<Vec<i64>, ReadError>;

    fn read_f64_col(&mut self, name: &str) -> Result<Vec<f64>, ReadError>;

    fn has_col(&self, name: &str) -> bool {
        self.get_column_names().iter().any(|c| c == name)
    }

    /// Complain if the column isn't present.
    fn check_col(&self, name: &str) -> Result<(), ReadError> {
        if self.has_col(name) {
            Ok(())
        } else {
            Err(ReadError::MissingColumn {
                column: name.to_string(),
                file: self.get_file().display().to_string(),
            })
        }
    }

    /// Read a column if it exists.
    fn read_optional_i64_col(&mut self, name: &str) -> Result<Option<Vec<i64>>, ReadError> {
        if self.has_col(name) {
            self.read_i64_col(name).map(Some)
        } else {
            debug!(
                "Column {name} isn't in {}",
                self.get_file().display()
            );
            Ok(None)
        }
    }

    /// Read a column if it exists.
    fn read_optional_f64_col(&mut self, name: &str) -> Result<Option<Vec<f64>>, ReadError> {
        if self.has_col(name) {
            self.read_f64_col(name).map(Some)
        } else {
            debug!(
                "Column {name} isn't in {}",
                self.get_file().display()
            );
            Ok(None)
        }
    }
}

/// Open a table file for reading, choosing the reader from the extension.
pub(crate) fn open_table(file: &Path) -> Result<Box<dyn TableRead>, ReadError> {
    let table: Box<dyn TableRead> = match TableFileType::from_path(file)? {
        TableFileType::Fits => Box::new(FitsTableReader::new(file)?),
        TableFileType::Hdf5 => Box::new(Hdf5TableReader::new(file)?),
    };
    Ok(table)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading tables from HDF5 files. Each column is a one-dimensional dataset
//! in the root group, named after the column.

use std::path::{Path, PathBuf};

use log::trace;

use super::{ReadError, TableRead};

pub(crate) struct Hdf5TableReader {
    file: ::hdf5::File,
    path: PathBuf,
    col_names: Vec<String>,
}

impl Hdf5TableReader {
    pub(crate) fn new(path: &Path) -> Result<Hdf5TableReader, ReadError> {
        trace!("Opening HDF5 table {}", path.display());
        let hdf5_err = |e| ReadError::Hdf5 {
            file: path.display().to_string(),
            error: Box::new(e),
        };
        let file = ::hdf5::File::open(path).map_err(hdf5_err)?;
        let col_names = file.member_names().map_err(hdf5_err)?;
        trace!("Datasets: {col_names:?}");
        Ok(Hdf5TableReader {
            file,
            path: path.to_path_buf(),
            col_names,
        })
    }

    fn hdf5_err(&self, error: ::hdf5::Error) -> ReadError {
        ReadError::Hdf5 {
            file: self.path.display().to_string(),
            error: Box::new(error),
        }
    }

    /// Read a scalar integer attribute attached to the root group.
    pub(crate) fn get_required_attr(&self, name: &str) -> Result<i64, ReadError> {
        let attr = self.file.attr(name).map_err(|_| ReadError::MissingAttribute {
            attribute: name.to_string(),
            file: self.path.display().to_string(),
        })?;
        attr.read_scalar().map_err(|e| self.hdf5_err(e))
    }

    fn read_col<T: ::hdf5::H5Type>(&mut self, name: &str) -> Result<Vec<T>, ReadError> {
        self.check_col(name)?;
        self.file
            .dataset(name)
            .and_then(|ds| ds.read_raw())
            .map_err(|e| self.hdf5_err(e))
    }
}

impl TableRead for Hdf5TableReader {
    fn get_file(&self) -> &Path {
        &self.path
    }

    fn get_column_names(&self) -> &[String] {
        &self.col_names
    }

    fn get_num_rows(&self) -> Option<usize> {
        None
    }

    fn read_i64_col(&mut self, name: &str) -> Result<Vec<i64>, ReadError> {
        self.read_col(name)
    }

    fn read_f64_col(&mut self, name: &str) -> Result<Vec<f64>, ReadError> {
        self.read_col(name)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing bitweight catalogs as HDF5 files; each column is a dataset in the
//! root group.

use std::path::Path;

use log::trace;

use super::{ColumnData, OutputColumn, TabularSink, WriteError};

pub(crate) struct Hdf5Sink;

impl TabularSink for Hdf5Sink {
    fn write_table(
        &self,
        file: &Path,
        columns: &[OutputColumn],
        header: &[(&str, i64)],
    ) -> Result<(), WriteError> {
        let hdf5_err = |error| WriteError::Hdf5 {
            file: file.to_path_buf(),
            error: Box::new(error),
        };

        // `File::create` truncates any existing file.
        let h5 = ::hdf5::File::create(file).map_err(hdf5_err)?;
        for col in columns {
            trace!("Writing HDF5 dataset {}", col.name);
            let builder = h5.new_dataset_builder();
            match &col.data {
                ColumnData::Int64(v) => builder
                    .with_data(v.as_slice())
                    .create(col.name.as_str()),
                ColumnData::Float64(v) => builder
                    .with_data(v.as_slice())
                    .create(col.name.as_str()),
            }
            .map_err(hdf5_err)?;
        }

        for &(key, value) in header {
            h5.new_attr::<i64>()
                .shape(())
                .create(key)
                .and_then(|attr| attr.write_scalar(&value))
                .map_err(hdf5_err)?;
        }
        h5.close().map_err(hdf5_err)?;
        Ok(())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing bitweight catalogs as FITS binary tables.

use std::path::Path;

use fitsio::{
    errors::check_status as fits_check_status,
    tables::{ColumnDataType, ColumnDescription},
    FitsFile,
};
use log::trace;

use super::{ColumnData, OutputColumn, TabularSink, WriteError, BITWEIGHT_TABLE_NAME};

/// Writes an empty primary HDU followed by a single binary table.
pub(crate) struct FitsSink;

impl TabularSink for FitsSink {
    fn write_table(
        &self,
        file: &Path,
        columns: &[OutputColumn],
        header: &[(&str, i64)],
    ) -> Result<(), WriteError> {
        if file.exists() {
            std::fs::remove_file(file)?;
        }
        let mut fptr = FitsFile::create(file).open()?;

        let descriptions = columns
            .iter()
            .map(|col| {
                ColumnDescription::new(&col.name)
                    .with_type(match col.data {
                        ColumnData::Int64(_) => ColumnDataType::LongLong,
                        ColumnData::Float64(_) => ColumnDataType::Double,
                    })
                    .create()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let hdu = fptr.create_table(BITWEIGHT_TABLE_NAME, &descriptions)?;

        for col in columns {
            trace!("Writing FITS column {}", col.name);
            match &col.data {
                // cfitsio doesn't like being handed nothing.
                data if data.len() == 0 => (),
                ColumnData::Int64(v) => {
                    hdu.write_col(&mut fptr, col.name.as_str(), v.as_slice())?;
                }
                ColumnData::Float64(v) => {
                    hdu.write_col(&mut fptr, col.name.as_str(), v.as_slice())?;
                }
            }
        }

        for &(key, value) in header {
            hdu.write_key(&mut fptr, key, value)?;
        }
        hdu.write_key(
            &mut fptr,
            "SOFTWARE",
            format!(
                "Created by {} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
        )?;

        // Describe the bit layout for anyone reading the header.
        let mut status = 0;
        unsafe {
            // ffpcom = fits_write_comment
            fitsio_sys::ffpcom(
                fptr.as_raw(),
                b"Realization r is bit (r % 64) of BITWEIGHT(r / 64)\0"
                    .as_ptr()
                    .cast(),
                &mut status,
            );
        }
        fits_check_status(status)?;

        Ok(())
    }
}

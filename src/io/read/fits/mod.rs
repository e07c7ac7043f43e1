// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for reading FITS files, and a FITS binary-table reader.

mod error;

pub use error::FitsError;

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use fitsio::{hdu::*, FitsFile};
use log::trace;

use super::{ReadError, TableRead};

/// Open a fits file.
#[track_caller]
pub(crate) fn fits_open<P: AsRef<Path>>(file: P) -> Result<FitsFile, FitsError> {
    FitsFile::open(file.as_ref()).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Open {
            fits_error: Box::new(e),
            fits_filename: file.as_ref().to_path_buf().into_boxed_path(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Open a fits file's HDU.
#[track_caller]
pub(crate) fn fits_open_hdu<T: DescribesHdu + Display + Copy>(
    fits_fptr: &mut FitsFile,
    hdu_description: T,
) -> Result<FitsHdu, FitsError> {
    fits_fptr.hdu(hdu_description).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: fits_fptr.filename.clone().into_boxed_path(),
            hdu_description: format!("{hdu_description}").into_boxed_str(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword that may
/// or may not exist, pull out the value of the keyword, parsing it into the
/// desired type.
#[track_caller]
pub(crate) fn fits_get_optional_key<T: std::str::FromStr>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Option<T>, FitsError> {
    let unparsed_value: String = match hdu.read_key(fits_fptr, keyword) {
        Ok(key_value) => key_value,
        Err(e) => match &e {
            // Status codes 202 and 204 mean the key doesn't exist.
            fitsio::errors::Error::Fits(fe) if matches!(fe.status, 202 | 204) => return Ok(None),
            _ => {
                let caller = std::panic::Location::caller();
                return Err(FitsError::Fitsio {
                    fits_error: Box::new(e),
                    fits_filename: fits_fptr.filename.clone().into_boxed_path(),
                    hdu_description: format!("{}", hdu.number + 1).into_boxed_str(),
                    source_file: caller.file(),
                    source_line: caller.line(),
                    source_column: caller.column(),
                });
            }
        },
    };

    match unparsed_value.trim().parse() {
        Ok(parsed_value) => Ok(Some(parsed_value)),
        Err(_) => {
            let caller = std::panic::Location::caller();
            Err(FitsError::Parse {
                key: keyword.to_string().into_boxed_str(),
                fits_filename: fits_fptr.filename.clone().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
    }
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword, pull out
/// the value of the keyword, parsing it into the desired type.
#[track_caller]
pub(crate) fn fits_get_required_key<T: std::str::FromStr>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<T, FitsError> {
    match fits_get_optional_key(fits_fptr, hdu, keyword) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => {
            let caller = std::panic::Location::caller();
            Err(FitsError::MissingKey {
                key: keyword.to_string().into_boxed_str(),
                fits_filename: fits_fptr.filename.clone().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
        Err(error) => Err(error),
    }
}

/// Get a column from a fits file's HDU.
#[track_caller]
pub(crate) fn fits_get_col<T: fitsio::tables::ReadsCol>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Vec<T>, FitsError> {
    hdu.read_col(fits_fptr, keyword).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: fits_fptr.filename.clone().into_boxed_path(),
            hdu_description: format!("{}", hdu.number + 1).into_boxed_str(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Get the column names and number of rows of a table HDU.
#[track_caller]
pub(crate) fn fits_get_table_info(
    fits_fptr: &FitsFile,
    hdu: &FitsHdu,
) -> Result<(Vec<String>, usize), FitsError> {
    match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => Ok((
            column_descriptions
                .iter()
                .map(|cd| cd.name.clone())
                .collect(),
            *num_rows,
        )),
        _ => {
            let caller = std::panic::Location::caller();
            Err(FitsError::NotTable {
                fits_filename: fits_fptr.filename.clone().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
    }
}

/// A FITS binary table. Catalogs keep their columns in the first extension
/// (HDU 2); the primary HDU is an empty image.
pub(crate) struct FitsTableReader {
    fptr: FitsFile,
    hdu: FitsHdu,
    file: PathBuf,
    col_names: Vec<String>,
    num_rows: usize,
}

impl FitsTableReader {
    pub(crate) fn new(file: &Path) -> Result<FitsTableReader, FitsError> {
        trace!("Opening FITS table {}", file.display());
        let mut fptr = fits_open(file)?;
        let hdu = fits_open_hdu(&mut fptr, 1)?;
        let (col_names, num_rows) = fits_get_table_info(&fptr, &hdu)?;
        trace!("Columns: {col_names:?}, {num_rows} rows");
        Ok(FitsTableReader {
            fptr,
            hdu,
            file: file.to_path_buf(),
            col_names,
            num_rows,
        })
    }

    /// Read a header key from the table HDU.
    pub(crate) fn get_required_key<T: std::str::FromStr>(
        &mut self,
        keyword: &str,
    ) -> Result<T, FitsError> {
        fits_get_required_key(&mut self.fptr, &self.hdu, keyword)
    }
}

impl TableRead for FitsTableReader {
    fn get_file(&self) -> &Path {
        &self.file
    }

    fn get_column_names(&self) -> &[String] {
        &self.col_names
    }

    fn get_num_rows(&self) -> Option<usize> {
        Some(self.num_rows)
    }

    fn read_i64_col(&mut self, name: &str) -> Result<Vec<i64>, ReadError> {
        self.check_col(name)?;
        Ok(fits_get_col(&mut self.fptr, &self.hdu, name)?)
    }

    fn read_f64_col(&mut self, name: &str) -> Result<Vec<f64>, ReadError> {
        self.check_col(name)?;
        Ok(fits_get_col(&mut self.fptr, &self.hdu, name)?)
    }
}

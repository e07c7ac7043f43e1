// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading back bitweight catalogs written by this crate.

use std::path::Path;

use log::debug;
use ndarray::prelude::*;

use super::{FitsTableReader, Hdf5TableReader, ReadError, TableFileType, TableRead};
use crate::{
    constants::{COL_BITWEIGHT_PREFIX, COL_DEC, COL_RA, COL_TARGETID, COL_Z},
    io::write::NREAL_KEY,
};

/// The contents of a bitweight catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BitweightCatalog {
    pub target_ids: Vec<i64>,
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub z: Vec<f64>,
    /// Any other integer column (e.g. `DESI_TARGET`) and its name.
    pub extra: Option<(String, Vec<i64>)>,
    /// Shape `[num_targets, num_words]`.
    pub bitweights: Array2<i64>,
    pub num_realizations: usize,
}

/// Read a FITS or HDF5 bitweight catalog.
pub fn read_bitweight_catalog(file: &Path) -> Result<BitweightCatalog, ReadError> {
    debug!("Reading bitweight catalog {}", file.display());
    match TableFileType::from_path(file)? {
        TableFileType::Fits => {
            let mut table = FitsTableReader::new(file)?;
            let num_realizations = table.get_required_key(NREAL_KEY)?;
            read_columns(&mut table, num_realizations)
        }
        TableFileType::Hdf5 => {
            let mut table = Hdf5TableReader::new(file)?;
            let value = table.get_required_attr(NREAL_KEY)?;
            let num_realizations =
                usize::try_from(value).map_err(|_| ReadError::BadAttribute {
                    attribute: NREAL_KEY.to_string(),
                    file: file.display().to_string(),
                    value,
                })?;
            read_columns(&mut table, num_realizations)
        }
    }
}

fn read_columns(
    table: &mut dyn TableRead,
    num_realizations: usize,
) -> Result<BitweightCatalog, ReadError> {
    let target_ids = table.read_i64_col(COL_TARGETID)?;
    let num_targets = target_ids.len();
    let file = table.get_file().display().to_string();
    let check_len = |column: &str, actual: usize| {
        if actual == num_targets {
            Ok(())
        } else {
            Err(ReadError::LengthMismatch {
                column: column.to_string(),
                file: file.clone(),
                expected: num_targets,
                actual,
            })
        }
    };

    let ra = table.read_f64_col(COL_RA)?;
    check_len(COL_RA, ra.len())?;
    let dec = table.read_f64_col(COL_DEC)?;
    check_len(COL_DEC, dec.len())?;
    let z = table.read_f64_col(COL_Z)?;
    check_len(COL_Z, z.len())?;

    // HDF5 lists its datasets alphabetically, so the word columns are sorted
    // by their index rather than trusting the stored order.
    let mut word_cols: Vec<(usize, String)> = vec![];
    let mut extra_name = None;
    for name in table.get_column_names() {
        if let Some(i) = name
            .strip_prefix(COL_BITWEIGHT_PREFIX)
            .and_then(|s| s.parse().ok())
        {
            word_cols.push((i, name.clone()));
        } else if ![COL_TARGETID, COL_RA, COL_DEC, COL_Z].contains(&name.as_str()) {
            extra_name = Some(name.clone());
        }
    }
    word_cols.sort_unstable();
    // The word indices must be 0, 1, 2...
    for (expected, (i, _)) in word_cols.iter().enumerate() {
        if *i != expected {
            return Err(ReadError::MissingColumn {
                column: format!("{COL_BITWEIGHT_PREFIX}{expected}"),
                file: file.clone(),
            });
        }
    }

    let mut bitweights = Array2::zeros((num_targets, word_cols.len()));
    for ((_, name), mut out) in word_cols.iter().zip(bitweights.axis_iter_mut(Axis(1))) {
        let words = table.read_i64_col(name)?;
        check_len(name, words.len())?;
        out.assign(&ArrayView1::from(words.as_slice()));
    }

    let extra = match extra_name {
        Some(name) => {
            let col = table.read_i64_col(&name)?;
            check_len(&name, col.len())?;
            Some((name, col))
        }
        None => None,
    };

    Ok(BitweightCatalog {
        target_ids,
        ra,
        dec,
        z,
        extra,
        bitweights,
        num_realizations,
    })
}

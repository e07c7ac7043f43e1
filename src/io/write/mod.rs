// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to handle writing out bitweight catalogs.
//!
//! The output columns are assembled once by [`assemble_columns`] and then
//! handed to a [`TabularSink`], so the FITS and HDF5 outputs can't drift
//! apart.

mod error;
mod fits;
mod hdf5;

pub use error::WriteError;
pub(crate) use fits::FitsSink;
pub(crate) use self::hdf5::Hdf5Sink;

use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, trace};
use ndarray::prelude::*;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{COL_BITWEIGHT_PREFIX, COL_DEC, COL_RA, COL_TARGETID, COL_Z},
    targets::TargetTable,
};

/// The name of the FITS table HDU holding bitweights.
pub const BITWEIGHT_TABLE_NAME: &str = "BITWEIGHTS";

/// The header key (FITS) or root attribute (HDF5) holding the number of
/// realizations.
pub const NREAL_KEY: &str = "NREAL";

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
/// All write-supported bitweight catalog formats.
pub enum BitweightOutputType {
    #[strum(serialize = "fits")]
    Fits,
    #[strum(serialize = "hdf5")]
    Hdf5,
}

impl BitweightOutputType {
    /// Parse an output format, complaining if it isn't supported.
    pub fn parse(format: &str) -> Result<BitweightOutputType, WriteError> {
        format
            .trim()
            .to_lowercase()
            .parse()
            .map_err(|_| WriteError::UnsupportedFormat {
                format: format.to_string(),
            })
    }

    /// The file extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            BitweightOutputType::Fits => "fits",
            BitweightOutputType::Hdf5 => "hdf5",
        }
    }

    pub(crate) fn sink(self) -> Box<dyn TabularSink> {
        match self {
            BitweightOutputType::Fits => Box::new(FitsSink),
            BitweightOutputType::Hdf5 => Box::new(Hdf5Sink),
        }
    }
}

lazy_static::lazy_static! {
    pub(crate) static ref BITWEIGHT_OUTPUT_EXTENSIONS: String = BitweightOutputType::iter().join(", ");

    pub(crate) static ref CATALOG_KINDS: String = CatalogKind::iter().join(", ");
}

/// Which logical catalog is being written. This also names the output file.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum CatalogKind {
    /// Every science target.
    Parent,

    /// Only the science targets assigned a fiber in at least one
    /// realization.
    Targeted,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnData {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
}

impl ColumnData {
    pub(crate) fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
        }
    }
}

/// A named column ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OutputColumn {
    pub(crate) name: String,
    pub(crate) data: ColumnData,
}

impl OutputColumn {
    pub(crate) fn int64<S: Into<String>>(name: S, data: Vec<i64>) -> OutputColumn {
        OutputColumn {
            name: name.into(),
            data: ColumnData::Int64(data),
        }
    }

    pub(crate) fn float64<S: Into<String>>(name: S, data: Vec<f64>) -> OutputColumn {
        OutputColumn {
            name: name.into(),
            data: ColumnData::Float64(data),
        }
    }
}

/// Something that can write a set of equal-length columns to a file.
pub(crate) trait TabularSink {
    /// Write `columns` to `file`, replacing it if it already exists. Integer
    /// header values (e.g. the number of realizations) are attached to the
    /// table.
    fn write_table(
        &self,
        file: &Path,
        columns: &[OutputColumn],
        header: &[(&str, i64)],
    ) -> Result<(), WriteError>;
}

/// Assemble the output columns: `TARGETID`, the optional extra key, `RA`,
/// `DEC`, `Z`, then one `BITWEIGHT<i>` column per packed word.
///
/// Row `j` of `targets` takes its bitweights from row `row_selection[j]` of
/// `packed`.
pub(crate) fn assemble_columns(
    targets: &TargetTable,
    packed: ArrayView2<i64>,
    row_selection: &[usize],
    extra_key: Option<&str>,
) -> Result<Vec<OutputColumn>, WriteError> {
    if row_selection.len() != targets.len() {
        return Err(WriteError::RowSelectionLength {
            num_selected: row_selection.len(),
            num_rows: targets.len(),
        });
    }
    let (num_packed, num_words) = packed.dim();
    if let Some(&index) = row_selection.iter().find(|&&i| i >= num_packed) {
        return Err(WriteError::RowSelection { index, num_packed });
    }

    let mut columns = Vec::with_capacity(4 + usize::from(extra_key.is_some()) + num_words);
    columns.push(OutputColumn::int64(
        COL_TARGETID,
        targets.target_ids().to_vec(),
    ));
    if let Some(extra_key) = extra_key {
        let extra = targets
            .extra_column(extra_key)
            .ok_or_else(|| WriteError::MissingExtraColumn {
                column: extra_key.to_string(),
            })?;
        columns.push(OutputColumn::int64(extra_key, extra.to_vec()));
    }
    columns.push(OutputColumn::float64(COL_RA, targets.ra().to_vec()));
    columns.push(OutputColumn::float64(COL_DEC, targets.dec().to_vec()));
    columns.push(OutputColumn::float64(COL_Z, targets.z().to_vec()));
    for (i_word, word_col) in packed.axis_iter(Axis(1)).enumerate() {
        columns.push(OutputColumn::int64(
            format!("{COL_BITWEIGHT_PREFIX}{i_word}"),
            row_selection.iter().map(|&row| word_col[row]).collect(),
        ));
    }

    // All columns must have the same length.
    for col in &columns {
        if col.data.len() != targets.len() {
            return Err(WriteError::ColumnLength {
                column: col.name.clone(),
                expected: targets.len(),
                actual: col.data.len(),
            });
        }
    }
    trace!(
        "Assembled columns: {}",
        columns.iter().map(|c| c.name.as_str()).join(", ")
    );
    Ok(columns)
}

/// Write a bitweight catalog to `<output_dir>/<kind>.<ext>`, returning the
/// path written.
///
/// # Arguments
///
/// * `output_dir` - the directory to write into. It's created if necessary.
/// * `format` - `fits` or `hdf5`. Anything else is rejected before any
///   filesystem access.
/// * `kind` - the logical catalog being written.
/// * `targets` - the rows of the output catalog.
/// * `packed` - bitweights with shape `[num_targets, num_words]`, as produced
///   by [`crate::pack_bitweights`].
/// * `num_realizations` - the number of realizations packed into `packed`.
/// * `row_selection` - for each row of `targets`, the row of `packed` it
///   corresponds to.
/// * `extra_key` - an optional extra integer column of `targets` to carry
///   into the output.
#[allow(clippy::too_many_arguments)]
pub fn write_output(
    output_dir: &Path,
    format: &str,
    kind: CatalogKind,
    targets: &TargetTable,
    packed: ArrayView2<i64>,
    num_realizations: usize,
    row_selection: &[usize],
    extra_key: Option<&str>,
) -> Result<PathBuf, WriteError> {
    let output_type = BitweightOutputType::parse(format)?;
    let columns = assemble_columns(targets, packed, row_selection, extra_key)?;

    std::fs::create_dir_all(output_dir).map_err(|error| WriteError::CreateDir {
        dir: output_dir.to_path_buf(),
        error,
    })?;
    let file = output_dir.join(format!("{kind}.{}", output_type.extension()));
    debug!(
        "Writing {} rows and {} columns to {}",
        targets.len(),
        columns.len(),
        file.display()
    );
    output_type.sink().write_table(
        &file,
        &columns,
        &[(NREAL_KEY, num_realizations as i64)],
    )?;
    Ok(file)
}

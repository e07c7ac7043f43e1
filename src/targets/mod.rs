// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loading science and sky targets.
//!
//! Catalogs are read into a [`RawTargetTable`], which may lack the optional
//! columns. [`RawTargetTable::normalise`] fills in any missing columns with
//! defaults and returns a [`TargetTable`]; the raw table is left untouched.
//! Every target from every table is then registered in a [`TargetSet`].

mod error;

pub use error::TargetsError;

use std::{collections::HashMap, path::Path};

use indexmap::IndexMap;
use log::{debug, trace};
use marlu::RADec;
use strum_macros::Display;

use crate::{
    constants::*,
    io::read::{open_table, TableRead},
};

/// Targets are identified by a 64-bit integer.
pub type TargetId = i64;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    #[strum(serialize = "science")]
    Science,
    #[strum(serialize = "sky")]
    Sky,
}

/// A single target.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub radec: RADec,
    pub z: f64,
    pub subpriority: f64,
    pub obsconditions: i64,
    pub kind: TargetKind,
}

/// Target columns exactly as they were read. Optional columns that weren't
/// in the catalog are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTargetTable {
    pub kind: TargetKind,
    pub target_ids: Vec<TargetId>,
    /// \[degrees\]
    pub ra: Vec<f64>,
    /// \[degrees\]
    pub dec: Vec<f64>,
    pub z: Option<Vec<f64>>,
    pub subpriority: Option<Vec<f64>>,
    pub obsconditions: Option<Vec<i64>>,
    /// Additional integer columns, in the order they were requested.
    pub extra: IndexMap<String, Vec<i64>>,
}

impl RawTargetTable {
    /// Read a target catalog. `TARGETID`, `RA` and `DEC` must be present, as
    /// must `Z` for science targets and all of `extra_columns`.
    pub fn read(
        file: &Path,
        kind: TargetKind,
        extra_columns: &[String],
    ) -> Result<RawTargetTable, TargetsError> {
        debug!("Reading {kind} targets from {}", file.display());
        let mut table = open_table(file)?;
        RawTargetTable::from_table(table.as_mut(), kind, extra_columns)
    }

    pub(crate) fn from_table(
        table: &mut dyn TableRead,
        kind: TargetKind,
        extra_columns: &[String],
    ) -> Result<RawTargetTable, TargetsError> {
        let target_ids = table.read_i64_col(COL_TARGETID)?;
        let ra = table.read_f64_col(COL_RA)?;
        let dec = table.read_f64_col(COL_DEC)?;
        let z = match kind {
            TargetKind::Science => Some(table.read_f64_col(COL_Z)?),
            TargetKind::Sky => table.read_optional_f64_col(COL_Z)?,
        };
        let subpriority = table.read_optional_f64_col(COL_SUBPRIORITY)?;
        let obsconditions = table.read_optional_i64_col(COL_OBSCONDITIONS)?;
        let mut extra = IndexMap::with_capacity(extra_columns.len());
        for col in extra_columns {
            extra.insert(col.clone(), table.read_i64_col(col)?);
        }
        trace!("Read {} {kind} targets", target_ids.len());

        Ok(RawTargetTable {
            kind,
            target_ids,
            ra,
            dec,
            z,
            subpriority,
            obsconditions,
            extra,
        })
    }

    /// Check that all columns are the same length and fill in any missing
    /// optional columns.
    pub fn normalise(&self) -> Result<TargetTable, TargetsError> {
        let n = self.target_ids.len();
        let check = |column: &str, actual: usize| {
            if actual == n {
                Ok(())
            } else {
                Err(TargetsError::ColumnLength {
                    column: column.to_string(),
                    expected: n,
                    actual,
                })
            }
        };
        check(COL_RA, self.ra.len())?;
        check(COL_DEC, self.dec.len())?;

        let z = match &self.z {
            Some(z) => {
                check(COL_Z, z.len())?;
                z.clone()
            }
            None => vec![DEFAULT_SKY_Z; n],
        };
        let subpriority = match &self.subpriority {
            Some(s) => {
                check(COL_SUBPRIORITY, s.len())?;
                s.clone()
            }
            None => {
                debug!("Using a default {COL_SUBPRIORITY} of {DEFAULT_SUBPRIORITY}");
                vec![DEFAULT_SUBPRIORITY; n]
            }
        };
        let obsconditions = match &self.obsconditions {
            Some(o) => {
                check(COL_OBSCONDITIONS, o.len())?;
                o.clone()
            }
            None => {
                debug!("Using a default {COL_OBSCONDITIONS} of {DEFAULT_OBSCONDITIONS}");
                vec![DEFAULT_OBSCONDITIONS; n]
            }
        };
        for (name, col) in &self.extra {
            check(name.as_str(), col.len())?;
        }

        Ok(TargetTable {
            kind: self.kind,
            target_ids: self.target_ids.clone(),
            ra: self.ra.clone(),
            dec: self.dec.clone(),
            z,
            subpriority,
            obsconditions,
            extra: self.extra.clone(),
        })
    }
}

/// A complete, column-oriented target catalog. All columns have the same
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTable {
    pub(crate) kind: TargetKind,
    pub(crate) target_ids: Vec<TargetId>,
    pub(crate) ra: Vec<f64>,
    pub(crate) dec: Vec<f64>,
    pub(crate) z: Vec<f64>,
    pub(crate) subpriority: Vec<f64>,
    pub(crate) obsconditions: Vec<i64>,
    pub(crate) extra: IndexMap<String, Vec<i64>>,
}

impl TargetTable {
    pub fn len(&self) -> usize {
        self.target_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target_ids.is_empty()
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn target_ids(&self) -> &[TargetId] {
        &self.target_ids
    }

    pub fn ra(&self) -> &[f64] {
        &self.ra
    }

    pub fn dec(&self) -> &[f64] {
        &self.dec
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn subpriority(&self) -> &[f64] {
        &self.subpriority
    }

    pub fn obsconditions(&self) -> &[i64] {
        &self.obsconditions
    }

    pub fn extra_column(&self, name: &str) -> Option<&[i64]> {
        self.extra.get(name).map(|v| v.as_slice())
    }

    /// Get a new table containing only the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any row index is out of range.
    pub fn select(&self, rows: &[usize]) -> TargetTable {
        fn take<T: Copy>(col: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().map(|&i| col[i]).collect()
        }

        TargetTable {
            kind: self.kind,
            target_ids: take(&self.target_ids, rows),
            ra: take(&self.ra, rows),
            dec: take(&self.dec, rows),
            z: take(&self.z, rows),
            subpriority: take(&self.subpriority, rows),
            obsconditions: take(&self.obsconditions, rows),
            extra: self
                .extra
                .iter()
                .map(|(name, col)| (name.clone(), take(col, rows)))
                .collect(),
        }
    }

    /// Iterate over the rows of this table as [`Target`]s.
    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        (0..self.len()).map(move |i| Target {
            id: self.target_ids[i],
            radec: RADec::from_degrees(self.ra[i], self.dec[i]),
            z: self.z[i],
            subpriority: self.subpriority[i],
            obsconditions: self.obsconditions[i],
            kind: self.kind,
        })
    }
}

/// Every target that can be given a fiber, keyed by ID in registration order.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: IndexMap<TargetId, Target>,
}

impl TargetSet {
    pub fn new() -> TargetSet {
        TargetSet::default()
    }

    /// Register all of the targets of a table. IDs must be unique across
    /// everything registered.
    pub fn add_table(&mut self, table: &TargetTable) -> Result<(), TargetsError> {
        self.targets.reserve(table.len());
        for target in table.iter() {
            let id = target.id;
            if self.targets.insert(id, target).is_some() {
                return Err(TargetsError::DuplicateTargetId { id });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn num_of_kind(&self, kind: TargetKind) -> usize {
        self.iter().filter(|t| t.kind == kind).count()
    }
}

/// Maps science TARGETIDs to their row in the assignment matrix.
#[derive(Debug, Clone)]
pub struct TargetIndexMap {
    rows: HashMap<TargetId, usize>,
}

impl TargetIndexMap {
    /// Build the map from IDs in row order.
    pub fn from_ids(ids: &[TargetId]) -> Result<TargetIndexMap, TargetsError> {
        let mut rows = HashMap::with_capacity(ids.len());
        for (row, &id) in ids.iter().enumerate() {
            if rows.insert(id, row).is_some() {
                return Err(TargetsError::DuplicateTargetId { id });
            }
        }
        Ok(TargetIndexMap { rows })
    }

    /// The matrix row of a target, if it is a known science target.
    pub fn get(&self, id: TargetId) -> Option<usize> {
        self.rows.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalise the science (and optionally sky) tables and register all of
/// their targets, science targets first.
pub fn load_targets(
    targets: &RawTargetTable,
    sky: Option<&RawTargetTable>,
) -> Result<(TargetTable, TargetSet, Option<TargetTable>), TargetsError> {
    let targets = targets.normalise()?;
    let sky = sky.map(|s| s.normalise()).transpose()?;

    let mut target_set = TargetSet::new();
    target_set.add_table(&targets)?;
    if let Some(sky) = &sky {
        target_set.add_table(sky)?;
    }
    debug!(
        "Registered {} science and {} sky targets",
        targets.len(),
        sky.as_ref().map(|s| s.len()).unwrap_or(0)
    );

    Ok((targets, target_set, sky))
}

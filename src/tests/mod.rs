// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{
    io::write::{FitsSink, Hdf5Sink, OutputColumn, TabularSink},
    targets::{RawTargetTable, TargetKind},
};

pub(crate) fn write_fits_table(file: &Path, columns: &[OutputColumn]) {
    FitsSink.write_table(file, columns, &[]).unwrap();
}

pub(crate) fn write_hdf5_table(file: &Path, columns: &[OutputColumn]) {
    Hdf5Sink.write_table(file, columns, &[]).unwrap();
}

/// Columns for a target catalog with only the required columns.
pub(crate) fn minimal_target_columns(ids: &[i64], ra: &[f64], dec: &[f64]) -> Vec<OutputColumn> {
    vec![
        OutputColumn::int64("TARGETID", ids.to_vec()),
        OutputColumn::float64("RA", ra.to_vec()),
        OutputColumn::float64("DEC", dec.to_vec()),
        OutputColumn::float64("Z", ids.iter().map(|&id| id as f64 / 10.0).collect()),
    ]
}

/// A raw science table without any of the optional columns.
pub(crate) fn raw_science(ids: &[i64], ra: &[f64], dec: &[f64]) -> RawTargetTable {
    RawTargetTable {
        kind: TargetKind::Science,
        target_ids: ids.to_vec(),
        ra: ra.to_vec(),
        dec: dec.to_vec(),
        z: Some(vec![0.5; ids.len()]),
        subpriority: None,
        obsconditions: None,
        extra: IndexMap::new(),
    }
}

/// A raw sky table without any of the optional columns.
pub(crate) fn raw_sky(ids: &[i64], ra: &[f64], dec: &[f64]) -> RawTargetTable {
    RawTargetTable {
        kind: TargetKind::Sky,
        target_ids: ids.to_vec(),
        ra: ra.to_vec(),
        dec: dec.to_vec(),
        z: None,
        subpriority: None,
        obsconditions: None,
        extra: IndexMap::new(),
    }
}

/// Input files for a small survey: a single tile with a single fiber that can
/// reach science targets 1, 2 and 3 (and sky target 100), but never science
/// target 4. Exactly one science target is assigned in every realization.
pub(crate) struct TinySurvey {
    pub(crate) targets: PathBuf,
    pub(crate) sky: PathBuf,
    pub(crate) tiles: PathBuf,
    pub(crate) hardware: PathBuf,
}

impl TinySurvey {
    pub(crate) const REACHABLE: [i64; 3] = [1, 2, 3];
    pub(crate) const UNREACHABLE: i64 = 4;

    pub(crate) fn write(dir: &Path) -> TinySurvey {
        let targets = dir.join("targets.fits");
        let mut columns = minimal_target_columns(
            &[1, 2, 3, 4],
            &[10.0, 10.1, 9.9, 100.0],
            &[0.0, 0.1, -0.1, 50.0],
        );
        columns.push(OutputColumn::int64("DESI_TARGET", vec![11, 12, 13, 14]));
        write_fits_table(&targets, &columns);

        let sky = dir.join("sky.fits");
        write_fits_table(
            &sky,
            &[
                OutputColumn::int64("TARGETID", vec![100]),
                OutputColumn::float64("RA", vec![10.0]),
                OutputColumn::float64("DEC", vec![0.2]),
            ],
        );

        let tiles = dir.join("tiles.fits");
        write_fits_table(
            &tiles,
            &[
                OutputColumn::int64("TILEID", vec![1000]),
                OutputColumn::float64("RA", vec![10.0]),
                OutputColumn::float64("DEC", vec![0.0]),
            ],
        );

        let hardware = dir.join("hardware.toml");
        std::fs::write(
            &hardware,
            "patrol_radius_deg = 1.0\n\n[[locations]]\nlocation = 0\nxi_deg = 0.0\neta_deg = 0.0\n",
        )
        .unwrap();

        TinySurvey {
            targets,
            sky,
            tiles,
            hardware,
        }
    }
}

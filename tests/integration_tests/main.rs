// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod bitweights;
mod verify;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn bitweights() -> Command {
    Command::cargo_bin("bitweights").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write an HDF5 table with one dataset per column.
fn write_hdf5_table(file: &Path, int_cols: &[(&str, &[i64])], float_cols: &[(&str, &[f64])]) {
    let h5 = hdf5::File::create(file).unwrap();
    for (name, data) in int_cols {
        h5.new_dataset_builder()
            .with_data(*data)
            .create(*name)
            .unwrap();
    }
    for (name, data) in float_cols {
        h5.new_dataset_builder()
            .with_data(*data)
            .create(*name)
            .unwrap();
    }
    h5.close().unwrap();
}

struct Files {
    targets: String,
    sky: String,
    tiles: String,
    hardware: String,
}

/// A DESI-sized TARGETID; survey targets are numbered up from here.
const FIRST_TARGETID: i64 = 39627788403902475;

fn survey_target_ids() -> Vec<i64> {
    (0..6).map(|i| FIRST_TARGETID + i).collect()
}

/// Two tiles, each with two fibers, over six science targets and two sky
/// targets. The last science target can't be reached by any fiber.
fn write_survey(dir: &Path) -> Files {
    let targets = dir.join("targets.h5");
    write_hdf5_table(
        &targets,
        &[
            ("TARGETID", survey_target_ids().as_slice()),
            ("DESI_TARGET", &[1, 1, 2, 2, 4, 4]),
        ],
        &[
            ("RA", &[20.0, 20.05, 19.95, 30.0, 30.05, 150.0]),
            ("DEC", &[5.0, 5.05, 4.95, -5.0, -5.05, 60.0]),
            ("Z", &[0.8, 0.9, 1.0, 1.1, 1.2, 1.3]),
            ("SUBPRIORITY", &[0.1, 0.5, 0.9, 0.2, 0.8, 0.3]),
        ],
    );

    let sky = dir.join("sky.h5");
    write_hdf5_table(
        &sky,
        &[("TARGETID", &[FIRST_TARGETID + 1001, FIRST_TARGETID + 1002])],
        &[("RA", &[20.1, 30.1]), ("DEC", &[5.1, -5.1])],
    );

    let tiles = dir.join("tiles.h5");
    write_hdf5_table(
        &tiles,
        &[("TILEID", &[11, 12])],
        &[("RA", &[20.0, 30.0]), ("DEC", &[5.0, -5.0])],
    );

    let hardware = dir.join("hardware.json");
    std::fs::write(
        &hardware,
        r#"{
            "patrol_radius_deg": 0.5,
            "locations": [
                { "location": 0, "xi_deg": 0.0, "eta_deg": 0.0 },
                { "location": 1, "xi_deg": 0.05, "eta_deg": 0.05 }
            ]
        }"#,
    )
    .unwrap();

    let s = |p: PathBuf| p.display().to_string();
    Files {
        targets: s(targets),
        sky: s(sky),
        tiles: s(tiles),
        hardware: s(hardware),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{bitweights, get_cmd_output, survey_target_ids, write_survey, Files};
use lss_bitweights::{assignment_counts, read_bitweight_catalog, unpack_bitweights};

#[test]
fn test_full_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        targets,
        sky,
        tiles,
        hardware,
    } = write_survey(tmp_dir.path());
    let output_dir = tmp_dir.path().join("out");

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--targets", &targets,
            "--sky", &sky,
            "--tiles", &tiles,
            "--hardware", &hardware,
            "--output-dir", &output_dir.display().to_string(),
            "--catalog-kind", "parent",
            "--extra-key", "DESI_TARGET",
            "--num-realizations", "130",
            "--seed", "3",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("bitweights complete"), "{stdout}");

    let catalog = read_bitweight_catalog(&output_dir.join("parent.fits")).unwrap();
    assert_eq!(catalog.target_ids, survey_target_ids());
    assert_eq!(catalog.num_realizations, 130);
    assert_eq!(catalog.bitweights.dim(), (6, 3));
    assert_eq!(
        catalog.extra,
        Some(("DESI_TARGET".to_string(), vec![1, 1, 2, 2, 4, 4]))
    );

    // Two fibers per tile, and both tiles have at least two reachable science
    // targets: four science assignments per realization.
    let counts = assignment_counts(catalog.bitweights.view());
    assert_eq!(counts.sum(), 4 * 130);
    assert_eq!(counts[5], 0);
    let matrix = unpack_bitweights(catalog.bitweights.view(), 130).unwrap();
    for column in matrix.columns() {
        assert_eq!(column.iter().filter(|&&x| x).count(), 4);
    }
    // Words use all 64 bits.
    assert!(catalog
        .bitweights
        .column(0)
        .iter()
        .any(|&w| w < i64::from(i32::MIN) || w > i64::from(i32::MAX)));

    // The same run written as HDF5 reads back identically.
    let hdf5_dir = tmp_dir.path().join("hdf5");
    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--targets", &targets,
            "--sky", &sky,
            "--tiles", &tiles,
            "--hardware", &hardware,
            "--output-dir", &hdf5_dir.display().to_string(),
            "--output-format", "hdf5",
            "--catalog-kind", "parent",
            "--extra-key", "DESI_TARGET",
            "--num-realizations", "130",
            "--seed", "3",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());
    let hdf5 = read_bitweight_catalog(&hdf5_dir.join("parent.hdf5")).unwrap();
    assert_eq!(catalog, hdf5);
}

#[test]
fn test_save_toml_reproduces_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        targets,
        tiles,
        hardware,
        ..
    } = write_survey(tmp_dir.path());
    let args_file = tmp_dir.path().join("args.toml");
    let first = tmp_dir.path().join("first");

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "run",
            "--targets", &targets,
            "--tiles", &tiles,
            "--hardware", &hardware,
            "--output-dir", &first.display().to_string(),
            "--output-format", "hdf5",
            "--seed", "17",
            "-n", "64",
            "--save-toml", &args_file.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());
    assert!(args_file.exists());

    // Rerun from the saved arguments, only changing the output directory.
    let second = tmp_dir.path().join("second");
    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            &args_file.display().to_string(),
            "--output-dir", &second.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());

    let first = read_bitweight_catalog(&first.join("targeted.hdf5")).unwrap();
    let second = read_bitweight_catalog(&second.join("targeted.hdf5")).unwrap();
    assert_eq!(first, second);
    assert!(!first.target_ids.contains(&survey_target_ids()[5]));
}

#[test]
fn test_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        targets,
        tiles,
        hardware,
        ..
    } = write_survey(tmp_dir.path());
    let output_dir = tmp_dir.path().join("out");

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--targets", &targets,
            "--tiles", &tiles,
            "--hardware", &hardware,
            "--output-dir", &output_dir.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!output_dir.exists());
}

#[test]
fn test_bad_arguments_fail() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        targets,
        tiles,
        hardware,
        ..
    } = write_survey(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--targets", &targets,
            "--tiles", &tiles,
            "--hardware", &hardware,
            "--num-realizations", "0",
        ])
        .ok();
    assert!(cmd.is_err());

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--tiles", &tiles,
            "--hardware", &hardware,
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No target catalog"), "{stderr}");

    #[rustfmt::skip]
    let cmd = bitweights()
        .args([
            "bitweights",
            "--targets", &format!("{}/*.nothing", tmp_dir.path().display()),
            "--tiles", &tiles,
            "--hardware", &hardware,
        ])
        .ok();
    assert!(cmd.is_err());
}

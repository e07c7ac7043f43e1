// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{bitweights, get_cmd_output, write_survey, Files};

#[test]
fn test_verify_output() {
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
            "--catalog-kind", "parent",
            "-n", "70",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "bitweights failed: {}", cmd.err().unwrap());
    let catalog = output_dir.join("parent.fits").display().to_string();

    let cmd = bitweights()
        .args(["bitweights-verify", &catalog, "-n", "70"])
        .ok();
    assert!(cmd.is_ok(), "verify failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("6 targets (Ngal)"), "{stdout}");
    assert!(stdout.contains("2 bitweight words (Nout)"), "{stdout}");
    assert!(stdout.contains("1 targets were never assigned"), "{stdout}");

    // The wrong number of realizations is caught.
    let cmd = bitweights()
        .args(["bitweights-verify", &catalog, "-n", "128"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Expected 128 realizations"), "{stderr}");
}

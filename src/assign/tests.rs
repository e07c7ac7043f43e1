// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{collections::HashSet, io::Write};

use approx::assert_abs_diff_eq;
use indoc::indoc;
use marlu::RADec;
use tempfile::{Builder, TempDir};

use super::{hardware::deproject, *};
use crate::{
    io::write::OutputColumn,
    targets::{load_targets, TargetKind},
    tests::{raw_science, raw_sky, write_fits_table},
};

fn target_set(ids: &[i64], ra: &[f64], dec: &[f64]) -> TargetSet {
    let (_, set, _) = load_targets(&raw_science(ids, ra, dec), None).unwrap();
    set
}

fn single_fiber(patrol_radius_deg: f64) -> Hardware {
    Hardware {
        patrol_radius_deg,
        locations: vec![FiberLocation {
            location: 0,
            xi_deg: 0.0,
            eta_deg: 0.0,
        }],
    }
}

fn tile(id: TileId, ra: f64, dec: f64) -> Tile {
    Tile {
        id,
        centre: RADec::from_degrees(ra, dec),
        obsconditions: -1,
    }
}

#[test]
fn test_deproject() {
    let centre = RADec::from_degrees(10.0, 0.0);
    let p = deproject(centre, 0.0, 0.0);
    assert_abs_diff_eq!(p.ra, centre.ra);
    assert_abs_diff_eq!(p.dec, centre.dec);

    // A small offset north lands (almost exactly) that far north.
    let p = deproject(centre, 0.0, 1.0_f64.to_radians());
    assert_abs_diff_eq!(p.ra, centre.ra, epsilon = 1e-10);
    assert_abs_diff_eq!(p.dec, 1.0_f64.to_radians(), epsilon = 1e-5);

    // Offsets in xi move along RA, wrapping through zero.
    let centre = RADec::from_degrees(0.0, 0.0);
    let p = deproject(centre, -1.0_f64.to_radians(), 0.0);
    assert_abs_diff_eq!(p.ra, 359.0_f64.to_radians(), epsilon = 1e-5);
    assert_abs_diff_eq!(p.dec, 0.0, epsilon = 1e-10);
}

#[test]
fn test_tree_matches_brute_force() {
    let ids: Vec<i64> = (0..200).collect();
    let ra: Vec<f64> = ids.iter().map(|&i| (i as f64 * 7.3) % 5.0).collect();
    let dec: Vec<f64> = ids.iter().map(|&i| (i as f64 * 3.1) % 4.0 - 2.0).collect();
    let set = target_set(&ids, &ra, &dec);
    let tree = TargetTree::new(&set);
    assert_eq!(tree.len(), 200);

    let centre = RADec::from_degrees(2.5, 0.0);
    let radius = 1.2_f64.to_radians();
    let mut found: Vec<i64> = tree.within(centre, radius).map(|t| t.id).collect();
    found.sort_unstable();
    let expected: Vec<i64> = set
        .iter()
        .filter(|t| t.radec.separation(centre) <= radius)
        .map(|t| t.id)
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(found, expected);
}

#[test]
fn test_availability_respects_patrol_radius() {
    let set = target_set(&[1, 2, 3], &[10.0, 10.0, 10.0], &[0.0, 0.05, 0.5]);
    let setup = build_session(&set, vec![tile(100, 10.0, 0.0)], single_fiber(0.1)).unwrap();

    assert_eq!(setup.targets_available.location(100, 0), &[1, 2]);
    assert_eq!(setup.targets_available.location(100, 1), &[] as &[TargetId]);
    assert_eq!(setup.targets_available.location(101, 0), &[] as &[TargetId]);
    assert_eq!(setup.locations_available.get(1), &[(100, 0)]);
    assert_eq!(setup.locations_available.get(2), &[(100, 0)]);
    assert!(setup.locations_available.get(3).is_empty());
    assert_eq!(setup.locations_available.len(), 2);
}

#[test]
fn test_availability_respects_obsconditions() {
    let mut raw = raw_science(&[1, 2, 3], &[10.0; 3], &[0.0; 3]);
    raw.obsconditions = Some(vec![1, 2, 3]);
    let (_, set, _) = load_targets(&raw, None).unwrap();
    let mut dark = tile(7, 10.0, 0.0);
    dark.obsconditions = 1;
    let mut bright = tile(8, 10.0, 0.0);
    bright.obsconditions = 2;

    let setup = build_session(&set, vec![dark, bright], single_fiber(1.0)).unwrap();
    assert_eq!(setup.targets_available.location(7, 0), &[1, 3]);
    assert_eq!(setup.targets_available.location(8, 0), &[2, 3]);
    assert_eq!(setup.locations_available.get(3), &[(7, 0), (8, 0)]);
}

#[test]
fn test_offset_fiber_positions() {
    // Two fibers, one at the tile centre and one 1 degree north of it.
    let set = target_set(&[1, 2], &[10.0, 10.0], &[0.0, 1.0]);
    let hardware = Hardware {
        patrol_radius_deg: 0.05,
        locations: vec![
            FiberLocation {
                location: 10,
                xi_deg: 0.0,
                eta_deg: 0.0,
            },
            FiberLocation {
                location: 11,
                xi_deg: 0.0,
                eta_deg: 1.0,
            },
        ],
    };
    let setup = build_session(&set, vec![tile(1, 10.0, 0.0)], hardware).unwrap();
    assert_eq!(setup.targets_available.location(1, 10), &[1]);
    assert_eq!(setup.targets_available.location(1, 11), &[2]);
    // Locations keep their hardware order.
    assert_eq!(
        setup
            .targets_available
            .tile(1)
            .unwrap()
            .keys()
            .copied()
            .collect::<Vec<_>>(),
        vec![10, 11]
    );
}

#[test]
fn test_build_session_config_errors() {
    let set = target_set(&[1], &[0.0], &[0.0]);

    let result = build_session(&set, vec![], single_fiber(0.1));
    assert!(matches!(result, Err(AssignError::NoTiles)));

    let result = build_session(
        &set,
        vec![tile(1, 0.0, 0.0), tile(1, 1.0, 0.0)],
        single_fiber(0.1),
    );
    assert!(matches!(result, Err(AssignError::DuplicateTileId { id: 1 })));

    for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = build_session(&set, vec![tile(1, 0.0, 0.0)], single_fiber(radius));
        assert!(matches!(result, Err(AssignError::BadPatrolRadius { .. })));
    }

    let mut hardware = single_fiber(0.1);
    hardware.locations.clear();
    let result = build_session(&set, vec![tile(1, 0.0, 0.0)], hardware);
    assert!(matches!(result, Err(AssignError::NoLocations)));

    let mut hardware = single_fiber(0.1);
    hardware.locations.push(hardware.locations[0]);
    let result = build_session(&set, vec![tile(1, 0.0, 0.0)], hardware);
    assert!(matches!(
        result,
        Err(AssignError::DuplicateLocationId { id: 0 })
    ));

    let empty = TargetSet::new();
    let result = build_session(&empty, vec![tile(1, 0.0, 0.0)], single_fiber(0.1));
    assert!(matches!(result, Err(AssignError::NoTargets)));
}

#[test]
fn test_build_session_is_deterministic() {
    let ids: Vec<i64> = (0..50).collect();
    let ra: Vec<f64> = ids.iter().map(|&i| (i as f64 * 0.37) % 2.0).collect();
    let dec: Vec<f64> = ids.iter().map(|&i| (i as f64 * 0.61) % 2.0 - 1.0).collect();
    let set = target_set(&ids, &ra, &dec);
    let tiles = vec![tile(1, 1.0, 0.0), tile(2, 0.5, -0.5)];

    let a = build_session(&set, tiles.clone(), single_fiber(0.7)).unwrap();
    let b = build_session(&set, tiles, single_fiber(0.7)).unwrap();
    assert_eq!(a.targets_available, b.targets_available);
    assert_eq!(a.locations_available, b.locations_available);
}

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_read_hardware_toml() {
    let file = write_temp(
        ".toml",
        indoc! {r#"
            patrol_radius_deg = 0.03

            [[locations]]
            location = 0
            xi_deg = 0.0
            eta_deg = 0.0

            [[locations]]
            location = 1
            xi_deg = 0.1
            eta_deg = -0.2
        "#},
    );
    let hardware = Hardware::read(file.path()).unwrap();
    assert_abs_diff_eq!(hardware.patrol_radius_deg, 0.03);
    assert_eq!(hardware.locations.len(), 2);
    assert_eq!(
        hardware.locations[1],
        FiberLocation {
            location: 1,
            xi_deg: 0.1,
            eta_deg: -0.2
        }
    );
}

#[test]
fn test_read_hardware_json() {
    let file = write_temp(
        ".json",
        indoc! {r#"
            {
                "patrol_radius_deg": 0.03,
                "locations": [
                    { "location": 5, "xi_deg": 0.0, "eta_deg": 0.0 }
                ]
            }
        "#},
    );
    let hardware = Hardware::read(file.path()).unwrap();
    assert_eq!(hardware.locations[0].location, 5);
}

#[test]
fn test_read_hardware_errors() {
    let file = write_temp(".yaml", "patrol_radius_deg: 0.03");
    assert!(matches!(
        Hardware::read(file.path()),
        Err(AssignError::HardwareFileType { .. })
    ));

    let file = write_temp(".toml", "patrol_radius_deg = \"big\"\nlocations = []");
    assert!(matches!(
        Hardware::read(file.path()),
        Err(AssignError::HardwareParse { .. })
    ));

    let file = write_temp(".toml", "patrol_radius_deg = 1.0\nlocations = []");
    assert!(matches!(
        Hardware::read(file.path()),
        Err(AssignError::NoLocations)
    ));
}

#[test]
fn test_read_tiles() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("tiles.fits");
    write_fits_table(
        &file,
        &[
            OutputColumn::int64("TILEID", vec![1000, 1001]),
            OutputColumn::float64("RA", vec![150.0, 151.0]),
            OutputColumn::float64("DEC", vec![2.0, 2.5]),
        ],
    );
    let tiles = read_tiles(&file).unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[1].id, 1001);
    assert_abs_diff_eq!(tiles[1].centre.ra, 151.0_f64.to_radians());
    assert_abs_diff_eq!(tiles[1].centre.dec, 2.5_f64.to_radians());
    // No OBSCONDITIONS column means every target can be observed.
    assert_eq!(tiles[0].obsconditions, -1);
    assert!(tiles[0].observes(1));
    assert!(tiles[0].observes(4));
}

fn crowded_setup(set: &TargetSet) -> AssignmentSetup<'_> {
    let hardware = Hardware {
        patrol_radius_deg: 0.5,
        locations: (0..4)
            .map(|i| FiberLocation {
                location: i,
                xi_deg: 0.2 * f64::from(i),
                eta_deg: 0.0,
            })
            .collect(),
    };
    build_session(
        set,
        vec![tile(1, 10.0, 0.0), tile(2, 10.2, 0.1), tile(3, 9.9, -0.1)],
        hardware,
    )
    .unwrap()
}

fn crowded_targets() -> TargetSet {
    let ids: Vec<i64> = (0..40).collect();
    let ra: Vec<f64> = ids.iter().map(|&i| 9.8 + (i as f64 * 0.137) % 1.0).collect();
    let dec: Vec<f64> = ids.iter().map(|&i| (i as f64 * 0.071) % 0.6 - 0.3).collect();
    let sky = raw_sky(&[1000, 1001], &[10.0, 10.2], &[0.0, 0.0]);
    let (_, set, _) = load_targets(&raw_science(&ids, &ra, &dec), Some(&sky)).unwrap();
    set
}

#[test]
fn test_random_assigner_is_deterministic() {
    let set = crowded_targets();
    let setup = crowded_setup(&set);
    let assigner = RandomAssigner::new(42);
    for realization in [0, 1, 63, 64] {
        let a = assigner.assign(&setup, realization).unwrap();
        let b = assigner.assign(&setup, realization).unwrap();
        assert_eq!(a, b);
        assert!(a.num_assigned() > 0);
    }
}

#[test]
fn test_random_assigner_never_assigns_twice() {
    let set = crowded_targets();
    let setup = crowded_setup(&set);
    let assigner = RandomAssigner::new(7);
    for realization in 0..20 {
        let assignment = assigner.assign(&setup, realization).unwrap();
        let mut seen = HashSet::new();
        for tile_id in assignment.tile_ids().collect::<Vec<_>>() {
            for (&location, &id) in assignment.tile_location_target(tile_id).unwrap() {
                assert!(seen.insert(id), "target {id} assigned twice");
                // Only reachable targets are assigned.
                assert!(setup
                    .targets_available
                    .location(tile_id, location)
                    .contains(&id));
            }
        }
    }
}

#[test]
fn test_random_assigner_prefers_science_targets() {
    // A single fiber that can reach one science and one sky target always
    // takes the science target.
    let sky = raw_sky(&[99], &[10.0], &[0.0]);
    let (_, set, _) =
        load_targets(&raw_science(&[1], &[10.0], &[0.01]), Some(&sky)).unwrap();
    let setup = build_session(&set, vec![tile(5, 10.0, 0.0)], single_fiber(0.1)).unwrap();
    let assigner = RandomAssigner::new(0);
    for realization in 0..10 {
        let assignment = assigner.assign(&setup, realization).unwrap();
        let tile = assignment.tile_location_target(5).unwrap();
        assert_eq!(tile.get(&0), Some(&1));
        assert_eq!(set.get(1).unwrap().kind, TargetKind::Science);
    }
}

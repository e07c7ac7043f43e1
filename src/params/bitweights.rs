// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use ndarray::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    assign::{
        build_session, AssignError, AssignmentSetup, FiberAssigner, Hardware, RandomAssigner,
        Tile,
    },
    bitweights::{accumulate_column, pack_bitweights, AccumulateCounts, PackError},
    io::write::{write_output, BitweightOutputType, CatalogKind, WriteError},
    targets::{TargetIndexMap, TargetSet, TargetTable, TargetsError},
    PROGRESS_BARS,
};

pub(crate) struct BitweightsParams {
    /// The science targets; one row of bitweights is made for each.
    pub(crate) targets: TargetTable,
    /// Science and sky targets.
    pub(crate) target_set: TargetSet,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) hardware: Hardware,
    pub(crate) output_dir: PathBuf,
    pub(crate) output_type: BitweightOutputType,
    pub(crate) catalog_kind: CatalogKind,
    pub(crate) extra_key: Option<String>,
    pub(crate) num_realizations: NonZeroUsize,
    pub(crate) seed: u64,
}

impl BitweightsParams {
    /// Run every realization, pack the results and write them out. Returns
    /// the path of the written catalog.
    pub(crate) fn run(&self) -> Result<PathBuf, BitweightsRunError> {
        let Self {
            targets,
            target_set,
            tiles,
            hardware,
            output_dir,
            output_type,
            catalog_kind,
            extra_key,
            num_realizations,
            seed,
        } = self;

        let index_map = TargetIndexMap::from_ids(targets.target_ids())?;
        let (matrix, counts) = if target_set.is_empty() {
            info!("There are no targets; skipping fiber assignment");
            (
                Array2::from_elem((0, num_realizations.get()), false),
                AccumulateCounts::default(),
            )
        } else {
            let setup = build_session(target_set, tiles.clone(), hardware.clone())?;
            let assigner = RandomAssigner::new(*seed);
            info!("Running {num_realizations} fiber-assignment realizations");
            compute_assignment_matrix(&setup, &assigner, &index_map, num_realizations.get())?
        };
        info!(
            "{} fibers were assigned to science targets across all realizations",
            counts.assigned
        );
        debug!(
            "{} assigned fibers weren't on science targets and were skipped",
            counts.skipped
        );

        let packed = pack_bitweights(matrix.view())?;

        let path = match catalog_kind {
            CatalogKind::Parent => {
                let rows: Vec<usize> = (0..targets.len()).collect();
                write_catalog(
                    output_dir,
                    *output_type,
                    *catalog_kind,
                    targets,
                    packed.view(),
                    num_realizations.get(),
                    &rows,
                    extra_key.as_deref(),
                )?
            }
            CatalogKind::Targeted => {
                let rows = targeted_rows(matrix.view());
                info!(
                    "{} of {} targets were assigned in at least one realization",
                    rows.len(),
                    targets.len()
                );
                write_catalog(
                    output_dir,
                    *output_type,
                    *catalog_kind,
                    &targets.select(&rows),
                    packed.view(),
                    num_realizations.get(),
                    &rows,
                    extra_key.as_deref(),
                )?
            }
        };
        info!("Wrote {}", path.display());

        Ok(path)
    }
}

#[allow(clippy::too_many_arguments)]
fn write_catalog(
    output_dir: &Path,
    output_type: BitweightOutputType,
    catalog_kind: CatalogKind,
    targets: &TargetTable,
    packed: ArrayView2<i64>,
    num_realizations: usize,
    rows: &[usize],
    extra_key: Option<&str>,
) -> Result<PathBuf, WriteError> {
    write_output(
        output_dir,
        &output_type.to_string(),
        catalog_kind,
        targets,
        packed,
        num_realizations,
        rows,
        extra_key,
    )
}

/// The rows of targets that were assigned in at least one realization.
fn targeted_rows(matrix: ArrayView2<bool>) -> Vec<usize> {
    matrix
        .outer_iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|&b| b))
        .map(|(i, _)| i)
        .collect()
}

/// Run `num_realizations` realizations of `assigner` and record which science
/// targets were assigned in each. Realizations are run in parallel, each
/// writing only to its own column of the returned `[num_targets,
/// num_realizations]` matrix.
pub(crate) fn compute_assignment_matrix<A: FiberAssigner>(
    setup: &AssignmentSetup,
    assigner: &A,
    index_map: &TargetIndexMap,
    num_realizations: usize,
) -> Result<(Array2<bool>, AccumulateCounts), AssignError> {
    let mut matrix = Array2::from_elem((index_map.len(), num_realizations), false);

    let progress = ProgressBar::with_draw_target(
        Some(num_realizations as _),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:3}/{len:3} ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Realizations");
    progress.tick();

    let counts = matrix
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .map(|(realization, mut column)| {
            let assignment = assigner.assign(setup, realization)?;
            let mut counts = AccumulateCounts::default();
            for tile in &setup.tiles {
                counts += accumulate_column(&assignment, tile.id, index_map, column.view_mut());
            }
            progress.inc(1);
            Ok(counts)
        })
        .try_reduce(AccumulateCounts::default, |mut a, b| {
            a += b;
            Ok(a)
        })?;
    progress.abandon_with_message("Finished realizations");

    Ok((matrix, counts))
}

#[derive(Error, Debug)]
pub(crate) enum BitweightsRunError {
    #[error(transparent)]
    Targets(#[from] TargetsError),

    #[error(transparent)]
    Assign(#[from] AssignError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

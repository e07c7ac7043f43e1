// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, InfoPrinter, Warn, ARG_FILE_HELP, CATALOG_KIND_HELP,
    NUM_REALIZATIONS_HELP, OUTPUT_FORMAT_HELP, SEED_HELP,
};
use crate::{
    assign::{read_tiles, Hardware},
    constants::{DEFAULT_NUM_REALIZATIONS, DEFAULT_SEED},
    io::{
        get_single_match_from_glob,
        write::{BitweightOutputType, CatalogKind, CATALOG_KINDS},
    },
    params::BitweightsParams,
    targets::{load_targets, RawTargetTable, TargetKind},
    BitweightsError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct BitweightsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the science target catalog (FITS or HDF5). Glob patterns are
    /// allowed but must match exactly one file.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) targets: Option<String>,

    /// Path to a sky target catalog (FITS or HDF5). Sky targets may be
    /// assigned fibers but never get bitweights.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) sky: Option<String>,

    /// Path to the tile table (FITS or HDF5) with TILEID, RA and DEC columns.
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) tiles: Option<String>,

    /// Path to the focal-plane hardware description (TOML or JSON).
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) hardware: Option<String>,

    /// The directory to write the bitweight catalog into. It is created if
    /// it doesn't exist. Default: the current directory
    #[clap(short, long, help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    #[clap(long, help = OUTPUT_FORMAT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_format: Option<String>,

    #[clap(long, help = CATALOG_KIND_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) catalog_kind: Option<String>,

    /// An extra integer column of the target catalog (e.g. DESI_TARGET) to
    /// carry into the output.
    #[clap(long, help_heading = "OUTPUT FILES")]
    pub(super) extra_key: Option<String>,

    #[clap(short, long, help = NUM_REALIZATIONS_HELP.as_str(), help_heading = "ASSIGNMENT")]
    pub(super) num_realizations: Option<NonZeroUsize>,

    #[clap(long, help = SEED_HELP.as_str(), help_heading = "ASSIGNMENT")]
    pub(super) seed: Option<u64>,
}

impl BitweightsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct, preferring CLI parameters over those in the
    /// file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<BitweightsArgs, BitweightsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let BitweightsArgs {
                args_file: _,
                targets,
                sky,
                tiles,
                hardware,
                output_dir,
                output_format,
                catalog_kind,
                extra_key,
                num_realizations,
                seed,
            } = unpack_arg_file!(arg_file);

            Ok(BitweightsArgs {
                args_file: None,
                targets: cli_args.targets.or(targets),
                sky: cli_args.sky.or(sky),
                tiles: cli_args.tiles.or(tiles),
                hardware: cli_args.hardware.or(hardware),
                output_dir: cli_args.output_dir.or(output_dir),
                output_format: cli_args.output_format.or(output_format),
                catalog_kind: cli_args.catalog_kind.or(catalog_kind),
                extra_key: cli_args.extra_key.or(extra_key),
                num_realizations: cli_args.num_realizations.or(num_realizations),
                seed: cli_args.seed.or(seed),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<BitweightsParams, BitweightsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            targets,
            sky,
            tiles,
            hardware,
            output_dir,
            output_format,
            catalog_kind,
            extra_key,
            num_realizations,
            seed,
        } = self;

        let targets_file = get_single_match_from_glob(
            &targets.ok_or(BitweightsArgsError::NoTargets)?,
        )?;
        let tiles_file = get_single_match_from_glob(&tiles.ok_or(BitweightsArgsError::NoTiles)?)?;
        let hardware_file =
            get_single_match_from_glob(&hardware.ok_or(BitweightsArgsError::NoHardware)?)?;
        let sky_file = sky.map(|s| get_single_match_from_glob(&s)).transpose()?;
        let output_type = match output_format {
            Some(f) => BitweightOutputType::parse(&f)?,
            None => BitweightOutputType::Fits,
        };
        let catalog_kind = match catalog_kind {
            Some(k) => CatalogKind::from_str(&k.trim().to_lowercase())
                .map_err(|_| BitweightsArgsError::BadCatalogKind(k))?,
            None => CatalogKind::Targeted,
        };
        let num_realizations = num_realizations.unwrap_or_else(|| {
            NonZeroUsize::new(DEFAULT_NUM_REALIZATIONS).unwrap_or(NonZeroUsize::MIN)
        });
        let seed = seed.unwrap_or(DEFAULT_SEED);
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));

        let extra_columns: Vec<String> = extra_key.iter().cloned().collect();
        let raw_targets = RawTargetTable::read(&targets_file, TargetKind::Science, &extra_columns)?;
        let raw_sky = sky_file
            .as_deref()
            .map(|f| RawTargetTable::read(f, TargetKind::Sky, &[]))
            .transpose()?;
        let (targets, target_set, sky_table) = load_targets(&raw_targets, raw_sky.as_ref())?;
        let tiles = read_tiles(&tiles_file)?;
        let hardware = Hardware::read(&hardware_file)?;

        let mut printer = InfoPrinter::new("Bitweights inputs".into());
        printer.push_block(vec![
            format!("Targets: {}", targets_file.display()).into(),
            format!("{} science targets", targets.len()).into(),
        ]);
        match (&sky_file, &sky_table) {
            (Some(f), Some(s)) => printer.push_block(vec![
                format!("Sky: {}", f.display()).into(),
                format!("{} sky targets", s.len()).into(),
            ]),
            _ => "No sky targets were supplied; unused fibers will stay empty".warn(),
        }
        printer.push_block(vec![
            format!("Tiles: {}", tiles_file.display()).into(),
            format!("{} tiles", tiles.len()).into(),
        ]);
        printer.push_block(vec![
            format!("Hardware: {}", hardware_file.display()).into(),
            format!(
                "{} fiber locations, patrol radius {}°",
                hardware.locations.len(),
                hardware.patrol_radius_deg
            )
            .into(),
        ]);
        printer.display();

        let mut printer = InfoPrinter::new("Bitweights outputs".into());
        printer.push_line(
            format!(
                "{} catalog: {}",
                catalog_kind,
                output_dir
                    .join(format!("{catalog_kind}.{}", output_type.extension()))
                    .display()
            )
            .into(),
        );
        printer.push_line(format!("{num_realizations} realizations, seed {seed}").into());
        if let Some(k) = &extra_key {
            printer.push_line(format!("Extra column: {k}").into());
        }
        printer.display();

        if targets.is_empty() {
            "The target catalog is empty; the output catalog will have no rows".warn();
        }
        display_warnings();

        Ok(BitweightsParams {
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
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), BitweightsError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum BitweightsArgsError {
    #[error("No target catalog was specified")]
    NoTargets,

    #[error("No tile table was specified")]
    NoTiles,

    #[error("No hardware description was specified")]
    NoHardware,

    #[error("Catalog kind '{0}' is not supported. Supported kinds: {}", *CATALOG_KINDS)]
    BadCatalogKind(String),
}

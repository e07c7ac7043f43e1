// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to check bitweight catalogs and summarise them.


use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use log::debug;
use thiserror::Error;

use super::common::InfoPrinter;
use crate::{
    bitweights::{assignment_counts, unpack_bitweights, PackError},
    constants::BITS_PER_WORD,
    io::read::{read_bitweight_catalog, BitweightCatalog, ReadError},
    BitweightsError,
};

/// Check that a bitweight catalog can be read, that its width matches its
/// number of realizations and that no pad bits are set.
#[derive(Parser, Debug)]
pub(super) struct VerifyArgs {
    /// Path to the bitweight catalog (FITS or HDF5).
    #[clap(name = "CATALOG", parse(from_os_str))]
    catalog: PathBuf,

    /// The number of realizations the catalog should hold. If not given, the
    /// value recorded in the catalog is used.
    #[clap(short, long)]
    num_realizations: Option<NonZeroUsize>,
}

impl VerifyArgs {
    pub(super) fn run(&self) -> Result<(), BitweightsError> {
        let catalog = read_bitweight_catalog(&self.catalog)?;
        let summary = verify(&catalog, self.num_realizations)?;

        let mut printer = InfoPrinter::new(format!("{}", self.catalog.display()).into());
        printer.push_block(vec![
            format!("{} targets (Ngal)", summary.num_targets).into(),
            format!(
                "{} bitweight words (Nout) for {} realizations",
                summary.num_words, summary.num_realizations
            )
            .into(),
        ]);
        if let Some(name) = &summary.extra_column {
            printer.push_line(format!("Extra column: {name}").into());
        }
        if summary.num_targets > 0 {
            printer.push_block(vec![
                format!(
                    "Assignment probability: min {:.4}, mean {:.4}, max {:.4}",
                    summary.min_probability, summary.mean_probability, summary.max_probability
                )
                .into(),
                format!("{} targets were never assigned", summary.num_never_assigned).into(),
            ]);
        }
        printer.display();

        Ok(())
    }
}

/// What [`verify`] learned about a catalog.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct VerifySummary {
    pub(super) num_targets: usize,
    pub(super) num_words: usize,
    pub(super) num_realizations: usize,
    pub(super) extra_column: Option<String>,
    pub(super) min_probability: f64,
    pub(super) mean_probability: f64,
    pub(super) max_probability: f64,
    pub(super) num_never_assigned: usize,
}

pub(super) fn verify(
    catalog: &BitweightCatalog,
    num_realizations: Option<NonZeroUsize>,
) -> Result<VerifySummary, VerifyError> {
    let num_realizations = match num_realizations {
        Some(n) if n.get() != catalog.num_realizations => {
            return Err(VerifyError::NumRealizations {
                expected: n.get(),
                recorded: catalog.num_realizations,
            })
        }
        Some(n) => n.get(),
        None => catalog.num_realizations,
    };
    debug!("Verifying {num_realizations} realizations");

    // Checks the word count.
    unpack_bitweights(catalog.bitweights.view(), num_realizations)?;

    let (num_targets, num_words) = catalog.bitweights.dim();
    let used_bits = num_realizations % BITS_PER_WORD;
    if used_bits != 0 {
        let pad_mask = !((1u64 << used_bits) - 1);
        for (row, &target_id) in catalog.target_ids.iter().enumerate() {
            let word = catalog.bitweights[(row, num_words - 1)] as u64;
            if word & pad_mask != 0 {
                return Err(VerifyError::NonZeroPadding {
                    target_id,
                    word: num_words - 1,
                });
            }
        }
    }

    let probabilities: Vec<f64> = assignment_counts(catalog.bitweights.view())
        .iter()
        .map(|&c| f64::from(c) / num_realizations as f64)
        .collect();
    let (min_probability, max_probability) = probabilities
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    let mean_probability = if probabilities.is_empty() {
        0.0
    } else {
        probabilities.iter().sum::<f64>() / probabilities.len() as f64
    };

    Ok(VerifySummary {
        num_targets,
        num_words,
        num_realizations,
        extra_column: catalog.extra.as_ref().map(|(name, _)| name.clone()),
        min_probability: if probabilities.is_empty() { 0.0 } else { min_probability },
        mean_probability,
        max_probability: if probabilities.is_empty() { 0.0 } else { max_probability },
        num_never_assigned: probabilities.iter().filter(|&&p| p == 0.0).count(),
    })
}

#[derive(Error, Debug)]
pub(super) enum VerifyError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("Target {target_id} has bits set beyond the last realization in bitweight word {word}")]
    NonZeroPadding { target_id: i64, word: usize },

    #[error("Expected {expected} realizations, but the catalog records {recorded}")]
    NumRealizations { expected: usize, recorded: usize },
}

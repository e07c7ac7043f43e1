// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all bitweights-related errors. This should be the *only*
//! error enum that is publicly visible from the binary.

use thiserror::Error;

use super::{bitweights::BitweightsArgsError, verify::VerifyError};
use crate::{
    assign::AssignError,
    bitweights::PackError,
    io::{read::ReadError, write::WriteError, GlobError},
    params::BitweightsRunError,
    targets::TargetsError,
};

/// The *only* publicly visible error from the bitweights binary.
#[derive(Error, Debug)]
pub enum BitweightsError {
    /// An error related to reading or normalising target catalogs.
    #[error("{0}\n\nTarget catalogs need TARGETID, RA, DEC and (for science targets) Z columns")]
    Targets(String),

    /// An error related to tiles, the hardware description or running fiber
    /// assignment.
    #[error("{0}")]
    Assign(String),

    /// An error related to making or checking bitweights.
    #[error("{0}")]
    Bitweights(String),

    /// An error related to writing bitweight catalogs.
    #[error("{0}")]
    Write(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    Cfitsio(String),

    /// An HDF5 error.
    #[error("HDF5 error: {0}")]
    Hdf5(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<BitweightsArgsError> for BitweightsError {
    fn from(e: BitweightsArgsError) -> Self {
        Self::Bitweights(e.to_string())
    }
}

impl From<VerifyError> for BitweightsError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Read(e) => Self::from(e),
            VerifyError::Pack(e) => Self::from(e),
            VerifyError::NonZeroPadding { .. } | VerifyError::NumRealizations { .. } => {
                Self::Bitweights(e.to_string())
            }
        }
    }
}

impl From<BitweightsRunError> for BitweightsError {
    fn from(e: BitweightsRunError) -> Self {
        match e {
            BitweightsRunError::Targets(e) => Self::from(e),
            BitweightsRunError::Assign(e) => Self::from(e),
            BitweightsRunError::Pack(e) => Self::from(e),
            BitweightsRunError::Write(e) => Self::from(e),
        }
    }
}

// Library code errors.

impl From<ReadError> for BitweightsError {
    fn from(e: ReadError) -> Self {
        let s = e.to_string();
        match e {
            ReadError::Fits(_) => Self::Cfitsio(s),
            ReadError::Hdf5 { .. } => Self::Hdf5(s),
            ReadError::UnrecognisedExtension { .. }
            | ReadError::MissingColumn { .. }
            | ReadError::MissingAttribute { .. }
            | ReadError::BadAttribute { .. }
            | ReadError::LengthMismatch { .. } => Self::Generic(s),
        }
    }
}

impl From<TargetsError> for BitweightsError {
    fn from(e: TargetsError) -> Self {
        match e {
            TargetsError::Read(e) => match e {
                ReadError::Fits(_) | ReadError::Hdf5 { .. } => Self::from(e),
                e => Self::Targets(e.to_string()),
            },
            TargetsError::MissingColumn { .. }
            | TargetsError::ColumnLength { .. }
            | TargetsError::DuplicateTargetId { .. } => Self::Targets(e.to_string()),
        }
    }
}

impl From<AssignError> for BitweightsError {
    fn from(e: AssignError) -> Self {
        match e {
            AssignError::Read(e) => Self::from(e),
            AssignError::IO(e) => Self::from(e),
            AssignError::NoTiles
            | AssignError::NoLocations
            | AssignError::DuplicateTileId { .. }
            | AssignError::DuplicateLocationId { .. }
            | AssignError::BadPatrolRadius { .. }
            | AssignError::NoTargets
            | AssignError::TileColumnLength { .. }
            | AssignError::HardwareFileType { .. }
            | AssignError::HardwareParse { .. } => Self::Assign(e.to_string()),
        }
    }
}

impl From<PackError> for BitweightsError {
    fn from(e: PackError) -> Self {
        Self::Bitweights(e.to_string())
    }
}

impl From<WriteError> for BitweightsError {
    fn from(e: WriteError) -> Self {
        let s = e.to_string();
        match e {
            WriteError::Fits(_) | WriteError::Fitsio(_) => Self::Cfitsio(s),
            WriteError::Hdf5 { .. } => Self::Hdf5(s),
            WriteError::IO(_) => Self::Generic(s),
            WriteError::UnsupportedFormat { .. }
            | WriteError::RowSelectionLength { .. }
            | WriteError::RowSelection { .. }
            | WriteError::MissingExtraColumn { .. }
            | WriteError::ColumnLength { .. }
            | WriteError::CreateDir { .. } => Self::Write(s),
        }
    }
}

impl From<GlobError> for BitweightsError {
    fn from(e: GlobError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for BitweightsError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

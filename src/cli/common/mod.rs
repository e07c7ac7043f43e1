// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared between subcommands: argument files, help texts and
//! printers.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{DEFAULT_NUM_REALIZATIONS, DEFAULT_SEED},
    io::write::{BITWEIGHT_OUTPUT_EXTENSIONS, CATALOG_KINDS},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref OUTPUT_FORMAT_HELP: String =
        format!("The format of the output bitweight catalog. Supported formats: {}. Default: fits", *BITWEIGHT_OUTPUT_EXTENSIONS);

    pub(super) static ref CATALOG_KIND_HELP: String =
        format!("Which catalog to write; 'targeted' only keeps targets assigned in at least one realization. Supported kinds: {}. Default: targeted", *CATALOG_KINDS);

    pub(super) static ref NUM_REALIZATIONS_HELP: String =
        format!("The number of fiber-assignment realizations to run. Default: {DEFAULT_NUM_REALIZATIONS}");

    pub(super) static ref SEED_HELP: String =
        format!("The seed of the random fiber assigner. Realization r always uses stream r of this seed. Default: {DEFAULT_SEED}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Deserialise an argument struct from a TOML or JSON file, returning a
/// [`BitweightsError`](crate::BitweightsError) from the enclosing function if
/// that isn't possible.
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::str::FromStr;

        use crate::cli::{
            common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED},
            BitweightsError,
        };

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());
        let contents = match arg_file_type {
            Some(_) => std::fs::read_to_string(&$arg_file)?,
            None => {
                return Err(BitweightsError::ArgFile(format!(
                    "Argument file '{}' doesn't have a recognised file extension! Valid extensions are: {}",
                    $arg_file.display(),
                    *ARG_FILE_TYPES_COMMA_SEPARATED
                )))
            }
        };

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                toml::from_str(&contents).map_err(|err| {
                    BitweightsError::ArgFile(format!(
                        "Couldn't decode toml structure from {}:\n{err}",
                        $arg_file.display()
                    ))
                })?
            }
            _ => {
                debug!("Parsing json file...");
                serde_json::from_str(&contents).map_err(|err| {
                    BitweightsError::ArgFile(format!(
                        "Couldn't decode json structure from {}:\n{err}",
                        $arg_file.display()
                    ))
                })?
            }
        }
    });
}

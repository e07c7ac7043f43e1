// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

Angles are kept in degrees at the edges of the program (catalogs, hardware
files) and converted to radians only when doing spherical geometry.
 */

/// The number of realization bits held in a single packed bitweight word.
pub const BITS_PER_WORD: usize = i64::BITS as usize;

/// Realizations are packed a byte at a time.
pub const BITS_PER_BYTE: usize = u8::BITS as usize;

/// The sub-priority given to targets whose catalog has no `SUBPRIORITY`
/// column.
pub const DEFAULT_SUBPRIORITY: f64 = 1.0;

/// The observing-conditions mask given to targets whose catalog has no
/// `OBSCONDITIONS` column.
pub const DEFAULT_OBSCONDITIONS: i64 = 1;

/// Tiles without an `OBSCONDITIONS` column may observe any target.
pub const DEFAULT_TILE_OBSCONDITIONS: i64 = -1;

/// Sky targets don't have a redshift.
pub const DEFAULT_SKY_Z: f64 = 0.0;

/// The default number of fiber-assignment realizations.
pub const DEFAULT_NUM_REALIZATIONS: usize = 128;

/// The default seed for the random fiber assigner.
pub const DEFAULT_SEED: u64 = 0;

// Column names.
pub const COL_TARGETID: &str = "TARGETID";
pub const COL_RA: &str = "RA";
pub const COL_DEC: &str = "DEC";
pub const COL_Z: &str = "Z";
pub const COL_SUBPRIORITY: &str = "SUBPRIORITY";
pub const COL_OBSCONDITIONS: &str = "OBSCONDITIONS";
pub const COL_TILEID: &str = "TILEID";
/// Packed bitweight columns are named with this prefix followed by the word
/// index.
pub const COL_BITWEIGHT_PREFIX: &str = "BITWEIGHT";

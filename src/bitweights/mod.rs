// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Building bitweights: accumulating per-realization fiber assignments into a
//! boolean `[num_targets, num_realizations]` matrix, then packing each row
//! into 64-bit words.

mod accumulate;
mod error;
mod pack;

pub use accumulate::{accumulate, accumulate_column, AccumulateCounts};
pub use error::PackError;
pub use pack::{assignment_counts, num_bitweight_words, pack_bitweights, unpack_bitweights};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with packing and unpacking bitweights.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Cannot pack bitweights without any realizations")]
    NoRealizations,

    #[error("{num_realizations} realizations need {expected} bitweight words per target, but {actual} were supplied")]
    WordCountMismatch {
        num_realizations: usize,
        expected: usize,
        actual: usize,
    },
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packing of assignment flags into 64-bit bitweight words.
//!
//! Realizations are consumed in groups of 8. Each group is reversed and packed
//! most-significant-bit first into a byte, so realization `8g + k` lands on
//! bit `k` of byte `g`. Byte `g` is then shifted into place within its 64-bit
//! word (`8 * (g % 8)`). The overall effect is that realization `r` is bit
//! `r % 64` of word `r / 64`. Downstream bitwise estimators rely on this
//! ordering.

use ndarray::{prelude::*, Zip};

use super::PackError;
use crate::constants::{BITS_PER_BYTE, BITS_PER_WORD};

/// The number of 64-bit words needed to hold `num_realizations` bits.
pub fn num_bitweight_words(num_realizations: usize) -> usize {
    (num_realizations + BITS_PER_WORD - 1) / BITS_PER_WORD
}

/// Pack up to 8 assignment flags into a byte. The flags are reversed and then
/// packed most-significant-bit first; any missing trailing flags are zero.
fn pack_byte(flags: ArrayView1<bool>) -> u8 {
    debug_assert!(flags.len() <= BITS_PER_BYTE);
    flags
        .iter()
        .rev()
        .fold(0, |byte, &flag| (byte << 1) | u8::from(flag))
}

/// Pack a single target's assignment flags (one per realization) into
/// `out`, which must have exactly [`num_bitweight_words`] elements.
fn pack_row(flags: ArrayView1<bool>, mut out: ArrayViewMut1<i64>) {
    let num_realizations = flags.len();
    let mut word: u64 = 0;
    let mut i_word = 0;
    for (i_group, group) in flags.axis_chunks_iter(Axis(0), BITS_PER_BYTE).enumerate() {
        let byte = u64::from(pack_byte(group));
        let shift = BITS_PER_BYTE * (i_group % (BITS_PER_WORD / BITS_PER_BYTE));
        word |= byte << shift;

        let realizations_done = i_group * BITS_PER_BYTE + group.len();
        if realizations_done % BITS_PER_WORD == 0 || realizations_done == num_realizations {
            // The word is full (or we're out of realizations); flush it. The
            // cast keeps the bit pattern, so bit 63 makes the word negative.
            out[i_word] = word as i64;
            word = 0;
            i_word += 1;
        }
    }
    debug_assert_eq!(i_word, out.len());
}

/// Create bitweights stored as 64-bit signed integers.
///
/// `assigned` has the shape `[num_targets, num_realizations]`; an element is
/// `true` if that target was assigned a fiber in that realization. The output
/// has the shape `[num_targets, ceil(num_realizations / 64)]`. Bits beyond the
/// last realization are always zero.
pub fn pack_bitweights(assigned: ArrayView2<bool>) -> Result<Array2<i64>, PackError> {
    let (num_targets, num_realizations) = assigned.dim();
    if num_realizations == 0 {
        return Err(PackError::NoRealizations);
    }

    let num_words = num_bitweight_words(num_realizations);
    let mut packed = Array2::zeros((num_targets, num_words));
    Zip::from(packed.rows_mut())
        .and(assigned.rows())
        .par_for_each(|out, flags| pack_row(flags, out));
    Ok(packed)
}

/// The inverse of [`pack_bitweights`]. `num_realizations` must be supplied
/// because the pad bits in the last word can't be distinguished from
/// unassigned realizations.
pub fn unpack_bitweights(
    packed: ArrayView2<i64>,
    num_realizations: usize,
) -> Result<Array2<bool>, PackError> {
    if num_realizations == 0 {
        return Err(PackError::NoRealizations);
    }
    let expected = num_bitweight_words(num_realizations);
    let (num_targets, actual) = packed.dim();
    if actual != expected {
        return Err(PackError::WordCountMismatch {
            num_realizations,
            expected,
            actual,
        });
    }

    Ok(Array2::from_shape_fn(
        (num_targets, num_realizations),
        |(i_target, i_real)| {
            let word = packed[(i_target, i_real / BITS_PER_WORD)] as u64;
            (word >> (i_real % BITS_PER_WORD)) & 1 == 1
        },
    ))
}

/// For each target, the number of realizations in which it was assigned a
/// fiber. Pad bits are zero, so they don't contribute.
pub fn assignment_counts(packed: ArrayView2<i64>) -> Array1<u32> {
    packed
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|w| w.count_ones()).sum::<u32>())
        .collect()
}

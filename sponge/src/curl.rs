// Tangle Bundle Library: ternary bundle construction & hashing
// Written in 2021 by
//     Tangle Bundle contributors
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

use ternary_encoding::{Trit, HASH_TRIT_LEN};

use crate::{check_trits, Error, Sponge};

/// Size of the Curl internal state in trits
pub const STATE_TRIT_LEN: usize = 3 * HASH_TRIT_LEN;

const TRUTH_TABLE: [Trit; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

/// Number of permutation rounds applied by Curl-P
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display(doc_comments)]
pub enum CurlRounds {
    /// 27
    Rounds27 = 27,

    /// 81
    Rounds81 = 81,
}

/// Pure ternary sponge with a truth-table based permutation.
///
/// Unlike Kerl, Curl accepts inputs and outputs of any length: the last
/// partial chunk is copied into (or out of) the beginning of the state.
#[derive(Clone)]
pub struct CurlP {
    rounds: CurlRounds,
    state: [Trit; STATE_TRIT_LEN],
}

impl CurlP {
    pub fn new(rounds: CurlRounds) -> CurlP {
        CurlP {
            rounds,
            state: [0; STATE_TRIT_LEN],
        }
    }

    #[inline]
    pub fn rounds(&self) -> CurlRounds {
        self.rounds
    }

    fn transform(&mut self) {
        let mut scratch = [0; STATE_TRIT_LEN];
        let mut index = 0usize;
        for _ in 0..self.rounds as usize {
            scratch.copy_from_slice(&self.state);
            for trit in self.state.iter_mut() {
                let prev = index;
                index = if index < 365 { index + 364 } else { index - 365 };
                *trit = TRUTH_TABLE
                    [(scratch[prev] + scratch[index] * 4 + 5) as usize];
            }
        }
    }
}

impl Sponge for CurlP {
    fn reset(&mut self) {
        self.state = [0; STATE_TRIT_LEN];
    }

    fn absorb(&mut self, trits: &[Trit]) -> Result<(), Error> {
        check_trits(trits)?;
        for chunk in trits.chunks(HASH_TRIT_LEN) {
            self.state[..chunk.len()].copy_from_slice(chunk);
            self.transform();
        }
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), Error> {
        for chunk in out.chunks_mut(HASH_TRIT_LEN) {
            let len = chunk.len();
            chunk.copy_from_slice(&self.state[..len]);
            self.transform();
        }
        Ok(())
    }
}

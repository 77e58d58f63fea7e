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

use sha3::{Digest, Keccak384};
use ternary_encoding::{Trit, HASH_TRIT_LEN};

use crate::bigint::{bytes_to_trits, trits_to_bytes, BYTE_LEN};
use crate::{check_trits, Error, Sponge};

/// Ternary sponge built on top of Keccak-384.
///
/// Every absorbed 243-trit chunk is converted into a 384-bit two's complement
/// integer and fed into Keccak. Squeezing finalizes a copy of the Keccak
/// state, converts the digest back into trits and re-seeds Keccak with the
/// bitwise negation of the digest, so that subsequent squeezes produce new
/// chunks.
#[derive(Clone)]
pub struct Kerl {
    keccak: Keccak384,
}

impl Default for Kerl {
    #[inline]
    fn default() -> Self {
        Kerl::new()
    }
}

impl Kerl {
    pub fn new() -> Kerl {
        Kerl {
            keccak: Keccak384::new(),
        }
    }
}

impl Sponge for Kerl {
    fn reset(&mut self) {
        self.keccak = Keccak384::new();
    }

    fn absorb(&mut self, trits: &[Trit]) -> Result<(), Error> {
        if trits.len() % HASH_TRIT_LEN != 0 {
            return Err(Error::UnalignedLength(trits.len()));
        }
        check_trits(trits)?;
        for chunk in trits.chunks(HASH_TRIT_LEN) {
            self.keccak.update(&trits_to_bytes(chunk)[..]);
        }
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), Error> {
        if out.len() % HASH_TRIT_LEN != 0 {
            return Err(Error::UnalignedLength(out.len()));
        }
        for chunk in out.chunks_mut(HASH_TRIT_LEN) {
            let digest = self.keccak.clone().finalize();
            let mut bytes = [0u8; BYTE_LEN];
            bytes.copy_from_slice(&digest);
            chunk.copy_from_slice(&bytes_to_trits(&bytes));

            bytes.iter_mut().for_each(|byte| *byte = !*byte);
            self.keccak = Keccak384::new();
            self.keccak.update(&bytes[..]);
        }
        Ok(())
    }
}

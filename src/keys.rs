use std::convert::TryInto;
use std::fmt;

use byteorder::{ByteOrder, LE};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};
use crate::transforms::{apply_s_hat, join_words, split_words, Words};
use crate::wipe::wipe_u128;
use crate::{KEY_SIZE, PHI, ROUNDS};

pub(crate) type Key = [u8; KEY_SIZE];
pub(crate) type Subkey = u128;

/// Prekey words: eight from the key, four per round key after them.
const PREKEY_WORDS: usize = 8 + 4 * (ROUNDS + 1);

/// The 33 round keys derived from one master key.
///
/// Word `k` of a round key lives in bits `32k..32k + 32`, matching the
/// word order of a block. The keys are zeroized on drop, and zeroizing
/// clears them in place so a schedule always holds 33 entries.
#[derive(Clone, ZeroizeOnDrop)]
pub struct RoundKeys {
    subkeys: Vec<Subkey>,
}

impl RoundKeys {
    /// The round keys in order; round key 32 is the final whitening key.
    pub fn as_slice(&self) -> &[u128] {
        &self.subkeys
    }

    /// Overwrites every round key with bytes from `generator`, falling
    /// back to zeros if it fails. The schedule keeps its length.
    pub fn wipe(&mut self, generator: &mut dyn RngCore) -> Result<()> {
        wipe_u128(&mut self.subkeys, generator)
    }

    pub(crate) fn words(&self, round: usize) -> Words {
        split_words(self.subkeys[round])
    }

    #[cfg(test)]
    pub(crate) fn from_words(words: &[Words]) -> RoundKeys {
        RoundKeys {
            subkeys: words.iter().map(join_words).collect(),
        }
    }
}

impl Zeroize for RoundKeys {
    fn zeroize(&mut self) {
        self.subkeys.as_mut_slice().zeroize();
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("len", &self.subkeys.len())
            .finish()
    }
}

/// Parses a big-endian hex key (most significant digit first, as in the
/// NIST submission files) into a little-endian binary key.
pub(crate) fn parse_text_key(key: &str) -> Result<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(hex::decode(key).map_err(|_| Error::InvalidKeyText)?);
    if bytes.len() != KEY_SIZE {
        return Err(Error::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        });
    }
    bytes.reverse();
    Ok(bytes)
}

/// Checks the key length and reserves the schedule storage before
/// deriving anything.
pub(crate) fn try_derive_subkeys(key: &[u8]) -> Result<RoundKeys> {
    let key: &Key = key.try_into().map_err(|_| Error::InvalidKeyLength {
        expected: KEY_SIZE,
        actual: key.len(),
    })?;
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(ROUNDS + 1)
        .map_err(|_| Error::OutOfMemory)?;
    Ok(derive_subkeys(key, storage))
}

pub(crate) fn derive_subkeys(key: &Key, mut subkeys: Vec<Subkey>) -> RoundKeys {
    let mut w = Zeroizing::new([0u32; PREKEY_WORDS]);
    LE::read_u32_into(key, &mut w[..8]);

    for i in 0..PREKEY_WORDS - 8 {
        let slot = i + 8;
        w[slot] = (w[slot - 8] ^ w[slot - 5] ^ w[slot - 3] ^ w[slot - 1] ^ PHI ^ i as u32)
            .rotate_left(11);
    }

    let mut k: Zeroizing<Words> = Zeroizing::new([0; 4]);
    for (i, src) in w[8..].chunks_exact(4).enumerate() {
        // Round keys walk the S-boxes backwards: S3, S2, S1, S0, S7, ...
        let s_idx = (ROUNDS + 3 - i) % 8;
        *k = apply_s_hat(s_idx, &[src[0], src[1], src[2], src[3]]);
        subkeys.push(join_words(&k));
    }

    RoundKeys { subkeys }
}

//! # Serpent
//!
//! `serpent-cipher` is an implementation of the
//! [Serpent cipher](https://www.cl.cam.ac.uk/~rja14/serpent.html) most
//! known for being one of the leading candidates for AES.
//!
//! It follows the bitslice description of the cipher: a block is four
//! little-endian 32-bit words, every round substitutes all 32 bit
//! columns through one 4-bit S-box and mixes the words with a fixed
//! rotate/shift/XOR transform. Only 256-bit keys are accepted.
//!
//! For easy interoperation with Rust crypto this crate implements
//! the `BlockCipher` trait from the `block-cipher-trait` crate. The
//! [`BlockCipherKey`] context adds key integrity checking and erasure
//! of the round keys with a pluggable wipe generator.
//!
//! ```
//! use serpent::Serpent;
//!
//! let cipher = Serpent::with_binary_key(&[0u8; 32]).unwrap();
//! let ciphertext = cipher.encrypt_block(0);
//! assert_eq!(ciphertext, 0x8910_4945_0418_1950_f98d_d998_a82b_6749);
//! assert_eq!(cipher.decrypt_block(ciphertext), 0);
//! ```

mod context;
mod error;
mod keys;
mod tables;
mod transforms;
mod wipe;

pub use block_cipher_trait;
pub use block_cipher_trait::generic_array;
pub use generic_array::typenum;

pub use context::{BlockCipherKey, CipherAlgorithm};
pub use error::{Error, Result};
pub use keys::RoundKeys;

use block_cipher_trait::BlockCipher;
use byteorder::{ByteOrder, LE};
use generic_array::GenericArray;
use log::debug;
use rand::RngCore;
use typenum::{U1, U16, U32};

use transforms::{
    apply_lt, apply_lt_inv, apply_s_hat, apply_s_hat_inv, join_words, split_words, xor_words,
    Words,
};

const PHI: u32 = 0x9e37_79b9;
const ROUNDS: usize = 32;

/// Size of a Serpent block in bytes.
pub const BLOCK_SIZE: usize = 16;
/// Size of a Serpent key in bytes.
pub const KEY_SIZE: usize = 32;

/// The Serpent cipher instance
///
/// Implements both a friendly `u128` encryption interface as well as the
/// common Rust crypto `block_cipher_trait::BlockCipher` trait for easy use
/// in stream cipher algorithms.
#[derive(Clone, Debug)]
pub struct Serpent {
    subkeys: RoundKeys,
}

impl Serpent {
    /// Constructs an instance from a 32-byte little-endian binary key.
    pub fn with_binary_key(key: &[u8]) -> Result<Serpent> {
        Ok(Serpent {
            subkeys: keys::try_derive_subkeys(key)?,
        })
    }

    /// Constructs an instance from a big-endian text representation
    /// of a 256-bit hexadecimal key, e.g. `"0123...cdef"` with 64 digits.
    pub fn with_text_key(key: &str) -> Result<Serpent> {
        let binary_key = keys::parse_text_key(key)?;
        Serpent::with_binary_key(&binary_key)
    }

    /// The expanded key schedule.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.subkeys
    }

    /// Easy encryption of a block stored in a 128-bit little-endian integer
    pub fn encrypt_block(&self, block: u128) -> u128 {
        join_words(&encrypt_words(&self.subkeys, split_words(block)))
    }

    /// Easy decryption of a block stored in a 128-bit little-endian integer
    pub fn decrypt_block(&self, block: u128) -> u128 {
        join_words(&decrypt_words(&self.subkeys, split_words(block)))
    }
}

/// Implements BlockCipher with 256-bit keys, the only length Serpent
/// is scheduled for here.
impl BlockCipher for Serpent {
    type KeySize = U32;
    type BlockSize = U16;
    type ParBlocks = U1;

    fn new(key: &GenericArray<u8, U32>) -> Self {
        let mut raw = zeroize::Zeroizing::new([0u8; KEY_SIZE]);
        raw.copy_from_slice(key.as_slice());
        Serpent {
            subkeys: keys::derive_subkeys(&raw, Vec::with_capacity(ROUNDS + 1)),
        }
    }

    fn encrypt_block(&self, block: &mut GenericArray<u8, Self::BlockSize>) {
        <Serpent as CipherAlgorithm>::encrypt(&self.subkeys, block);
    }

    fn decrypt_block(&self, block: &mut GenericArray<u8, Self::BlockSize>) {
        <Serpent as CipherAlgorithm>::decrypt(&self.subkeys, block);
    }
}

impl CipherAlgorithm for Serpent {
    type KeySize = U32;
    type BlockSize = U16;
    type Schedule = RoundKeys;

    const NAME: &'static str = "serpent";

    fn schedule(key: &[u8]) -> Result<RoundKeys> {
        let subkeys = keys::try_derive_subkeys(key)?;
        debug!("{}: scheduled {} round keys", Self::NAME, subkeys.as_slice().len());
        Ok(subkeys)
    }

    fn encrypt(schedule: &RoundKeys, block: &mut GenericArray<u8, U16>) {
        let mut words = [0u32; 4];
        LE::read_u32_into(block.as_slice(), &mut words);
        LE::write_u32_into(&encrypt_words(schedule, words), block.as_mut_slice());
    }

    fn decrypt(schedule: &RoundKeys, block: &mut GenericArray<u8, U16>) {
        let mut words = [0u32; 4];
        LE::read_u32_into(block.as_slice(), &mut words);
        LE::write_u32_into(&decrypt_words(schedule, words), block.as_mut_slice());
    }

    fn erase(schedule: &mut RoundKeys, generator: &mut dyn RngCore) -> Result<()> {
        schedule.wipe(generator)
    }
}

fn encrypt_words(k_hat: &RoundKeys, block: Words) -> Words {
    let mut b_hat = block;
    for i in 0..ROUNDS {
        b_hat = do_round(i, &b_hat, k_hat);
    }
    b_hat
}

fn decrypt_words(k_hat: &RoundKeys, block: Words) -> Words {
    let mut b_hat = block;
    for i in (0..ROUNDS).rev() {
        b_hat = do_round_inv(i, &b_hat, k_hat);
    }
    b_hat
}

fn do_round(i: usize, b_hat_i: &Words, k_hat: &RoundKeys) -> Words {
    let xored = xor_words(b_hat_i, &k_hat.words(i));
    let mut s_hat_i = apply_s_hat(i, &xored);
    if i <= ROUNDS - 2 {
        apply_lt(&mut s_hat_i);
        s_hat_i
    } else {
        xor_words(&s_hat_i, &k_hat.words(ROUNDS))
    }
}

fn do_round_inv(i: usize, b_hat_i_plus_1: &Words, k_hat: &RoundKeys) -> Words {
    let s_hat_i = if i <= ROUNDS - 2 {
        let mut mixed = *b_hat_i_plus_1;
        apply_lt_inv(&mut mixed);
        mixed
    } else {
        xor_words(b_hat_i_plus_1, &k_hat.words(ROUNDS))
    };
    let xored = apply_s_hat_inv(i, &s_hat_i);
    xor_words(&xored, &k_hat.words(i))
}

//! Block cipher key context.
//!
//! [`BlockCipherKey`] owns a secret key together with its integrity
//! code, the round keys scheduled from it and the generator used to
//! wipe them. The cipher itself plugs in through [`CipherAlgorithm`].

use std::fmt;

use crate::generic_array::typenum::Unsigned;
use crate::generic_array::{ArrayLength, GenericArray};
use log::{debug, warn};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// The operations a block cipher provides to a [`BlockCipherKey`].
pub trait CipherAlgorithm {
    type KeySize: ArrayLength<u8>;
    type BlockSize: ArrayLength<u8>;
    /// Round keys derived from one secret key.
    type Schedule;

    /// Algorithm identifier, e.g. `"serpent"`.
    const NAME: &'static str;

    /// Expands `key` into a schedule. Fails on a key of the wrong length
    /// or when storage for the schedule cannot be reserved.
    fn schedule(key: &[u8]) -> Result<Self::Schedule>;

    fn encrypt(schedule: &Self::Schedule, block: &mut GenericArray<u8, Self::BlockSize>);

    fn decrypt(schedule: &Self::Schedule, block: &mut GenericArray<u8, Self::BlockSize>);

    /// Overwrites the schedule with a pattern from `generator`.
    fn erase(schedule: &mut Self::Schedule, generator: &mut dyn RngCore) -> Result<()>;
}

/// A secret key bound to one block cipher.
pub struct BlockCipherKey<A: CipherAlgorithm> {
    key: Zeroizing<Vec<u8>>,
    icode: u64,
    generator: Box<dyn RngCore + Send + Sync>,
    schedule: Option<A::Schedule>,
}

impl<A: CipherAlgorithm> BlockCipherKey<A> {
    /// Creates an empty context wiping with the operating system RNG.
    pub fn new() -> Self {
        Self::with_generator(OsRng)
    }

    /// Creates an empty context wiping with bytes from `generator`.
    pub fn with_generator<R>(generator: R) -> Self
    where
        R: RngCore + Send + Sync + 'static,
    {
        BlockCipherKey {
            key: Zeroizing::new(Vec::new()),
            icode: integrity_code(&[]),
            generator: Box::new(generator),
            schedule: None,
        }
    }

    pub fn name(&self) -> &'static str {
        A::NAME
    }

    /// Assigns a new secret key and schedules it.
    ///
    /// The length is checked before anything is stored, so a rejected
    /// key leaves the previous key and schedule untouched.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        let expected = A::KeySize::to_usize();
        if key.len() != expected {
            warn!("{}: unsupported length of secret key", A::NAME);
            return Err(Error::InvalidKeyLength {
                expected,
                actual: key.len(),
            });
        }
        self.key = Zeroizing::new(key.to_vec());
        self.icode = integrity_code(&self.key);
        Self::schedule_keys(Some(self))
    }

    /// Schedules the stored key, erasing any previous round keys first.
    ///
    /// The old round keys are gone even when this fails: the context is
    /// then left without a schedule.
    pub fn schedule_keys(ctx: Option<&mut Self>) -> Result<()> {
        let ctx = match ctx {
            Some(ctx) => ctx,
            None => {
                warn!("using a null pointer to secret key");
                return Err(Error::NullPointer);
            }
        };
        if let Err(err) = ctx.erase_schedule() {
            warn!("{}: {} before rescheduling", A::NAME, err);
        }
        let expected = A::KeySize::to_usize();
        if ctx.key.len() != expected {
            warn!("{}: unsupported length of secret key", A::NAME);
            return Err(Error::InvalidKeyLength {
                expected,
                actual: ctx.key.len(),
            });
        }
        if !ctx.check_icode() {
            warn!("{}: using key with wrong integrity code", A::NAME);
            return Err(Error::KeyIntegrityFailure);
        }

        ctx.schedule = Some(A::schedule(&ctx.key)?);
        Ok(())
    }

    /// Wipes and releases the round keys. Erasing a context without a
    /// schedule is a no-op.
    pub fn delete_keys(ctx: Option<&mut Self>) -> Result<()> {
        match ctx {
            Some(ctx) => ctx.erase_schedule(),
            None => {
                warn!("using a null pointer to secret key");
                Err(Error::NullPointer)
            }
        }
    }

    /// Encrypts one block in place.
    pub fn encrypt(&self, block: &mut GenericArray<u8, A::BlockSize>) -> Result<()> {
        let schedule = self.schedule.as_ref().ok_or(Error::KeyNotScheduled)?;
        A::encrypt(schedule, block);
        Ok(())
    }

    /// Decrypts one block in place.
    pub fn decrypt(&self, block: &mut GenericArray<u8, A::BlockSize>) -> Result<()> {
        let schedule = self.schedule.as_ref().ok_or(Error::KeyNotScheduled)?;
        A::decrypt(schedule, block);
        Ok(())
    }

    /// Compares the stored key against its integrity code in constant
    /// time.
    pub fn check_icode(&self) -> bool {
        integrity_code(&self.key).ct_eq(&self.icode).into()
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn schedule(&self) -> Option<&A::Schedule> {
        self.schedule.as_ref()
    }

    fn erase_schedule(&mut self) -> Result<()> {
        let mut schedule = match self.schedule.take() {
            Some(schedule) => schedule,
            None => return Ok(()),
        };
        let result = A::erase(&mut schedule, &mut *self.generator);
        if result.is_ok() {
            debug!("{}: round keys erased", A::NAME);
        }
        result
    }
}

impl<A: CipherAlgorithm> Default for BlockCipherKey<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: CipherAlgorithm> Drop for BlockCipherKey<A> {
    fn drop(&mut self) {
        if let Err(err) = self.erase_schedule() {
            warn!("{}: {} while dropping key", A::NAME, err);
        }
    }
}

impl<A: CipherAlgorithm> fmt::Debug for BlockCipherKey<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCipherKey")
            .field("algorithm", &A::NAME)
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}

// FNV-1a over the key bytes. Catches accidental corruption of the
// stored key, not deliberate tampering: this is not a MAC.
fn integrity_code(key: &[u8]) -> u64 {
    key.iter().fold(0xcbf2_9ce4_8422_2325, |acc, &b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

use thiserror::Error;

/// Errors reported while scheduling, using or erasing a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("using a null pointer to secret key")]
    NullPointer,

    #[error("unsupported length of secret key: needed {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("using key with wrong integrity code")]
    KeyIntegrityFailure,

    #[error("wrong allocation of internal data")]
    OutOfMemory,

    /// The wipe pattern could not be drawn; the buffer was zero-filled
    /// instead.
    #[error("incorrect wiping of internal data")]
    WipeFailure,

    #[error("invalid hexadecimal key text")]
    InvalidKeyText,

    #[error("secret key has no scheduled round keys")]
    KeyNotScheduled,
}

pub type Result<T> = std::result::Result<T, Error>;

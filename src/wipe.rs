//! Overwriting of key material with a generator-supplied pattern.

use std::sync::atomic::{compiler_fence, Ordering};

use log::warn;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Overwrites every element of `buf` with bytes drawn from `generator`.
///
/// If the generator fails, `buf` is zero-filled instead and
/// `Error::WipeFailure` is returned: the buffer never keeps its old
/// contents either way.
pub(crate) fn wipe_u128(buf: &mut [u128], generator: &mut dyn RngCore) -> Result<()> {
    let mut pattern = [0u8; 16];
    let filled = buf.iter_mut().try_for_each(|slot| {
        generator.try_fill_bytes(&mut pattern)?;
        *slot = u128::from_le_bytes(pattern);
        Ok::<(), rand::Error>(())
    });
    if let Err(err) = filled {
        warn!("incorrect wiping an internal data: {}", err);
        buf.zeroize();
        return Err(Error::WipeFailure);
    }
    compiler_fence(Ordering::SeqCst);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// A generator that never produces output.
    pub(crate) struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.iter_mut().for_each(|b| *b = 0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy source unavailable",
            )))
        }
    }

    #[test]
    fn overwrites_with_pattern() {
        let mut buf = [u128::max_value(); 3];
        wipe_u128(&mut buf, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(buf, [0; 3]);

        let mut buf = [0u128; 2];
        wipe_u128(&mut buf, &mut StepRng::new(0x0101_0101_0101_0101, 0)).unwrap();
        assert_eq!(buf, [0x0101_0101_0101_0101_0101_0101_0101_0101; 2]);
    }

    #[test]
    fn falls_back_to_zero_fill() {
        let mut buf = [0xdead_beef_u128; 4];
        assert_eq!(wipe_u128(&mut buf, &mut BrokenRng), Err(Error::WipeFailure));
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn empty_buffer_is_noop() {
        assert_eq!(wipe_u128(&mut [], &mut BrokenRng), Ok(()));
    }
}

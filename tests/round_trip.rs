use proptest::prelude::*;
use rand::rngs::mock::StepRng;
use serpent::generic_array::GenericArray;
use serpent::{BlockCipherKey, Serpent};

proptest! {
    #[test]
    fn decrypt_inverts_encrypt(key in any::<[u8; 32]>(), block in any::<u128>()) {
        let cipher = Serpent::with_binary_key(&key).unwrap();
        prop_assert_eq!(cipher.decrypt_block(cipher.encrypt_block(block)), block);
        prop_assert_eq!(cipher.encrypt_block(cipher.decrypt_block(block)), block);
    }

    #[test]
    fn context_matches_plain_cipher(key in any::<[u8; 32]>(), block in any::<[u8; 16]>()) {
        let mut ctx = BlockCipherKey::<Serpent>::with_generator(StepRng::new(0, 1));
        ctx.set_key(&key).unwrap();
        let mut buf = GenericArray::clone_from_slice(&block);
        ctx.encrypt(&mut buf).unwrap();

        let cipher = Serpent::with_binary_key(&key).unwrap();
        let expected = cipher.encrypt_block(u128::from_le_bytes(block));
        prop_assert_eq!(buf.as_slice(), &expected.to_le_bytes()[..]);

        ctx.decrypt(&mut buf).unwrap();
        prop_assert_eq!(buf.as_slice(), &block[..]);
    }
}

#[test]
fn erase_leaves_no_round_keys() {
    let key = [0x42u8; 32];
    let mut ctx = BlockCipherKey::<Serpent>::with_generator(StepRng::new(0, 0));
    ctx.set_key(&key).unwrap();
    assert!(ctx.is_scheduled());

    let mut copy = Serpent::with_binary_key(&key).unwrap().round_keys().clone();
    let original = copy.as_slice().to_vec();
    copy.wipe(&mut StepRng::new(0, 0)).unwrap();
    assert!(copy.as_slice().iter().all(|k| !original.contains(k)));

    BlockCipherKey::<Serpent>::delete_keys(Some(&mut ctx)).unwrap();
    assert!(ctx.schedule().is_none());
}

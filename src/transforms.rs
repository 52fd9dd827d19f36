use crate::tables;

/// One 128-bit block or round key as four 32-bit words, `w0` first.
pub(crate) type Words = [u32; 4];

pub(crate) fn apply_s(s_idx: usize, nibble: u8) -> u8 {
    tables::SBOX[s_idx % 8][nibble as usize]
}

pub(crate) fn apply_s_inv(s_idx: usize, nibble: u8) -> u8 {
    tables::SBOX_INV[s_idx % 8][nibble as usize]
}

/// Collects bit `bit_idx` of each word into a nibble, word `i` landing
/// in nibble bit `i`.
fn gather_nibble(words: &Words, bit_idx: usize) -> u8 {
    let mut output = 0u8;
    for (i, word) in words.iter().enumerate() {
        let bit = ((word >> bit_idx) & 1) as u8;
        output |= bit << i;
    }
    output
}

fn scatter_nibble(nibble: u8, words: &mut Words, out_bit_idx: usize) {
    for (i, word) in words.iter_mut().enumerate() {
        let bit = u32::from((nibble >> i) & 1);
        *word |= bit << out_bit_idx;
    }
}

/// Bitslice substitution: S-box `s_idx` applied across all 32 bit
/// columns of the four words.
pub(crate) fn apply_s_hat(s_idx: usize, source: &Words) -> Words {
    let mut res = [0u32; 4];
    for j in 0..32 {
        scatter_nibble(apply_s(s_idx, gather_nibble(source, j)), &mut res, j);
    }
    res
}

pub(crate) fn apply_s_hat_inv(s_idx: usize, source: &Words) -> Words {
    let mut res = [0u32; 4];
    for j in 0..32 {
        scatter_nibble(apply_s_inv(s_idx, gather_nibble(source, j)), &mut res, j);
    }
    res
}

// The `<<` terms below are plain shifts, not rotations.
pub(crate) fn apply_lt(w: &mut Words) {
    w[0] = w[0].rotate_left(13);
    w[2] = w[2].rotate_left(3);
    w[1] ^= w[0] ^ w[2];
    w[3] ^= w[2] ^ (w[0] << 3);
    w[1] = w[1].rotate_left(1);
    w[3] = w[3].rotate_left(7);
    w[0] ^= w[1] ^ w[3];
    w[2] ^= w[3] ^ (w[1] << 7);
    w[0] = w[0].rotate_left(5);
    w[2] = w[2].rotate_left(22);
}

pub(crate) fn apply_lt_inv(w: &mut Words) {
    w[2] = w[2].rotate_left(10) ^ w[3] ^ (w[1] << 7);
    w[0] = w[0].rotate_left(27) ^ w[1] ^ w[3];
    w[3] = w[3].rotate_left(25);
    w[1] = w[1].rotate_left(31);
    w[3] ^= w[2] ^ (w[0] << 3);
    w[1] ^= w[0] ^ w[2];
    w[2] = w[2].rotate_left(29);
    w[0] = w[0].rotate_left(19);
}

pub(crate) fn xor_words(a: &Words, b: &Words) -> Words {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

pub(crate) fn split_words(block: u128) -> Words {
    [
        block as u32,
        (block >> 32) as u32,
        (block >> 64) as u32,
        (block >> 96) as u32,
    ]
}

pub(crate) fn join_words(words: &Words) -> u128 {
    u128::from(words[0])
        | u128::from(words[1]) << 32
        | u128::from(words[2]) << 64
        | u128::from(words[3]) << 96
}

//! Block-wise base58, the address alphabet of the chain.
//!
//! Unlike Bitcoin's base58, data is processed in 8-byte blocks, each
//! encoded big-endian into exactly 11 characters; a short trailing block
//! maps through a fixed size table. Block boundaries make the encoding
//! length a pure function of the payload length.

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;

/// Encoded length for each possible decoded block length.
const ENCODED_BLOCK_SIZES: [usize; FULL_BLOCK_SIZE + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

fn uint_be(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn encode_block(data: &[u8], out: &mut [u8]) {
    debug_assert!(!data.is_empty() && data.len() <= FULL_BLOCK_SIZE);
    let mut num = uint_be(data);
    let mut i = ENCODED_BLOCK_SIZES[data.len()];
    while num > 0 {
        i -= 1;
        out[i] = ALPHABET[(num % 58) as usize];
        num /= 58;
    }
}

fn decode_block(block: &[u8], out: &mut Vec<u8>) -> bool {
    let Some(size) = ENCODED_BLOCK_SIZES.iter().position(|&s| s == block.len()) else {
        return false;
    };

    let mut num: u64 = 0;
    for (i, &c) in block.iter().rev().enumerate() {
        let Some(digit) = ALPHABET.iter().position(|&a| a == c) else {
            return false;
        };
        let Some(order) = 58u64.checked_pow(i as u32) else {
            return false;
        };
        let Some(term) = (digit as u64).checked_mul(order) else {
            return false;
        };
        let Some(sum) = num.checked_add(term) else {
            return false;
        };
        num = sum;
    }

    if size < FULL_BLOCK_SIZE && num >> (8 * size) != 0 {
        return false;
    }
    out.extend_from_slice(&num.to_be_bytes()[FULL_BLOCK_SIZE - size..]);
    true
}

/// Encode arbitrary bytes.
pub fn encode(data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }
    let full_blocks = data.len() / FULL_BLOCK_SIZE;
    let last_size = data.len() % FULL_BLOCK_SIZE;

    let mut out =
        vec![ALPHABET[0]; full_blocks * FULL_ENCODED_BLOCK_SIZE + ENCODED_BLOCK_SIZES[last_size]];
    for i in 0..full_blocks {
        encode_block(
            &data[i * FULL_BLOCK_SIZE..(i + 1) * FULL_BLOCK_SIZE],
            &mut out[i * FULL_ENCODED_BLOCK_SIZE..(i + 1) * FULL_ENCODED_BLOCK_SIZE],
        );
    }
    if last_size > 0 {
        encode_block(
            &data[full_blocks * FULL_BLOCK_SIZE..],
            &mut out[full_blocks * FULL_ENCODED_BLOCK_SIZE..],
        );
    }
    out.into_iter().map(char::from).collect()
}

/// Decode a base58 string; `None` on foreign characters, bad block sizes
/// or an overfull block.
pub fn decode(s: &str) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Some(Vec::new());
    }
    let full_blocks = bytes.len() / FULL_ENCODED_BLOCK_SIZE;
    let last_size = bytes.len() % FULL_ENCODED_BLOCK_SIZE;

    let mut out = Vec::with_capacity(bytes.len() * FULL_BLOCK_SIZE / FULL_ENCODED_BLOCK_SIZE + 1);
    for i in 0..full_blocks {
        if !decode_block(
            &bytes[i * FULL_ENCODED_BLOCK_SIZE..(i + 1) * FULL_ENCODED_BLOCK_SIZE],
            &mut out,
        ) {
            return None;
        }
    }
    if last_size > 0 && !decode_block(&bytes[full_blocks * FULL_ENCODED_BLOCK_SIZE..], &mut out) {
        return None;
    }
    Some(out)
}

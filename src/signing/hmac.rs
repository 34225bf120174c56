//! HMAC-SHA1 (RFC 2104).

use super::sha1::{BLOCK_LEN, DIGEST_LEN, Sha1};

const INNER_PAD: u8 = 0x36;
const OUTER_PAD: u8 = 0x5c;

/// Compute the raw 20-byte HMAC-SHA1 of `message` under `key`.
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let block_key = prepare_key(key);

    let mut inner = Sha1::new();
    inner.update(&xor_pad(&block_key, INNER_PAD));
    inner.update(message);
    let inner_digest = inner.finalize();

    let mut outer = Sha1::new();
    outer.update(&xor_pad(&block_key, OUTER_PAD));
    outer.update(&inner_digest);
    outer.finalize()
}

/// Keys longer than one block are hashed first; the result is zero padded
/// to exactly one block.
fn prepare_key(key: &[u8]) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    if key.len() > BLOCK_LEN {
        block[..DIGEST_LEN].copy_from_slice(&Sha1::digest(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }
    block
}

fn xor_pad(key: &[u8; BLOCK_LEN], pad: u8) -> [u8; BLOCK_LEN] {
    let mut out = [0u8; BLOCK_LEN];
    for (dst, src) in out.iter_mut().zip(key) {
        *dst = src ^ pad;
    }
    out
}

//! Standard-alphabet Base64 encoding (RFC 4648, with padding).

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encoded length of `len` input bytes, padding included.
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Encode `input` into `out`, returning the number of bytes written.
///
/// # Panics
///
/// Panics if `out` is shorter than `encoded_len(input.len())`.
pub fn encode_into(input: &[u8], out: &mut [u8]) -> usize {
    let needed = encoded_len(input.len());
    assert!(out.len() >= needed, "base64 output buffer too small");

    for (group, dst) in input.chunks(3).zip(out.chunks_mut(4)) {
        let b0 = group[0] as u32;
        let b1 = group.get(1).copied().unwrap_or(0) as u32;
        let b2 = group.get(2).copied().unwrap_or(0) as u32;
        let n = (b0 << 16) | (b1 << 8) | b2;

        dst[0] = ALPHABET[(n >> 18) as usize & 0x3f];
        dst[1] = ALPHABET[(n >> 12) as usize & 0x3f];
        dst[2] = if group.len() > 1 {
            ALPHABET[(n >> 6) as usize & 0x3f]
        } else {
            b'='
        };
        dst[3] = if group.len() > 2 {
            ALPHABET[n as usize & 0x3f]
        } else {
            b'='
        };
    }

    needed
}

/// Encode `input` into a new `String`.
pub fn encode(input: &[u8]) -> String {
    let mut out = vec![0u8; encoded_len(input.len())];
    encode_into(input, &mut out);
    // The alphabet and the pad character are ASCII.
    out.into_iter().map(char::from).collect()
}

// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
pub mod aes;
mod auth_key;
pub mod factorize;
pub mod hex;
pub mod ring_buffer;
pub mod rsa;
pub mod sha;

pub use auth_key::AuthKey;
use getrandom::getrandom;
pub use ring_buffer::RingBuffer;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The ciphertext is either too small or not padded correctly.
    InvalidBuffer,

    /// The server replied with the ID of a different authorization key.
    AuthKeyMismatch,

    /// The key of the message did not match our expectations.
    MessageKeyMismatch,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidBuffer => write!(f, "invalid ciphertext buffer length"),
            Error::AuthKeyMismatch => write!(f, "server authkey mismatches with ours"),
            Error::MessageKeyMismatch => write!(f, "server msgkey mismatches with ours"),
        }
    }
}

enum Side {
    Client,
    Server,
}

impl Side {
    // "where x = 0 for messages from client to server and x = 8 for those from server to client."
    fn x(&self) -> usize {
        match *self {
            Side::Client => 0,
            Side::Server => 8,
        }
    }
}

/// Calculate the key based on Telegram's original [MTProto 1.0 key/IV
/// derivation], returning the pair `(key, iv)` for use in AES-IGE mode.
///
/// This is the scheme the protocol used before MTProto 2.0 introduced the
/// SHA256-based derivation; this crate implements only the v1 scheme, as
/// that is what the outer message envelope uses (see `msg_key`, below).
///
/// [MTProto 1.0 key/IV derivation]: https://core.telegram.org/mtproto/description_v1#defining-aes-key-and-initialization-vector
fn calc_key(auth_key: &AuthKey, msg_key: &[u8; 16], side: Side) -> ([u8; 32], [u8; 32]) {
    let x = side.x();

    let sha1_a = sha1!(msg_key, &auth_key.data[x..x + 32]);
    let sha1_b = sha1!(
        &auth_key.data[32 + x..32 + x + 16],
        msg_key,
        &auth_key.data[48 + x..48 + x + 16]
    );
    let sha1_c = sha1!(&auth_key.data[64 + x..64 + x + 32], msg_key);
    let sha1_d = sha1!(msg_key, &auth_key.data[96 + x..96 + x + 32]);

    // key = substr(sha1_a,0,8) + substr(sha1_b,8,12) + substr(sha1_c,4,12)
    let mut key = [0u8; 32];
    key[0..8].copy_from_slice(&sha1_a[0..8]);
    key[8..20].copy_from_slice(&sha1_b[8..20]);
    key[20..32].copy_from_slice(&sha1_c[4..16]);

    // iv = substr(sha1_a,8,12) + substr(sha1_b,0,8) + substr(sha1_c,16,4) + substr(sha1_d,0,8)
    let mut iv = [0u8; 32];
    iv[0..12].copy_from_slice(&sha1_a[8..20]);
    iv[12..20].copy_from_slice(&sha1_b[0..8]);
    iv[20..24].copy_from_slice(&sha1_c[16..20]);
    iv[24..32].copy_from_slice(&sha1_d[0..8]);

    (key, iv)
}

/// Pads a plaintext of `len` bytes up to the next multiple of 16, with at
/// least one byte of padding (MTProto v1 allows 0..15 padding bytes; we
/// always add a full block when already aligned so the msg_key always
/// covers an unambiguous, freshly-randomized tail).
fn determine_padding_v1_length(len: usize) -> usize {
    let rem = len % 16;
    if rem == 0 {
        0
    } else {
        16 - rem
    }
}

// Inner body of `encrypt_data`, separated for testing purposes.
fn do_encrypt_data(buffer: &mut RingBuffer<u8>, auth_key: &AuthKey, random_padding: &[u8; 16]) {
    // Encryption is done by the client.
    let side = Side::Client;

    // msg_key = substr(SHA1(plaintext), 4, 16), computed before padding is
    // appended: the padding itself must stay out of the hash.
    let msg_key_large = sha1!(&buffer[..]);
    let msg_key = {
        let mut buffer = [0; 16];
        buffer.copy_from_slice(&msg_key_large[4..4 + 16]);
        buffer
    };

    let padding_len = determine_padding_v1_length(buffer.len());
    buffer.extend(random_padding.iter().take(padding_len));

    let (key, iv) = calc_key(auth_key, &msg_key, side);

    aes::ige_encrypt(&mut buffer[..], &key, &iv);

    let mut header = [0u8; 24];
    header[..8].copy_from_slice(&auth_key.key_id);
    header[8..].copy_from_slice(&msg_key);
    buffer.shift(&header);
}

/// Implements the MTProto v1 outer-envelope encryption: pads the plaintext
/// to a multiple of 16 bytes, computes `msg_key = SHA1(plaintext)[4..20]`,
/// derives the AES-IGE key/IV from `msg_key` and `auth_key`, and prepends
/// `auth_key_id ++ msg_key` to the ciphertext.
pub fn encrypt_data(buffer: &mut RingBuffer<u8>, auth_key: &AuthKey) {
    let random_padding = {
        let mut rnd = [0; 16];
        getrandom(&mut rnd).expect("failed to generate a secure padding");
        rnd
    };

    do_encrypt_data(buffer, auth_key, &random_padding)
}

/// A decrypted outer envelope: the recovered plaintext (header, body and
/// trailing padding all still present) and the `msg_key` that was carried
/// on the wire alongside it.
///
/// `msg_key` is only checked against the auth key id here; verifying it
/// against the plaintext requires knowing where the padding starts, which
/// depends on the `bodyLen` field the caller parses out of the plaintext
/// header. Call [`msg_key_matches`] once that length is known.
pub struct Decrypted {
    pub plaintext: Vec<u8>,
    pub msg_key: [u8; 16],
}

/// The inverse of `encrypt_data`.
pub fn decrypt_data(ciphertext: &[u8], auth_key: &AuthKey) -> Result<Decrypted, Error> {
    // Decryption is done from the server.
    if ciphertext.len() < 24 || (ciphertext.len() - 24) % 16 != 0 {
        return Err(Error::InvalidBuffer);
    }

    let key_id = &ciphertext[..8];
    if auth_key.key_id != *key_id {
        return Err(Error::AuthKeyMismatch);
    }

    let msg_key = {
        let mut buffer = [0; 16];
        buffer.copy_from_slice(&ciphertext[8..8 + 16]);
        buffer
    };

    let (key, iv) = calc_key(auth_key, &msg_key, Side::Server);
    let plaintext = decrypt_ige(&ciphertext[24..], &key, &iv);

    Ok(Decrypted { plaintext, msg_key })
}

/// Recompute `msg_key` over `plaintext_without_padding` and compare it
/// against the one carried on the wire. `plaintext_without_padding` must be
/// the prefix of the decrypted plaintext up to (and including) `body`, as
/// determined by the envelope's `bodyLen` field; the trailing random
/// padding bytes must already be excluded.
pub fn msg_key_matches(plaintext_without_padding: &[u8], msg_key: &[u8; 16]) -> bool {
    let hash = sha1!(plaintext_without_padding);
    msg_key == &hash[4..4 + 16]
}

/// Generate the AES key and initialization vector from the server nonce
/// and the new client nonce. This is done after the DH exchange.
pub fn generate_key_data_from_nonce(
    server_nonce: &[u8; 16],
    new_nonce: &[u8; 32],
) -> ([u8; 32], [u8; 32]) {
    let hash1 = sha1!(new_nonce, server_nonce);
    let hash2 = sha1!(server_nonce, new_nonce);
    let hash3 = sha1!(new_nonce, new_nonce);

    // key = hash1 + hash2[:12]
    let key = {
        let mut buffer = [0; 32];
        buffer[..hash1.len()].copy_from_slice(&hash1);
        buffer[hash1.len()..].copy_from_slice(&hash2[..12]);
        buffer
    };

    // iv = hash2[12:20] + hash3 + new_nonce[:4]
    let iv = {
        let mut buffer = [0; 32];
        buffer[..8].copy_from_slice(&hash2[12..]);
        buffer[8..28].copy_from_slice(&hash3);
        buffer[28..].copy_from_slice(&new_nonce[..4]);
        buffer
    };

    (key, iv)
}

/// Encrypt data using AES-IGE.
pub fn encrypt_ige(plaintext: &[u8], key: &[u8; 32], iv: &[u8; 32]) -> Vec<u8> {
    let mut padded = if plaintext.len() % 16 == 0 {
        plaintext.to_vec()
    } else {
        let pad_len = (16 - (plaintext.len() % 16)) % 16;
        let mut padded = Vec::with_capacity(plaintext.len() + pad_len);
        padded.extend(plaintext);

        let mut buffer = vec![0; pad_len];
        getrandom(&mut buffer).expect("failed to generate random padding for encryption");
        padded.extend(&buffer);
        padded
    };

    aes::ige_encrypt(padded.as_mut(), key, iv);
    padded
}

/// Decrypt data using AES-IGE. Panics if the plaintext is not padded
/// to 16 bytes.
pub fn decrypt_ige(padded_ciphertext: &[u8], key: &[u8; 32], iv: &[u8; 32]) -> Vec<u8> {
    aes::ige_decrypt(padded_ciphertext, key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_auth_key() -> AuthKey {
        let mut buffer = [0u8; 256];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);

        AuthKey::from_bytes(buffer)
    }

    fn get_test_msg_key() -> [u8; 16] {
        let mut buffer = [0u8; 16];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);

        buffer
    }

    fn get_test_aes_key_or_iv() -> [u8; 32] {
        let mut buffer = [0u8; 32];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);

        buffer
    }

    #[test]
    fn calc_client_and_server_keys_differ() {
        // x = 0 for client, x = 8 for server; the two derivations must read
        // disjoint (but overlapping-by-design) windows of the auth key.
        let auth_key = get_test_auth_key();
        let msg_key = get_test_msg_key();
        let (client_key, client_iv) = calc_key(&auth_key, &msg_key, Side::Client);
        let (server_key, server_iv) = calc_key(&auth_key, &msg_key, Side::Server);
        assert_ne!(client_key, server_key);
        assert_ne!(client_iv, server_iv);
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let mut buffer = RingBuffer::with_capacity(0, 0);
        buffer.extend(b"Hello, world! This data should remain secure!");
        let auth_key = get_test_auth_key();
        let random_padding = [7; 16];

        do_encrypt_data(&mut buffer, &auth_key, &random_padding);
        let ciphertext = buffer[..].to_vec();

        let decrypted = decrypt_data(&ciphertext, &auth_key).unwrap();
        assert!(decrypted
            .plaintext
            .starts_with(b"Hello, world! This data should remain secure!"));
        assert!(msg_key_matches(
            b"Hello, world! This data should remain secure!",
            &decrypted.msg_key
        ));
    }

    #[test]
    fn decrypt_rejects_tampered_msg_key() {
        let mut buffer = RingBuffer::with_capacity(0, 0);
        buffer.extend(b"some plaintext body, long enough to span blocks");
        let auth_key = get_test_auth_key();
        do_encrypt_data(&mut buffer, &auth_key, &[1; 16]);

        let mut ciphertext = buffer[..].to_vec();
        ciphertext[8] ^= 0xff; // flip a byte inside msg_key
        let decrypted = decrypt_data(&ciphertext, &auth_key).unwrap();
        assert!(!msg_key_matches(
            b"some plaintext body, long enough to span blocks",
            &decrypted.msg_key
        ));
    }

    #[test]
    fn decrypt_rejects_wrong_auth_key_id() {
        let mut buffer = RingBuffer::with_capacity(0, 0);
        buffer.extend(b"some plaintext body, long enough to span blocks");
        let auth_key = get_test_auth_key();
        do_encrypt_data(&mut buffer, &auth_key, &[1; 16]);

        let other_key = AuthKey::from_bytes([1u8; 256]);
        assert_eq!(
            decrypt_data(&buffer[..], &other_key),
            Err(Error::AuthKeyMismatch)
        );
    }

    #[test]
    fn key_from_nonce() {
        let server_nonce = {
            let mut buffer = [0u8; 16];
            buffer
                .iter_mut()
                .enumerate()
                .for_each(|(i, x)| *x = i as u8);
            buffer
        };
        let new_nonce = {
            let mut buffer = [0u8; 32];
            buffer
                .iter_mut()
                .enumerate()
                .for_each(|(i, x)| *x = i as u8);
            buffer
        };

        let (key, iv) = generate_key_data_from_nonce(&server_nonce, &new_nonce);
        assert_eq!(
            key,
            [
                7, 88, 241, 83, 59, 97, 93, 36, 246, 232, 169, 74, 111, 203, 238, 10, 85, 234, 171,
                34, 23, 215, 41, 92, 169, 33, 61, 26, 45, 125, 22, 166
            ]
        );
        assert_eq!(
            iv,
            [
                90, 132, 16, 142, 152, 5, 101, 108, 232, 100, 7, 14, 22, 110, 98, 24, 246, 120, 62,
                133, 17, 71, 26, 90, 183, 128, 44, 242, 0, 1, 2, 3
            ]
        );
    }

    #[test]
    fn verify_ige_encryption() {
        let plaintext = get_test_aes_key_or_iv(); // Encrypting the key with itself
        let key = get_test_aes_key_or_iv();
        let iv = get_test_aes_key_or_iv();
        let expected = vec![
            226, 129, 18, 165, 62, 92, 137, 199, 177, 234, 128, 113, 193, 51, 105, 159, 212, 232,
            107, 38, 196, 186, 201, 252, 90, 241, 171, 140, 226, 122, 68, 164,
        ];
        assert_eq!(encrypt_ige(&plaintext, &key, &iv), expected);
    }

    #[test]
    fn verify_ige_decryption() {
        let ciphertext = get_test_aes_key_or_iv(); // Decrypting the key with itself
        let key = get_test_aes_key_or_iv();
        let iv = get_test_aes_key_or_iv();
        let expected = vec![
            229, 119, 122, 250, 205, 123, 44, 22, 247, 172, 64, 202, 230, 30, 246, 3, 254, 230, 9,
            143, 184, 168, 134, 10, 185, 238, 103, 44, 215, 229, 186, 204,
        ];
        assert_eq!(decrypt_ige(&ciphertext, &key, &iv), expected);
    }
}

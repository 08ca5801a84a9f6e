// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests exercising the crate's public API the way the
//! protocol layer actually uses it: deriving an authorization key,
//! encrypting a plaintext envelope and recovering it again.

use tlcore_crypto::{decrypt_data, encrypt_data, msg_key_matches, AuthKey, RingBuffer};

fn get_test_auth_key() -> AuthKey {
    let mut buffer = [0u8; 256];
    buffer
        .iter_mut()
        .enumerate()
        .for_each(|(i, x)| *x = i as u8);

    AuthKey::from_bytes(buffer)
}

#[test]
fn auth_key_id_is_stable_for_same_bytes() {
    let a = get_test_auth_key();
    let b = get_test_auth_key();
    assert_eq!(a.key_id(), b.key_id());
}

#[test]
fn encrypt_then_decrypt_through_the_public_api() {
    let auth_key = get_test_auth_key();
    let mut buffer = RingBuffer::with_capacity(0, 0);
    buffer.extend(b"Hello, world! This data should remain secure!");

    encrypt_data(&mut buffer, &auth_key);
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
fn decrypt_rejects_a_different_auth_key() {
    let auth_key = get_test_auth_key();
    let mut buffer = RingBuffer::with_capacity(0, 0);
    buffer.extend(b"some plaintext body, long enough to span blocks");
    encrypt_data(&mut buffer, &auth_key);

    let other_key = AuthKey::from_bytes([9u8; 256]);
    assert!(decrypt_data(&buffer[..], &other_key).is_err());
}

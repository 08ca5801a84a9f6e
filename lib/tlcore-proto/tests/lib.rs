// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests exercising the transport, mtp and authentication
//! layers together, the way a real connection would use them.

use bytes::BytesMut;
use tlcore_proto::mtp::{Encrypted, Mtp, Plain};
use tlcore_proto::transport::{Intermediate, Transport};

#[test]
fn plain_round_trips_through_intermediate_transport() {
    let mut client = Plain::new();
    let mut transport = Intermediate::new();

    client.push(b"Hey!").unwrap();
    let finalized = client.finalize();

    let mut packed = BytesMut::new();
    transport.pack(&finalized, &mut packed);

    let mut unpacked = BytesMut::new();
    let mut server_transport = Intermediate::new();
    let used = server_transport.unpack(&packed[4..], &mut unpacked).unwrap();

    assert_eq!(used, packed.len() - 4);
    assert_eq!(&unpacked[..], finalized.as_slice());
}

#[test]
fn encrypted_push_finalize_produces_framed_message() {
    let auth_key = [1u8; 256];
    let mut client = Encrypted::build()
        .compression_threshold(None)
        .finish(auth_key);

    let first = client.push(b"Hey!").unwrap();
    let second = client.push(b"Bye!").unwrap();
    assert_ne!(first, second);

    let packet = client.finalize();
    assert!(!packet.is_empty());

    let mut transport = Intermediate::new();
    let mut packed = BytesMut::new();
    transport.pack(&packet, &mut packed);
    assert_eq!(&packed[..4], &0xee_ee_ee_ee_u32.to_le_bytes());
}

#[test]
fn encrypted_accepts_large_single_payload() {
    let auth_key = [2u8; 256];
    let mut client = Encrypted::build().finish(auth_key);

    assert!(client.push(&vec![0x7f; 32 * 1024]).is_some());
}

#[test]
fn intermediate_transport_reports_missing_bytes() {
    let mut transport = Intermediate::new();
    let mut output = BytesMut::new();
    assert!(transport.unpack(&[0, 0, 0], &mut output).is_err());
}

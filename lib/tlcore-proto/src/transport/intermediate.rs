// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::{Error, Transport};
use bytes::BytesMut;

/// A light MTProto transport protocol that guarantees data padded to 4
/// bytes. This is an implementation of the [intermediate transport].
///
/// * Overhead: small.
/// * Minimum envelope length: 4 bytes.
/// * Maximum envelope length: 4 bytes.
///
/// It serializes the input payload as follows:
///
/// ```text
/// +----+----...----+
/// | len|  payload  |
/// +----+----...----+
///  ^^^^ 4 bytes
/// ```
///
/// The very first packet sent is prefixed with the 4-byte `0xeeeeeeee`
/// magic so the server knows which transport the client is using.
///
/// [intermediate transport]: https://core.telegram.org/mtproto/mtproto-transports#intermediate
pub struct Intermediate {
    init: bool,
}

const TAG: [u8; 4] = 0xee_ee_ee_ee_u32.to_le_bytes();

impl Intermediate {
    pub fn new() -> Self {
        Self { init: false }
    }
}

impl Default for Intermediate {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for Intermediate {
    fn pack(&mut self, input: &[u8], output: &mut BytesMut) {
        assert_eq!(input.len() % 4, 0);

        if !self.init {
            output.extend_from_slice(&TAG);
            self.init = true;
        }

        output.extend_from_slice(&(input.len() as i32).to_le_bytes());
        output.extend_from_slice(input);
    }

    fn unpack(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize, Error> {
        if input.len() < 4 {
            return Err(Error::MissingBytes);
        }

        let len = i32::from_le_bytes(input[0..4].try_into().unwrap());
        if len < 0 {
            return Err(Error::BadLen { got: len as u32 });
        }
        let len = len as usize;

        if input.len() - 4 < len {
            return Err(Error::MissingBytes);
        }

        output.extend_from_slice(&input[4..4 + len]);
        Ok(4 + len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_includes_tag_only_once() {
        let mut transport = Intermediate::new();
        let mut output = BytesMut::new();

        transport.pack(b"\x01\x02\x03\x04", &mut output);
        assert_eq!(&output[..4], &TAG);
        assert_eq!(&output[4..8], &[4, 0, 0, 0]);
        assert_eq!(&output[8..], b"\x01\x02\x03\x04");

        output.clear();
        transport.pack(b"\x05\x06\x07\x08", &mut output);
        assert_eq!(&output[..4], &[4, 0, 0, 0]);
        assert_eq!(&output[4..], b"\x05\x06\x07\x08");
    }

    #[test]
    fn unpack_reports_missing_bytes() {
        let mut transport = Intermediate::new();
        let mut output = BytesMut::new();
        assert_eq!(
            transport.unpack(&[1, 2, 3], &mut output),
            Err(Error::MissingBytes)
        );
        assert_eq!(
            transport.unpack(&[8, 0, 0, 0, 1, 2, 3], &mut output),
            Err(Error::MissingBytes)
        );
    }

    #[test]
    fn roundtrip() {
        let mut pack_transport = Intermediate::new();
        let mut unpack_transport = Intermediate::new();
        let mut packed = BytesMut::new();
        let mut unpacked = BytesMut::new();

        pack_transport.pack(b"hello, world!!!!", &mut packed);
        let used = unpack_transport
            .unpack(&packed[4..], &mut unpacked)
            .unwrap();
        assert_eq!(used, packed.len() - 4);
        assert_eq!(&unpacked[..], b"hello, world!!!!");
    }
}

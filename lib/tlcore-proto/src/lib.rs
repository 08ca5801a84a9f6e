// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An implementation of the [Mobile Transport Protocol]: the layer that
//! frames, encrypts and schedules requests once a TCP connection has been
//! established and (for encrypted communication) an authorization key has
//! been generated via [`authentication`].
//!
//! This crate is split into three collaborating layers:
//!
//! * [`transport`] packs/unpacks messages using the MTProto intermediate
//!   framing over a byte stream.
//! * [`mtp`] turns requests into the plaintext or encrypted message
//!   envelopes and processes server responses into RPC results and updates.
//! * [`authentication`] drives the Diffie-Hellman + RSA handshake that
//!   produces the authorization key [`mtp::Encrypted`] needs.
//!
//! [Mobile Transport Protocol]: https://core.telegram.org/mtproto
pub mod authentication;
pub mod errors;
mod manual_tl;
pub mod mtp;
pub mod transport;
mod utils;

pub use mtp::MsgId;

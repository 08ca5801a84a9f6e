// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Implementation of the [Mobile Transport Protocol]. This layer is
//! responsible for converting zero or more input requests into outgoing
//! messages, and to process the response.
//!
//! A distinction between plain and encrypted is made for simplicity (the
//! plain hardly requires to process any state) and to help prevent invalid
//! states (encrypted communication cannot be made without an authorization
//! key).
//!
//! [Mobile Transport Protocol]: https://core.telegram.org/mtproto/description
pub mod encrypted;
pub mod plain;

pub use crate::errors::{DeserializeError, RequestError};
pub use encrypted::Encrypted;
pub use plain::Plain;

/// Uniquely identifies a message sent to or received from the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MsgId(pub i64);

/// The result of deserializing a server response: zero or more answers
/// to previously sent requests, plus zero or more unsolicited updates.
#[derive(Debug, Default)]
pub struct Deserialization {
    /// Results to previously sent Remote Procedure Calls.
    pub rpc_results: Vec<(MsgId, Result<Vec<u8>, RequestError>)>,

    /// Updates that the server decided to send.
    pub updates: Vec<Vec<u8>>,
}

/// The trait used by the different implementations of the Mobile Transport
/// Protocol to pack requests and unpack responses.
pub trait Mtp {
    /// Pushes a serialized request into the internal buffer. Returns the
    /// message ID that will be used to identify its response, or `None`
    /// if the buffer is full and the caller should `finalize` first.
    fn push(&mut self, request: &[u8]) -> Option<MsgId>;

    /// Finalizes the buffer of pending requests, returning the bytes that
    /// should be handed to a [`Transport`](crate::transport::Transport).
    fn finalize(&mut self) -> Vec<u8>;

    /// Processes a response received from the server.
    fn deserialize(&mut self, payload: &[u8]) -> Result<Deserialization, DeserializeError>;
}

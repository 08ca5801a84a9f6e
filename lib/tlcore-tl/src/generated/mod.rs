//! The fixed set of TL constructors this crate understands: the handshake
//! objects and the small set of core service objects the session runtime
//! dispatches on (acks, salt changes, RPC errors, pong). Everything above
//! this layer — the application schema — is treated as an opaque,
//! CRC-tagged payload by the session runtime and is out of scope here.
//!
//! Unlike a codegen'd binding, these are hand-written: there is no `.tl`
//! schema file to generate from, only the fixed subset of the protocol
//! needed to drive a connection.
pub mod enums;
pub mod functions;
pub mod types;

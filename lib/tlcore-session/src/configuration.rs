// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::sync::Arc;
use std::time::Duration;

use tlcore_crypto::rsa;
use tlcore_proto::authentication;
use tlcore_store::SessionStore;

/// How long the reader task may stay idle before a read is considered
/// timed out and the connection is torn down.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything needed to connect to an MTProto server and establish or
/// resume an encrypted session.
#[derive(Clone)]
pub struct Configuration {
    /// The `host:port` of the server to connect to.
    pub host: String,

    /// The RSA keys this client trusts; the server advertises which
    /// fingerprint to use during the authorization-key handshake, and
    /// the first of these that matches is used.
    pub public_keys: Vec<rsa::Key>,

    /// Where to load and persist session credentials. Defaults to an
    /// in-memory store, which means every new connection re-runs the
    /// handshake from scratch.
    pub session_store: Option<Arc<dyn SessionStore>>,

    /// Timeout applied to the initial TCP connect.
    pub connect_timeout: Option<Duration>,

    /// Timeout applied to each read from the socket once connected.
    pub read_timeout: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: String::new(),
            public_keys: vec![authentication::production_key()],
            session_store: None,
            connect_timeout: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::info;
pub use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use std::time::Duration;

pub struct NetStream(TcpStream);

impl NetStream {
    /// Splits the stream into an owned read/write half pair so each can be
    /// driven by its own task.
    pub(crate) fn into_split(self) -> (OwnedReadHalf, OwnedWriteHalf) {
        self.0.into_split()
    }

    /// Connects to `host` (an already-resolvable `host:port` string),
    /// optionally bounding the attempt with `connect_timeout`.
    pub(crate) async fn connect(
        host: &str,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, std::io::Error> {
        info!("connecting to {}...", host);
        let stream = match connect_timeout {
            Some(duration) => timeout(duration, TcpStream::connect(host))
                .await
                .map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out")
                })??,
            None => TcpStream::connect(host).await?,
        };
        stream.set_nodelay(true)?;
        Ok(Self(stream))
    }
}

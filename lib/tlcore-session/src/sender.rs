// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drives a single connection to an MTProto server: the plaintext
//! authorization-key handshake, and afterwards the long-lived reader and
//! keepalive tasks that decrypt incoming messages and keep the connection
//! from being closed for inactivity.
//!
//! Outgoing requests are framed, encrypted and written under a single
//! writer lock from whichever task calls [`Enqueuer::invoke`]; there is no
//! dedicated writer task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use log::{debug, trace, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use tlcore_crypto::AuthKey;
use tlcore_proto::authentication;
use tlcore_proto::mtp::{Deserialization, Encrypted, Mtp, MsgId, Plain, RequestError};
use tlcore_proto::transport::{self, Intermediate, Transport};
use tlcore_tl::{self as tl, Serializable};
use tlcore_store::{Credentials, SessionStore};

use crate::configuration::Configuration;
use crate::errors::{AuthorizationError, InvocationError, ReadError};
use crate::net::NetStream;
use crate::utils::generate_random_id;

/// Every how often a keepalive ping is sent.
const PING_DELAY: Duration = Duration::from_secs(60);

/// Runs the plaintext authorization-key handshake against `configuration`
/// and returns the credentials needed to open an encrypted session.
///
/// This opens its own, short-lived TCP connection; the encrypted session
/// created by [`connect_with_auth`] reconnects afterwards.
pub async fn generate_auth_key(configuration: &Configuration) -> Result<Credentials, AuthorizationError> {
    let stream = NetStream::connect(&configuration.host, configuration.connect_timeout).await?;
    let (mut read_half, mut write_half) = stream.into_split();

    let mut plain = Plain::new();
    let mut transport = Intermediate::new();
    let mut read_buf = BytesMut::new();

    let (request, data) = authentication::step1()?;
    let response = plain_roundtrip(
        &mut plain,
        &mut transport,
        &mut read_half,
        &mut write_half,
        &mut read_buf,
        &request,
    )
    .await?;

    let (request, data) = authentication::step2(data, &response, &configuration.public_keys)?;
    let response = plain_roundtrip(
        &mut plain,
        &mut transport,
        &mut read_half,
        &mut write_half,
        &mut read_buf,
        &request,
    )
    .await?;

    let (request, data) = authentication::step3(data, &response)?;
    let response = plain_roundtrip(
        &mut plain,
        &mut transport,
        &mut read_half,
        &mut write_half,
        &mut read_buf,
        &request,
    )
    .await?;

    let authentication::Finished {
        auth_key,
        first_salt,
        ..
    } = authentication::create_key(data, &response)?;

    Ok(Credentials {
        auth_key,
        auth_key_hash: AuthKey::from_bytes(auth_key).key_id(),
        server_salt: first_salt,
    })
}

/// Sends `request` wrapped in a plain message and waits for the matching
/// plain response, growing `read_buf` with whatever arrives in between.
async fn plain_roundtrip(
    plain: &mut Plain,
    transport: &mut Intermediate,
    read_half: &mut OwnedReadHalf,
    write_half: &mut OwnedWriteHalf,
    read_buf: &mut BytesMut,
    request: &[u8],
) -> Result<Vec<u8>, AuthorizationError> {
    if plain.push(request).is_none() {
        return Err(AuthorizationError::from(InvocationError::Dropped));
    }
    let body = plain.finalize();
    let mut framed = BytesMut::new();
    transport.pack(&body, &mut framed);
    write_half.write_all(&framed).await?;

    loop {
        let mut decoded = BytesMut::new();
        match transport.unpack(&read_buf[..], &mut decoded) {
            Ok(used) => {
                read_buf.advance(used);
                let mut deserialized = plain.deserialize(&decoded)?;
                return match deserialized.rpc_results.pop() {
                    Some((_, Ok(bytes))) => Ok(bytes),
                    Some((_, Err(e))) => Err(AuthorizationError::from(InvocationError::from(e))),
                    None => Err(AuthorizationError::from(InvocationError::from(
                        ReadError::BadMessage { code: 0 },
                    ))),
                };
            }
            Err(transport::Error::MissingBytes) => {}
            Err(e) => return Err(e.into()),
        }

        let n = read_half.read_buf(read_buf).await?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed during handshake",
            )
            .into());
        }
    }
}

/// Everything needed to push a framed, encrypted message onto the socket.
/// Held behind a single lock so that `seqNo` allocation (inside `mtp`) and
/// the write it produces happen as one atomic step.
struct Writer {
    mtp: Encrypted,
    transport: Intermediate,
    write_half: OwnedWriteHalf,
}

/// Delivered to a pending request in place of its decoded response when
/// the server reported a stale salt: the caller must resend with a fresh
/// `msgId`. Internal only; [`Enqueuer::invoke`] never surfaces this to its
/// own caller.
enum SendOutcome {
    Done(Result<Vec<u8>, InvocationError>),
    Retry,
}

type PendingMap = HashMap<MsgId, oneshot::Sender<SendOutcome>>;

struct Shared {
    writer: AsyncMutex<Writer>,
    pending: StdMutex<PendingMap>,
    session_store: Option<Arc<dyn SessionStore>>,
    auth_key_hash: [u8; 8],
}

/// A cheaply-cloned handle used to submit requests over a running
/// connection. Any number of these may be held concurrently; requests sent
/// from different handles are not ordered with respect to one another.
#[derive(Clone)]
pub struct Enqueuer {
    shared: Arc<Shared>,
}

impl Enqueuer {
    /// Sends a TL-encoded request and waits for its decoded response body.
    ///
    /// If the server reports that the salt used to sign the request was
    /// stale, the request is automatically resent once, with a fresh
    /// `msgId`, before giving up.
    pub async fn invoke(&self, body: &[u8]) -> Result<Vec<u8>, InvocationError> {
        match self.send_and_wait(body).await? {
            SendOutcome::Done(result) => result,
            SendOutcome::Retry => match self.send_and_wait(body).await? {
                SendOutcome::Done(result) => result,
                SendOutcome::Retry => Err(InvocationError::Dropped),
            },
        }
    }

    async fn send_and_wait(&self, body: &[u8]) -> Result<SendOutcome, InvocationError> {
        let (tx, rx) = oneshot::channel();

        let mut writer = self.shared.writer.lock().await;
        let msg_id = match writer.mtp.push(body) {
            Some(msg_id) => msg_id,
            None => {
                // The buffer was left non-empty by a previous caller; this
                // should not happen since every push here is immediately
                // finalized, but flushing first keeps the invariant true
                // instead of silently dropping the stale bytes.
                flush(&mut writer).await?;
                match writer.mtp.push(body) {
                    Some(msg_id) => msg_id,
                    None => return Err(InvocationError::Dropped),
                }
            }
        };

        self.shared.pending.lock().unwrap().insert(msg_id, tx);

        if let Err(e) = flush(&mut writer).await {
            self.shared.pending.lock().unwrap().remove(&msg_id);
            return Err(e);
        }
        drop(writer);

        rx.await.map_err(|_| InvocationError::Dropped)
    }
}

/// Finalizes whatever is buffered in `writer.mtp` and writes the framed
/// result to the socket. A no-op if nothing was pushed.
async fn flush(writer: &mut Writer) -> Result<(), InvocationError> {
    let body = writer.mtp.finalize();
    if body.is_empty() {
        return Ok(());
    }
    let mut framed = BytesMut::new();
    writer.transport.pack(&body, &mut framed);
    writer
        .write_half
        .write_all(&framed)
        .await
        .map_err(|e| InvocationError::from(ReadError::from(e)))
}

/// Owns the background tasks backing a connection. Dropping it cancels
/// them; [`Sender::run`] awaits the connection's lifetime instead.
pub struct Sender {
    reader: JoinHandle<Result<(), InvocationError>>,
    keepalive: JoinHandle<()>,

    /// Unsolicited updates the server pushed outside of any RPC response.
    pub updates: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl Sender {
    /// Waits until the connection dies, returning the error that ended
    /// the reader task. Keep this polled (e.g. in a background task) for
    /// as long as the connection should stay alive.
    pub async fn run(self) -> Result<(), InvocationError> {
        tokio::select! {
            res = self.reader => res.unwrap_or(Ok(())),
            _ = self.keepalive => Ok(()),
        }
    }
}

impl Drop for Sender {
    fn drop(&mut self) {
        self.reader.abort();
        self.keepalive.abort();
    }
}

/// Connects to `configuration.host`, resuming from stored credentials if
/// the configured [`SessionStore`] has any, or generating a fresh
/// authorization key (and persisting it) otherwise.
pub async fn connect(configuration: Configuration) -> Result<(Sender, Enqueuer), AuthorizationError> {
    let stored = configuration
        .session_store
        .as_ref()
        .and_then(|store| store.get());

    let credentials = match stored {
        Some(credentials) => credentials,
        None => {
            let credentials = generate_auth_key(&configuration).await?;
            if let Some(store) = &configuration.session_store {
                store.set(credentials.clone());
            }
            credentials
        }
    };

    connect_with_auth(configuration, credentials).await
}

/// Connects to `configuration.host` using already-known `credentials`,
/// skipping the authorization-key handshake entirely.
pub async fn connect_with_auth(
    configuration: Configuration,
    credentials: Credentials,
) -> Result<(Sender, Enqueuer), AuthorizationError> {
    let stream = NetStream::connect(&configuration.host, configuration.connect_timeout).await?;
    let (read_half, write_half) = stream.into_split();

    let mtp = Encrypted::build()
        .first_salt(credentials.server_salt)
        .finish(credentials.auth_key);

    let shared = Arc::new(Shared {
        writer: AsyncMutex::new(Writer {
            mtp,
            transport: Intermediate::new(),
            write_half,
        }),
        pending: StdMutex::new(HashMap::new()),
        session_store: configuration.session_store.clone(),
        auth_key_hash: credentials.auth_key_hash,
    });

    let (updates_tx, updates_rx) = mpsc::unbounded_channel();

    let reader = tokio::spawn(run_reader(
        Arc::clone(&shared),
        read_half,
        updates_tx,
        configuration.read_timeout,
    ));
    let keepalive = tokio::spawn(run_keepalive(Arc::clone(&shared)));

    Ok((
        Sender {
            reader,
            keepalive,
            updates: updates_rx,
        },
        Enqueuer { shared },
    ))
}

/// Reads frames off the socket, decrypts and dispatches them for as long
/// as the connection lasts. Returns the error that ended the connection;
/// there is no graceful end short of the caller dropping the [`Sender`].
async fn run_reader(
    shared: Arc<Shared>,
    mut read_half: OwnedReadHalf,
    updates_tx: mpsc::UnboundedSender<Vec<u8>>,
    read_timeout: Duration,
) -> Result<(), InvocationError> {
    let mut transport = Intermediate::new();
    let mut read_buf = BytesMut::new();

    loop {
        let decoded = read_frame(
            &mut transport,
            &mut read_half,
            &mut read_buf,
            read_timeout,
        )
        .await?;

        let (deserialized, changed_credentials) = {
            let mut writer = shared.writer.lock().await;
            let deserialized = writer
                .mtp
                .deserialize(&decoded)
                .map_err(|e| InvocationError::from(ReadError::from(e)))?;

            let salt_changed = deserialized
                .rpc_results
                .iter()
                .any(|(_, result)| matches!(result, Err(RequestError::BadMessage { code: 48 })));

            let changed_credentials = salt_changed.then(|| Credentials {
                auth_key: writer.mtp.auth_key(),
                auth_key_hash: shared.auth_key_hash,
                server_salt: writer.mtp.salt(),
            });

            (deserialized, changed_credentials)
        };

        if let Some(credentials) = changed_credentials {
            if let Some(store) = &shared.session_store {
                store.set(credentials);
            }
        }

        dispatch(&shared, deserialized, &updates_tx);
    }
}

/// Reads and unpacks exactly one transport frame, blocking until enough
/// bytes have arrived.
async fn read_frame(
    transport: &mut Intermediate,
    read_half: &mut OwnedReadHalf,
    read_buf: &mut BytesMut,
    read_timeout: Duration,
) -> Result<BytesMut, InvocationError> {
    loop {
        let mut decoded = BytesMut::new();
        match transport.unpack(&read_buf[..], &mut decoded) {
            Ok(used) => {
                read_buf.advance(used);
                return Ok(decoded);
            }
            Err(transport::Error::MissingBytes) => {}
            Err(e) => return Err(InvocationError::from(ReadError::from(e))),
        }

        let n = tokio::time::timeout(read_timeout, read_half.read_buf(read_buf))
            .await
            .map_err(|_| {
                InvocationError::from(ReadError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "read timed out",
                )))
            })?
            .map_err(|e| InvocationError::from(ReadError::from(e)))?;

        if n == 0 {
            return Err(InvocationError::from(ReadError::from(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed",
            ))));
        }
    }
}

/// Resolves pending requests against a batch of decoded results, and
/// forwards any unsolicited updates. A `bad_server_salt` (carried as a
/// `BadMessage { code: 48 }` result) causes every *other* still-pending
/// request to be retried too, per the protocol's salt renegotiation rules.
fn dispatch(shared: &Shared, deserialized: Deserialization, updates_tx: &mpsc::UnboundedSender<Vec<u8>>) {
    let mut salt_changed = false;
    let mut resolved = Vec::with_capacity(deserialized.rpc_results.len());
    for (msg_id, result) in deserialized.rpc_results {
        match result {
            Err(RequestError::BadMessage { code: 48 }) => salt_changed = true,
            other => resolved.push((msg_id, other)),
        }
    }

    {
        let mut pending = shared.pending.lock().unwrap();
        for (msg_id, result) in resolved {
            if let Some(tx) = pending.remove(&msg_id) {
                let _ = tx.send(SendOutcome::Done(result.map_err(InvocationError::from)));
            }
        }
        if salt_changed {
            debug!(
                "server salt changed, retrying {} in-flight request(s)",
                pending.len()
            );
            for (_, tx) in pending.drain() {
                let _ = tx.send(SendOutcome::Retry);
            }
        }
    }

    for update in deserialized.updates {
        let _ = updates_tx.send(update);
    }
}

/// Pings the server every [`PING_DELAY`] to keep the connection from being
/// closed for inactivity. Failures are logged and otherwise ignored: the
/// reader task is what notices and reports a dead connection.
async fn run_keepalive(shared: Arc<Shared>) {
    loop {
        tokio::time::sleep(PING_DELAY).await;

        let ping = tl::functions::Ping {
            ping_id: generate_random_id(),
        }
        .to_bytes();

        let mut writer = shared.writer.lock().await;
        if writer.mtp.push(&ping).is_none() {
            warn!("keepalive ping dropped, write buffer unexpectedly full");
            continue;
        }
        match flush(&mut writer).await {
            Ok(()) => trace!("sent keepalive ping"),
            Err(e) => warn!("failed to send keepalive ping: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::{TcpListener, TcpStream};

    /// A `Shared` whose writer is backed by a real (loopback) socket, so
    /// tests can drive `dispatch` and `Enqueuer::invoke` without mocking
    /// the write half.
    async fn test_shared() -> Arc<Shared> {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap().0 });
        let client = TcpStream::connect(addr).await.unwrap();
        let server = accept.await.unwrap();

        // Drain whatever the client writes so sends never block on a full
        // socket buffer; the test drives responses through `dispatch`
        // directly instead of a real server decrypting anything.
        tokio::spawn(async move {
            let mut server = server;
            let mut sink = [0u8; 4096];
            loop {
                use tokio::io::AsyncReadExt as _;
                match server.read(&mut sink).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        });

        let (_read_half, write_half) = client.into_split();
        Arc::new(Shared {
            writer: AsyncMutex::new(Writer {
                mtp: Encrypted::build().finish([7; 256]),
                transport: Intermediate::new(),
                write_half,
            }),
            pending: StdMutex::new(HashMap::new()),
            session_store: None,
            auth_key_hash: [0; 8],
        })
    }

    #[tokio::test]
    async fn dispatch_resolves_matching_pending_requests() {
        let shared = test_shared().await;
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        shared.pending.lock().unwrap().insert(MsgId(1), tx1);
        shared.pending.lock().unwrap().insert(MsgId(2), tx2);

        let (updates_tx, _updates_rx) = mpsc::unbounded_channel();
        dispatch(
            &shared,
            Deserialization {
                rpc_results: vec![
                    (MsgId(1), Ok(vec![9, 9])),
                    (MsgId(2), Err(RequestError::Dropped)),
                ],
                updates: vec![],
            },
            &updates_tx,
        );

        match rx1.await.unwrap() {
            SendOutcome::Done(Ok(bytes)) => assert_eq!(bytes, vec![9, 9]),
            _ => panic!("expected a decoded result, got a different outcome"),
        }
        match rx2.await.unwrap() {
            SendOutcome::Done(Err(InvocationError::Dropped)) => {}
            _ => panic!("expected a dropped result, got a different outcome"),
        }
        assert!(shared.pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_retries_all_pending_on_salt_change() {
        let shared = test_shared().await;
        let (tx_trigger, rx_trigger) = oneshot::channel();
        let (tx_other, rx_other) = oneshot::channel();
        shared.pending.lock().unwrap().insert(MsgId(10), tx_trigger);
        shared.pending.lock().unwrap().insert(MsgId(11), tx_other);

        let (updates_tx, _updates_rx) = mpsc::unbounded_channel();
        dispatch(
            &shared,
            Deserialization {
                rpc_results: vec![(MsgId(10), Err(RequestError::BadMessage { code: 48 }))],
                updates: vec![],
            },
            &updates_tx,
        );

        assert!(matches!(rx_trigger.await.unwrap(), SendOutcome::Retry));
        assert!(matches!(rx_other.await.unwrap(), SendOutcome::Retry));
        assert!(shared.pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_forwards_updates() {
        let shared = test_shared().await;
        let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();
        dispatch(
            &shared,
            Deserialization {
                rpc_results: vec![],
                updates: vec![vec![1, 2, 3]],
            },
            &updates_tx,
        );

        assert_eq!(updates_rx.recv().await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn invoke_resolves_once_dispatch_delivers_its_response() {
        let shared = test_shared().await;
        let enqueuer = Enqueuer {
            shared: Arc::clone(&shared),
        };

        let handle = tokio::spawn(async move { enqueuer.invoke(&[1, 2, 3, 4]).await });

        // `invoke` pushes and registers its pending entry before the first
        // await point inside `flush`, so it is visible here shortly after.
        let msg_id = loop {
            if let Some(id) = shared.pending.lock().unwrap().keys().next().copied() {
                break id;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        };

        let (updates_tx, _updates_rx) = mpsc::unbounded_channel();
        dispatch(
            &shared,
            Deserialization {
                rpc_results: vec![(msg_id, Ok(vec![42]))],
                updates: vec![],
            },
            &updates_tx,
        );

        assert_eq!(handle.await.unwrap().unwrap(), vec![42]);
    }
}

// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Worker messaging client
//!
//! One persistent connection to the coordinator, two loops: the receive
//! loop decodes and filters inbound frames onto a bounded queue, the send
//! loop drains a bounded queue onto the wire. The caller talks to the
//! queues and two one-shot signals, never to the socket.
//!
//! The loops are deliberately hard to kill from the outside: transient
//! read errors, undecodable frames and misaddressed messages are logged
//! and skipped. A failed *send* is the exception. The worker can no
//! longer report in, so the failure is converted into a termination
//! command on the inbound queue and handled by the caller's ordinary
//! "coordinator told me to quit" path.

use std::sync::Arc;

use hive_transports::DealerTransport;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::error::ConnectionError;
use crate::message::{GenericMessage, Message};

/// Messaging client for a single worker.
///
/// Lifecycle: construct, [`connect`](Self::connect) once, exchange
/// messages, [`close`](Self::close). A closed client cannot be reused.
///
/// # Example
/// ```ignore
/// use hive_worker::{Message, CustomMessage, WorkerClient, WorkerConfig};
/// use hive_transports::WsDealer;
///
/// let config = WorkerConfig::new("localhost", 5557, "worker-1");
/// let mut client: WorkerClient<WsDealer> = WorkerClient::new(config);
/// client.connect().await?;
///
/// let sink = client.message_sink();
/// sink.send(CustomMessage::new("report", payload, "worker-1").into()).await?;
///
/// while let Some(message) = client.recv().await {
///     // react to coordinator commands
/// }
/// ```
pub struct WorkerClient<T: DealerTransport> {
    config: WorkerConfig,

    /// Present only while connected; taken exactly once by close()
    transport: Option<Arc<T>>,

    /// Producer side of the inbound queue, handed to the loops at connect
    inbound_tx: Option<mpsc::Sender<Message>>,
    inbound_rx: mpsc::Receiver<Message>,

    outbound_tx: mpsc::Sender<Message>,
    /// Consumer side of the outbound queue, handed to the send loop
    outbound_rx: Option<mpsc::Receiver<Message>>,

    /// One-shot broadcast observed by both loops
    shutdown: CancellationToken,

    /// Fires once this worker has announced its own departure
    disconnected: CancellationToken,
}

impl<T: DealerTransport> WorkerClient<T> {
    /// Allocate the queues and signals. No socket is opened yet.
    pub fn new(config: WorkerConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);

        Self {
            config,
            transport: None,
            inbound_tx: Some(inbound_tx),
            inbound_rx,
            outbound_tx,
            outbound_rx: Some(outbound_rx),
            shutdown: CancellationToken::new(),
            disconnected: CancellationToken::new(),
        }
    }

    /// Open the transport and start the receive and send loops.
    ///
    /// Returns as soon as the socket is up; it does not wait for the
    /// coordinator to acknowledge anything. A connect failure is surfaced
    /// to the caller and nothing is retried here.
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.transport.is_some() {
            return Err(ConnectionError::AlreadyConnected);
        }
        if self.shutdown.is_cancelled() {
            return Err(ConnectionError::Closed);
        }
        self.config.validate()?;

        let transport =
            Arc::new(T::connect(&self.config.host, self.config.port, &self.config.identity).await?);

        info!(
            host = %self.config.host,
            port = self.config.port,
            identity = %self.config.identity,
            "worker connected to coordinator"
        );

        // Both ends were allocated in new(); connect() runs at most once
        // past the guards above, so they are still here.
        let inbound_tx = self.inbound_tx.take().ok_or(ConnectionError::Closed)?;
        let outbound_rx = self.outbound_rx.take().ok_or(ConnectionError::Closed)?;

        self.transport = Some(Arc::clone(&transport));

        tokio::spawn(receive_loop(
            Arc::clone(&transport),
            inbound_tx.clone(),
            self.config.identity.clone(),
            self.shutdown.clone(),
        ));
        tokio::spawn(send_loop(
            transport,
            outbound_rx,
            inbound_tx,
            self.config.identity.clone(),
            self.shutdown.clone(),
            self.disconnected.clone(),
        ));

        Ok(())
    }

    /// Signal shutdown and release the transport.
    ///
    /// Safe to call more than once; the broadcast is idempotent and the
    /// transport is released exactly once. Both loops observe the signal
    /// at their next iteration boundary.
    pub fn close(&mut self) {
        self.shutdown.cancel();
        if let Some(transport) = self.transport.take() {
            transport.close();
        }
    }

    /// Next coordinator message addressed to this worker, in arrival
    /// order. `None` once the client is closed and the queue is drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.inbound_rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Message> {
        self.inbound_rx.try_recv().ok()
    }

    /// Producer handle for the outbound queue. Clones freely; sends fail
    /// once the client is closed.
    pub fn message_sink(&self) -> mpsc::Sender<Message> {
        self.outbound_tx.clone()
    }

    /// Queue a message for the coordinator.
    pub async fn send(&self, message: Message) -> Result<(), ConnectionError> {
        self.outbound_tx
            .send(message)
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    /// Resolves once this worker has sent its termination message.
    pub fn disconnected(&self) -> WaitForCancellationFuture<'_> {
        self.disconnected.cancelled()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.is_cancelled()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Identity this client registered under.
    pub fn identity(&self) -> &str {
        &self.config.identity
    }
}

impl<T: DealerTransport> Drop for WorkerClient<T> {
    fn drop(&mut self) {
        // A leaked client must not strand its loops.
        self.shutdown.cancel();
    }
}

/// Pull frames off the wire until shutdown: decode, filter by identity,
/// enqueue.
async fn receive_loop<T: DealerTransport>(
    transport: Arc<T>,
    inbound: mpsc::Sender<Message>,
    identity: String,
    shutdown: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = transport.recv_frame() => match received {
                Ok(frame) => frame,
                Err(e) => {
                    if shutdown.is_cancelled() {
                        break;
                    }
                    // Transient by policy: the coordinator or the caller
                    // decides when this worker is done, not a read error.
                    warn!(error = %e, "frame receive failed");
                    continue;
                }
            },
        };

        let message = match Message::from_frame(&frame) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "dropping frame that matches neither message variant");
                continue;
            }
        };

        if message.node_id() != identity {
            debug!(
                msg_type = message.msg_type(),
                addressee = message.node_id(),
                identity = %identity,
                "dropping message addressed to another worker"
            );
            continue;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            enqueued = inbound.send(message) => {
                if enqueued.is_err() {
                    break;
                }
            }
        }
    }

    debug!(identity = %identity, "receive loop stopped");
}

/// Drain the outbound queue onto the wire until shutdown.
async fn send_loop<T: DealerTransport>(
    transport: Arc<T>,
    mut outbound: mpsc::Receiver<Message>,
    inbound: mpsc::Sender<Message>,
    identity: String,
    shutdown: CancellationToken,
    disconnected: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            queued = outbound.recv() => match queued {
                Some(message) => message,
                None => break,
            },
        };

        let is_quit = message.is_quit();
        send_message(&*transport, message, &inbound, &identity, &shutdown).await;

        // Announcing our own departure: whoever waits on the disconnect
        // signal learns the coordinator relationship has ended from our
        // side. cancel() is idempotent, so repeat announcements are a
        // no-op.
        if is_quit {
            disconnected.cancel();
        }
    }

    debug!(identity = %identity, "send loop stopped");
}

/// Serialize and send one message. Encode failures drop the message; a
/// transport write failure is escalated by delivering a termination
/// command to our own inbound queue.
async fn send_message<T: DealerTransport>(
    transport: &T,
    message: Message,
    inbound: &mpsc::Sender<Message>,
    identity: &str,
    shutdown: &CancellationToken,
) {
    let frame = match message.serialize() {
        Ok(frame) => frame,
        Err(e) => {
            error!(error = %e, msg_type = message.msg_type(), "message encode failed, dropped");
            return;
        }
    };

    if let Err(e) = transport.send_frame(frame).await {
        error!(error = %e, "send to coordinator failed, delivering quit to caller");

        let quit = Message::from(GenericMessage::quit(identity));
        tokio::select! {
            _ = shutdown.cancelled() => {}
            delivered = inbound.send(quit) => {
                if delivered.is_err() {
                    debug!("inbound queue gone, quit not delivered");
                }
            }
        }
    }
}

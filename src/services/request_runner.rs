//! Background request runner
//!
//! Each backend call runs on its own worker thread. Replies come back over a
//! channel and are drained from the UI thread on every tick, so the UI keeps
//! handling keys while a call is pending.

use super::api::{ApiError, TableApi};
use super::operation::{ApiOutcome, ApiRequest, OperationError};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

/// Identifies a submitted request when its reply comes back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    /// Selection generation the request was issued under
    pub generation: u64,
    pub request: ApiRequest,
}

/// Result of one submitted request
#[derive(Debug)]
pub struct Reply {
    pub ticket: Ticket,
    pub result: Result<ApiOutcome, OperationError>,
}

/// Sends exactly one reply per ticket, even if the worker unwinds
struct ReplyGuard {
    tx: Sender<Reply>,
    ticket: Option<Ticket>,
}

impl ReplyGuard {
    fn send(mut self, result: Result<ApiOutcome, OperationError>) {
        if let Some(ticket) = self.ticket.take() {
            let _ = self.tx.send(Reply { ticket, result });
        }
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let operation = ticket.request.operation();
            let _ = self.tx.send(Reply {
                ticket,
                result: Err(OperationError::new(operation, ApiError::WorkerPanicked)),
            });
        }
    }
}

/// Runs `ApiRequest`s against a shared API on worker threads
pub struct RequestRunner {
    api: Arc<dyn TableApi>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    next_id: u64,
    in_flight: usize,
}

impl RequestRunner {
    pub fn new(api: Arc<dyn TableApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            next_id: 0,
            in_flight: 0,
        }
    }

    /// Number of submitted requests whose reply has not been drained yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a request in the background, returning its ticket id
    pub fn submit(&mut self, request: ApiRequest, generation: u64) -> u64 {
        self.next_id += 1;
        let ticket = Ticket {
            id: self.next_id,
            generation,
            request,
        };
        debug!(id = ticket.id, generation, operation = %ticket.request.operation(), "submitting request");

        let api = Arc::clone(&self.api);
        let guard = ReplyGuard {
            tx: self.tx.clone(),
            ticket: Some(ticket.clone()),
        };
        self.in_flight += 1;

        let spawned = thread::Builder::new()
            .name(format!("api-{}", ticket.request.operation()))
            .spawn(move || {
                let result = ticket.request.execute(api.as_ref());
                guard.send(result);
            });

        // A failed spawn drops the closure, and with it the guard, which
        // still produces the reply.
        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn request worker");
        }

        self.next_id
    }

    /// Drain every reply that has arrived so far
    pub fn poll(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(reply) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    replies.push(reply);
                }
                Err(TryRecvError::Empty) => break,
                // Unreachable while `self.tx` is alive
                Err(TryRecvError::Disconnected) => break,
            }
        }
        replies
    }
}

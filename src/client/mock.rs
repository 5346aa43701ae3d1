use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use super::{ExecuteRequest, ServerReply, Transport, TransportError};

/// A scripted transport for tests. Returns pre-defined replies in order and
/// records every request body it sees.
///
/// With [`StubTransport::gated`], each call parks until [`StubTransport::release`]
/// is called, so tests can hold a request in flight.
pub struct StubTransport {
    replies: Mutex<VecDeque<Result<ServerReply, TransportError>>>,
    requests: Mutex<Vec<serde_json::Value>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    gate: Option<Notify>,
}

impl StubTransport {
    pub fn new(replies: Vec<Result<ServerReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated(replies: Vec<Result<ServerReply, TransportError>>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new(replies)
        }
    }

    /// Let one parked (or the next) call through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post(&self, request: &ExecuteRequest<'_>) -> Result<ServerReply, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap_or_default());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::Other(format!(
                "StubTransport: no more replies (called {} times)",
                n + 1
            )))
        })
    }
}

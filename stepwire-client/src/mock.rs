//! Scripted transport used by the unit tests
//!
//! Records every call made against it so tests can assert the exact
//! open/send/receive/close sequence of a query.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stepwire_core::protocol::{MessageEnvelope, Received};

use crate::transport::{Session, Transport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    Send(MessageEnvelope),
    Receive,
    Close,
    /// Session dropped without `close`
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fail {
    Open,
    Send,
    Receive,
    Close,
}

pub struct ScriptedTransport {
    reply: Received,
    failures: HashSet<Fail>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedTransport {
    pub fn new(reply: Received) -> Self {
        Self {
            reply,
            failures: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(envelope: MessageEnvelope) -> Self {
        Self::new(Received::Envelope(envelope))
    }

    pub fn failing(fail: Fail) -> Self {
        Self::replying(MessageEnvelope::return_code(0)).with_failure(fail)
    }

    pub fn with_failure(mut self, fail: Fail) -> Self {
        self.failures.insert(fail);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn scripted_failure(stage: &str) -> TransportError {
    TransportError::Io(std::io::Error::other(format!("scripted {} failure", stage)))
}

#[async_trait]
impl Transport for ScriptedTransport {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, TransportError> {
        self.calls.lock().unwrap().push(Call::Open);
        if self.failures.contains(&Fail::Open) {
            return Err(TransportError::Connect {
                addr: "scripted".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(ScriptedSession {
            reply: self.reply.clone(),
            failures: self.failures.clone(),
            calls: Arc::clone(&self.calls),
            closed: false,
        })
    }
}

pub struct ScriptedSession {
    reply: Received,
    failures: HashSet<Fail>,
    calls: Arc<Mutex<Vec<Call>>>,
    closed: bool,
}

impl ScriptedSession {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn send(&mut self, envelope: MessageEnvelope) -> Result<(), TransportError> {
        self.record(Call::Send(envelope));
        if self.failures.contains(&Fail::Send) {
            return Err(scripted_failure("send"));
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<Received, TransportError> {
        self.record(Call::Receive);
        if self.failures.contains(&Fail::Receive) {
            return Err(TransportError::ConnectionClosed);
        }
        Ok(self.reply.clone())
    }

    async fn close(mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.record(Call::Close);
        if self.failures.contains(&Fail::Close) {
            return Err(scripted_failure("close"));
        }
        Ok(())
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        if !self.closed {
            self.record(Call::Drop);
        }
    }
}

//! Support chat connection lifecycle.
//!
//! The connection is an owned object with explicit connect/disconnect,
//! handed to whichever surface needs it. The transport is injected, so
//! tests run against a recording mock and nothing lives in module-global
//! state.

use log::debug;
use thiserror::Error;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Support channel failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupportError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("not connected")]
    NotConnected,
}

/// The wire the support channel runs over. Implemented by the host
/// (websocket, long-poll, in-process bridge - the model does not care).
pub trait ChatTransport {
    /// Open a channel for a session.
    fn open(&mut self, session_id: &str) -> Result<(), SupportError>;

    /// Close the channel for a session.
    fn close(&mut self, session_id: &str);

    /// Send a message body on an open channel.
    fn send(&mut self, session_id: &str, body: &str) -> Result<(), SupportError>;
}

/// An owned support chat connection for one surface.
#[derive(Debug)]
pub struct SupportConnection<T: ChatTransport> {
    transport: T,
    session: Option<String>,
}

impl<T: ChatTransport> SupportConnection<T> {
    /// Create a disconnected connection over a transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        if self.session.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// The connected session id, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Connect to a session. Connecting while connected closes the
    /// previous session first.
    pub fn connect(&mut self, session_id: &str) -> Result<(), SupportError> {
        if let Some(current) = self.session.take() {
            debug!("support connection switching from session {current}");
            self.transport.close(&current);
        }
        self.transport.open(session_id)?;
        self.session = Some(session_id.to_string());
        Ok(())
    }

    /// Disconnect. A no-op while disconnected.
    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            self.transport.close(&session);
        }
    }

    /// Send a message on the connected session.
    pub fn send(&mut self, body: &str) -> Result<(), SupportError> {
        let session = self.session.as_ref().ok_or(SupportError::NotConnected)?;
        self.transport.send(session, body)
    }
}

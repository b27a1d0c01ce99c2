//! Gateway session
//!
//! Owns the stream for the duration of a run and tracks whether the login
//! handshake has completed. Reading is refused until it has.
//!
//! The session does NOT handle:
//! - Opening the connection (see `transport::tcp`)
//! - Verbosity (the injected `LogSink` decides what is shown)

pub mod login;

use crate::device::Reading;
use crate::error::{Result, VbusError};
use crate::logging::LogSink;
use crate::transport::VbusStream;
use crate::vbus::{self, ReadOptions};
use std::io::{Read, Write};

/// Handshake state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Session over an already-connected gateway stream
///
/// # Example
///
/// ```ignore
/// let stream = transport::tcp::connect("192.168.0.20", 7053, &TcpOptions::default())?;
/// let mut session = Session::new(stream);
/// session.authenticate("vbus", &mut TracingSink)?;
/// let reading = session.read_reading(&ReadOptions::default(), &mut TracingSink)?;
/// ```
#[derive(Debug)]
pub struct Session<S> {
    stream: VbusStream<S>,
    state: SessionState,
}

impl<S: Read + Write> Session<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: VbusStream::new(stream),
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Log in with `password`
    ///
    /// Runs the handshake once; calling it again on an authenticated
    /// session is a no-op.
    pub fn authenticate(&mut self, password: &str, log: &mut dyn LogSink) -> Result<()> {
        if self.state == SessionState::Authenticated {
            return Ok(());
        }

        login::login(&mut self.stream, password, log)?;
        self.state = SessionState::Authenticated;
        log.log("Logged in");
        Ok(())
    }

    /// Read until the first message matching `options.filter` and decode it
    pub fn read_reading(&mut self, options: &ReadOptions, log: &mut dyn LogSink) -> Result<Reading> {
        if self.state != SessionState::Authenticated {
            return Err(VbusError::NotAuthenticated);
        }
        vbus::read_reading(&mut self.stream, options, log)
    }

    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

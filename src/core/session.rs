//! Caller-owned conversation state.
//!
//! A [`SessionStore`] holds everything that belongs to one logical
//! conversation: the backend session id, the transcript, and whether the
//! backend looked unreachable on the last attempt. It is mutated only after a
//! request has settled, and [`SessionStore::reset`] clears all of it at once.

use crate::core::errors::BackendError;
use crate::core::message::Message;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    session_id: String,
    transcript: Vec<Message>,
    backend_disconnected: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session id; empty until the backend has issued one.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn has_session(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// Adopts the id returned by the backend, including rotations.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn is_disconnected(&self) -> bool {
        self.backend_disconnected
    }

    pub fn mark_connected(&mut self) {
        self.backend_disconnected = false;
    }

    pub fn mark_disconnected(&mut self) {
        self.backend_disconnected = true;
    }

    /// Raises the disconnected flag for kinds that mean the backend is
    /// missing. Other kinds leave the flag as it was.
    pub fn note_failure(&mut self, error: &BackendError) {
        if error.kind().marks_disconnected() {
            self.mark_disconnected();
        }
    }

    /// Starts a new logical conversation. Cannot fail.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

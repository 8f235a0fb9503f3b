//! Command dispatch between the presentation layer and the backend clients.
//!
//! The presentation layer turns user actions into [`Command`]s and renders the
//! [`CommandOutcome`] it gets back. Every backend failure is settled here: it
//! becomes a transcript entry and, when the backend looks missing, flips the
//! connectivity flag. Nothing propagates further as an error.

use tracing::debug;

use crate::core::chat::{ChatClient, TurnOutcome};
use crate::core::constants::REQUEST_TIMEOUT;
use crate::core::errors::{BackendError, ErrorKind};
use crate::core::message::Message;
use crate::core::session::SessionStore;
use crate::core::tasks::{TaskBatch, TaskClient};
use crate::utils::url::normalize_base_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendMessage(String),
    RefreshTasks,
    ResetSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    Answered { session_rotated: bool },
    NoResponse,
    EmptyResponse,
    Failed(ErrorKind),
}

/// The assistant entry appended for one turn and how the turn went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub reply: Message,
    pub status: TurnStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRefresh {
    Loaded(TaskBatch),
    Failed(BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    Turn(TurnReport),
    Tasks(TaskRefresh),
    Reset,
}

pub struct App {
    session: SessionStore,
    chat: ChatClient,
    tasks: TaskClient,
    base_url: String,
}

impl App {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = normalize_base_url(base_url);
        Ok(Self::from_clients(
            ChatClient::new(client.clone(), base_url.clone()),
            TaskClient::new(client, base_url),
        ))
    }

    pub fn from_clients(chat: ChatClient, tasks: TaskClient) -> Self {
        let base_url = chat.base_url().to_string();
        Self {
            session: SessionStore::new(),
            chat,
            tasks,
            base_url,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn dispatch(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::SendMessage(text) => self.send_message(text).await,
            Command::RefreshTasks => CommandOutcome::Tasks(self.refresh_tasks(true).await),
            Command::ResetSession => {
                self.session.reset();
                debug!("session reset");
                CommandOutcome::Reset
            }
        }
    }

    /// The automatic load run once when the task view first appears.
    ///
    /// Failures still update the connectivity flag but are not written to the
    /// transcript; the caller shows them as a status banner instead.
    pub async fn initial_task_load(&mut self) -> TaskRefresh {
        self.refresh_tasks(false).await
    }

    async fn send_message(&mut self, text: String) -> CommandOutcome {
        if text.trim().is_empty() {
            return CommandOutcome::Ignored;
        }

        let sent_session = self.session.session_id().to_string();
        let result = self.chat.send_utterance(&text, &sent_session).await;

        // The store only changes once the request has settled.
        self.session.push(Message::user(text));
        let (reply, status) = match result {
            Ok(TurnOutcome::Reply(turn)) => {
                let session_rotated = !sent_session.is_empty() && turn.session_id != sent_session;
                if session_rotated {
                    debug!(from = %sent_session, to = %turn.session_id, "backend rotated session");
                }
                self.session.set_session_id(turn.session_id);
                self.session.mark_connected();
                (
                    Message::assistant(turn.message),
                    TurnStatus::Answered { session_rotated },
                )
            }
            Ok(outcome @ TurnOutcome::NoResponse) => (
                Message::assistant(outcome.assistant_text()),
                TurnStatus::NoResponse,
            ),
            Ok(outcome @ TurnOutcome::EmptyResponse) => (
                Message::assistant(outcome.assistant_text()),
                TurnStatus::EmptyResponse,
            ),
            Err(err) => {
                debug!(kind = %err.kind(), "chat turn failed");
                self.session.note_failure(&err);
                (
                    Message::assistant(err.message()),
                    TurnStatus::Failed(err.kind()),
                )
            }
        };

        self.session.push(reply.clone());
        CommandOutcome::Turn(TurnReport { reply, status })
    }

    async fn refresh_tasks(&mut self, record_failure: bool) -> TaskRefresh {
        match self.tasks.fetch_all_tasks().await {
            Ok(batch) => {
                self.session.mark_connected();
                TaskRefresh::Loaded(batch)
            }
            Err(err) => {
                // A malformed listing still came back as a 200, so the
                // backend is evidently reachable.
                if err.kind() == ErrorKind::MalformedResponse {
                    self.session.mark_connected();
                } else {
                    self.session.note_failure(&err);
                }
                if record_failure {
                    self.session.push(Message::assistant(err.message()));
                }
                TaskRefresh::Failed(err)
            }
        }
    }
}

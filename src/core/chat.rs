//! Chat turns against the task-manager endpoint.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::api::{first_chat_report, ChatRequest};
use crate::core::constants::REQUEST_TIMEOUT;
use crate::core::errors::{BackendError, Endpoint, ErrorClassifier};
use crate::utils::url::construct_api_url;

pub const NO_RESPONSE_MESSAGE: &str =
    "⚠️ No response from the assistant. Please check the backend.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "⚠️ I received an empty response. Please try again.";

/// A usable reply and the session id the backend wants us to carry next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnResult {
    pub message: String,
    pub session_id: String,
}

/// Every way an HTTP 200 from the chat endpoint can turn out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Reply(ChatTurnResult),
    /// The `reports` array was empty or absent.
    NoResponse,
    /// The first report carried no `response` text.
    EmptyResponse,
}

impl TurnOutcome {
    /// Text appended to the transcript for this outcome.
    pub fn assistant_text(&self) -> &str {
        match self {
            TurnOutcome::Reply(result) => &result.message,
            TurnOutcome::NoResponse => NO_RESPONSE_MESSAGE,
            TurnOutcome::EmptyResponse => EMPTY_RESPONSE_MESSAGE,
        }
    }
}

/// Session ids with a chat request currently awaiting the backend.
///
/// Shared by every clone of a [`ChatClient`], so callers serving several
/// users at once still send at most one turn per session.
#[derive(Clone, Debug, Default)]
pub struct InFlightTurns {
    sessions: Arc<Mutex<HashSet<String>>>,
}

impl InFlightTurns {
    /// Claims `session_id` until the returned guard drops. Empty ids always
    /// succeed since each one asks the backend for a fresh session.
    fn claim(&self, session_id: &str) -> Option<InFlightGuard> {
        if session_id.is_empty() {
            return Some(InFlightGuard { claimed: None });
        }
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if !sessions.insert(session_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            claimed: Some((Arc::clone(&self.sessions), session_id.to_string())),
        })
    }

    pub fn is_in_flight(&self, session_id: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(session_id)
    }
}

struct InFlightGuard {
    claimed: Option<(Arc<Mutex<HashSet<String>>>, String)>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some((sessions, session_id)) = self.claimed.take() {
            sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&session_id);
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    in_flight: InFlightTurns,
}

impl ChatClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
            in_flight: InFlightTurns::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn in_flight(&self) -> &InFlightTurns {
        &self.in_flight
    }

    /// Sends one utterance. Makes at most one request and never retries.
    ///
    /// Empty text is rejected before anything touches the network. A second
    /// call for a session that already has a turn in flight fails with
    /// [`ErrorKind::SessionBusy`](crate::core::errors::ErrorKind::SessionBusy).
    pub async fn send_utterance(
        &self,
        text: &str,
        session_id: &str,
    ) -> Result<TurnOutcome, BackendError> {
        let classifier = ErrorClassifier::new(Endpoint::Chat, &self.base_url, self.timeout);
        if text.trim().is_empty() {
            return Err(classifier.internal("refusing to send an empty message"));
        }

        let Some(_guard) = self.in_flight.claim(session_id) else {
            debug!(session_id, "chat turn rejected: session already in flight");
            return Err(classifier.session_busy());
        };

        let url = construct_api_url(&self.base_url, Endpoint::Chat.path());
        debug!(%url, new_session = session_id.is_empty(), "sending chat turn");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&ChatRequest {
                utterance: text,
                session_id,
            })
            .send()
            .await
            .map_err(|err| classifier.transport(&err))?;

        let status = response.status();
        if let Some(err) = classifier.status(status) {
            debug!(%status, kind = %err.kind(), "chat turn rejected by backend");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|err| classifier.transport(&err))?;
        parse_chat_body(&body).map_err(|err| match err {
            ChatBodyError::InvalidJson(detail) => classifier.malformed(detail),
            ChatBodyError::UnexpectedShape(detail) => {
                debug!(%detail, "chat reply has an unexpected shape");
                classifier.internal(detail)
            }
        })
    }
}

/// Why a 200 body could not be turned into an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChatBodyError {
    /// The body is not JSON at all.
    InvalidJson(String),
    /// The body is JSON but not a `{ "reports": [{ .. }] }` envelope.
    UnexpectedShape(String),
}

/// Decodes a 200 body into an outcome.
pub(crate) fn parse_chat_body(body: &str) -> Result<TurnOutcome, ChatBodyError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| ChatBodyError::InvalidJson(format!("Invalid JSON format. {err}")))?;
    let report = first_chat_report(&value).map_err(|detail| {
        ChatBodyError::UnexpectedShape(format!("Unexpected response shape. {detail}"))
    })?;

    let Some(report) = report else {
        return Ok(TurnOutcome::NoResponse);
    };

    match report.response {
        Some(message) if !message.is_empty() => Ok(TurnOutcome::Reply(ChatTurnResult {
            message,
            session_id: report.session_id.unwrap_or_default(),
        })),
        _ => Ok(TurnOutcome::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::utils::test_utils::{unreachable_base_url, MockBackend, MockResponse};
    use serde_json::json;

    fn client_for(base_url: &str) -> ChatClient {
        ChatClient::new(reqwest::Client::new(), base_url)
    }

    fn reply(response: &str, session_id: &str) -> MockResponse {
        MockResponse::json(
            200,
            json!({"reports": [{"response": response, "session_id": session_id}]}),
        )
    }

    #[test]
    fn parse_chat_body_handles_degenerate_bodies() {
        assert_eq!(
            parse_chat_body(r#"{"reports": []}"#),
            Ok(TurnOutcome::NoResponse)
        );
        assert_eq!(parse_chat_body("{}"), Ok(TurnOutcome::NoResponse));
        assert_eq!(
            parse_chat_body(r#"{"reports": null}"#),
            Ok(TurnOutcome::NoResponse)
        );
        assert_eq!(
            parse_chat_body(r#"{"reports": [{"response": "", "session_id": "s1"}]}"#),
            Ok(TurnOutcome::EmptyResponse)
        );
        assert_eq!(
            parse_chat_body(r#"{"reports": [{"session_id": "s1"}]}"#),
            Ok(TurnOutcome::EmptyResponse)
        );
    }

    #[test]
    fn parse_chat_body_uses_first_report_only() {
        let outcome = parse_chat_body(
            r#"{"reports": [{"response": "first", "session_id": "a"}, {"response": "second", "session_id": "b"}]}"#,
        )
        .expect("body should parse");
        assert_eq!(
            outcome,
            TurnOutcome::Reply(ChatTurnResult {
                message: "first".to_string(),
                session_id: "a".to_string(),
            })
        );
    }

    #[test]
    fn parse_chat_body_rejects_bad_json_and_bad_shapes() {
        assert!(matches!(
            parse_chat_body("not json"),
            Err(ChatBodyError::InvalidJson(detail)) if detail.starts_with("Invalid JSON format.")
        ));

        for body in [
            r#"{"reports": "nope"}"#,
            r#"{"reports": [{"response": 42}]}"#,
            "[]",
            r#"[[{"response": "hi", "session_id": "s9"}]]"#,
            r#"{"reports": [["hello", "sid-x"]]}"#,
        ] {
            assert!(
                matches!(
                    parse_chat_body(body),
                    Err(ChatBodyError::UnexpectedShape(ref detail))
                        if detail.starts_with("Unexpected response shape.")
                ),
                "expected a shape error for {body}"
            );
        }
    }

    #[test]
    fn in_flight_claims_are_released_on_drop() {
        let turns = InFlightTurns::default();
        let guard = turns.claim("s1").expect("first claim succeeds");
        assert!(turns.is_in_flight("s1"));
        assert!(turns.claim("s1").is_none());
        assert!(turns.claim("s2").is_some());
        drop(guard);
        assert!(!turns.is_in_flight("s1"));
        assert!(turns.claim("s1").is_some());
    }

    #[test]
    fn empty_session_ids_are_never_deduplicated() {
        let turns = InFlightTurns::default();
        let _first = turns.claim("").expect("empty claim succeeds");
        assert!(turns.claim("").is_some());
        assert!(!turns.is_in_flight(""));
    }

    #[tokio::test]
    async fn send_utterance_posts_body_and_returns_rotated_session() {
        let backend = MockBackend::start(vec![reply("Task added.", "rotated")]).await;
        let client = client_for(&backend.base_url());

        let outcome = client
            .send_utterance("remind me at 5pm", "original")
            .await
            .expect("turn should succeed");
        assert_eq!(
            outcome,
            TurnOutcome::Reply(ChatTurnResult {
                message: "Task added.".to_string(),
                session_id: "rotated".to_string(),
            })
        );

        let requests = backend.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].request_line.starts_with("POST "));
        assert_eq!(requests[0].path(), "/walker/task_manager");
        assert_eq!(
            requests[0].json(),
            json!({"utterance": "remind me at 5pm", "session_id": "original"})
        );
    }

    #[tokio::test]
    async fn empty_utterance_never_reaches_backend() {
        let backend = MockBackend::start(vec![reply("unused", "s")]).await;
        let client = client_for(&backend.base_url());

        let err = client
            .send_utterance("   ", "")
            .await
            .expect_err("empty text is rejected");
        assert_eq!(err.kind(), ErrorKind::InternalClientError);
        assert!(backend.requests().await.is_empty());
    }

    #[tokio::test]
    async fn status_codes_are_classified() {
        let cases = [
            (404, ErrorKind::EndpointNotFound),
            (500, ErrorKind::ServerError),
            (503, ErrorKind::UnexpectedStatus(503)),
            (201, ErrorKind::UnexpectedStatus(201)),
        ];
        for (status, expected) in cases {
            let backend = MockBackend::start(vec![MockResponse::raw(status, "{}")]).await;
            let err = client_for(&backend.base_url())
                .send_utterance("hello", "s1")
                .await
                .expect_err("non-200 is an error");
            assert_eq!(err.kind(), expected, "status {status}");
        }
    }

    #[tokio::test]
    async fn invalid_json_body_is_malformed() {
        let backend = MockBackend::start(vec![MockResponse::raw(200, "not json")]).await;
        let err = client_for(&backend.base_url())
            .send_utterance("hello", "")
            .await
            .expect_err("body is not JSON");
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.message().starts_with("❌ Error parsing response: Invalid JSON format."));
    }

    #[tokio::test]
    async fn array_shaped_body_is_an_internal_error() {
        let backend =
            MockBackend::start(vec![MockResponse::raw(200, r#"{"reports": [["hello", "sid-x"]]}"#)])
                .await;
        let err = client_for(&backend.base_url())
            .send_utterance("hello", "s1")
            .await
            .expect_err("positional report is rejected");
        assert_eq!(err.kind(), ErrorKind::InternalClientError);
        assert!(err
            .message()
            .starts_with("❌ Unexpected error: Unexpected response shape."));
    }

    #[tokio::test]
    async fn body_cut_off_mid_read_is_unreachable() {
        let backend = MockBackend::start(vec![reply("partial", "s1").truncated()]).await;
        let client = client_for(&backend.base_url());

        let err = client
            .send_utterance("hello", "s1")
            .await
            .expect_err("body ends early");
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert!(err.kind().marks_disconnected());
        assert!(!client.in_flight().is_in_flight("s1"));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let backend = MockBackend::start(vec![
            reply("too late", "s1").delayed(Duration::from_secs(2))
        ])
        .await;
        let client = client_for(&backend.base_url()).with_timeout(Duration::from_millis(200));

        let err = client
            .send_utterance("hello", "s1")
            .await
            .expect_err("request should time out");
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(!client.in_flight().is_in_flight("s1"));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let base_url = unreachable_base_url().await;
        let err = client_for(&base_url)
            .send_utterance("hello", "")
            .await
            .expect_err("nothing is listening");
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert!(err.message().contains(&base_url));
    }

    #[tokio::test]
    async fn concurrent_turns_for_one_session_are_deduplicated() {
        let backend =
            MockBackend::start(vec![reply("ok", "s1").delayed(Duration::from_millis(300))]).await;
        let client = client_for(&backend.base_url());
        let other = client.clone();

        let (first, second) = tokio::join!(
            client.send_utterance("first", "s1"),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                other.send_utterance("second", "s1").await
            }
        );

        assert!(matches!(first, Ok(TurnOutcome::Reply(_))));
        assert_eq!(
            second.expect_err("second turn is busy").kind(),
            ErrorKind::SessionBusy
        );
        assert_eq!(backend.requests().await.len(), 1);
    }
}

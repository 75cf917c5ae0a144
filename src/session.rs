//! Conversation state for the chat page.
//!
//! The manager owns the current session id, its message log and the history
//! list. Mutations that the user should see immediately (the user's own
//! message, a session switch) happen synchronously; the network half of each
//! operation is returned as a future for the caller to spawn. Overlapping
//! operations are not serialized: replies land in whatever order they resolve.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::api::{ChatBackend, ChatRequest};
use crate::types::{Language, Message, MessageId, Sender, SessionId, SessionSummary, epoch_millis};

pub const GREETING: &str =
    "🌾 Hi there! I’m FreshAir — your agriculture assistant. How can I help today?";
pub const SERVER_ERROR_REPLY: &str = "⚠️ Server error. Check console for details.";

/// Receives each successful reply together with the language it was asked in.
pub type ReplySink = Arc<dyn Fn(&str, Language) + Send + Sync>;

struct SessionState {
    current: SessionId,
    messages: Vec<Message>,
    history: Vec<SessionSummary>,
    language: Language,
    /// Bumped on every start/switch; late completions from an older epoch
    /// are dropped so the log never mixes two sessions.
    epoch: u64,
}

impl SessionState {
    fn next_message_id(&self) -> MessageId {
        let max = self
            .messages
            .iter()
            .filter_map(|m| match m.id {
                MessageId::Number(n) => Some(n),
                MessageId::Other(_) | MessageId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        MessageId::Number(max + 1)
    }

    fn push(&mut self, from: Sender, text: impl Into<String>) {
        let id = self.next_message_id();
        self.messages.push(Message {
            id,
            from,
            text: text.into(),
        });
    }

    fn reset(&mut self, session: SessionId) {
        self.current = session;
        self.messages.clear();
        self.push(Sender::Bot, GREETING);
        self.epoch += 1;
    }
}

#[derive(Clone)]
pub struct SessionManager {
    backend: Arc<dyn ChatBackend>,
    state: Arc<Mutex<SessionState>>,
    reply_sink: Option<ReplySink>,
    changes: Arc<watch::Sender<u64>>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn ChatBackend>, language: Language) -> Self {
        let mut state = SessionState {
            current: SessionId::generate(),
            messages: Vec::new(),
            history: Vec::new(),
            language,
            epoch: 0,
        };
        let first = state.current.clone();
        state.reset(first);
        let (changes, _) = watch::channel(0);
        Self {
            backend,
            state: Arc::new(Mutex::new(state)),
            reply_sink: None,
            changes: Arc::new(changes),
        }
    }

    /// Speaks (or otherwise consumes) every successful reply.
    pub fn with_reply_sink(mut self, sink: ReplySink) -> Self {
        self.reply_sink = Some(sink);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    /// Revision counter that ticks after every visible change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn start_new_session(&self) -> SessionId {
        let id = SessionId::generate();
        self.lock().reset(id.clone());
        self.notify();
        tracing::debug!(session = %id, "started new session");
        id
    }

    /// Appends the user's message right away and returns the request future,
    /// or `None` (with nothing appended) when `text` is blank.
    ///
    /// The future never fails: a transport error or non-success response
    /// becomes a single fallback bot message.
    pub fn send(&self, text: &str) -> Option<impl Future<Output = ()> + use<>> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return None;
        }

        let (request, epoch) = {
            let mut state = self.lock();
            state.push(Sender::User, prompt);
            let request = ChatRequest {
                prompt: prompt.to_string(),
                session_id: state.current.clone(),
                lang: state.language,
            };
            (request, state.epoch)
        };
        self.notify();

        let this = self.clone();
        Some(async move { this.complete_send(request, epoch).await })
    }

    async fn complete_send(&self, request: ChatRequest, epoch: u64) {
        let outcome = self.backend.send_chat(&request).await;

        let spoken = {
            let mut state = self.lock();
            let still_current = state.epoch == epoch;
            match outcome {
                Ok(reply) => {
                    let filed_under = reply
                        .session_id
                        .clone()
                        .unwrap_or_else(|| request.session_id.clone());
                    if !state.history.iter().any(|h| h.session_id == filed_under) {
                        state.history.insert(
                            0,
                            SessionSummary {
                                session_id: filed_under,
                                title: request.prompt.clone(),
                                updated_at: Some(epoch_millis()),
                            },
                        );
                    }
                    if still_current {
                        state.push(Sender::Bot, reply.reply.as_str());
                        if let Some(server_id) = reply.session_id
                            && server_id != state.current
                        {
                            tracing::debug!(from = %state.current, to = %server_id, "adopting server session id");
                            state.current = server_id;
                        }
                        Some((reply.reply, request.lang))
                    } else {
                        tracing::debug!(session = %request.session_id, "reply for a session no longer shown");
                        None
                    }
                }
                Err(err) => {
                    tracing::error!(session = %request.session_id, error = %err, "chat send failed");
                    if still_current {
                        state.push(Sender::Bot, SERVER_ERROR_REPLY);
                    }
                    None
                }
            }
        };
        self.notify();

        if let (Some((reply, lang)), Some(sink)) = (spoken, &self.reply_sink) {
            sink(&reply, lang);
        }
    }

    /// Makes `id` current immediately and returns the reload future. The
    /// loaded log replaces the current one wholesale; on failure the log is
    /// left as it was.
    pub fn switch_session(&self, id: SessionId) -> impl Future<Output = ()> + use<> {
        let epoch = {
            let mut state = self.lock();
            state.current = id.clone();
            state.epoch += 1;
            state.epoch
        };
        self.notify();

        let this = self.clone();
        async move { this.reload(id, epoch).await }
    }

    async fn reload(&self, id: SessionId, epoch: u64) {
        match self.backend.chat_history(&id).await {
            Ok(messages) => {
                let applied = {
                    let mut state = self.lock();
                    if state.epoch == epoch {
                        state.messages = messages;
                        true
                    } else {
                        false
                    }
                };
                if applied {
                    self.notify();
                } else {
                    tracing::debug!(session = %id, "discarding stale session reload");
                }
            }
            Err(err) => {
                tracing::warn!(session = %id, error = %err, "failed to load session, keeping current log");
            }
        }
    }

    /// Fetches the history list. Failures leave the current list in place.
    pub fn refresh_history(&self) -> impl Future<Output = ()> + use<> {
        let this = self.clone();
        async move {
            match this.backend.list_chats().await {
                Ok(list) => {
                    this.lock().history = list;
                    this.notify();
                }
                Err(err) => tracing::warn!(error = %err, "failed to load chat history"),
            }
        }
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.lock().history.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn current_session(&self) -> SessionId {
        self.lock().current.clone()
    }

    pub fn language(&self) -> Language {
        self.lock().language
    }

    pub fn set_language(&self, language: Language) {
        self.lock().language = language;
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(ids: &[MessageId]) -> SessionState {
        SessionState {
            current: SessionId::new("s"),
            messages: ids
                .iter()
                .cloned()
                .map(|id| Message {
                    id,
                    from: Sender::Bot,
                    text: String::new(),
                })
                .collect(),
            history: Vec::new(),
            language: Language::En,
            epoch: 0,
        }
    }

    #[test]
    fn message_ids_follow_the_highest_numeric_id() {
        let state = state_with(&[
            MessageId::Number(7),
            MessageId::Text("server-a".into()),
            MessageId::Other(serde_json::Number::from(-9)),
            MessageId::Number(3),
        ]);
        assert_eq!(state.next_message_id(), MessageId::Number(8));
        assert_eq!(state_with(&[]).next_message_id(), MessageId::Number(1));
    }

    #[test]
    fn reset_leaves_only_the_greeting() {
        let mut state = state_with(&[MessageId::Number(1), MessageId::Number(2)]);
        state.reset(SessionId::new("fresh"));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].text, GREETING);
        assert_eq!(state.current.as_str(), "fresh");
        assert_eq!(state.epoch, 1);
    }
}

//! Session Store
//!
//! Keeps a short transcript per phone call, keyed by the provider's call
//! identifier. Nothing is persisted; sessions idle for longer than the
//! configured time-to-live are evicted by a background sweeper.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// The transcript of one call.
#[derive(Debug, Clone)]
pub struct CallSession {
    pub call_sid: String,
    pub transcript: Vec<String>,
    last_activity: Instant,
}

impl CallSession {
    fn new(call_sid: &str) -> Self {
        Self {
            call_sid: call_sid.to_string(),
            transcript: Vec::new(),
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Storage for per-call transcripts. None of these operations can fail.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts an empty transcript for `call_sid`, replacing any existing one.
    async fn start_session(&self, call_sid: &str);

    /// Returns the transcript for `call_sid`, or an empty one if unknown.
    async fn history(&self, call_sid: &str) -> Vec<String>;

    /// Appends a user line and an assistant line, in that order.
    ///
    /// An unknown `call_sid` gets a new transcript holding just these two lines.
    async fn append_turn(&self, call_sid: &str, user_line: String, assistant_line: String);
}

/// A `SessionStore` held in process memory behind an async mutex.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, CallSession>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    /// Creates an empty store whose sessions expire after `ttl` without activity.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every session idle for longer than the TTL and returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, session| session.last_activity.elapsed() <= ttl);
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn start_session(&self, call_sid: &str) {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .insert(call_sid.to_string(), CallSession::new(call_sid))
            .is_some()
        {
            debug!(%call_sid, "Replaced existing session for repeated call start");
        }
    }

    async fn history(&self, call_sid: &str) -> Vec<String> {
        self.sessions
            .lock()
            .await
            .get(call_sid)
            .map(|session| session.transcript.clone())
            .unwrap_or_default()
    }

    async fn append_turn(&self, call_sid: &str, user_line: String, assistant_line: String) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(call_sid.to_string())
            .or_insert_with(|| CallSession::new(call_sid));
        session.transcript.push(user_line);
        session.transcript.push(assistant_line);
        session.touch();
    }
}

/// Spawns a task that evicts expired sessions every `every`.
///
/// The task runs until the returned handle is aborted or the runtime shuts down.
pub fn spawn_sweeper(store: Arc<InMemorySessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_expired().await;
            if evicted > 0 {
                let remaining = store.len().await;
                info!(evicted, remaining, "Evicted idle call sessions");
            }
        }
    })
}

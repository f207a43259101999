//! Session-scoped state: subscription toggles and request history
//!
//! Each session owns one [`SessionState`] behind its own async mutex, so
//! updates to a session are applied one at a time while different sessions
//! never contend. The session table is an `RwLock`ed map; a session lock is
//! never held while acquiring the table lock, and the table lock never
//! waits on a session lock. Least-recently-used eviction orders sessions by
//! a logical clock stamped on every access.

pub mod history;
pub mod subscriptions;

pub use history::{HistoryEntry, RequestHistory};
pub use subscriptions::SubscriptionState;

use crate::config::{Config, HistoryConfig};
use crate::error::{AppError, AppResult};
use crate::providers::ProviderId;
use crate::router::RoutingDecision;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Default cap on concurrently tracked sessions
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Opaque session identifier carried in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Mutable state owned by one session
#[derive(Debug)]
pub struct SessionState {
    subscriptions: SubscriptionState,
    history: RequestHistory,
}

impl SessionState {
    fn new(subscriptions: SubscriptionState, history: RequestHistory) -> Self {
        Self {
            subscriptions,
            history,
        }
    }

    pub fn subscriptions(&self) -> &SubscriptionState {
        &self.subscriptions
    }

    pub fn history(&self) -> &RequestHistory {
        &self.history
    }
}

/// Table entry for one session
///
/// Recency and eviction live in atomics next to the state mutex, so the
/// eviction scan reads them without locking any session.
#[derive(Debug)]
struct SessionSlot {
    last_seen: AtomicU64,
    evicted: AtomicBool,
    state: Mutex<SessionState>,
}

impl SessionSlot {
    fn new(state: SessionState, tick: u64) -> Self {
        Self {
            last_seen: AtomicU64::new(tick),
            evicted: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    fn touch(&self, tick: u64) {
        self.last_seen.fetch_max(tick, Ordering::Relaxed);
    }

    fn last_seen(&self) -> u64 {
        self.last_seen.load(Ordering::Relaxed)
    }

    fn is_evicted(&self) -> bool {
        self.evicted.load(Ordering::Acquire)
    }
}

/// In-memory table of sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<SessionSlot>>>,
    clock: AtomicU64,
    default_subscriptions: SubscriptionState,
    history_config: HistoryConfig,
    max_sessions: usize,
}

impl SessionStore {
    /// Create a store whose new sessions start from the configured defaults
    pub fn new(config: &Config) -> Self {
        Self::with_limits(
            config.subscriptions,
            config.history.clone(),
            config.sessions.max_sessions,
        )
    }

    pub fn with_limits(
        default_subscriptions: SubscriptionState,
        history_config: HistoryConfig,
        max_sessions: usize,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            default_subscriptions,
            history_config,
            max_sessions,
        }
    }

    /// Subscription state new sessions start with
    pub fn default_subscriptions(&self) -> SubscriptionState {
        self.default_subscriptions
    }

    /// Number of tracked sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Logical timestamp for recency ordering
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Get a session's slot, creating the session on first use
    ///
    /// Marks the session as most recently used.
    async fn session(&self, id: SessionId) -> Arc<SessionSlot> {
        if let Some(existing) = self.sessions.read().await.get(&id) {
            existing.touch(self.tick());
            return existing.clone();
        }

        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&id) {
            existing.touch(self.tick());
            return existing.clone();
        }

        if sessions.len() >= self.max_sessions {
            Self::evict_least_recent(&mut sessions);
        }

        let slot = Arc::new(SessionSlot::new(
            SessionState::new(
                self.default_subscriptions,
                RequestHistory::new(
                    self.history_config.max_entries,
                    self.history_config.preview_chars,
                ),
            ),
            self.tick(),
        ));
        sessions.insert(id, slot.clone());

        tracing::debug!(session_id = %id, total_sessions = sessions.len(), "Session created");
        slot
    }

    fn evict_least_recent(sessions: &mut HashMap<SessionId, Arc<SessionSlot>>) {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, slot)| slot.last_seen())
            .map(|(id, _)| *id);

        if let Some(id) = oldest
            && let Some(slot) = sessions.remove(&id)
        {
            slot.evicted.store(true, Ordering::Release);
            tracing::info!(session_id = %id, "Session evicted (session limit reached)");
        }
    }

    /// Current subscription snapshot for a session
    pub async fn subscriptions(&self, id: SessionId) -> SubscriptionState {
        let session = self.session(id).await;
        let state = session.state.lock().await;
        state.subscriptions
    }

    /// Toggle one provider for a session, returning the updated snapshot
    ///
    /// # Errors
    /// Returns `AppError::SubscriptionUpdateFailed` if the session was evicted
    /// before the write landed; the caller should re-read subscriptions.
    pub async fn set_subscription(
        &self,
        id: SessionId,
        provider: ProviderId,
        active: bool,
    ) -> AppResult<SubscriptionState> {
        let session = self.session(id).await;
        Self::apply_subscription(id, &session, provider, active).await
    }

    async fn apply_subscription(
        id: SessionId,
        session: &SessionSlot,
        provider: ProviderId,
        active: bool,
    ) -> AppResult<SubscriptionState> {
        let mut state = session.state.lock().await;

        if session.is_evicted() {
            return Err(AppError::SubscriptionUpdateFailed {
                provider,
                reason: "session expired before the update was applied".to_string(),
            });
        }

        let previous = state.subscriptions.set(provider, active);

        tracing::info!(
            session_id = %id,
            provider = provider.as_str(),
            previous,
            active,
            "Subscription updated"
        );

        Ok(state.subscriptions)
    }

    /// Record a routed prompt in the session's history
    ///
    /// If the session was evicted after lookup, the entry goes to the fresh
    /// session now registered under the same ID.
    pub async fn append_history(
        &self,
        id: SessionId,
        text: &str,
        decision: &RoutingDecision,
        at: DateTime<Local>,
    ) {
        let session = self.session(id).await;
        if !session.is_evicted() {
            let mut state = session.state.lock().await;
            if !session.is_evicted() {
                state.history.append(text, decision, at);
                return;
            }
        }

        tracing::debug!(
            session_id = %id,
            "Session evicted mid-request, recording history in new session"
        );
        let session = self.session(id).await;
        session.state.lock().await.history.append(text, decision, at);
    }

    /// History for a session, most recent first
    pub async fn history(&self, id: SessionId) -> Vec<HistoryEntry> {
        let session = self.session(id).await;
        let state = session.state.lock().await;
        state.history.snapshot()
    }

    /// Remove every history entry for a session
    pub async fn clear_history(&self, id: SessionId) {
        let session = self.session(id).await;
        session.state.lock().await.history.clear();
        tracing::debug!(session_id = %id, "History cleared");
    }
}

//! Application state for the document chat server

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::DocChatConfig;
use crate::error::{Error, Result};
use crate::generation::ContextQueryClient;
use crate::ingestion::FileParser;
use crate::providers::{GeminiClient, LlmProvider};
use crate::session::Session;

/// Shared handle to one session; the lock serializes its queries
pub type SessionHandle = Arc<Mutex<Session>>;

/// A live session plus the time it was last looked up
struct SessionSlot {
    handle: SessionHandle,
    /// Milliseconds since `AppStateInner::started`
    last_access_ms: AtomicU64,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocChatConfig,
    /// Extractors
    parser: FileParser,
    /// Query client over the configured provider
    client: ContextQueryClient,
    /// Live sessions; nothing is shared between them
    sessions: DashMap<Uuid, SessionSlot>,
    /// Clock origin for `SessionSlot::last_access_ms`
    started: Instant,
}

impl AppState {
    /// Create state backed by the Gemini API
    pub fn new(config: DocChatConfig) -> Result<Self> {
        let provider = Arc::new(GeminiClient::new(&config.llm)?);
        tracing::info!("Gemini client initialized (model: {})", config.llm.model);
        Ok(Self::with_provider(config, provider))
    }

    /// Create state with an explicit answering-service provider
    pub fn with_provider(config: DocChatConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let parser = FileParser::new(&config.extraction);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                parser,
                client: ContextQueryClient::new(provider),
                sessions: DashMap::new(),
                started: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &DocChatConfig {
        &self.inner.config
    }

    pub fn parser(&self) -> &FileParser {
        &self.inner.parser
    }

    pub fn client(&self) -> &ContextQueryClient {
        &self.inner.client
    }

    /// Credential used when a request carries none
    pub fn fallback_api_key(&self) -> Option<&str> {
        self.inner.config.llm.api_key.as_deref()
    }

    /// Start a new, empty session
    pub fn create_session(&self) -> SessionHandle {
        let session = Session::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.inner.sessions.insert(
            id,
            SessionSlot {
                handle: Arc::clone(&handle),
                last_access_ms: AtomicU64::new(self.elapsed_ms()),
            },
        );
        tracing::info!("Created session {} ({} active)", id, self.inner.sessions.len());
        handle
    }

    /// Look up a session by its id string
    pub fn session(&self, id: &str) -> Result<SessionHandle> {
        let uuid = parse_session_id(id)?;
        self.inner
            .sessions
            .get(&uuid)
            .map(|slot| {
                slot.last_access_ms.store(self.elapsed_ms(), Ordering::Relaxed);
                Arc::clone(&slot.handle)
            })
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Drop a session and everything it holds
    pub fn remove_session(&self, id: &str) -> Result<()> {
        let uuid = parse_session_id(id)?;
        self.inner
            .sessions
            .remove(&uuid)
            .map(|_| tracing::info!("Removed session {}", uuid))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Drop every session not looked up within `max_idle`; returns how many were dropped.
    ///
    /// A session whose handle is still held by an in-flight request stays
    /// usable by that request; it is only unreachable for later ones.
    pub fn expire_idle(&self, max_idle: Duration) -> usize {
        let now = self.elapsed_ms();
        let limit = max_idle.as_millis() as u64;
        let before = self.inner.sessions.len();

        self.inner.sessions.retain(|id, slot| {
            let idle = now.saturating_sub(slot.last_access_ms.load(Ordering::Relaxed));
            let keep = idle < limit;
            if !keep {
                tracing::info!("Expired idle session {} ({}s idle)", id, idle / 1000);
            }
            keep
        });

        before.saturating_sub(self.inner.sessions.len())
    }

    /// Periodically expire sessions idle for longer than `max_idle`
    pub fn spawn_expiry_sweep(&self, max_idle: Duration) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        let period = (max_idle / 2).clamp(Duration::from_secs(1), Duration::from_secs(60));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                state.expire_idle(max_idle);
            }
        })
    }

    fn elapsed_ms(&self) -> u64 {
        self.inner.started.elapsed().as_millis() as u64
    }
}

fn parse_session_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| Error::SessionNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::testing::StubProvider;

    fn state() -> AppState {
        AppState::with_provider(DocChatConfig::default(), Arc::new(StubProvider::new(vec![])))
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = state();
        let id = state.create_session().lock().await.id().to_string();

        assert_eq!(state.session_count(), 1);
        assert!(state.session(&id).is_ok());

        state.remove_session(&id).unwrap();
        assert!(matches!(state.session(&id), Err(Error::SessionNotFound(_))));
        assert!(state.remove_session(&id).is_err());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let state = state();
        let kept = state.create_session().lock().await.id().to_string();

        assert_eq!(state.expire_idle(Duration::from_secs(3600)), 0);
        assert!(state.session(&kept).is_ok());

        assert_eq!(state.expire_idle(Duration::ZERO), 1);
        assert_eq!(state.session_count(), 0);
        assert!(matches!(state.session(&kept), Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_lookup_refreshes_last_access() {
        let state = state();
        let id = state.create_session().lock().await.id().to_string();

        tokio::time::sleep(Duration::from_millis(60)).await;
        state.session(&id).unwrap();

        assert_eq!(state.expire_idle(Duration::from_millis(40)), 0);
        assert_eq!(state.session_count(), 1);
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        assert!(matches!(state().session("not-a-uuid"), Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = state();
        let first = state.create_session();
        let second = state.create_session();

        let first_id = first.lock().await.id();
        let second_id = second.lock().await.id();
        assert_ne!(first_id, second_id);
        assert_eq!(state.session_count(), 2);
    }
}

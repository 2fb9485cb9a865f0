//! Session store
//!
//! Single source of truth for authentication state. Holds the current user
//! identity, bearer token, and token expiry; mediates login, logout, and
//! token validation against the remote API; and persists state to durable
//! storage so a restart restores the session.
//!
//! Session mutation is last-writer-wins: a monotonic operation sequence is
//! bumped by every mutation, and an in-flight login whose response arrives
//! after a later logout (or 401 teardown) is discarded instead of
//! resurrecting a dead session.

pub mod storage;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::client::http::{BearerToken, UnauthorizedHandler};
use crate::client::{AuthApi, LoginCredentials, UserIdentity};
use crate::guard::{SessionSnapshot, LOGIN_PATH};
use storage::{keys, Storage};

/// In-memory session state. Invariant: `token` present implies
/// `token_expires` was persisted alongside it at commit time; a restored
/// token without a parseable expiry yields a not-authenticated session.
#[derive(Debug, Default, Clone)]
struct SessionState {
    user: Option<UserIdentity>,
    token: Option<String>,
    token_expires: Option<DateTime<Utc>>,
}

fn authenticated_at(state: &SessionState, now: DateTime<Utc>) -> bool {
    match (&state.token, state.token_expires) {
        (Some(_), Some(expires)) => now < expires,
        _ => false,
    }
}

/// Session store backed by an auth API and durable storage
pub struct SessionStore<A: AuthApi> {
    api: Arc<A>,
    storage: Arc<dyn Storage>,
    bearer: BearerToken,
    state: RwLock<SessionState>,
    loading: AtomicBool,
    op_seq: AtomicU64,
}

impl<A: AuthApi> SessionStore<A> {
    /// Create a store and restore any persisted session
    pub fn new(api: Arc<A>, storage: Arc<dyn Storage>, bearer: BearerToken) -> Self {
        let store = Self {
            api,
            storage,
            bearer,
            state: RwLock::new(SessionState::default()),
            loading: AtomicBool::new(false),
            op_seq: AtomicU64::new(0),
        };
        store.restore_from_storage();
        store
    }

    /// Whether a login or validation call is in flight, for UI feedback
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Recomputed on every access: token present and strictly unexpired
    pub fn is_authenticated(&self) -> bool {
        authenticated_at(&self.state.read().unwrap(), Utc::now())
    }

    /// Membership test against the current user's roles
    pub fn has_role(&self, role: &str) -> bool {
        self.state
            .read()
            .unwrap()
            .user
            .as_ref()
            .is_some_and(|user| user.roles.iter().any(|r| r == role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    /// Current user identity, if signed in
    pub fn user(&self) -> Option<UserIdentity> {
        self.state.read().unwrap().user.clone()
    }

    /// Initials for the avatar badge; `"?"` when nobody is signed in
    pub fn user_initials(&self) -> String {
        self.user()
            .map(|user| user.initials())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Token expiry, if a token is held
    pub fn token_expires(&self) -> Option<DateTime<Utc>> {
        self.state.read().unwrap().token_expires
    }

    /// Read-only view for the navigation guard
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().unwrap();
        SessionSnapshot {
            authenticated: authenticated_at(&state, Utc::now()),
            roles: state
                .user
                .as_ref()
                .map(|user| user.roles.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the user identity, token, and expiry are committed
    /// together and persisted; on any failure the prior state is left
    /// untouched and `false` is returned. A response that arrives after the
    /// session was mutated by a newer operation is discarded.
    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        self.loading.store(true, Ordering::SeqCst);
        let started_at = self.op_seq.load(Ordering::SeqCst);

        let response = self.api.login(credentials).await;
        self.loading.store(false, Ordering::SeqCst);

        if response.is_error {
            log::error!(
                "Login failed: {}",
                response.message.as_deref().unwrap_or("unknown error")
            );
            return false;
        }

        let Some(data) = response.data else {
            log::error!("Login response carried no body");
            return false;
        };

        if self.op_seq.load(Ordering::SeqCst) != started_at {
            log::warn!("Discarding stale login response; session changed while in flight");
            return false;
        }

        let user = UserIdentity::from(&data);

        {
            let mut state = self.state.write().unwrap();
            state.user = Some(user.clone());
            state.token = Some(data.token.clone());
            state.token_expires = Some(data.token_expires);
        }
        self.op_seq.fetch_add(1, Ordering::SeqCst);

        match serde_json::to_string(&user) {
            Ok(json) => self.storage.set(keys::USER, &json),
            Err(e) => log::warn!("Failed to serialize user for storage: {}", e),
        }
        self.storage.set(keys::TOKEN, &data.token);
        self.storage
            .set(keys::TOKEN_EXPIRES, &data.token_expires.to_rfc3339());

        self.bearer.set(&data.token);

        log::info!("Login successful for {}", user.username);
        true
    }

    /// Best-effort remote logout, then unconditional local teardown
    pub async fn logout(&self) {
        // Invalidate any in-flight login before the network call
        self.op_seq.fetch_add(1, Ordering::SeqCst);

        let had_token = self.state.read().unwrap().token.is_some();
        if had_token {
            let response = self.api.logout().await;
            if response.is_error {
                log::warn!(
                    "Remote logout failed: {}",
                    response.message.as_deref().unwrap_or("unknown error")
                );
            }
        }

        self.clear_local();
        self.storage.remove(keys::REMEMBER);
    }

    /// Check the current token.
    ///
    /// A locally expired token forces logout without a network round-trip.
    /// A remote or transport error is fail-closed for this call but does not
    /// destroy a still-locally-valid session.
    pub async fn validate_token(&self) -> bool {
        let token = match self.state.read().unwrap().token.clone() {
            Some(token) => token,
            None => return false,
        };

        if !self.is_authenticated() {
            log::info!("Token expired, logging out");
            self.logout().await;
            return false;
        }

        let response = self.api.validate_token(&token).await;
        if response.is_error {
            log::warn!(
                "Token validation failed: {}",
                response.message.as_deref().unwrap_or("unknown error")
            );
            return false;
        }

        response.data.map(|verdict| verdict.valid).unwrap_or(false)
    }

    /// Pop the remembered post-login redirect path
    pub fn take_redirect_after_login(&self) -> Option<String> {
        let path = self.storage.get(keys::REDIRECT_AFTER_LOGIN);
        if path.is_some() {
            self.storage.remove(keys::REDIRECT_AFTER_LOGIN);
        }
        path
    }

    /// Restore a persisted session, discarding corrupt entries
    fn restore_from_storage(&self) {
        let mut state = self.state.write().unwrap();

        if let Some(stored_user) = self.storage.get(keys::USER) {
            match serde_json::from_str::<UserIdentity>(&stored_user) {
                Ok(user) => state.user = Some(user),
                Err(e) => {
                    log::error!("Discarding corrupt stored user: {}", e);
                    self.storage.remove(keys::USER);
                }
            }
        }

        if let Some(token) = self.storage.get(keys::TOKEN) {
            state.token_expires = self
                .storage
                .get(keys::TOKEN_EXPIRES)
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|dt| dt.with_timezone(&Utc));

            // Re-attach the token so restored sessions keep sending it
            self.bearer.set(&token);
            state.token = Some(token);
        }
    }

    /// Drop in-memory state, the bearer slot, and the durable auth keys
    fn clear_local(&self) {
        {
            let mut state = self.state.write().unwrap();
            *state = SessionState::default();
        }

        self.bearer.clear();

        self.storage.remove(keys::USER);
        self.storage.remove(keys::TOKEN);
        self.storage.remove(keys::TOKEN_EXPIRES);
    }
}

impl<A: AuthApi> UnauthorizedHandler for SessionStore<A> {
    /// Global 401 reaction: remember where the user was, then tear the
    /// session down
    fn on_unauthorized(&self, current_path: Option<&str>) {
        self.op_seq.fetch_add(1, Ordering::SeqCst);

        if let Some(path) = current_path {
            if path != LOGIN_PATH {
                self.storage.set(keys::REDIRECT_AFTER_LOGIN, path);
            }
        }

        self.clear_local();
    }
}

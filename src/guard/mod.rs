//! Navigation guard
//!
//! Gates every route transition before it commits. The decision itself is a
//! pure function from the route intent and a session snapshot; the one-shot
//! side effects (remembering the intended path, emitting a notice) are
//! applied by [`NavigationGuard`] so the decision stays testable in
//! isolation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::client::AuthApi;
use crate::notify::{Notice, Notifier};
use crate::session::storage::{keys, Storage};
use crate::session::SessionStore;

/// Login page path
pub const LOGIN_PATH: &str = "/login";

/// Default landing route for authenticated users
pub const LANDING_PATH: &str = "/dashboard";

/// Fixed page title used when route metadata provides none
pub const DEFAULT_TITLE: &str = "ClinAgenda - Patient Reception";

/// Resolved metadata of the target route
#[derive(Debug, Clone)]
pub struct RouteMeta {
    /// Whether the route needs an authenticated session; defaults to true
    pub requires_auth: bool,

    /// Roles allowed to enter, when the route restricts them
    pub roles: Option<HashSet<String>>,

    /// Page title fragment
    pub title: Option<String>,
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self {
            requires_auth: true,
            roles: None,
            title: None,
        }
    }
}

/// One navigation attempt
#[derive(Debug, Clone)]
pub struct RouteIntent {
    pub path: String,
    pub meta: RouteMeta,
}

impl RouteIntent {
    pub fn new(path: impl Into<String>, meta: RouteMeta) -> Self {
        Self {
            path: path.into(),
            meta,
        }
    }
}

/// Read-only view of the session at decision time
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub roles: HashSet<String>,
}

/// Verdict for a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(String),
}

/// Decision plus the one-shot effects the caller must apply
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    pub decision: GuardDecision,

    /// Notice to surface to the user, if any
    pub notice: Option<Notice>,

    /// Path to remember for the post-login redirect, if any
    pub remember_path: Option<String>,
}

impl GuardOutcome {
    fn allow() -> Self {
        Self {
            decision: GuardDecision::Allow,
            notice: None,
            remember_path: None,
        }
    }

    fn redirect(path: &str) -> Self {
        Self {
            decision: GuardDecision::RedirectTo(path.to_string()),
            notice: None,
            remember_path: None,
        }
    }
}

/// Evaluate a navigation attempt. Rules apply in order; the first match
/// wins.
pub fn evaluate(intent: &RouteIntent, session: &SessionSnapshot) -> GuardOutcome {
    // Already signed in, heading for the login page: silent redirect
    if intent.path == LOGIN_PATH && session.authenticated {
        return GuardOutcome::redirect(LANDING_PATH);
    }

    if !intent.meta.requires_auth {
        return GuardOutcome::allow();
    }

    if !session.authenticated {
        return GuardOutcome {
            notice: Some(Notice::warning("Please sign in to access this page.")),
            remember_path: Some(intent.path.clone()),
            ..GuardOutcome::redirect(LOGIN_PATH)
        };
    }

    // Authenticated but lacking every required role: back to the landing
    // page, not to login
    if let Some(required) = &intent.meta.roles {
        if required.is_disjoint(&session.roles) {
            return GuardOutcome {
                notice: Some(Notice::error(
                    "You don't have permission to access this page.",
                )),
                ..GuardOutcome::redirect(LANDING_PATH)
            };
        }
    }

    GuardOutcome::allow()
}

/// Page title for a committed navigation
pub fn page_title(meta: &RouteMeta) -> String {
    match &meta.title {
        Some(title) => format!("{} - ClinAgenda", title),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Guard wired to a live session store, durable storage, and notifier
pub struct NavigationGuard<A: AuthApi> {
    session: Arc<SessionStore<A>>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
}

impl<A: AuthApi> NavigationGuard<A> {
    pub fn new(
        session: Arc<SessionStore<A>>,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            storage,
            notifier,
        }
    }

    /// Evaluate a transition and apply its one-shot effects
    pub fn before_each(&self, intent: &RouteIntent) -> GuardDecision {
        let outcome = evaluate(intent, &self.session.snapshot());

        log::debug!("Navigation to {}: {:?}", intent.path, outcome.decision);

        if let Some(path) = &outcome.remember_path {
            self.storage.set(keys::REDIRECT_AFTER_LOGIN, path);
        }

        if let Some(notice) = outcome.notice {
            self.notifier.notify(notice);
        }

        outcome.decision
    }

    /// Post-navigation hook; returns the title the embedder should display
    pub fn after_each(&self, meta: &RouteMeta) -> String {
        page_title(meta)
    }
}

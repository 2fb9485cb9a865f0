//! Command execution context
//!
//! Builds the wired session stack for a command: file-backed storage, the
//! API client, the session store, and the mediator hooks, eliminating
//! per-command setup boilerplate.

use std::sync::Arc;

use crate::cli::GlobalOptions;
use crate::client::http::LogNavigationSink;
use crate::client::ClinAgendaClient;
use crate::error::Result;
use crate::session::storage::{FileStorage, Storage};
use crate::session::SessionStore;

/// Context for command execution containing the wired session store.
///
/// Construction handles:
/// - Opening the session store file (custom path or default location)
/// - Creating the API client (custom host or production)
/// - Restoring any persisted session into the store
/// - Installing the 401 teardown handler and navigation sink on the mediator
pub struct SessionContext {
    /// Session store wired to the client's token slot
    pub session: Arc<SessionStore<ClinAgendaClient>>,
}

impl SessionContext {
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let storage: Arc<dyn Storage> = match opts.store_ref() {
            Some(path) => Arc::new(FileStorage::open(path.into())?),
            None => Arc::new(FileStorage::open_default()?),
        };

        let client = Arc::new(ClinAgendaClient::with_host(opts.api_host.clone())?);
        let bearer = client.mediator().bearer();

        let session = Arc::new(SessionStore::new(client.clone(), storage, bearer));

        // The 401 reaction needs the store, so it is installed after the
        // store is constructed
        client.mediator().set_unauthorized_handler(session.clone());
        client
            .mediator()
            .set_navigation_sink(Arc::new(LogNavigationSink));

        Ok(Self { session })
    }
}
